//! Contract interaction subsystem.
//!
//! # Data Flow
//! ```text
//! ABI JSON artifact
//!     → abi.rs (signature tables, cached selectors and topics)
//!     → codec.rs (head/tail encoding over 32-byte words)
//!     → binding.rs (calls, submissions, event queries via the client)
//! ```

pub mod abi;
pub mod binding;
pub mod codec;
pub mod value;

pub use abi::{Abi, AbiEvent, AbiFunction, AbiParam};
pub use binding::{Contract, DecodedEvent};
pub use value::AbiValue;
