//! Tagged argument and return values for contract interaction.

use alloy::primitives::{Address, U256};

use crate::error::{Error, Result};

/// A single ABI-typed value.
///
/// The variant set is closed, so the codec can match exhaustively instead
/// of inspecting runtime shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    /// Unsigned integer up to 256 bits.
    Uint(U256),
    /// 20-byte account or contract address.
    Address(Address),
    /// Dynamic byte string.
    Bytes(Vec<u8>),
    /// Boolean flag.
    Bool(bool),
    /// Homogeneous array.
    Array(Vec<AbiValue>),
}

impl AbiValue {
    /// Convenience constructor for small integers.
    pub fn uint(value: u64) -> Self {
        AbiValue::Uint(U256::from(value))
    }

    /// Parse a 0x-prefixed, 20-byte address string.
    pub fn address(value: &str) -> Result<Self> {
        value
            .parse::<Address>()
            .map(AbiValue::Address)
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", value, e)))
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            AbiValue::Uint(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            AbiValue::Address(address) => Some(*address),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AbiValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AbiValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[AbiValue]> {
        match self {
            AbiValue::Array(items) => Some(items),
            _ => None,
        }
    }
}
