//! SDK-wide error definitions.

use thiserror::Error;

/// Errors that can occur during SDK operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A signing or submitting operation was invoked on a read-only client.
    #[error("Wallet not configured: attach a wallet to sign and submit transactions")]
    WalletNotConfigured,

    /// Amount or fee is not a non-negative decimal string.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Address is not a 0x-prefixed hex string.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Transaction or block hash is not a 0x-prefixed hex string.
    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    /// Transaction payload is not valid hex.
    #[error("Invalid payload data: {0}")]
    InvalidData(String),

    /// Connection failure, timeout, non-success status, or a malformed
    /// envelope at the transport boundary.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Error object reported by the node inside a JSON-RPC response.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Returned bytes do not match the ABI-declared shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// ABI definition could not be parsed, or a method, event, or type
    /// is unknown to it.
    #[error("ABI error: {0}")]
    Abi(String),

    /// Deployment receipt carried no contract address.
    #[error("Contract deployment failed: receipt carries no contract address")]
    DeploymentFailed,

    /// The scoring service answered with an error status.
    #[error("Scoring service error (status {status}): {body}")]
    RemoteService { status: u16, body: String },

    /// Confirmation polling exceeded its deadline.
    #[error("Timed out after {0} seconds waiting for confirmation")]
    Timeout(u64),

    /// Invalid key material, derivation failure, or a signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Configuration could not be loaded or failed validation.
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Timeout(60);
        assert_eq!(
            err.to_string(),
            "Timed out after 60 seconds waiting for confirmation"
        );

        let err = Error::Rpc {
            code: -32601,
            message: "method not found".to_string(),
        };
        assert!(err.to_string().contains("-32601"));
        assert!(err.to_string().contains("method not found"));

        let err = Error::RemoteService {
            status: 404,
            body: "model not found".to_string(),
        };
        assert!(err.to_string().contains("404"));
    }
}
