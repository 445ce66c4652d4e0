//! Wallet management and transaction signing.
//!
//! # Security
//! - Private keys live exclusively inside the signer; transaction records
//!   never see key material
//! - Keys are never logged or serialized; `Debug` prints the address only
//! - Loading from the environment keeps keys out of config files

use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use alloy::signers::Signer;

use crate::error::{Error, Result};
use crate::transaction::{SignedTransaction, Transaction};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "LEDGER_SDK_PRIVATE_KEY";

/// Wallet holding the signing key for one account.
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    ///
    /// # Security
    /// The private key is parsed and stored securely. It is never logged.
    pub fn from_private_key(private_key_hex: &str) -> Result<Self> {
        // Strip 0x prefix if present
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| Error::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::info!(address = %signer.address(), "Wallet initialized");

        Ok(Self { signer })
    }

    /// Derive a wallet from a BIP-39 mnemonic phrase (first account of the
    /// standard derivation path).
    pub fn from_mnemonic(phrase: &str) -> Result<Self> {
        let signer = MnemonicBuilder::<English>::default()
            .phrase(phrase)
            .build()
            .map_err(|e| Error::Wallet(format!("Invalid mnemonic phrase: {}", e)))?;

        tracing::info!(address = %signer.address(), "Wallet derived from mnemonic");

        Ok(Self { signer })
    }

    /// Generate a wallet with a fresh random key.
    pub fn random() -> Self {
        Self {
            signer: PrivateKeySigner::random(),
        }
    }

    /// Load wallet from environment variable.
    ///
    /// Reads `LEDGER_SDK_PRIVATE_KEY` from environment.
    pub fn from_env() -> Result<Self> {
        Self::from_env_var(PRIVATE_KEY_ENV_VAR)
    }

    fn from_env_var(name: &str) -> Result<Self> {
        let private_key = std::env::var(name)
            .map_err(|_| Error::Wallet(format!("Environment variable {} not set", name)))?;

        Self::from_private_key(&private_key)
    }

    /// The 0x-prefixed address derived from the held key.
    pub fn address(&self) -> String {
        self.signer.address().to_string()
    }

    /// Sign arbitrary message bytes (with Ethereum prefix).
    pub async fn sign_message(&self, message: &[u8]) -> Result<alloy::signers::Signature> {
        self.signer
            .sign_message(message)
            .await
            .map_err(|e| Error::Wallet(format!("Message signing failed: {}", e)))
    }

    /// Validate, canonicalize, and sign a transaction record.
    ///
    /// The signature covers the keccak-256 digest of the canonical bytes.
    /// A record that fails validation is rejected before any key use.
    pub async fn sign_transaction(&self, tx: &Transaction) -> Result<SignedTransaction> {
        tx.validate()?;

        let digest = tx.signing_digest()?;
        let signature = self
            .signer
            .sign_hash(&digest)
            .await
            .map_err(|e| Error::Wallet(format!("Signing failed: {}", e)))?;

        Ok(SignedTransaction {
            record: tx.clone(),
            signature: format!("0x{}", alloy::hex::encode(signature.as_bytes())),
            quantum_signature: None,
        })
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material must never reach logs; expose the address only.
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .finish()
    }
}
