//! Transaction records and their canonical signing form.
//!
//! # Design Decisions
//!
//! - Records are immutable value objects: named constructors set the fields
//!   a given kind requires, and the `with_*` builders return new instances
//!   instead of mutating in place
//! - Field order inside [`Transaction`] is part of the signing contract:
//!   the canonical form serializes fields in declaration order and omits
//!   unset optionals, so signer and node derive identical bytes
//! - Validation is local and synchronous; nothing here touches the network

use std::time::{SystemTime, UNIX_EPOCH};

use alloy::primitives::{keccak256, B256};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Transaction kinds understood by the ledger node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Plain value transfer between accounts.
    Transfer,
    /// Contract deployment; the payload carries the bytecode.
    ContractDeploy,
    /// Invocation of a deployed contract.
    ContractCall,
}

/// A transaction intent: transfer, contract deployment, or contract call.
///
/// Field order matters and must not be rearranged: canonical serialization
/// follows declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction kind.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Sender address.
    pub from: String,
    /// Recipient address; empty only for contract deployments.
    pub to: String,
    /// Transferred amount as a non-negative decimal string.
    pub amount: String,
    /// Hex-encoded payload: bytecode or encoded call data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Fee as a decimal string; unset until estimated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    /// Account nonce; unset until assigned on the submission path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    /// Creation time in seconds since the Unix epoch.
    pub timestamp: u64,
}

impl Transaction {
    /// Build a value transfer.
    pub fn transfer(from: &str, to: &str, amount: &str) -> Self {
        Self {
            kind: TransactionKind::Transfer,
            from: from.to_string(),
            to: to.to_string(),
            amount: amount.to_string(),
            data: None,
            fee: None,
            nonce: None,
            timestamp: now_secs(),
        }
    }

    /// Build a contract deployment carrying `bytecode`.
    pub fn deploy(from: &str, bytecode: &str) -> Self {
        Self::deploy_with_value(from, bytecode, "0")
    }

    /// Build a contract deployment that also endows the contract.
    pub fn deploy_with_value(from: &str, bytecode: &str, amount: &str) -> Self {
        Self {
            kind: TransactionKind::ContractDeploy,
            from: from.to_string(),
            to: String::new(),
            amount: amount.to_string(),
            data: Some(bytecode.to_string()),
            fee: None,
            nonce: None,
            timestamp: now_secs(),
        }
    }

    /// Build a contract call with encoded call `data`.
    pub fn call(from: &str, to: &str, data: &str) -> Self {
        Self::call_with_value(from, to, data, "0")
    }

    /// Build a contract call that also transfers value.
    pub fn call_with_value(from: &str, to: &str, data: &str, amount: &str) -> Self {
        Self {
            kind: TransactionKind::ContractCall,
            from: from.to_string(),
            to: to.to_string(),
            amount: amount.to_string(),
            data: Some(data.to_string()),
            fee: None,
            nonce: None,
            timestamp: now_secs(),
        }
    }

    /// New instance with the nonce assigned.
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// New instance with the fee assigned.
    pub fn with_fee(mut self, fee: &str) -> Self {
        self.fee = Some(fee.to_string());
        self
    }

    /// New instance with an explicit creation timestamp.
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Check field well-formedness without touching the network.
    pub fn validate(&self) -> Result<()> {
        validate_amount(&self.amount)?;
        if let Some(fee) = &self.fee {
            validate_amount(fee)?;
        }
        validate_address(&self.from)?;
        match self.kind {
            TransactionKind::ContractDeploy => {
                if !self.to.is_empty() {
                    return Err(Error::InvalidAddress(
                        "deployment recipient must be empty".to_string(),
                    ));
                }
            }
            _ => validate_address(&self.to)?,
        }
        if let Some(data) = &self.data {
            validate_hex_data(data)?;
        }
        Ok(())
    }

    /// Canonical wire bytes: fields in declaration order, unset optionals
    /// omitted. These are the exact bytes covered by the signature.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| Error::Wallet(format!("Failed to encode transaction for signing: {}", e)))
    }

    /// Keccak-256 digest of the canonical bytes; this is what gets signed.
    pub fn signing_digest(&self) -> Result<B256> {
        Ok(keccak256(self.canonical_bytes()?))
    }

    /// Hex-encoded signing digest. Nodes report the same value as the
    /// transaction hash, so it can be computed before submission.
    pub fn hash(&self) -> Result<String> {
        Ok(format!("0x{}", alloy::hex::encode(self.signing_digest()?)))
    }
}

/// A record plus the signatures produced over its canonical bytes.
///
/// Signatures are appended after signing and are never part of the
/// canonical form themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    #[serde(flatten)]
    pub record: Transaction,
    /// Hex-encoded secp256k1 signature over the signing digest.
    pub signature: String,
    /// Optional post-quantum signature, populated by nodes that carry one.
    #[serde(
        rename = "quantumSignature",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub quantum_signature: Option<String>,
}

/// Check that `value` is a non-negative decimal string: digits with at
/// most one decimal point.
pub fn validate_amount(value: &str) -> Result<()> {
    let mut seen_dot = false;
    let well_formed = !value.is_empty()
        && value != "."
        && value.chars().all(|c| {
            if c == '.' {
                if seen_dot {
                    return false;
                }
                seen_dot = true;
                true
            } else {
                c.is_ascii_digit()
            }
        });
    if well_formed {
        Ok(())
    } else {
        Err(Error::InvalidAmount(value.to_string()))
    }
}

/// Check that `value` is a 0x-prefixed hex string. The node does not pin
/// address length, so none is enforced here either.
pub fn validate_address(value: &str) -> Result<()> {
    let body = value
        .strip_prefix("0x")
        .ok_or_else(|| Error::InvalidAddress(value.to_string()))?;
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidAddress(value.to_string()));
    }
    Ok(())
}

/// Check that `value` looks like a transaction or block hash.
pub fn validate_hash(value: &str) -> Result<()> {
    let body = value
        .strip_prefix("0x")
        .ok_or_else(|| Error::InvalidHash(value.to_string()))?;
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidHash(value.to_string()));
    }
    Ok(())
}

/// Payloads are hex with an optional 0x prefix and even length; empty is
/// allowed.
fn validate_hex_data(value: &str) -> Result<()> {
    let body = value.strip_prefix("0x").unwrap_or(value);
    if body.len() % 2 != 0 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidData(value.to_string()));
    }
    Ok(())
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
