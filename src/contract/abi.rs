//! ABI parsing and signature tables.
//!
//! An [`Abi`] is built once per binding: method selectors and event topics
//! are derived from canonical signatures at parse time and cached, so the
//! hot call path never re-hashes.

use std::collections::HashMap;

use alloy::primitives::{keccak256, B256};
use serde::Deserialize;

use crate::contract::codec;
use crate::contract::value::AbiValue;
use crate::error::{Error, Result};

/// One parameter in a function or event declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Only meaningful for event parameters.
    #[serde(default)]
    pub indexed: bool,
}

/// Raw ABI entry as it appears in the JSON artifact.
#[derive(Debug, Deserialize)]
struct AbiEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<AbiParam>,
    #[serde(default)]
    outputs: Vec<AbiParam>,
}

/// A callable method with its cached 4-byte selector.
#[derive(Debug, Clone)]
pub struct AbiFunction {
    pub name: String,
    pub inputs: Vec<AbiParam>,
    pub outputs: Vec<AbiParam>,
    pub selector: [u8; 4],
}

/// An event with its cached topic hash.
#[derive(Debug, Clone)]
pub struct AbiEvent {
    pub name: String,
    pub inputs: Vec<AbiParam>,
    pub topic: B256,
}

/// Parsed ABI with method and event tables keyed by name.
#[derive(Debug, Clone)]
pub struct Abi {
    functions: HashMap<String, AbiFunction>,
    events: HashMap<String, AbiEvent>,
    constructor: Option<Vec<AbiParam>>,
}

impl Abi {
    /// Parse an ABI JSON array into signature tables.
    pub fn parse(json: &str) -> Result<Self> {
        let entries: Vec<AbiEntry> = serde_json::from_str(json)
            .map_err(|e| Error::Abi(format!("Invalid ABI JSON: {}", e)))?;

        let mut functions = HashMap::new();
        let mut events = HashMap::new();
        let mut constructor = None;

        for entry in entries {
            match entry.kind.as_str() {
                "function" => {
                    let signature = canonical_signature(&entry.name, &entry.inputs);
                    let hash = keccak256(signature.as_bytes());
                    let mut selector = [0u8; 4];
                    selector.copy_from_slice(&hash[..4]);
                    functions.insert(
                        entry.name.clone(),
                        AbiFunction {
                            name: entry.name,
                            inputs: entry.inputs,
                            outputs: entry.outputs,
                            selector,
                        },
                    );
                }
                "event" => {
                    let signature = canonical_signature(&entry.name, &entry.inputs);
                    events.insert(
                        entry.name.clone(),
                        AbiEvent {
                            name: entry.name,
                            inputs: entry.inputs,
                            topic: keccak256(signature.as_bytes()),
                        },
                    );
                }
                "constructor" => {
                    constructor = Some(entry.inputs);
                }
                // fallback, receive, error entries carry nothing to index
                _ => {}
            }
        }

        Ok(Self {
            functions,
            events,
            constructor,
        })
    }

    /// Look up a method by name.
    pub fn function(&self, name: &str) -> Result<&AbiFunction> {
        self.functions
            .get(name)
            .ok_or_else(|| Error::Abi(format!("Unknown method '{}'", name)))
    }

    /// Look up an event by name.
    pub fn event(&self, name: &str) -> Result<&AbiEvent> {
        self.events
            .get(name)
            .ok_or_else(|| Error::Abi(format!("Unknown event '{}'", name)))
    }

    /// Encode a method invocation: selector followed by encoded arguments.
    pub fn encode_call(&self, method: &str, args: &[AbiValue]) -> Result<String> {
        let function = self.function(method)?;
        let mut data = function.selector.to_vec();
        data.extend(codec::encode(&function.inputs, args)?);
        Ok(format!("0x{}", alloy::hex::encode(data)))
    }

    /// Decode a call result against the method's declared outputs.
    pub fn decode_output(&self, method: &str, data: &str) -> Result<Vec<AbiValue>> {
        let function = self.function(method)?;
        let bytes = decode_hex(data)?;
        codec::decode(&function.outputs, &bytes)
    }

    /// Append encoded constructor arguments to deployment bytecode.
    pub fn encode_constructor(&self, bytecode: &str, args: &[AbiValue]) -> Result<String> {
        let body = bytecode.strip_prefix("0x").unwrap_or(bytecode);
        match &self.constructor {
            None if args.is_empty() => Ok(format!("0x{}", body)),
            None => Err(Error::Abi(
                "ABI declares no constructor but arguments were provided".to_string(),
            )),
            Some(inputs) => {
                let encoded = codec::encode(inputs, args)?;
                Ok(format!("0x{}{}", body, alloy::hex::encode(encoded)))
            }
        }
    }
}

/// Canonical signature string, e.g. `transfer(address,uint256)`.
fn canonical_signature(name: &str, inputs: &[AbiParam]) -> String {
    let types: Vec<&str> = inputs.iter().map(|p| p.kind.as_str()).collect();
    format!("{}({})", name, types.join(","))
}

/// Hex string (optional 0x prefix) to bytes, as a decode failure.
pub(crate) fn decode_hex(value: &str) -> Result<Vec<u8>> {
    let body = value.strip_prefix("0x").unwrap_or(value);
    alloy::hex::decode(body).map_err(|e| Error::Decode(format!("Invalid hex payload: {}", e)))
}
