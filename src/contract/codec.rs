//! ABI encode/decode over 32-byte words.
//!
//! Head/tail layout: static values sit inline in the head, dynamic values
//! (byte strings, arrays) leave an offset in the head and their payload in
//! the tail. Offsets are relative to the start of the enclosing tuple
//! region. Decoding is strict: truncated or malformed payloads are a
//! [`Error::Decode`], never a partial value.

use std::fmt;

use alloy::primitives::{Address, U256};

use crate::contract::abi::AbiParam;
use crate::contract::value::AbiValue;
use crate::error::{Error, Result};

const WORD: usize = 32;

/// Parsed ABI type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AbiType {
    Uint(usize),
    Address,
    Bool,
    Bytes,
    Array(Box<AbiType>),
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Uint(bits) => write!(f, "uint{}", bits),
            AbiType::Address => write!(f, "address"),
            AbiType::Bool => write!(f, "bool"),
            AbiType::Bytes => write!(f, "bytes"),
            AbiType::Array(inner) => write!(f, "{}[]", inner),
        }
    }
}

fn parse_type(decl: &str) -> Result<AbiType> {
    if let Some(inner) = decl.strip_suffix("[]") {
        return Ok(AbiType::Array(Box::new(parse_type(inner)?)));
    }
    match decl {
        "address" => Ok(AbiType::Address),
        "bool" => Ok(AbiType::Bool),
        "bytes" => Ok(AbiType::Bytes),
        "uint" => Ok(AbiType::Uint(256)),
        _ => {
            if let Some(width) = decl.strip_prefix("uint") {
                let bits: usize = width
                    .parse()
                    .map_err(|_| Error::Abi(format!("Unsupported ABI type '{}'", decl)))?;
                if bits == 0 || bits > 256 || bits % 8 != 0 {
                    return Err(Error::Abi(format!("Unsupported ABI type '{}'", decl)));
                }
                return Ok(AbiType::Uint(bits));
            }
            Err(Error::Abi(format!("Unsupported ABI type '{}'", decl)))
        }
    }
}

/// Arrays and byte strings are dynamic; everything else is one word.
fn is_dynamic(ty: &AbiType) -> bool {
    matches!(ty, AbiType::Bytes | AbiType::Array(_))
}

fn parse_types(params: &[AbiParam]) -> Result<Vec<AbiType>> {
    params.iter().map(|p| parse_type(&p.kind)).collect()
}

/// Encode `values` against the declared parameter list.
pub fn encode(params: &[AbiParam], values: &[AbiValue]) -> Result<Vec<u8>> {
    if params.len() != values.len() {
        return Err(Error::Abi(format!(
            "Expected {} arguments, got {}",
            params.len(),
            values.len()
        )));
    }
    encode_tuple(&parse_types(params)?, values)
}

fn encode_tuple(types: &[AbiType], values: &[AbiValue]) -> Result<Vec<u8>> {
    let head_size = types.len() * WORD;
    let mut head = Vec::with_capacity(head_size);
    let mut tail: Vec<u8> = Vec::new();

    for (ty, value) in types.iter().zip(values) {
        if is_dynamic(ty) {
            let offset = U256::from(head_size + tail.len());
            head.extend_from_slice(&offset.to_be_bytes::<WORD>());
            tail.extend(encode_value(ty, value)?);
        } else {
            head.extend(encode_value(ty, value)?);
        }
    }

    head.extend(tail);
    Ok(head)
}

fn encode_value(ty: &AbiType, value: &AbiValue) -> Result<Vec<u8>> {
    match (ty, value) {
        (AbiType::Uint(bits), AbiValue::Uint(v)) => {
            if v.bit_len() > *bits {
                return Err(Error::Abi(format!("Value does not fit in uint{}", bits)));
            }
            Ok(v.to_be_bytes::<WORD>().to_vec())
        }
        (AbiType::Address, AbiValue::Address(address)) => {
            let mut word = vec![0u8; WORD];
            word[12..].copy_from_slice(address.as_slice());
            Ok(word)
        }
        (AbiType::Bool, AbiValue::Bool(flag)) => {
            let mut word = vec![0u8; WORD];
            word[WORD - 1] = *flag as u8;
            Ok(word)
        }
        (AbiType::Bytes, AbiValue::Bytes(bytes)) => {
            let mut out = U256::from(bytes.len()).to_be_bytes::<WORD>().to_vec();
            out.extend_from_slice(bytes);
            let padding = (WORD - bytes.len() % WORD) % WORD;
            out.extend(std::iter::repeat(0u8).take(padding));
            Ok(out)
        }
        (AbiType::Array(inner), AbiValue::Array(items)) => {
            let mut out = U256::from(items.len()).to_be_bytes::<WORD>().to_vec();
            let element_types = vec![(**inner).clone(); items.len()];
            out.extend(encode_tuple(&element_types, items)?);
            Ok(out)
        }
        (ty, value) => Err(Error::Abi(format!(
            "Argument type mismatch: expected {}, got {:?}",
            ty, value
        ))),
    }
}

/// Decode `data` against the declared parameter list.
pub fn decode(params: &[AbiParam], data: &[u8]) -> Result<Vec<AbiValue>> {
    decode_tuple(&parse_types(params)?, data)
}

/// Encode one value as an indexed-topic word for a log filter. Dynamic
/// parameters are stored hashed on the node and cannot be matched by value.
pub fn encode_topic(param: &AbiParam, value: &AbiValue) -> Result<Vec<u8>> {
    let ty = parse_type(&param.kind)?;
    if is_dynamic(&ty) {
        return Err(Error::Abi(format!(
            "Cannot filter on dynamic indexed parameter '{}'",
            param.name
        )));
    }
    encode_value(&ty, value)
}

/// Decode one indexed-topic word. Dynamic indexed values arrive as their
/// keccak hash, which cannot be inverted; they are kept as raw bytes.
pub fn decode_topic(param: &AbiParam, topic: &[u8]) -> Result<AbiValue> {
    let ty = parse_type(&param.kind)?;
    if topic.len() != WORD {
        return Err(Error::Decode(format!(
            "Topic for '{}' is not a 32-byte word",
            param.name
        )));
    }
    if is_dynamic(&ty) {
        return Ok(AbiValue::Bytes(topic.to_vec()));
    }
    decode_at(&ty, topic, 0)
}

fn decode_tuple(types: &[AbiType], region: &[u8]) -> Result<Vec<AbiValue>> {
    let mut values = Vec::with_capacity(types.len());
    for (index, ty) in types.iter().enumerate() {
        values.push(decode_at(ty, region, index * WORD)?);
    }
    Ok(values)
}

/// Decode one value whose head word sits at `head_at` within `region`.
fn decode_at(ty: &AbiType, region: &[u8], head_at: usize) -> Result<AbiValue> {
    match ty {
        AbiType::Uint(bits) => {
            let w = word(region, head_at)?;
            let value = U256::from_be_slice(w);
            if value.bit_len() > *bits {
                return Err(Error::Decode(format!(
                    "Value does not fit in uint{}",
                    bits
                )));
            }
            Ok(AbiValue::Uint(value))
        }
        AbiType::Address => {
            let w = word(region, head_at)?;
            if w[..12].iter().any(|b| *b != 0) {
                return Err(Error::Decode(
                    "Address word has nonzero padding".to_string(),
                ));
            }
            Ok(AbiValue::Address(Address::from_slice(&w[12..])))
        }
        AbiType::Bool => {
            let w = word(region, head_at)?;
            if w[..WORD - 1].iter().any(|b| *b != 0) || w[WORD - 1] > 1 {
                return Err(Error::Decode("Boolean word is not 0 or 1".to_string()));
            }
            Ok(AbiValue::Bool(w[WORD - 1] == 1))
        }
        AbiType::Bytes => {
            let offset = word_to_usize(word(region, head_at)?)?;
            let len = word_to_usize(word(region, offset)?)?;
            let start = offset + WORD;
            let bytes = start
                .checked_add(len)
                .and_then(|end| region.get(start..end))
                .ok_or_else(|| Error::Decode("Truncated byte string".to_string()))?;
            Ok(AbiValue::Bytes(bytes.to_vec()))
        }
        AbiType::Array(inner) => {
            let offset = word_to_usize(word(region, head_at)?)?;
            let len = word_to_usize(word(region, offset)?)?;
            let body = region
                .get(offset + WORD..)
                .ok_or_else(|| Error::Decode("Truncated array body".to_string()))?;
            // every element owns at least one head word in the body
            if len > body.len() / WORD {
                return Err(Error::Decode("Truncated array body".to_string()));
            }
            let element_types = vec![(**inner).clone(); len];
            decode_tuple(&element_types, body).map(AbiValue::Array)
        }
    }
}

fn word(region: &[u8], at: usize) -> Result<&[u8]> {
    at.checked_add(WORD)
        .and_then(|end| region.get(at..end))
        .ok_or_else(|| Error::Decode(format!("Truncated payload: need word at offset {}", at)))
}

fn word_to_usize(w: &[u8]) -> Result<usize> {
    usize::try_from(U256::from_be_slice(w))
        .map_err(|_| Error::Decode("Offset or length exceeds addressable range".to_string()))
}
