//! Contract binding: ABI-aware calls, submissions, and event queries.

use crate::contract::abi::{decode_hex, Abi, AbiEvent, AbiParam};
use crate::contract::codec;
use crate::contract::value::AbiValue;
use crate::error::{Error, Result};
use crate::ledger::client::LedgerClient;
use crate::ledger::types::{BlockTag, LogEntry, LogFilter};
use crate::transaction::{validate_address, Transaction};

/// Sender placeholder for read-only invocations.
const CALL_SENDER: &str = "0x0000000000000000000000000000000000000000";

/// A deployed contract bound to a client, an address, and a parsed ABI.
///
/// Bindings are cheap to construct and borrow the client they came from;
/// hold one per contract for as long as the client lives.
pub struct Contract<'a> {
    client: &'a LedgerClient,
    address: String,
    abi: Abi,
}

/// An event log decoded into named fields, in declaration order.
#[derive(Debug, Clone)]
pub struct DecodedEvent {
    pub name: String,
    pub fields: Vec<(String, AbiValue)>,
    /// The raw entry this was decoded from.
    pub log: LogEntry,
}

impl DecodedEvent {
    /// Look up a decoded field by parameter name.
    pub fn field(&self, name: &str) -> Option<&AbiValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

impl<'a> Contract<'a> {
    pub(crate) fn new(client: &'a LedgerClient, address: &str, abi_json: &str) -> Result<Self> {
        validate_address(address)?;
        let abi = Abi::parse(abi_json)?;
        Ok(Self {
            client,
            address: address.to_string(),
            abi,
        })
    }

    /// The bound contract address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The parsed ABI behind this binding.
    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    /// Invoke a read-only method against the latest state and decode the
    /// returned values.
    pub async fn call(&self, method: &str, args: &[AbiValue]) -> Result<Vec<AbiValue>> {
        let data = self.abi.encode_call(method, args)?;
        let descriptor = Transaction::call(CALL_SENDER, &self.address, &data);
        let raw = self.client.call_at(&descriptor, BlockTag::Latest).await?;
        self.abi.decode_output(method, &raw)
    }

    /// Sign and submit a state-changing invocation; `value` is the amount
    /// transferred alongside the call.
    pub async fn send(&self, method: &str, args: &[AbiValue], value: &str) -> Result<String> {
        let wallet = self.client.wallet().ok_or(Error::WalletNotConfigured)?;
        let data = self.abi.encode_call(method, args)?;
        let tx = Transaction::call_with_value(&wallet.address(), &self.address, &data, value);
        self.client.submit(tx).await
    }

    /// Fee estimate for an invocation, without submitting it.
    pub async fn estimate_gas(
        &self,
        method: &str,
        args: &[AbiValue],
        value: &str,
    ) -> Result<String> {
        let wallet = self.client.wallet().ok_or(Error::WalletNotConfigured)?;
        let data = self.abi.encode_call(method, args)?;
        let tx = Transaction::call_with_value(&wallet.address(), &self.address, &data, value);
        self.client.estimate_gas(&tx).await
    }

    /// Query and decode logs for `event` between the given blocks.
    ///
    /// Entries that fail to decode against the declared shape are skipped
    /// with a warning; one corrupt log never aborts the batch.
    pub async fn events(
        &self,
        event: &str,
        from_block: BlockTag,
        to_block: BlockTag,
    ) -> Result<Vec<DecodedEvent>> {
        self.events_filtered(event, &[], from_block, to_block).await
    }

    /// Like [`events`](Self::events), with positional constraints on the
    /// event's indexed parameters; `None` leaves a position unconstrained.
    pub async fn events_filtered(
        &self,
        event: &str,
        indexed: &[Option<AbiValue>],
        from_block: BlockTag,
        to_block: BlockTag,
    ) -> Result<Vec<DecodedEvent>> {
        let definition = self.abi.event(event)?;
        let filter = LogFilter {
            address: self.address.clone(),
            topics: build_topics(definition, indexed)?,
            from_block,
            to_block,
        };

        let entries = self.client.logs(&filter).await?;
        let mut decoded = Vec::with_capacity(entries.len());
        for entry in entries {
            match decode_event(definition, &entry) {
                Ok(event) => decoded.push(event),
                Err(e) => {
                    tracing::warn!(
                        event = %definition.name,
                        error = %e,
                        "Skipping undecodable log entry"
                    );
                }
            }
        }
        Ok(decoded)
    }
}

impl std::fmt::Debug for Contract<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contract")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Build the positional topics list for a log filter: the event topic
/// first, then one entry per constrained indexed parameter.
fn build_topics(
    definition: &AbiEvent,
    indexed: &[Option<AbiValue>],
) -> Result<Vec<Option<String>>> {
    let params: Vec<&AbiParam> = definition.inputs.iter().filter(|p| p.indexed).collect();
    if indexed.len() > params.len() {
        return Err(Error::Abi(format!(
            "Event '{}' declares {} indexed parameters, got {} constraints",
            definition.name,
            params.len(),
            indexed.len()
        )));
    }

    let mut topics = vec![Some(format!("0x{}", alloy::hex::encode(definition.topic)))];
    for (param, constraint) in params.iter().zip(indexed) {
        topics.push(match constraint {
            Some(value) => Some(format!(
                "0x{}",
                alloy::hex::encode(codec::encode_topic(param, value)?)
            )),
            None => None,
        });
    }
    Ok(topics)
}

/// Decode one raw log against an event definition.
///
/// topics[0] carries the event topic hash; indexed parameters consume the
/// following topics in declaration order, the rest decode from `data`.
fn decode_event(definition: &AbiEvent, log: &LogEntry) -> Result<DecodedEvent> {
    let mut topics = log.topics.iter();
    let head = topics
        .next()
        .ok_or_else(|| Error::Decode("Log entry has no topics".to_string()))?;
    if decode_hex(head)? != definition.topic.as_slice() {
        return Err(Error::Decode(format!(
            "Topic does not match event '{}'",
            definition.name
        )));
    }

    let data = decode_hex(&log.data)?;
    let unindexed: Vec<AbiParam> = definition
        .inputs
        .iter()
        .filter(|p| !p.indexed)
        .cloned()
        .collect();
    let mut data_values = codec::decode(&unindexed, &data)?.into_iter();

    let mut fields = Vec::with_capacity(definition.inputs.len());
    for param in &definition.inputs {
        let value = if param.indexed {
            let topic = topics.next().ok_or_else(|| {
                Error::Decode(format!("Missing indexed topic for '{}'", param.name))
            })?;
            codec::decode_topic(param, &decode_hex(topic)?)?
        } else {
            data_values.next().ok_or_else(|| {
                Error::Decode(format!("Missing data field for '{}'", param.name))
            })?
        };
        fields.push((param.name.clone(), value));
    }

    Ok(DecodedEvent {
        name: definition.name.clone(),
        fields,
        log: log.clone(),
    })
}
