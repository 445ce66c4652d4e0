//! Contract binding flows: ABI calls, submissions, and event queries
//! against a mock node.

mod common;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use ledger_sdk::{AbiValue, BlockTag, ClientConfig, Error, LedgerClient, Wallet};
use serde_json::json;

const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const TOKEN_ADDRESS: &str = "0xc0ffee";
const HOLDER: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
const RECIPIENT: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";
const TRANSFER_TOPIC: &str = "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

const TOKEN_ABI: &str = r#"[
    {
        "type": "constructor",
        "inputs": [{ "name": "supply", "type": "uint256" }]
    },
    {
        "type": "function",
        "name": "balanceOf",
        "inputs": [{ "name": "owner", "type": "address" }],
        "outputs": [{ "name": "", "type": "uint256" }]
    },
    {
        "type": "function",
        "name": "transfer",
        "inputs": [
            { "name": "to", "type": "address" },
            { "name": "value", "type": "uint256" }
        ],
        "outputs": [{ "name": "", "type": "bool" }]
    },
    {
        "type": "event",
        "name": "Transfer",
        "inputs": [
            { "name": "from", "type": "address", "indexed": true },
            { "name": "to", "type": "address", "indexed": true },
            { "name": "value", "type": "uint256", "indexed": false }
        ]
    }
]"#;

fn test_config(node_addr: SocketAddr) -> ClientConfig {
    ClientConfig {
        node_url: format!("http://{}", node_addr),
        poll_interval_ms: 25,
        confirmation_timeout_secs: 5,
        ..ClientConfig::default()
    }
}

fn address_topic(address: &str) -> String {
    format!("0x{:0>64}", address.trim_start_matches("0x"))
}

#[tokio::test]
async fn read_call_encodes_selector_and_decodes_result() {
    let captured = Arc::new(Mutex::new(None::<serde_json::Value>));
    let handler_captured = captured.clone();
    let addr = common::start_mock_server(move |req| {
        let captured = handler_captured.clone();
        async move {
            match req.rpc_method().as_str() {
                "call" => {
                    *captured.lock().unwrap() = Some(req.rpc_params());
                    (
                        200,
                        common::rpc_result(json!(format!("0x{:064x}", 42))),
                    )
                }
                _ => (200, common::rpc_error(-32601, "unknown")),
            }
        }
    })
    .await;

    let client = LedgerClient::new(test_config(addr)).unwrap();
    let token = client.contract(TOKEN_ADDRESS, TOKEN_ABI).unwrap();

    let values = token
        .call("balanceOf", &[AbiValue::address(HOLDER).unwrap()])
        .await
        .unwrap();
    assert_eq!(values, vec![AbiValue::uint(42)]);

    let params = captured.lock().unwrap().clone().unwrap();
    let descriptor = &params[0];
    assert_eq!(descriptor["type"], "contract_call");
    assert_eq!(descriptor["to"], TOKEN_ADDRESS);
    assert_eq!(
        descriptor["from"],
        "0x0000000000000000000000000000000000000000"
    );
    let data = descriptor["data"].as_str().unwrap();
    assert!(data.starts_with("0x70a08231"));
    assert_eq!(data.len(), 2 + 8 + 64);
    assert_eq!(params[1], "latest");
}

#[tokio::test]
async fn truncated_call_results_are_decode_errors() {
    let addr = common::start_mock_server(|req| async move {
        match req.rpc_method().as_str() {
            "call" => (200, common::rpc_result(json!("0x00ff"))),
            _ => (200, common::rpc_error(-32601, "unknown")),
        }
    })
    .await;

    let client = LedgerClient::new(test_config(addr)).unwrap();
    let token = client.contract(TOKEN_ADDRESS, TOKEN_ABI).unwrap();

    let err = token
        .call("balanceOf", &[AbiValue::address(HOLDER).unwrap()])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn unknown_methods_fail_without_network_calls() {
    let hits = Arc::new(AtomicU32::new(0));
    let handler_hits = hits.clone();
    let addr = common::start_mock_server(move |_req| {
        let hits = handler_hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            (200, common::rpc_result(serde_json::Value::Null))
        }
    })
    .await;

    let client = LedgerClient::new(test_config(addr)).unwrap();
    let token = client.contract(TOKEN_ADDRESS, TOKEN_ABI).unwrap();

    let err = token.call("mint", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Abi(_)));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn send_requires_wallet() {
    let hits = Arc::new(AtomicU32::new(0));
    let handler_hits = hits.clone();
    let addr = common::start_mock_server(move |_req| {
        let hits = handler_hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            (200, common::rpc_result(serde_json::Value::Null))
        }
    })
    .await;

    let client = LedgerClient::new(test_config(addr)).unwrap();
    let token = client.contract(TOKEN_ADDRESS, TOKEN_ABI).unwrap();

    let err = token
        .send(
            "transfer",
            &[AbiValue::address(RECIPIENT).unwrap(), AbiValue::uint(5)],
            "0",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::WalletNotConfigured));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn send_signs_and_submits_invocation() {
    let submitted = Arc::new(Mutex::new(None::<serde_json::Value>));
    let handler_submitted = submitted.clone();
    let addr = common::start_mock_server(move |req| {
        let submitted = handler_submitted.clone();
        async move {
            match req.rpc_method().as_str() {
                "getAccount" => (
                    200,
                    common::rpc_result(json!({
                        "address": req.rpc_params()[0],
                        "balance": "10.0",
                        "nonce": 2,
                        "isContract": false
                    })),
                ),
                "estimateGas" => (200, common::rpc_result(json!("30000"))),
                "sendRawTransaction" => {
                    *submitted.lock().unwrap() = Some(req.rpc_params()[0].clone());
                    (200, common::rpc_result(json!("0xabc123")))
                }
                _ => (200, common::rpc_error(-32601, "unknown")),
            }
        }
    })
    .await;

    let wallet = Wallet::from_private_key(TEST_KEY).unwrap();
    let sender = wallet.address();
    let client = LedgerClient::with_wallet(test_config(addr), wallet).unwrap();
    let token = client.contract(TOKEN_ADDRESS, TOKEN_ABI).unwrap();

    let hash = token
        .send(
            "transfer",
            &[AbiValue::address(RECIPIENT).unwrap(), AbiValue::uint(5)],
            "0",
        )
        .await
        .unwrap();
    assert_eq!(hash, "0xabc123");

    let sent = submitted.lock().unwrap().clone().unwrap();
    assert_eq!(sent["type"], "contract_call");
    assert_eq!(sent["from"], sender.as_str());
    assert_eq!(sent["to"], TOKEN_ADDRESS);
    assert_eq!(sent["amount"], "0");
    assert_eq!(sent["nonce"], 2);
    let data = sent["data"].as_str().unwrap();
    assert!(data.starts_with("0xa9059cbb"));
    assert_eq!(data.len(), 2 + 8 + 128);
}

#[tokio::test]
async fn estimate_gas_prices_an_invocation() {
    let captured = Arc::new(Mutex::new(None::<serde_json::Value>));
    let handler_captured = captured.clone();
    let addr = common::start_mock_server(move |req| {
        let captured = handler_captured.clone();
        async move {
            match req.rpc_method().as_str() {
                "estimateGas" => {
                    *captured.lock().unwrap() = Some(req.rpc_params()[0].clone());
                    (200, common::rpc_result(json!("30000")))
                }
                _ => (200, common::rpc_error(-32601, "unknown")),
            }
        }
    })
    .await;

    let wallet = Wallet::from_private_key(TEST_KEY).unwrap();
    let client = LedgerClient::with_wallet(test_config(addr), wallet).unwrap();
    let token = client.contract(TOKEN_ADDRESS, TOKEN_ABI).unwrap();

    let fee = token
        .estimate_gas(
            "transfer",
            &[AbiValue::address(RECIPIENT).unwrap(), AbiValue::uint(5)],
            "0",
        )
        .await
        .unwrap();
    assert_eq!(fee, "30000");

    let descriptor = captured.lock().unwrap().clone().unwrap();
    let data = descriptor["data"].as_str().unwrap();
    assert!(data.starts_with("0xa9059cbb"));
}

#[tokio::test]
async fn events_decode_and_skip_corrupt_entries() {
    let captured = Arc::new(Mutex::new(None::<serde_json::Value>));
    let handler_captured = captured.clone();
    let addr = common::start_mock_server(move |req| {
        let captured = handler_captured.clone();
        async move {
            match req.rpc_method().as_str() {
                "getLogs" => {
                    *captured.lock().unwrap() = Some(req.rpc_params()[0].clone());
                    let good = json!({
                        "address": TOKEN_ADDRESS,
                        "topics": [
                            format!("0x{}", TRANSFER_TOPIC),
                            address_topic(HOLDER),
                            address_topic(RECIPIENT),
                        ],
                        "data": format!("0x{:064x}", 5),
                        "blockHeight": 41,
                        "transactionHash": "0xabc123",
                        "logIndex": 0
                    });
                    let corrupt = json!({
                        "address": TOKEN_ADDRESS,
                        "topics": [
                            format!("0x{}", TRANSFER_TOPIC),
                            address_topic(HOLDER),
                            address_topic(RECIPIENT),
                        ],
                        "data": "0x01",
                        "blockHeight": 42,
                        "transactionHash": "0xdef456",
                        "logIndex": 1
                    });
                    (200, common::rpc_result(json!([good, corrupt])))
                }
                _ => (200, common::rpc_error(-32601, "unknown")),
            }
        }
    })
    .await;

    let client = LedgerClient::new(test_config(addr)).unwrap();
    let token = client.contract(TOKEN_ADDRESS, TOKEN_ABI).unwrap();

    let events = token
        .events("Transfer", BlockTag::Height(0), BlockTag::Latest)
        .await
        .unwrap();

    assert_eq!(events.len(), 1, "the corrupt entry should be skipped");
    let event = &events[0];
    assert_eq!(event.name, "Transfer");
    assert_eq!(event.field("value"), Some(&AbiValue::uint(5)));
    assert_eq!(
        event.field("to"),
        Some(&AbiValue::address(RECIPIENT).unwrap())
    );
    assert_eq!(event.log.block_height, Some(41));

    let filter = captured.lock().unwrap().clone().unwrap();
    assert_eq!(filter["address"], TOKEN_ADDRESS);
    assert_eq!(filter["topics"][0], format!("0x{}", TRANSFER_TOPIC));
    assert_eq!(filter["fromBlock"], 0);
    assert_eq!(filter["toBlock"], "latest");
}

#[tokio::test]
async fn filtered_events_constrain_indexed_topics() {
    let captured = Arc::new(Mutex::new(None::<serde_json::Value>));
    let handler_captured = captured.clone();
    let addr = common::start_mock_server(move |req| {
        let captured = handler_captured.clone();
        async move {
            match req.rpc_method().as_str() {
                "getLogs" => {
                    *captured.lock().unwrap() = Some(req.rpc_params()[0].clone());
                    (200, common::rpc_result(json!([])))
                }
                _ => (200, common::rpc_error(-32601, "unknown")),
            }
        }
    })
    .await;

    let client = LedgerClient::new(test_config(addr)).unwrap();
    let token = client.contract(TOKEN_ADDRESS, TOKEN_ABI).unwrap();

    let events = token
        .events_filtered(
            "Transfer",
            &[Some(AbiValue::address(HOLDER).unwrap()), None],
            BlockTag::Height(10),
            BlockTag::Latest,
        )
        .await
        .unwrap();
    assert!(events.is_empty());

    let filter = captured.lock().unwrap().clone().unwrap();
    assert_eq!(filter["topics"][0], format!("0x{}", TRANSFER_TOPIC));
    assert_eq!(filter["topics"][1], address_topic(HOLDER));
    assert!(filter["topics"][2].is_null());
    assert_eq!(filter["fromBlock"], 10);
}

#[tokio::test]
async fn constructor_args_are_appended_to_bytecode() {
    let submitted = Arc::new(Mutex::new(None::<serde_json::Value>));
    let handler_submitted = submitted.clone();
    let addr = common::start_mock_server(move |req| {
        let submitted = handler_submitted.clone();
        async move {
            match req.rpc_method().as_str() {
                "getAccount" => (
                    200,
                    common::rpc_result(json!({
                        "address": req.rpc_params()[0],
                        "balance": "10.0",
                        "nonce": 0,
                        "isContract": false
                    })),
                ),
                "estimateGas" => (200, common::rpc_result(json!("500"))),
                "sendRawTransaction" => {
                    *submitted.lock().unwrap() = Some(req.rpc_params()[0].clone());
                    (200, common::rpc_result(json!("0xfeed")))
                }
                "getTransactionReceipt" => (
                    200,
                    common::rpc_result(json!({
                        "transactionHash": "0xfeed",
                        "blockHash": "0xfacefeed",
                        "blockHeight": 100,
                        "transactionIndex": 0,
                        "from": HOLDER,
                        "to": "",
                        "contractAddress": "0xc0de",
                        "gasUsed": "500",
                        "status": 1,
                        "logs": [],
                        "confirmations": 1
                    })),
                ),
                _ => (200, common::rpc_error(-32601, "unknown")),
            }
        }
    })
    .await;

    let wallet = Wallet::from_private_key(TEST_KEY).unwrap();
    let client = LedgerClient::with_wallet(test_config(addr), wallet).unwrap();

    let (address, _receipt) = client
        .deploy_contract(TOKEN_ABI, "0x6001600055", &[AbiValue::uint(1000)])
        .await
        .unwrap();
    assert_eq!(address, "0xc0de");

    let sent = submitted.lock().unwrap().clone().unwrap();
    assert_eq!(sent["type"], "contract_deploy");
    assert_eq!(
        sent["data"],
        format!("0x6001600055{:064x}", 1000).as_str()
    );
}

#[tokio::test]
async fn constructor_arity_is_checked_before_submission() {
    let hits = Arc::new(AtomicU32::new(0));
    let handler_hits = hits.clone();
    let addr = common::start_mock_server(move |_req| {
        let hits = handler_hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            (200, common::rpc_result(serde_json::Value::Null))
        }
    })
    .await;

    let wallet = Wallet::from_private_key(TEST_KEY).unwrap();
    let client = LedgerClient::with_wallet(test_config(addr), wallet).unwrap();

    let err = client
        .deploy_contract(TOKEN_ABI, "0x6001600055", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Abi(_)));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}
