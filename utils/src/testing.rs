//! In-process JSON-RPC node for checking call sequences without a fork.
//!
//! Responses are queued in order on an [`Asserter`] and every request the
//! provider issues is recorded, so a test can replay a deployment against
//! canned answers and then assert on exactly what was sent.

use alloy::primitives::{keccak256, Address, Bloom, Bytes, TxHash, B256, U256};
use alloy::providers::mock::{Asserter, MockTransport};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use alloy::rpc::json_rpc::{RequestPacket, ResponsePacket};
use alloy::transports::{TransportError, TransportFut};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use tower::Service;

/// One JSON-RPC request as the node received it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub params: Value,
}

/// Transaction fields of an `eth_sendTransaction` or `eth_call` request.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTransaction {
    pub from: Option<Address>,
    /// `None` for contract creation
    pub to: Option<Address>,
    pub input: Bytes,
    pub value: U256,
}

impl RecordedTransaction {
    fn from_params(params: &Value) -> Self {
        let tx = &params[0];
        let address = |field: &str| tx[field].as_str().and_then(|s| s.parse::<Address>().ok());
        let input = tx
            .get("input")
            .or_else(|| tx.get("data"))
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<Bytes>().ok())
            .unwrap_or_default();
        let value = tx["value"]
            .as_str()
            .and_then(|s| s.parse::<U256>().ok())
            .unwrap_or_default();
        Self {
            from: address("from"),
            to: address("to"),
            input,
            value,
        }
    }

    pub fn selector(&self) -> Option<[u8; 4]> {
        self.input.get(..4).and_then(|s| s.try_into().ok())
    }

    /// Calldata after the selector.
    pub fn args(&self) -> &[u8] {
        self.input.get(4..).unwrap_or_default()
    }

    /// The trailing `len` bytes of the input, where creation transactions
    /// carry their constructor arguments.
    pub fn tail(&self, len: usize) -> &[u8] {
        let start = self.input.len().saturating_sub(len);
        &self.input[start..]
    }

    /// Whether this creates the stub artifact `name`.
    pub fn creates(&self, name: &str) -> bool {
        self.to.is_none() && self.input.starts_with(&stub_code(name))
    }
}

/// 4-byte selector of a canonical signature such as `upgradeTo(address)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Address in ABI word `word` of `data`.
pub fn address_arg(data: &[u8], word: usize) -> Address {
    Address::from_slice(&data[word * 32 + 12..(word + 1) * 32])
}

pub fn uint_arg(data: &[u8], word: usize) -> U256 {
    U256::from_be_slice(&data[word * 32..(word + 1) * 32])
}

/// Creation code of the stub artifact `name`: the name's own bytes, so a
/// creation transaction identifies the contract it deploys.
pub fn stub_code(name: &str) -> Vec<u8> {
    name.as_bytes().to_vec()
}

/// Writes a `<name>.json` artifact with [`stub_code`] bytecode for each name.
pub fn write_stub_artifacts(dir: &Path, names: &[&str]) -> std::io::Result<()> {
    for name in names {
        let artifact = json!({
            "contractName": name,
            "abi": [],
            "bytecode": Bytes::from(stub_code(name)),
        });
        std::fs::write(dir.join(format!("{}.json", name)), artifact.to_string())?;
    }
    Ok(())
}

#[derive(Clone)]
struct RecordingTransport {
    inner: MockTransport,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl Service<RequestPacket> for RecordingTransport {
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = TransportFut<'static>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: RequestPacket) -> Self::Future {
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        for request in req.requests() {
            let params = request
                .params()
                .and_then(|raw| serde_json::from_str(raw.get()).ok())
                .unwrap_or(Value::Null);
            calls.push(RecordedCall {
                method: request.method().to_string(),
                params,
            });
        }
        drop(calls);
        self.inner.call(req)
    }
}

/// Scripted node: push the responses in the order the code under test
/// will ask for them, run it, then inspect [`MockNode::calls`].
pub struct MockNode {
    asserter: Asserter,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    provider: Arc<DynProvider>,
    next_tx: AtomicU64,
}

impl Default for MockNode {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNode {
    pub fn new() -> Self {
        let asserter = Asserter::new();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let transport = RecordingTransport {
            inner: MockTransport::new(asserter.clone()),
            calls: calls.clone(),
        };
        // no fillers: each provider call maps to exactly one request
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_client(RpcClient::new(transport, true))
            .erased();
        Self {
            asserter,
            calls,
            provider: Arc::new(provider),
            next_tx: AtomicU64::new(1),
        }
    }

    pub fn provider(&self) -> Arc<DynProvider> {
        self.provider.clone()
    }

    pub fn push<T: Serialize>(&self, response: &T) {
        self.asserter.push_success(response);
    }

    /// Answer for methods returning nothing, and for "not found".
    pub fn push_null(&self) {
        self.push(&Value::Null);
    }

    /// Raw `eth_call` return data.
    pub fn push_return(&self, data: impl Into<Bytes>) {
        self.push(&data.into());
    }

    pub fn push_error(&self, message: &'static str) {
        self.asserter.push_failure_msg(message);
    }

    pub fn push_receipt(&self, tx: TxHash, contract_address: Option<Address>, success: bool) {
        self.push(&receipt_json(tx, contract_address, success));
    }

    /// Queues the hash answer to `eth_sendTransaction` and a successful
    /// receipt for it.
    pub fn push_transaction(&self, contract_address: Option<Address>) -> TxHash {
        let tx = self.next_hash();
        self.push(&tx);
        self.push_receipt(tx, contract_address, true);
        tx
    }

    /// A creation transaction that yields `address`.
    pub fn push_deployment(&self, address: Address) -> TxHash {
        self.push_transaction(Some(address))
    }

    pub fn push_reverted_transaction(&self) -> TxHash {
        let tx = self.next_hash();
        self.push(&tx);
        self.push_receipt(tx, None, false);
        tx
    }

    /// Every request received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.method).collect()
    }

    pub fn sent_transactions(&self) -> Vec<RecordedTransaction> {
        self.transactions("eth_sendTransaction")
    }

    pub fn eth_calls(&self) -> Vec<RecordedTransaction> {
        self.transactions("eth_call")
    }

    /// Responses still queued.
    pub fn remaining(&self) -> usize {
        self.asserter.read_q().len()
    }

    fn transactions(&self, method: &str) -> Vec<RecordedTransaction> {
        self.calls()
            .iter()
            .filter(|call| call.method == method)
            .map(|call| RecordedTransaction::from_params(&call.params))
            .collect()
    }

    fn next_hash(&self) -> TxHash {
        B256::from(U256::from(self.next_tx.fetch_add(1, Ordering::Relaxed)))
    }
}

fn receipt_json(tx: TxHash, contract_address: Option<Address>, success: bool) -> Value {
    let status = if success { "0x1" } else { "0x0" };
    json!({
        "type": "0x0",
        "status": status,
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": Bloom::ZERO,
        "transactionHash": tx,
        "transactionIndex": "0x0",
        "blockHash": B256::repeat_byte(0xbb),
        "blockNumber": "0x1",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x1",
        "from": Address::ZERO,
        "to": null,
        "contractAddress": contract_address,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::network::TransactionBuilder;
    use alloy::primitives::address;
    use alloy::rpc::types::TransactionRequest;

    #[tokio::test]
    async fn records_transactions_in_order() {
        let node = MockNode::new();
        let provider = node.provider();
        let target = address!("00000000000000000000000000000000000000aa");
        let from = address!("00000000000000000000000000000000000000bb");
        let first = node.push_transaction(None);

        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(target)
            .with_input(Bytes::from(vec![0xde, 0xad, 0xbe, 0xef, 0x01]))
            .with_value(U256::from(7u64));
        let pending = provider.send_transaction(tx).await.unwrap();
        assert_eq!(*pending.tx_hash(), first);
        let receipt = provider.get_transaction_receipt(first).await.unwrap().unwrap();
        assert!(receipt.status());

        assert_eq!(node.methods(), vec!["eth_sendTransaction", "eth_getTransactionReceipt"]);
        let sent = node.sent_transactions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, Some(from));
        assert_eq!(sent[0].to, Some(target));
        assert_eq!(sent[0].selector(), Some([0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(sent[0].args(), &[0x01]);
        assert_eq!(sent[0].value, U256::from(7u64));
        assert_eq!(node.remaining(), 0);
    }

    #[tokio::test]
    async fn empty_queue_is_an_error() {
        let node = MockNode::new();
        assert!(node.provider().get_block_number().await.is_err());
        assert_eq!(node.methods(), vec!["eth_blockNumber"]);
    }
}
