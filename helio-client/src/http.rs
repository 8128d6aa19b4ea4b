//! JSON-RPC transport over HTTP.
//!
//! Method names, parameter shapes, and base58 payload encoding are
//! fixed by the network; this module conforms to that contract and maps
//! its failure modes onto the client's error taxonomy.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base58::{FromBase58, ToBase58};
use helio_core::keys::{Pubkey, Signature, PUBKEY_LEN, SIGNATURE_LEN};
use helio_core::transaction::BlockReference;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ClientError;
use crate::rpc::{AccountSnapshot, LedgerRpc, SignatureStatus};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// Error codes the network uses for temporary node conditions (behind,
// unhealthy, still syncing). Everything else on a submission path is a
// verdict on the transaction.
const TRANSIENT_RPC_CODES: &[i64] = &[-32004, -32005, -32014, -32016];

/// HTTP JSON-RPC implementation of [`LedgerRpc`].
///
/// Stateless apart from a request-id counter; safe to share across
/// tasks and to call concurrently for different transactions.
pub struct HttpRpc {
    endpoint: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    /// Left as a raw value: a null result is a legitimate answer
    /// (unseen signature, absent account), not a missing field.
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct AccountInfoResponse {
    owner: String,
    lamports: u64,
    #[serde(default)]
    data: String,
}

impl HttpRpc {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::network(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, ClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "rpc request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::network(format!("{method}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::network(format!("{method}: HTTP {status}")));
        }

        let envelope: RpcEnvelope = response
            .json()
            .await
            .map_err(|e| ClientError::network(format!("{method}: invalid response: {e}")))?;
        if let Some(error) = envelope.error {
            return Err(classify_rpc_error(method, &error));
        }
        Ok(envelope.result)
    }
}

/// Transient node conditions stay retryable; any other error object on a
/// submission path is the network's verdict on the transaction.
fn classify_rpc_error(method: &str, error: &RpcErrorObject) -> ClientError {
    if TRANSIENT_RPC_CODES.contains(&error.code) {
        return ClientError::network(format!(
            "{method}: {} (code {})",
            error.message, error.code
        ));
    }
    match method {
        "sendTransaction" | "requestAirdrop" => {
            ClientError::rejected(format!("{} (code {})", error.message, error.code))
        }
        _ => ClientError::network(format!(
            "{method}: {} (code {})",
            error.message, error.code
        )),
    }
}

fn expect_str<'a>(value: &'a Value, what: &str) -> Result<&'a str, ClientError> {
    value
        .as_str()
        .ok_or_else(|| ClientError::network(format!("expected {what} as a string, got {value}")))
}

fn decode_signature(value: &Value) -> Result<Signature, ClientError> {
    let text = expect_str(value, "signature")?;
    let bytes = text
        .from_base58()
        .map_err(|_| ClientError::network(format!("signature '{text}' is not valid base58")))?;
    let arr: [u8; SIGNATURE_LEN] = bytes.try_into().map_err(|v: Vec<u8>| {
        ClientError::network(format!("signature decoded to {} bytes", v.len()))
    })?;
    Ok(Signature::new(arr))
}

fn decode_bytes_32(text: &str, what: &str) -> Result<[u8; PUBKEY_LEN], ClientError> {
    let bytes = text
        .from_base58()
        .map_err(|_| ClientError::network(format!("{what} '{text}' is not valid base58")))?;
    bytes.try_into().map_err(|v: Vec<u8>| {
        ClientError::network(format!("{what} decoded to {} bytes", v.len()))
    })
}

#[async_trait]
impl LedgerRpc for HttpRpc {
    async fn send_transaction(&self, wire_bytes: &[u8]) -> Result<Signature, ClientError> {
        let encoded = wire_bytes.to_base58();
        let result = self.call("sendTransaction", json!([encoded])).await?;
        decode_signature(&result)
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, ClientError> {
        let result = self
            .call("getSignatureStatus", json!([signature.to_string()]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }
        let status: SignatureStatus = serde_json::from_value(result)
            .map_err(|e| ClientError::network(format!("malformed signature status: {e}")))?;
        Ok(Some(status))
    }

    async fn get_balance(&self, address: &Pubkey) -> Result<u64, ClientError> {
        let result = self.call("getBalance", json!([address.to_string()])).await?;
        result
            .as_u64()
            .ok_or_else(|| ClientError::network(format!("expected balance integer, got {result}")))
    }

    async fn get_account(
        &self,
        address: &Pubkey,
    ) -> Result<Option<AccountSnapshot>, ClientError> {
        let result = self
            .call("getAccountInfo", json!([address.to_string()]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }
        let info: AccountInfoResponse = serde_json::from_value(result)
            .map_err(|e| ClientError::network(format!("malformed account info: {e}")))?;
        let owner = Pubkey::new(decode_bytes_32(&info.owner, "account owner")?);
        let data = if info.data.is_empty() {
            Vec::new()
        } else {
            info.data.from_base58().map_err(|_| {
                ClientError::network("account data is not valid base58".to_string())
            })?
        };
        Ok(Some(AccountSnapshot {
            owner,
            lamports: info.lamports,
            data,
        }))
    }

    async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, ClientError> {
        let result = self
            .call("requestAirdrop", json!([address.to_string(), lamports]))
            .await?;
        decode_signature(&result)
    }

    async fn get_latest_block_reference(&self) -> Result<BlockReference, ClientError> {
        let result = self.call("getLatestBlockReference", json!([])).await?;
        let text = expect_str(&result, "block reference")?;
        Ok(BlockReference(decode_bytes_32(text, "block reference")?))
    }

    async fn is_block_reference_valid(
        &self,
        reference: &BlockReference,
    ) -> Result<bool, ClientError> {
        let result = self
            .call("isBlockReferenceValid", json!([reference.to_string()]))
            .await?;
        result
            .as_bool()
            .ok_or_else(|| ClientError::network(format!("expected bool, got {result}")))
    }
}
