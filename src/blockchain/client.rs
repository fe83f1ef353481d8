//! Chain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Fetch recent blockhashes at a requested commitment
//! - Broadcast raw signed transactions
//! - Report signature status for confirmation polling
//! - Select the endpoint for the requested network

use async_trait::async_trait;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{
    BlockchainError, BlockchainResult, Commitment, Network, RecentBlockReference,
    SignatureStatus, SignedTransaction, TxSignature,
};
use crate::config::schema::NetworksConfig;

/// Operations the payment flow needs from a cluster's RPC endpoint.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Network this endpoint serves.
    fn network(&self) -> Network;

    /// Fetch a fresh blockhash at the given commitment.
    async fn latest_block_reference(
        &self,
        commitment: Commitment,
    ) -> BlockchainResult<RecentBlockReference>;

    /// Broadcast a signed transaction's raw bytes.
    async fn broadcast(&self, signed: &SignedTransaction) -> BlockchainResult<TxSignature>;

    /// Current status of a signature, `None` while the cluster has not seen it.
    async fn signature_status(
        &self,
        signature: &TxSignature,
    ) -> BlockchainResult<Option<SignatureStatus>>;
}

fn commitment_config(commitment: Commitment) -> CommitmentConfig {
    match commitment {
        Commitment::Processed => CommitmentConfig::processed(),
        Commitment::Confirmed => CommitmentConfig::confirmed(),
        Commitment::Finalized => CommitmentConfig::finalized(),
    }
}

fn map_client_error(err: ClientError) -> BlockchainError {
    match err.kind() {
        ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) => {
            BlockchainError::Unreachable(err.to_string())
        }
        _ => BlockchainError::Rejected(err.to_string()),
    }
}

/// Solana JSON-RPC client for one cluster.
#[derive(Clone)]
pub struct SolanaRpcClient {
    client: Arc<RpcClient>,
    network: Network,
    rpc_url: String,
    timeout_duration: Duration,
}

impl SolanaRpcClient {
    /// Create a client for `network` at `rpc_url`.
    ///
    /// No request is made here; an unreachable endpoint only surfaces on the
    /// first call.
    pub fn new(network: Network, rpc_url: &str, timeout_secs: u64) -> BlockchainResult<Self> {
        url::Url::parse(rpc_url).map_err(|e| {
            BlockchainError::Unreachable(format!("Invalid RPC URL '{}': {}", rpc_url, e))
        })?;

        let timeout_duration = Duration::from_secs(timeout_secs);
        let client = RpcClient::new_with_timeout_and_commitment(
            rpc_url.to_string(),
            timeout_duration,
            CommitmentConfig::confirmed(),
        );

        tracing::debug!(network = %network, rpc_url = %rpc_url, "RPC client created");

        Ok(Self {
            client: Arc::new(client),
            network,
            rpc_url: rpc_url.to_string(),
            timeout_duration,
        })
    }

    /// Endpoint URL.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn call<T, F>(&self, method: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(network = %self.network, method, error = %e, "RPC error");
                Err(map_client_error(e))
            }
            Err(_) => {
                tracing::warn!(network = %self.network, method, "RPC timeout");
                Err(BlockchainError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }
}

#[async_trait]
impl ChainRpc for SolanaRpcClient {
    fn network(&self) -> Network {
        self.network
    }

    async fn latest_block_reference(
        &self,
        commitment: Commitment,
    ) -> BlockchainResult<RecentBlockReference> {
        let (hash, last_valid_block_height) = self
            .call(
                "getLatestBlockhash",
                self.client
                    .get_latest_blockhash_with_commitment(commitment_config(commitment)),
            )
            .await?;

        Ok(RecentBlockReference {
            blockhash: hash.to_string(),
            last_valid_block_height,
        })
    }

    async fn broadcast(&self, signed: &SignedTransaction) -> BlockchainResult<TxSignature> {
        let tx: Transaction = bincode::deserialize(&signed.wire)
            .map_err(|e| BlockchainError::Encoding(format!("signed transaction: {}", e)))?;

        let signature = self
            .call("sendTransaction", self.client.send_transaction(&tx))
            .await?;

        Ok(TxSignature::new(signature.to_string()))
    }

    async fn signature_status(
        &self,
        signature: &TxSignature,
    ) -> BlockchainResult<Option<SignatureStatus>> {
        let sig = Signature::from_str(signature.as_str())
            .map_err(|e| BlockchainError::Encoding(format!("signature: {}", e)))?;

        let response = self
            .call(
                "getSignatureStatuses",
                self.client.get_signature_statuses(&[sig]),
            )
            .await?;

        let status = match response.value.into_iter().next().flatten() {
            Some(status) => status,
            None => return Ok(None),
        };

        if let Some(err) = status.err.as_ref() {
            return Ok(Some(SignatureStatus::Failed(err.to_string())));
        }

        let level = if status.satisfies_commitment(CommitmentConfig::finalized()) {
            Commitment::Finalized
        } else if status.satisfies_commitment(CommitmentConfig::confirmed()) {
            Commitment::Confirmed
        } else {
            Commitment::Processed
        };

        Ok(Some(SignatureStatus::Landed(level)))
    }
}

impl std::fmt::Debug for SolanaRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaRpcClient")
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}

/// One RPC endpoint per supported network.
#[derive(Clone)]
pub struct RpcEndpoints {
    devnet: Arc<dyn ChainRpc>,
    mainnet: Arc<dyn ChainRpc>,
}

impl RpcEndpoints {
    pub fn new(devnet: Arc<dyn ChainRpc>, mainnet: Arc<dyn ChainRpc>) -> Self {
        Self { devnet, mainnet }
    }

    /// Build Solana clients from the `[networks]` config section.
    pub fn from_config(config: &NetworksConfig) -> BlockchainResult<Self> {
        let devnet = SolanaRpcClient::new(
            Network::TestNetwork,
            &config.devnet_rpc_url,
            config.rpc_timeout_secs,
        )?;
        let mainnet = SolanaRpcClient::new(
            Network::MainNetwork,
            &config.mainnet_rpc_url,
            config.rpc_timeout_secs,
        )?;
        Ok(Self::new(Arc::new(devnet), Arc::new(mainnet)))
    }

    /// Endpoint for `network`.
    pub fn for_network(&self, network: Network) -> Arc<dyn ChainRpc> {
        match network {
            Network::TestNetwork => self.devnet.clone(),
            Network::MainNetwork => self.mainnet.clone(),
        }
    }
}
