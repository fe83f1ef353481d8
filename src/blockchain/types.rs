//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lamports per SOL. The same fixed factor applies on every cluster.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// The two clusters a payment can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Network {
    /// Test cluster (no real funds).
    #[default]
    #[serde(rename = "devnet")]
    TestNetwork,
    /// Production cluster.
    #[serde(rename = "mainnet-beta")]
    MainNetwork,
}

impl Network {
    /// Cluster name as used by RPC providers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::TestNetwork => "devnet",
            Network::MainNetwork => "mainnet-beta",
        }
    }

    /// Public RPC endpoint of the cluster.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::TestNetwork => "https://api.devnet.solana.com",
            Network::MainNetwork => "https://api.mainnet-beta.solana.com",
        }
    }

    /// Minor units per major unit of the native currency.
    pub fn units_per_major(&self) -> u64 {
        LAMPORTS_PER_SOL
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "devnet" => Ok(Network::TestNetwork),
            "mainnet-beta" => Ok(Network::MainNetwork),
            other => Err(other.to_string()),
        }
    }
}

/// A base58 account address, kept as text until it reaches the chain adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Transaction signature returned by a submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxSignature(String);

impl TxSignature {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TxSignature {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Short-lived blockhash that makes a transaction valid for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentBlockReference {
    pub blockhash: String,
    /// Last block height at which the blockhash is still accepted.
    pub last_valid_block_height: u64,
}

/// Durability levels reported by the cluster, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

/// Signature status as seen by the RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureStatus {
    /// Landed at the given commitment level.
    Landed(Commitment),
    /// Landed but the transaction failed.
    Failed(String),
}

impl SignatureStatus {
    /// Whether the status satisfies the required commitment.
    pub fn satisfies(&self, required: Commitment) -> bool {
        matches!(self, SignatureStatus::Landed(level) if *level >= required)
    }
}

/// A transaction signed by the wallet, ready for raw broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub signature: TxSignature,
    /// Wire-encoded signed transaction.
    pub wire: Vec<u8>,
}

/// Errors that can occur during chain RPC and signing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockchainError {
    /// Transport failure reaching the RPC endpoint.
    #[error("RPC unreachable: {0}")]
    Unreachable(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The endpoint answered with an error.
    #[error("RPC rejected request: {0}")]
    Rejected(String),

    /// An address failed to decode.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// A blockhash or signature failed to decode.
    #[error("Invalid encoding: {0}")]
    Encoding(String),

    /// Local signing failed.
    #[error("Signing failed: {0}")]
    Signing(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;
