//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! PaymentRequest + connected address
//!     → transaction.rs (lamports, fresh blockhash, single transfer)
//!     → wallet.rs (capability probe, sign / sign-and-send)
//!     → client.rs (broadcast, signature status polling)
//! ```
//!
//! # Security Constraints
//! - Keypairs are loaded only from files named by the operator
//! - Never log secret key material
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod keypair;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{ChainRpc, RpcEndpoints, SolanaRpcClient};
pub use keypair::{ApprovalRequest, Approver, AutoApprove, KeypairWallet};
pub use transaction::{ConfirmationPolicy, PreparedTransaction, TransferBuilder};
pub use types::{Address, BlockchainError, Commitment, Network, TxSignature};
pub use wallet::{InjectedWallet, WalletAdapter, WalletCapabilities};
