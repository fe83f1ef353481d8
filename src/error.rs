//! Payment error taxonomy.
//!
//! Every failure of a payment attempt is expressed as a [`PaymentError`]. The
//! submission orchestrator is the only place these are caught; it turns them
//! into the terminal `Failed` state and shows the message to the user.

use thiserror::Error;

use crate::blockchain::types::BlockchainError;

/// Errors that can end a payment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// The server has no receiver wallet, or the lookup failed.
    #[error("Receiver wallet not configured: {0}")]
    ReceiverNotConfigured(String),

    /// No wallet provider handle was supplied.
    #[error("No wallet found. Install a wallet or provide a keypair.")]
    WalletUnavailable,

    /// An address was requested before a successful connect.
    #[error("Wallet is not connected. Please connect or unlock your wallet.")]
    NotConnected,

    /// The user declined the connection request.
    #[error("Wallet connection was rejected by the user")]
    UserRejected,

    /// Entered amount is empty, non-numeric, non-finite or not positive.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Network selection outside the supported pair.
    #[error("Unsupported network: {0}")]
    InvalidNetwork(String),

    /// An address could not be decoded for the chain.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The RPC endpoint could not be reached or timed out.
    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    /// The user cancelled the signature prompt.
    #[error("Signature request was declined")]
    SigningDeclined,

    /// The provider exposes neither signing capability.
    #[error("Wallet does not support transaction signing")]
    UnsupportedProvider,

    /// The RPC endpoint refused the signed transaction.
    #[error("Transaction submission failed: {0}")]
    SubmissionFailed(String),

    /// The transaction landed but failed on-chain.
    #[error("Transaction failed on-chain: {0}")]
    TransactionFailed(String),

    /// Confirmation did not arrive within the configured window.
    #[error("Transaction not confirmed after {0} seconds")]
    ConfirmationTimeout(u64),
}

impl PaymentError {
    /// True for outcomes where the user said no in the wallet UI.
    pub fn is_rejection(&self) -> bool {
        matches!(self, PaymentError::UserRejected | PaymentError::SigningDeclined)
    }

    /// Short stable label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PaymentError::ReceiverNotConfigured(_) => "receiver_not_configured",
            PaymentError::WalletUnavailable => "wallet_unavailable",
            PaymentError::NotConnected => "not_connected",
            PaymentError::UserRejected => "user_rejected",
            PaymentError::InvalidAmount(_) => "invalid_amount",
            PaymentError::InvalidNetwork(_) => "invalid_network",
            PaymentError::InvalidAddress(_) => "invalid_address",
            PaymentError::NetworkUnreachable(_) => "network_unreachable",
            PaymentError::SigningDeclined => "signing_declined",
            PaymentError::UnsupportedProvider => "unsupported_provider",
            PaymentError::SubmissionFailed(_) => "submission_failed",
            PaymentError::TransactionFailed(_) => "transaction_failed",
            PaymentError::ConfirmationTimeout(_) => "confirmation_timeout",
        }
    }
}

impl From<BlockchainError> for PaymentError {
    fn from(err: BlockchainError) -> Self {
        match err {
            BlockchainError::Unreachable(msg) => PaymentError::NetworkUnreachable(msg),
            BlockchainError::Timeout(secs) => {
                PaymentError::NetworkUnreachable(format!("RPC timeout after {} seconds", secs))
            }
            BlockchainError::InvalidAddress(addr) => PaymentError::InvalidAddress(addr),
            other => PaymentError::SubmissionFailed(other.to_string()),
        }
    }
}

/// Result type for payment operations.
pub type PaymentResult<T> = Result<T, PaymentError>;
