//! Payment flow types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::blockchain::types::{Address, Network, TxSignature};
use crate::error::PaymentError;

/// A validated request to pay `amount_major_units` to `destination`.
///
/// Immutable once built; lives only for one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    amount_major_units: String,
    destination: Address,
    network: Network,
}

impl PaymentRequest {
    pub fn new(amount_major_units: impl Into<String>, destination: Address, network: Network) -> Self {
        Self {
            amount_major_units: amount_major_units.into(),
            destination,
            network,
        }
    }

    pub fn amount_major_units(&self) -> &str {
        &self.amount_major_units
    }

    pub fn destination(&self) -> &Address {
        &self.destination
    }

    pub fn network(&self) -> Network {
        self.network
    }
}

/// Result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Confirmed(TxSignature),
    /// The user declined in the wallet.
    Rejected(PaymentError),
    Failed(PaymentError),
}

impl SubmissionOutcome {
    pub fn from_error(err: PaymentError) -> Self {
        if err.is_rejection() {
            SubmissionOutcome::Rejected(err)
        } else {
            SubmissionOutcome::Failed(err)
        }
    }

    /// Label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionOutcome::Confirmed(_) => "confirmed",
            SubmissionOutcome::Rejected(_) => "rejected",
            SubmissionOutcome::Failed(_) => "failed",
        }
    }
}

/// What happened to a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerResult {
    /// Another attempt was in flight; this trigger was dropped.
    Ignored,
    Completed(SubmissionOutcome),
}

/// Submission state machine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaymentState {
    #[default]
    Idle,
    Connecting,
    Building,
    AwaitingSignature,
    Submitting,
    Confirming(TxSignature),
    Confirmed(TxSignature),
    Failed(PaymentError),
}

impl PaymentState {
    /// Whether a new attempt may start from this state.
    pub fn accepts_trigger(&self) -> bool {
        matches!(
            self,
            PaymentState::Idle | PaymentState::Confirmed(_) | PaymentState::Failed(_)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentState::Confirmed(_) | PaymentState::Failed(_))
    }

    /// Text for the status area.
    pub fn status_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentState::Idle => write!(f, "Idle"),
            PaymentState::Connecting => write!(f, "Connecting wallet..."),
            PaymentState::Building => write!(f, "Preparing transaction..."),
            PaymentState::AwaitingSignature => write!(f, "Waiting for wallet signature..."),
            PaymentState::Submitting => write!(f, "Submitting transaction..."),
            PaymentState::Confirming(sig) => write!(f, "Confirming transaction {}...", sig),
            PaymentState::Confirmed(sig) => write!(f, "Payment confirmed: {}", sig),
            PaymentState::Failed(err) => write!(f, "Payment failed: {}", err),
        }
    }
}

/// Body of the receiver lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverLookup {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReceiverLookup {
    pub fn found(wallet: impl Into<String>) -> Self {
        Self {
            ok: true,
            wallet: Some(wallet.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            wallet: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_acceptance() {
        assert!(PaymentState::Idle.accepts_trigger());
        assert!(PaymentState::Confirmed("S".into()).accepts_trigger());
        assert!(PaymentState::Failed(PaymentError::SigningDeclined).accepts_trigger());
        for busy in [
            PaymentState::Connecting,
            PaymentState::Building,
            PaymentState::AwaitingSignature,
            PaymentState::Submitting,
            PaymentState::Confirming("S".into()),
        ] {
            assert!(!busy.accepts_trigger(), "{:?}", busy);
        }
    }

    #[test]
    fn test_status_text() {
        assert_eq!(
            PaymentState::Confirmed("SIG1".into()).status_text(),
            "Payment confirmed: SIG1"
        );
        assert!(PaymentState::Failed(PaymentError::SigningDeclined)
            .status_text()
            .starts_with("Payment failed:"));
    }

    #[test]
    fn test_outcome_classification() {
        assert!(matches!(
            SubmissionOutcome::from_error(PaymentError::SigningDeclined),
            SubmissionOutcome::Rejected(_)
        ));
        assert!(matches!(
            SubmissionOutcome::from_error(PaymentError::NetworkUnreachable("down".into())),
            SubmissionOutcome::Failed(_)
        ));
    }

    #[test]
    fn test_receiver_lookup_json_shape() {
        let json = serde_json::to_value(ReceiverLookup::found("Addr123")).unwrap();
        assert_eq!(json, serde_json::json!({"ok": true, "wallet": "Addr123"}));

        let parsed: ReceiverLookup =
            serde_json::from_str(r#"{"ok":false,"error":"Receiver wallet not configured"}"#).unwrap();
        assert!(!parsed.ok);
        assert!(parsed.wallet.is_none());
    }
}
