//! Payment form state.
//!
//! Holds the raw user input and performs the syntactic checks only; the
//! transaction builder does the conversion to lamports.

use crate::blockchain::transaction::to_minor_units;
use crate::blockchain::types::Network;
use crate::error::{PaymentError, PaymentResult};

/// Input that passed the form's checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    pub amount: String,
    pub network: Network,
}

/// Raw amount and network selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentForm {
    amount: String,
    network: Network,
}

impl PaymentForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled with an amount and network.
    pub fn with_values(amount: impl Into<String>, network: Network) -> Self {
        Self {
            amount: amount.into(),
            network,
        }
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
    }

    /// Select a network by name. Only `devnet` and `mainnet-beta` exist.
    pub fn set_network(&mut self, name: &str) -> PaymentResult<()> {
        self.network = name.parse().map_err(PaymentError::InvalidNetwork)?;
        Ok(())
    }

    pub fn select_network(&mut self, network: Network) {
        self.network = network;
    }

    /// Non-empty, numeric, finite, positive, and at least one lamport that fits in `u64`.
    pub fn validate(&self) -> PaymentResult<ValidatedForm> {
        let amount = self.amount.trim();
        if amount.is_empty() {
            return Err(PaymentError::InvalidAmount("amount is required".into()));
        }

        // Same rule the transfer builder applies, so nothing reaches the wallet
        // that would fail conversion later.
        to_minor_units(amount, self.network.units_per_major())?;

        Ok(ValidatedForm {
            amount: amount.to_string(),
            network: self.network,
        })
    }

    /// Back to empty defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
