//! Transaction building and confirmation monitoring.
//!
//! # Responsibilities
//! - Convert a human-entered amount into lamports
//! - Build a single transfer bound to a fresh blockhash and fee payer
//! - Poll signature status until the required commitment is reached
//! - Encode prepared transfers as Solana transactions for signing

#![allow(deprecated)]

use solana_sdk::hash::Hash;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_instruction;
use solana_sdk::transaction::Transaction;
use std::str::FromStr;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::client::ChainRpc;
use crate::blockchain::types::{
    Address, BlockchainError, BlockchainResult, Commitment, RecentBlockReference,
    SignatureStatus, TxSignature,
};
use crate::error::{PaymentError, PaymentResult};
use crate::payments::types::PaymentRequest;

/// Native currency transfer between two accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferInstruction {
    pub from: Address,
    pub to: Address,
    pub minor_units: u64,
}

/// A transfer ready to be signed: one instruction, one blockhash, one fee payer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTransaction {
    pub instruction: TransferInstruction,
    pub recent_block: RecentBlockReference,
    pub fee_payer: Address,
}

impl PreparedTransaction {
    /// Encode as an unsigned Solana transaction.
    pub fn to_solana(&self) -> BlockchainResult<Transaction> {
        let from = parse_pubkey(&self.instruction.from)?;
        let to = parse_pubkey(&self.instruction.to)?;
        let payer = parse_pubkey(&self.fee_payer)?;
        let blockhash = Hash::from_str(&self.recent_block.blockhash)
            .map_err(|e| BlockchainError::Encoding(format!("blockhash: {}", e)))?;

        let ix = system_instruction::transfer(&from, &to, self.instruction.minor_units);
        let message = Message::new_with_blockhash(&[ix], Some(&payer), &blockhash);
        Ok(Transaction::new_unsigned(message))
    }
}

/// Decode a base58 address into a Solana public key.
pub fn parse_pubkey(address: &Address) -> BlockchainResult<Pubkey> {
    Pubkey::from_str(address.as_str())
        .map_err(|_| BlockchainError::InvalidAddress(address.to_string()))
}

/// Convert a major-unit decimal string into minor units.
///
/// Rounds half away from zero. Rejects empty, non-numeric, non-finite and
/// non-positive input, and amounts that round to zero or overflow `u64`.
pub fn to_minor_units(amount: &str, units_per_major: u64) -> PaymentResult<u64> {
    let trimmed = amount.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| PaymentError::InvalidAmount(format!("'{}' is not a number", trimmed)))?;

    if !value.is_finite() {
        return Err(PaymentError::InvalidAmount(format!("'{}' is not finite", trimmed)));
    }
    if value <= 0.0 {
        return Err(PaymentError::InvalidAmount(format!("'{}' must be greater than zero", trimmed)));
    }

    let minor = (value * units_per_major as f64).round();
    if minor < 1.0 {
        return Err(PaymentError::InvalidAmount(format!(
            "'{}' is smaller than the smallest unit",
            trimmed
        )));
    }
    if minor >= u64::MAX as f64 {
        return Err(PaymentError::InvalidAmount(format!("'{}' is too large", trimmed)));
    }

    Ok(minor as u64)
}

/// Builds single-transfer transactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferBuilder;

impl TransferBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build a prepared transfer for `request`, paid by `from`.
    ///
    /// The amount is validated before the RPC endpoint is contacted; an
    /// invalid amount makes no network call.
    pub async fn build(
        &self,
        request: &PaymentRequest,
        from: &Address,
        rpc: &dyn ChainRpc,
    ) -> PaymentResult<PreparedTransaction> {
        let network = request.network();
        let minor_units = to_minor_units(request.amount_major_units(), network.units_per_major())?;

        let recent_block = rpc
            .latest_block_reference(Commitment::Finalized)
            .await
            .map_err(|e| PaymentError::NetworkUnreachable(e.to_string()))?;

        tracing::debug!(
            network = %network,
            minor_units,
            blockhash = %recent_block.blockhash,
            "Transfer prepared"
        );

        Ok(PreparedTransaction {
            instruction: TransferInstruction {
                from: from.clone(),
                to: request.destination().clone(),
                minor_units,
            },
            recent_block,
            fee_payer: from.clone(),
        })
    }
}

/// Confirmation polling settings.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmationPolicy {
    /// Commitment level that counts as confirmed.
    pub commitment: Commitment,
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// Upper bound on the whole wait. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            commitment: Commitment::Confirmed,
            poll_interval: Duration::from_secs(1),
            timeout: Some(Duration::from_secs(90)),
        }
    }
}

/// Wait for `signature` to reach the policy's commitment.
pub async fn wait_for_confirmation(
    rpc: &dyn ChainRpc,
    signature: &TxSignature,
    policy: &ConfirmationPolicy,
) -> PaymentResult<()> {
    let poll = async {
        let mut ticker = interval(policy.poll_interval);

        loop {
            ticker.tick().await;

            match rpc.signature_status(signature).await {
                Ok(Some(SignatureStatus::Failed(reason))) => {
                    return Err(PaymentError::TransactionFailed(reason));
                }
                Ok(Some(status)) if status.satisfies(policy.commitment) => return Ok(()),
                Ok(status) => {
                    tracing::debug!(signature = %signature, ?status, "Waiting for confirmation");
                }
                Err(e @ (BlockchainError::Encoding(_) | BlockchainError::InvalidAddress(_))) => {
                    // Polling again cannot fix a malformed signature.
                    tracing::error!(signature = %signature, error = %e, "Signature cannot be tracked");
                    return Err(PaymentError::from(e));
                }
                Err(e) => {
                    // Transient RPC hiccups do not end the wait.
                    tracing::warn!(signature = %signature, error = %e, "Status poll failed");
                }
            }
        }
    };

    match policy.timeout {
        Some(limit) => match timeout(limit, poll).await {
            Ok(result) => result,
            Err(_) => Err(PaymentError::ConfirmationTimeout(whole_seconds_ceil(limit))),
        },
        None => poll.await,
    }
}

/// Seconds, rounded up so sub-second limits never read as zero.
fn whole_seconds_ceil(limit: Duration) -> u64 {
    let secs = limit.as_secs();
    if limit.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}
