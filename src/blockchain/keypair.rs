//! Local keypair wallet.
//!
//! Plays the role of an injected wallet for command-line use: it holds a
//! Solana keypair, asks an [`Approver`] before connecting and before every
//! signature, and optionally relays signed transactions itself so the
//! combined sign-and-send path is available.
//!
//! # Security
//! - Keypairs are read from a file path, never from command-line arguments
//! - Secret bytes are never logged

use async_trait::async_trait;
use solana_sdk::signer::keypair::{read_keypair_file, Keypair};
use solana_sdk::signer::Signer;
use std::path::Path;
use std::sync::Arc;

use crate::blockchain::client::ChainRpc;
use crate::blockchain::transaction::PreparedTransaction;
use crate::blockchain::types::{Address, BlockchainError, SignedTransaction, TxSignature};
use crate::blockchain::wallet::{InjectedWallet, WalletCapabilities};
use crate::error::{PaymentError, PaymentResult};

/// Environment variable holding the keypair file path.
pub const KEYPAIR_PATH_ENV_VAR: &str = "LAUNCHPAD_KEYPAIR";

/// What the user is asked to approve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalRequest {
    Connect { address: Address },
    SignTransfer { to: Address, minor_units: u64 },
}

/// Stand-in for the wallet's own approval popup.
#[async_trait]
pub trait Approver: Send + Sync {
    async fn approve(&self, request: &ApprovalRequest) -> bool;
}

/// Approves everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoApprove;

#[async_trait]
impl Approver for AutoApprove {
    async fn approve(&self, _request: &ApprovalRequest) -> bool {
        true
    }
}

/// Wallet backed by a local Solana keypair.
pub struct KeypairWallet {
    keypair: Keypair,
    approver: Arc<dyn Approver>,
    relay: Option<Arc<dyn ChainRpc>>,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair, approver: Arc<dyn Approver>) -> Self {
        Self {
            keypair,
            approver,
            relay: None,
        }
    }

    /// Load the keypair from a JSON keypair file.
    pub fn from_file(path: &Path, approver: Arc<dyn Approver>) -> PaymentResult<Self> {
        let keypair = read_keypair_file(path).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to read keypair");
            PaymentError::WalletUnavailable
        })?;
        Ok(Self::new(keypair, approver))
    }

    /// Load the keypair file named by `LAUNCHPAD_KEYPAIR`.
    pub fn from_env(approver: Arc<dyn Approver>) -> PaymentResult<Self> {
        let path = std::env::var(KEYPAIR_PATH_ENV_VAR).map_err(|_| {
            tracing::error!("Environment variable {} not set", KEYPAIR_PATH_ENV_VAR);
            PaymentError::WalletUnavailable
        })?;
        Self::from_file(Path::new(&path), approver)
    }

    /// Broadcast through `rpc` so the wallet can sign and send in one call.
    pub fn with_relay(mut self, rpc: Arc<dyn ChainRpc>) -> Self {
        self.relay = Some(rpc);
        self
    }

    pub fn address(&self) -> Address {
        Address::new(self.keypair.pubkey().to_string())
    }

    async fn sign(&self, tx: &PreparedTransaction) -> PaymentResult<SignedTransaction> {
        let request = ApprovalRequest::SignTransfer {
            to: tx.instruction.to.clone(),
            minor_units: tx.instruction.minor_units,
        };
        if !self.approver.approve(&request).await {
            return Err(PaymentError::SigningDeclined);
        }

        let mut solana_tx = tx.to_solana()?;
        let blockhash = solana_tx.message.recent_blockhash;
        solana_tx
            .try_sign(&[&self.keypair], blockhash)
            .map_err(|e| BlockchainError::Signing(e.to_string()))?;

        let signature = solana_tx
            .signatures
            .first()
            .map(|s| TxSignature::new(s.to_string()))
            .ok_or_else(|| BlockchainError::Signing("no signature produced".into()))?;
        let wire = bincode::serialize(&solana_tx)
            .map_err(|e| BlockchainError::Encoding(e.to_string()))?;

        Ok(SignedTransaction { signature, wire })
    }
}

#[async_trait]
impl InjectedWallet for KeypairWallet {
    fn name(&self) -> &str {
        "keypair"
    }

    async fn connect(&self) -> PaymentResult<()> {
        let request = ApprovalRequest::Connect {
            address: self.address(),
        };
        if self.approver.approve(&request).await {
            Ok(())
        } else {
            Err(PaymentError::UserRejected)
        }
    }

    fn public_key(&self) -> Option<Address> {
        Some(self.address())
    }

    fn capabilities(&self) -> WalletCapabilities {
        WalletCapabilities {
            sign_and_send: self.relay.is_some(),
            sign: true,
        }
    }

    async fn sign_and_send_transaction(
        &self,
        tx: &PreparedTransaction,
    ) -> PaymentResult<TxSignature> {
        let relay = self.relay.as_ref().ok_or(PaymentError::UnsupportedProvider)?;
        let signed = self.sign(tx).await?;
        relay
            .broadcast(&signed)
            .await
            .map_err(|e| PaymentError::SubmissionFailed(e.to_string()))
    }

    async fn sign_transaction(&self, tx: &PreparedTransaction) -> PaymentResult<SignedTransaction> {
        self.sign(tx).await
    }
}

impl std::fmt::Debug for KeypairWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeypairWallet")
            .field("address", &self.keypair.pubkey())
            .field("relay", &self.relay.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::transaction::TransferInstruction;
    use crate::blockchain::types::RecentBlockReference;
    use solana_sdk::hash::Hash;
    use solana_sdk::transaction::Transaction;

    struct Deny;

    #[async_trait]
    impl Approver for Deny {
        async fn approve(&self, _request: &ApprovalRequest) -> bool {
            false
        }
    }

    fn transfer_from(wallet: &KeypairWallet) -> PreparedTransaction {
        PreparedTransaction {
            instruction: TransferInstruction {
                from: wallet.address(),
                to: Address::new(Keypair::new().pubkey().to_string()),
                minor_units: 1_000,
            },
            recent_block: RecentBlockReference {
                blockhash: Hash::new_unique().to_string(),
                last_valid_block_height: 1,
            },
            fee_payer: wallet.address(),
        }
    }

    #[tokio::test]
    async fn test_sign_produces_verifiable_transaction() {
        let wallet = KeypairWallet::new(Keypair::new(), Arc::new(AutoApprove));
        let signed = wallet.sign_transaction(&transfer_from(&wallet)).await.unwrap();

        let tx: Transaction = bincode::deserialize(&signed.wire).unwrap();
        assert!(tx.verify().is_ok());
        assert_eq!(tx.signatures[0].to_string(), signed.signature.as_str());
    }

    #[tokio::test]
    async fn test_capabilities_follow_relay() {
        let wallet = KeypairWallet::new(Keypair::new(), Arc::new(AutoApprove));
        assert_eq!(
            wallet.capabilities(),
            WalletCapabilities { sign_and_send: false, sign: true }
        );
        let result = wallet.sign_and_send_transaction(&transfer_from(&wallet)).await;
        assert_eq!(result, Err(PaymentError::UnsupportedProvider));
    }

    #[tokio::test]
    async fn test_denied_prompts() {
        let wallet = KeypairWallet::new(Keypair::new(), Arc::new(Deny));
        assert_eq!(wallet.connect().await, Err(PaymentError::UserRejected));

        let result = wallet.sign_transaction(&transfer_from(&wallet)).await;
        assert_eq!(result, Err(PaymentError::SigningDeclined));
    }

    #[tokio::test]
    async fn test_foreign_fee_payer_fails_signing() {
        let wallet = KeypairWallet::new(Keypair::new(), Arc::new(AutoApprove));
        let mut tx = transfer_from(&wallet);
        let stranger = Address::new(Keypair::new().pubkey().to_string());
        tx.instruction.from = stranger.clone();
        tx.fee_payer = stranger;

        let result = wallet.sign_transaction(&tx).await;
        assert!(matches!(result, Err(PaymentError::SubmissionFailed(_))));
    }

    #[test]
    fn test_missing_keypair_file() {
        let result = KeypairWallet::from_file(Path::new("/nonexistent/keypair.json"), Arc::new(AutoApprove));
        assert!(matches!(result, Err(PaymentError::WalletUnavailable)));
    }
}
