//! Wallet capability adapter.
//!
//! A wallet provider may expose a combined sign-and-send call, a plain sign
//! call, both, or neither. The adapter probes the provider once, picks a
//! [`SigningStrategy`] and presents a uniform connect / address /
//! sign-and-submit surface to the payment flow.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::blockchain::client::ChainRpc;
use crate::blockchain::transaction::PreparedTransaction;
use crate::blockchain::types::{Address, SignedTransaction, TxSignature};
use crate::error::{PaymentError, PaymentResult};

/// Signing calls a provider advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalletCapabilities {
    pub sign_and_send: bool,
    pub sign: bool,
}

/// A wallet provider handle, shaped like the ones browsers inject.
///
/// Only `connect` and `public_key` are mandatory; the signing calls default to
/// [`PaymentError::UnsupportedProvider`] and are used only when advertised in
/// [`InjectedWallet::capabilities`].
#[async_trait]
pub trait InjectedWallet: Send + Sync {
    /// Display name of the provider.
    fn name(&self) -> &str;

    /// Ask the user to approve the connection.
    async fn connect(&self) -> PaymentResult<()>;

    /// Address exposed after a successful connect.
    fn public_key(&self) -> Option<Address>;

    fn capabilities(&self) -> WalletCapabilities;

    /// Sign and broadcast in one provider call.
    async fn sign_and_send_transaction(
        &self,
        _tx: &PreparedTransaction,
    ) -> PaymentResult<TxSignature> {
        Err(PaymentError::UnsupportedProvider)
    }

    /// Sign only; the caller broadcasts.
    async fn sign_transaction(&self, _tx: &PreparedTransaction) -> PaymentResult<SignedTransaction> {
        Err(PaymentError::UnsupportedProvider)
    }
}

/// How a prepared transaction gets signed and onto the network.
#[async_trait]
pub trait SigningStrategy: Send + Sync {
    fn label(&self) -> &'static str;

    async fn sign_and_submit(
        &self,
        wallet: &dyn InjectedWallet,
        tx: &PreparedTransaction,
        rpc: &dyn ChainRpc,
    ) -> PaymentResult<TxSignature>;
}

/// The provider signs and broadcasts in a single call.
#[derive(Debug, Default)]
pub struct CombinedSigner;

#[async_trait]
impl SigningStrategy for CombinedSigner {
    fn label(&self) -> &'static str {
        "combined"
    }

    async fn sign_and_submit(
        &self,
        wallet: &dyn InjectedWallet,
        tx: &PreparedTransaction,
        _rpc: &dyn ChainRpc,
    ) -> PaymentResult<TxSignature> {
        wallet.sign_and_send_transaction(tx).await
    }
}

/// The provider signs; the raw bytes are broadcast through the RPC endpoint.
#[derive(Debug, Default)]
pub struct SeparateSignAndBroadcast;

#[async_trait]
impl SigningStrategy for SeparateSignAndBroadcast {
    fn label(&self) -> &'static str {
        "sign-then-broadcast"
    }

    async fn sign_and_submit(
        &self,
        wallet: &dyn InjectedWallet,
        tx: &PreparedTransaction,
        rpc: &dyn ChainRpc,
    ) -> PaymentResult<TxSignature> {
        let signed = wallet.sign_transaction(tx).await?;
        tracing::debug!(signature = %signed.signature, bytes = signed.wire.len(), "Broadcasting signed transaction");

        rpc.broadcast(&signed)
            .await
            .map_err(|e| PaymentError::SubmissionFailed(e.to_string()))
    }
}

/// Pick the strategy for the advertised capabilities. Combined wins.
pub fn select_strategy(capabilities: WalletCapabilities) -> Option<Box<dyn SigningStrategy>> {
    if capabilities.sign_and_send {
        Some(Box::new(CombinedSigner))
    } else if capabilities.sign {
        Some(Box::new(SeparateSignAndBroadcast))
    } else {
        None
    }
}

/// Connection state for one page session.
///
/// The address is set once by the first successful connect and never changed
/// afterwards.
#[derive(Debug, Default)]
pub struct WalletSession {
    connected_address: OnceCell<Address>,
}

impl WalletSession {
    pub fn connected_address(&self) -> Option<&Address> {
        self.connected_address.get()
    }
}

/// Uniform wallet surface over an optional provider handle.
pub struct WalletAdapter {
    provider: Option<Arc<dyn InjectedWallet>>,
    strategy: Option<Box<dyn SigningStrategy>>,
    session: WalletSession,
}

impl WalletAdapter {
    /// Wrap a provider handle, or `None` when no wallet was detected.
    pub fn new(provider: Option<Arc<dyn InjectedWallet>>) -> Self {
        let strategy = provider
            .as_ref()
            .and_then(|p| select_strategy(p.capabilities()));

        match (&provider, &strategy) {
            (Some(p), Some(s)) => {
                tracing::info!(wallet = p.name(), strategy = s.label(), "Wallet detected")
            }
            (Some(p), None) => {
                tracing::warn!(wallet = p.name(), "Wallet exposes no signing capability")
            }
            (None, _) => tracing::info!("No wallet provider available"),
        }

        Self {
            provider,
            strategy,
            session: WalletSession::default(),
        }
    }

    /// Label of the selected signing strategy, if any.
    pub fn strategy_label(&self) -> Option<&'static str> {
        self.strategy.as_ref().map(|s| s.label())
    }

    pub fn session(&self) -> &WalletSession {
        &self.session
    }

    /// Connect to the provider. Already connected is success.
    pub async fn connect(&self) -> PaymentResult<Address> {
        let provider = self.provider.as_ref().ok_or(PaymentError::WalletUnavailable)?;

        let address = self
            .session
            .connected_address
            .get_or_try_init(|| async {
                provider.connect().await?;
                let address = provider.public_key().ok_or(PaymentError::NotConnected)?;
                tracing::info!(wallet = provider.name(), address = %address, "Wallet connected");
                Ok::<_, PaymentError>(address)
            })
            .await?;

        Ok(address.clone())
    }

    /// Connected address, or `NotConnected` before a successful connect.
    pub fn get_address(&self) -> PaymentResult<Address> {
        self.session
            .connected_address()
            .cloned()
            .ok_or(PaymentError::NotConnected)
    }

    /// Sign `tx` and get it onto the network through the selected strategy.
    pub async fn sign_and_submit(
        &self,
        tx: &PreparedTransaction,
        rpc: &dyn ChainRpc,
    ) -> PaymentResult<TxSignature> {
        let provider = self.provider.as_ref().ok_or(PaymentError::WalletUnavailable)?;
        let strategy = self.strategy.as_ref().ok_or(PaymentError::UnsupportedProvider)?;
        strategy.sign_and_submit(provider.as_ref(), tx, rpc).await
    }
}

impl std::fmt::Debug for WalletAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletAdapter")
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_string()))
            .field("strategy", &self.strategy_label())
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::{
        BlockchainResult, Commitment, Network, RecentBlockReference, SignatureStatus,
    };
    use crate::blockchain::transaction::TransferInstruction;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct StubWallet {
        capabilities: WalletCapabilities,
        reject_connect: bool,
        decline_sign: bool,
        connects: AtomicUsize,
    }

    impl StubWallet {
        fn with(capabilities: WalletCapabilities) -> Self {
            Self {
                capabilities,
                reject_connect: false,
                decline_sign: false,
                connects: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl InjectedWallet for StubWallet {
        fn name(&self) -> &str {
            "stub"
        }

        async fn connect(&self) -> PaymentResult<()> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            if self.reject_connect {
                Err(PaymentError::UserRejected)
            } else {
                Ok(())
            }
        }

        fn public_key(&self) -> Option<Address> {
            Some(Address::from("Payer1"))
        }

        fn capabilities(&self) -> WalletCapabilities {
            self.capabilities
        }

        async fn sign_and_send_transaction(
            &self,
            _tx: &PreparedTransaction,
        ) -> PaymentResult<TxSignature> {
            if self.decline_sign {
                return Err(PaymentError::SigningDeclined);
            }
            Ok(TxSignature::from("COMBINED"))
        }

        async fn sign_transaction(&self, _tx: &PreparedTransaction) -> PaymentResult<SignedTransaction> {
            if self.decline_sign {
                return Err(PaymentError::SigningDeclined);
            }
            Ok(SignedTransaction {
                signature: TxSignature::from("SEPARATE"),
                wire: vec![1, 2, 3],
            })
        }
    }

    #[derive(Default)]
    struct RecordingRpc {
        broadcasts: Mutex<Vec<Vec<u8>>>,
    }

    #[async_trait]
    impl ChainRpc for RecordingRpc {
        fn network(&self) -> Network {
            Network::TestNetwork
        }

        async fn latest_block_reference(
            &self,
            _commitment: Commitment,
        ) -> BlockchainResult<RecentBlockReference> {
            unreachable!("not used by the adapter")
        }

        async fn broadcast(&self, signed: &SignedTransaction) -> BlockchainResult<TxSignature> {
            self.broadcasts.lock().unwrap().push(signed.wire.clone());
            Ok(signed.signature.clone())
        }

        async fn signature_status(
            &self,
            _signature: &TxSignature,
        ) -> BlockchainResult<Option<SignatureStatus>> {
            Ok(None)
        }
    }

    fn prepared() -> PreparedTransaction {
        PreparedTransaction {
            instruction: TransferInstruction {
                from: Address::from("Payer1"),
                to: Address::from("Addr123"),
                minor_units: 500_000_000,
            },
            recent_block: RecentBlockReference {
                blockhash: "hash-1".into(),
                last_valid_block_height: 10,
            },
            fee_payer: Address::from("Payer1"),
        }
    }

    #[test]
    fn test_strategy_selection() {
        let both = WalletCapabilities { sign_and_send: true, sign: true };
        assert_eq!(select_strategy(both).unwrap().label(), "combined");

        let sign_only = WalletCapabilities { sign_and_send: false, sign: true };
        assert_eq!(select_strategy(sign_only).unwrap().label(), "sign-then-broadcast");

        assert!(select_strategy(WalletCapabilities::default()).is_none());
    }

    #[tokio::test]
    async fn test_missing_provider() {
        let adapter = WalletAdapter::new(None);
        assert_eq!(adapter.connect().await, Err(PaymentError::WalletUnavailable));
        assert_eq!(adapter.get_address(), Err(PaymentError::NotConnected));
    }

    #[tokio::test]
    async fn test_connect_is_idempotent() {
        let wallet = Arc::new(StubWallet::with(WalletCapabilities { sign_and_send: true, sign: false }));
        let adapter = WalletAdapter::new(Some(wallet.clone()));

        assert_eq!(adapter.get_address(), Err(PaymentError::NotConnected));
        assert_eq!(adapter.connect().await.unwrap(), Address::from("Payer1"));
        assert_eq!(adapter.connect().await.unwrap(), Address::from("Payer1"));
        assert_eq!(wallet.connects.load(Ordering::SeqCst), 1);
        assert_eq!(adapter.get_address().unwrap(), Address::from("Payer1"));
    }

    #[tokio::test]
    async fn test_rejected_connect_leaves_session_empty() {
        let mut stub = StubWallet::with(WalletCapabilities { sign_and_send: true, sign: false });
        stub.reject_connect = true;
        let adapter = WalletAdapter::new(Some(Arc::new(stub)));

        assert_eq!(adapter.connect().await, Err(PaymentError::UserRejected));
        assert!(adapter.session().connected_address().is_none());
    }

    #[tokio::test]
    async fn test_combined_path_skips_broadcast() {
        let wallet = Arc::new(StubWallet::with(WalletCapabilities { sign_and_send: true, sign: true }));
        let adapter = WalletAdapter::new(Some(wallet));
        let rpc = RecordingRpc::default();

        let sig = adapter.sign_and_submit(&prepared(), &rpc).await.unwrap();
        assert_eq!(sig, TxSignature::from("COMBINED"));
        assert!(rpc.broadcasts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_separate_path_broadcasts_raw_bytes() {
        let wallet = Arc::new(StubWallet::with(WalletCapabilities { sign_and_send: false, sign: true }));
        let adapter = WalletAdapter::new(Some(wallet));
        let rpc = RecordingRpc::default();

        let sig = adapter.sign_and_submit(&prepared(), &rpc).await.unwrap();
        assert_eq!(sig, TxSignature::from("SEPARATE"));
        assert_eq!(rpc.broadcasts.lock().unwrap().as_slice(), &[vec![1, 2, 3]]);
    }

    #[tokio::test]
    async fn test_unsupported_provider() {
        let wallet = Arc::new(StubWallet::with(WalletCapabilities::default()));
        let adapter = WalletAdapter::new(Some(wallet));
        let rpc = RecordingRpc::default();

        let result = adapter.sign_and_submit(&prepared(), &rpc).await;
        assert_eq!(result, Err(PaymentError::UnsupportedProvider));
    }

    #[tokio::test]
    async fn test_declined_signature() {
        let mut stub = StubWallet::with(WalletCapabilities { sign_and_send: false, sign: true });
        stub.decline_sign = true;
        let adapter = WalletAdapter::new(Some(Arc::new(stub)));
        let rpc = RecordingRpc::default();

        let result = adapter.sign_and_submit(&prepared(), &rpc).await;
        assert_eq!(result, Err(PaymentError::SigningDeclined));
        assert!(rpc.broadcasts.lock().unwrap().is_empty());
    }
}
