//! Shared fakes for integration testing.

#![allow(dead_code)]

use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use launchpad::blockchain::client::{ChainRpc, RpcEndpoints};
use launchpad::blockchain::transaction::{ConfirmationPolicy, PreparedTransaction};
use launchpad::blockchain::types::{
    Address, BlockchainError, BlockchainResult, Commitment, Network, RecentBlockReference,
    SignatureStatus, SignedTransaction, TxSignature,
};
use launchpad::blockchain::wallet::{InjectedWallet, WalletAdapter, WalletCapabilities};
use launchpad::config::LaunchpadConfig;
use launchpad::error::{PaymentError, PaymentResult};
use launchpad::http::HttpServer;
use launchpad::lifecycle::Shutdown;
use launchpad::payments::{
    OrchestratorSettings, PaymentForm, PaymentState, PaymentView, StaticReceiver,
    SubmissionOrchestrator,
};

/// How the fake cluster answers signature status polls.
#[derive(Debug, Clone)]
pub enum StatusMode {
    Confirmed,
    Pending,
    FailedOnChain(String),
}

/// Call-counting chain RPC. Every blockhash it hands out is new.
pub struct FakeChain {
    network: Network,
    status: Mutex<StatusMode>,
    unreachable: AtomicBool,
    pub block_reference_calls: AtomicUsize,
    pub broadcast_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub broadcasts: Mutex<Vec<SignedTransaction>>,
}

impl FakeChain {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            status: Mutex::new(StatusMode::Confirmed),
            unreachable: AtomicBool::new(false),
            block_reference_calls: AtomicUsize::new(0),
            broadcast_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            broadcasts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_status(self, mode: StatusMode) -> Self {
        *self.status.lock().unwrap() = mode;
        self
    }

    pub fn unreachable(self) -> Self {
        self.unreachable.store(true, Ordering::SeqCst);
        self
    }

    pub fn total_calls(&self) -> usize {
        self.block_reference_calls.load(Ordering::SeqCst)
            + self.broadcast_calls.load(Ordering::SeqCst)
            + self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainRpc for FakeChain {
    fn network(&self) -> Network {
        self.network
    }

    async fn latest_block_reference(
        &self,
        _commitment: Commitment,
    ) -> BlockchainResult<RecentBlockReference> {
        let n = self.block_reference_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(BlockchainError::Unreachable("connection refused".into()));
        }
        Ok(RecentBlockReference {
            blockhash: format!("blockhash-{}-{}", self.network, n),
            last_valid_block_height: 1_000 + n as u64,
        })
    }

    async fn broadcast(&self, signed: &SignedTransaction) -> BlockchainResult<TxSignature> {
        self.broadcast_calls.fetch_add(1, Ordering::SeqCst);
        self.broadcasts.lock().unwrap().push(signed.clone());
        Ok(signed.signature.clone())
    }

    async fn signature_status(
        &self,
        _signature: &TxSignature,
    ) -> BlockchainResult<Option<SignatureStatus>> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(match &*self.status.lock().unwrap() {
            StatusMode::Confirmed => Some(SignatureStatus::Landed(Commitment::Confirmed)),
            StatusMode::Pending => None,
            StatusMode::FailedOnChain(reason) => Some(SignatureStatus::Failed(reason.clone())),
        })
    }
}

/// Scriptable wallet provider.
pub struct FakeWallet {
    address: Address,
    capabilities: WalletCapabilities,
    signature: TxSignature,
    reject_connect: bool,
    decline_signing: bool,
    connect_gate: Option<Arc<Notify>>,
    pub connect_calls: AtomicUsize,
    pub sign_calls: AtomicUsize,
    pub signed: Mutex<Vec<PreparedTransaction>>,
}

impl FakeWallet {
    fn with_capabilities(signature: &str, capabilities: WalletCapabilities) -> Self {
        Self {
            address: Address::new("Payer111"),
            capabilities,
            signature: TxSignature::new(signature),
            reject_connect: false,
            decline_signing: false,
            connect_gate: None,
            connect_calls: AtomicUsize::new(0),
            sign_calls: AtomicUsize::new(0),
            signed: Mutex::new(Vec::new()),
        }
    }

    /// Signs and sends in one call, returning `signature`.
    pub fn combined(signature: &str) -> Self {
        Self::with_capabilities(signature, WalletCapabilities { sign_and_send: true, sign: true })
    }

    /// Signs only; the caller broadcasts.
    pub fn separate(signature: &str) -> Self {
        Self::with_capabilities(signature, WalletCapabilities { sign_and_send: false, sign: true })
    }

    pub fn rejecting_connect(mut self) -> Self {
        self.reject_connect = true;
        self
    }

    pub fn declining_signature(mut self) -> Self {
        self.decline_signing = true;
        self
    }

    /// `connect` waits until `gate` is notified.
    pub fn blocking_connect(mut self, gate: Arc<Notify>) -> Self {
        self.connect_gate = Some(gate);
        self
    }

    pub fn connects(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn signs(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }

    fn record_sign(&self, tx: &PreparedTransaction) -> PaymentResult<()> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        if self.decline_signing {
            return Err(PaymentError::SigningDeclined);
        }
        self.signed.lock().unwrap().push(tx.clone());
        Ok(())
    }
}

#[async_trait]
impl InjectedWallet for FakeWallet {
    fn name(&self) -> &str {
        "fake"
    }

    async fn connect(&self) -> PaymentResult<()> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.connect_gate {
            gate.notified().await;
        }
        if self.reject_connect {
            Err(PaymentError::UserRejected)
        } else {
            Ok(())
        }
    }

    fn public_key(&self) -> Option<Address> {
        Some(self.address.clone())
    }

    fn capabilities(&self) -> WalletCapabilities {
        self.capabilities
    }

    async fn sign_and_send_transaction(&self, tx: &PreparedTransaction) -> PaymentResult<TxSignature> {
        self.record_sign(tx)?;
        Ok(self.signature.clone())
    }

    async fn sign_transaction(&self, tx: &PreparedTransaction) -> PaymentResult<SignedTransaction> {
        self.record_sign(tx)?;
        Ok(SignedTransaction {
            signature: self.signature.clone(),
            wire: format!("signed:{}", tx.recent_block.blockhash).into_bytes(),
        })
    }
}

/// Records everything the orchestrator shows the user.
#[derive(Default)]
pub struct RecordingView {
    pub alerts: Mutex<Vec<String>>,
    pub navigations: Mutex<Vec<TxSignature>>,
    pub states: Mutex<Vec<PaymentState>>,
}

impl RecordingView {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn navigations(&self) -> Vec<TxSignature> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn states(&self) -> Vec<PaymentState> {
        self.states.lock().unwrap().clone()
    }
}

impl PaymentView for RecordingView {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn navigate_to_success(&self, signature: &TxSignature) {
        self.navigations.lock().unwrap().push(signature.clone());
    }

    fn on_state(&self, state: &PaymentState) {
        self.states.lock().unwrap().push(state.clone());
    }
}

/// Fast polling, short timeout.
pub fn test_settings() -> OrchestratorSettings {
    OrchestratorSettings {
        confirmation: ConfirmationPolicy {
            commitment: Commitment::Confirmed,
            poll_interval: Duration::from_millis(10),
            timeout: Some(Duration::from_secs(2)),
        },
        reset_form_on_success: true,
    }
}

/// An orchestrator wired to fakes.
pub struct Harness {
    pub orchestrator: Arc<SubmissionOrchestrator>,
    pub devnet: Arc<FakeChain>,
    pub mainnet: Arc<FakeChain>,
    pub wallet: Option<Arc<FakeWallet>>,
    pub view: Arc<RecordingView>,
}

impl Harness {
    pub fn wallet(&self) -> &FakeWallet {
        self.wallet.as_deref().expect("harness built without a wallet")
    }
}

pub fn harness(wallet: FakeWallet, receiver: Option<&str>, form: PaymentForm) -> Harness {
    harness_with(
        Some(wallet),
        receiver,
        form,
        FakeChain::new(Network::TestNetwork),
        test_settings(),
    )
}

pub fn harness_with(
    wallet: Option<FakeWallet>,
    receiver: Option<&str>,
    form: PaymentForm,
    devnet: FakeChain,
    settings: OrchestratorSettings,
) -> Harness {
    let devnet = Arc::new(devnet);
    let mainnet = Arc::new(FakeChain::new(Network::MainNetwork));
    let wallet = wallet.map(Arc::new);
    let view = Arc::new(RecordingView::default());

    let provider = wallet.clone().map(|w| w as Arc<dyn InjectedWallet>);
    let orchestrator = SubmissionOrchestrator::new(
        Arc::new(StaticReceiver::new(receiver.map(str::to_string))),
        Arc::new(WalletAdapter::new(provider)),
        RpcEndpoints::new(devnet.clone(), mainnet.clone()),
        view.clone(),
        settings,
    )
    .with_form(form);

    Harness {
        orchestrator: Arc::new(orchestrator),
        devnet,
        mainnet,
        wallet,
        view,
    }
}

/// Start the HTTP server on an ephemeral port.
pub async fn start_server(
    config: LaunchpadConfig,
) -> (SocketAddr, Arc<Shutdown>, JoinHandle<Result<(), std::io::Error>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Arc::new(Shutdown::new());
    let server = HttpServer::new(&config);
    let handle = tokio::spawn(server.run(listener, shutdown.clone()));
    (addr, shutdown, handle)
}
