//! Submission orchestrator.
//!
//! Drives one payment attempt end to end:
//!
//! ```text
//! Idle → Connecting → Building → AwaitingSignature → Submitting → Confirming → Confirmed
//!   └──────────────────────── any failure ───────────────────────────────────→ Failed
//! ```
//!
//! Form validation and the receiver lookup run before `Connecting`; a failure
//! there never reaches the wallet or the RPC endpoint. Only one attempt runs at
//! a time: a trigger that arrives while another attempt is in flight is
//! dropped, not queued. Nothing is retried automatically.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex};
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::client::RpcEndpoints;
use crate::blockchain::transaction::{wait_for_confirmation, ConfirmationPolicy, TransferBuilder};
use crate::blockchain::types::{Commitment, Network, TxSignature};
use crate::blockchain::wallet::WalletAdapter;
use crate::config::schema::PaymentConfig;
use crate::error::{PaymentError, PaymentResult};
use crate::observability::metrics;
use crate::payments::form::PaymentForm;
use crate::payments::receiver::{resolve_receiver, ReceiverAddressProvider};
use crate::payments::types::{PaymentRequest, PaymentState, SubmissionOutcome, TriggerResult};

/// User-facing side effects of an attempt.
pub trait PaymentView: Send + Sync {
    /// Interruptive acknowledgement shown on every terminal outcome.
    fn alert(&self, message: &str);

    /// One-way navigation to the confirmation view.
    fn navigate_to_success(&self, signature: &TxSignature);

    /// Called on every state transition.
    fn on_state(&self, _state: &PaymentState) {}
}

/// Tunables for the orchestrator.
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorSettings {
    pub confirmation: ConfirmationPolicy,
    /// Clear the form after a confirmed payment.
    pub reset_form_on_success: bool,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            confirmation: ConfirmationPolicy::default(),
            reset_form_on_success: true,
        }
    }
}

impl OrchestratorSettings {
    pub fn from_config(config: &PaymentConfig) -> Self {
        let timeout = match config.confirmation_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self {
            confirmation: ConfirmationPolicy {
                commitment: Commitment::Confirmed,
                poll_interval: Duration::from_millis(config.confirmation_poll_ms),
                timeout,
            },
            reset_form_on_success: config.reset_form_on_success,
        }
    }
}

/// Marks an attempt as in flight until dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs payment attempts against a wallet, a receiver lookup and the RPC endpoints.
pub struct SubmissionOrchestrator {
    receiver: Arc<dyn ReceiverAddressProvider>,
    wallet: Arc<WalletAdapter>,
    endpoints: RpcEndpoints,
    view: Arc<dyn PaymentView>,
    builder: TransferBuilder,
    settings: OrchestratorSettings,
    form: Mutex<PaymentForm>,
    in_flight: AtomicBool,
    state: watch::Sender<PaymentState>,
}

impl SubmissionOrchestrator {
    pub fn new(
        receiver: Arc<dyn ReceiverAddressProvider>,
        wallet: Arc<WalletAdapter>,
        endpoints: RpcEndpoints,
        view: Arc<dyn PaymentView>,
        settings: OrchestratorSettings,
    ) -> Self {
        let (state, _) = watch::channel(PaymentState::Idle);
        Self {
            receiver,
            wallet,
            endpoints,
            view,
            builder: TransferBuilder::new(),
            settings,
            form: Mutex::new(PaymentForm::default()),
            in_flight: AtomicBool::new(false),
            state,
        }
    }

    /// Start with a pre-filled form.
    pub fn with_form(mut self, form: PaymentForm) -> Self {
        self.form = Mutex::new(form);
        self
    }

    /// Follow state changes, e.g. to render the status text.
    pub fn subscribe(&self) -> watch::Receiver<PaymentState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PaymentState {
        self.state.borrow().clone()
    }

    /// Copy of the current form values.
    pub async fn form(&self) -> PaymentForm {
        self.form.lock().await.clone()
    }

    /// Edit the form in place.
    pub async fn edit_form<R>(&self, edit: impl FnOnce(&mut PaymentForm) -> R) -> R {
        let mut form = self.form.lock().await;
        edit(&mut form)
    }

    /// Handle one "pay" trigger.
    pub async fn submit(&self) -> TriggerResult {
        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            let state = self.state();
            tracing::debug!(
                state = %state,
                accepts = state.accepts_trigger(),
                "Payment in flight, trigger ignored"
            );
            metrics::record_trigger_ignored();
            return TriggerResult::Ignored;
        };

        let previous = self.state();
        if !previous.accepts_trigger() {
            // The guard is free but the state is mid-flight: an earlier submit was dropped.
            tracing::warn!(state = %previous, "Previous attempt abandoned before finishing");
        }

        let form = self.form().await;
        let network = form.network();
        let attempt_id = Uuid::new_v4();
        let span = tracing::info_span!("payment", %attempt_id, %network);
        let start = Instant::now();

        let result = self.run_attempt(&form).instrument(span.clone()).await;
        let outcome = self.finish(result).instrument(span).await;

        metrics::record_payment(outcome.label(), network.as_str(), start);
        TriggerResult::Completed(outcome)
    }

    async fn run_attempt(&self, form: &PaymentForm) -> PaymentResult<TxSignature> {
        let validated = form.validate()?;
        let destination = resolve_receiver(self.receiver.lookup().await)?;
        let request = PaymentRequest::new(validated.amount, destination, validated.network);
        let rpc = self.endpoints.for_network(request.network());

        tracing::info!(
            amount = request.amount_major_units(),
            destination = %request.destination(),
            "Payment started"
        );

        self.transition(PaymentState::Connecting);
        let from = self.wallet.connect().await?;

        self.transition(PaymentState::Building);
        let prepared = self.builder.build(&request, &from, rpc.as_ref()).await?;

        self.transition(PaymentState::AwaitingSignature);
        let signature = self.wallet.sign_and_submit(&prepared, rpc.as_ref()).await?;
        self.transition(PaymentState::Submitting);

        tracing::info!(signature = %signature, "Transaction submitted");
        self.transition(PaymentState::Confirming(signature.clone()));
        wait_for_confirmation(rpc.as_ref(), &signature, &self.settings.confirmation).await?;

        Ok(signature)
    }

    async fn finish(&self, result: PaymentResult<TxSignature>) -> SubmissionOutcome {
        match result {
            Ok(signature) => {
                tracing::info!(signature = %signature, "Payment confirmed");
                self.transition(PaymentState::Confirmed(signature.clone()));
                if self.settings.reset_form_on_success {
                    self.form.lock().await.reset();
                }
                self.view.alert(&format!("Payment successful! Tx: {}", signature));
                self.view.navigate_to_success(&signature);
                SubmissionOutcome::Confirmed(signature)
            }
            Err(err) => {
                log_failure(&err);
                self.transition(PaymentState::Failed(err.clone()));
                self.view.alert(&format!("Payment failed: {}", err));
                SubmissionOutcome::from_error(err)
            }
        }
    }

    fn transition(&self, next: PaymentState) {
        tracing::debug!(state = %next, "Payment state");
        self.view.on_state(&next);
        self.state.send_replace(next);
    }

    /// Network the form currently targets.
    pub async fn network(&self) -> Network {
        self.form.lock().await.network()
    }
}

fn log_failure(err: &PaymentError) {
    if err.is_rejection() {
        tracing::info!(kind = err.kind(), "Payment declined by user");
    } else {
        tracing::warn!(kind = err.kind(), error = %err, "Payment failed");
    }
}

impl std::fmt::Debug for SubmissionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionOrchestrator")
            .field("wallet", &self.wallet)
            .field("settings", &self.settings)
            .field("state", &*self.state.borrow())
            .field("in_flight", &self.in_flight.load(Ordering::Relaxed))
            .finish()
    }
}
