//! Fee payment flow.
//!
//! # Responsibilities
//! - Hold the amount and network the user entered (`form`)
//! - Look up the server-configured receiver (`receiver`)
//! - Run one attempt at a time through connect, build, sign, submit and
//!   confirm (`orchestrator`)

pub mod form;
pub mod orchestrator;
pub mod receiver;
pub mod types;

pub use form::PaymentForm;
pub use orchestrator::{OrchestratorSettings, PaymentView, SubmissionOrchestrator};
pub use receiver::{HttpReceiverLookup, ReceiverAddressProvider, StaticReceiver};
pub use types::{PaymentRequest, PaymentState, ReceiverLookup, SubmissionOutcome, TriggerResult};
