//! Launchpad fee payment library.
//!
//! Collects the token-launch fee in SOL: look up the receiver, connect a
//! wallet, build a single transfer, sign and submit it, wait for
//! confirmation, then hand off to the success view.

pub mod blockchain;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod payments;

pub use config::LaunchpadConfig;
pub use error::{PaymentError, PaymentResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use payments::{PaymentForm, SubmissionOrchestrator};
