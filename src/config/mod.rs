//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → LaunchpadConfig (validated, immutable)
//!     → shared via Arc to the HTTP server and the payment flow
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    LaunchpadConfig, ListenerConfig, NetworksConfig, ObservabilityConfig, PaymentConfig,
    ReceiverConfig, TimeoutConfig,
};
