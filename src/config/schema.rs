//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::blockchain::types::Network;

/// Root configuration for the launchpad service and CLI.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LaunchpadConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where fee payments are sent.
    pub receiver: ReceiverConfig,

    /// RPC endpoints per network.
    pub networks: NetworksConfig,

    /// Payment flow settings.
    pub payment: PaymentConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Receiver wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ReceiverConfig {
    /// Base58 address that receives fees. Empty means not configured.
    pub wallet: String,
}

impl ReceiverConfig {
    /// The configured wallet, if any.
    pub fn wallet(&self) -> Option<&str> {
        let wallet = self.wallet.trim();
        (!wallet.is_empty()).then_some(wallet)
    }
}

/// RPC endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworksConfig {
    pub devnet_rpc_url: String,

    pub mainnet_rpc_url: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for NetworksConfig {
    fn default() -> Self {
        Self {
            devnet_rpc_url: Network::TestNetwork.default_rpc_url().to_string(),
            mainnet_rpc_url: Network::MainNetwork.default_rpc_url().to_string(),
            rpc_timeout_secs: 30,
        }
    }
}

/// Payment flow configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaymentConfig {
    /// Amount pre-filled in the form, in SOL.
    pub default_amount: String,

    pub default_network: Network,

    /// Give up waiting for confirmation after this many seconds. 0 waits forever.
    pub confirmation_timeout_secs: u64,

    /// Signature status polling interval in milliseconds.
    pub confirmation_poll_ms: u64,

    /// Clear the form after a confirmed payment.
    pub reset_form_on_success: bool,

    /// Path of the confirmation view.
    pub success_path: String,

    /// Receiver lookup endpoint used by the CLI.
    pub receiver_url: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            default_amount: "0.5".to_string(),
            default_network: Network::TestNetwork,
            confirmation_timeout_secs: 90,
            confirmation_poll_ms: 1000,
            reset_form_on_success: true,
            success_path: "/success".to_string(),
            receiver_url: "http://127.0.0.1:8080/api/wallet".to_string(),
        }
    }
}

/// Timeout configuration for the HTTP surface.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
