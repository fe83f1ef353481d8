//! Receiver address lookup.
//!
//! The destination of every fee payment is configured on the server and read
//! through `GET /api/wallet`. The payment flow only sees the
//! [`ReceiverAddressProvider`] trait.

use async_trait::async_trait;
use std::time::Duration;

use crate::blockchain::types::Address;
use crate::error::{PaymentError, PaymentResult};
use crate::observability::metrics;
use crate::payments::types::ReceiverLookup;

/// Read-only source of the receiver wallet.
#[async_trait]
pub trait ReceiverAddressProvider: Send + Sync {
    /// Look up the receiver. Transport failures come back as `ok: false`.
    async fn lookup(&self) -> ReceiverLookup;
}

/// Turn a lookup into an address, refusing anything not positively configured.
pub fn resolve_receiver(lookup: ReceiverLookup) -> PaymentResult<Address> {
    match lookup {
        ReceiverLookup {
            ok: true,
            wallet: Some(wallet),
            ..
        } if !wallet.trim().is_empty() => Ok(Address::new(wallet.trim())),
        ReceiverLookup { error, .. } => Err(PaymentError::ReceiverNotConfigured(
            error.unwrap_or_else(|| "no receiver wallet returned".to_string()),
        )),
    }
}

/// Fixed receiver, or none.
#[derive(Debug, Clone, Default)]
pub struct StaticReceiver {
    wallet: Option<String>,
}

impl StaticReceiver {
    pub fn new(wallet: Option<String>) -> Self {
        Self {
            wallet: wallet.filter(|w| !w.trim().is_empty()),
        }
    }
}

#[async_trait]
impl ReceiverAddressProvider for StaticReceiver {
    async fn lookup(&self) -> ReceiverLookup {
        match &self.wallet {
            Some(wallet) => ReceiverLookup::found(wallet.clone()),
            None => ReceiverLookup::failed("Receiver wallet not configured"),
        }
    }
}

/// Reads the receiver from the site's `/api/wallet` endpoint.
#[derive(Debug, Clone)]
pub struct HttpReceiverLookup {
    client: reqwest::Client,
    url: String,
}

impl HttpReceiverLookup {
    pub fn new(url: impl Into<String>, timeout: Duration) -> PaymentResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PaymentError::ReceiverNotConfigured(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<ReceiverLookup, reqwest::Error> {
        // Error statuses still carry the JSON body.
        self.client.get(&self.url).send().await?.json().await
    }
}

#[async_trait]
impl ReceiverAddressProvider for HttpReceiverLookup {
    async fn lookup(&self) -> ReceiverLookup {
        let lookup = match self.fetch().await {
            Ok(lookup) => lookup,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "Receiver lookup failed");
                ReceiverLookup::failed(format!("Failed to fetch receiver wallet: {}", e))
            }
        };
        metrics::record_receiver_lookup(lookup.ok);
        lookup
    }
}
