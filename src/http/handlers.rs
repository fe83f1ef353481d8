//! Route handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde_json::json;

use crate::payments::types::ReceiverLookup;

/// Application state injected into handlers.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Configured receiver wallet; `None` when unset.
    pub receiver_wallet: Option<String>,
}

impl AppState {
    pub fn new(receiver_wallet: Option<String>) -> Self {
        Self {
            receiver_wallet: receiver_wallet.filter(|w| !w.trim().is_empty()),
        }
    }
}

/// `GET /api/wallet`
pub async fn receiver_wallet(State(state): State<AppState>) -> (StatusCode, Json<ReceiverLookup>) {
    match state.receiver_wallet {
        Some(wallet) => (StatusCode::OK, Json(ReceiverLookup::found(wallet))),
        None => {
            tracing::error!("Receiver wallet requested but not configured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ReceiverLookup::failed("Receiver wallet not configured")),
            )
        }
    }
}

/// Any method other than GET on `/api/wallet`.
pub async fn method_not_allowed() -> (StatusCode, Json<ReceiverLookup>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ReceiverLookup::failed("Method not allowed")),
    )
}

const SUCCESS_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Payment Successful</title>
</head>
<body>
  <main>
    <h1>Payment Successful!</h1>
    <p>Your token has been created. You can now continue to the dashboard.</p>
  </main>
</body>
</html>
"#;

/// Confirmation view shown after a confirmed payment.
pub async fn success_page() -> Html<&'static str> {
    Html(SUCCESS_PAGE)
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
