//! HTTP service subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → request.rs (request ID, request metrics)
//!     → handlers.rs (receiver wallet, success view, health)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use handlers::AppState;
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
