//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, root span, request ID, timeout)
//!     → request.rs (method check, JSON decode, postal code validation)
//!     → service handler (front/ or back/)
//!     → client.rs (outbound calls carrying traceparent)
//!     → Send to client
//! ```

pub mod client;
pub mod request;
pub mod server;

pub use client::TracedClient;
pub use request::read_postal_code;
pub use server::HttpServer;
