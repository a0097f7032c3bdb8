//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, gate pipeline, handlers)
//!     → request.rs (platform detection, client metadata)
//!     → response.rs (content negotiation, error bodies)
//!     → messages.rs (bilingual user-facing strings)
//! ```

pub mod messages;
pub mod request;
pub mod response;
pub mod server;

pub use request::{detect_platform, Platform, X_PLATFORM};
pub use server::{AppState, HttpServer};
