//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, method + consumed prefix + remaining path)
//!     → routing::Directory (resolve)
//!     → response.rs (307 / 404 pass-through / 500 / fallback)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, RedirectRequest, X_REQUEST_ID};
pub use response::X_CASCADE;
pub use server::HttpServer;
