//! Short redirect paths resolved through composable service trees.
//!
//! A tree of service nodes (GitHub, rubydoc.info, Maven Central, ...) is
//! mounted under URL prefixes. A request like `/romeo/docs` walks the tree
//! one exact segment at a time; the node it lands on fills its template
//! from its own parameters, those inherited from its ancestors and, as a
//! last resort, the request path, then answers with a 307 redirect.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod service;

pub use config::RedirectConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Directory, Outcome, ServiceTree};
pub use service::{ServiceKind, ServiceNode};
