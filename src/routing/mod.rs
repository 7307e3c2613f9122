//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming path
//!     → directory.rs (longest matching mount prefix)
//!     → tree.rs (exact segment match down the service tree)
//!     → node template rendered with inherited + inferred parameters
//!     → Return: Redirect, NotFound (pass-through), Fallback or Unbound
//!
//! Tree compilation (at startup and on reload):
//!     ServiceNode builder tree
//!     → resolve inherited parameters top-down
//!     → Freeze as immutable ServiceTree
//! ```
//!
//! # Design Decisions
//! - Trees compiled once, immutable at runtime (shared without locks)
//! - No regex, no wildcards: every mount segment is a literal
//! - Deterministic: same tree and path always give the same answer
//! - Request-dependent values live in a per-request snapshot

pub mod directory;
pub mod tree;

pub use directory::{Directory, FallbackPage, Outcome};
pub use tree::{DispatchError, Resolution, RouteEntry, ServiceTree};
