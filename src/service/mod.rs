//! Service nodes: the redirect targets a tree is composed of.
//!
//! # Data Flow
//! ```text
//! ServiceKind (catalog constants)
//!     → node.rs (builder: params, mount segment, children)
//!     → routing::ServiceTree::build (inheritance, freeze)
//!     → template.rs (render per request)
//! ```
//!
//! # Design Decisions
//! - Services are a closed enum of data, not a class hierarchy
//! - Parameter slots are declared per variant, never discovered
//! - Misuse (bad segment, unknown parameter) fails while composing

pub mod error;
pub mod kind;
pub mod node;
pub mod template;

pub use error::{CompositionError, UnboundTemplateVariable};
pub use kind::ServiceKind;
pub use node::{MountSegment, ParamSlot, ServiceNode};
pub use template::Template;
