//! Error types for building and rendering service nodes.

use thiserror::Error;

use crate::service::kind::ServiceKind;

/// Structural misuse detected while composing a tree.
///
/// These are programmer errors: they are raised when the tree is built,
/// never deferred to request time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    /// A mount segment must contain at least one character.
    #[error("mount segment must not be empty")]
    EmptySegment,

    /// A mount segment is a single path component.
    #[error("mount segment {0:?} must not contain '/'")]
    SegmentContainsSlash(String),

    /// A tree prefix is an absolute path without empty segments.
    #[error("mount path {0:?} must start with '/' and contain no empty segments")]
    InvalidMountPath(String),

    /// More positional values than the variant declares slots for.
    #[error("{service} accepts at most {max} parameters, got {given}")]
    TooManyParameters {
        service: ServiceKind,
        max: usize,
        given: usize,
    },

    /// The named parameter is not one of the variant's slots.
    #[error("{service} has no parameter named {name:?}")]
    UnknownParameter { service: ServiceKind, name: String },
}

/// A template placeholder that could not be bound to a value.
///
/// Fatal for the request that triggered it; it means a service was
/// configured without any way to supply one of its template variables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unset template variable {placeholder} for {service}")]
pub struct UnboundTemplateVariable {
    pub placeholder: String,
    pub service: ServiceKind,
}
