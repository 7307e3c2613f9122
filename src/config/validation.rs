//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Mount paths are absolute and unique
//! - Node segments are single path components
//! - Parameters exist on the service they are given to
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RedirectConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::StatusCode;
use thiserror::Error;

use crate::config::schema::{RedirectConfig, ServiceConfig};
use crate::routing::directory::is_valid_mount_path;
use crate::service::{CompositionError, MountSegment, ServiceKind};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address {0:?}")]
    BindAddress(String),

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("fallback status {0} is not a valid HTTP status")]
    FallbackStatus(u16),

    #[error("mount path {0:?} must start with '/' and contain no empty segments")]
    MountPath(String),

    #[error("mount path {0:?} is configured more than once")]
    DuplicateMountPath(String),

    #[error("{at}: {source}")]
    Segment {
        at: String,
        source: CompositionError,
    },

    #[error("{at}: {service} has no parameter named {name:?}")]
    UnknownParameter {
        at: String,
        service: ServiceKind,
        name: String,
    },
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RedirectConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if let Some(fallback) = &config.fallback {
        if StatusCode::from_u16(fallback.status).is_err() {
            errors.push(ValidationError::FallbackStatus(fallback.status));
        }
    }

    let mut seen = HashSet::new();
    for mount in &config.mounts {
        if !is_valid_mount_path(&mount.path) {
            errors.push(ValidationError::MountPath(mount.path.clone()));
        } else if !seen.insert(mount.path.as_str()) {
            errors.push(ValidationError::DuplicateMountPath(mount.path.clone()));
        }
        validate_service(&mount.service, mount.path.clone(), &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_service(service: &ServiceConfig, at: String, errors: &mut Vec<ValidationError>) {
    if let Some(segment) = &service.mount {
        if let Err(source) = MountSegment::new(segment.as_str()) {
            errors.push(ValidationError::Segment {
                at: at.clone(),
                source,
            });
        }
    }

    for name in service.params.keys() {
        if !service.service.has_slot(name) {
            errors.push(ValidationError::UnknownParameter {
                at: at.clone(),
                service: service.service,
                name: name.clone(),
            });
        }
    }

    for child in &service.children {
        let segment = child
            .mount
            .as_deref()
            .unwrap_or_else(|| child.service.default_mount_segment());
        validate_service(child, format!("{at} > {segment}"), errors);
    }
}
