//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! redirector. All types derive Serde traits for deserialization from
//! config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::service::{CompositionError, ServiceKind, ServiceNode};

/// Root configuration for the redirector.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RedirectConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Page served when no mount matches. Without it such requests get a
    /// pass-through 404.
    pub fallback: Option<FallbackConfig>,

    /// Service trees and the URL prefixes they answer under.
    pub mounts: Vec<MountConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for one request, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 10 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Static page for unmatched paths.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FallbackConfig {
    #[serde(default = "default_fallback_status")]
    pub status: u16,

    pub body: String,
}

fn default_fallback_status() -> u16 {
    200
}

/// A service tree mounted at a URL prefix.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MountConfig {
    /// Absolute prefix, e.g. "/romeo".
    pub path: String,

    #[serde(flatten)]
    pub service: ServiceConfig,
}

/// One node of a service tree.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub service: ServiceKind,

    /// Segment under the parent; the service default when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount: Option<String>,

    #[serde(default)]
    pub params: BTreeMap<String, String>,

    #[serde(default)]
    pub children: Vec<ServiceConfig>,
}

impl ServiceConfig {
    /// Compose the builder tree described by this entry.
    pub fn build_node(&self) -> Result<ServiceNode, CompositionError> {
        let mut node = ServiceNode::new(self.service);
        if let Some(segment) = &self.mount {
            node = node.mounted_at(segment.clone())?;
        }
        for (name, value) in &self.params {
            node = node.set(name, value.clone())?;
        }
        for child in &self.children {
            node = node.with(child.build_node()?);
        }
        Ok(node)
    }
}
