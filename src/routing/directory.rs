//! Outer composition: service trees mounted at URL prefixes.
//!
//! # Responsibilities
//! - Pick the tree whose prefix matches the request, longest prefix first
//! - Hand that tree the already-consumed prefix and the remainder
//! - Answer with the fallback page when no prefix matches
//!
//! # Design Decisions
//! - Prefixes match on segment boundaries ("/rome" never matches "/romeo")
//! - The chosen tree's answer is final, including its pass-through 404;
//!   the pass-through marker is left for routers in front of this one

use crate::config::schema::RedirectConfig;
use crate::routing::tree::{DispatchError, Resolution, RouteEntry, ServiceTree};
use crate::service::{CompositionError, ServiceNode, UnboundTemplateVariable};

/// Static response for paths outside every mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPage {
    pub status: u16,
    pub body: String,
}

/// Result of resolving one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Redirect(Resolution),
    /// Pass-through miss; `path` is the unmatched remainder.
    NotFound { path: String },
    Fallback(FallbackPage),
    /// Configuration defect surfaced by this request.
    Unbound(UnboundTemplateVariable),
}

#[derive(Debug)]
struct Mount {
    prefix: String,
    tree: ServiceTree,
}

/// Every service tree served by one process.
#[derive(Debug, Default)]
pub struct Directory {
    mounts: Vec<Mount>,
    fallback: Option<FallbackPage>,
}

pub(crate) fn is_valid_mount_path(path: &str) -> bool {
    path == "/" || (path.starts_with('/') && path[1..].split('/').all(|s| !s.is_empty()))
}

fn strip_mount<'a>(prefix: &str, path: &'a str) -> Option<&'a str> {
    if prefix == "/" {
        return Some(path);
    }
    match path.strip_prefix(prefix) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => Some(rest),
        _ => None,
    }
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the tree rooted at `root` under `prefix`. A tree already at
    /// the same prefix is replaced.
    pub fn mount(mut self, prefix: impl Into<String>, root: ServiceNode) -> Result<Self, CompositionError> {
        let prefix = prefix.into();
        if !is_valid_mount_path(&prefix) {
            return Err(CompositionError::InvalidMountPath(prefix));
        }

        self.mounts.retain(|m| m.prefix != prefix);
        self.mounts.push(Mount {
            prefix,
            tree: ServiceTree::build(root),
        });
        self.mounts.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Ok(self)
    }

    pub fn with_fallback(mut self, status: u16, body: impl Into<String>) -> Self {
        self.fallback = Some(FallbackPage {
            status,
            body: body.into(),
        });
        self
    }

    /// Build every configured tree.
    pub fn from_config(config: &RedirectConfig) -> Result<Self, CompositionError> {
        let mut directory = Self::new();
        for mount in &config.mounts {
            directory = directory.mount(mount.path.clone(), mount.service.build_node()?)?;
        }
        if let Some(fallback) = &config.fallback {
            directory = directory.with_fallback(fallback.status, fallback.body.clone());
        }
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// Resolve a request. `script_name` is whatever an enclosing router
    /// already consumed, usually empty.
    pub fn resolve(&self, script_name: &str, path_info: &str) -> Outcome {
        let matched = self
            .mounts
            .iter()
            .find_map(|m| strip_mount(&m.prefix, path_info).map(|rest| (m, rest)));

        let Some((mount, rest)) = matched else {
            return match &self.fallback {
                Some(page) => Outcome::Fallback(page.clone()),
                None => Outcome::NotFound {
                    path: path_info.to_string(),
                },
            };
        };

        let prefix = if mount.prefix == "/" { "" } else { mount.prefix.as_str() };
        let script = format!("{script_name}{prefix}");
        match mount.tree.dispatch(&script, rest) {
            Ok(resolution) => Outcome::Redirect(resolution),
            Err(DispatchError::RouteNotFound { path }) => Outcome::NotFound { path },
            Err(DispatchError::Unbound(e)) => Outcome::Unbound(e),
        }
    }

    /// All reachable routes, sorted by path.
    pub fn routes(&self) -> Vec<RouteEntry> {
        let mut routes: Vec<RouteEntry> = self
            .mounts
            .iter()
            .flat_map(|m| m.tree.routes(&m.prefix))
            .collect();
        routes.sort_by(|a, b| a.path.cmp(&b.path));
        routes
    }
}
