//! Frozen service trees and exact-segment dispatch.
//!
//! # Responsibilities
//! - Resolve inherited parameters once, ancestors before descendants
//! - Match a request path against mount segments, one segment at a time
//! - Apply path inference to a per-request snapshot and render the target
//!
//! # Design Decisions
//! - The tree is immutable after `build`; requests never write to it
//! - Matching is exact per segment: no prefixes, no wildcards
//! - A node only answers when nothing but an optional `/` remains
//! - Misses carry the unmatched remainder so callers can report it

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::service::{ParamSlot, ServiceKind, ServiceNode, Template, UnboundTemplateVariable};

/// Why a path did not produce a redirect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No node accepts the path. Safe for an enclosing router to try
    /// other routes.
    #[error("Not Found: {path}")]
    RouteNotFound { path: String },

    /// A node matched but its template could not be rendered.
    #[error(transparent)]
    Unbound(#[from] UnboundTemplateVariable),
}

/// A successfully resolved redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub location: String,
    pub service: ServiceKind,
    /// Full path of the node that answered, including the outer prefix.
    pub matched: String,
}

/// One row of a route listing.
#[derive(Debug, Clone, Serialize)]
pub struct RouteEntry {
    pub path: String,
    pub service: ServiceKind,
    pub template: &'static str,
    pub params: BTreeMap<&'static str, String>,
}

#[derive(Debug)]
struct ResolvedNode {
    kind: ServiceKind,
    mount: String,
    template: Template,
    params: Vec<ParamSlot>,
    children: BTreeMap<String, ResolvedNode>,
}

impl ResolvedNode {
    fn resolve(node: ServiceNode, parent: Option<&[ParamSlot]>) -> Self {
        let (kind, mount, mut params, children) = node.into_parts();

        if let Some(parent) = parent {
            for slot in params.iter_mut().filter(|slot| slot.value.is_none()) {
                slot.value = parent
                    .iter()
                    .find(|p| p.name == slot.name)
                    .and_then(|p| p.value.clone());
            }
        }

        let children = children
            .into_iter()
            .map(|(segment, child)| (segment, ResolvedNode::resolve(child, Some(params.as_slice()))))
            .collect();

        Self {
            kind,
            mount,
            template: Template::new(kind.template()),
            params,
            children,
        }
    }

    fn snapshot(&self) -> ParamSnapshot<'_> {
        ParamSnapshot {
            values: self
                .params
                .iter()
                .map(|slot| (slot.name, slot.value.as_deref()))
                .collect(),
        }
    }

    fn respond(&self, full_path: &str) -> Result<String, UnboundTemplateVariable> {
        let mut snapshot = self.snapshot();
        snapshot.infer_from_path(self.kind, &self.mount, full_path);
        self.template.render(self.kind, |name| snapshot.get(name))
    }

    fn collect_routes(&self, path: String, out: &mut Vec<RouteEntry>) {
        out.push(RouteEntry {
            path: path.clone(),
            service: self.kind,
            template: self.template.source(),
            params: self
                .params
                .iter()
                .filter_map(|slot| slot.value.clone().map(|v| (slot.name, v)))
                .collect(),
        });
        for (segment, child) in &self.children {
            child.collect_routes(join_path(&path, segment), out);
        }
    }
}

/// Parameter values for a single request.
///
/// Borrows from the frozen node and from the request path; never outlives
/// the request.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ParamSnapshot<'a> {
    values: Vec<(&'static str, Option<&'a str>)>,
}

impl<'a> ParamSnapshot<'a> {
    fn get(&self, name: &str) -> Option<&'a str> {
        self.values
            .iter()
            .find(|(slot, _)| *slot == name)
            .and_then(|(_, value)| *value)
    }

    /// Fill unset inferable slots from the last meaningful segment of
    /// `full_path`. When the last segment is the node's own mount segment
    /// the node was reached through its parent, so the segment before it
    /// names the project.
    ///
    /// A project that happens to share its name with the node's mount
    /// segment is mis-inferred; the rule is kept as is.
    fn infer_from_path(&mut self, kind: ServiceKind, mount: &str, full_path: &'a str) {
        let Some(segment) = inferred_segment(mount, full_path) else {
            return;
        };
        for (name, value) in self.values.iter_mut() {
            if value.is_none() && kind.is_inferable(name) {
                *value = Some(segment);
            }
        }
    }
}

fn inferred_segment<'a>(mount: &str, full_path: &'a str) -> Option<&'a str> {
    let path = full_path.strip_suffix('/').unwrap_or(full_path);
    if path.is_empty() {
        return None;
    }
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len() - 1;
    let index = if segments[last] == mount { last.checked_sub(1)? } else { last };
    Some(segments[index]).filter(|s| !s.is_empty())
}

fn is_terminal(path_info: &str) -> bool {
    path_info.strip_suffix('/').unwrap_or(path_info).is_empty()
}

fn split_first_segment(path_info: &str) -> (&str, &str) {
    let trimmed = path_info.strip_prefix('/').unwrap_or(path_info);
    match trimmed.find('/') {
        Some(i) => (&trimmed[..i], &trimmed[i..]),
        None => (trimmed, ""),
    }
}

pub(crate) fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.ends_with('/') {
        format!("{prefix}{segment}")
    } else {
        format!("{prefix}/{segment}")
    }
}

/// An immutable, fully composed service tree.
#[derive(Debug)]
pub struct ServiceTree {
    root: ResolvedNode,
}

impl ServiceTree {
    /// Freeze a composed node, resolving inherited parameters top-down.
    pub fn build(root: ServiceNode) -> Self {
        Self {
            root: ResolvedNode::resolve(root, None),
        }
    }

    pub fn root_service(&self) -> ServiceKind {
        self.root.kind
    }

    /// Route a request to the node it names and render its target.
    ///
    /// `script_name` is the part of the path already consumed by enclosing
    /// routers; `path_info` is what this tree still has to match.
    pub fn dispatch(&self, script_name: &str, path_info: &str) -> Result<Resolution, DispatchError> {
        let mut node = &self.root;
        let mut matched = script_name.to_string();
        let mut rest = path_info;

        while !is_terminal(rest) {
            let (segment, remainder) = split_first_segment(rest);
            match node.children.get(segment) {
                Some(child) => {
                    matched = join_path(&matched, segment);
                    node = child;
                    rest = remainder;
                }
                None => {
                    return Err(DispatchError::RouteNotFound {
                        path: rest.to_string(),
                    })
                }
            }
        }

        let location = node.respond(&matched)?;
        Ok(Resolution {
            location,
            service: node.kind,
            matched,
        })
    }

    /// Every reachable node, parents before children.
    pub fn routes(&self, prefix: &str) -> Vec<RouteEntry> {
        let mut out = Vec::new();
        self.root.collect_routes(prefix.to_string(), &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn github(values: &[&str]) -> ServiceNode {
        ServiceNode::with_params(ServiceKind::GitHub, values.iter().copied()).unwrap()
    }

    #[test]
    fn test_root_infers_from_own_path() {
        let tree = ServiceTree::build(github(&["will"]));
        let res = tree.dispatch("/othello", "").unwrap();
        assert_eq!(res.location, "https://github.com/will/othello");
        assert_eq!(res.service, ServiceKind::GitHub);
    }

    #[test]
    fn test_explicit_project_beats_inference() {
        let tree = ServiceTree::build(github(&["will", "othello"]));
        let res = tree.dispatch("/iago", "").unwrap();
        assert_eq!(res.location, "https://github.com/will/othello");
    }

    #[test]
    fn test_child_inherits_then_infers_from_parent_segment() {
        let tree = ServiceTree::build(github(&["will"]).with(ServiceKind::RubyDoc));
        let res = tree.dispatch("/romeo", "/docs").unwrap();
        assert_eq!(res.location, "http://rubydoc.info/gems/romeo");
        assert_eq!(res.matched, "/romeo/docs");
    }

    #[test]
    fn test_explicit_child_segment() {
        let child = ServiceNode::on(ServiceKind::RubyDoc, "documentation").unwrap();
        let tree = ServiceTree::build(github(&["will"]).with(child));
        let res = tree.dispatch("/romeo", "/documentation").unwrap();
        assert_eq!(res.location, "http://rubydoc.info/gems/romeo");
    }

    #[test]
    fn test_child_inherits_user_and_project() {
        let tree = ServiceTree::build(github(&["will", "romeo"]).with(ServiceKind::GitHubIssues));
        let res = tree.dispatch("/juliet", "/issues").unwrap();
        assert_eq!(res.location, "https://github.com/will/romeo/issues");
    }

    #[test]
    fn test_parent_inference_is_not_inherited() {
        let tree = ServiceTree::build(github(&["will"]).with(ServiceKind::GitHubPages));
        let res = tree.dispatch("/romeo", "/docs").unwrap();
        assert_eq!(res.location, "http://will.github.io/romeo");
    }

    #[test]
    fn test_grandchildren_are_reachable() {
        let pages = ServiceNode::new(ServiceKind::GitHubPages).with(ServiceKind::RubyDoc);
        let tree = ServiceTree::build(github(&["will", "romeo"]).with(pages));
        let res = tree.dispatch("", "/docs/docs").unwrap();
        assert_eq!(res.location, "http://rubydoc.info/gems/romeo");
    }

    #[test]
    fn test_trailing_slash_is_tolerated() {
        let tree = ServiceTree::build(ServiceNode::new(ServiceKind::RubyDoc));
        assert_eq!(
            tree.dispatch("/venice", "/").unwrap(),
            tree.dispatch("/venice", "").unwrap()
        );
        let child = ServiceTree::build(github(&["will"]).with(ServiceKind::RubyDoc));
        let res = child.dispatch("/romeo", "/docs/").unwrap();
        assert_eq!(res.location, "http://rubydoc.info/gems/romeo");
    }

    #[test]
    fn test_unknown_child_is_not_found() {
        let tree = ServiceTree::build(github(&["will", "romeo"]).with(ServiceKind::RubyDoc));
        let err = tree.dispatch("/juliet", "/others").unwrap_err();
        assert_eq!(err, DispatchError::RouteNotFound { path: "/others".into() });
        assert_eq!(err.to_string(), "Not Found: /others");
    }

    #[test]
    fn test_trailing_path_below_leaf_is_not_found() {
        let tree = ServiceTree::build(github(&["will"]).with(ServiceKind::RubyDoc));
        let err = tree.dispatch("/romeo", "/docs/extra").unwrap_err();
        assert_eq!(err, DispatchError::RouteNotFound { path: "/extra".into() });
    }

    #[test]
    fn test_unbound_variable_is_an_error() {
        let tree = ServiceTree::build(ServiceNode::new(ServiceKind::GitHub));
        let err = tree.dispatch("/othello", "").unwrap_err();
        assert_eq!(
            err,
            DispatchError::Unbound(UnboundTemplateVariable {
                placeholder: "user_name".into(),
                service: ServiceKind::GitHub,
            })
        );
    }

    #[test]
    fn test_nothing_to_infer_from_empty_path() {
        let tree = ServiceTree::build(ServiceNode::new(ServiceKind::RubyDoc));
        assert!(matches!(tree.dispatch("", "/"), Err(DispatchError::Unbound(_))));
    }

    #[test]
    fn test_inferred_segment_rules() {
        assert_eq!(inferred_segment("code", "/othello"), Some("othello"));
        assert_eq!(inferred_segment("docs", "/romeo/docs"), Some("romeo"));
        assert_eq!(inferred_segment("docs", "/romeo/docs/"), Some("romeo"));
        assert_eq!(inferred_segment("docs", "/docs"), None);
        assert_eq!(inferred_segment("docs", "docs"), None);
        assert_eq!(inferred_segment("docs", ""), None);
    }

    #[test]
    fn test_inference_is_idempotent() {
        let tree = ServiceTree::build(github(&["will"]).with(ServiceKind::RubyDoc));
        let node = &tree.root.children["docs"];
        let mut snapshot = node.snapshot();
        snapshot.infer_from_path(node.kind, &node.mount, "/romeo/docs");
        let once = snapshot.clone();
        snapshot.infer_from_path(node.kind, &node.mount, "/romeo/docs");
        assert_eq!(snapshot, once);
        assert_eq!(snapshot.get("project"), Some("romeo"));
    }

    #[test]
    fn test_shared_tree_is_not_mutated_by_requests() {
        let tree = ServiceTree::build(ServiceNode::new(ServiceKind::RubyDoc));
        assert_eq!(tree.dispatch("/venice", "").unwrap().location, "http://rubydoc.info/gems/venice");
        assert_eq!(tree.dispatch("/verona", "").unwrap().location, "http://rubydoc.info/gems/verona");
    }

    #[test]
    fn test_routes_listing() {
        let tree = ServiceTree::build(github(&["will"]).with(ServiceKind::GitHubIssues));
        let routes = tree.routes("/romeo");
        let paths: Vec<&str> = routes.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/romeo", "/romeo/issues"]);
        assert_eq!(routes[1].params.get("user_name").map(String::as_str), Some("will"));
    }
}
