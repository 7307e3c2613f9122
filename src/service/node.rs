//! Service node builder.
//!
//! A `ServiceNode` is the mutable, owned form of one redirect target used
//! while a tree is being composed. Children are moved into their parent by
//! [`ServiceNode::with`], so a node can only ever have one parent and the
//! parent link is implied by ownership. Once composition is finished the
//! root is frozen into a [`crate::routing::ServiceTree`].

use std::collections::BTreeMap;

use crate::service::error::CompositionError;
use crate::service::kind::ServiceKind;

/// A single, non-empty path component without `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountSegment(String);

impl MountSegment {
    pub fn new(segment: impl Into<String>) -> Result<Self, CompositionError> {
        let segment = segment.into();
        if segment.is_empty() {
            return Err(CompositionError::EmptySegment);
        }
        if segment.contains('/') {
            return Err(CompositionError::SegmentContainsSlash(segment));
        }
        Ok(Self(segment))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MountSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One named parameter of a node and its value, if known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSlot {
    pub name: &'static str,
    pub value: Option<String>,
}

/// A redirect target under construction.
#[derive(Debug, Clone)]
pub struct ServiceNode {
    kind: ServiceKind,
    mount: Option<MountSegment>,
    params: Vec<ParamSlot>,
    children: BTreeMap<String, ServiceNode>,
}

impl ServiceNode {
    /// A node with every parameter unset.
    pub fn new(kind: ServiceKind) -> Self {
        let params = kind
            .slots()
            .iter()
            .map(|&name| ParamSlot { name, value: None })
            .collect();

        Self {
            kind,
            mount: None,
            params,
            children: BTreeMap::new(),
        }
    }

    /// A node with its leading parameters set positionally, in the order
    /// declared by [`ServiceKind::slots`].
    pub fn with_params<I, S>(kind: ServiceKind, values: I) -> Result<Self, CompositionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut node = Self::new(kind);
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.len() > node.params.len() {
            return Err(CompositionError::TooManyParameters {
                service: kind,
                max: node.params.len(),
                given: values.len(),
            });
        }
        for (slot, value) in node.params.iter_mut().zip(values) {
            slot.value = Some(value);
        }
        Ok(node)
    }

    /// A fresh node mounted under an explicit segment instead of the
    /// variant's default.
    pub fn on(kind: ServiceKind, segment: impl Into<String>) -> Result<Self, CompositionError> {
        Self::new(kind).mounted_at(segment)
    }

    /// Replace the mount segment of this node.
    pub fn mounted_at(mut self, segment: impl Into<String>) -> Result<Self, CompositionError> {
        self.mount = Some(MountSegment::new(segment)?);
        Ok(self)
    }

    /// Set a parameter by name.
    pub fn set(mut self, name: &str, value: impl Into<String>) -> Result<Self, CompositionError> {
        let kind = self.kind;
        let slot = self
            .params
            .iter_mut()
            .find(|slot| slot.name == name)
            .ok_or_else(|| CompositionError::UnknownParameter {
                service: kind,
                name: name.to_string(),
            })?;
        slot.value = Some(value.into());
        Ok(self)
    }

    /// Mount `child` under its mount segment. A child already mounted at the
    /// same segment is replaced.
    pub fn with(mut self, child: impl Into<ServiceNode>) -> Self {
        let child = child.into();
        let segment = child.mount_segment().to_string();
        if self.children.insert(segment.clone(), child).is_some() {
            tracing::debug!(service = %self.kind, segment = %segment, "Replacing child service");
        }
        self
    }

    /// Mount several children, in order.
    pub fn with_all<I, N>(self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<ServiceNode>,
    {
        children.into_iter().fold(self, |node, child| node.with(child))
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    /// The explicit segment if one was given, else the variant default.
    pub fn mount_segment(&self) -> &str {
        self.mount
            .as_ref()
            .map(MountSegment::as_str)
            .unwrap_or_else(|| self.kind.default_mount_segment())
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|slot| slot.name == name)
            .and_then(|slot| slot.value.as_deref())
    }

    pub fn params(&self) -> &[ParamSlot] {
        &self.params
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &ServiceNode)> {
        self.children.iter().map(|(segment, node)| (segment.as_str(), node))
    }

    pub(crate) fn into_parts(self) -> (ServiceKind, String, Vec<ParamSlot>, BTreeMap<String, ServiceNode>) {
        let mount = self.mount_segment().to_string();
        (self.kind, mount, self.params, self.children)
    }
}

impl From<ServiceKind> for ServiceNode {
    fn from(kind: ServiceKind) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_params() {
        let node = ServiceNode::with_params(ServiceKind::GitHub, ["will", "othello"]).unwrap();
        assert_eq!(node.param("user_name"), Some("will"));
        assert_eq!(node.param("project"), Some("othello"));

        let partial = ServiceNode::with_params(ServiceKind::Maven, ["org.example"]).unwrap();
        assert_eq!(partial.param("group_id"), Some("org.example"));
        assert_eq!(partial.param("project"), None);
    }

    #[test]
    fn test_too_many_params() {
        let err = ServiceNode::with_params(ServiceKind::RubyDoc, ["a", "b"]).unwrap_err();
        assert_eq!(
            err,
            CompositionError::TooManyParameters {
                service: ServiceKind::RubyDoc,
                max: 1,
                given: 2
            }
        );
    }

    #[test]
    fn test_set_unknown_param() {
        let err = ServiceNode::new(ServiceKind::RubyDoc).set("user_name", "will").unwrap_err();
        assert!(matches!(err, CompositionError::UnknownParameter { .. }));
    }

    #[test]
    fn test_mount_segment_default_and_explicit() {
        assert_eq!(ServiceNode::new(ServiceKind::RubyDoc).mount_segment(), "docs");
        let node = ServiceNode::on(ServiceKind::RubyDoc, "documentation").unwrap();
        assert_eq!(node.mount_segment(), "documentation");
    }

    #[test]
    fn test_invalid_segments_fail_fast() {
        assert_eq!(
            ServiceNode::on(ServiceKind::GitHub, "").unwrap_err(),
            CompositionError::EmptySegment
        );
        assert_eq!(
            ServiceNode::on(ServiceKind::GitHub, "a/b").unwrap_err(),
            CompositionError::SegmentContainsSlash("a/b".into())
        );
    }

    #[test]
    fn test_with_keys_children_by_segment() {
        let node = ServiceNode::with_params(ServiceKind::GitHub, ["will"])
            .unwrap()
            .with_all([ServiceKind::GitHubIssues, ServiceKind::GitHubPages])
            .with(ServiceNode::on(ServiceKind::RubyDoc, "documentation").unwrap());

        let segments: Vec<&str> = node.children().map(|(s, _)| s).collect();
        assert_eq!(segments, vec!["docs", "documentation", "issues"]);
    }

    #[test]
    fn test_remount_last_writer_wins() {
        let node = ServiceNode::new(ServiceKind::GitHub)
            .with(ServiceKind::GitHubPages)
            .with(ServiceKind::RubyDoc);

        let (_, child) = node.children().next().unwrap();
        assert_eq!(node.children().count(), 1);
        assert_eq!(child.kind(), ServiceKind::RubyDoc);
    }
}
