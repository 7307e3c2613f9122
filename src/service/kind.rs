//! The catalog of redirect targets.
//!
//! Every variant is pure data: a default mount segment, a URL template and
//! the ordered list of parameter slots the template draws from. Nothing
//! else differs between services.

use serde::{Deserialize, Serialize};

/// A third-party hosting service a node can redirect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    /// Repository page on github.com.
    #[serde(rename = "github")]
    GitHub,
    /// Issue tracker of a GitHub repository.
    #[serde(rename = "github-issues")]
    GitHubIssues,
    /// GitHub Pages site of a repository.
    #[serde(rename = "github-pages")]
    GitHubPages,
    /// Gem documentation on rubydoc.info.
    #[serde(rename = "rubydoc")]
    RubyDoc,
    /// rubydoc.info documentation generated from a GitHub repository.
    #[serde(rename = "rubydoc-github")]
    RubyDocGitHub,
    /// Artifact page on Maven Central.
    Maven,
}

const USER_PROJECT: &[&str] = &["user_name", "project"];
const PROJECT: &[&str] = &["project"];
const GROUP_PROJECT: &[&str] = &["group_id", "project"];

impl ServiceKind {
    pub const ALL: [ServiceKind; 6] = [
        ServiceKind::GitHub,
        ServiceKind::GitHubIssues,
        ServiceKind::GitHubPages,
        ServiceKind::RubyDoc,
        ServiceKind::RubyDocGitHub,
        ServiceKind::Maven,
    ];

    /// Segment a node is mounted under when no explicit one is given.
    pub fn default_mount_segment(self) -> &'static str {
        match self {
            ServiceKind::GitHub => "code",
            ServiceKind::GitHubIssues => "issues",
            ServiceKind::GitHubPages => "docs",
            ServiceKind::RubyDoc => "docs",
            ServiceKind::RubyDocGitHub => "docs",
            ServiceKind::Maven => "maven",
        }
    }

    /// URL template with `%{name}` placeholders.
    pub fn template(self) -> &'static str {
        match self {
            ServiceKind::GitHub => "https://github.com/%{user_name}/%{project}",
            ServiceKind::GitHubIssues => "https://github.com/%{user_name}/%{project}/issues",
            ServiceKind::GitHubPages => "http://%{user_name}.github.io/%{project}",
            ServiceKind::RubyDoc => "http://rubydoc.info/gems/%{project}",
            ServiceKind::RubyDocGitHub => "http://rubydoc.info/github/%{user_name}/%{project}",
            ServiceKind::Maven => "https://search.maven.org/artifact/%{group_id}/%{project}",
        }
    }

    /// Parameter slots in positional constructor order.
    pub fn slots(self) -> &'static [&'static str] {
        match self {
            ServiceKind::GitHub
            | ServiceKind::GitHubIssues
            | ServiceKind::GitHubPages
            | ServiceKind::RubyDocGitHub => USER_PROJECT,
            ServiceKind::RubyDoc => PROJECT,
            ServiceKind::Maven => GROUP_PROJECT,
        }
    }

    /// Slots that may be filled from the request path as a last resort.
    pub fn inferable_slots(self) -> &'static [&'static str] {
        PROJECT
    }

    pub fn has_slot(self, name: &str) -> bool {
        self.slots().contains(&name)
    }

    pub fn is_inferable(self, name: &str) -> bool {
        self.inferable_slots().contains(&name)
    }

    /// Name used in configuration files and log fields.
    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::GitHub => "github",
            ServiceKind::GitHubIssues => "github-issues",
            ServiceKind::GitHubPages => "github-pages",
            ServiceKind::RubyDoc => "rubydoc",
            ServiceKind::RubyDocGitHub => "rubydoc-github",
            ServiceKind::Maven => "maven",
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
