//! Repository reference classification
//!
//! A reference is one of four shapes, tried in order:
//! - `owner/name`
//! - `git@github.com:owner/name.git`
//! - `https://github.com/owner/name[.git]`
//! - a dotted package path such as `golang.org/x/tools`
//!
//! Each may carry an `@branch` qualifier selecting a worktree.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::{Error, Result};

/// Host every GitHub-style reference resolves to
pub const GITHUB_HOST: &str = "github.com";

static SHORTHAND_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<owner>[A-Za-z0-9-]+)/(?P<name>[A-Za-z0-9_-]+)(?:@(?P<branch>[^@\s]+))?$")
        .expect("Valid regex pattern")
});

static SSH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^git@github\.com:(?P<owner>[A-Za-z0-9-]+)/(?P<name>[A-Za-z0-9_.-]+?)\.git",
        r"(?:@(?P<branch>[^@\s]+))?$",
    ))
    .expect("Valid regex pattern")
});

static HTTPS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<url>https?://github\.com/",
        r"(?P<owner>[A-Za-z0-9-]+)/(?P<name>[A-Za-z0-9_.-]+?)(?:\.git)?)",
        r"(?:@(?P<branch>[^@\s]+))?$",
    ))
    .expect("Valid regex pattern")
});

/// At least one dotted segment followed by one or more `/segment`s
static PACKAGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<path>[^/@\s]*\.[^/@\s]*(?:/[^/@\s]+)+)(?:@(?P<branch>[^@\s]+))?$")
        .expect("Valid regex pattern")
});

/// The shape a reference was written in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoKind {
    /// `owner/name`
    Shorthand { owner: String, name: String },
    /// `git@github.com:owner/name.git`
    Ssh { owner: String, name: String },
    /// `http(s)://github.com/owner/name[.git]`, keeping the URL as written
    Https {
        owner: String,
        name: String,
        url: String,
    },
    /// Dotted package import path fetched with `go get`
    Package { path: String },
}

/// A classified repository reference with its optional branch qualifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// What was referenced
    pub kind: RepoKind,
    /// Branch from an `@branch` suffix
    pub branch: Option<String>,
}

impl RepoRef {
    /// Classify a reference string
    ///
    /// Patterns are tried in a fixed order and the first match wins. A
    /// match is still rejected if a component starts with `-` or a path
    /// segment is `.` or `..`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        Self::classify(input)
            .filter(Self::is_well_formed)
            .ok_or_else(|| Error::InvalidReference(input.to_string()))
    }

    fn classify(input: &str) -> Option<Self> {
        let branch_of =
            |caps: &regex::Captures<'_>| caps.name("branch").map(|m| m.as_str().to_string());

        if let Some(caps) = SHORTHAND_REGEX.captures(input) {
            return Some(Self {
                kind: RepoKind::Shorthand {
                    owner: caps["owner"].to_string(),
                    name: caps["name"].to_string(),
                },
                branch: branch_of(&caps),
            });
        }

        if let Some(caps) = SSH_REGEX.captures(input) {
            return Some(Self {
                kind: RepoKind::Ssh {
                    owner: caps["owner"].to_string(),
                    name: caps["name"].to_string(),
                },
                branch: branch_of(&caps),
            });
        }

        if let Some(caps) = HTTPS_REGEX.captures(input) {
            return Some(Self {
                kind: RepoKind::Https {
                    owner: caps["owner"].to_string(),
                    name: caps["name"].to_string(),
                    url: caps["url"].to_string(),
                },
                branch: branch_of(&caps),
            });
        }

        PACKAGE_REGEX.captures(input).map(|caps| Self {
            kind: RepoKind::Package {
                path: caps["path"].to_string(),
            },
            branch: branch_of(&caps),
        })
    }

    /// Components end up as subprocess arguments and path segments
    fn is_well_formed(&self) -> bool {
        let dot_segment = |s: &str| s == "." || s == "..";

        let components_ok = match &self.kind {
            RepoKind::Shorthand { owner, name }
            | RepoKind::Ssh { owner, name }
            | RepoKind::Https { owner, name, .. } => {
                !owner.starts_with('-') && !dot_segment(name)
            }
            RepoKind::Package { path } => {
                !path.starts_with('-') && !path.split('/').any(dot_segment)
            }
        };

        components_ok && !self.branch().is_some_and(|b| b.starts_with('-'))
    }

    /// Branch qualifier, if any
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// `(owner, name)` for GitHub-style references
    pub fn github(&self) -> Option<(&str, &str)> {
        match &self.kind {
            RepoKind::Shorthand { owner, name }
            | RepoKind::Ssh { owner, name }
            | RepoKind::Https { owner, name, .. } => Some((owner, name)),
            RepoKind::Package { .. } => None,
        }
    }

    /// Name used for the `gopath-<name>` project directory
    ///
    /// Package paths are flattened: `golang.org/x/tools` becomes
    /// `golang-org-x-tools`.
    pub fn repo_name(&self) -> String {
        match &self.kind {
            RepoKind::Shorthand { name, .. }
            | RepoKind::Ssh { name, .. }
            | RepoKind::Https { name, .. } => name.clone(),
            RepoKind::Package { path } => path.replace(['/', '.'], "-"),
        }
    }

    /// The reference as written, minus the branch qualifier
    pub fn unqualified(&self) -> String {
        match &self.kind {
            RepoKind::Shorthand { owner, name } => format!("{}/{}", owner, name),
            RepoKind::Ssh { owner, name } => format!("git@{}:{}/{}.git", GITHUB_HOST, owner, name),
            RepoKind::Https { url, .. } => url.clone(),
            RepoKind::Package { path } => path.clone(),
        }
    }

    /// HTTPS URL for a plain `git clone`
    ///
    /// Shorthand and SSH references are normalized to
    /// `https://github.com/owner/name.git`; HTTPS references keep their URL
    /// with `.git` appended if missing. `None` for package paths.
    pub fn clone_url(&self) -> Option<Url> {
        let raw = match &self.kind {
            RepoKind::Shorthand { owner, name } | RepoKind::Ssh { owner, name } => {
                format!("https://{}/{}/{}.git", GITHUB_HOST, owner, name)
            }
            RepoKind::Https { url, .. } if url.ends_with(".git") => url.clone(),
            RepoKind::Https { url, .. } => format!("{}.git", url),
            RepoKind::Package { .. } => return None,
        };

        Url::parse(&raw).ok()
    }
}

impl FromStr for RepoRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.unqualified())?;
        if let Some(branch) = &self.branch {
            write!(f, "@{}", branch)?;
        }
        Ok(())
    }
}
