//! Configuration management for gows
//!
//! Configuration is resolved with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (GOWS_*, SHELL)
//! 3. Default values
//!
//! gows keeps no config file of its own.

use std::path::PathBuf;

use crate::{Error, Result};

/// Directory under `$HOME` used when no workspace root is configured
pub const DEFAULT_WORKSPACE_DIR: &str = "workspace";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base directory holding every `gopath-*` project
    pub workspace_root: PathBuf,

    /// Skip the GitHub-aware client and always use `git clone`
    pub plain_clone: bool,

    /// GitHub-aware clone client (invoked as `<client> repo clone`)
    pub github_client: String,

    /// Path to the git executable
    pub git: String,

    /// Path to the go executable
    pub go: String,

    /// Shell used for commands and interactive sessions
    pub shell: String,
}

impl Config {
    /// Build a config rooted at `workspace_root` with default tools
    pub fn with_root(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            plain_clone: false,
            github_client: "gh".to_string(),
            git: "git".to_string(),
            go: "go".to_string(),
            shell: "/bin/sh".to_string(),
        }
    }

    /// Default configuration: `~/workspace` and tools from `PATH`
    pub fn default_config() -> Result<Self> {
        Ok(Self::with_root(Self::default_workspace_root()?))
    }

    /// Get the default workspace root
    ///
    /// Returns `~/workspace`
    pub fn default_workspace_root() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            Error::Config("Could not determine home directory; set GOWS_ROOT".to_string())
        })?;

        Ok(home.join(DEFAULT_WORKSPACE_DIR))
    }

    /// Apply environment variable overrides from the process environment
    ///
    /// Supported variables:
    /// - GOWS_ROOT: workspace root
    /// - GOWS_PLAIN_CLONE: force `git clone` instead of the GitHub client
    /// - GOWS_GITHUB_CLIENT: GitHub-aware clone client
    /// - GOWS_GIT: git executable
    /// - GOWS_GO: go executable
    /// - SHELL: shell for commands and interactive sessions
    pub fn with_env_overrides(self) -> Self {
        self.with_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(root) = lookup("GOWS_ROOT") {
            self.workspace_root = PathBuf::from(root);
        }

        if let Some(plain) = lookup("GOWS_PLAIN_CLONE") {
            self.plain_clone = is_truthy(&plain);
        }

        if let Some(client) = lookup("GOWS_GITHUB_CLIENT") {
            self.github_client = client;
        }

        if let Some(git) = lookup("GOWS_GIT") {
            self.git = git;
        }

        if let Some(go) = lookup("GOWS_GO") {
            self.go = go;
        }

        if let Some(shell) = lookup("SHELL") {
            self.shell = shell;
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, workspace_root: Option<PathBuf>) -> Self {
        if let Some(root) = workspace_root {
            self.workspace_root = root;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > defaults. The home directory is only consulted
    /// when neither the CLI nor the environment supplies a workspace root.
    pub fn load_with_overrides(workspace_root: Option<PathBuf>) -> Result<Self> {
        let root_given = workspace_root.is_some()
            || std::env::var("GOWS_ROOT").is_ok_and(|v| !v.trim().is_empty());

        let base = if root_given {
            Self::with_root(PathBuf::new())
        } else {
            Self::default_config()?
        };

        Ok(base.with_env_overrides().with_cli_overrides(workspace_root))
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
