//! Gows Core - Core library for gows workspace setup
//!
//! This crate classifies repository references, lays out GOPATH-style
//! project directories, fetches repositories and branch worktrees into them,
//! and prepares the environment a shell or command runs in.

pub mod config;
pub mod error;
pub mod git;
pub mod launch;
pub mod paths;
pub mod process;
pub mod reference;
pub mod workspace;

pub use config::Config;
pub use error::{Error, Result};
pub use git::{FetchOutcome, Fetcher, GitRepo, WorktreeManager, WorktreeOutcome};
pub use launch::{LaunchEnv, Launcher};
pub use paths::WorkspacePaths;
pub use process::{ExitOutcome, Invocation, ProcessRunner, StdoutMode, SystemRunner};
pub use reference::{RepoKind, RepoRef};
pub use workspace::{Prepared, Workspace};
