//! Git operations for gows
//!
//! This module provides repository inspection, cloning/downloading into the
//! workspace layout, and branch worktree creation.

mod clone;
mod repo;
mod worktree;

pub use clone::{FetchOutcome, Fetcher};
pub use repo::{BranchLocation, GitRepo};
pub use worktree::{WorktreeManager, WorktreeOutcome};
