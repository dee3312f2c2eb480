//! Git repository inspection

use std::path::Path;

use git2::{BranchType, Repository};

use crate::{Error, Result};

/// Where a branch name can be found in a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchLocation {
    /// `refs/heads/<branch>`
    Local,
    /// Only as a remote-tracking branch, e.g. `origin/<branch>`
    Remote(String),
    /// Not known locally; git will have to resolve it
    Unknown,
}

/// A git working tree opened for inspection
pub struct GitRepo {
    /// The underlying git2 repository
    repo: Repository,
}

impl std::fmt::Debug for GitRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepo")
            .field("path", &self.repo.path())
            .finish_non_exhaustive()
    }
}

impl GitRepo {
    /// Open the git repository rooted exactly at `path`
    ///
    /// Unlike discovery this does not walk up to parent directories, so a
    /// clone path nested in some other checkout is not mistaken for it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let repo = Repository::open(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                Error::Config(format!("Not a git repository: {}", path.display()))
            } else {
                Error::Config(format!("Git error at {}: {}", path.display(), e))
            }
        })?;

        if repo.is_bare() {
            return Err(Error::Config(format!(
                "Bare repositories are not supported: {}",
                path.display()
            )));
        }

        Ok(Self { repo })
    }

    /// Get the current branch name, `None` when detached or unborn
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(Error::Config(format!("Failed to get HEAD: {}", e))),
        };

        if head.is_branch() {
            Ok(head.shorthand().map(|s| s.to_string()))
        } else {
            Ok(None)
        }
    }

    /// Locate `branch` among local and remote-tracking branches
    ///
    /// Remote lookup checks `origin` first, then any other remote.
    pub fn locate_branch(&self, branch: &str) -> BranchLocation {
        if self.repo.find_branch(branch, BranchType::Local).is_ok() {
            return BranchLocation::Local;
        }

        let origin = format!("origin/{}", branch);
        if self.repo.find_branch(&origin, BranchType::Remote).is_ok() {
            return BranchLocation::Remote(origin);
        }

        if let Ok(remotes) = self.repo.remotes() {
            for remote in remotes.iter().flatten().filter(|r| *r != "origin") {
                let candidate = format!("{}/{}", remote, branch);
                if self.repo.find_branch(&candidate, BranchType::Remote).is_ok() {
                    return BranchLocation::Remote(candidate);
                }
            }
        }

        BranchLocation::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_with_commit(dir: &Path) -> Repository {
        let repo = Repository::init(dir).unwrap();
        {
            let sig = git2::Signature::now("gows", "gows@example.com").unwrap();
            let tree_id = repo.index().unwrap().write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[]).unwrap();
        }
        repo
    }

    #[test]
    fn test_open_non_git_dir() {
        let tmp = TempDir::new().unwrap();
        let err = GitRepo::open(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("Not a git repository"));
    }

    #[test]
    fn test_open_does_not_walk_up() {
        let tmp = TempDir::new().unwrap();
        init_with_commit(tmp.path());
        let nested = tmp.path().join("src/github.com/acme/widget");
        std::fs::create_dir_all(&nested).unwrap();

        assert!(GitRepo::open(tmp.path()).is_ok());
        let err = GitRepo::open(&nested).unwrap_err();
        assert!(err.to_string().contains("Not a git repository"));
    }

    #[test]
    fn test_open_bare_repository_rejected() {
        let tmp = TempDir::new().unwrap();
        Repository::init_bare(tmp.path()).unwrap();
        let err = GitRepo::open(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("Bare repositories"));
    }

    #[test]
    fn test_current_branch_and_locate() {
        let tmp = TempDir::new().unwrap();
        let raw = init_with_commit(tmp.path());
        let head = raw.head().unwrap().peel_to_commit().unwrap();
        raw.branch("feature1", &head, false).unwrap();

        let repo = GitRepo::open(tmp.path()).unwrap();
        assert!(repo.current_branch().unwrap().is_some());
        assert_eq!(repo.locate_branch("feature1"), BranchLocation::Local);
        assert_eq!(repo.locate_branch("missing"), BranchLocation::Unknown);
    }

    #[test]
    fn test_locate_remote_branch() {
        let tmp = TempDir::new().unwrap();
        let raw = init_with_commit(tmp.path());
        let head_id = raw.head().unwrap().target().unwrap();
        raw.reference("refs/remotes/origin/topic", head_id, false, "test")
            .unwrap();

        let repo = GitRepo::open(tmp.path()).unwrap();
        assert_eq!(
            repo.locate_branch("topic"),
            BranchLocation::Remote("origin/topic".to_string())
        );
    }
}
