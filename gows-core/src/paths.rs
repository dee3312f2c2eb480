//! Workspace path resolution
//!
//! Every reference maps onto a GOPATH-style project directory:
//!
//! ```text
//! {root}/gopath-{name}[@{branch}]/src/github.com/{owner}/{name}
//! {root}/gopath-{name}[@{branch}]/src/{package path}
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::reference::{RepoRef, GITHUB_HOST};

/// Prefix of every project directory under the workspace root
pub const PROJECT_PREFIX: &str = "gopath-";

/// Resolved on-disk locations for a reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePaths {
    /// `{root}/gopath-{name}`
    pub project: PathBuf,
    /// Primary working tree inside `project`
    pub clone: PathBuf,
    /// `{project}@{branch}`, or `project` when no branch was given
    pub branch_project: PathBuf,
    /// Branch working tree inside `branch_project`
    pub branch_clone: PathBuf,
}

impl WorkspacePaths {
    /// Derive all paths for `reference` under `root`
    pub fn resolve(root: &Path, reference: &RepoRef) -> Self {
        let project = root.join(format!("{}{}", PROJECT_PREFIX, reference.repo_name()));
        let clone = clone_path(&project, reference);

        let branch_project = match reference.branch() {
            Some(branch) => {
                let mut dir = OsString::from(project.as_os_str());
                dir.push("@");
                dir.push(sanitize_branch(branch));
                PathBuf::from(dir)
            }
            None => project.clone(),
        };
        let branch_clone = clone_path(&branch_project, reference);

        Self {
            project,
            clone,
            branch_project,
            branch_clone,
        }
    }

    /// Whether a branch qualifier produced a separate project
    pub fn has_branch(&self) -> bool {
        self.branch_project != self.project
    }

    /// Project directory the environment should point at
    pub fn active_project(&self) -> &Path {
        &self.branch_project
    }

    /// Working tree the environment should start in
    pub fn active_clone(&self) -> &Path {
        &self.branch_clone
    }

    /// `bin` directory prepended to `PATH`
    pub fn bin_dir(&self) -> PathBuf {
        self.active_project().join("bin")
    }
}

fn clone_path(project: &Path, reference: &RepoRef) -> PathBuf {
    let src = project.join("src");
    match reference.github() {
        Some((owner, _)) => src.join(GITHUB_HOST).join(owner).join(reference.repo_name()),
        None => src.join(reference.unqualified()),
    }
}

/// Keep a branch to a single directory name
fn sanitize_branch(branch: &str) -> String {
    branch.replace(['/', '\\'], "-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Component;

    fn resolve(root: &str, input: &str) -> WorkspacePaths {
        WorkspacePaths::resolve(Path::new(root), &RepoRef::parse(input).unwrap())
    }

    #[test]
    fn test_shorthand_paths() {
        let paths = resolve("/ws", "acme/widget");
        assert_eq!(paths.project, PathBuf::from("/ws/gopath-widget"));
        assert_eq!(paths.clone, PathBuf::from("/ws/gopath-widget/src/github.com/acme/widget"));
        assert_eq!(paths.branch_project, paths.project);
        assert_eq!(paths.branch_clone, paths.clone);
        assert!(!paths.has_branch());
        assert_eq!(paths.bin_dir(), PathBuf::from("/ws/gopath-widget/bin"));
    }

    #[test]
    fn test_branch_paths() {
        let paths = resolve("/ws", "acme/widget@feature1");
        assert_eq!(paths.clone, PathBuf::from("/ws/gopath-widget/src/github.com/acme/widget"));
        assert_eq!(paths.branch_project, PathBuf::from("/ws/gopath-widget@feature1"));
        assert_eq!(
            paths.branch_clone,
            PathBuf::from("/ws/gopath-widget@feature1/src/github.com/acme/widget")
        );
        assert!(paths.has_branch());
        assert_eq!(paths.active_clone(), paths.branch_clone.as_path());
        assert_eq!(paths.bin_dir(), PathBuf::from("/ws/gopath-widget@feature1/bin"));
    }

    #[test]
    fn test_branch_with_slash_stays_one_directory() {
        let paths = resolve("/ws", "acme/widget@feature/login");
        assert_eq!(paths.branch_project, PathBuf::from("/ws/gopath-widget@feature-login"));
    }

    #[test]
    fn test_url_forms_share_layout() {
        let expected = resolve("/ws", "acme/widget");
        assert_eq!(resolve("/ws", "git@github.com:acme/widget.git"), expected);
        assert_eq!(resolve("/ws", "https://github.com/acme/widget.git"), expected);
    }

    #[test]
    fn test_package_paths() {
        let paths = resolve("/ws", "golang.org/x/tools@gopls-release");
        assert_eq!(paths.project, PathBuf::from("/ws/gopath-golang-org-x-tools"));
        assert_eq!(
            paths.clone,
            PathBuf::from("/ws/gopath-golang-org-x-tools/src/golang.org/x/tools")
        );
        assert_eq!(
            paths.branch_clone,
            PathBuf::from("/ws/gopath-golang-org-x-tools@gopls-release/src/golang.org/x/tools")
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let reference = RepoRef::parse("acme/widget@feature1").unwrap();
        let first = WorkspacePaths::resolve(Path::new("/ws"), &reference);
        let second = WorkspacePaths::resolve(Path::new("/ws"), &reference);
        assert_eq!(first, second);
    }

    #[test]
    fn test_clones_stay_inside_project() {
        for input in [
            "acme/widget@feature1",
            "git@github.com:acme/...x.git",
            "https://github.com/acme/.hidden",
            "golang.org/x/tools",
            "example.com/a..b/c@topic",
        ] {
            let paths = resolve("/ws", input);
            for (project, clone) in [
                (&paths.project, &paths.clone),
                (&paths.branch_project, &paths.branch_clone),
            ] {
                assert!(clone.starts_with(project.join("src")), "{input}: {clone:?}");
                assert!(
                    !clone.components().any(|c| matches!(c, Component::ParentDir)),
                    "{input}: {clone:?}"
                );
            }
        }
    }
}
