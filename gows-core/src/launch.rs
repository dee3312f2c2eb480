//! Environment setup for a prepared workspace
//!
//! The environment is computed as a value and only ever applied to child
//! processes; gows never changes its own working directory or environment.

use std::ffi::OsString;
use std::path::PathBuf;

use colored::Colorize;

use crate::paths::WorkspacePaths;
use crate::process::{Invocation, ProcessRunner};
use crate::{Error, Result};

/// Variable pointing tools at the project directory
pub const PACKAGE_PATH_VAR: &str = "GOPATH";

/// Environment a workspace shell or command runs in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchEnv {
    /// Value for `GOPATH`
    pub package_path: PathBuf,
    /// `{package_path}/bin`, prepended to the search path
    pub bin_dir: PathBuf,
    /// Working directory of the child
    pub workdir: PathBuf,
    /// `PATH` for the child, `None` if it could not be joined
    pub search_path: Option<OsString>,
    /// Shell used for commands and interactive sessions
    pub shell: String,
}

impl LaunchEnv {
    /// Build the environment for `paths`, extending `inherited_path`
    pub fn new(
        paths: &WorkspacePaths,
        inherited_path: Option<OsString>,
        shell: impl Into<String>,
    ) -> Self {
        let bin_dir = paths.bin_dir();

        let mut entries = vec![bin_dir.clone()];
        if let Some(inherited) = &inherited_path {
            entries.extend(std::env::split_paths(inherited));
        }
        let search_path = std::env::join_paths(entries).ok();

        Self {
            package_path: paths.active_project().to_path_buf(),
            bin_dir,
            workdir: paths.active_clone().to_path_buf(),
            search_path,
            shell: shell.into(),
        }
    }

    /// The three statements printed in quiet mode, meant for `eval`
    pub fn shell_statements(&self) -> [String; 3] {
        [
            format!("export {}={}", PACKAGE_PATH_VAR, quote(&self.package_path)),
            format!("export PATH={}:\"$PATH\"", quote(&self.bin_dir)),
            format!("cd {}", quote(&self.workdir)),
        ]
    }

    /// Apply the environment to an invocation
    pub fn apply(&self, invocation: Invocation) -> Invocation {
        let invocation = invocation
            .current_dir(&self.workdir)
            .env(PACKAGE_PATH_VAR, &self.package_path);

        match &self.search_path {
            Some(path) => invocation.env("PATH", path),
            None => {
                tracing::warn!(
                    bin = %self.bin_dir.display(),
                    "Could not build PATH; leaving it unchanged"
                );
                invocation
            }
        }
    }
}

fn quote(path: &std::path::Path) -> String {
    shell_words::quote(&path.to_string_lossy()).into_owned()
}

/// Runs commands or an interactive shell inside a workspace
pub struct Launcher<'a> {
    runner: &'a dyn ProcessRunner,
}

impl<'a> Launcher<'a> {
    pub fn new(runner: &'a dyn ProcessRunner) -> Self {
        Self { runner }
    }

    /// Run `command` through `$SHELL -c`, or an interactive shell if empty
    ///
    /// Returns the exit code to report. A command that exits non-zero is a
    /// `LaunchFailure` carrying its code; an interactive session's own exit
    /// status is not treated as a failure.
    pub async fn launch(&self, env: &LaunchEnv, command: &[String]) -> Result<u8> {
        if command.is_empty() {
            return self.interactive(env).await;
        }

        let line = command.join(" ");
        let invocation = env.apply(Invocation::new(&env.shell).arg("-c").arg(&line));
        let outcome = self.runner.run(&invocation).await.map_err(|e| Error::LaunchFailure {
            command: line.clone(),
            reason: format!("could not be started with {}: {}", env.shell, e),
            code: None,
        })?;

        if !outcome.success() {
            return Err(Error::LaunchFailure {
                command: line,
                reason: outcome.describe(),
                code: outcome.code,
            });
        }

        Ok(0)
    }

    async fn interactive(&self, env: &LaunchEnv) -> Result<u8> {
        let invocation = env.apply(Invocation::new(&env.shell));

        let entering = format!(
            "entering {} ({}={})",
            env.workdir.display(),
            PACKAGE_PATH_VAR,
            env.package_path.display()
        );
        println!("{} {}", "==> gows:".green().bold(), entering.green());

        let outcome = self.runner.run(&invocation).await.map_err(|e| Error::LaunchFailure {
            command: env.shell.clone(),
            reason: format!("could not be started: {}", e),
            code: None,
        })?;
        tracing::debug!(code = ?outcome.code, "Interactive shell exited");

        println!(
            "{} {}",
            "<== gows:".yellow().bold(),
            format!("left {}", env.workdir.display()).yellow()
        );

        Ok(0)
    }
}
