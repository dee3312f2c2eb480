//! Open command - Prepare a workspace and enter it

use std::io::Write;

use clap::Args;
use gows_core::{Config, LaunchEnv, Launcher, RepoRef, StdoutMode, SystemRunner, Workspace};

/// Arguments for opening a workspace
#[derive(Args, Debug)]
pub struct OpenArgs {
    /// Repository: owner/name, git@github.com:owner/name.git,
    /// https://github.com/owner/name or a package path like golang.org/x/tools,
    /// optionally followed by @branch
    #[arg(value_name = "REFERENCE")]
    pub reference: String,

    /// Command to run inside the workspace; an interactive shell starts when omitted
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl OpenArgs {
    /// Execute the open command, returning the exit code to report
    pub async fn execute(&self, quiet: bool, config: &Config) -> anyhow::Result<u8> {
        let reference = RepoRef::parse(&self.reference)?;
        let runner = SystemRunner::new();

        // Keep stdout clean for eval in quiet mode
        let stdout = if quiet { StdoutMode::Stderr } else { StdoutMode::Inherit };

        let prepared = Workspace::new(config, &runner)
            .with_stdout(stdout)
            .prepare(&reference)
            .await?;

        tracing::debug!(
            fetch = ?prepared.fetch,
            worktree = ?prepared.worktree,
            workdir = %prepared.paths.active_clone().display(),
            "Workspace ready"
        );

        let env = LaunchEnv::new(
            &prepared.paths,
            std::env::var_os("PATH"),
            config.shell.as_str(),
        );

        if quiet {
            write_statements(&mut std::io::stdout().lock(), &env)?;
            return Ok(0);
        }

        Ok(Launcher::new(&runner).launch(&env, &self.command).await?)
    }
}

/// Print the quiet-mode shell statements, one per line
fn write_statements(out: &mut impl Write, env: &LaunchEnv) -> std::io::Result<()> {
    for statement in env.shell_statements() {
        writeln!(out, "{}", statement)?;
    }
    out.flush()
}
