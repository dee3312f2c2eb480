//! Subprocess invocation
//!
//! Every external tool gows drives (git, gh, go, the user's shell) goes
//! through a [`ProcessRunner`]. Children inherit stdin and stderr; their
//! output is never captured.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::process::Command;

/// Where a child's stdout goes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StdoutMode {
    /// Share our stdout
    #[default]
    Inherit,
    /// Send it to our stderr, keeping stdout free for shell statements
    Stderr,
}

/// A fully described child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
    pub current_dir: Option<PathBuf>,
    pub envs: Vec<(String, OsString)>,
    pub stdout: StdoutMode,
}

impl Invocation {
    /// Start describing a run of `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            envs: Vec::new(),
            stdout: StdoutMode::Inherit,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl AsRef<OsStr>) -> Self {
        self.envs.push((key.into(), value.as_ref().to_os_string()));
        self
    }

    pub fn stdout(mut self, mode: StdoutMode) -> Self {
        self.stdout = mode;
        self
    }

    /// Value of an environment variable set on this invocation
    pub fn env_value(&self, key: &str) -> Option<&OsStr> {
        self.envs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).stdin(Stdio::inherit()).stderr(Stdio::inherit());

        match self.stdout {
            StdoutMode::Inherit => {
                cmd.stdout(Stdio::inherit());
            }
            StdoutMode::Stderr => {
                cmd.stdout(Stdio::from(std::io::stderr()));
            }
        }

        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }

        cmd
    }
}

/// Renders as a shell-like command line for diagnostics
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        write!(f, "{}", shell_words::join(words))
    }
}

/// How a child process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human-readable description for error messages
    pub fn describe(&self) -> String {
        match self.code {
            Some(code) => format!("exited with status {}", code),
            None => "was terminated by a signal".to_string(),
        }
    }
}

impl From<ExitStatus> for ExitOutcome {
    fn from(status: ExitStatus) -> Self {
        Self { code: status.code() }
    }
}

/// Runs child processes to completion
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the invocation and wait for it to exit
    async fn run(&self, invocation: &Invocation) -> std::io::Result<ExitOutcome>;

    /// Check if `program` can be found on this system
    fn is_available(&self, program: &str) -> bool;
}

/// Runner backed by real processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<ExitOutcome> {
        tracing::info!(command = %invocation, cwd = ?invocation.current_dir, "Running");

        // The child shares our terminal, so Ctrl-C reaches both of us. Only
        // the child decides what an interrupt means while it runs.
        let mut interrupts = Interrupts::listen()?;
        let mut child = invocation.build_command().spawn()?;
        let status = loop {
            tokio::select! {
                status = child.wait() => break status?,
                signal = interrupts.recv() => {
                    tracing::debug!(signal, command = %invocation.program, "Left to child");
                }
            }
        };

        tracing::debug!(command = %invocation.program, code = ?status.code(), "Finished");
        Ok(status.into())
    }

    fn is_available(&self, program: &str) -> bool {
        let path = Path::new(program);
        if path.components().count() > 1 {
            return path.is_file();
        }

        std::env::var_os("PATH")
            .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
            .unwrap_or(false)
    }
}

/// Terminal interrupts received while a child is running
#[cfg(unix)]
struct Interrupts {
    interrupt: tokio::signal::unix::Signal,
    quit: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Interrupts {
    fn listen() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            quit: signal(SignalKind::quit())?,
        })
    }

    async fn recv(&mut self) -> &'static str {
        tokio::select! {
            Some(()) = self.interrupt.recv() => "SIGINT",
            Some(()) = self.quit.recv() => "SIGQUIT",
            else => std::future::pending().await,
        }
    }
}

#[cfg(not(unix))]
struct Interrupts;

#[cfg(not(unix))]
impl Interrupts {
    fn listen() -> std::io::Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) -> &'static str {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "ctrl-c",
            Err(_) => std::future::pending().await,
        }
    }
}
