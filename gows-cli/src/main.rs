//! Gows CLI - Command line interface for gows
//!
//! Clones a repository into a GOPATH-style workspace and opens a shell or
//! runs a command inside it.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use gows_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::OpenArgs;

/// Exit code for usage errors and `--help`
const USAGE_EXIT: u8 = 2;

const EXAMPLES: &str = "Examples:
  gows acme/widget
  gows acme/widget@feature1 -- go test ./...
  eval \"$(gows -q golang.org/x/tools)\"";

/// gows: open a repository in its own GOPATH workspace
#[derive(Parser, Debug)]
#[command(name = "gows")]
#[command(author, version, about, long_about = None)]
#[command(after_help = EXAMPLES)]
struct Cli {
    /// Print shell statements for eval instead of launching a shell
    #[arg(short, long, conflicts_with = "command")]
    quiet: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Workspace root (defaults to ~/workspace)
    #[arg(long, value_name = "DIR", env = "GOWS_ROOT")]
    root: Option<PathBuf>,

    #[command(flatten)]
    open: OpenArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return usage_exit(e),
    };

    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("gows: {:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let root = cli.root.filter(|r| !r.as_os_str().is_empty());
    let config = Config::load_with_overrides(root)?;

    tracing::debug!(
        root = %config.workspace_root.display(),
        plain_clone = config.plain_clone,
        shell = %config.shell,
        "Configuration loaded"
    );

    cli.open.execute(cli.quiet, &config).await
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout is reserved for quiet-mode shell statements
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Help and parse errors exit non-zero; `--version` exits cleanly
fn usage_exit(err: clap::Error) -> ExitCode {
    let _ = err.print();
    match err.kind() {
        ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::from(USAGE_EXIT),
    }
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<gows_core::Error>()
        .map(gows_core::Error::exit_code)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_reference_and_command() {
        let cli =
            Cli::try_parse_from(["gows", "acme/widget@feature1", "--", "go", "test", "./..."])
                .unwrap();
        assert_eq!(cli.open.reference, "acme/widget@feature1");
        assert_eq!(cli.open.command, ["go", "test", "./..."]);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_parse_quiet() {
        let cli = Cli::try_parse_from(["gows", "-q", "acme/widget"]).unwrap();
        assert!(cli.quiet);
        assert!(cli.open.command.is_empty());
    }

    #[test]
    fn test_usage_errors() {
        for args in [
            vec!["gows"],
            vec!["gows", "--bogus", "acme/widget"],
            vec!["gows", "acme/widget", "extra"],
            vec!["gows", "-q", "acme/widget", "--", "make"],
        ] {
            assert!(
                Cli::try_parse_from(args.iter().copied()).is_err(),
                "{args:?} should not parse"
            );
        }
    }

    #[test]
    fn test_help_is_an_error_kind() {
        let err = Cli::try_parse_from(["gows", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_exit_code_from_core_error() {
        let err = anyhow::Error::new(gows_core::Error::LaunchFailure {
            command: "make".to_string(),
            reason: "exited with status 4".to_string(),
            code: Some(4),
        });
        assert_eq!(exit_code_for(&err), 4);
        assert_eq!(exit_code_for(&anyhow::anyhow!("other")), 1);
    }
}
