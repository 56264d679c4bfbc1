use std::process::{Command, ExitCode};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace tasks for assertkit")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq, Debug)]
enum Task {
    /// Verify formatting
    Fmt,
    /// Type-check every target
    Check,
    /// Lint every target, warnings as errors
    Clippy,
    /// Run the library and demo test suites
    Test,
    /// Run fmt, check, clippy and test in order
    Ci,
    /// Run the demo binary once per subcommand that keeps the process alive
    Demo,
}

/// Steps `ci` runs, in order.
const CI_STEPS: [Task; 4] = [Task::Fmt, Task::Check, Task::Clippy, Task::Test];

/// Demo subcommands that finish with exit code 0.
const DEMO_COMMANDS: [&str; 5] = ["basic", "formats", "modes", "ergonomic", "custom-exit"];

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("xtask failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(task: Task) -> Result<()> {
    match task {
        Task::Fmt => cargo(&["fmt", "--all", "--check"]),
        Task::Check => cargo(&["check", "--workspace", "--all-targets"]),
        Task::Clippy => cargo(&[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ]),
        Task::Test => cargo(&["test", "--workspace"]),
        Task::Ci => CI_STEPS.into_iter().try_for_each(run),
        Task::Demo => DEMO_COMMANDS
            .into_iter()
            .try_for_each(|sub| cargo(&["run", "--quiet", "-p", "assertkit-demo", "--", sub])),
    }
}

fn cargo(args: &[&str]) -> Result<()> {
    let shown = format!("cargo {}", args.join(" "));
    eprintln!("> {shown}");

    let status = Command::new(env_cargo())
        .args(args)
        .status()
        .with_context(|| format!("could not spawn `{shown}`"))?;

    match status.code() {
        Some(0) => Ok(()),
        Some(code) => bail!("`{shown}` exited with {code}"),
        None => bail!("`{shown}` was killed by a signal"),
    }
}

/// The cargo driving this xtask, falling back to `cargo` on PATH.
fn env_cargo() -> String {
    std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string())
}
