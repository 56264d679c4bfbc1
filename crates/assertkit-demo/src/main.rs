//! assertkit-demo CLI - Walks through assertkit's formats, modes and termination policies.

use anyhow::{Context as _, Result};
use assertkit::{
    AssertHandler, AssertOption, Context, ExitAction, FormatterKind, JsonFormatter, Sink,
    YamlFormatter, args, load_settings, with_crash_on_failure, with_debug_mode, with_format,
    with_formatter, with_production_defaults, with_quiet_mode, with_silent_mode,
    with_testing_defaults, with_verbose_mode, with_writer,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use tracing_subscriber::EnvFilter;

/// Exit codes for the CLI.
mod exit_code {
    pub const SUCCESS: u8 = 0;
    pub const CONFIG_ERROR: u8 = 2;
}

#[derive(Parser)]
#[command(name = "assertkit-demo")]
#[command(about = "Walk through assertkit's output formats, modes and termination policies")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: text, json, yaml
    #[arg(long, global = true)]
    format: Option<FormatterKind>,

    /// Capture stack traces
    #[arg(long, global = true)]
    debug: bool,

    /// Capture stack traces and print raw arguments
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML settings file applied before the other flags
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// One failing assertion on a fresh handler
    Basic,
    /// The same failure rendered as text, JSON and YAML
    Formats,
    /// Default, debug, verbose, quiet, testing and production modes
    Modes,
    /// Every free-function check; the process keeps running
    Ergonomic,
    /// Queue failures and report them as one batch
    Deferred,
    /// Custom exit action that reports instead of exiting
    CustomExit,
    /// Terminate the process on failure
    Crash,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let global = match global_options(&cli) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("{} {e:?}", "error:".red());
            return ExitCode::from(exit_code::CONFIG_ERROR);
        }
    };

    let ctx = Context::background();
    let code = match cli.command {
        Commands::Basic => run_basic(&ctx, &global),
        Commands::Formats => run_formats(&ctx, &global),
        Commands::Modes => run_modes(&ctx, &global),
        Commands::Ergonomic => run_ergonomic(&ctx, &global),
        Commands::Deferred => run_deferred(&ctx, &global),
        Commands::CustomExit => run_custom_exit(&ctx, &global),
        Commands::Crash => run_crash(&ctx, &global),
    };
    ExitCode::from(code)
}

/// Options from `--settings`, then `--format`, `--debug` and `--verbose`.
fn global_options(cli: &Cli) -> Result<Vec<AssertOption>> {
    let mut opts = Vec::new();
    if let Some(path) = &cli.settings {
        let settings = load_settings(path)
            .with_context(|| format!("Failed to load settings: {}", path.display()))?;
        tracing::debug!(?settings, "loaded settings");
        opts.extend(settings.to_options());
    }
    if let Some(kind) = cli.format {
        opts.push(with_format(kind));
    }
    if cli.debug {
        opts.push(with_debug_mode());
    }
    if cli.verbose {
        opts.push(with_verbose_mode());
    }
    Ok(opts)
}

fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").bold());
}

/// Options for a demo call: the global options followed by `extra`.
fn with_global(
    global: &[AssertOption],
    extra: impl IntoIterator<Item = AssertOption>,
) -> Vec<AssertOption> {
    global.iter().cloned().chain(extra).collect()
}

/// A handler built from the global options whose exit action records the code.
fn recording_handler(global: &[AssertOption]) -> (AssertHandler, Arc<AtomicI32>) {
    let code = Arc::new(AtomicI32::new(0));
    let recorder = Arc::clone(&code);

    let handler = AssertHandler::new();
    handler.apply(global);
    handler.set_exit_func(ExitAction::new(move |c| recorder.store(c, Ordering::SeqCst)));
    (handler, code)
}

fn recorded_exit(code: &AtomicI32) -> u8 {
    u8::try_from(code.load(Ordering::SeqCst)).unwrap_or(u8::MAX)
}

fn run_basic(ctx: &Context, global: &[AssertOption]) -> u8 {
    let handler = AssertHandler::new();
    handler.apply(global);
    handler.set_exit_func(ExitAction::noop());

    handler.assert(
        ctx,
        2 == 1,
        "Basic Assertion Failed: 2 is not equal to 1",
        &args!("lhs", 2, "rhs", 1),
    );
    exit_code::SUCCESS
}

fn run_formats(ctx: &Context, global: &[AssertOption]) -> u8 {
    let handler = AssertHandler::new();
    handler.apply(global);
    handler.set_writer(Sink::stdout());
    handler.set_exit_func(ExitAction::noop());

    section("TEXT");
    handler.assert(ctx, false, "Text Format Assertion Failed", &[]);

    section("JSON");
    handler.set_formatter(JsonFormatter);
    handler.assert(ctx, false, "JSON Format Assertion Failed", &[]);

    section("YAML");
    handler.set_formatter(YamlFormatter);
    handler.assert(ctx, false, "YAML Format Assertion Failed", &[]);
    exit_code::SUCCESS
}

fn run_modes(ctx: &Context, global: &[AssertOption]) -> u8 {
    section("DEFAULT MODE (No Stack Traces)");
    assertkit::assert(ctx, false, "Default mode - clean output", global);

    section("DEBUG MODE (With Stack Traces)");
    assertkit::assert(
        ctx,
        false,
        "Debug mode - includes stack trace",
        &with_global(global, [with_debug_mode()]),
    );

    section("VERBOSE MODE (With Stack + Args)");
    assertkit::assert(
        ctx,
        false,
        "Verbose mode - includes everything",
        &with_global(global, [with_verbose_mode()]),
    );

    section("QUIET MODE (Minimal Output)");
    assertkit::assert(
        ctx,
        false,
        "Quiet mode - minimal output",
        &with_global(global, [with_quiet_mode()]),
    );

    section("TESTING DEFAULTS (Debug Mode)");
    assertkit::assert(
        ctx,
        false,
        "Testing defaults include debug info",
        &with_global(global, [with_testing_defaults()]),
    );

    section("PRODUCTION DEFAULTS (Clean JSON)");
    assertkit::assert(
        ctx,
        false,
        "Production defaults are clean",
        &with_global(global, [with_production_defaults()]),
    );

    section("CUSTOM WRITER + VERBOSE");
    assertkit::assert(
        ctx,
        false,
        "Custom writer with verbose mode",
        &with_global(global, [with_writer(Sink::stdout()), with_verbose_mode()]),
    );

    println!("\nProgram completed - notice the different output levels!");
    exit_code::SUCCESS
}

fn run_ergonomic(ctx: &Context, global: &[AssertOption]) -> u8 {
    assertkit::assert(ctx, "hello".len() == 5, "Basic assertion should pass", global);
    assertkit::not_empty(ctx, "hello", "String should not be empty", global);
    assertkit::nil(ctx, None::<&str>, "This should pass", global);
    assertkit::equal(ctx, &42, &42, "Numbers should be equal", global);
    assertkit::is_true(ctx, true, "Value should be true", global);

    assertkit::assert(ctx, false, "This will fail but program continues", global);

    assertkit::assert(
        ctx,
        false,
        "JSON formatted error",
        &with_global(global, [with_formatter(JsonFormatter)]),
    );
    assertkit::assert(
        ctx,
        false,
        "Silent assertion",
        &with_global(global, [with_silent_mode()]),
    );
    assertkit::assert(
        ctx,
        false,
        "Custom writer",
        &with_global(global, [with_writer(Sink::stdout())]),
    );

    assertkit::equal(ctx, "expected", "actual", "Strings should match", global);
    assertkit::not_equal(ctx, "foo", "bar", "Strings should be different", global);
    assertkit::contains(ctx, "hello world", "world", "Should contain substring", global);
    assertkit::not_contains(ctx, "hello", "xyz", "Should not contain substring", global);
    assertkit::is_false(ctx, false, "Value should be false", global);
    assertkit::no_error(ctx, &"42x".parse::<u32>(), "Input should parse", global);

    println!("Program completed successfully!");
    exit_code::SUCCESS
}

fn run_deferred(ctx: &Context, global: &[AssertOption]) -> u8 {
    let (handler, code) = recording_handler(global);
    handler.set_defer_assertions(true);

    handler.nil(ctx, Some("unexpected"), "Deferred Nil Assertion", &[]);
    handler.assert(ctx, false, "Deferred Assert Failure", &[]);
    println!("queued {} deferred failures", handler.deferred_len());

    handler.process_deferred_assertions(ctx);
    recorded_exit(&code)
}

fn run_custom_exit(ctx: &Context, global: &[AssertOption]) -> u8 {
    let handler = AssertHandler::new();
    handler.apply(global);
    handler.set_exit_func(ExitAction::new(|code| {
        println!("Custom exit called with code: {code}, but not exiting");
    }));

    handler.assert(ctx, false, "Custom Exit Assertion Failed", &[]);
    exit_code::SUCCESS
}

fn run_crash(ctx: &Context, global: &[AssertOption]) -> u8 {
    assertkit::assert(
        ctx,
        false,
        "This will exit the program",
        &with_global(global, [with_crash_on_failure()]),
    );
    println!("unreachable: process should have exited");
    exit_code::SUCCESS
}
