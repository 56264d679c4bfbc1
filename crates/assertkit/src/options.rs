//! Assertion configuration and the modifiers that build it.

use crate::exit::ExitAction;
use crate::formatter::{Formatter, FormatterKind, JsonFormatter, TextFormatter};
use crate::sink::Sink;
use std::sync::Arc;

/// Behavior of a single evaluation or of a handler.
#[derive(Debug, Clone)]
pub struct Config {
    pub formatter: Arc<dyn Formatter>,
    pub writer: Sink,
    pub exit: ExitAction,
    pub defer: bool,
    pub debug: bool,
    pub verbose: bool,
}

impl Default for Config {
    /// Text output to stderr; a failure terminates the process.
    fn default() -> Self {
        Self {
            formatter: Arc::new(TextFormatter),
            writer: Sink::stderr(),
            exit: ExitAction::process_exit(),
            defer: false,
            debug: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Whether a stack trace is captured on failure.
    #[must_use]
    pub const fn captures_stack(&self) -> bool {
        self.debug || self.verbose
    }
}

/// A modifier applied to a [`Config`].
///
/// Options are applied in order; later options win on conflicting fields.
#[derive(Debug, Clone)]
pub enum AssertOption {
    Formatter(Arc<dyn Formatter>),
    Writer(Sink),
    Exit(ExitAction),
    Defer(bool),
    Debug,
    Verbose,
    Quiet,
    CrashOnFailure,
    PanicOnFailure,
    Silent,
    TestingDefaults,
    ProductionDefaults,
}

impl AssertOption {
    /// Apply this modifier to `config`.
    pub fn apply(&self, config: &mut Config) {
        match self {
            Self::Formatter(f) => config.formatter = Arc::clone(f),
            Self::Writer(sink) => config.writer = sink.clone(),
            Self::Exit(action) => config.exit = action.clone(),
            Self::Defer(on) => config.defer = *on,
            Self::Debug => config.debug = true,
            Self::Verbose => config.verbose = true,
            Self::Quiet => {
                config.debug = false;
                config.verbose = false;
            }
            Self::CrashOnFailure => config.exit = ExitAction::process_exit(),
            Self::PanicOnFailure => config.exit = ExitAction::panic(),
            Self::Silent => config.writer = Sink::discard(),
            Self::TestingDefaults => {
                config.exit = ExitAction::noop();
                config.formatter = Arc::new(TextFormatter);
                config.debug = true;
            }
            Self::ProductionDefaults => {
                config.exit = ExitAction::noop();
                config.formatter = Arc::new(JsonFormatter);
                config.debug = false;
                config.verbose = false;
            }
        }
    }
}

/// Fold `options` over `config`, in order.
#[must_use]
pub fn apply_options(mut config: Config, options: &[AssertOption]) -> Config {
    for option in options {
        option.apply(&mut config);
    }
    config
}

/// Use a custom formatter.
#[must_use]
pub fn with_formatter(formatter: impl Formatter + 'static) -> AssertOption {
    AssertOption::Formatter(Arc::new(formatter))
}

/// Use one of the built-in formatters.
#[must_use]
pub fn with_format(kind: FormatterKind) -> AssertOption {
    AssertOption::Formatter(kind.formatter())
}

/// Write reports to `sink`.
#[must_use]
pub fn with_writer(sink: Sink) -> AssertOption {
    AssertOption::Writer(sink)
}

/// Use a custom termination action.
#[must_use]
pub fn with_exit_func(action: ExitAction) -> AssertOption {
    AssertOption::Exit(action)
}

/// Queue failures instead of terminating immediately.
#[must_use]
pub const fn with_defer_mode(on: bool) -> AssertOption {
    AssertOption::Defer(on)
}

/// Capture stack traces.
#[must_use]
pub const fn with_debug_mode() -> AssertOption {
    AssertOption::Debug
}

/// Capture stack traces and print raw arguments.
#[must_use]
pub const fn with_verbose_mode() -> AssertOption {
    AssertOption::Verbose
}

/// Turn off both debug and verbose output.
#[must_use]
pub const fn with_quiet_mode() -> AssertOption {
    AssertOption::Quiet
}

/// Terminate the process on failure.
#[must_use]
pub const fn with_crash_on_failure() -> AssertOption {
    AssertOption::CrashOnFailure
}

/// Panic on failure.
#[must_use]
pub const fn with_panic_on_failure() -> AssertOption {
    AssertOption::PanicOnFailure
}

/// Discard all output.
#[must_use]
pub const fn with_silent_mode() -> AssertOption {
    AssertOption::Silent
}

/// No termination, text output, stack traces on.
#[must_use]
pub const fn with_testing_defaults() -> AssertOption {
    AssertOption::TestingDefaults
}

/// No termination, JSON output, no stack traces.
#[must_use]
pub const fn with_production_defaults() -> AssertOption {
    AssertOption::ProductionDefaults
}
