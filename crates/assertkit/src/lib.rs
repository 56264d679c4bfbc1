//! Runtime assertions with structured failure reports.
//!
//! This crate evaluates conditions at arbitrary program points and, on
//! failure, writes a report and applies a termination policy:
//! - Failure records (`msg`, `area`, caller data, registered contextual data)
//! - Text, JSON and YAML formatters
//! - Option modifiers folded into a per-call or per-handler configuration
//! - A lockable handler with deferred batching and cancellation checks
//! - Zero-setup free functions backed by a process-wide default handler
//! - YAML settings files
//!
//! ```
//! use assertkit::{AssertHandler, Context, ExitAction, Sink};
//!
//! let (sink, buffer) = Sink::buffer();
//! let handler = AssertHandler::new();
//! handler.set_writer(sink);
//! handler.set_exit_func(ExitAction::noop());
//!
//! handler.assert(&Context::background(), 2 == 1, "math is broken", &assertkit::args!("lhs", 2));
//! assert!(buffer.contents().contains("msg=math is broken"));
//! ```

pub mod checks;
pub mod context;
pub mod exit;
pub mod facade;
pub mod formatter;
pub mod handler;
pub mod options;
pub mod record;
pub mod settings;
pub mod sink;

pub use checks::IsEmpty;
pub use context::{CancelHandle, Context, ContextError};
pub use exit::{ExitAction, FAILURE_EXIT_CODE};
pub use facade::{
    assert, assert_with_timeout, contains, default_handler, equal, is_false, is_true, never,
    nil, no_error, not_contains, not_empty, not_equal, not_nil, process_deferred_assertions,
};
pub use formatter::{Formatter, FormatterKind, JsonFormatter, TextFormatter, YamlFormatter};
pub use handler::{
    ARGS_MARKER, AssertData, AssertFlush, AssertHandler, DEFERRED_SEPARATOR, STACK_MARKER,
};
pub use options::{
    AssertOption, Config, apply_options, with_crash_on_failure, with_debug_mode,
    with_defer_mode, with_exit_func, with_format, with_formatter, with_panic_on_failure,
    with_production_defaults, with_quiet_mode, with_silent_mode, with_testing_defaults,
    with_verbose_mode, with_writer,
};
pub use record::{ASSERT_AREA, FailureRecord};
pub use settings::{ConfigError, OnFailure, Output, Settings, load_settings};
pub use sink::{SharedBuffer, Sink};

#[doc(hidden)]
pub use serde_json;
