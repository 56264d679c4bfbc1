//! The stateful assertion handler.
//!
//! An [`AssertHandler`] owns the active [`Config`], a registry of contextual
//! data merged into every report, a list of flush hooks run before each
//! report, and the queue of deferred failures.
//!
//! Passing checks never touch a lock. A failing check takes the handler's
//! report lock and holds it from record assembly through the write and, in
//! immediate mode, the termination action, so concurrent failures never
//! interleave their output. Flush hooks and data dumps run under that lock
//! and must not evaluate assertions on the same handler.

use crate::checks::IsEmpty;
use crate::context::Context;
use crate::exit::{ExitAction, FAILURE_EXIT_CODE};
use crate::formatter::Formatter;
use crate::options::{AssertOption, Config, apply_options};
use crate::record::{ASSERT_AREA, ArgsDisplay, FailureRecord};
use crate::sink::Sink;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::backtrace::Backtrace;
use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display};
use std::sync::Arc;
use std::time::Duration;

/// Header written before a captured stack trace.
pub const STACK_MARKER: &str = "stack backtrace:";

/// Prefix of the raw argument line written in verbose mode.
pub const ARGS_MARKER: &str = "ARGS:";

/// Separator between entries of a deferred batch report.
pub const DEFERRED_SEPARATOR: &str = "\n---\n";

/// Contextual data dumped into every failure report.
pub trait AssertData: Send + Sync {
    fn dump(&self) -> String;
}

impl<F> AssertData for F
where
    F: Fn() -> String + Send + Sync,
{
    fn dump(&self) -> String {
        self()
    }
}

/// Side effect run before every failure report, e.g. flushing a buffered log.
pub trait AssertFlush: Send + Sync {
    fn flush(&self);
}

impl<F> AssertFlush for F
where
    F: Fn() + Send + Sync,
{
    fn flush(&self) {
        self();
    }
}

type Registry = Arc<RwLock<BTreeMap<String, Arc<dyn AssertData>>>>;
type Flushes = Arc<RwLock<Vec<Arc<dyn AssertFlush>>>>;

/// Evaluates assertions and reports failures.
pub struct AssertHandler {
    config: RwLock<Config>,
    assert_data: Registry,
    flushes: Flushes,
    /// Formatted failures awaiting a batch drain; its lock is the report lock.
    deferred: Mutex<Vec<String>>,
}

impl AssertHandler {
    /// Handler with the default configuration: text output to stderr, and a
    /// failure terminates the process.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(Config::default())
    }

    /// Handler with an explicit configuration.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            assert_data: Arc::default(),
            flushes: Arc::default(),
            deferred: Mutex::new(Vec::new()),
        }
    }

    /// A transient handler sharing this handler's contextual data and flush
    /// hooks but using `config` and an empty deferred queue.
    #[must_use]
    pub fn with_config(&self, config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            assert_data: Arc::clone(&self.assert_data),
            flushes: Arc::clone(&self.flushes),
            deferred: Mutex::new(Vec::new()),
        }
    }

    /// A transient handler whose configuration is this handler's current
    /// configuration with `options` folded on top.
    #[must_use]
    pub fn view(&self, options: &[AssertOption]) -> Self {
        self.with_config(apply_options(self.config(), options))
    }

    /// Snapshot of the active configuration.
    #[must_use]
    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// Fold `options` onto this handler's configuration.
    pub fn apply(&self, options: &[AssertOption]) {
        let mut config = self.config.write();
        *config = apply_options(config.clone(), options);
    }

    pub fn set_formatter(&self, formatter: impl Formatter + 'static) {
        self.config.write().formatter = Arc::new(formatter);
    }

    pub fn set_writer(&self, sink: Sink) {
        self.config.write().writer = sink;
    }

    pub fn set_exit_func(&self, action: ExitAction) {
        self.config.write().exit = action;
    }

    /// Toggle deferred mode: failures are queued for
    /// [`AssertHandler::process_deferred_assertions`] instead of terminating.
    pub fn set_defer_assertions(&self, on: bool) {
        self.config.write().defer = on;
    }

    pub fn set_debug_mode(&self, on: bool) {
        self.config.write().debug = on;
    }

    pub fn set_verbose_mode(&self, on: bool) {
        self.config.write().verbose = on;
    }

    /// Register contextual data under `key`, replacing any previous entry.
    pub fn add_assert_data(&self, key: impl Into<String>, value: impl AssertData + 'static) {
        self.assert_data
            .write()
            .insert(key.into(), Arc::new(value));
    }

    pub fn remove_assert_data(&self, key: &str) {
        self.assert_data.write().remove(key);
    }

    pub fn add_assert_flush(&self, flusher: impl AssertFlush + 'static) {
        self.flushes.write().push(Arc::new(flusher));
    }

    /// Number of failures waiting in the deferred queue.
    #[must_use]
    pub fn deferred_len(&self) -> usize {
        self.deferred.lock().len()
    }

    fn run_assert(&self, ctx: &Context, msg: &str, args: &[Value]) {
        let mut deferred = self.deferred.lock();
        let config = self.config();

        if let Some(err) = ctx.err() {
            config.writer.emit(&format!("Context canceled: {err}\n"));
            return;
        }

        let hooks = self.flushes.read().clone();
        for hook in &hooks {
            hook.flush();
        }

        let mut record = FailureRecord::new(msg, ASSERT_AREA);
        record.extend_pairs(args);
        for (key, value) in self.assert_data.read().iter() {
            record.insert(key.clone(), value.dump());
        }

        if config.verbose {
            config
                .writer
                .emit(&format!("{ARGS_MARKER} {}\n", ArgsDisplay(args)));
        }

        let stack = if config.captures_stack() {
            capture_stack()
        } else {
            String::new()
        };

        let formatted = config.formatter.format(&record, &stack);
        config.writer.emit(&format!("ASSERT\n{formatted}\n"));

        if config.defer {
            deferred.push(formatted);
            tracing::debug!(queued = deferred.len(), "assertion failure deferred");
            return;
        }

        config.exit.invoke(FAILURE_EXIT_CODE);
    }

    /// Report all deferred failures as one combined write, clear the queue and
    /// invoke the termination action once. Does nothing if the queue is empty.
    pub fn process_deferred_assertions(&self, ctx: &Context) {
        self.process_deferred_with(ctx, &[]);
    }

    /// Drain the deferred queue, writing and terminating according to this
    /// handler's configuration with `options` folded on top.
    pub fn process_deferred_with(&self, _ctx: &Context, options: &[AssertOption]) {
        let mut deferred = self.deferred.lock();
        if deferred.is_empty() {
            return;
        }

        let config = apply_options(self.config(), options);
        let combined = deferred.join(DEFERRED_SEPARATOR);
        config.writer.emit(&format!("{combined}\n"));
        tracing::debug!(drained = deferred.len(), "processed deferred assertions");
        deferred.clear();

        config.exit.invoke(FAILURE_EXIT_CODE);
    }

    /// Fail if `truth` is false.
    pub fn assert(&self, ctx: &Context, truth: bool, msg: &str, data: &[Value]) {
        if !truth {
            self.run_assert(ctx, msg, data);
        }
    }

    /// Like [`AssertHandler::assert`], evaluated under a context that expires
    /// after `timeout`. The derived context is released on return.
    pub fn assert_with_timeout(
        &self,
        ctx: &Context,
        timeout: Duration,
        truth: bool,
        msg: &str,
        data: &[Value],
    ) {
        let (ctx, _release) = Context::with_timeout(ctx, timeout);
        if !truth {
            self.run_assert(&ctx, msg, data);
        }
    }

    /// Fail if `item` is `Some`.
    pub fn nil<T: Debug>(&self, ctx: &Context, item: Option<T>, msg: &str, data: &[Value]) {
        tracing::info!(item = ?item, "nil check");
        if item.is_some() {
            tracing::error!("nil#not nil encountered");
            self.run_assert(ctx, msg, data);
        }
    }

    /// Fail if `item` is `None`.
    pub fn not_nil<T>(&self, ctx: &Context, item: Option<T>, msg: &str, data: &[Value]) {
        if item.is_none() {
            tracing::error!("not_nil#nil encountered");
            self.run_assert(ctx, msg, data);
        }
    }

    /// Always fail; marks a path that must not be reached.
    pub fn never(&self, ctx: &Context, msg: &str, data: &[Value]) {
        self.run_assert(ctx, msg, data);
    }

    /// Fail if `result` is an error; the error text is added under `error`.
    pub fn no_error<T, E: Display>(
        &self,
        ctx: &Context,
        result: &Result<T, E>,
        msg: &str,
        data: &[Value],
    ) {
        if let Err(e) = result {
            let data = extended(data, [("error", e.to_string())]);
            self.run_assert(ctx, msg, &data);
        }
    }

    /// Fail if `expected != actual`; both are added to the report.
    pub fn equal<T>(&self, ctx: &Context, expected: &T, actual: &T, msg: &str, data: &[Value])
    where
        T: PartialEq + Debug + ?Sized,
    {
        if expected != actual {
            let data = extended(
                data,
                [
                    ("expected", format!("{expected:?}")),
                    ("actual", format!("{actual:?}")),
                ],
            );
            self.run_assert(ctx, msg, &data);
        }
    }

    /// Fail if `expected == actual`.
    pub fn not_equal<T>(&self, ctx: &Context, expected: &T, actual: &T, msg: &str, data: &[Value])
    where
        T: PartialEq + Debug + ?Sized,
    {
        if expected == actual {
            let data = extended(
                data,
                [
                    ("expected", format!("{expected:?}")),
                    ("actual", format!("{actual:?}")),
                ],
            );
            self.run_assert(ctx, msg, &data);
        }
    }

    /// Fail unless `haystack` contains `needle`.
    pub fn contains(&self, ctx: &Context, haystack: &str, needle: &str, msg: &str, data: &[Value]) {
        if !haystack.contains(needle) {
            let data = extended(
                data,
                [("haystack", haystack.to_string()), ("needle", needle.to_string())],
            );
            self.run_assert(ctx, msg, &data);
        }
    }

    /// Fail if `haystack` contains `needle`.
    pub fn not_contains(
        &self,
        ctx: &Context,
        haystack: &str,
        needle: &str,
        msg: &str,
        data: &[Value],
    ) {
        if haystack.contains(needle) {
            let data = extended(
                data,
                [("haystack", haystack.to_string()), ("needle", needle.to_string())],
            );
            self.run_assert(ctx, msg, &data);
        }
    }

    /// Fail if `value` is empty.
    pub fn not_empty<T>(&self, ctx: &Context, value: &T, msg: &str, data: &[Value])
    where
        T: IsEmpty + Debug + ?Sized,
    {
        if value.is_empty_value() {
            let data = extended(data, [("value", format!("{value:?}"))]);
            self.run_assert(ctx, msg, &data);
        }
    }

    pub fn is_true(&self, ctx: &Context, value: bool, msg: &str, data: &[Value]) {
        if !value {
            let data = extended(data, [("value", value.to_string())]);
            self.run_assert(ctx, msg, &data);
        }
    }

    pub fn is_false(&self, ctx: &Context, value: bool, msg: &str, data: &[Value]) {
        if value {
            let data = extended(data, [("value", value.to_string())]);
            self.run_assert(ctx, msg, &data);
        }
    }
}

impl Default for AssertHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AssertHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssertHandler")
            .field("config", &*self.config.read())
            .field("assert_data", &self.assert_data.read().keys().collect::<Vec<_>>())
            .field("flushes", &self.flushes.read().len())
            .field("deferred", &self.deferred_len())
            .finish()
    }
}

/// Caller data followed by check-specific pairs.
fn extended<const N: usize>(data: &[Value], pairs: [(&str, String); N]) -> Vec<Value> {
    let mut out = Vec::with_capacity(data.len() + 2 * N);
    out.extend_from_slice(data);
    for (key, value) in pairs {
        out.push(Value::from(key));
        out.push(Value::from(value));
    }
    out
}

fn capture_stack() -> String {
    format!("{STACK_MARKER}\n{}", Backtrace::force_capture())
}
