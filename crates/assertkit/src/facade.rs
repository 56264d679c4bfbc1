//! Zero-setup assertion functions.
//!
//! Each function resolves the process-wide [`default_handler`], folds the
//! per-call options over its current configuration, and delegates to a
//! transient handler built from the result. The transient handler shares the
//! default handler's contextual data and flush hooks.
//!
//! The default handler never terminates the process: a failure is reported to
//! stderr and execution continues unless an option such as
//! [`with_crash_on_failure`](crate::with_crash_on_failure) says otherwise.
//!
//! Every function takes the same path: the view is resolved and the check
//! runs on it. A passing check reads the configuration but never takes the
//! report lock. Caller key/value data is not accepted here; attach it with
//! [`AssertHandler::add_assert_data`] on [`default_handler`] or call the
//! handler methods directly.
//!
//! Deferred mode through these functions does not accumulate across calls,
//! since each call gets a fresh transient queue. To batch failures, enable
//! deferred mode on a handler you keep (or on [`default_handler`] itself) and
//! drain it with [`process_deferred_assertions`].

use crate::checks::IsEmpty;
use crate::context::Context;
use crate::exit::ExitAction;
use crate::handler::AssertHandler;
use crate::options::{AssertOption, Config};
use std::fmt::{Debug, Display};
use std::sync::OnceLock;
use std::time::Duration;

/// The process-wide handler used by the free functions.
///
/// Created on first use with text output to stderr and a no-op termination
/// action. Tests that need isolation should build their own [`AssertHandler`].
pub fn default_handler() -> &'static AssertHandler {
    static DEFAULT: OnceLock<AssertHandler> = OnceLock::new();
    DEFAULT.get_or_init(|| {
        AssertHandler::from_config(Config {
            exit: ExitAction::noop(),
            ..Config::default()
        })
    })
}

fn resolve(opts: &[AssertOption]) -> AssertHandler {
    default_handler().view(opts)
}

pub fn assert(ctx: &Context, truth: bool, msg: &str, opts: &[AssertOption]) {
    resolve(opts).assert(ctx, truth, msg, &[]);
}

pub fn assert_with_timeout(
    ctx: &Context,
    timeout: Duration,
    truth: bool,
    msg: &str,
    opts: &[AssertOption],
) {
    resolve(opts).assert_with_timeout(ctx, timeout, truth, msg, &[]);
}

pub fn nil<T: Debug>(ctx: &Context, item: Option<T>, msg: &str, opts: &[AssertOption]) {
    resolve(opts).nil(ctx, item, msg, &[]);
}

pub fn not_nil<T>(ctx: &Context, item: Option<T>, msg: &str, opts: &[AssertOption]) {
    resolve(opts).not_nil(ctx, item, msg, &[]);
}

pub fn never(ctx: &Context, msg: &str, opts: &[AssertOption]) {
    resolve(opts).never(ctx, msg, &[]);
}

pub fn no_error<T, E: Display>(
    ctx: &Context,
    result: &Result<T, E>,
    msg: &str,
    opts: &[AssertOption],
) {
    resolve(opts).no_error(ctx, result, msg, &[]);
}

pub fn not_empty<T>(ctx: &Context, value: &T, msg: &str, opts: &[AssertOption])
where
    T: IsEmpty + Debug + ?Sized,
{
    resolve(opts).not_empty(ctx, value, msg, &[]);
}

pub fn equal<T>(ctx: &Context, expected: &T, actual: &T, msg: &str, opts: &[AssertOption])
where
    T: PartialEq + Debug + ?Sized,
{
    resolve(opts).equal(ctx, expected, actual, msg, &[]);
}

pub fn not_equal<T>(ctx: &Context, expected: &T, actual: &T, msg: &str, opts: &[AssertOption])
where
    T: PartialEq + Debug + ?Sized,
{
    resolve(opts).not_equal(ctx, expected, actual, msg, &[]);
}

pub fn contains(ctx: &Context, haystack: &str, needle: &str, msg: &str, opts: &[AssertOption]) {
    resolve(opts).contains(ctx, haystack, needle, msg, &[]);
}

pub fn not_contains(ctx: &Context, haystack: &str, needle: &str, msg: &str, opts: &[AssertOption]) {
    resolve(opts).not_contains(ctx, haystack, needle, msg, &[]);
}

pub fn is_true(ctx: &Context, value: bool, msg: &str, opts: &[AssertOption]) {
    resolve(opts).is_true(ctx, value, msg, &[]);
}

pub fn is_false(ctx: &Context, value: bool, msg: &str, opts: &[AssertOption]) {
    resolve(opts).is_false(ctx, value, msg, &[]);
}

/// Drain the default handler's deferred queue, with `opts` applied to the
/// write and the termination action.
pub fn process_deferred_assertions(ctx: &Context, opts: &[AssertOption]) {
    default_handler().process_deferred_with(ctx, opts);
}
