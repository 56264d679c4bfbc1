//! Termination actions invoked after a failure.

use std::fmt;
use std::sync::Arc;

/// Status code passed to the termination action for every failure.
pub const FAILURE_EXIT_CODE: i32 = 1;

#[derive(Clone)]
enum Kind {
    ProcessExit,
    Noop,
    Panic,
    Custom(Arc<dyn Fn(i32) + Send + Sync>),
}

/// What happens once a failure has been reported.
#[derive(Clone)]
pub struct ExitAction {
    kind: Kind,
}

impl ExitAction {
    /// Run an arbitrary closure with the status code.
    #[must_use]
    pub fn new(f: impl Fn(i32) + Send + Sync + 'static) -> Self {
        Self {
            kind: Kind::Custom(Arc::new(f)),
        }
    }

    /// Terminate the process with the status code.
    #[must_use]
    pub const fn process_exit() -> Self {
        Self {
            kind: Kind::ProcessExit,
        }
    }

    /// Do nothing; execution continues.
    #[must_use]
    pub const fn noop() -> Self {
        Self { kind: Kind::Noop }
    }

    /// Panic with a message carrying the status code.
    #[must_use]
    pub const fn panic() -> Self {
        Self { kind: Kind::Panic }
    }

    /// Invoke the action.
    #[allow(clippy::panic)]
    pub fn invoke(&self, code: i32) {
        match &self.kind {
            Kind::ProcessExit => std::process::exit(code),
            Kind::Noop => {}
            Kind::Panic => panic!("assertion failed with exit code {code}"),
            Kind::Custom(f) => f(code),
        }
    }
}

impl Default for ExitAction {
    fn default() -> Self {
        Self::process_exit()
    }
}

impl fmt::Debug for ExitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.kind {
            Kind::ProcessExit => "ExitAction::ProcessExit",
            Kind::Noop => "ExitAction::Noop",
            Kind::Panic => "ExitAction::Panic",
            Kind::Custom(_) => "ExitAction::Custom",
        })
    }
}
