//! Behavioral properties of isolated handlers.
//!
//! Each test builds its own `AssertHandler` writing to an in-memory sink, so
//! nothing here touches the process-wide default handler.

use assertkit::{
    ARGS_MARKER, AssertHandler, Context, ExitAction, JsonFormatter, STACK_MARKER, SharedBuffer,
    Sink, args, with_debug_mode, with_defer_mode, with_production_defaults, with_verbose_mode,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

struct Harness {
    handler: Arc<AssertHandler>,
    output: SharedBuffer,
    exits: Arc<AtomicUsize>,
}

impl Harness {
    fn new() -> Self {
        let (sink, output) = Sink::buffer();
        let exits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&exits);

        let handler = AssertHandler::new();
        handler.set_writer(sink);
        handler.set_exit_func(ExitAction::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        Self {
            handler: Arc::new(handler),
            output,
            exits,
        }
    }

    fn exits(&self) -> usize {
        self.exits.load(Ordering::SeqCst)
    }
}

#[test]
fn true_conditions_write_nothing_and_never_terminate() {
    let h = Harness::new();
    let ctx = Context::background();

    h.handler.assert(&ctx, true, "a", &[]);
    h.handler.nil(&ctx, None::<u8>, "b", &[]);
    h.handler.not_nil(&ctx, Some(1), "c", &[]);
    h.handler.no_error(&ctx, &Ok::<(), String>(()), "d", &[]);
    h.handler.equal(&ctx, "x", "x", "e", &[]);
    h.handler.not_equal(&ctx, &1, &2, "f", &[]);
    h.handler.contains(&ctx, "abc", "b", "g", &[]);
    h.handler.not_contains(&ctx, "abc", "z", "h", &[]);
    h.handler.not_empty(&ctx, &vec![1], "i", &[]);
    h.handler.is_true(&ctx, true, "j", &[]);
    h.handler.is_false(&ctx, false, "k", &[]);
    h.handler
        .assert_with_timeout(&ctx, Duration::from_secs(1), true, "l", &[]);

    assert!(h.output.is_empty());
    assert_eq!(h.exits(), 0);
}

#[test]
fn false_condition_reports_message_and_terminates_once() {
    let h = Harness::new();
    h.handler
        .assert(&Context::background(), false, "boom", &args!("attempt", 3));

    let output = h.output.contents();
    assert!(output.contains("msg=boom"));
    assert!(output.contains("attempt=3"));
    assert_eq!(h.exits(), 1);
}

#[test]
fn debug_and_verbose_gate_stack_and_args() {
    let h = Harness::new();
    let ctx = Context::background();

    h.handler.assert(&ctx, false, "quiet", &args!("k", "v"));
    let quiet = h.output.contents();
    assert!(!quiet.contains(STACK_MARKER));
    assert!(!quiet.contains(ARGS_MARKER));

    h.output.clear();
    h.handler.apply(&[with_debug_mode()]);
    h.handler.assert(&ctx, false, "debug", &args!("k", "v"));
    let debug = h.output.contents();
    assert!(debug.contains(STACK_MARKER));
    assert!(!debug.contains(ARGS_MARKER));

    h.output.clear();
    h.handler.apply(&[with_verbose_mode()]);
    h.handler.assert(&ctx, false, "verbose", &args!("k", "v"));
    let verbose = h.output.contents();
    assert!(verbose.contains(STACK_MARKER));
    assert!(verbose.contains(ARGS_MARKER));
}

#[test]
fn json_report_parses_with_stack_in_debug() -> Result<(), Box<dyn std::error::Error>> {
    let h = Harness::new();
    h.handler.set_formatter(JsonFormatter);
    h.handler.set_debug_mode(true);
    h.handler.assert(&Context::background(), false, "X", &[]);

    let output = h.output.contents();
    let json = output
        .strip_prefix("ASSERT\n")
        .ok_or("missing ASSERT header")?;
    let parsed: serde_json::Value = serde_json::from_str(json.trim_end())?;

    assert_eq!(parsed["assertData"]["msg"], "X");
    assert!(
        parsed["stack"]
            .as_str()
            .is_some_and(|s| s.starts_with(STACK_MARKER))
    );
    Ok(())
}

#[test]
fn deferred_failures_drain_as_one_write() {
    let h = Harness::new();
    let ctx = Context::background();
    h.handler.apply(&[with_defer_mode(true)]);

    h.handler.assert(&ctx, false, "A", &[]);
    h.handler.never(&ctx, "B", &[]);
    assert_eq!(h.exits(), 0);
    assert_eq!(h.handler.deferred_len(), 2);

    h.output.clear();
    h.handler.process_deferred_assertions(&ctx);
    let combined = h.output.contents();
    assert!(combined.contains("msg=A"));
    assert!(combined.contains("msg=B"));
    assert!(combined.find("msg=A") < combined.find("msg=B"));
    assert_eq!(h.handler.deferred_len(), 0);
    assert_eq!(h.exits(), 1);

    h.output.clear();
    h.handler.process_deferred_assertions(&ctx);
    assert!(h.output.is_empty());
    assert_eq!(h.exits(), 1);
}

#[test]
fn cancelled_context_short_circuits_failures() {
    for defer in [false, true] {
        let h = Harness::new();
        h.handler.set_defer_assertions(defer);
        let (ctx, cancel) = Context::with_cancel(&Context::background());
        cancel.cancel();

        // A passing check never reads the context.
        h.handler.assert(&ctx, true, "passing", &[]);
        h.handler.equal(&ctx, &1, &1, "same", &[]);
        assert!(h.output.is_empty());

        h.handler.assert(&ctx, false, "failing", &[]);
        h.handler.never(&ctx, "never", &[]);

        let output = h.output.contents();
        assert_eq!(output.matches("Context canceled: context canceled").count(), 2);
        assert!(!output.contains("ASSERT"));
        assert_eq!(h.handler.deferred_len(), 0);
        assert_eq!(h.exits(), 0);
    }
}

#[test]
fn timeout_bound_is_released_after_call() {
    let h = Harness::new();
    let parent = Context::background();

    h.handler
        .assert_with_timeout(&parent, Duration::from_secs(30), false, "in time", &[]);
    h.handler.assert(&parent, false, "after", &[]);

    let output = h.output.contents();
    assert!(output.contains("msg=in time"));
    assert!(output.contains("msg=after"));
    assert_eq!(h.exits(), 2);
}

#[test]
fn view_applies_options_without_touching_base() {
    let h = Harness::new();
    let view = h.handler.view(&[with_production_defaults()]);
    view.assert(&Context::background(), false, "viewed", &[]);

    assert!(h.output.contents().contains(r#""msg": "viewed""#));
    assert_eq!(h.exits(), 0);

    h.output.clear();
    h.handler.assert(&Context::background(), false, "base", &[]);
    assert!(h.output.contents().contains("msg=base"));
    assert_eq!(h.exits(), 1);
}

#[test]
fn concurrent_deferred_failures_are_all_queued() {
    let h = Harness::new();
    h.handler.set_defer_assertions(true);

    let threads: Vec<_> = (0..4)
        .map(|i| {
            let handler = Arc::clone(&h.handler);
            std::thread::spawn(move || {
                for j in 0..50 {
                    handler.assert(&Context::background(), j % 2 == 0, &format!("{i}-{j}"), &[]);
                }
            })
        })
        .collect();
    for t in threads {
        assert!(t.join().is_ok());
    }

    assert_eq!(h.handler.deferred_len(), 100);
    h.output.clear();
    h.handler.process_deferred_assertions(&Context::background());
    assert_eq!(h.output.contents().matches("   msg=").count(), 100);
    assert_eq!(h.exits(), 1);
}
