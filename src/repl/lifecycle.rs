//! Exit, uncaught failure and unhandled rejection handling.

use super::Repl;
use crate::error::ConfigError;
use crate::events::Event;
use crate::ui::theme;
use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Once;
use std::thread;

static PANIC_HOOK_SET: Once = Once::new();

thread_local! {
    /// Set while this thread runs work whose panics the REPL reports itself.
    static CATCHING_PANICS: Cell<bool> = const { Cell::new(false) };
}

/// How a guarded piece of work ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Completed,
    /// Failed, was reported, the session goes on
    Recovered,
    /// Misconfiguration; the session must end with status 1
    Fatal,
}

/// Reports failures from background work to the REPL.
///
/// Reports are picked up between key presses, announced as
/// `unhandled-rejection` and never end the session.
#[derive(Debug, Clone)]
pub struct RejectionHandle {
    tx: Sender<String>,
}

impl RejectionHandle {
    pub(crate) fn new(tx: Sender<String>) -> Self {
        Self { tx }
    }

    pub fn reject(&self, reason: impl fmt::Display) {
        let reason = reason.to_string();
        if self.tx.send(reason).is_err() {
            log::warn!("rejection reported after the repl was dropped");
        }
    }
}

pub(crate) struct LifecycleHandler<'r> {
    repl: &'r Repl,
}

impl<'r> LifecycleHandler<'r> {
    pub(crate) fn new(repl: &'r Repl) -> Self {
        Self { repl }
    }

    /// Run `work`, sending errors and panics to `uncaught`.
    pub(crate) fn catch_failure<F>(&self, work: F) -> Outcome
    where
        F: FnOnce() -> anyhow::Result<()>,
    {
        match catch_panics(work) {
            Ok(Ok(())) => Outcome::Completed,
            Ok(Err(err)) => self.uncaught(&err),
            Err(payload) => {
                let err = anyhow::anyhow!("panicked: {}", panic_message(payload.as_ref()));
                self.uncaught(&err)
            }
        }
    }

    /// Report a failure nobody handled.
    ///
    /// A `ConfigError` gets one diagnostic line and is fatal. Anything else
    /// is printed with its causes and announced as `uncaught-error`.
    pub(crate) fn uncaught(&self, err: &anyhow::Error) -> Outcome {
        if let Some(config) = err.downcast_ref::<ConfigError>() {
            log::error!("configuration error: {config}");
            self.repl.print(&format!(
                "\n{} {}",
                theme::error("ConfigError"),
                theme::heading(&config.to_string())
            ));
            return Outcome::Fatal;
        }

        log::warn!("uncaught failure: {err:#}");
        let mut report = format!("\n{} {}", theme::error("Error"), theme::heading(&err.to_string()));
        for cause in err.chain().skip(1) {
            report.push_str(&format!("\n{}", theme::muted(&format!("  caused by: {cause}"))));
        }
        self.repl.print(&report);

        let event = Event::UncaughtError {
            message: format!("{err:#}"),
        };
        if let Err(e) = self.emit_guarded(&event) {
            log::error!("uncaught-error listener failed: {e:#}");
        }
        Outcome::Recovered
    }

    /// Announce and print every queued rejection.
    pub(crate) fn drain_rejections(&self, rejections: &Receiver<String>) -> Outcome {
        let mut outcome = Outcome::Completed;
        while let Ok(reason) = rejections.try_recv() {
            match self.rejection(&reason) {
                Outcome::Fatal => return Outcome::Fatal,
                _ => outcome = Outcome::Recovered,
            }
        }
        outcome
    }

    fn rejection(&self, reason: &str) -> Outcome {
        log::warn!("unhandled rejection: {reason}");
        let outcome = self.catch_failure(|| {
            self.repl.emit(&Event::UnhandledRejection {
                reason: reason.to_string(),
            })
        });
        if outcome == Outcome::Fatal {
            return outcome;
        }

        let named = if reason.is_empty() {
            String::new()
        } else {
            format!(" {}", theme::heading("named"))
        };
        self.repl.print(&format!(
            "\n{}{} {}",
            theme::error("unhandledRejection"),
            named,
            theme::heading(reason)
        ));
        self.repl.redisplay();
        Outcome::Recovered
    }

    /// Announce the end of the session.
    pub(crate) fn exit(&self, code: i32) {
        let name = self.repl.options.borrow().name.clone();
        let event = Event::Exit { code };
        let result = self.emit_guarded_or_else(&event, || {
            self.repl.print(&format!(
                "\n{} {} {}",
                theme::command(&name),
                theme::heading("exited with status"),
                theme::command(&code.to_string())
            ));
        });
        if let Err(e) = result {
            log::error!("exit listener failed: {e:#}");
        }
    }

    fn emit_guarded(&self, event: &Event) -> anyhow::Result<()> {
        self.emit_guarded_or_else(event, || {})
    }

    // Panicking listeners come back as errors for the caller to log.
    fn emit_guarded_or_else<F: FnOnce()>(&self, event: &Event, fallback: F) -> anyhow::Result<()> {
        let repl = self.repl;
        catch_panics(|| repl.events.emit_or_else(repl, event, fallback))
            .unwrap_or_else(|payload| {
                Err(anyhow::anyhow!("panicked: {}", panic_message(payload.as_ref())))
            })
    }
}

/// `catch_unwind` with the default "thread panicked" report silenced.
///
/// Panics outside of this (other threads, host code) still reach the hook
/// that was installed before the REPL's.
fn catch_panics<R>(work: impl FnOnce() -> R) -> thread::Result<R> {
    install_panic_hook();
    let outer = CATCHING_PANICS.with(|catching| catching.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(work));
    CATCHING_PANICS.with(|catching| catching.set(outer));
    result
}

fn install_panic_hook() {
    PANIC_HOOK_SET.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CATCHING_PANICS.with(Cell::get) {
                log::error!("panic: {info}");
            } else {
                previous(info);
            }
        }));
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
