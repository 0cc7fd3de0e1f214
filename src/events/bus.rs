//! Synchronous publish/subscribe keyed by `EventKind`.
//!
//! Listeners receive a shared context (the `Repl` in practice) so they can
//! touch the registry or emit further events while an emission is running.

use super::{Event, EventKind};
use crate::error::ConfigError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type Listener<C> = Rc<dyn Fn(&C, &Event) -> anyhow::Result<()>>;

pub struct EventBus<C: ?Sized> {
    listeners: RefCell<HashMap<EventKind, Vec<Listener<C>>>>,
}

impl<C: ?Sized> Default for EventBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> EventBus<C> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(HashMap::new()),
        }
    }

    /// Subscribe to an event. There is no limit on listeners per event.
    pub fn on<F>(&self, kind: EventKind, listener: F)
    where
        F: Fn(&C, &Event) -> anyhow::Result<()> + 'static,
    {
        self.listeners
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(Rc::new(listener));
    }

    /// Subscribe by event name, rejecting names outside the vocabulary.
    pub fn on_named<F>(&self, name: &str, listener: F) -> Result<(), ConfigError>
    where
        F: Fn(&C, &Event) -> anyhow::Result<()> + 'static,
    {
        let kind = name.parse::<EventKind>()?;
        self.on(kind, listener);
        Ok(())
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.borrow().get(&kind).map_or(0, Vec::len)
    }

    /// Call every listener of the event's kind in subscription order.
    ///
    /// Listeners added during the emission are not called for it. The first
    /// listener error stops the emission and is returned as is.
    pub fn emit(&self, ctx: &C, event: &Event) -> anyhow::Result<()> {
        let snapshot: Vec<Listener<C>> = self
            .listeners
            .borrow()
            .get(&event.kind())
            .cloned()
            .unwrap_or_default();

        log::trace!("emit {} to {} listener(s)", event.kind(), snapshot.len());
        for listener in snapshot {
            listener(ctx, event)?;
        }
        Ok(())
    }

    /// Emit when somebody listens, otherwise run `fallback`.
    pub fn emit_or_else<F>(&self, ctx: &C, event: &Event, fallback: F) -> anyhow::Result<()>
    where
        F: FnOnce(),
    {
        if self.listener_count(event.kind()) > 0 {
            self.emit(ctx, event)
        } else {
            fallback();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    type Log = RefCell<Vec<String>>;

    #[test]
    fn test_listeners_run_in_subscription_order() {
        let bus: EventBus<Log> = EventBus::new();
        bus.on(EventKind::Line, |log: &Log, _| {
            log.borrow_mut().push("first".to_string());
            Ok(())
        });
        bus.on(EventKind::Line, |log: &Log, event| {
            if let Event::Line { line } = event {
                log.borrow_mut().push(format!("second {line}"));
            }
            Ok(())
        });

        let log = Log::default();
        bus.emit(
            &log,
            &Event::Line {
                line: "x".to_string(),
            },
        )
        .unwrap();
        assert_eq!(*log.borrow(), vec!["first", "second x"]);
    }

    #[test]
    fn test_emit_only_reaches_matching_kind() {
        let bus: EventBus<Cell<u32>> = EventBus::new();
        bus.on(EventKind::Start, |hits: &Cell<u32>, _| {
            hits.set(hits.get() + 1);
            Ok(())
        });
        let hits = Cell::new(0);
        bus.emit(&hits, &Event::Exit { code: 0 }).unwrap();
        assert_eq!(hits.get(), 0);
        bus.emit(&hits, &Event::Start).unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_no_listener_limit() {
        let bus: EventBus<Cell<u32>> = EventBus::new();
        for _ in 0..100 {
            bus.on(EventKind::Start, |hits: &Cell<u32>, _| {
                hits.set(hits.get() + 1);
                Ok(())
            });
        }
        let hits = Cell::new(0);
        bus.emit(&hits, &Event::Start).unwrap();
        assert_eq!(hits.get(), 100);
        assert_eq!(bus.listener_count(EventKind::Start), 100);
    }

    #[test]
    fn test_listener_error_propagates_and_stops_emission() {
        let bus: EventBus<Cell<u32>> = EventBus::new();
        bus.on(EventKind::Start, |_: &Cell<u32>, _| anyhow::bail!("boom"));
        bus.on(EventKind::Start, |hits: &Cell<u32>, _| {
            hits.set(hits.get() + 1);
            Ok(())
        });
        let hits = Cell::new(0);
        let err = bus.emit(&hits, &Event::Start).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_on_named_validates_names() {
        let bus: EventBus<()> = EventBus::new();
        for kind in EventKind::ALL {
            assert!(bus.on_named(kind.as_str(), |_, _| Ok(())).is_ok());
        }
        assert!(matches!(
            bus.on_named("commandz", |_, _| Ok(())),
            Err(ConfigError::UnknownEvent { .. })
        ));
        assert_eq!(
            bus.on_named("", |_, _| Ok(())),
            Err(ConfigError::MissingEventName)
        );
    }

    #[test]
    fn test_emit_or_else_runs_fallback_without_listeners() {
        let bus: EventBus<Cell<u32>> = EventBus::new();
        let fallback_ran = Cell::new(false);
        let hits = Cell::new(0);
        bus.emit_or_else(&hits, &Event::CommandNotSpecified, || {
            fallback_ran.set(true)
        })
        .unwrap();
        assert!(fallback_ran.get());

        bus.on(EventKind::CommandNotSpecified, |hits: &Cell<u32>, _| {
            hits.set(hits.get() + 1);
            Ok(())
        });
        fallback_ran.set(false);
        bus.emit_or_else(&hits, &Event::CommandNotSpecified, || {
            fallback_ran.set(true)
        })
        .unwrap();
        assert!(!fallback_ran.get());
        assert_eq!(hits.get(), 1);
    }
}
