use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{config::PageConfig, telemetry::Telemetry};

pub trait Clock {
    /// Wall-clock time in unix milliseconds.
    fn now_millis(&self) -> i64;
}

type Cleanup = Box<dyn FnOnce()>;

/// Everything a page component needs, handed over at construction instead of
/// living in module-level globals.
pub struct PageContext {
    config: PageConfig,
    clock: Rc<dyn Clock>,
    telemetry: Telemetry,
    cleanups: RefCell<Vec<Cleanup>>,
    torn_down: Cell<bool>,
}

impl PageContext {
    pub fn new(config: PageConfig, clock: Rc<dyn Clock>, telemetry: Telemetry) -> Self {
        Self {
            config,
            clock,
            telemetry,
            cleanups: RefCell::new(Vec::new()),
            torn_down: Cell::new(false),
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn clock(&self) -> Rc<dyn Clock> {
        self.clock.clone()
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.get()
    }

    pub fn on_teardown(&self, cleanup: impl FnOnce() + 'static) {
        if self.torn_down.get() {
            cleanup();
            return;
        }

        self.cleanups.borrow_mut().push(Box::new(cleanup));
    }

    pub fn track(&self, handle: StopHandle) {
        self.on_teardown(move || handle.stop());
    }

    /// Handles `pagehide`. A page entering the back/forward cache keeps its
    /// components alive so it still works when the visitor returns.
    pub fn page_hidden(&self, persisted: bool) {
        if persisted {
            self.telemetry
                .debug("page_frozen", serde_json::json!({ "persisted": true }));
            return;
        }

        self.teardown();
    }

    /// Runs every registered cleanup once, newest first.
    pub fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }

        let cleanups = std::mem::take(&mut *self.cleanups.borrow_mut());
        let count = cleanups.len();
        for cleanup in cleanups.into_iter().rev() {
            cleanup();
        }

        self.telemetry
            .info("page_teardown", serde_json::json!({ "cleanups": count }));
    }
}

#[derive(Clone, Default)]
pub struct StopToken(Rc<Cell<bool>>);

impl StopToken {
    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

/// Returned by every self-rescheduling loop so its host can end it.
pub struct StopHandle {
    token: StopToken,
    cancel: RefCell<Option<Cleanup>>,
}

impl StopHandle {
    pub fn new(token: StopToken, cancel: impl FnOnce() + 'static) -> Self {
        Self {
            token,
            cancel: RefCell::new(Some(Box::new(cancel))),
        }
    }

    pub fn token(&self) -> StopToken {
        self.token.clone()
    }

    pub fn stop(&self) {
        self.token.0.set(true);
        if let Some(cancel) = self.cancel.borrow_mut().take() {
            cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_context;

    #[test]
    fn teardown_runs_cleanups_once_in_reverse_order() {
        let (context, sink) = test_context();
        let order = Rc::new(RefCell::new(Vec::new()));

        for index in 0..3 {
            let order = order.clone();
            context.on_teardown(move || order.borrow_mut().push(index));
        }

        context.teardown();
        context.teardown();

        assert_eq!(*order.borrow(), vec![2, 1, 0]);
        assert!(context.is_torn_down());
        assert_eq!(sink.event_names(), vec!["page_teardown"]);
    }

    #[test]
    fn cleanup_registered_after_teardown_runs_immediately() {
        let (context, _sink) = test_context();
        context.teardown();

        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        context.on_teardown(move || flag.set(true));

        assert!(ran.get());
    }

    #[test]
    fn persisted_pagehide_keeps_components_running() {
        let (context, sink) = test_context();
        let handle = StopHandle::new(StopToken::default(), || {});
        let token = handle.token();
        context.track(handle);

        context.page_hidden(true);
        context.page_hidden(true);

        assert!(!token.is_stopped());
        assert!(!context.is_torn_down());
        assert_eq!(sink.event_names(), vec!["page_frozen", "page_frozen"]);

        context.page_hidden(false);

        assert!(token.is_stopped());
        assert!(context.is_torn_down());
        assert_eq!(
            sink.event_names(),
            vec!["page_frozen", "page_frozen", "page_teardown"]
        );
    }

    #[test]
    fn stop_handle_flags_token_and_cancels_once() {
        let cancels = Rc::new(Cell::new(0));
        let counter = cancels.clone();
        let handle = StopHandle::new(StopToken::default(), move || counter.set(counter.get() + 1));
        let token = handle.token();

        assert!(!token.is_stopped());
        handle.stop();
        handle.stop();

        assert!(token.is_stopped());
        assert_eq!(cancels.get(), 1);
    }

    #[test]
    fn tracked_handles_stop_on_teardown() {
        let (context, _sink) = test_context();
        let handle = StopHandle::new(StopToken::default(), || {});
        let token = handle.token();

        context.track(handle);
        assert!(!token.is_stopped());

        context.teardown();
        assert!(token.is_stopped());
    }
}
