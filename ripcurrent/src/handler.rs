//! Process-wide error handler for leaked pipeline fragments.
//!
//! A fragment dropped without being realized, dismissed, described, or
//! composed into a larger fragment is reported here. The default handler
//! logs the report and panics. Tests swap it for the duration of a check with
//! [`ErrorHandler::scoped_inject`].

use parking_lot::{ReentrantMutex, ReentrantMutexGuard, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};
use tracing::error;

/// First line of every leak report.
pub const LEAK_BANNER: &str = "pipeline fragment leaked";

/// Callback receiving a complete, multi-line report.
pub type HandlerFn = Arc<dyn Fn(&str) + Send + Sync>;

struct Handlers {
    base: HandlerFn,
    /// Scoped overrides, innermost last, keyed by scope id.
    scoped: Vec<(u64, HandlerFn)>,
}

impl Handlers {
    fn active(&self) -> HandlerFn {
        self.scoped
            .last()
            .map_or_else(|| Arc::clone(&self.base), |(_, handler)| Arc::clone(handler))
    }
}

/// Registry holding the active handler.
///
/// The active handler is the innermost live scoped override, or the base
/// handler when no scope is alive.
pub struct ErrorHandler {
    handlers: RwLock<Handlers>,
    overrides: ReentrantMutex<()>,
    next_scope: AtomicU64,
}

static ERROR_HANDLER: LazyLock<ErrorHandler> = LazyLock::new(ErrorHandler::new);

impl ErrorHandler {
    fn new() -> Self {
        let base: HandlerFn = Arc::new(fatal_report);
        Self {
            handlers: RwLock::new(Handlers {
                base,
                scoped: Vec::new(),
            }),
            overrides: ReentrantMutex::new(()),
            next_scope: AtomicU64::new(0),
        }
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static Self {
        &ERROR_HANDLER
    }

    /// Sends a report to the active handler.
    ///
    /// The handler is called without holding the registry lock, so it may
    /// itself drop fragments or panic.
    pub fn report(&self, message: &str) {
        let handler = self.handlers.read().active();
        handler(message);
    }

    /// Replaces the base handler for the rest of the process, returning the
    /// previous one. Live scoped overrides keep precedence.
    pub fn install<F>(&self, handler: F) -> HandlerFn
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let _serial = self.overrides.lock();
        std::mem::replace(&mut self.handlers.write().base, Arc::new(handler))
    }

    /// Installs `handler` until the returned scope is dropped.
    ///
    /// Scopes are serialized process-wide: a second scope on another thread
    /// waits until the first one is gone. Nesting on the same thread is
    /// allowed, and scopes may be dropped in any order; each one removes only
    /// its own handler.
    pub fn scoped_inject<F>(&'static self, handler: F) -> HandlerScope
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let serial = self.overrides.lock();
        let id = self.next_scope.fetch_add(1, Ordering::Relaxed);
        self.handlers.write().scoped.push((id, Arc::new(handler)));
        HandlerScope {
            registry: self,
            id,
            _serial: serial,
        }
    }
}

impl std::fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorHandler")
            .field("scoped", &self.handlers.read().scoped.len())
            .finish_non_exhaustive()
    }
}

/// Removes its handler from the registry when dropped.
#[must_use = "the injected handler is removed as soon as the scope is dropped"]
pub struct HandlerScope {
    registry: &'static ErrorHandler,
    id: u64,
    _serial: ReentrantMutexGuard<'static, ()>,
}

impl Drop for HandlerScope {
    fn drop(&mut self) {
        self.registry
            .handlers
            .write()
            .scoped
            .retain(|(id, _)| *id != self.id);
    }
}

impl std::fmt::Debug for HandlerScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerScope").field("id", &self.id).finish_non_exhaustive()
    }
}

fn fatal_report(message: &str) {
    error!(report = %message, "{}", LEAK_BANNER);
    // A second panic while unwinding would abort and hide the first one.
    if !std::thread::panicking() {
        panic!("{message}");
    }
}

/// Builds the leak report for a fragment.
pub(crate) fn leak_report(description: &str, typed_description: &str) -> String {
    format!(
        "{LEAK_BANNER}\n{description}\n{typed_description}\n\
         call `sync()`, `realize()` or `dismiss()` on every fragment"
    )
}
