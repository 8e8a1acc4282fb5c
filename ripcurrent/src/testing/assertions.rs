//! Leak-report capture and assertions.

use crate::handler::{ErrorHandler, HandlerScope, LEAK_BANNER};
use parking_lot::Mutex;
use std::sync::Arc;

/// Routes leak reports into a list for as long as it lives.
///
/// Installing a capture holds the handler's override lock, so captures in
/// concurrently running tests take turns.
#[must_use = "reports are only captured while the capture is alive"]
pub struct LeakCapture {
    reports: Arc<Mutex<Vec<String>>>,
    _scope: HandlerScope,
}

impl LeakCapture {
    /// Starts capturing.
    pub fn install() -> Self {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reports);
        let scope = ErrorHandler::global().scoped_inject(move |report| sink.lock().push(report.to_string()));
        Self {
            reports,
            _scope: scope,
        }
    }

    /// Number of reports received.
    #[must_use]
    pub fn count(&self) -> usize {
        self.reports.lock().len()
    }

    /// All reports received, oldest first.
    #[must_use]
    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().clone()
    }

    /// Most recent report.
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.reports.lock().last().cloned()
    }

    /// First two lines of the most recent report: the banner and the
    /// fragment description.
    #[must_use]
    pub fn last_two_lines(&self) -> Option<String> {
        self.last().map(|report| first_two_lines(&report))
    }
}

impl std::fmt::Debug for LeakCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeakCapture")
            .field("reports", &self.count())
            .finish_non_exhaustive()
    }
}

/// Keeps the first two lines of a report, joined by `\n`.
#[must_use]
pub fn first_two_lines(report: &str) -> String {
    report.lines().take(2).collect::<Vec<_>>().join("\n")
}

/// Asserts that exactly one leak was reported, for a fragment described as
/// `description`.
///
/// # Panics
///
/// Panics if the capture holds anything other than that single report.
pub fn assert_single_leak(capture: &LeakCapture, description: &str) {
    assert_eq!(capture.count(), 1, "expected exactly one leak report: {:?}", capture.reports());
    assert_eq!(
        capture.last_two_lines(),
        Some(format!("{LEAK_BANNER}\n{description}"))
    );
}
