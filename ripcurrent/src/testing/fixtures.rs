//! Shared collectors for inspecting what a sink received.

use parking_lot::Mutex;
use std::fmt::Display;
use std::sync::Arc;

/// A cloneable, thread-safe list that sinks push into.
///
/// Clones share the same storage, so a test keeps one handle and passes a
/// clone to the node's constructor.
#[derive(Debug)]
pub struct Collected<T> {
    items: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for Collected<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Default for Collected<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T> Collected<T> {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value.
    pub fn push(&self, item: T) {
        self.items.lock().push(item);
    }

    /// Number of values collected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Returns true if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Drops everything collected so far.
    pub fn clear(&self) {
        self.items.lock().clear();
    }
}

impl<T: Clone> Collected<T> {
    /// Copies the collected values out.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.items.lock().clone()
    }
}

impl<T: Display> Collected<T> {
    /// Renders the values joined by `sep`, e.g. `"1,2,3"`.
    #[must_use]
    pub fn joined(&self, sep: &str) -> String {
        self.items
            .lock()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(sep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_storage() {
        let collected = Collected::<i32>::new();
        let handle = collected.clone();
        handle.push(1);
        handle.push(2);
        assert_eq!(collected.len(), 2);
        assert_eq!(collected.joined(","), "1,2");
        collected.clear();
        assert!(handle.is_empty());
    }
}
