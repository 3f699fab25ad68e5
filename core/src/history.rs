//! Windowed history: an ordered list of time spans with accumulated data.

use kardia_types::Timestamp;

/// One window: a span with the items collected while it was open.
/// `end == None` means the window is still open.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry<T> {
    pub start: Timestamp,
    pub end: Option<Timestamp>,
    pub data: Vec<T>,
}

impl<T> HistoryEntry<T> {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Span length for a closed window.
    pub fn duration(&self) -> Option<Timestamp> {
        self.end.map(|end| end - self.start)
    }
}

/// Ordered window entries with at most one open window at a time.
///
/// The primitive operations report whether they did anything; what to do
/// about a rejected open/close (force-close, ignore, warn) is a policy of
/// the owning module.
#[derive(Debug, Clone, PartialEq)]
pub struct History<T> {
    entries: Vec<HistoryEntry<T>>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Open a new window. Refused (returns false) while one is open.
    pub fn open(&mut self, start: Timestamp) -> bool {
        if self.current().is_some() {
            return false;
        }
        self.entries.push(HistoryEntry {
            start,
            end: None,
            data: Vec::new(),
        });
        true
    }

    /// Close the open window. Closing with nothing open is a no-op.
    pub fn close(&mut self, end: Timestamp) -> bool {
        match self.current_mut() {
            Some(entry) => {
                entry.end = Some(end);
                true
            }
            None => false,
        }
    }

    /// Append into the open window. Dropped (returns false) when none is open.
    pub fn append(&mut self, item: T) -> bool {
        match self.current_mut() {
            Some(entry) => {
                entry.data.push(item);
                true
            }
            None => false,
        }
    }

    /// The open window, if any. Only the newest entry can be open.
    pub fn current(&self) -> Option<&HistoryEntry<T>> {
        self.entries.last().filter(|e| e.is_open())
    }

    pub fn current_mut(&mut self) -> Option<&mut HistoryEntry<T>> {
        self.entries.last_mut().filter(|e| e.is_open())
    }

    /// The newest entry, open or closed.
    pub fn last(&self) -> Option<&HistoryEntry<T>> {
        self.entries.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut HistoryEntry<T>> {
        self.entries.last_mut()
    }

    pub fn entries(&self) -> &[HistoryEntry<T>] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<HistoryEntry<T>> {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_append_close() {
        let mut history: History<u32> = History::new();
        assert!(history.open(1_000));
        assert!(history.append(1));
        assert!(history.append(2));
        assert!(history.close(5_000));

        let entries = history.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].start, 1_000);
        assert_eq!(entries[0].end, Some(5_000));
        assert_eq!(entries[0].data, vec![1, 2]);
        assert_eq!(entries[0].duration(), Some(4_000));
    }

    #[test]
    fn test_at_most_one_open_window() {
        let mut history: History<u32> = History::new();
        assert!(history.open(1_000));
        assert!(!history.open(2_000), "second open must be refused");
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_close_without_open_is_noop() {
        let mut history: History<u32> = History::new();
        assert!(!history.close(1_000));
        history.open(1_000);
        history.close(2_000);
        assert!(!history.close(3_000), "window already closed");
        assert_eq!(history.entries()[0].end, Some(2_000));
    }

    #[test]
    fn test_append_outside_window_is_dropped() {
        let mut history: History<u32> = History::new();
        assert!(!history.append(1));
        history.open(1_000);
        history.close(2_000);
        assert!(!history.append(2));
        assert!(history.entries()[0].data.is_empty());
    }

    #[test]
    fn test_zero_item_window_is_still_recorded() {
        let mut history: History<u32> = History::new();
        history.open(1_000);
        history.close(2_000);
        assert_eq!(history.len(), 1);
        assert!(history.entries()[0].data.is_empty());
    }

    #[test]
    fn test_reopen_after_close() {
        let mut history: History<u32> = History::new();
        history.open(1_000);
        history.close(2_000);
        assert!(history.open(3_000));
        assert_eq!(history.len(), 2);
        assert!(history.current().is_some());
    }
}
