use chrono::{DateTime, Local};
use std::cell::RefCell;

/// One failed interaction attempt
#[derive(Debug, Clone)]
pub struct DiagnosticEntry {
    /// Operation label, e.g. `click_saveButton`
    pub label: String,
    /// 1-based attempt number
    pub attempt: u32,
    pub cause: String,
    pub recorded_at: DateTime<Local>,
}

/// Append-only record of failed attempts.
///
/// Entries are never removed; callers read a snapshot through [`Self::entries`].
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: RefCell<Vec<DiagnosticEntry>>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, label: &str, attempt: u32, cause: impl ToString) {
        self.entries.borrow_mut().push(DiagnosticEntry {
            label: label.to_string(),
            attempt,
            cause: cause.to_string(),
            recorded_at: Local::now(),
        });
    }

    pub fn entries(&self) -> Vec<DiagnosticEntry> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Entries recorded under a single operation label
    pub fn for_label(&self, label: &str) -> Vec<DiagnosticEntry> {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.label == label)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_insertion_order() {
        let log = DiagnosticLog::new();
        log.record("click_save", 1, "timed out");
        log.record("read_text_total", 1, "stale");
        log.record("click_save", 2, "timed out");

        let entries = log.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].attempt, 2);
        assert_eq!(log.for_label("click_save").len(), 2);
        assert!(!log.is_empty());
    }
}
