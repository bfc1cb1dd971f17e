//! Bounded log of evaluated expressions

use serde::Serialize;
use std::collections::VecDeque;

use crate::core::format::format_number;

/// A single entry in the calculation history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// The expression that was evaluated, as typed
    pub expression: String,
    /// The result of the calculation
    pub result: f64,
}

impl HistoryEntry {
    /// Creates a new history entry
    #[must_use]
    pub fn new(expression: impl Into<String>, result: f64) -> Self {
        Self {
            expression: expression.into(),
            result,
        }
    }

    /// Returns `"<expression> = <result>"`
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} = {}", self.expression, format_number(self.result))
    }
}

/// Calculation history with FIFO eviction once `max_entries` is reached
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Number of entries the calculator keeps
    pub const DEFAULT_MAX_ENTRIES: usize = 5;

    /// Creates a new history with the default capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_ENTRIES)
    }

    /// Creates a history with a custom maximum size
    #[must_use]
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    /// Adds an entry, evicting the oldest ones beyond capacity
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// Adds a calculation result to the history
    pub fn record(&mut self, expression: &str, result: f64) {
        self.push(HistoryEntry::new(expression, result));
    }

    /// Returns the number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the history is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the entries (oldest first)
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Returns an iterator over the entries (newest first)
    pub fn iter_rev(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// Returns the most recent entry
    #[must_use]
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    // ===== HistoryEntry tests =====

    #[test]
    fn test_history_entry_display() {
        assert_eq!(HistoryEntry::new("5+3", 8.0).display(), "5+3 = 8");
        assert_eq!(HistoryEntry::new("1/4", 0.25).display(), "1/4 = 0.25");
    }

    #[test]
    fn test_history_entry_serialize() {
        let entry = HistoryEntry::new("2**3", 8.0);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"expression\":\"2**3\""));
        assert!(json.contains("\"result\":8.0"));
    }

    // ===== History tests =====

    #[test]
    fn test_history_new() {
        let history = History::new();
        assert!(history.is_empty());
        assert_eq!(History::DEFAULT_MAX_ENTRIES, 5);
    }

    #[test]
    fn test_history_record() {
        let mut history = History::new();
        history.record("3+4", 7.0);
        assert_eq!(history.len(), 1);
        assert_eq!(history.last().unwrap().expression, "3+4");
        assert_eq!(history.last().unwrap().result, 7.0);
    }

    #[test]
    fn test_history_evicts_oldest_first() {
        let mut history = History::new();
        for i in 1..=6 {
            history.record(&format!("{i}+0"), f64::from(i));
        }

        assert_eq!(history.len(), 5);
        assert_eq!(history.iter().next().unwrap().expression, "2+0");
        assert_eq!(history.last().unwrap().expression, "6+0");
    }

    #[test]
    fn test_history_custom_capacity() {
        let mut history = History::with_capacity(2);
        history.record("1", 1.0);
        history.record("2", 2.0);
        history.record("3", 3.0);
        let results: Vec<f64> = history.iter().map(|e| e.result).collect();
        assert_eq!(results, vec![2.0, 3.0]);
    }

    #[test]
    fn test_history_zero_capacity_keeps_nothing() {
        let mut history = History::with_capacity(0);
        history.record("1", 1.0);
        assert!(history.is_empty());
    }

    #[test]
    fn test_history_iter_rev() {
        let mut history = History::new();
        history.record("a", 1.0);
        history.record("b", 2.0);
        let newest_first: Vec<&str> = history.iter_rev().map(|e| e.expression.as_str()).collect();
        assert_eq!(newest_first, vec!["b", "a"]);
    }
}
