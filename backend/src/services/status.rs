//! Operator-visible status board.
//!
//! Connection results, combined-analysis warnings and query failures are
//! recorded here so the presentation layer can show them next to the views.
//! The board keeps the most recent entries only.

use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::api::StoreKind;

/// Default number of entries kept.
pub const DEFAULT_STATUS_CAPACITY: usize = 200;

/// A single status entry with timestamp and message.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StatusEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: StatusLevel,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub store: Option<StoreKind>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// In-memory status board, shared by clone.
#[derive(Clone)]
pub struct StatusBoard {
    entries: Arc<RwLock<VecDeque<StatusEntry>>>,
    capacity: usize,
}

impl StatusBoard {
    /// Create a board keeping [`DEFAULT_STATUS_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_STATUS_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    /// Add an entry, evicting the oldest one when full.
    pub fn record(&self, level: StatusLevel, store: Option<StoreKind>, message: impl Into<String>) {
        let mut entries = self.entries.write();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(StatusEntry {
            timestamp: chrono::Utc::now(),
            level,
            store,
            message: message.into(),
        });
    }

    pub fn success(&self, store: StoreKind, message: impl Into<String>) {
        self.record(StatusLevel::Success, Some(store), message);
    }

    pub fn warning(&self, store: Option<StoreKind>, message: impl Into<String>) {
        self.record(StatusLevel::Warning, store, message);
    }

    pub fn error(&self, store: StoreKind, message: impl Into<String>) {
        self.record(StatusLevel::Error, Some(store), message);
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<StatusEntry> {
        self.entries.read().iter().cloned().collect()
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<StatusEntry> {
        self.entries.read().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}
