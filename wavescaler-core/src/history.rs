//! Linear undo/redo log of document snapshots.
//!
//! ```text
//! save(d4)
//! ┌───────────────────────────────────┐
//! │ entries: [d0, d1, d2, d3, d4]     │
//! │ current:                  ^       │
//! └───────────────────────────────────┘
//!
//! undo() x2
//! ┌───────────────────────────────────┐
//! │ entries: [d0, d1, d2, d3, d4]     │
//! │ current:          ^               │
//! └───────────────────────────────────┘
//!
//! save(d5)  <-- discards d3, d4
//! ┌───────────────────────────────────┐
//! │ entries: [d0, d1, d2, d5]         │
//! │ current:              ^           │
//! └───────────────────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. `current < entries.len()` whenever the log is non-empty
//! 2. `entries.len() <= capacity` after every operation
//! 3. Consecutive saves of structurally equal documents produce one entry
//! 4. Snapshots are owned copies; callers only ever receive clones

use std::collections::VecDeque;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::diff::is_different;
use crate::model::WaveDocument;

pub const DEFAULT_CAPACITY: usize = 50;

const INITIAL_DESCRIPTION: &str = "Initial state";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of retained snapshots (at least 1).
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl HistoryConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub snapshot: WaveDocument,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    pub description: Option<String>,
}

impl HistoryEntry {
    fn new(snapshot: &WaveDocument, description: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            snapshot: snapshot.clone(),
            timestamp_ms: now_ms(),
            description: description.map(str::to_string),
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Bounded, single-branch undo/redo log.
pub struct HistoryManager {
    entries: VecDeque<HistoryEntry>,
    current: usize,
    config: HistoryConfig,
    initialized: bool,
}

impl fmt::Debug for HistoryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryManager")
            .field("len", &self.entries.len())
            .field("current", &self.current_index())
            .field("capacity", &self.config.capacity)
            .field("initialized", &self.initialized)
            .finish()
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl HistoryManager {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            entries: VecDeque::new(),
            current: 0,
            config: HistoryConfig::new(config.capacity),
            initialized: false,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(HistoryConfig::new(capacity))
    }

    // ---------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------

    /// Reset the log to a single entry holding `doc`.
    ///
    /// Only the first call on a given manager has an effect; use
    /// [`reset`](Self::reset) to start over.
    pub fn initialize(&mut self, doc: &WaveDocument) {
        if self.initialized {
            log::trace!("history already initialized");
            return;
        }
        self.entries.clear();
        self.entries
            .push_back(HistoryEntry::new(doc, Some(INITIAL_DESCRIPTION)));
        self.current = 0;
        self.initialized = true;
        log::debug!("history initialized");
    }

    /// Drop every entry and allow [`initialize`](Self::initialize) again.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.current = 0;
        self.initialized = false;
    }

    // ---------------------------------------------------------------
    // Recording
    // ---------------------------------------------------------------

    /// Record `doc` as the newest state.
    ///
    /// Returns `false` when `doc` is structurally equal to the current entry
    /// and nothing was recorded.
    pub fn save_state(&mut self, doc: &WaveDocument, description: Option<&str>) -> bool {
        if self.entries.is_empty() {
            self.entries.push_back(HistoryEntry::new(doc, description));
            self.current = 0;
            log::debug!("history: first entry recorded");
            return true;
        }

        if let Some(current) = self.entries.get(self.current) {
            if !is_different(&current.snapshot, doc) {
                log::trace!("history: duplicate state suppressed");
                return false;
            }
        }

        let discarded = self.entries.len() - (self.current + 1);
        self.entries.truncate(self.current + 1);
        self.entries.push_back(HistoryEntry::new(doc, description));
        self.current = self.entries.len() - 1;

        if self.entries.len() > self.config.capacity {
            self.entries.pop_front();
            self.current = self.current.saturating_sub(1);
            log::trace!("history: evicted oldest entry");
        }

        log::debug!(
            "history: recorded {:?} ({} entries, {} redo states discarded)",
            description.unwrap_or("edit"),
            self.entries.len(),
            discarded
        );
        true
    }

    // ---------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------

    /// Step back one entry, returning a copy of the state now current.
    pub fn undo(&mut self) -> Option<WaveDocument> {
        if !self.can_undo() {
            return None;
        }
        self.current -= 1;
        log::debug!("history: undo to {}", self.current);
        self.entries.get(self.current).map(|e| e.snapshot.clone())
    }

    /// Step forward one entry, returning a copy of the state now current.
    pub fn redo(&mut self) -> Option<WaveDocument> {
        if !self.can_redo() {
            return None;
        }
        self.current += 1;
        log::debug!("history: redo to {}", self.current);
        self.entries.get(self.current).map(|e| e.snapshot.clone())
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.current > 0
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.current < self.entries.len() - 1
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.current)
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.current)
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}
