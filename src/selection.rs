//! Replay selection policy
//!
//! A literal unbounded replay of a long-running process's live set risks
//! address-space exhaustion on the replay host. The selection keeps the
//! largest contributors to resident bytes under two caps: an object count
//! and a per-object size clamp. It is a pure function of its inputs.

use crate::lifetime::Interval;

pub const DEFAULT_MAX_OBJECTS: usize = 5000;
pub const DEFAULT_MAX_OBJECT_BYTES: u64 = 16 * 1024 * 1024;

/// Caps applied when drawing a replay selection from a live set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayBudget {
    pub max_objects: usize,
    pub max_object_bytes: u64,
}

impl Default for ReplayBudget {
    fn default() -> Self {
        Self {
            max_objects: DEFAULT_MAX_OBJECTS,
            max_object_bytes: DEFAULT_MAX_OBJECT_BYTES,
        }
    }
}

/// One object the replay will allocate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayEntry {
    pub size_bytes: u64,
    pub thread_id: u64,
}

/// Pick a bounded, deterministic subset of the live set.
///
/// Largest sizes first (they dominate the resident footprint), each
/// clamped to the per-object cap, at most `max_objects` entries.
/// Zero-size live blocks carry no resident weight and are dropped. The
/// sort is stable, so ties keep live-set order and identical inputs
/// always yield the identical ordered selection.
pub fn select(live_set: &[&Interval], budget: ReplayBudget) -> Vec<ReplayEntry> {
    let mut entries: Vec<ReplayEntry> = live_set
        .iter()
        .filter(|iv| iv.size_bytes > 0)
        .map(|iv| ReplayEntry {
            size_bytes: iv.size_bytes,
            thread_id: iv.thread_id,
        })
        .collect();

    entries.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
    for entry in &mut entries {
        entry.size_bytes = entry.size_bytes.min(budget.max_object_bytes);
    }
    entries.truncate(budget.max_objects);
    entries
}
