//! Aggregate trace statistics
//!
//! Cheap sanity totals folded straight over the raw event sequence. This
//! fold is deliberately independent of interval reconstruction so the two
//! models can be cross-checked against each other.

use crate::event::{Event, EventKind};
use std::collections::HashSet;

/// Flat totals over one trace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceSummary {
    /// All records, including unknown-kind events
    pub records: u64,
    /// Allocating events (ALLOC, CALLOC, REALLOC, ALIGNED_ALLOC, POSIX_MEMALIGN)
    pub allocs: u64,
    pub frees: u64,
    /// Distinct thread ids seen across all records
    pub threads: u64,
    pub total_alloc_bytes: u64,
    /// Allocated minus freed; negative when tracing attached mid-life
    pub net_alloc_bytes: i64,
}

/// Fold the raw event sequence into aggregate totals.
pub fn summarize(events: &[Event]) -> TraceSummary {
    let mut summary = TraceSummary::default();
    let mut threads: HashSet<u64> = HashSet::new();

    for ev in events {
        summary.records += 1;
        threads.insert(ev.thread_id);

        let delta = i64::try_from(ev.size_bytes).unwrap_or(i64::MAX);
        if ev.kind.is_allocating() {
            summary.allocs += 1;
            summary.total_alloc_bytes = summary.total_alloc_bytes.saturating_add(ev.size_bytes);
            summary.net_alloc_bytes = summary.net_alloc_bytes.saturating_add(delta);
        } else if ev.kind == EventKind::Free {
            summary.frees += 1;
            summary.net_alloc_bytes = summary.net_alloc_bytes.saturating_sub(delta);
        }
    }

    summary.threads = threads.len() as u64;
    summary
}

impl TraceSummary {
    /// Render the human-readable summary block
    pub fn render_text(&self, trace_file: &str) -> String {
        let mut out = String::new();
        out.push_str("--- Memory Trace Summary ---\n");
        out.push_str(&format!("Trace file        : {}\n", trace_file));
        out.push_str(&format!("Records           : {}\n", self.records));
        out.push_str(&format!("Total allocations : {}\n", self.allocs));
        out.push_str(&format!("Total frees       : {}\n", self.frees));
        out.push_str(&format!("Threads involved  : {}\n", self.threads));
        out.push_str(&format!("Total alloc bytes : {}\n", self.total_alloc_bytes));
        out.push_str(&format!("Net alloc bytes   : {}\n", self.net_alloc_bytes));
        out.push_str("-----------------------------\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(kind: EventKind, size: u64, tid: u64) -> Event {
        Event {
            timestamp_ns: 0,
            kind,
            address: "0x1".to_string(),
            size_bytes: size,
            thread_id: tid,
        }
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary, TraceSummary::default());
    }

    #[test]
    fn test_summarize_counts_all_allocating_kinds() {
        let events = vec![
            ev(EventKind::Alloc, 10, 1),
            ev(EventKind::Calloc, 20, 1),
            ev(EventKind::Realloc, 30, 1),
            ev(EventKind::AlignedAlloc, 40, 1),
            ev(EventKind::PosixMemalign, 50, 1),
        ];
        let summary = summarize(&events);
        assert_eq!(summary.allocs, 5);
        assert_eq!(summary.frees, 0);
        assert_eq!(summary.total_alloc_bytes, 150);
        assert_eq!(summary.net_alloc_bytes, 150);
    }

    #[test]
    fn test_summarize_net_subtracts_frees() {
        let events = vec![ev(EventKind::Alloc, 100, 1), ev(EventKind::Free, 40, 1)];
        let summary = summarize(&events);
        assert_eq!(summary.total_alloc_bytes, 100);
        assert_eq!(summary.net_alloc_bytes, 60);
    }

    #[test]
    fn test_summarize_net_can_go_negative() {
        // FREEs of blocks allocated before tracing began
        let events = vec![ev(EventKind::Free, 500, 1)];
        let summary = summarize(&events);
        assert_eq!(summary.frees, 1);
        assert_eq!(summary.net_alloc_bytes, -500);
    }

    #[test]
    fn test_summarize_unknown_kinds_count_as_records_only() {
        let events = vec![
            ev(EventKind::Unknown("MMAP".to_string()), 4096, 1),
            ev(EventKind::Alloc, 8, 1),
        ];
        let summary = summarize(&events);
        assert_eq!(summary.records, 2);
        assert_eq!(summary.allocs, 1);
        assert_eq!(summary.total_alloc_bytes, 8);
    }

    #[test]
    fn test_summarize_distinct_threads() {
        let events = vec![
            ev(EventKind::Alloc, 1, 101),
            ev(EventKind::Alloc, 1, 102),
            ev(EventKind::Free, 1, 101),
            ev(EventKind::Unknown("X".to_string()), 0, 103),
        ];
        let summary = summarize(&events);
        assert_eq!(summary.threads, 3);
    }

    #[test]
    fn test_summarize_saturates_on_adversarial_sizes() {
        let events = vec![
            ev(EventKind::Alloc, u64::MAX, 1),
            ev(EventKind::Alloc, u64::MAX, 1),
        ];
        let summary = summarize(&events);
        assert_eq!(summary.total_alloc_bytes, u64::MAX);
        assert_eq!(summary.net_alloc_bytes, i64::MAX);
    }

    #[test]
    fn test_render_text_contains_all_fields() {
        let summary = summarize(&[ev(EventKind::Alloc, 100, 1)]);
        let text = summary.render_text("mftrace_log.csv");
        assert!(text.contains("Memory Trace Summary"));
        assert!(text.contains("Trace file        : mftrace_log.csv"));
        assert!(text.contains("Total allocations : 1"));
        assert!(text.contains("Net alloc bytes   : 100"));
    }
}
