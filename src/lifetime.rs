//! Allocation lifetime reconstruction
//!
//! Allocators recycle addresses, so a raw pointer value is a changing key,
//! not a stable identity. Each address runs a small cycle of states:
//! free-or-unseen, live, free-or-unseen again. Events are processed
//! strictly in file order, which is the authoritative tie-break when
//! timestamps collide or are the 0 sentinel.

use crate::event::{Event, EventKind};
use std::collections::HashMap;

/// A reconstructed span during which one address held a live block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub address: String,
    pub size_bytes: u64,
    pub thread_id: u64,
    pub start_ts: u64,
    /// `None` = still live at end of trace
    pub end_ts: Option<u64>,
    /// True only when the close came from an observed FREE; a close
    /// forced by address reuse leaves this false
    pub freed: bool,
}

impl Interval {
    pub fn is_open(&self) -> bool {
        self.end_ts.is_none()
    }

    /// Closed-interval duration in nanoseconds; `None` while open
    pub fn duration_ns(&self) -> Option<u64> {
        self.end_ts.map(|end| end.saturating_sub(self.start_ts))
    }
}

/// Output of one reconstruction pass over an event sequence
#[derive(Debug, Default)]
pub struct Reconstruction {
    /// Every interval ever opened, in creation (file) order. Intervals are
    /// only ever closed, never removed.
    pub intervals: Vec<Interval>,
    /// FREEs that matched no open interval. Normal for blocks allocated
    /// before tracing began; they feed aggregate counts only.
    pub unmatched_frees: u64,
}

impl Reconstruction {
    /// Intervals still open at end of trace, in creation order
    pub fn live_set(&self) -> Vec<&Interval> {
        self.intervals.iter().filter(|iv| iv.is_open()).collect()
    }

    /// Bytes held by the live set
    pub fn live_bytes(&self) -> u64 {
        self.live_set()
            .iter()
            .map(|iv| iv.size_bytes)
            .fold(0, u64::saturating_add)
    }
}

/// Rebuild allocation intervals from a canonical event sequence.
///
/// An allocating event at an address that already has an open interval
/// implicitly closes the prior interval at the current event's timestamp:
/// the real allocator reused a freed block whose FREE was lost or predates
/// this log. REALLOC closes and reopens at the resulting address (logs
/// record only the pointer the call returned). Events with no usable
/// address and unknown kinds never touch interval state.
pub fn reconstruct(events: &[Event]) -> Reconstruction {
    let mut out = Reconstruction::default();
    // address -> index of its open interval in `out.intervals`
    let mut open: HashMap<String, usize> = HashMap::new();

    for ev in events {
        if !ev.has_address() {
            continue;
        }

        if ev.kind.is_allocating() {
            if let Some(prior) = open.insert(ev.address.clone(), out.intervals.len()) {
                out.intervals[prior].end_ts = Some(ev.timestamp_ns);
            }
            out.intervals.push(Interval {
                address: ev.address.clone(),
                size_bytes: ev.size_bytes,
                thread_id: ev.thread_id,
                start_ts: ev.timestamp_ns,
                end_ts: None,
                freed: false,
            });
        } else if ev.kind == EventKind::Free {
            match open.remove(&ev.address) {
                Some(idx) => {
                    out.intervals[idx].end_ts = Some(ev.timestamp_ns);
                    out.intervals[idx].freed = true;
                }
                None => out.unmatched_frees += 1,
            }
        }
    }

    out
}
