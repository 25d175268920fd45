//! Footprint-over-time views
//!
//! Two independent shapes feed the external chart renderer. The
//! cumulative net-byte curve is built straight from events and ignores
//! address matching entirely, so it stays available even when interval
//! reconstruction is ambiguous. The Gantt rows come from reconstructed
//! intervals and carry per-thread lifetime spans.

use crate::event::{Event, EventKind};
use crate::lifetime::Interval;

/// One point on the cumulative net-byte curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurvePoint {
    pub ts_ns: u64,
    pub net_bytes: i64,
}

/// Cumulative net allocated bytes over time.
///
/// Every allocating event contributes `+size` and every FREE `-size` at
/// its timestamp. The sort is stable, so file order is preserved within
/// equal timestamps.
pub fn net_bytes_curve(events: &[Event]) -> Vec<CurvePoint> {
    let mut deltas: Vec<(u64, i64)> = events
        .iter()
        .filter_map(|ev| {
            let size = i64::try_from(ev.size_bytes).unwrap_or(i64::MAX);
            if ev.kind.is_allocating() {
                Some((ev.timestamp_ns, size))
            } else if ev.kind == EventKind::Free {
                Some((ev.timestamp_ns, -size))
            } else {
                None
            }
        })
        .collect();
    deltas.sort_by_key(|&(ts, _)| ts);

    let mut net: i64 = 0;
    deltas
        .into_iter()
        .map(|(ts_ns, delta)| {
            net = net.saturating_add(delta);
            CurvePoint {
                ts_ns,
                net_bytes: net,
            }
        })
        .collect()
}

/// One bar on the per-thread allocation Gantt chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GanttRow {
    pub thread_id: u64,
    pub start_ts: u64,
    pub duration_ns: u64,
    pub size_bytes: u64,
}

/// Timeline rows for closed intervals with positive duration.
///
/// Same-timestamp alloc/free pairs render as nothing here; they remain in
/// the interval set and the aggregate summary.
pub fn gantt_rows(intervals: &[Interval]) -> Vec<GanttRow> {
    intervals
        .iter()
        .filter_map(|iv| {
            let duration_ns = iv.duration_ns()?;
            if duration_ns == 0 {
                return None;
            }
            Some(GanttRow {
                thread_id: iv.thread_id,
                start_ts: iv.start_ts,
                duration_ns,
                size_bytes: iv.size_bytes,
            })
        })
        .collect()
}
