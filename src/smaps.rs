//! Resident-memory snapshot reading
//!
//! One snapshot is one `/proc/<pid>/smaps` dump written to a `.txt` file
//! by the external poller. The only lines of interest begin with the
//! literal token `Rss:` followed by a size in kibibytes; a snapshot's
//! scalar is that value summed over all mappings. The comparison is
//! optional to the overall run, so everything here degrades instead of
//! failing: a missing directory is an empty report, an unreadable file is
//! skipped.

use std::fs;
use std::path::Path;

/// One snapshot file reduced to its resident total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSample {
    pub file_name: String,
    pub rss_kib: u64,
}

/// Per-file samples in sorted name order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotReport {
    pub samples: Vec<SnapshotSample>,
}

impl SnapshotReport {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Resident kibibytes summed across all samples
    pub fn total_kib(&self) -> u64 {
        self.samples
            .iter()
            .map(|s| s.rss_kib)
            .fold(0, u64::saturating_add)
    }
}

/// Sum the `Rss:` lines of one smaps dump, in kibibytes.
pub fn rss_kib(text: &str) -> u64 {
    let mut total: u64 = 0;
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("Rss:") {
            if let Some(value) = rest.split_whitespace().next() {
                total = total.saturating_add(value.parse().unwrap_or(0));
            }
        }
    }
    total
}

/// Reduce one snapshot file to a sample; `None` when unreadable.
pub fn read_snapshot(path: &Path) -> Option<SnapshotSample> {
    let text = fs::read_to_string(path).ok()?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Some(SnapshotSample {
        file_name,
        rss_kib: rss_kib(&text),
    })
}

/// Scan a snapshot directory into a report.
///
/// Only `*.txt` entries are snapshots (the poller writes `smap_NNNN.txt`);
/// they are read in sorted name order so the samples form a time series.
/// Unreadable individual files are skipped.
pub fn scan_snapshot_dir(dir: &Path) -> SnapshotReport {
    let Ok(entries) = fs::read_dir(dir) else {
        return SnapshotReport::default();
    };

    let mut paths: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    paths.sort();

    let samples = paths
        .iter()
        .filter_map(|path| read_snapshot(path))
        .collect();
    SnapshotReport { samples }
}
