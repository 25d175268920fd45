//! JSON summary document
//!
//! The numeric summary serialized as a flat key/value document. Field
//! names match the `summary.json` the toolkit has always emitted, so
//! downstream dashboards keep parsing unchanged.

use crate::stats::TraceSummary;
use serde::{Deserialize, Serialize};

/// Flat summary record for machine consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSummary {
    pub trace_file: String,
    pub records: u64,
    pub allocs: u64,
    pub frees: u64,
    pub threads: u64,
    pub total_alloc_bytes: u64,
    pub net_alloc_bytes: i64,
}

impl JsonSummary {
    pub fn new(trace_file: &str, summary: &TraceSummary) -> Self {
        Self {
            trace_file: trace_file.to_string(),
            records: summary.records,
            allocs: summary.allocs,
            frees: summary.frees,
            threads: summary.threads,
            total_alloc_bytes: summary.total_alloc_bytes,
            net_alloc_bytes: summary.net_alloc_bytes,
        }
    }

    /// Pretty-printed document
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
