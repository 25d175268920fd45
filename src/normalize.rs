//! Event log normalization
//!
//! Trace logs arrive from several producers with unknown delimiters and
//! header naming. This module sniffs the delimiter from a leading sample,
//! maps header cells through a fixed alias table, and coerces each row
//! into a canonical [`Event`]. Malformed rows degrade to sentinel values
//! or are skipped; only an unreadable file is fatal.

use crate::event::{lenient_u64, Event, EventKind};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Bytes of leading input examined when sniffing the delimiter
const SNIFF_SAMPLE_BYTES: usize = 1024;

/// Candidate delimiters, in tie-break priority order
const CANDIDATE_DELIMITERS: [char; 3] = [',', ';', '\t'];

/// Structural failures that make forward progress meaningless
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("cannot read trace file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Canonical columns a header cell can map to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Timestamp,
    Kind,
    Address,
    Size,
    Thread,
}

/// Map one header cell to a canonical column via the alias table.
/// Matching is case-insensitive after whitespace trim.
fn canonical_column(name: &str) -> Option<Column> {
    match name.trim().to_ascii_lowercase().as_str() {
        "ts_ns" | "timestamp" => Some(Column::Timestamp),
        "event" | "op" => Some(Column::Kind),
        "ptr" => Some(Column::Address),
        "size" | "bytes" => Some(Column::Size),
        "tid" | "thread" => Some(Column::Thread),
        _ => None,
    }
}

/// Pick the field delimiter by counting candidate occurrences over a
/// leading sample. Highest count wins; earlier candidates win ties, so a
/// delimiter-free sample falls back to comma.
pub fn detect_delimiter(text: &str) -> char {
    let mut end = text.len().min(SNIFF_SAMPLE_BYTES);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let sample = &text[..end];

    let mut best = CANDIDATE_DELIMITERS[0];
    let mut best_count = 0usize;
    for candidate in CANDIDATE_DELIMITERS {
        let count = sample.matches(candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Parse a whole trace blob into canonical events, in file order.
///
/// File order is significant downstream: it is the reconstruction's only
/// ordering signal when timestamps collide or are the 0 sentinel.
pub fn parse_trace(text: &str) -> Vec<Event> {
    // Producers that write with a BOM (utf-8-sig) are tolerated
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = detect_delimiter(text);
    debug!(delimiter = ?delimiter, "detected trace delimiter");

    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let Some(header) = lines.next() else {
        return Vec::new();
    };

    let columns: Vec<Option<Column>> = header
        .split(delimiter)
        .map(canonical_column)
        .collect();
    debug!(?columns, "mapped trace header");

    let mut events = Vec::new();
    let mut skipped = 0usize;
    for line in lines {
        let mut ts = "";
        let mut kind = "";
        let mut ptr = "";
        let mut size = "";
        let mut tid = "";
        let mut usable = false;

        for (cell, column) in line.split(delimiter).zip(columns.iter()) {
            let cell = cell.trim();
            let Some(column) = column else { continue };
            if cell.is_empty() {
                continue;
            }
            usable = true;
            match column {
                Column::Timestamp => ts = cell,
                Column::Kind => kind = cell,
                Column::Address => ptr = cell,
                Column::Size => size = cell,
                Column::Thread => tid = cell,
            }
        }

        // Malformed trailing rows are expected, not an error
        if !usable {
            skipped += 1;
            continue;
        }

        let kind = if kind.is_empty() { "UNKNOWN" } else { kind };
        events.push(Event {
            timestamp_ns: lenient_u64(ts),
            kind: EventKind::from_label(kind),
            address: ptr.to_string(),
            size_bytes: lenient_u64(size),
            thread_id: lenient_u64(tid),
        });
    }

    debug!(parsed = events.len(), skipped, "normalized trace rows");
    events
}

/// Read and normalize a trace log from disk.
///
/// A missing or unreadable file is the one fatal condition on this path;
/// nothing downstream can proceed without the trace.
pub fn load_trace(path: &Path) -> Result<Vec<Event>, TraceError> {
    let text = fs::read_to_string(path).map_err(|source| TraceError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_trace(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_comma() {
        assert_eq!(detect_delimiter("ts_ns,event,ptr,size,tid\n1,ALLOC,0x1,8,2\n"), ',');
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        assert_eq!(detect_delimiter("ts_ns;event;ptr;size;tid\n"), ';');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("ts_ns\tevent\tptr\tsize\ttid\n"), '\t');
    }

    #[test]
    fn test_detect_delimiter_empty_falls_back_to_comma() {
        assert_eq!(detect_delimiter(""), ',');
        assert_eq!(detect_delimiter("no delimiters here"), ',');
    }

    #[test]
    fn test_parse_basic_trace() {
        let events = parse_trace("ts_ns,event,ptr,size,tid\n100,ALLOC,0xa,64,7\n200,FREE,0xa,0,7\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].timestamp_ns, 100);
        assert_eq!(events[0].kind, EventKind::Alloc);
        assert_eq!(events[0].address, "0xa");
        assert_eq!(events[0].size_bytes, 64);
        assert_eq!(events[0].thread_id, 7);
        assert_eq!(events[1].kind, EventKind::Free);
    }

    #[test]
    fn test_parse_alias_headers() {
        let events = parse_trace("timestamp,op,ptr,bytes,thread\n5,alloc,0x1,32,3\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp_ns, 5);
        assert_eq!(events[0].kind, EventKind::Alloc);
        assert_eq!(events[0].size_bytes, 32);
        assert_eq!(events[0].thread_id, 3);
    }

    #[test]
    fn test_parse_header_case_and_whitespace() {
        let events = parse_trace(" TS_NS , Event , PTR , Size , TID \n9,FREE,0xb,0,1\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp_ns, 9);
        assert_eq!(events[0].kind, EventKind::Free);
        assert_eq!(events[0].address, "0xb");
    }

    #[test]
    fn test_parse_semicolon_trace() {
        let events = parse_trace("ts_ns;event;ptr;size;tid\n1;CALLOC;0xc;128;2\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Calloc);
        assert_eq!(events[0].size_bytes, 128);
    }

    #[test]
    fn test_parse_tab_trace() {
        let events = parse_trace("ts_ns\tevent\tptr\tsize\ttid\n1\tREALLOC\t0xd\t256\t4\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Realloc);
        assert_eq!(events[0].size_bytes, 256);
    }

    #[test]
    fn test_parse_strips_bom() {
        let events = parse_trace("\u{feff}ts_ns,event,ptr,size,tid\n1,ALLOC,0x1,8,1\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp_ns, 1);
    }

    #[test]
    fn test_parse_lenient_numeric_coercion() {
        let events = parse_trace("ts_ns,event,ptr,size,tid\nbogus,ALLOC,0x1,notanum,xyz\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp_ns, 0);
        assert_eq!(events[0].size_bytes, 0);
        assert_eq!(events[0].thread_id, 0);
    }

    #[test]
    fn test_parse_unknown_kind_retained() {
        let events = parse_trace("ts_ns,event,ptr,size,tid\n1,mmap,0x1,4096,1\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Unknown("MMAP".to_string()));
    }

    #[test]
    fn test_parse_missing_kind_becomes_unknown() {
        let events = parse_trace("ts_ns,event,ptr,size,tid\n1,,0x1,8,1\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Unknown("UNKNOWN".to_string()));
    }

    #[test]
    fn test_parse_skips_unusable_rows() {
        // Truncated trailing row with nothing mappable and a blank line
        let events = parse_trace("ts_ns,event,ptr,size,tid\n1,ALLOC,0x1,8,1\n\n,,,,\n");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_parse_short_rows_keep_usable_fields() {
        let events = parse_trace("ts_ns,event,ptr,size,tid\n7,FREE,0xa\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Free);
        assert_eq!(events[0].size_bytes, 0);
        assert_eq!(events[0].thread_id, 0);
    }

    #[test]
    fn test_parse_unmapped_columns_ignored() {
        let events = parse_trace("ts_ns,event,ptr,size,tid,extra\n1,ALLOC,0x1,8,1,junk\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].size_bytes, 8);
    }

    #[test]
    fn test_parse_preserves_file_order() {
        let events = parse_trace(
            "ts_ns,event,ptr,size,tid\n0,ALLOC,0x1,8,1\n0,FREE,0x1,0,1\n0,ALLOC,0x1,16,1\n",
        );
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].kind, EventKind::Alloc);
        assert_eq!(events[1].kind, EventKind::Free);
        assert_eq!(events[2].kind, EventKind::Alloc);
        assert_eq!(events[2].size_bytes, 16);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_trace("").is_empty());
        assert!(parse_trace("ts_ns,event,ptr,size,tid\n").is_empty());
    }

    #[test]
    fn test_load_trace_missing_file() {
        let err = load_trace(Path::new("/nonexistent/mftrace_log.csv")).unwrap_err();
        assert!(err.to_string().contains("cannot read trace file"));
    }
}
