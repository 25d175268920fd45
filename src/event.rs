//! Canonical allocation event model
//!
//! The trace log is written by a malloc-interposition shim inside the
//! traced process; column naming and delimiters vary by producer. Every
//! row is coerced into this one immutable record shape at parse time and
//! never mutated afterwards.

/// Kind of allocation-lifecycle operation observed in the trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Alloc,
    Calloc,
    Realloc,
    AlignedAlloc,
    PosixMemalign,
    Free,
    /// Unrecognized operation label, retained verbatim (uppercased)
    Unknown(String),
}

impl EventKind {
    /// Classify a raw operation label.
    ///
    /// The label is trimmed and uppercased first; anything outside the
    /// known set is kept as [`EventKind::Unknown`] rather than dropped.
    pub fn from_label(label: &str) -> Self {
        let upper = label.trim().to_ascii_uppercase();
        match upper.as_str() {
            "ALLOC" => EventKind::Alloc,
            "CALLOC" => EventKind::Calloc,
            "REALLOC" => EventKind::Realloc,
            "ALIGNED_ALLOC" => EventKind::AlignedAlloc,
            "POSIX_MEMALIGN" => EventKind::PosixMemalign,
            "FREE" => EventKind::Free,
            _ => EventKind::Unknown(upper),
        }
    }

    /// True for every kind that produces a live block
    pub fn is_allocating(&self) -> bool {
        matches!(
            self,
            EventKind::Alloc
                | EventKind::Calloc
                | EventKind::Realloc
                | EventKind::AlignedAlloc
                | EventKind::PosixMemalign
        )
    }
}

/// One observed allocation-related operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Source clock in nanoseconds; 0 when the field was unparseable
    pub timestamp_ns: u64,
    pub kind: EventKind,
    /// Opaque pointer token exactly as logged (hex or decimal literal)
    pub address: String,
    /// 0 when missing or non-numeric
    pub size_bytes: u64,
    /// 0 when missing
    pub thread_id: u64,
}

impl Event {
    /// Whether the address token can participate in lifetime matching.
    ///
    /// The tracer logs NULL as glibc's `%p` rendering `(nil)`; `0x0` and
    /// empty fields mean the same thing. Such events still count in the
    /// aggregate totals.
    pub fn has_address(&self) -> bool {
        !matches!(self.address.as_str(), "" | "0x0" | "(nil)")
    }
}

/// Coerce a numeric field leniently: a string of ASCII digits parses,
/// everything else (signs, hex prefixes, floats, garbage) becomes 0.
pub fn lenient_u64(field: &str) -> u64 {
    let trimmed = field.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        // Overflowing digit runs also degrade to the sentinel
        trimmed.parse().unwrap_or(0)
    } else {
        0
    }
}
