//! CSV output for timeline artifacts
//!
//! The chart renderer consumes two flat frames: per-thread allocation
//! lifetime rows and the cumulative net-byte curve. All fields are
//! numeric, so no quoting is needed.

use crate::timeline::{CurvePoint, GanttRow};

/// CSV rendering of the per-thread allocation timeline
#[derive(Debug, Default)]
pub struct TimelineCsv {
    rows: Vec<GanttRow>,
}

impl TimelineCsv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<GanttRow>) -> Self {
        Self { rows }
    }

    pub fn add_row(&mut self, row: GanttRow) {
        self.rows.push(row);
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::from("tid,start_ns,duration_ns,size\n");
        for row in &self.rows {
            output.push_str(&format!(
                "{},{},{},{}\n",
                row.thread_id, row.start_ts, row.duration_ns, row.size_bytes
            ));
        }
        output
    }
}

/// CSV rendering of the cumulative net-byte curve
#[derive(Debug, Default)]
pub struct CurveCsv {
    points: Vec<CurvePoint>,
}

impl CurveCsv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<CurvePoint>) -> Self {
        Self { points }
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::from("ts_ns,net_bytes\n");
        for point in &self.points {
            output.push_str(&format!("{},{}\n", point.ts_ns, point.net_bytes));
        }
        output
    }
}
