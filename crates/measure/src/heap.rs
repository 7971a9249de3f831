//! Parser for the profiler's heap summary line.
//!
//! Grammar of the one line this module understands (memcheck's summary):
//!
//! ```text
//! line    := prefix? "total heap usage:" WS count WS "allocs," WS count WS "frees,"
//!            WS figure WS "bytes" WS "allocated"
//! prefix  := any text, e.g. "==4242==   "
//! count   := DIGIT{1,3} ("," DIGIT{3})* | DIGIT+
//! figure  := count "B"?
//! ```
//!
//! Anything else is an [`MeasureError::UnrecognizedReport`]; a missing or
//! reshaped summary never yields a number.

use crate::error::MeasureError;
use serde::{Deserialize, Serialize};

const MARKER: &str = "total heap usage:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapSummary {
    pub allocs: u64,
    pub frees: u64,
    pub bytes_allocated: u64,
}

/// Extract the first heap summary from a profiler report.
pub fn parse_heap_summary(report: &str) -> Result<HeapSummary, MeasureError> {
    let rest = report
        .lines()
        .find_map(|line| line.find(MARKER).map(|at| &line[at + MARKER.len()..]))
        .ok_or_else(|| MeasureError::unrecognized(format!("no line contains {MARKER:?}")))?;

    let tokens: Vec<&str> = rest.split_whitespace().collect();
    match tokens.as_slice() {
        [allocs, "allocs,", frees, "frees,", bytes, "bytes", "allocated"] => Ok(HeapSummary {
            allocs: parse_count(allocs)?,
            frees: parse_count(frees)?,
            bytes_allocated: parse_count(bytes.strip_suffix('B').unwrap_or(*bytes))?,
        }),
        _ => Err(MeasureError::unrecognized(format!(
            "heap summary has unexpected shape: {:?}",
            rest.trim()
        ))),
    }
}

/// Parse digits with optional `,` thousands separators.
fn parse_count(token: &str) -> Result<u64, MeasureError> {
    let bad = || MeasureError::unrecognized(format!("malformed count {token:?}"));

    let groups: Vec<&str> = token.split(',').collect();
    let well_formed = groups.iter().all(|g| !g.is_empty() && g.bytes().all(|b| b.is_ascii_digit()))
        && (groups.len() == 1
            || (groups[0].len() <= 3 && groups[1..].iter().all(|g| g.len() == 3)));
    if !well_formed {
        return Err(bad());
    }

    groups.concat().parse().map_err(|_| bad())
}
