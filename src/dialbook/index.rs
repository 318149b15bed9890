//! Display indexing.
//!
//! Lists are shown in whatever order the gateway returned them, numbered
//! from 1. The number is a row label only: it is recomputed on every render
//! and must never be used to address a record. Keys do that.

use std::fmt;

/// A 1-based row label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DisplayIndex(pub usize);

impl fmt::Display for DisplayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow<'a, R> {
    pub index: DisplayIndex,
    pub record: &'a R,
}

/// Numbers `records` in their current order.
pub fn index_records<R>(records: &[R]) -> Vec<DisplayRow<'_, R>> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| DisplayRow {
            index: DisplayIndex(i + 1),
            record,
        })
        .collect()
}
