//! Top-N Counter Report

use std::cmp::Ordering;
use std::fmt;

use crate::api::FieldValueCounter;

/// Number of entries reported per counter by default
pub const DEFAULT_TOP_N: usize = 10;

/// The highest counts of one counter, descending
#[derive(Clone, Debug, PartialEq)]
pub struct CounterReport {
    /// Counter name
    pub counter: String,
    /// Field values and counts, highest first
    pub entries: Vec<(String, f64)>,
}

impl CounterReport {
    /// Build a report of the `n` highest counts of a counter
    #[must_use]
    pub fn from_counter(counter: &FieldValueCounter, n: usize) -> Self {
        Self {
            counter: counter.name.clone(),
            entries: top_counts(&counter.field_value_counts, n),
        }
    }
}

impl fmt::Display for CounterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, count) in &self.entries {
            writeln!(f, "'{field}' = {count}")?;
        }
        Ok(())
    }
}

/// Sort counts descending and keep the first `n`
///
/// The sort is stable: equal counts keep their input order. NaN sorts last.
#[must_use]
pub fn top_counts(counts: &[(String, f64)], n: usize) -> Vec<(String, f64)> {
    let mut sorted = counts.to_vec();
    sorted.sort_by(|(_, a), (_, b)| descending(*a, *b));
    sorted.truncate(n);
    sorted
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
