//! Pattern detection on a single draw event
//!
//! - **Twins**: multiples of 11 above 10 (11, 22, ..., 88)
//! - **Consecutive pairs**: adjacent numbers `n`, `n + 1` once the draw is sorted

use std::fmt;

use serde::Serialize;

use super::helpers::{TWIN_DIVISOR, TWIN_FLOOR};

/// Patterns found in one draw
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternFindings {
    /// Twin numbers, ascending
    pub twins: Vec<u8>,
    /// Consecutive pairs formatted `low-high`, ascending
    pub consecutive_pairs: Vec<String>,
}

impl PatternFindings {
    pub fn is_empty(&self) -> bool {
        self.twins.is_empty() && self.consecutive_pairs.is_empty()
    }
}

/// Two numbers drawn together that differ by one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConsecutivePair {
    pub low: u8,
    pub high: u8,
}

impl fmt::Display for ConsecutivePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

#[inline]
pub fn is_twin(number: u8) -> bool {
    number > TWIN_FLOOR && number % TWIN_DIVISOR == 0
}

/// Twins of `sorted`, keeping its order
pub fn find_twins(sorted: &[u8]) -> Vec<u8> {
    sorted.iter().copied().filter(|&n| is_twin(n)).collect()
}

/// Distinct consecutive pairs among adjacent entries of `sorted`
pub fn find_consecutive(sorted: &[u8]) -> Vec<ConsecutivePair> {
    let mut pairs: Vec<ConsecutivePair> = sorted
        .windows(2)
        .filter(|w| w[0].checked_add(1) == Some(w[1]))
        .map(|w| ConsecutivePair { low: w[0], high: w[1] })
        .collect();
    // Duplicated numbers in a draw could repeat a pair
    pairs.dedup();
    pairs
}

/// Sort a copy of `numbers` and run both detectors.
pub fn detect_patterns(numbers: &[u8]) -> PatternFindings {
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();

    PatternFindings {
        twins: find_twins(&sorted),
        consecutive_pairs: find_consecutive(&sorted)
            .iter()
            .map(ToString::to_string)
            .collect(),
    }
}
