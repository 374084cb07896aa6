//! Short-window frequency and hot/cold classification

use super::{
    frequency::NumberStats,
    helpers::{pool, rank_top, slot, Candidate, RankedNumber, SortOrder, POOL_SIZE},
};
use crate::{
    params::{AnalysisConfig, ExpectedBasis, TieBreak},
    WheelHistory,
};

/// Expected occurrences of one number over `window` draws of `numbers_per_draw`
/// numbers each, assuming a uniform draw from the pool.
#[inline]
pub fn expected_frequency(numbers_per_draw: usize, window: usize) -> f64 {
    (numbers_per_draw * window) as f64 / POOL_SIZE as f64
}

/// Frequencies over the most recent draw events
#[derive(Debug, Clone, PartialEq)]
pub struct ShortWindowStats {
    frequency: Vec<u32>,
    first_seen: Vec<Option<usize>>,
    window_len: usize,
    expected: f64,
}

impl ShortWindowStats {
    /// Count the first `min(short_window, history.len())` events.
    pub fn compute(history: &WheelHistory, config: &AnalysisConfig) -> Self {
        let window = history.window(config.short_window.get());
        let window_len = window.len();

        let mut frequency = vec![0u32; POOL_SIZE];
        let mut first_seen: Vec<Option<usize>> = vec![None; POOL_SIZE];
        let mut encountered = 0usize;
        for event in window {
            for &number in &event.numbers {
                let s = slot(number);
                frequency[s] += 1;
                if first_seen[s].is_none() {
                    first_seen[s] = Some(encountered);
                    encountered += 1;
                }
            }
        }

        let basis = match config.expected_basis {
            ExpectedBasis::ConfiguredWindow => config.short_window.get(),
            ExpectedBasis::ObservedWindow => window_len,
        };
        let expected = expected_frequency(config.numbers_per_draw.get(), basis);

        Self {
            frequency,
            first_seen,
            window_len,
            expected,
        }
    }

    /// Short-window frequency of `number`, 0 outside the pool
    pub fn frequency(&self, number: u8) -> u32 {
        number
            .checked_sub(1)
            .and_then(|i| self.frequency.get(i as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Every pool number with its short-window frequency
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        pool().map(move |(s, n)| (n, self.frequency[s]))
    }

    /// Number of draw events actually covered
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    pub fn expected_frequency(&self) -> f64 {
        self.expected
    }

    /// Frequency a number must exceed to be hot
    pub fn hot_threshold(&self, config: &AnalysisConfig) -> f64 {
        self.expected * config.hot_factor.get()
    }

    pub fn is_hot(&self, number: u8, config: &AnalysisConfig) -> bool {
        self.frequency(number) as f64 > self.hot_threshold(config)
    }

    /// Short-window silence that is notable: at most `cold_max_frequency`
    /// hits while the full-history delay stays under the configured window.
    pub fn is_cold(&self, number: u8, numbers: &NumberStats, config: &AnalysisConfig) -> bool {
        let Some(stat) = numbers.get(number) else {
            return false;
        };
        self.frequency(number) <= config.cold_max_frequency
            && (stat.delay as usize) < config.short_window.get()
            && !self.is_hot(number, config)
    }

    /// Hot numbers, most frequent first
    pub fn hot(&self, config: &AnalysisConfig) -> Vec<RankedNumber> {
        let candidates = pool().filter_map(|(s, number)| {
            self.is_hot(number, config).then(|| Candidate {
                number,
                value: self.frequency[s],
                tie_key: match config.tie_break {
                    TieBreak::FirstSeen => self.first_seen[s].unwrap_or(usize::MAX),
                    TieBreak::AscendingNumber => number as usize,
                },
            })
        });
        rank_top(candidates, SortOrder::Descending, config.top_n.get())
    }

    /// Cold numbers, least frequent first. Ties go to the lower number.
    pub fn cold(&self, numbers: &NumberStats, config: &AnalysisConfig) -> Vec<RankedNumber> {
        let candidates = pool().filter_map(|(s, number)| {
            self.is_cold(number, numbers, config).then(|| Candidate {
                number,
                value: self.frequency[s],
                tie_key: number as usize,
            })
        });
        rank_top(candidates, SortOrder::Ascending, config.top_n.get())
    }
}
