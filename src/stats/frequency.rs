//! Absolute frequency and current delay over the full history

use serde::Serialize;

use super::helpers::{pool, rank_top, slot, Candidate, RankedNumber, SortOrder, POOL_SIZE};
use crate::{params::TieBreak, WheelHistory};

/// Full-history statistics of one number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NumberStat {
    /// Occurrences across every draw event
    pub frequency: u32,
    /// Draw events since the most recent appearance; the history length if never drawn
    pub delay: u32,
}

/// Frequency and delay for every number of the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberStats {
    stats: Vec<NumberStat>,
    /// Order of first encounter in the most-recent-first walk
    first_seen: Vec<Option<usize>>,
    history_len: usize,
}

impl NumberStats {
    /// Single most-recent-first walk over `history`.
    ///
    /// Every occurrence bumps the frequency. The delay is taken from the first
    /// encounter only, which is the most recent event holding the number.
    pub fn compute(history: &WheelHistory) -> Self {
        let history_len = history.len();
        let mut stats = vec![
            NumberStat {
                frequency: 0,
                delay: history_len as u32,
            };
            POOL_SIZE
        ];
        let mut first_seen: Vec<Option<usize>> = vec![None; POOL_SIZE];
        let mut encountered = 0usize;

        for (i, event) in history.events().iter().enumerate() {
            for &number in &event.numbers {
                let s = slot(number);
                stats[s].frequency += 1;
                if first_seen[s].is_none() {
                    first_seen[s] = Some(encountered);
                    encountered += 1;
                    stats[s].delay = i as u32;
                }
            }
        }

        Self {
            stats,
            first_seen,
            history_len,
        }
    }

    /// Stats for `number`, `None` outside the pool
    pub fn get(&self, number: u8) -> Option<&NumberStat> {
        number
            .checked_sub(1)
            .and_then(|i| self.stats.get(i as usize))
    }

    /// Every pool number with its stats, ascending by number
    pub fn iter(&self) -> impl Iterator<Item = (u8, &NumberStat)> + '_ {
        pool().map(move |(s, n)| (n, &self.stats[s]))
    }

    pub fn history_len(&self) -> usize {
        self.history_len
    }

    /// Sum of all frequencies, equal to the count of drawn numbers in the history
    pub fn total_frequency(&self) -> u64 {
        self.stats.iter().map(|s| s.frequency as u64).sum()
    }

    /// True if `number` appeared at least once
    pub fn has_appeared(&self, number: u8) -> bool {
        self.get(number).is_some_and(|s| s.frequency > 0)
    }

    /// Most frequent numbers, zero-frequency numbers excluded
    pub fn top_frequent(&self, n: usize, tie_break: TieBreak) -> Vec<RankedNumber> {
        let candidates = pool().filter_map(|(s, number)| {
            let stat = self.stats[s];
            (stat.frequency > 0).then(|| Candidate {
                number,
                value: stat.frequency,
                tie_key: match tie_break {
                    TieBreak::FirstSeen => self.first_seen[s].unwrap_or(usize::MAX),
                    TieBreak::AscendingNumber => number as usize,
                },
            })
        });
        rank_top(candidates, SortOrder::Descending, n)
    }

    /// Longest-absent numbers, zero-delay numbers excluded. Ties go to the lower number.
    pub fn top_delayed(&self, n: usize) -> Vec<RankedNumber> {
        let candidates = pool().filter_map(|(s, number)| {
            let stat = self.stats[s];
            (stat.delay > 0).then_some(Candidate {
                number,
                value: stat.delay,
                tie_key: number as usize,
            })
        });
        rank_top(candidates, SortOrder::Descending, n)
    }
}
