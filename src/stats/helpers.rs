//! Common helpers shared across the statistics stages
//!
//! Number pool constants, pool indexing and the top-N ranking used by every
//! ranked list in an [`AnalysisResult`](crate::AnalysisResult).

use serde::ser::{Serialize, SerializeTuple, Serializer};

// ============================================================
// NUMBER POOL
// ============================================================

/// Smallest number that can be drawn
pub const MIN_NUMBER: u8 = 1;
/// Largest number that can be drawn
pub const MAX_NUMBER: u8 = 90;
/// Size of the number pool
pub const POOL_SIZE: usize = MAX_NUMBER as usize;

/// Twins are multiples of this divisor above [`TWIN_FLOOR`]
pub const TWIN_DIVISOR: u8 = 11;
pub const TWIN_FLOOR: u8 = 10;

/// True when `number` is inside [MIN_NUMBER, MAX_NUMBER]
#[inline]
pub fn in_pool(number: u8) -> bool {
    (MIN_NUMBER..=MAX_NUMBER).contains(&number)
}

/// Zero-based slot of a pool number. Caller guarantees `in_pool(number)`.
#[inline]
pub fn slot(number: u8) -> usize {
    (number - MIN_NUMBER) as usize
}

/// Iterate every pool number with its slot
#[inline]
pub fn pool() -> impl Iterator<Item = (usize, u8)> {
    (MIN_NUMBER..=MAX_NUMBER).enumerate()
}

// ============================================================
// RANKING
// ============================================================

/// One entry of a ranked list: a number and the metric it was ranked by.
///
/// Serializes as a `[number, value]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RankedNumber {
    pub number: u8,
    pub value: u32,
}

impl RankedNumber {
    #[inline]
    pub fn new(number: u8, value: u32) -> Self {
        Self { number, value }
    }
}

impl Serialize for RankedNumber {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        let mut pair = s.serialize_tuple(2)?;
        pair.serialize_element(&self.number)?;
        pair.serialize_element(&self.value)?;
        pair.end()
    }
}

impl From<RankedNumber> for (u8, u32) {
    fn from(r: RankedNumber) -> Self {
        (r.number, r.value)
    }
}

/// Primary sort order of a ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Descending,
    Ascending,
}

/// A number eligible for a ranking.
///
/// `tie_key` orders candidates whose `value` is equal; lower comes first.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub number: u8,
    pub value: u32,
    pub tie_key: usize,
}

/// Sort candidates by value in `order`, then by `tie_key`, and keep the first `n`.
pub fn rank_top<I>(candidates: I, order: SortOrder, n: usize) -> Vec<RankedNumber>
where
    I: IntoIterator<Item = Candidate>,
{
    let mut all: Vec<Candidate> = candidates.into_iter().collect();
    all.sort_by(|a, b| {
        let primary = match order {
            SortOrder::Descending => b.value.cmp(&a.value),
            SortOrder::Ascending => a.value.cmp(&b.value),
        };
        primary.then(a.tie_key.cmp(&b.tie_key))
    });
    all.into_iter()
        .take(n)
        .map(|c| RankedNumber::new(c.number, c.value))
        .collect()
}

// ============================================================
// TESTS
// ============================================================
