//! Draw history ingestion
//!
//! The engine only needs rows of `(date, number)` for one wheel, ordered by
//! date descending and by intra-draw sequence ascending. [`HistorySource`] is
//! that contract; [`MemorySource`] is an in-memory implementation.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::DrawnNumber;

// ============================================================
// WHEELS
// ============================================================

/// Regional draw series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Wheel {
    Bari,
    Cagliari,
    Firenze,
    Genova,
    Milano,
    Napoli,
    Palermo,
    Roma,
    Torino,
    Venezia,
    Nazionale,
}

impl Wheel {
    pub const ALL: [Wheel; 11] = [
        Wheel::Bari,
        Wheel::Cagliari,
        Wheel::Firenze,
        Wheel::Genova,
        Wheel::Milano,
        Wheel::Napoli,
        Wheel::Palermo,
        Wheel::Roma,
        Wheel::Torino,
        Wheel::Venezia,
        Wheel::Nazionale,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Wheel::Bari => "Bari",
            Wheel::Cagliari => "Cagliari",
            Wheel::Firenze => "Firenze",
            Wheel::Genova => "Genova",
            Wheel::Milano => "Milano",
            Wheel::Napoli => "Napoli",
            Wheel::Palermo => "Palermo",
            Wheel::Roma => "Roma",
            Wheel::Torino => "Torino",
            Wheel::Venezia => "Venezia",
            Wheel::Nazionale => "Nazionale",
        }
    }
}

impl fmt::Display for Wheel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Wheel {
    type Err = SourceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.trim();
        Wheel::ALL
            .into_iter()
            .find(|w| w.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| SourceError::UnknownWheel(name.to_string()))
    }
}

// ============================================================
// SOURCE CONTRACT
// ============================================================

/// Errors raised by a history source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("Unknown wheel: {0}")]
    UnknownWheel(String),

    #[error("History unavailable: {0}")]
    Unavailable(String),
}

/// Supplier of draw rows for a wheel
pub trait HistorySource: Send + Sync {
    /// All rows for `wheel`, date descending then intra-draw sequence ascending.
    fn fetch(&self, wheel: &str) -> std::result::Result<Vec<DrawnNumber>, SourceError>;
}

impl<S: HistorySource + ?Sized> HistorySource for &S {
    fn fetch(&self, wheel: &str) -> std::result::Result<Vec<DrawnNumber>, SourceError> {
        (**self).fetch(wheel)
    }
}

// ============================================================
// IN-MEMORY SOURCE
// ============================================================

/// One stored row: a drawn number with its wheel and position in the draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRow {
    pub wheel: Wheel,
    pub date: NaiveDate,
    /// Position of the number within its draw (1-based)
    pub seq: u8,
    pub number: u8,
}

/// In-memory history, any insertion order
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<SourceRow>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: SourceRow) {
        self.rows.push(row);
    }

    /// Store a whole draw; sequence follows the order of `numbers`
    pub fn push_draw(&mut self, wheel: Wheel, date: NaiveDate, numbers: &[u8]) {
        self.rows.extend(numbers.iter().enumerate().map(|(i, &number)| SourceRow {
            wheel,
            date,
            seq: (i + 1) as u8,
            number,
        }));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<SourceRow> for MemorySource {
    fn from_iter<I: IntoIterator<Item = SourceRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl HistorySource for MemorySource {
    fn fetch(&self, wheel: &str) -> std::result::Result<Vec<DrawnNumber>, SourceError> {
        let wheel: Wheel = wheel.parse()?;
        let mut rows: Vec<&SourceRow> = self.rows.iter().filter(|r| r.wheel == wheel).collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(a.seq.cmp(&b.seq)));
        Ok(rows
            .into_iter()
            .map(|r| DrawnNumber::new(r.date, r.number))
            .collect())
    }
}
