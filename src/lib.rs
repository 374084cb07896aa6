//! # lottostat - Lotto wheel statistics
//!
//! Descriptive statistics over the draw history of a lotto wheel: absolute
//! frequency, current delay, short-window hot/cold numbers and simple
//! patterns in the latest draw.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use lottostat::prelude::*;
//!
//! // Any HistorySource works; MemorySource keeps rows in memory
//! let mut source = MemorySource::new();
//! let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
//! source.push_draw(Wheel::Bari, date, &[11, 22, 45, 46, 70]);
//!
//! let analyzer = AnalyzerBuilder::new().build().unwrap();
//! let result = analyzer.analyze_source(&source, "Bari").unwrap();
//!
//! assert_eq!(result.latest_draw_date, "01/03/2025");
//! assert_eq!(result.patterns.twins, vec![11, 22]);
//! assert_eq!(result.patterns.consecutive_pairs, vec!["45-46"]);
//! ```

pub mod params;
pub mod source;
pub mod stats;

pub mod prelude {
    pub use crate::{
        // Parameters
        params::{AnalysisConfig, ExpectedBasis, ParamMeta, ParamType, TieBreak},
        // Parallel
        analyze_parallel,
        // Ingestion
        source::{HistorySource, MemorySource, SourceError, SourceRow, Wheel},
        // Stages
        stats::{
            detect_patterns, group_draws, NumberStat, NumberStats, PatternFindings, RankedNumber,
            ShortWindowStats,
        },
        // Engine
        AnalysisError,
        AnalysisResult,
        Analyzer,
        AnalyzerBuilder,
        // Types
        DrawEvent,
        DrawnNumber,
        Factor,
        Period,
        Result,
        StatError,
        StatTables,
        WheelError,
        WheelHistory,
    };
}

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use params::{AnalysisConfig, ExpectedBasis, TieBreak};
use source::HistorySource;
use stats::{
    detect_patterns, group_draws, in_pool, NumberStats, PatternFindings, RankedNumber,
    ShortWindowStats, MAX_NUMBER, MIN_NUMBER,
};

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, StatError>;

/// Errors raised inside the statistics pipeline
#[derive(Debug, Clone, thiserror::Error)]
pub enum StatError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Number {number} drawn on {date} outside [{min}, {max}]")]
    NumberOutOfRange {
        number: u8,
        date: NaiveDate,
        min: u8,
        max: u8,
    },

    #[error("Draw dates not strictly descending at event {index}")]
    UnorderedHistory { index: usize },

    #[error("Empty history")]
    EmptyHistory,
}

/// Error handed to the presentation layer in place of an [`AnalysisResult`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("no data for wheel {wheel}")]
    EmptyHistory { wheel: String },

    #[error("analysis failed: {message}")]
    ComputationFailure { message: String },
}

impl AnalysisError {
    /// User-facing message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl Serialize for AnalysisError {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut st = s.serialize_struct("AnalysisError", 1)?;
        st.serialize_field("message", &self.message())?;
        st.end()
    }
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Positive, finite multiplier
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Factor(f64);

impl Factor {
    /// Create a new Factor, validating the value is finite and > 0
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(StatError::InvalidValue(
                "Factor cannot be NaN or infinite",
            ));
        }
        if value <= 0.0 {
            return Err(StatError::InvalidValue("Factor must be > 0"));
        }
        Ok(Self(value))
    }

    /// Create a Factor from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Factor {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Factor {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Factor::new(value).map_err(serde::de::Error::custom)
    }
}

/// Period (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(StatError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// DRAW DATA
// ============================================================

/// One drawn number as supplied by the history source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
pub struct DrawnNumber {
    pub date: NaiveDate,
    pub number: u8,
}

impl DrawnNumber {
    #[inline]
    pub fn new(date: NaiveDate, number: u8) -> Self {
        Self { date, number }
    }
}

/// All numbers drawn on one date, in source order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DrawEvent {
    pub date: NaiveDate,
    pub numbers: Vec<u8>,
}

/// Draw events of one wheel, most recent first.
///
/// Never empty, dates strictly descending, every number inside the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelHistory {
    events: Vec<DrawEvent>,
}

impl WheelHistory {
    /// Build from events that are already grouped, checking the invariants
    pub fn new(events: Vec<DrawEvent>) -> Result<Self> {
        if events.is_empty() {
            return Err(StatError::EmptyHistory);
        }
        for (index, pair) in events.windows(2).enumerate() {
            if pair[0].date <= pair[1].date {
                return Err(StatError::UnorderedHistory { index: index + 1 });
            }
        }
        for event in &events {
            if let Some(&number) = event.numbers.iter().find(|&&n| !in_pool(n)) {
                return Err(StatError::NumberOutOfRange {
                    number,
                    date: event.date,
                    min: MIN_NUMBER,
                    max: MAX_NUMBER,
                });
            }
        }
        Ok(Self { events })
    }

    /// Group flat source rows into a history
    pub fn from_rows(rows: &[DrawnNumber]) -> Result<Self> {
        group_draws(rows)
    }

    pub(crate) fn from_events_unchecked(events: Vec<DrawEvent>) -> Self {
        debug_assert!(!events.is_empty());
        Self { events }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[DrawEvent] {
        &self.events
    }

    /// The most recent draw event
    pub fn latest(&self) -> &DrawEvent {
        &self.events[0]
    }

    /// The most recent `size` events, or all of them when the history is shorter
    pub fn window(&self, size: usize) -> &[DrawEvent] {
        &self.events[..size.min(self.events.len())]
    }

    /// Count of drawn numbers across all events
    pub fn total_numbers(&self) -> usize {
        self.events.iter().map(|e| e.numbers.len()).sum()
    }
}

// ============================================================
// RESULTS
// ============================================================

/// Date format of [`AnalysisResult::latest_draw_date`]
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Ranked summary of one wheel's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub wheel: String,
    /// Latest draw date as dd/mm/yyyy
    pub latest_draw_date: String,
    /// (number, frequency), most frequent first
    pub top_frequent: Vec<RankedNumber>,
    /// (number, delay), longest absent first
    pub top_delayed: Vec<RankedNumber>,
    /// (number, short-window frequency)
    pub hot_numbers: Vec<RankedNumber>,
    /// (number, short-window frequency)
    pub cold_numbers: Vec<RankedNumber>,
    pub patterns: PatternFindings,
}

/// Full per-number tables behind an [`AnalysisResult`]
#[derive(Debug, Clone, PartialEq)]
pub struct StatTables {
    pub numbers: NumberStats,
    pub short_window: ShortWindowStats,
    /// Patterns of the latest draw
    pub patterns: PatternFindings,
}

// ============================================================
// ANALYZER
// ============================================================

/// Stateless analysis engine; every call is independent
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    // ===========================================
    // LOW-LEVEL: Tables
    // ===========================================

    /// Run the three stages over `history`.
    ///
    /// The stages only read the history, so they run side by side.
    pub fn compute_tables(&self, history: &WheelHistory) -> StatTables {
        let (numbers, (short_window, patterns)) = rayon::join(
            || NumberStats::compute(history),
            || {
                rayon::join(
                    || ShortWindowStats::compute(history, &self.config),
                    || detect_patterns(&history.latest().numbers),
                )
            },
        );

        debug!(
            "{} events, window {} (expected {:.3} per number)",
            history.len(),
            short_window.window_len(),
            short_window.expected_frequency()
        );

        StatTables {
            numbers,
            short_window,
            patterns,
        }
    }

    /// Rank the tables into the summary record
    pub fn summarize(&self, wheel: &str, history: &WheelHistory, tables: StatTables) -> AnalysisResult {
        let top_n = self.config.top_n.get();
        AnalysisResult {
            wheel: wheel.to_string(),
            latest_draw_date: history.latest().date.format(DATE_FORMAT).to_string(),
            top_frequent: tables.numbers.top_frequent(top_n, self.config.tie_break),
            top_delayed: tables.numbers.top_delayed(top_n),
            hot_numbers: tables.short_window.hot(&self.config),
            cold_numbers: tables.short_window.cold(&tables.numbers, &self.config),
            patterns: tables.patterns,
        }
    }

    // ===========================================
    // HIGH-LEVEL: Boundary
    // ===========================================

    /// Analyze the rows of one wheel.
    ///
    /// Always returns a complete result or a well-formed error: empty input
    /// becomes [`AnalysisError::EmptyHistory`], anything else that goes wrong,
    /// panics included, becomes [`AnalysisError::ComputationFailure`].
    pub fn analyze(
        &self,
        wheel: &str,
        rows: &[DrawnNumber],
    ) -> std::result::Result<AnalysisResult, AnalysisError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.try_analyze(wheel, rows)));

        match outcome {
            Ok(Ok(result)) => {
                info!("Analyzed wheel {} ({} rows)", wheel, rows.len());
                Ok(result)
            }
            Ok(Err(StatError::EmptyHistory)) => Err(AnalysisError::EmptyHistory {
                wheel: wheel.to_string(),
            }),
            Ok(Err(e)) => {
                warn!("Analysis of wheel {} failed: {}", wheel, e);
                Err(AnalysisError::ComputationFailure {
                    message: e.to_string(),
                })
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!("Analysis of wheel {} panicked: {}", wheel, message);
                Err(AnalysisError::ComputationFailure { message })
            }
        }
    }

    /// Fetch the wheel from `source` and analyze it.
    ///
    /// Source failures are reported as an empty history.
    pub fn analyze_source<S: HistorySource + ?Sized>(
        &self,
        source: &S,
        wheel: &str,
    ) -> std::result::Result<AnalysisResult, AnalysisError> {
        match source.fetch(wheel) {
            Ok(rows) => self.analyze(wheel, &rows),
            Err(e) => {
                warn!("History for wheel {} unavailable: {}", wheel, e);
                Err(AnalysisError::EmptyHistory {
                    wheel: wheel.to_string(),
                })
            }
        }
    }

    fn try_analyze(&self, wheel: &str, rows: &[DrawnNumber]) -> Result<AnalysisResult> {
        let history = group_draws(rows)?;
        let tables = self.compute_tables(&history);
        Ok(self.summarize(wheel, &history, tables))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected panic".to_string()
    }
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating Analyzer instances
#[derive(Debug, Clone)]
pub struct AnalyzerBuilder {
    short_window: usize,
    numbers_per_draw: usize,
    hot_factor: f64,
    cold_max_frequency: u32,
    top_n: usize,
    tie_break: TieBreak,
    expected_basis: ExpectedBasis,
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }

    /// Start from an existing config
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            short_window: config.short_window.get(),
            numbers_per_draw: config.numbers_per_draw.get(),
            hot_factor: config.hot_factor.get(),
            cold_max_frequency: config.cold_max_frequency,
            top_n: config.top_n.get(),
            tie_break: config.tie_break,
            expected_basis: config.expected_basis,
        }
    }

    /// Draw events in the short window
    pub fn short_window(mut self, events: usize) -> Self {
        self.short_window = events;
        self
    }

    pub fn numbers_per_draw(mut self, count: usize) -> Self {
        self.numbers_per_draw = count;
        self
    }

    pub fn hot_factor(mut self, factor: f64) -> Self {
        self.hot_factor = factor;
        self
    }

    pub fn cold_max_frequency(mut self, hits: u32) -> Self {
        self.cold_max_frequency = hits;
        self
    }

    /// Length of every ranked list
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    pub fn tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn expected_basis(mut self, basis: ExpectedBasis) -> Self {
        self.expected_basis = basis;
        self
    }

    /// Build the analyzer
    pub fn build(self) -> Result<Analyzer> {
        let config = AnalysisConfig {
            short_window: Period::new(self.short_window)?,
            numbers_per_draw: Period::new(self.numbers_per_draw)?,
            hot_factor: Factor::new(self.hot_factor)?,
            cold_max_frequency: self.cold_max_frequency,
            top_n: Period::new(self.top_n)?,
            tie_break: self.tie_break,
            expected_basis: self.expected_basis,
        };
        Analyzer::new(config)
    }
}

// ============================================================
// PARALLEL ANALYSIS
// ============================================================

use rayon::prelude::*;

/// Failure for a single wheel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelError {
    pub wheel: String,
    pub error: AnalysisError,
}

/// Analyze several wheels of one source in parallel
pub fn analyze_parallel<'a, S, I>(
    analyzer: &Analyzer,
    source: &S,
    wheels: I,
) -> (Vec<AnalysisResult>, Vec<WheelError>)
where
    S: HistorySource + ?Sized,
    I: IntoParallelIterator<Item = &'a str>,
{
    let results: Vec<_> = wheels
        .into_par_iter()
        .map(|wheel| {
            analyzer
                .analyze_source(source, wheel)
                .map_err(|error| WheelError {
                    wheel: wheel.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================
