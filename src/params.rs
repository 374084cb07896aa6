//! Analysis configuration and parameter metadata
//!
//! This module holds the knobs of an analysis run and metadata about them, enabling:
//! - Configuration from plain key/value overrides
//! - Parameter documentation
//! - Range validation before any draw is touched
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use lottostat::params::AnalysisConfig;
//!
//! for param in AnalysisConfig::param_meta() {
//!     println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//!
//! let overrides = HashMap::from([("short_window", 30.0)]);
//! let config = AnalysisConfig::with_params(&overrides).unwrap();
//! assert_eq!(config.short_window.get(), 30);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Factor, Period, Result, StatError};

// ============================================================
// POLICY ENUMS
// ============================================================

/// Secondary key for numbers that tie on a ranked metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
  /// Frequency and hot rankings keep first-encounter order of the
  /// most-recent-first walk; delay and cold rankings use ascending number.
  #[default]
  FirstSeen,
  /// Ascending number for every ranking
  AscendingNumber,
}

/// Window length used in the expected-frequency denominator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedBasis {
  /// The configured window, even when the history is shorter
  #[default]
  ConfiguredWindow,
  /// The number of events actually in the window
  ObservedWindow,
}

// ============================================================
// CONFIG
// ============================================================

/// Configuration of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
  /// Most recent draw events used for hot/cold classification
  pub short_window: Period,
  /// Numbers drawn per event, used for the expected frequency
  pub numbers_per_draw: Period,
  /// Hot when short-window frequency > expected * hot_factor
  pub hot_factor: Factor,
  /// Cold candidates have at most this many short-window hits
  pub cold_max_frequency: u32,
  /// Length of each ranked list
  pub top_n: Period,
  pub tie_break: TieBreak,
  pub expected_basis: ExpectedBasis,
}

pub const DEFAULT_SHORT_WINDOW: usize = 50;
pub const DEFAULT_NUMBERS_PER_DRAW: usize = 5;
pub const DEFAULT_HOT_FACTOR: f64 = 1.5;
pub const DEFAULT_COLD_MAX_FREQUENCY: u32 = 1;
pub const DEFAULT_TOP_N: usize = 5;

impl Default for AnalysisConfig {
  fn default() -> Self {
    Self {
      short_window: Period::new_const(DEFAULT_SHORT_WINDOW),
      numbers_per_draw: Period::new_const(DEFAULT_NUMBERS_PER_DRAW),
      hot_factor: Factor::new_const(DEFAULT_HOT_FACTOR),
      cold_max_frequency: DEFAULT_COLD_MAX_FREQUENCY,
      top_n: Period::new_const(DEFAULT_TOP_N),
      tie_break: TieBreak::default(),
      expected_basis: ExpectedBasis::default(),
    }
  }
}

static PARAMS: [ParamMeta; 5] = [
  ParamMeta::period(
    "short_window",
    DEFAULT_SHORT_WINDOW as f64,
    (1.0, 10_000.0),
    "Most recent draw events used for hot/cold classification",
  ),
  ParamMeta::period(
    "numbers_per_draw",
    DEFAULT_NUMBERS_PER_DRAW as f64,
    (1.0, 90.0),
    "Numbers drawn per event (expected-frequency constant)",
  ),
  ParamMeta::factor(
    "hot_factor",
    DEFAULT_HOT_FACTOR,
    (0.1, 10.0),
    "Multiplier on the expected frequency above which a number is hot",
  ),
  ParamMeta::count(
    "cold_max_frequency",
    DEFAULT_COLD_MAX_FREQUENCY as f64,
    (0.0, 10_000.0),
    "Highest short-window frequency still counted as cold",
  ),
  ParamMeta::period("top_n", DEFAULT_TOP_N as f64, (1.0, 90.0), "Length of every ranked list"),
];

impl AnalysisConfig {
  /// Returns metadata for all numeric parameters
  pub fn param_meta() -> &'static [ParamMeta] {
    &PARAMS
  }

  /// Creates a config from a HashMap of overrides.
  ///
  /// Missing parameters use their default values, unknown keys are rejected.
  pub fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    if let Some(unknown) = params.keys().find(|k| !PARAMS.iter().any(|m| m.name == **k)) {
      return Err(StatError::InvalidConfig(format!("unknown parameter: {unknown}")));
    }
    let config = Self {
      short_window: get_period(params, "short_window", DEFAULT_SHORT_WINDOW)?,
      numbers_per_draw: get_period(params, "numbers_per_draw", DEFAULT_NUMBERS_PER_DRAW)?,
      hot_factor: get_factor(params, "hot_factor", DEFAULT_HOT_FACTOR)?,
      cold_max_frequency: get_count(params, "cold_max_frequency", DEFAULT_COLD_MAX_FREQUENCY)?,
      top_n: get_period(params, "top_n", DEFAULT_TOP_N)?,
      ..Self::default()
    };
    config.validate()?;
    Ok(config)
  }

  /// Check every numeric parameter against its metadata range
  pub fn validate(&self) -> Result<()> {
    let values = [
      self.short_window.get() as f64,
      self.numbers_per_draw.get() as f64,
      self.hot_factor.get(),
      self.cold_max_frequency as f64,
      self.top_n.get() as f64,
    ];
    for (meta, value) in PARAMS.iter().zip(values) {
      meta.validate(value)?;
    }
    Ok(())
  }
}

// ============================================================
// PARAMETER METADATA
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Positive finite multiplier
  Factor,
  /// Positive integer
  Period,
  /// Non-negative integer
  Count,
}

/// Metadata for a single parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g., "short_window")
  pub name: &'static str,
  pub param_type: ParamType,
  pub default: f64,
  /// Accepted range, inclusive: (min, max)
  pub range: (f64, f64),
  /// Human-readable description
  pub description: &'static str,
}

impl ParamMeta {
  pub const fn factor(
    name: &'static str,
    default: f64,
    range: (f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Factor, default, range, description }
  }

  pub const fn period(
    name: &'static str,
    default: f64,
    range: (f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Period, default, range, description }
  }

  pub const fn count(
    name: &'static str,
    default: f64,
    range: (f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Count, default, range, description }
  }

  /// Validate a value for this parameter
  pub fn validate(&self, value: f64) -> Result<()> {
    let (min, max) = self.range;
    if value.is_nan() || value < min || value > max {
      return Err(StatError::OutOfRange { field: self.name, value, min, max });
    }
    match self.param_type {
      ParamType::Factor => Ok(()),
      ParamType::Period | ParamType::Count => {
        if value.fract() != 0.0 {
          return Err(StatError::InvalidValue("integer parameter has a fractional part"));
        }
        Ok(())
      },
    }
  }

  fn lookup(name: &str) -> Option<&'static ParamMeta> {
    PARAMS.iter().find(|m| m.name == name)
  }
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

fn checked(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<f64> {
  let value = params.get(key).copied().unwrap_or(default);
  if let Some(meta) = ParamMeta::lookup(key) {
    meta.validate(value)?;
  }
  Ok(value)
}

/// Helper to get a Factor from params with default fallback
pub fn get_factor(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Factor> {
  Factor::new(checked(params, key, default)?)
}

/// Helper to get a Period from params with default fallback
pub fn get_period(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<Period> {
  Period::new(checked(params, key, default as f64)? as usize)
}

/// Helper to get a non-negative count from params with default fallback
pub fn get_count(params: &HashMap<&str, f64>, key: &str, default: u32) -> Result<u32> {
  let value = checked(params, key, default as f64)?;
  if value < 0.0 || value.fract() != 0.0 {
    return Err(StatError::InvalidValue("count must be a non-negative integer"));
  }
  Ok(value as u32)
}

// ============================================================
// TESTS
// ============================================================
