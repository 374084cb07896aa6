//! Integration tests for the lottostat analysis engine.
//!
//! These tests drive the public API end to end: rows in, ranked summary out.

use chrono::{Duration, NaiveDate};
use lottostat::prelude::*;

/// Most recent draw date used by the generated histories
fn latest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 14).unwrap()
}

/// Rows for draws given most recent first, one draw every two days
fn rows_from(draws: &[Vec<u8>]) -> Vec<DrawnNumber> {
    draws
        .iter()
        .enumerate()
        .flat_map(|(i, numbers)| {
            let date = latest_date() - Duration::days(2 * i as i64);
            numbers.iter().map(move |&n| DrawnNumber::new(date, n))
        })
        .collect()
}

/// Source holding the same draws for a wheel
fn source_from(wheel: Wheel, draws: &[Vec<u8>]) -> MemorySource {
    let mut source = MemorySource::new();
    for (i, numbers) in draws.iter().enumerate() {
        source.push_draw(wheel, latest_date() - Duration::days(2 * i as i64), numbers);
    }
    source
}

/// Deterministic draws of five distinct numbers
fn generated_draws(n: usize) -> Vec<Vec<u8>> {
    (0..n)
        .map(|i| (0..5).map(|j| ((i * 31 + j * 13) % 90 + 1) as u8).collect())
        .collect()
}

fn numbers_of(list: &[RankedNumber]) -> Vec<u8> {
    list.iter().map(|r| r.number).collect()
}

// ============================================================
// SYNTHETIC SCENARIOS
// ============================================================

#[test]
fn test_fifty_identical_draws() {
    let draws = vec![vec![1, 2, 3, 4, 5]; 50];
    let rows = rows_from(&draws);
    let analyzer = Analyzer::default();

    let history = WheelHistory::from_rows(&rows).unwrap();
    let tables = analyzer.compute_tables(&history);
    for n in 1..=5 {
        assert_eq!(tables.short_window.frequency(n), 50);
    }
    for n in 6..=90 {
        assert_eq!(tables.short_window.frequency(n), 0);
    }
    assert!((tables.short_window.expected_frequency() - 250.0 / 90.0).abs() < 1e-9);

    let result = analyzer.analyze("Bari", &rows).unwrap();
    assert_eq!(
        result.hot_numbers,
        (1..=5).map(|n| RankedNumber::new(n, 50)).collect::<Vec<_>>()
    );
    assert!(result.cold_numbers.is_empty(), "never-drawn numbers sit at delay 50");
    assert_eq!(numbers_of(&result.top_frequent), vec![1, 2, 3, 4, 5]);
    assert!(result.top_delayed.iter().all(|r| r.value == 50));
    assert_eq!(numbers_of(&result.top_delayed), vec![6, 7, 8, 9, 10]);
    assert_eq!(result.patterns.consecutive_pairs, vec!["1-2", "2-3", "3-4", "4-5"]);
    assert!(result.patterns.twins.is_empty());
}

#[test]
fn test_latest_draw_patterns() {
    let draws = vec![vec![46, 11, 70, 22, 45], vec![1, 2, 3, 4, 5]];
    let result = Analyzer::default().analyze("Genova", &rows_from(&draws)).unwrap();
    assert_eq!(result.patterns.twins, vec![11, 22]);
    assert_eq!(result.patterns.consecutive_pairs, vec!["45-46"]);
}

#[test]
fn test_delay_of_latest_numbers_is_zero() {
    let draws = generated_draws(120);
    let history = WheelHistory::from_rows(&rows_from(&draws)).unwrap();
    let stats = NumberStats::compute(&history);
    for &n in &draws[0] {
        assert_eq!(stats.get(n).unwrap().delay, 0);
    }
    for (n, stat) in stats.iter() {
        if !stats.has_appeared(n) {
            assert_eq!(stat.delay as usize, history.len());
        } else {
            assert!((stat.delay as usize) < history.len());
        }
    }
}

#[test]
fn test_cold_numbers_seen_once_in_window() {
    // 60 draws; 90 and 89 appear exactly once inside the window, 88 only outside it
    let mut draws = vec![vec![1, 2, 3, 4, 5]; 60];
    draws[10] = vec![1, 2, 3, 4, 90];
    draws[30] = vec![1, 2, 3, 89, 5];
    draws[55] = vec![1, 2, 88, 4, 5];
    let result = Analyzer::default().analyze("Palermo", &rows_from(&draws)).unwrap();

    assert_eq!(
        result.cold_numbers,
        vec![RankedNumber::new(89, 1), RankedNumber::new(90, 1)]
    );
    assert!(result.hot_numbers.iter().all(|r| r.value > 4));
}

#[test]
fn test_short_history_uses_whole_history_as_window() {
    let draws = generated_draws(12);
    let rows = rows_from(&draws);
    let history = WheelHistory::from_rows(&rows).unwrap();
    let tables = Analyzer::default().compute_tables(&history);
    assert_eq!(tables.short_window.window_len(), 12);
    let window_total: u32 = tables.short_window.iter().map(|(_, f)| f).sum();
    assert_eq!(window_total as usize, history.total_numbers());
}

// ============================================================
// RANKING AND TIE-BREAK
// ============================================================

#[test]
fn test_top_lists_bounded_and_sorted() {
    let draws = generated_draws(300);
    let result = Analyzer::default().analyze("Torino", &rows_from(&draws)).unwrap();

    for list in [&result.top_frequent, &result.top_delayed, &result.hot_numbers] {
        assert!(list.len() <= 5);
        assert!(list.windows(2).all(|w| w[0].value >= w[1].value));
    }
    assert!(result.cold_numbers.windows(2).all(|w| w[0].value <= w[1].value));
    assert_eq!(result.top_frequent.len(), 5);
}

#[test]
fn test_ascending_number_tie_break() {
    let draws = vec![vec![60, 50, 40, 30, 20]];
    let rows = rows_from(&draws);

    let first_seen = Analyzer::default().analyze("Roma", &rows).unwrap();
    assert_eq!(numbers_of(&first_seen.top_frequent), vec![60, 50, 40, 30, 20]);

    let ascending = AnalyzerBuilder::new()
        .tie_break(TieBreak::AscendingNumber)
        .build()
        .unwrap()
        .analyze("Roma", &rows)
        .unwrap();
    assert_eq!(numbers_of(&ascending.top_frequent), vec![20, 30, 40, 50, 60]);
}

#[test]
fn test_custom_top_n() {
    let analyzer = AnalyzerBuilder::new().top_n(10).build().unwrap();
    let result = analyzer.analyze("Milano", &rows_from(&generated_draws(80))).unwrap();
    assert_eq!(result.top_frequent.len(), 10);
    assert_eq!(result.top_delayed.len(), 10);
}

// ============================================================
// BOUNDARY BEHAVIOUR
// ============================================================

#[test]
fn test_empty_history_error() {
    let source = MemorySource::new();
    let err = Analyzer::default().analyze_source(&source, "Venezia").unwrap_err();
    assert_eq!(err.message(), "no data for wheel Venezia");
}

#[test]
fn test_unknown_wheel_is_empty_history() {
    let source = source_from(Wheel::Bari, &generated_draws(3));
    let err = Analyzer::default().analyze_source(&source, "Atlantide").unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyHistory { .. }));
}

#[test]
fn test_unavailable_source_is_empty_history() {
    struct Offline;

    impl HistorySource for Offline {
        fn fetch(&self, _wheel: &str) -> std::result::Result<Vec<DrawnNumber>, SourceError> {
            Err(SourceError::Unavailable("connection refused".to_string()))
        }
    }

    let err = Analyzer::default().analyze_source(&Offline, "Bari").unwrap_err();
    assert_eq!(
        err,
        AnalysisError::EmptyHistory {
            wheel: "Bari".to_string()
        }
    );
}

#[test]
fn test_idempotent_analysis() {
    let rows = rows_from(&generated_draws(200));
    let analyzer = Analyzer::default();
    let a = analyzer.analyze("Firenze", &rows).unwrap();
    let b = analyzer.analyze("Firenze", &rows).unwrap();
    assert_eq!(a, b);
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}

#[test]
fn test_source_and_rows_agree() {
    let draws = generated_draws(40);
    let source = source_from(Wheel::Cagliari, &draws);
    let analyzer = Analyzer::default();
    let via_source = analyzer.analyze_source(&source, "Cagliari").unwrap();
    let via_rows = analyzer.analyze("Cagliari", &rows_from(&draws)).unwrap();
    assert_eq!(via_source, via_rows);
}

#[test]
fn test_result_json_shape() {
    let draws = vec![vec![11, 22, 45, 46, 70]];
    let result = Analyzer::default().analyze("Bari", &rows_from(&draws)).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["wheel"], "Bari");
    assert_eq!(json["latestDrawDate"], "14/10/2025");
    assert_eq!(json["topFrequent"][0], serde_json::json!([11, 1]));
    assert_eq!(json["patterns"]["twins"], serde_json::json!([11, 22]));
    assert_eq!(json["patterns"]["consecutivePairs"], serde_json::json!(["45-46"]));
    assert!(json["hotNumbers"].is_array());
    assert!(json["coldNumbers"].is_array());
}

// ============================================================
// PARALLEL ANALYSIS
// ============================================================

#[test]
fn test_parallel_analysis() {
    let mut source = source_from(Wheel::Bari, &generated_draws(100));
    for (i, numbers) in generated_draws(60).iter().enumerate() {
        source.push_draw(Wheel::Napoli, latest_date() - Duration::days(i as i64), numbers);
    }

    let wheels = vec!["Bari", "Napoli", "Roma", "Atlantide"];
    let (results, errors) = analyze_parallel(&Analyzer::default(), &source, wheels);

    let analyzed: Vec<&str> = results.iter().map(|r| r.wheel.as_str()).collect();
    assert_eq!(analyzed, vec!["Bari", "Napoli"]);
    let failed: Vec<&str> = errors.iter().map(|e| e.wheel.as_str()).collect();
    assert_eq!(failed, vec!["Roma", "Atlantide"]);
    assert!(errors
        .iter()
        .all(|e| matches!(e.error, AnalysisError::EmptyHistory { .. })));
}

#[test]
fn test_parallel_matches_sequential() {
    let mut source = MemorySource::new();
    for (w, wheel) in Wheel::ALL.iter().enumerate() {
        for (i, numbers) in generated_draws(30 + w * 7).iter().enumerate() {
            source.push_draw(*wheel, latest_date() - Duration::days(i as i64), numbers);
        }
    }
    let analyzer = Analyzer::default();
    let names: Vec<&str> = Wheel::ALL.iter().map(|w| w.as_str()).collect();

    let (results, errors) = analyze_parallel(&analyzer, &source, names.clone());
    assert!(errors.is_empty());
    for (result, name) in results.iter().zip(&names) {
        assert_eq!(result, &analyzer.analyze_source(&source, name).unwrap());
    }
}
