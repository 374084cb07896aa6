//! Draw grouping: flat number rows into per-date draw events

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::helpers::{in_pool, MAX_NUMBER, MIN_NUMBER};
use crate::{DrawEvent, DrawnNumber, Result, StatError, WheelHistory};

/// Group rows by draw date into a most-recent-first [`WheelHistory`].
///
/// Rows sharing a date always land in one event, even when the source
/// interleaves them. Numbers keep the order in which the source supplied
/// them for that date.
pub fn group_draws(rows: &[DrawnNumber]) -> Result<WheelHistory> {
    if rows.is_empty() {
        return Err(StatError::EmptyHistory);
    }

    let mut by_date: BTreeMap<NaiveDate, Vec<u8>> = BTreeMap::new();
    for row in rows {
        if !in_pool(row.number) {
            return Err(StatError::NumberOutOfRange {
                number: row.number,
                date: row.date,
                min: MIN_NUMBER,
                max: MAX_NUMBER,
            });
        }
        by_date.entry(row.date).or_default().push(row.number);
    }

    let events = by_date
        .into_iter()
        .rev()
        .map(|(date, numbers)| DrawEvent { date, numbers })
        .collect();

    Ok(WheelHistory::from_events_unchecked(events))
}
