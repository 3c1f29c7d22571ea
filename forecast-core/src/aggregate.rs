//! Per-day aggregation of 3-hour forecast samples.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    icon::icon_for,
    model::{DailyAggregate, ForecastSample},
};

pub const DEFAULT_MAX_DAYS: usize = 5;

const DAY_LABEL_FORMAT: &str = "%a, %b %d";

/// Groups `samples` by calendar date and summarizes the first `max_days` dates.
///
/// Samples keep their input order inside a day. The representative description
/// of a day is taken from the sample at index `count / 2`.
pub fn aggregate(samples: &[ForecastSample], max_days: usize) -> Vec<DailyAggregate> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&ForecastSample>> = BTreeMap::new();
    for sample in samples {
        by_date.entry(sample.date()).or_default().push(sample);
    }

    by_date
        .into_iter()
        .take(max_days)
        .map(|(date, day)| summarize_day(date, &day))
        .collect()
}

fn summarize_day(date: NaiveDate, day: &[&ForecastSample]) -> DailyAggregate {
    let count = day.len() as f64;
    let avg_temp = day.iter().map(|s| s.temperature).sum::<f64>() / count;
    let min_temp = day.iter().map(|s| s.temp_min).fold(f64::INFINITY, f64::min);
    let max_temp = day.iter().map(|s| s.temp_max).fold(f64::NEG_INFINITY, f64::max);

    let description = title_case(&day[day.len() / 2].description);
    let icon = icon_for(&description);

    DailyAggregate {
        label: date.format(DAY_LABEL_FORMAT).to_string(),
        date,
        avg_temp,
        min_temp,
        max_temp,
        description,
        icon,
    }
}

/// Uppercases the first letter of every word and lowercases the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
