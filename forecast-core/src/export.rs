//! JSON, CSV and PNG files written by console mode.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::info;

use crate::model::{CurrentConditions, ForecastSample};

/// Number of samples included in the JSON summary.
pub const SUMMARY_SAMPLES: usize = 10;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Makes a city name safe to embed in a file name.
pub fn sanitize_file_stem(city: &str) -> String {
    let stem: String = city
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    if stem.is_empty() { "city".to_string() } else { stem }
}

pub fn json_file_name(city: &str) -> String {
    format!("weather_data_{}.json", sanitize_file_stem(city))
}

pub fn csv_file_name(city: &str) -> String {
    format!("forecast_data_{}.csv", sanitize_file_stem(city))
}

pub fn chart_file_name(city: &str) -> String {
    format!("weather_forecast_{}.png", sanitize_file_stem(city))
}

#[derive(Debug, Serialize)]
struct WeatherSummary<'a> {
    city: &'a str,
    country: &'a str,
    current_weather: CurrentSummary<'a>,
    forecast: Vec<SampleSummary<'a>>,
}

#[derive(Debug, Serialize)]
struct CurrentSummary<'a> {
    temperature: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
    wind_speed: f64,
    description: &'a str,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct SampleSummary<'a> {
    datetime: String,
    temperature: f64,
    humidity: u8,
    pressure: u32,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    datetime: String,
    temperature: f64,
    humidity: u8,
    pressure: u32,
    wind_speed: f64,
    description: &'a str,
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(DATETIME_FORMAT).to_string()
}

fn prepare_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))
}

/// Writes `weather_data_<city>.json` and returns its path.
pub fn write_json_summary(
    dir: &Path,
    city: &str,
    current: &CurrentConditions,
    samples: &[ForecastSample],
) -> Result<PathBuf> {
    prepare_dir(dir)?;

    let summary = WeatherSummary {
        city,
        country: &current.country,
        current_weather: CurrentSummary {
            temperature: current.temperature,
            feels_like: current.feels_like,
            humidity: current.humidity,
            pressure: current.pressure,
            wind_speed: current.wind_speed,
            description: &current.description,
            timestamp: Local::now().format(DATETIME_FORMAT).to_string(),
        },
        forecast: samples
            .iter()
            .take(SUMMARY_SAMPLES)
            .map(|s| SampleSummary {
                datetime: format_timestamp(&s.timestamp),
                temperature: s.temperature,
                humidity: s.humidity,
                pressure: s.pressure,
                description: &s.description,
            })
            .collect(),
    };

    let path = dir.join(json_file_name(city));
    let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
    fs::write(&path, json)
        .with_context(|| format!("Failed to write JSON summary: {}", path.display()))?;

    info!(path = %path.display(), "saved JSON summary");
    Ok(path)
}

/// Writes every sample to `forecast_data_<city>.csv` and returns its path.
pub fn write_forecast_csv(dir: &Path, city: &str, samples: &[ForecastSample]) -> Result<PathBuf> {
    prepare_dir(dir)?;

    let path = dir.join(csv_file_name(city));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    if samples.is_empty() {
        writer.write_record([
            "datetime",
            "temperature",
            "humidity",
            "pressure",
            "wind_speed",
            "description",
        ])?;
    }

    for s in samples {
        writer.serialize(CsvRow {
            datetime: format_timestamp(&s.timestamp),
            temperature: s.temperature,
            humidity: s.humidity,
            pressure: s.pressure,
            wind_speed: s.wind_speed,
            description: &s.description,
        })?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;

    info!(path = %path.display(), rows = samples.len(), "saved forecast CSV");
    Ok(path)
}
