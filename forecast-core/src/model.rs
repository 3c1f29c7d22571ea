use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::{aggregate::title_case, chart::ChartImage, icon::WeatherIcon};

/// Current conditions for a city, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed: f64,
    /// Provider text, e.g. "light rain"; serialized title-cased.
    #[serde(serialize_with = "serialize_title_case")]
    pub description: String,
    /// Provider icon code, e.g. "10d".
    pub icon: String,
}

impl CurrentConditions {
    /// Description as shown to users, e.g. "Light Rain".
    pub fn display_description(&self) -> String {
        title_case(&self.description)
    }
}

fn serialize_title_case<S: Serializer>(text: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&title_case(text))
}

/// One 3-hour forecast reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSample {
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed: f64,
    pub description: String,
}

impl ForecastSample {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Summary of all samples sharing one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAggregate {
    /// Display label, e.g. "Mon, Jan 15".
    #[serde(rename = "date")]
    pub label: String,
    #[serde(rename = "iso_date")]
    pub date: NaiveDate,
    pub avg_temp: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub description: String,
    pub icon: WeatherIcon,
}

/// Raw result of the two provider calls for a city.
#[derive(Debug, Clone)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub samples: Vec<ForecastSample>,
}

/// Everything the web endpoint returns on success.
#[derive(Debug, Clone)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: Vec<DailyAggregate>,
    pub chart: ChartImage,
}
