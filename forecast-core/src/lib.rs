//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather data source abstraction and its OpenWeather client
//! - Per-day aggregation of 3-hour forecast samples
//! - Rendering of the 24-hour temperature/humidity chart
//! - JSON/CSV export of a lookup
//!
//! It is used by `forecast-cli` for both console and web output.

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod error;
pub mod export;
pub mod icon;
pub mod model;
pub mod provider;
pub mod service;

pub use aggregate::{DEFAULT_MAX_DAYS, aggregate};
pub use chart::{ChartImage, render};
pub use config::Config;
pub use error::{FetchCause, ForecastError};
pub use icon::{WeatherIcon, icon_for};
pub use model::{CurrentConditions, DailyAggregate, ForecastSample, WeatherReport, WeatherSnapshot};
pub use provider::{
    WeatherSource,
    openweather::{ClientConfig, OpenWeatherClient},
};
pub use service::ForecastService;
