use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    config::Config,
    error::ForecastError,
    model::{CurrentConditions, ForecastSample},
    provider::openweather::{ClientConfig, OpenWeatherClient},
};

pub mod openweather;

/// Source of raw weather data for a city.
///
/// Implementations perform network I/O; everything downstream of them is pure.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, ForecastError>;

    /// 3-hour samples in chronological order.
    async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastSample>, ForecastError>;
}

/// Construct the OpenWeather client from on-disk/env configuration.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let client_config: ClientConfig = config.client_config()?;
    Ok(Box::new(OpenWeatherClient::new(client_config)))
}
