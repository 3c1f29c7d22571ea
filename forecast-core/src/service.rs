use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    aggregate::{DEFAULT_MAX_DAYS, aggregate},
    chart,
    error::ForecastError,
    model::{DailyAggregate, WeatherReport, WeatherSnapshot},
    provider::WeatherSource,
};

/// Drives one city lookup through fetch, aggregation and rendering.
#[derive(Debug, Clone)]
pub struct ForecastService {
    source: Arc<dyn WeatherSource>,
    max_days: usize,
}

impl ForecastService {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source, max_days: DEFAULT_MAX_DAYS }
    }

    pub fn with_max_days(mut self, max_days: usize) -> Self {
        self.max_days = max_days;
        self
    }

    /// Trimmed city name, or a validation failure if nothing is left.
    pub fn validate_city(city: &str) -> Result<&str, ForecastError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(ForecastError::missing_city());
        }
        Ok(city)
    }

    /// Current conditions followed by the forecast, one request after the other.
    #[instrument(skip(self))]
    pub async fn snapshot(&self, city: &str) -> Result<WeatherSnapshot, ForecastError> {
        let city = Self::validate_city(city)?;

        let current = self.source.fetch_current(city).await?;
        let samples = self.source.fetch_forecast(city).await?;
        info!(city, samples = samples.len(), "fetched weather");

        Ok(WeatherSnapshot { current, samples })
    }

    pub fn daily(&self, snapshot: &WeatherSnapshot) -> Vec<DailyAggregate> {
        aggregate(&snapshot.samples, self.max_days)
    }

    /// Full report; fails as a whole if any stage fails.
    #[instrument(skip(self))]
    pub async fn report(&self, city: &str) -> Result<WeatherReport, ForecastError> {
        let snapshot = self.snapshot(city).await?;
        let forecast = self.daily(&snapshot);
        let chart = chart::render(&snapshot.samples, Self::validate_city(city)?)?;

        Ok(WeatherReport {
            current: snapshot.current,
            forecast,
            chart,
        })
    }
}
