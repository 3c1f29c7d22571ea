use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    error::{FetchCause, ForecastError},
    model::{CurrentConditions, ForecastSample},
};

use super::WeatherSource;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const UNITS: &str = "metric";
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const CURRENT: &str = "current";
const FORECAST: &str = "forecast";

/// Credential and endpoint for the OpenWeather API.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    config: ClientConfig,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        city: &str,
    ) -> Result<T, ForecastError> {
        let fetch_err = |cause: FetchCause| ForecastError::Fetch { endpoint, cause };

        debug!(endpoint, city, "requesting OpenWeather");
        let res = self
            .http
            .get(self.url(path))
            .query(&[
                ("q", city),
                ("appid", self.config.api_key.as_str()),
                ("units", UNITS),
            ])
            .send()
            .await
            .map_err(|e| fetch_err(e.into()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| fetch_err(e.into()))?;

        if !status.is_success() {
            let message = provider_message(&body);
            warn!(endpoint, %status, %message, "OpenWeather request failed");
            return Err(fetch_err(FetchCause::Status { status, message }));
        }

        serde_json::from_str(&body).map_err(|e| ForecastError::malformed(endpoint, e.to_string()))
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, ForecastError> {
        let parsed: OwCurrentResponse = self.get(CURRENT, "weather", city).await?;
        parsed.into_conditions()
    }

    #[instrument(skip(self))]
    async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastSample>, ForecastError> {
        let parsed: OwForecastResponse = self.get(FORECAST, "forecast", city).await?;
        let samples = parsed
            .list
            .into_iter()
            .map(OwForecastEntry::into_sample)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = samples.len(), "parsed forecast samples");
        Ok(samples)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl OwCurrentResponse {
    fn into_conditions(self) -> Result<CurrentConditions, ForecastError> {
        let weather = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| ForecastError::malformed(CURRENT, "empty `weather` list"))?;

        Ok(CurrentConditions {
            city: self.name,
            country: self.sys.country,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            wind_speed: self.wind.speed,
            description: weather.description,
            icon: weather.icon,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl OwForecastEntry {
    fn into_sample(self) -> Result<ForecastSample, ForecastError> {
        let timestamp = NaiveDateTime::parse_from_str(&self.dt_txt, DT_TXT_FORMAT).map_err(|e| {
            ForecastError::malformed(FORECAST, format!("bad `dt_txt` '{}': {e}", self.dt_txt))
        })?;

        let weather = self.weather.into_iter().next().ok_or_else(|| {
            ForecastError::malformed(FORECAST, format!("empty `weather` list at {timestamp}"))
        })?;

        Ok(ForecastSample {
            timestamp,
            temperature: self.main.temp,
            temp_min: self.main.temp_min,
            temp_max: self.main.temp_max,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            wind_speed: self.wind.speed,
            description: weather.description,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

/// The provider's own `message` when the body is its JSON error shape, else the raw body.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<OwErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
