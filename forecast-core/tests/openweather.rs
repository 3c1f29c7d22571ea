//! OpenWeather client against a mocked provider.

use std::sync::Arc;

use forecast_core::{
    ClientConfig, FetchCause, ForecastError, ForecastService, OpenWeatherClient, WeatherSource,
    aggregate,
};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

// =============================================================================
// Test Helpers
// =============================================================================

fn client(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::new(ClientConfig {
        api_key: "test_key".to_string(),
        base_url: format!("{}/data/2.5", server.uri()),
    })
}

fn current_body() -> Value {
    json!({
        "coord": { "lon": -0.13, "lat": 51.51 },
        "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
        "main": {
            "temp": 11.8, "feels_like": 11.2, "temp_min": 10.9, "temp_max": 12.6,
            "pressure": 1006, "humidity": 88
        },
        "wind": { "speed": 5.66, "deg": 230 },
        "sys": { "country": "GB", "sunrise": 1700000000, "sunset": 1700030000 },
        "name": "London",
        "cod": 200
    })
}

/// 40 entries, 3 hours apart, starting at midnight: five full dates.
fn forecast_body() -> Value {
    let list: Vec<Value> = (0..40)
        .map(|i| {
            let day = 10 + i / 8;
            let hour = (i % 8) * 3;
            let description = match i % 4 {
                0 => "clear sky",
                1 => "broken clouds",
                2 => "light rain",
                _ => "mist",
            };
            json!({
                "dt": 1_700_000_000 + i * 10_800,
                "main": {
                    "temp": 8.0 + (i % 8) as f64,
                    "feels_like": 7.0,
                    "temp_min": 7.5 + (i % 8) as f64,
                    "temp_max": 8.5 + (i % 8) as f64,
                    "pressure": 1010,
                    "humidity": 60 + (i % 8)
                },
                "weather": [{ "description": description, "icon": "01d" }],
                "wind": { "speed": 3.1 },
                "dt_txt": format!("2024-11-{day:02} {hour:02}:00:00")
            })
        })
        .collect();

    json!({ "cod": "200", "cnt": 40, "list": list, "city": { "name": "London", "country": "GB" } })
}

async fn mount_ok(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/data/2.5/{route}")))
        .and(query_param("q", "London"))
        .and(query_param("appid", "test_key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

// =============================================================================
// Current conditions
// =============================================================================

#[tokio::test]
async fn fetch_current_parses_nested_payload() {
    let server = MockServer::start().await;
    mount_ok(&server, "weather", current_body()).await;

    let current = client(&server).fetch_current("London").await.unwrap();

    assert_eq!(current.city, "London");
    assert_eq!(current.country, "GB");
    assert_eq!(current.temperature, 11.8);
    assert_eq!(current.feels_like, 11.2);
    assert_eq!(current.humidity, 88);
    assert_eq!(current.pressure, 1006);
    assert_eq!(current.wind_speed, 5.66);
    assert_eq!(current.description, "light rain");
    assert_eq!(current.display_description(), "Light Rain");
    assert_eq!(current.icon, "10d");
}

#[tokio::test]
async fn missing_main_is_malformed() {
    let server = MockServer::start().await;
    let mut body = current_body();
    body.as_object_mut().unwrap().remove("main");
    mount_ok(&server, "weather", body).await;

    let err = client(&server).fetch_current("London").await.unwrap_err();

    match &err {
        ForecastError::MalformedResponse { endpoint, reason } => {
            assert_eq!(*endpoint, "current");
            assert!(reason.contains("main"), "{reason}");
        }
        other => panic!("expected malformed response, got {other:?}"),
    }
}

#[tokio::test]
async fn city_not_found_is_fetch_failure_with_provider_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let err = client(&server).fetch_current("Atlantis").await.unwrap_err();

    match &err {
        ForecastError::Fetch { endpoint, cause: FetchCause::Status { status, message } } => {
            assert_eq!(*endpoint, "current");
            assert_eq!(status.as_u16(), 404);
            assert_eq!(message, "city not found");
        }
        other => panic!("expected fetch failure, got {other:?}"),
    }
    assert!(err.to_string().contains("city not found"));
}

#[tokio::test]
async fn unauthorized_is_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&server)
        .await;

    let err = client(&server).fetch_current("London").await.unwrap_err();
    assert!(matches!(err, ForecastError::Fetch { .. }));
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn unreachable_provider_is_transport_failure() {
    let client = OpenWeatherClient::new(ClientConfig {
        api_key: "test_key".to_string(),
        base_url: "http://127.0.0.1:1".to_string(),
    });

    let err = client.fetch_current("London").await.unwrap_err();
    assert!(matches!(err, ForecastError::Fetch { cause: FetchCause::Transport(_), .. }));
}

// =============================================================================
// Forecast
// =============================================================================

#[tokio::test]
async fn fetch_forecast_keeps_provider_order() {
    let server = MockServer::start().await;
    mount_ok(&server, "forecast", forecast_body()).await;

    let samples = client(&server).fetch_forecast("London").await.unwrap();

    assert_eq!(samples.len(), 40);
    assert!(samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(samples[0].timestamp.to_string(), "2024-11-10 00:00:00");
    assert_eq!(samples[0].description, "clear sky");
    assert_eq!(samples[1].temp_max, 9.5);
}

#[tokio::test]
async fn forecast_entry_without_dt_txt_is_malformed() {
    let server = MockServer::start().await;
    let mut body = forecast_body();
    body["list"][3].as_object_mut().unwrap().remove("dt_txt");
    mount_ok(&server, "forecast", body).await;

    let err = client(&server).fetch_forecast("London").await.unwrap_err();
    assert!(matches!(err, ForecastError::MalformedResponse { endpoint: "forecast", .. }));
}

#[tokio::test]
async fn forty_samples_aggregate_to_five_days() {
    let server = MockServer::start().await;
    mount_ok(&server, "forecast", forecast_body()).await;

    let samples = client(&server).fetch_forecast("London").await.unwrap();
    let days = aggregate(&samples, 5);

    assert_eq!(days.len(), 5);
    assert_eq!(days[0].label, "Sun, Nov 10");
    assert!(days.windows(2).all(|w| w[0].date < w[1].date));
    // index 4 of 8 is "clear sky"
    assert!(days.iter().all(|d| d.description == "Clear Sky"));
    assert_eq!(days[0].min_temp, 7.5);
    assert_eq!(days[0].max_temp, 15.5);
    assert_eq!(days[0].avg_temp, 11.5);
}

// =============================================================================
// Service
// =============================================================================

#[tokio::test]
async fn snapshot_fetches_current_then_forecast() {
    let server = MockServer::start().await;
    mount_ok(&server, "weather", current_body()).await;
    mount_ok(&server, "forecast", forecast_body()).await;

    let service = ForecastService::new(Arc::new(client(&server)));
    let snapshot = service.snapshot("London").await.unwrap();

    assert_eq!(snapshot.current.city, "London");
    assert_eq!(snapshot.samples.len(), 40);
    assert_eq!(service.daily(&snapshot).len(), 5);
}

#[tokio::test]
async fn forecast_failure_fails_the_report() {
    let server = MockServer::start().await;
    mount_ok(&server, "weather", current_body()).await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let service = ForecastService::new(Arc::new(client(&server)));
    let err = service.report("London").await.unwrap_err();

    assert!(matches!(err, ForecastError::Fetch { endpoint: "forecast", .. }));
}
