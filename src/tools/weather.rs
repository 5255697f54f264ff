//! Weather lookup backed by WeatherAPI.com
//!
//! A single `forecast.json` request returns both current conditions and the
//! multi-day forecast. The raw response is reduced to a compact
//! [`WeatherReport`] before it is handed to the model.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::error::ToolError;
use super::trait_def::{destination_arg, destination_schema, Tool};
use crate::config::{ApiKey, TravelConfig, WEATHER_API_KEY_VAR};

const PROVIDER: &str = "WeatherAPI";
const LOCATION_NOT_FOUND_CODE: u32 = 1006;
const SLOW_RESPONSE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherReport {
    pub location: LocationInfo,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationInfo {
    pub name: String,
    pub region: String,
    pub country: String,
    pub localtime: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentConditions {
    pub condition: String,
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub wind_kph: f64,
    pub humidity: f64,
    pub cloud: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    /// Percent, when the provider reports it
    pub daily_chance_of_rain: Option<u8>,
    pub condition: String,
}

pub struct WeatherTool {
    client: reqwest::Client,
    base_url: String,
    api_key: ApiKey,
    forecast_days: u8,
}

impl WeatherTool {
    pub fn new(
        base_url: impl Into<String>,
        api_key: ApiKey,
        forecast_days: u8,
        timeout: Duration,
    ) -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ToolError::provider(PROVIDER, format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            forecast_days,
        })
    }

    pub fn from_config(config: &TravelConfig) -> Result<Self, ToolError> {
        let api_key = config.weather_api_key.clone().ok_or_else(|| {
            ToolError::provider(PROVIDER, format!("{} is not set", WEATHER_API_KEY_VAR))
        })?;

        Self::new(
            config.weather_base_url.clone(),
            api_key,
            config.forecast_days,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Fetches current conditions and the forecast for a destination
    pub async fn fetch(&self, destination: &str) -> Result<WeatherReport, ToolError> {
        let url = format!("{}/forecast.json", self.base_url);
        info!(destination, days = self.forecast_days, "Requesting weather forecast");

        let days = self.forecast_days.to_string();
        let start = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.expose()),
                ("q", destination),
                ("days", days.as_str()),
                ("aqi", "no"),
                ("alerts", "no"),
            ])
            .send()
            .await
            .map_err(|e| ToolError::provider(PROVIDER, describe_transport_error(e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ToolError::provider(PROVIDER, describe_transport_error(e)))?;

        let elapsed = start.elapsed();
        debug!(
            destination,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Weather response received"
        );
        if elapsed > SLOW_RESPONSE {
            warn!(
                destination,
                elapsed_secs = elapsed.as_secs_f64(),
                "Slow response from weather provider"
            );
        }

        if !status.is_success() {
            return Err(status_error(destination, status.as_u16(), &body));
        }

        let raw: weatherapi::ForecastResponse = serde_json::from_str(&body).map_err(|e| {
            error!(destination, error = %e, "Failed to parse weather response");
            ToolError::provider(PROVIDER, format!("Malformed forecast response: {}", e))
        })?;

        Ok(raw.into())
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &'static str {
        "get_weather"
    }

    fn description(&self) -> &'static str {
        "Fetch the current weather and a multi-day forecast for a destination. \
         Returns location details, current conditions and one entry per forecast day."
    }

    fn schema(&self) -> Value {
        destination_schema(
            "Destination to look up, e.g. 'Paris', 'San Francisco, USA' or '48.8566,2.3522'",
        )
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let destination = destination_arg(&arguments)?;
        let report = self.fetch(&destination).await?;

        serde_json::to_value(report)
            .map_err(|e| ToolError::provider(PROVIDER, format!("Failed to encode report: {}", e)))
    }
}

fn status_error(destination: &str, status: u16, body: &str) -> ToolError {
    match serde_json::from_str::<weatherapi::ErrorResponse>(body) {
        Ok(err) if err.error.code == LOCATION_NOT_FOUND_CODE => ToolError::NotFound {
            location: destination.to_string(),
        },
        Ok(err) => ToolError::provider_status(PROVIDER, status, err.error.message),
        Err(_) => {
            let snippet: String = body.chars().take(200).collect();
            ToolError::provider_status(PROVIDER, status, snippet)
        }
    }
}

/// reqwest errors carry the full URL, which includes the key
fn describe_transport_error(e: reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        "connection failed".to_string()
    } else {
        e.without_url().to_string()
    }
}

/// WeatherAPI.com wire format
mod weatherapi {
    use super::{CurrentConditions, ForecastDay, LocationInfo, WeatherReport};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    #[derive(Debug, Deserialize)]
    pub struct ErrorResponse {
        pub error: ErrorBody,
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        pub code: u32,
        pub message: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub location: Location,
        pub current: Current,
        pub forecast: Forecast,
    }

    #[derive(Debug, Deserialize)]
    pub struct Location {
        pub name: String,
        #[serde(default)]
        pub region: String,
        #[serde(default)]
        pub country: String,
        #[serde(default)]
        pub localtime: String,
        pub lat: f64,
        pub lon: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        #[serde(default)]
        pub text: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Current {
        pub temp_c: f64,
        pub feelslike_c: f64,
        pub wind_kph: f64,
        pub humidity: f64,
        pub cloud: f64,
        pub condition: Condition,
    }

    #[derive(Debug, Deserialize)]
    pub struct Forecast {
        #[serde(default)]
        pub forecastday: Vec<ForecastDayEntry>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastDayEntry {
        pub date: NaiveDate,
        pub day: Day,
    }

    #[derive(Debug, Deserialize)]
    pub struct Day {
        pub maxtemp_c: f64,
        pub mintemp_c: f64,
        #[serde(default, deserialize_with = "chance_of_rain")]
        pub daily_chance_of_rain: Option<u8>,
        pub condition: Option<Condition>,
    }

    /// Older responses send the percentage as a string
    fn chance_of_rain<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum NumberOrString {
            Number(f64),
            Text(String),
        }

        let value = Option::<NumberOrString>::deserialize(deserializer)?;
        let percent = match value {
            None => None,
            Some(NumberOrString::Number(n)) => Some(n),
            Some(NumberOrString::Text(s)) => s.trim().parse::<f64>().ok(),
        };

        Ok(percent.map(|p| p.clamp(0.0, 100.0).round() as u8))
    }

    impl From<ForecastResponse> for WeatherReport {
        fn from(raw: ForecastResponse) -> Self {
            Self {
                location: LocationInfo {
                    name: raw.location.name,
                    region: raw.location.region,
                    country: raw.location.country,
                    localtime: raw.location.localtime,
                    lat: raw.location.lat,
                    lon: raw.location.lon,
                },
                current: CurrentConditions {
                    condition: raw.current.condition.text,
                    temp_c: raw.current.temp_c,
                    feelslike_c: raw.current.feelslike_c,
                    wind_kph: raw.current.wind_kph,
                    humidity: raw.current.humidity,
                    cloud: raw.current.cloud,
                },
                forecast: raw
                    .forecast
                    .forecastday
                    .into_iter()
                    .map(|entry| ForecastDay {
                        date: entry.date,
                        maxtemp_c: entry.day.maxtemp_c,
                        mintemp_c: entry.day.mintemp_c,
                        daily_chance_of_rain: entry.day.daily_chance_of_rain,
                        condition: entry.day.condition.map(|c| c.text).unwrap_or_default(),
                    })
                    .collect(),
            }
        }
    }
}
