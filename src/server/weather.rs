//! weather.rs
//! Adaptador de clima (Open-Meteo `current_weather`). Nunca falla hacia fuera:
//! si el proveedor no responde se devuelve (24.5 °C, Sunny) con la causa.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::fetch::get_json;
use crate::models::types::{AppCfg, Sourced, WeatherCondition, WeatherReading};

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: f64,
}

#[derive(Clone)]
pub struct WeatherClient {
    pub(crate) http: Client,
    /// Endpoint base, p.ej: "https://api.open-meteo.com"
    pub base_url: String,
    pub timeout: Duration,
}

impl WeatherClient {
    pub fn new(http: Client, cfg: &AppCfg) -> Self {
        Self { http, base_url: cfg.weather_url.trim_end_matches('/').to_string(), timeout: cfg.weather_timeout }
    }

    pub async fn fetch_weather(&self, lat: f64, lon: f64) -> Sourced<WeatherReading> {
        let url = format!("{}/v1/forecast", self.base_url);
        let query = [
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            ("current_weather", "true".to_string()),
        ];
        match get_json::<ForecastResponse>(&self.http, &url, &query, self.timeout).await {
            Ok(r) => {
                let cw = r.current_weather;
                Sourced::Live(WeatherReading::new(cw.temperature, WeatherCondition::from_code(cw.weathercode)))
            }
            Err(reason) => Sourced::Fallback { value: WeatherReading::fallback(), reason },
        }
    }
}
