// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::config::WeatherConfig;
use crate::RouteError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

/// Departure weather scoring above this is reported as extreme.
pub const EXTREME_WEATHER_THRESHOLD: f64 = 15_000.0;

const POOR_VISIBILITY_KM: f64 = 5.0;
const POOR_VISIBILITY_PENALTY: f64 = 3_000.0;
const IDEAL_ARRIVAL_TEMP_C: f64 = 15.0;

/// Current conditions at a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_kph: f64,
    pub visibility_km: f64,
    pub precipitation_mm: f64,
}

impl WeatherSnapshot {
    fn visibility_penalty(&self) -> f64 {
        if self.visibility_km < POOR_VISIBILITY_KM {
            POOR_VISIBILITY_PENALTY
        } else {
            0.0
        }
    }

    /// Penalty for departing a leg's origin under these conditions.
    pub fn departure_penalty(&self) -> f64 {
        self.temperature_c.abs() * 50.0
            + self.humidity_pct * 100.0
            + self.wind_kph * 100.0
            + self.visibility_penalty()
            + self.precipitation_mm * 1000.0
    }

    /// Penalty for arriving at the final destination. Wind weighs heavier and
    /// temperature is measured from 15 °C.
    pub fn arrival_penalty(&self) -> f64 {
        (self.temperature_c - IDEAL_ARRIVAL_TEMP_C).abs() * 50.0
            + self.humidity_pct * 100.0
            + self.wind_kph * 300.0
            + self.visibility_penalty()
            + self.precipitation_mm * 1000.0
    }
}

/// Source of current weather. Unavailability is `None`, never an error.
pub trait WeatherProvider: Send + Sync {
    fn current(&self, lat: f64, lon: f64) -> Option<WeatherSnapshot>;
}

/// Provider used when weather scoring is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWeather;

impl WeatherProvider for NoWeather {
    fn current(&self, _lat: f64, _lon: f64) -> Option<WeatherSnapshot> {
        None
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    current: ApiCurrent,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    temp_c: f64,
    humidity: f64,
    wind_kph: f64,
    vis_km: f64,
    precip_mm: f64,
}

impl From<ApiCurrent> for WeatherSnapshot {
    fn from(c: ApiCurrent) -> Self {
        Self {
            temperature_c: c.temp_c,
            humidity_pct: c.humidity,
            wind_kph: c.wind_kph,
            visibility_km: c.vis_km,
            precipitation_mm: c.precip_mm,
        }
    }
}

/// weatherapi.com realtime client.
pub struct WeatherApiClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    pub fn new(config: &WeatherConfig, api_key: impl Into<String>) -> Result<Self, RouteError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: api_key.into(),
        })
    }

    /// Errors never carry the request URL, which holds the API key.
    fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, reqwest::Error> {
        // The API expects "lat,lon" in the q parameter
        let url = format!("{}?key={}&q={},{}", self.base_url, self.api_key, lat, lon);
        let body: ApiResponse = self
            .client
            .get(&url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json())
            .map_err(reqwest::Error::without_url)?;
        Ok(body.current.into())
    }
}

impl WeatherProvider for WeatherApiClient {
    fn current(&self, lat: f64, lon: f64) -> Option<WeatherSnapshot> {
        match self.fetch(lat, lon) {
            Ok(snapshot) => {
                debug!("Weather fetched — lat={} lon={} {:?}", lat, lon, snapshot);
                Some(snapshot)
            }
            Err(e) => {
                warn!(
                    "Weather lookup failed; skipping penalty — lat={} lon={} error={}",
                    lat, lon, e
                );
                None
            }
        }
    }
}

/// Per-run memo in front of a provider. Each airport is fetched at most once,
/// including lookups that came back empty; concurrent callers asking for the
/// same airport wait on the first fetch.
pub struct WeatherCache<'a> {
    provider: &'a dyn WeatherProvider,
    entries: Mutex<HashMap<String, Arc<OnceLock<Option<WeatherSnapshot>>>>>,
}

impl<'a> WeatherCache<'a> {
    pub fn new(provider: &'a dyn WeatherProvider) -> Self {
        Self {
            provider,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn lookup(&self, code: &str, coordinates: Option<(f64, f64)>) -> Option<WeatherSnapshot> {
        let (lat, lon) = coordinates?;
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(entries.entry(code.to_string()).or_default())
        };
        *cell.get_or_init(|| self.provider.current(lat, lon))
    }

    /// Number of airports looked up so far.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
