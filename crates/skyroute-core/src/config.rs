// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::RouteError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_WEATHER_URL: &str = "https://api.weatherapi.com/v1/current.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Upper bound on fitness evaluations (and so weather requests) in flight at once.
    pub max_concurrent: usize,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: DEFAULT_WEATHER_URL.to_string(),
            timeout_secs: 10,
            max_concurrent: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub population_size: usize,
    pub generations: usize,
    pub tournament_size: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub max_stops: usize,
    /// Initialization gives up after `population_size * init_retry_factor` attempts.
    pub init_retry_factor: usize,
    /// Fixed RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub weather: WeatherConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            generations: 3,
            tournament_size: 5,
            mutation_rate: 0.1,
            crossover_rate: 0.8,
            max_stops: 10,
            init_retry_factor: 50,
            seed: None,
            weather: WeatherConfig::default(),
        }
    }
}

impl OptimizerConfig {
    pub fn config_path() -> PathBuf {
        crate::get_config_root().join("optimizer.json")
    }

    /// Loads the user config, falling back to defaults when it is missing or unreadable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str::<OptimizerConfig>(&content) {
                    Ok(config) => return config,
                    Err(e) => log::warn!(
                        "Ignoring malformed optimizer config — path={} error={}",
                        path.display(),
                        e
                    ),
                },
                Err(e) => log::warn!(
                    "Cannot read optimizer config — path={} error={}",
                    path.display(),
                    e
                ),
            }
        }
        Self::default()
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), RouteError> {
        if self.population_size < 2 {
            return Err(RouteError::InvalidConfig(
                "population_size must be at least 2".to_string(),
            ));
        }
        if self.generations == 0 {
            return Err(RouteError::InvalidConfig(
                "generations must be at least 1".to_string(),
            ));
        }
        if self.tournament_size < 2 {
            return Err(RouteError::InvalidConfig(
                "tournament_size must be at least 2".to_string(),
            ));
        }
        for (name, rate) in [
            ("mutation_rate", self.mutation_rate),
            ("crossover_rate", self.crossover_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(RouteError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, rate
                )));
            }
        }
        if self.init_retry_factor == 0 {
            return Err(RouteError::InvalidConfig(
                "init_retry_factor must be at least 1".to_string(),
            ));
        }
        if self.weather.max_concurrent == 0 {
            return Err(RouteError::InvalidConfig(
                "weather.max_concurrent must be at least 1".to_string(),
            ));
        }
        if self.weather.timeout_secs == 0 {
            return Err(RouteError::InvalidConfig(
                "weather.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
