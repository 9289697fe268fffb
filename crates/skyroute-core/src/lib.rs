// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod aircraft;
pub mod airports;
pub mod config;
pub mod fitness;
pub mod geo;
pub mod matrix;
pub mod network;
pub mod operators;
pub mod optimizer;
pub mod population;
pub mod route;
pub mod route_graph;
pub mod weather;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Airport {0} has no coordinates")]
    MissingCoordinates(String),
    #[error("Unknown airport: {0}")]
    UnknownAirport(String),
    #[error("Aircraft model not found in catalog: {0}")]
    UnknownAircraft(String),
    #[error("Invalid max range '{value}' for aircraft {model}")]
    InvalidRange { model: String, value: String },
    #[error("Aircraft catalog is empty")]
    EmptyCatalog,
    #[error("Source and destination are the same airport: {0}")]
    SameEndpoints(String),
    #[error("Cannot generate distinct population: requested {requested}, generated {generated}")]
    PopulationExhausted { requested: usize, generated: usize },
    #[error("Population is empty")]
    EmptyPopulation,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Platform config directory (e.g. `~/.config/skyroute` on Linux).
pub fn get_config_root() -> PathBuf {
    directories::ProjectDirs::from("org", "skyroute", "SkyRoute")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
