// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::airports::AirportTable;
use crate::RouteError;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One airport entry of the airline routes JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphAirport {
    #[serde(default)]
    pub city_name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub routes: Vec<GraphRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphRoute {
    pub iata: String,
    #[serde(default)]
    pub km: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
}

/// A timetable edge with known distance and duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub to: String,
    pub km: f64,
    pub minutes: f64,
}

impl Edge {
    pub fn cost(&self) -> f64 {
        self.km + self.minutes
    }
}

/// Coordinates appear both as numbers and as numeric strings in the wild.
fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    })
}

/// Airline route graph keyed by IATA code. Keys are kept sorted so matrix
/// index assignment is stable across runs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RouteGraph {
    airports: BTreeMap<String, GraphAirport>,
}

impl RouteGraph {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RouteError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RouteError> {
        let graph: RouteGraph = serde_json::from_reader(reader)?;
        log::debug!("Loaded route graph — airports={}", graph.airports.len());
        Ok(graph)
    }

    pub fn from_airports(airports: impl IntoIterator<Item = (String, GraphAirport)>) -> Self {
        Self {
            airports: airports.into_iter().collect(),
        }
    }

    pub fn get(&self, code: &str) -> Option<&GraphAirport> {
        self.airports.get(code)
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    pub fn coordinates(&self, code: &str) -> Option<(f64, f64)> {
        let airport = self.airports.get(code)?;
        match (airport.latitude, airport.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Edges whose destination is a known airport and whose distance and duration
    /// are both present. Origins left without any edge are omitted, so the keys of
    /// the returned map are exactly the airports the optimizer can route through.
    pub fn resolved_edges(&self, table: &AirportTable) -> BTreeMap<String, Vec<Edge>> {
        let mut resolved = BTreeMap::new();
        for (code, airport) in &self.airports {
            let edges: Vec<Edge> = airport
                .routes
                .iter()
                .filter(|r| table.contains(&r.iata))
                .filter_map(|r| match (r.km, r.min) {
                    (Some(km), Some(minutes)) => Some(Edge {
                        to: r.iata.clone(),
                        km,
                        minutes,
                    }),
                    _ => None,
                })
                .collect();
            if !edges.is_empty() {
                resolved.insert(code.clone(), edges);
            }
        }
        resolved
    }
}
