// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::RouteError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const KM_PER_NM: f64 = 1.852;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftSpec {
    pub range_km: f64,
    pub mach: f64,
}

/// Raw row of the aircraft reference CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct AircraftRecord {
    #[serde(rename = "Aircraft Model")]
    pub model: String,
    #[serde(rename = "Max Range (NM)")]
    pub max_range: String,
    #[serde(
        rename = "Max Operation Mach No",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub mach: Option<f64>,
}

/// Parses a max-range field in nautical miles into kilometers (2 decimals).
///
/// Accepts thousands separators, `NM`/`nm` suffixes and dual values such as
/// `"3,200nm / 2800nm"`, of which the first is used.
pub fn parse_range_km(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', "").replace("NM", "").replace("nm", "");
    let first = cleaned.split('/').next()?.trim();
    let nm: f64 = first.parse().ok()?;
    if !nm.is_finite() {
        return None;
    }
    Some(round2(nm * KM_PER_NM))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aircraft models by name. Ordered, so seeded random choices are reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AircraftCatalog {
    models: BTreeMap<String, AircraftSpec>,
}

impl AircraftCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RouteError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RouteError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let records = rdr
            .deserialize::<AircraftRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_records(&records)
    }

    /// Records without a Mach number get the mean of the known ones.
    pub fn from_records(records: &[AircraftRecord]) -> Result<Self, RouteError> {
        let known: Vec<f64> = records.iter().filter_map(|r| r.mach).collect();
        let mean_mach = if known.is_empty() {
            0.0
        } else {
            round2(known.iter().sum::<f64>() / known.len() as f64)
        };

        let mut models = BTreeMap::new();
        for record in records {
            let range_km =
                parse_range_km(&record.max_range).ok_or_else(|| RouteError::InvalidRange {
                    model: record.model.clone(),
                    value: record.max_range.clone(),
                })?;
            let mach = record.mach.unwrap_or(mean_mach);
            models.insert(record.model.clone(), AircraftSpec { range_km, mach });
        }

        if models.is_empty() {
            return Err(RouteError::EmptyCatalog);
        }
        log::debug!(
            "Parsed aircraft catalog — models={} mach_filled={}",
            models.len(),
            records.len() - known.len()
        );
        Ok(Self { models })
    }

    pub fn from_specs(specs: impl IntoIterator<Item = (String, AircraftSpec)>) -> Self {
        Self {
            models: specs.into_iter().collect(),
        }
    }

    /// Narrows the catalog to `allowed`. An empty list keeps every model.
    pub fn filtered(&self, allowed: &[String]) -> Result<Self, RouteError> {
        if allowed.is_empty() {
            return Ok(self.clone());
        }
        let mut models = BTreeMap::new();
        for name in allowed {
            let spec = self
                .models
                .get(name)
                .ok_or_else(|| RouteError::UnknownAircraft(name.clone()))?;
            models.insert(name.clone(), *spec);
        }
        Ok(Self { models })
    }

    pub fn get(&self, model: &str) -> Option<&AircraftSpec> {
        self.models.get(model)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AircraftSpec)> {
        self.models.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
