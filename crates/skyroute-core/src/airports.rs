// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::RouteError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Airport {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// "Name (IATA)", the form accepted back by [`extract_iata`].
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }
}

/// One row of the airports CSV. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct AirportRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "IATA", default)]
    iata: Option<String>,
    #[serde(rename = "City", default)]
    city: String,
    #[serde(rename = "Country", default)]
    country: String,
    #[serde(rename = "Latitude", default, deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(rename = "Longitude", default, deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
}

/// Airport reference data indexed by IATA code.
#[derive(Debug, Clone, Default)]
pub struct AirportTable {
    airports: Vec<Airport>,
    by_code: HashMap<String, usize>,
}

impl AirportTable {
    pub fn from_airports(airports: impl IntoIterator<Item = Airport>) -> Self {
        let mut table = Self::default();
        for airport in airports {
            table.insert(airport);
        }
        table
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RouteError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads `Name, IATA, City, Country, Latitude, Longitude` rows.
    /// Rows without an IATA code (empty or the `\N` null marker) are dropped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RouteError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = Self::default();
        let mut dropped = 0usize;
        for result in rdr.deserialize::<AirportRecord>() {
            let record = result?;
            let code = match record.iata {
                Some(code) if !code.is_empty() && code != "\\N" => code.to_uppercase(),
                _ => {
                    dropped += 1;
                    continue;
                }
            };
            table.insert(Airport {
                code,
                name: record.name,
                city: record.city,
                country: record.country,
                lat: record.latitude,
                lon: record.longitude,
            });
        }

        log::debug!(
            "Loaded airport table — airports={} dropped_without_iata={}",
            table.len(),
            dropped
        );
        Ok(table)
    }

    fn insert(&mut self, airport: Airport) {
        if let Some(&idx) = self.by_code.get(&airport.code) {
            self.airports[idx] = airport;
        } else {
            self.by_code.insert(airport.code.clone(), self.airports.len());
            self.airports.push(airport);
        }
    }

    pub fn get(&self, code: &str) -> Option<&Airport> {
        self.by_code.get(code).map(|&i| &self.airports[i])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    /// Autocomplete: airports whose name or code contains `query` (case-insensitive),
    /// formatted as "Name (IATA)".
    pub fn search(&self, query: &str) -> Vec<String> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        self.airports
            .iter()
            .filter(|a| a.name.to_lowercase().contains(&q) || a.code.to_lowercase().contains(&q))
            .map(Airport::display_label)
            .collect()
    }
}

/// Pulls the IATA code out of "Airport Name (IATA)"; plain input is taken as the code itself.
pub fn extract_iata(input: &str) -> String {
    if let (Some(open), Some(close)) = (input.rfind('('), input.rfind(')')) {
        if open < close {
            return input[open + 1..close].trim().to_uppercase();
        }
    }
    input.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CSV: &str = "\
Airport ID,Name,City,Country,IATA,ICAO,Latitude,Longitude
1,London Heathrow Airport,London,United Kingdom,LHR,EGLL,51.4706,-0.461941
2,Charles de Gaulle International Airport,Paris,France,CDG,LFPG,49.012798,2.55
3,Some Airstrip,Nowhere,Nowhere,\\N,XXXX,10.0,10.0
4,London City Airport,London,United Kingdom,LCY,EGLC,\\N,0.055278
";

    #[test]
    fn test_parse_airports_csv() {
        let table = AirportTable::from_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(table.len(), 3);

        let lhr = table.get("LHR").unwrap();
        assert_eq!(lhr.name, "London Heathrow Airport");
        assert_eq!(lhr.city, "London");
        assert_eq!(lhr.coordinates(), Some((51.4706, -0.461941)));

        // Unparsable latitude becomes None rather than failing the load
        let lcy = table.get("LCY").unwrap();
        assert_eq!(lcy.lat, None);
        assert_eq!(lcy.coordinates(), None);
    }

    #[test]
    fn test_search() {
        let table = AirportTable::from_reader(Cursor::new(CSV)).unwrap();
        let hits = table.search("london");
        assert_eq!(
            hits,
            vec![
                "London Heathrow Airport (LHR)".to_string(),
                "London City Airport (LCY)".to_string()
            ]
        );
        assert_eq!(table.search("cdg").len(), 1);
        assert!(table.search("   ").is_empty());
    }

    #[test]
    fn test_extract_iata() {
        assert_eq!(extract_iata("London Heathrow Airport (LHR)"), "LHR");
        assert_eq!(extract_iata("  jfk "), "JFK");
        assert_eq!(extract_iata("Odd (name) Airport (cdg)"), "CDG");
    }
}
