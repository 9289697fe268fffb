// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use serde::{Deserialize, Serialize};
use std::fmt;

/// One GA individual: an aircraft plus an ordered stop sequence between fixed endpoints.
///
/// Operators only ever touch `stops`; `source` and `destination` stay fixed for a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateRoute {
    pub aircraft: String,
    pub source: String,
    pub stops: Vec<String>,
    pub destination: String,
}

impl CandidateRoute {
    pub fn new(
        aircraft: impl Into<String>,
        source: impl Into<String>,
        stops: Vec<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            aircraft: aircraft.into(),
            source: source.into(),
            stops,
            destination: destination.into(),
        }
    }

    pub fn is_direct(&self) -> bool {
        self.stops.is_empty()
    }

    /// Airports in flight order, endpoints included.
    pub fn airports(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(self.source.as_str())
            .chain(self.stops.iter().map(String::as_str))
            .chain(std::iter::once(self.destination.as_str()))
    }

    /// Consecutive (origin, target) pairs.
    pub fn legs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.airports().zip(self.airports().skip(1))
    }

    /// `[aircraft, source, stops.., destination]`, the flat form reported in results.
    pub fn to_sequence(&self) -> Vec<String> {
        std::iter::once(self.aircraft.clone())
            .chain(self.airports().map(str::to_string))
            .collect()
    }
}

impl fmt::Display for CandidateRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.aircraft)?;
        for (i, code) in self.airports().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", code)?;
        }
        Ok(())
    }
}
