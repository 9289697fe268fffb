// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::aircraft::AircraftCatalog;
use crate::route::CandidateRoute;
use crate::RouteError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Generates random candidate routes between a fixed source and destination.
pub struct RouteGenerator<'a> {
    source: &'a str,
    destination: &'a str,
    available: Vec<&'a str>,
    aircraft: Vec<&'a str>,
    max_stops: usize,
}

impl<'a> RouteGenerator<'a> {
    /// `airports` is the full code list; source and destination are never used as stops.
    pub fn new(
        source: &'a str,
        destination: &'a str,
        airports: &'a [String],
        catalog: &'a AircraftCatalog,
        max_stops: usize,
    ) -> Result<Self, RouteError> {
        if catalog.is_empty() {
            return Err(RouteError::EmptyCatalog);
        }
        let available = airports
            .iter()
            .map(String::as_str)
            .filter(|code| *code != source && *code != destination)
            .collect();
        Ok(Self {
            source,
            destination,
            available,
            aircraft: catalog.names().collect(),
            max_stops,
        })
    }

    /// Uniform aircraft, uniform stop count in `[0, min(max_stops, available)]`,
    /// stops sampled without replacement.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> CandidateRoute {
        let aircraft = self.aircraft[rng.gen_range(0..self.aircraft.len())];
        let count = rng.gen_range(0..=self.max_stops.min(self.available.len()));
        let stops = self
            .available
            .choose_multiple(rng, count)
            .map(|code| code.to_string())
            .collect();
        CandidateRoute::new(aircraft, self.source, stops, self.destination)
    }

    /// Builds `size` structurally distinct routes, giving up after
    /// `size * retry_factor` attempts.
    pub fn initialize<R: Rng + ?Sized>(
        &self,
        size: usize,
        retry_factor: usize,
        rng: &mut R,
    ) -> Result<Vec<CandidateRoute>, RouteError> {
        let budget = size.saturating_mul(retry_factor);
        let mut seen = HashSet::with_capacity(size);
        let mut population = Vec::with_capacity(size);

        let mut attempts = 0usize;
        while population.len() < size {
            if attempts >= budget {
                return Err(RouteError::PopulationExhausted {
                    requested: size,
                    generated: population.len(),
                });
            }
            attempts += 1;
            let route = self.generate(rng);
            if seen.insert(route.clone()) {
                population.push(route);
            }
        }

        log::debug!(
            "Initialized population — size={} attempts={} source={} destination={}",
            population.len(),
            attempts,
            self.source,
            self.destination
        );
        Ok(population)
    }
}
