// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::aircraft::{AircraftCatalog, AircraftSpec};
use crate::network::RouteNetwork;
use crate::route::CandidateRoute;
use crate::weather::{WeatherCache, EXTREME_WEATHER_THRESHOLD};
use crate::RouteError;
use log::{debug, warn};
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::Serialize;

/// Cost charged to a nonstop route the aircraft cannot fly.
pub const INFEASIBLE_DIRECT_COST: f64 = 150_000.0;
/// Added per leg that exceeds the aircraft's range.
pub const OVER_RANGE_LEG_PENALTY: f64 = 1_000.0;
/// Largest fraction of the running cost forgiven on a leg well within range.
pub const RANGE_EFFICIENCY_WEIGHT: f64 = 0.2;
/// Cost removed per unit of Mach.
pub const MACH_BONUS: f64 = 1_000.0;

/// Lower is better. Non-positive costs map to +inf so they can never win selection.
pub fn fitness_from_cost(cost: f64) -> f64 {
    if cost > 0.0 {
        cost / 100.0
    } else {
        f64::INFINITY
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegReport {
    pub from: String,
    pub to: String,
    pub distance_km: f64,
    pub cost: f64,
    pub within_range: bool,
    /// Departure weather penalty at `from`, when weather was available.
    pub weather_penalty: Option<f64>,
    pub extreme_weather: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteEvaluation {
    pub cost: f64,
    pub distance_km: f64,
    pub fitness: f64,
    pub legs: Vec<LegReport>,
    pub arrival_weather_penalty: Option<f64>,
    /// Set when a nonstop route was rejected outright for exceeding the aircraft's range.
    pub infeasible_direct: bool,
}

/// Scores candidate routes against a network. Shares nothing mutable except the
/// weather memo, so routes evaluate independently in parallel.
pub struct FitnessEvaluator<'a> {
    network: &'a RouteNetwork,
    catalog: &'a AircraftCatalog,
    weather: &'a WeatherCache<'a>,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(
        network: &'a RouteNetwork,
        catalog: &'a AircraftCatalog,
        weather: &'a WeatherCache<'a>,
    ) -> Self {
        Self {
            network,
            catalog,
            weather,
        }
    }

    fn index(&self, code: &str) -> Result<usize, RouteError> {
        self.network
            .index_of(code)
            .ok_or_else(|| RouteError::UnknownAirport(code.to_string()))
    }

    fn aircraft(&self, model: &str) -> Result<&AircraftSpec, RouteError> {
        self.catalog
            .get(model)
            .ok_or_else(|| RouteError::UnknownAircraft(model.to_string()))
    }

    pub fn evaluate(&self, route: &CandidateRoute) -> Result<RouteEvaluation, RouteError> {
        let spec = *self.aircraft(&route.aircraft)?;
        let matrices = self.network.matrices();

        if route.is_direct() {
            let direct_km = matrices
                .distance
                .get(self.index(&route.source)?, self.index(&route.destination)?);
            if direct_km > spec.range_km {
                debug!(
                    "Direct flight out of range — route={} distance_km={:.1} range_km={:.1}",
                    route, direct_km, spec.range_km
                );
                return Ok(RouteEvaluation {
                    cost: INFEASIBLE_DIRECT_COST,
                    distance_km: direct_km,
                    fitness: fitness_from_cost(INFEASIBLE_DIRECT_COST),
                    legs: Vec::new(),
                    arrival_weather_penalty: None,
                    infeasible_direct: true,
                });
            }
        }

        let mut total_cost = 0.0;
        let mut total_distance = 0.0;
        let mut legs = Vec::with_capacity(route.stops.len() + 1);

        for (from, to) in route.legs() {
            let (i, j) = (self.index(from)?, self.index(to)?);
            if i == j {
                continue;
            }

            let weather_penalty = self
                .weather
                .lookup(from, self.network.coordinates(from))
                .map(|w| w.departure_penalty());
            let extreme_weather = weather_penalty.is_some_and(|p| p > EXTREME_WEATHER_THRESHOLD);
            if extreme_weather {
                warn!(
                    "Extreme weather at departure — airport={} penalty={:.0}",
                    from,
                    weather_penalty.unwrap_or_default()
                );
            }

            let leg_km = matrices.distance.get(i, j);
            let leg_cost = matrices.cost.get(i, j);
            let within_range = leg_km <= spec.range_km;
            if !within_range {
                total_cost += OVER_RANGE_LEG_PENALTY;
            } else if spec.range_km > 0.0 {
                let efficiency = (spec.range_km - leg_km) / spec.range_km;
                total_cost *= 1.0 - efficiency * RANGE_EFFICIENCY_WEIGHT;
            }
            total_cost += leg_cost;
            total_distance += leg_km;

            legs.push(LegReport {
                from: from.to_string(),
                to: to.to_string(),
                distance_km: leg_km,
                cost: leg_cost,
                within_range,
                weather_penalty,
                extreme_weather,
            });
        }

        let arrival_weather_penalty = self
            .weather
            .lookup(&route.destination, self.network.coordinates(&route.destination))
            .map(|w| w.arrival_penalty());
        if let Some(penalty) = arrival_weather_penalty {
            total_cost += penalty;
        }

        total_cost -= spec.mach * MACH_BONUS;

        Ok(RouteEvaluation {
            cost: total_cost,
            distance_km: total_distance,
            fitness: fitness_from_cost(total_cost),
            legs,
            arrival_weather_penalty,
            infeasible_direct: false,
        })
    }

    /// Evaluates every route on `pool`, preserving population order.
    pub fn evaluate_population(
        &self,
        pool: &ThreadPool,
        population: &[CandidateRoute],
    ) -> Result<Vec<RouteEvaluation>, RouteError> {
        pool.install(|| population.par_iter().map(|r| self.evaluate(r)).collect())
    }
}
