// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Generational GA driver.
//!
//! Each run goes Init -> (Evaluate -> SelectBreed -> Replace) x generations -> Terminate.
//! The best individual of every generation is carried unchanged into the next one,
//! and the best ever seen is what the run returns.

use crate::aircraft::AircraftCatalog;
use crate::config::OptimizerConfig;
use crate::fitness::{FitnessEvaluator, RouteEvaluation};
use crate::network::RouteNetwork;
use crate::operators::{crossover, swap_mutation, tournament_selection};
use crate::population::RouteGenerator;
use crate::route::CandidateRoute;
use crate::weather::{WeatherCache, WeatherProvider};
use crate::RouteError;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::ThreadPool;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: f64,
    /// Mean over finite fitness values; `None` when every individual scored +inf.
    pub mean_fitness: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub best_route: CandidateRoute,
    /// `best_route` flattened to `[aircraft, source, stops.., destination]`.
    pub route_sequence: Vec<String>,
    /// Fitness of `best_route`, reported as its total cost.
    pub total_cost: f64,
    pub total_distance_km: f64,
    pub evaluation: RouteEvaluation,
    pub history: Vec<GenerationStats>,
}

/// Runs the GA for one source/destination pair.
pub struct GeneticOptimizer<'a> {
    network: &'a RouteNetwork,
    catalog: AircraftCatalog,
    config: OptimizerConfig,
    weather: WeatherCache<'a>,
    pool: ThreadPool,
    rng: StdRng,
    source: String,
    destination: String,
}

impl<'a> GeneticOptimizer<'a> {
    /// Validates the request and narrows the catalog to `aircraft` (empty = all models).
    pub fn new(
        network: &'a RouteNetwork,
        source: &str,
        destination: &str,
        aircraft: &[String],
        config: OptimizerConfig,
        weather: &'a dyn WeatherProvider,
    ) -> Result<Self, RouteError> {
        config.validate()?;
        for code in [source, destination] {
            if !network.contains(code) {
                return Err(RouteError::UnknownAirport(code.to_string()));
            }
        }
        if source == destination {
            return Err(RouteError::SameEndpoints(source.to_string()));
        }

        let catalog = network.catalog().filtered(aircraft)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.weather.max_concurrent)
            .build()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            network,
            catalog,
            config,
            weather: WeatherCache::new(weather),
            pool,
            rng,
            source: source.to_string(),
            destination: destination.to_string(),
        })
    }

    /// Init: a population of distinct random routes.
    pub fn initial_population(&mut self) -> Result<Vec<CandidateRoute>, RouteError> {
        let generator = RouteGenerator::new(
            &self.source,
            &self.destination,
            self.network.airport_codes(),
            &self.catalog,
            self.config.max_stops,
        )?;
        generator.initialize(
            self.config.population_size,
            self.config.init_retry_factor,
            &mut self.rng,
        )
    }

    /// Evaluate: scores the population in parallel, in population order.
    pub fn evaluate(
        &self,
        population: &[CandidateRoute],
    ) -> Result<Vec<RouteEvaluation>, RouteError> {
        let evaluator = FitnessEvaluator::new(self.network, &self.catalog, &self.weather);
        evaluator.evaluate_population(&self.pool, population)
    }

    /// SelectBreed: the generation's best first, then offspring pairs until full.
    pub fn breed(
        &mut self,
        population: &[CandidateRoute],
        fitness: &[f64],
    ) -> Result<Vec<CandidateRoute>, RouteError> {
        let size = self.config.population_size;
        let elite = best_index(fitness).ok_or(RouteError::EmptyPopulation)?;

        let mut next = Vec::with_capacity(size + 1);
        next.push(population[elite].clone());

        while next.len() < size {
            let (parent1, parent2) = tournament_selection(
                population,
                fitness,
                self.config.tournament_size,
                &mut self.rng,
            )?;
            let (mut child1, mut child2) = if self.rng.gen::<f64>() < self.config.crossover_rate {
                crossover(parent1, parent2, &mut self.rng)
            } else {
                (parent1.clone(), parent2.clone())
            };
            swap_mutation(&mut child1, self.config.mutation_rate, &mut self.rng);
            swap_mutation(&mut child2, self.config.mutation_rate, &mut self.rng);
            next.push(child1);
            next.push(child2);
        }

        next.truncate(size);
        Ok(next)
    }

    pub fn run(&mut self) -> Result<OptimizationResult, RouteError> {
        info!(
            "Starting optimization — source={} destination={} aircraft={} population={} generations={}",
            self.source,
            self.destination,
            self.catalog.len(),
            self.config.population_size,
            self.config.generations
        );

        let mut population = self.initial_population()?;
        let mut best: Option<(CandidateRoute, RouteEvaluation)> = None;
        let mut history = Vec::with_capacity(self.config.generations);

        for generation in 0..self.config.generations {
            let evaluations = self.evaluate(&population)?;
            let fitness: Vec<f64> = evaluations.iter().map(|e| e.fitness).collect();
            let current = best_index(&fitness).ok_or(RouteError::EmptyPopulation)?;

            let improved = best
                .as_ref()
                .map_or(true, |(_, b)| fitness[current] < b.fitness);
            if improved {
                best = Some((population[current].clone(), evaluations[current].clone()));
            }

            let stats = generation_stats(generation, &fitness, current);
            info!(
                "Generation complete — generation={} best_fitness={:.2} mean_fitness={} best_route={}",
                generation,
                stats.best_fitness,
                stats
                    .mean_fitness
                    .map_or_else(|| "inf".to_string(), |m| format!("{:.2}", m)),
                population[current]
            );
            history.push(stats);

            population = self.breed(&population, &fitness)?;
        }

        let (best_route, evaluation) = best.ok_or(RouteError::EmptyPopulation)?;
        debug!(
            "Weather cache — airports_looked_up={}",
            self.weather.len()
        );
        info!(
            "Optimization finished — best_route={} fitness={:.2} distance_km={:.1}",
            best_route, evaluation.fitness, evaluation.distance_km
        );

        Ok(OptimizationResult {
            total_cost: evaluation.fitness,
            total_distance_km: evaluation.distance_km,
            route_sequence: best_route.to_sequence(),
            best_route,
            evaluation,
            history,
        })
    }
}

/// Index of the lowest fitness; ties go to the earliest individual.
fn best_index(fitness: &[f64]) -> Option<usize> {
    fitness
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
}

fn generation_stats(generation: usize, fitness: &[f64], best: usize) -> GenerationStats {
    let finite: Vec<f64> = fitness.iter().copied().filter(|f| f.is_finite()).collect();
    let mean_fitness = if finite.is_empty() {
        None
    } else {
        Some(finite.iter().sum::<f64>() / finite.len() as f64)
    };
    GenerationStats {
        generation,
        best_fitness: fitness[best],
        mean_fitness,
    }
}

/// Finds a low-cost route from `source` to `destination`, optionally restricted to
/// the `aircraft` models given.
pub fn optimize_route(
    network: &RouteNetwork,
    source: &str,
    destination: &str,
    aircraft: &[String],
    config: &OptimizerConfig,
    weather: &dyn WeatherProvider,
) -> Result<OptimizationResult, RouteError> {
    GeneticOptimizer::new(network, source, destination, aircraft, config.clone(), weather)?.run()
}
