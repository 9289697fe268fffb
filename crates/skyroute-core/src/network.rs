// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::aircraft::AircraftCatalog;
use crate::airports::{Airport, AirportTable};
use crate::matrix::{build_matrices, CostMatrices};
use crate::route_graph::RouteGraph;
use crate::RouteError;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// Locations of the three reference data files.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub airports: PathBuf,
    pub routes: PathBuf,
    pub aircraft: PathBuf,
}

/// Immutable per-request context: routable airports, their matrices, and the
/// full aircraft catalog. Shared by reference with every component.
#[derive(Debug, Clone)]
pub struct RouteNetwork {
    codes: Vec<String>,
    index: HashMap<String, usize>,
    coordinates: Vec<Option<(f64, f64)>>,
    matrices: CostMatrices,
    catalog: AircraftCatalog,
    table: AirportTable,
}

impl RouteNetwork {
    pub fn load(paths: &DataPaths) -> Result<Self> {
        let table = AirportTable::from_path(&paths.airports).with_context(|| {
            format!("Failed to load airports from {}", paths.airports.display())
        })?;
        let graph = RouteGraph::from_path(&paths.routes).with_context(|| {
            format!("Failed to load route graph from {}", paths.routes.display())
        })?;
        let catalog = AircraftCatalog::from_path(&paths.aircraft).with_context(|| {
            format!("Failed to load aircraft from {}", paths.aircraft.display())
        })?;
        let network = Self::build(table, &graph, catalog).context("Failed to build cost matrices")?;
        Ok(network)
    }

    /// Routable airports are the graph origins with at least one resolvable edge,
    /// in code order. Coordinates come from the graph, then the airport table.
    pub fn build(
        table: AirportTable,
        graph: &RouteGraph,
        catalog: AircraftCatalog,
    ) -> Result<Self, RouteError> {
        let edges = graph.resolved_edges(&table);
        let codes: Vec<String> = edges.keys().cloned().collect();
        let coordinates: Vec<Option<(f64, f64)>> = codes
            .iter()
            .map(|code| {
                graph
                    .coordinates(code)
                    .or_else(|| table.get(code).and_then(Airport::coordinates))
            })
            .collect();
        let index: HashMap<String, usize> = codes
            .iter()
            .enumerate()
            .map(|(i, code)| (code.clone(), i))
            .collect();

        let matrices = build_matrices(&codes, &edges, |code| {
            index.get(code).and_then(|&i| coordinates[i])
        })?;

        Ok(Self {
            codes,
            index,
            coordinates,
            matrices,
            catalog,
            table,
        })
    }

    /// Routable airport codes; position is the matrix index.
    pub fn airport_codes(&self) -> &[String] {
        &self.codes
    }

    pub fn index_of(&self, code: &str) -> Option<usize> {
        self.index.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn coordinates(&self, code: &str) -> Option<(f64, f64)> {
        self.index_of(code).and_then(|i| self.coordinates[i])
    }

    pub fn matrices(&self) -> &CostMatrices {
        &self.matrices
    }

    pub fn distance_km(&self, from: &str, to: &str) -> Option<f64> {
        Some(self.matrices.distance.get(self.index_of(from)?, self.index_of(to)?))
    }

    pub fn cost(&self, from: &str, to: &str) -> Option<f64> {
        Some(self.matrices.cost.get(self.index_of(from)?, self.index_of(to)?))
    }

    pub fn catalog(&self) -> &AircraftCatalog {
        &self.catalog
    }

    pub fn airport(&self, code: &str) -> Option<&Airport> {
        self.table.get(code)
    }
}
