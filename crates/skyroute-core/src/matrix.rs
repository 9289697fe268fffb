// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geo::haversine_km;
use crate::route_graph::Edge;
use crate::RouteError;
use std::collections::{BTreeMap, HashMap};

/// Cruise speed assumed when a pair has no timetable entry.
pub const ASSUMED_CRUISE_KMH: f64 = 800.0;

/// Cost matrix diagonal. Self-loops are never traversed.
pub const SELF_LOOP_COST: f64 = -1.0;

/// Dense row-major square matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    n: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] = value;
    }

    fn set_symmetric(&mut self, i: usize, j: usize, value: f64) {
        self.set(i, j, value);
        self.set(j, i, value);
    }
}

/// Cost and distance between every pair of routable airports.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrices {
    pub cost: Matrix,
    pub distance: Matrix,
}

/// Estimated cost of a pair without a timetable entry: distance plus flight minutes at
/// [`ASSUMED_CRUISE_KMH`].
pub fn estimated_cost(distance_km: f64) -> f64 {
    distance_km + distance_km / ASSUMED_CRUISE_KMH * 60.0
}

/// Builds symmetric cost/distance matrices over `airports` (position = matrix index).
///
/// Timetable edges are written in both directions; when the two directions disagree the
/// one processed last wins. Every pair still unset afterwards is filled with the
/// great-circle estimate, which needs coordinates for both ends.
pub fn build_matrices<F>(
    airports: &[String],
    edges: &BTreeMap<String, Vec<Edge>>,
    coordinates: F,
) -> Result<CostMatrices, RouteError>
where
    F: Fn(&str) -> Option<(f64, f64)>,
{
    let n = airports.len();
    let index: HashMap<&str, usize> = airports
        .iter()
        .enumerate()
        .map(|(i, code)| (code.as_str(), i))
        .collect();

    let mut cost = Matrix::new(n);
    let mut distance = Matrix::new(n);
    for i in 0..n {
        cost.set(i, i, SELF_LOOP_COST);
    }

    let mut timetable_pairs = 0usize;
    for (source, routes) in edges {
        let Some(&s) = index.get(source.as_str()) else {
            continue;
        };
        for edge in routes {
            let Some(&d) = index.get(edge.to.as_str()) else {
                continue;
            };
            if s == d {
                continue;
            }
            distance.set_symmetric(s, d, edge.km);
            cost.set_symmetric(s, d, edge.cost());
            timetable_pairs += 1;
        }
    }

    let mut estimated_pairs = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            if cost.get(i, j) != 0.0 {
                continue;
            }
            let (lat1, lon1) = coordinates(&airports[i])
                .ok_or_else(|| RouteError::MissingCoordinates(airports[i].clone()))?;
            let (lat2, lon2) = coordinates(&airports[j])
                .ok_or_else(|| RouteError::MissingCoordinates(airports[j].clone()))?;
            let km = haversine_km(lat1, lon1, lat2, lon2);
            distance.set_symmetric(i, j, km);
            cost.set_symmetric(i, j, estimated_cost(km));
            estimated_pairs += 1;
        }
    }

    log::info!(
        "Built cost/distance matrices — airports={} timetable_edges={} estimated_pairs={}",
        n,
        timetable_pairs,
        estimated_pairs
    );
    Ok(CostMatrices { cost, distance })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn edge(to: &str, km: f64, minutes: f64) -> Edge {
        Edge {
            to: to.to_string(),
            km,
            minutes,
        }
    }

    fn coords(code: &str) -> Option<(f64, f64)> {
        match code {
            "AAA" => Some((0.0, 0.0)),
            "BBB" => Some((0.0, 1.0)),
            "CCC" => Some((1.0, 1.0)),
            _ => None,
        }
    }

    #[test]
    fn test_timetable_edges_are_symmetric() {
        let airports = codes(&["AAA", "BBB"]);
        let mut edges = BTreeMap::new();
        edges.insert("AAA".to_string(), vec![edge("BBB", 500.0, 60.0)]);

        let m = build_matrices(&airports, &edges, coords).unwrap();
        assert_eq!(m.cost.get(0, 1), 560.0);
        assert_eq!(m.cost.get(1, 0), 560.0);
        assert_eq!(m.distance.get(0, 1), 500.0);
        assert_eq!(m.distance.get(1, 0), 500.0);
        assert_eq!(m.cost.get(0, 0), SELF_LOOP_COST);
        assert_eq!(m.distance.get(1, 1), 0.0);
    }

    #[test]
    fn test_conflicting_directions_last_write_wins() {
        let airports = codes(&["AAA", "BBB"]);
        let mut edges = BTreeMap::new();
        edges.insert("AAA".to_string(), vec![edge("BBB", 500.0, 60.0)]);
        edges.insert("BBB".to_string(), vec![edge("AAA", 510.0, 65.0)]);

        let m = build_matrices(&airports, &edges, coords).unwrap();
        assert_eq!(m.cost.get(0, 1), 575.0);
        assert_eq!(m.cost.get(1, 0), 575.0);
        assert_eq!(m.distance.get(0, 1), 510.0);
    }

    #[test]
    fn test_fallback_uses_great_circle() {
        let airports = codes(&["AAA", "BBB", "CCC"]);
        let mut edges = BTreeMap::new();
        edges.insert("AAA".to_string(), vec![edge("BBB", 500.0, 60.0)]);

        let m = build_matrices(&airports, &edges, coords).unwrap();
        let expected = haversine_km(0.0, 1.0, 1.0, 1.0);
        assert!((m.distance.get(1, 2) - expected).abs() < 1e-9);
        assert!((m.cost.get(2, 1) - (expected + expected / 800.0 * 60.0)).abs() < 1e-9);
        assert_eq!(m.cost.get(0, 2), m.cost.get(2, 0));
    }

    #[test]
    fn test_missing_coordinates_is_fatal() {
        let airports = codes(&["AAA", "ZZZ"]);
        let err = build_matrices(&airports, &BTreeMap::new(), coords).unwrap_err();
        assert!(matches!(err, RouteError::MissingCoordinates(ref c) if c == "ZZZ"));
    }

    #[test]
    fn test_missing_coordinates_ignored_when_timetable_covers_pair() {
        let airports = codes(&["AAA", "ZZZ"]);
        let mut edges = BTreeMap::new();
        edges.insert("ZZZ".to_string(), vec![edge("AAA", 100.0, 20.0)]);
        assert!(build_matrices(&airports, &edges, coords).is_ok());
    }

    #[test]
    fn test_rebuild_is_identical() {
        let airports = codes(&["AAA", "BBB", "CCC"]);
        let mut edges = BTreeMap::new();
        edges.insert("CCC".to_string(), vec![edge("AAA", 160.0, 25.0)]);

        let first = build_matrices(&airports, &edges, coords).unwrap();
        let second = build_matrices(&airports, &edges, coords).unwrap();
        assert_eq!(first, second);
    }
}
