// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Selection, crossover and mutation. Every operator works on `stops` only, so
//! source, destination and route shape invariants hold by construction.

use crate::route::CandidateRoute;
use crate::RouteError;
use rand::seq::index;
use rand::Rng;

/// Samples `k` distinct individuals and returns the two fittest (lowest fitness).
///
/// A population smaller than `k` shrinks the tournament to the whole population.
/// A single-member population returns that member twice.
pub fn tournament_selection<'p, R: Rng + ?Sized>(
    population: &'p [CandidateRoute],
    fitness: &[f64],
    k: usize,
    rng: &mut R,
) -> Result<(&'p CandidateRoute, &'p CandidateRoute), RouteError> {
    if population.is_empty() {
        return Err(RouteError::EmptyPopulation);
    }
    let size = k.clamp(1, population.len());
    let mut contenders = index::sample(rng, population.len(), size).into_vec();
    contenders.sort_by(|&a, &b| fitness[a].total_cmp(&fitness[b]));

    let first = contenders[0];
    let second = contenders.get(1).copied().unwrap_or(first);
    Ok((&population[first], &population[second]))
}

/// One-point crossover on the stop sequences.
///
/// With stops on both sides a cut `p` in `[1, min(len1, len2)]` gives
/// `p1[..p] + p2[p..]` and `p2[..p] + p1[p..]`; half of the time the children
/// also trade aircraft. If either parent is direct only the aircraft are traded.
pub fn crossover<R: Rng + ?Sized>(
    parent1: &CandidateRoute,
    parent2: &CandidateRoute,
    rng: &mut R,
) -> (CandidateRoute, CandidateRoute) {
    let (s1, s2) = (&parent1.stops, &parent2.stops);
    if s1.is_empty() || s2.is_empty() {
        let mut child1 = parent1.clone();
        let mut child2 = parent2.clone();
        child1.aircraft = parent2.aircraft.clone();
        child2.aircraft = parent1.aircraft.clone();
        return (child1, child2);
    }

    let point = rng.gen_range(1..=s1.len().min(s2.len()));
    let stops1: Vec<String> = s1[..point].iter().chain(&s2[point..]).cloned().collect();
    let stops2: Vec<String> = s2[..point].iter().chain(&s1[point..]).cloned().collect();

    let (aircraft1, aircraft2) = if rng.gen::<f64>() < 0.5 {
        (&parent2.aircraft, &parent1.aircraft)
    } else {
        (&parent1.aircraft, &parent2.aircraft)
    };

    (
        CandidateRoute::new(
            aircraft1.clone(),
            parent1.source.clone(),
            stops1,
            parent1.destination.clone(),
        ),
        CandidateRoute::new(
            aircraft2.clone(),
            parent1.source.clone(),
            stops2,
            parent1.destination.clone(),
        ),
    )
}

/// Each stop is swapped, with probability `rate`, with a uniformly chosen stop
/// (possibly itself).
pub fn swap_mutation<R: Rng + ?Sized>(route: &mut CandidateRoute, rate: f64, rng: &mut R) {
    let len = route.stops.len();
    if len == 0 {
        return;
    }
    for i in 0..len {
        if rng.gen::<f64>() < rate {
            let j = rng.gen_range(0..len);
            route.stops.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn route(aircraft: &str, stops: &[&str]) -> CandidateRoute {
        CandidateRoute::new(
            aircraft,
            "SRC",
            stops.iter().map(|s| s.to_string()).collect(),
            "DST",
        )
    }

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    #[test]
    fn test_tournament_picks_fittest_when_whole_population_competes() {
        let population = vec![
            route("A", &["X"]),
            route("B", &["Y"]),
            route("C", &["Z"]),
        ];
        let fitness = [30.0, 10.0, 20.0];
        let mut rng = StdRng::seed_from_u64(11);

        // k larger than the population shrinks to the population
        let (p1, p2) = tournament_selection(&population, &fitness, 5, &mut rng).unwrap();
        assert_eq!(p1.aircraft, "B");
        assert_eq!(p2.aircraft, "C");
    }

    #[test]
    fn test_tournament_handles_infinite_fitness() {
        let population = vec![route("A", &[]), route("B", &[]), route("C", &[])];
        let fitness = [f64::INFINITY, 5.0, f64::INFINITY];
        let mut rng = StdRng::seed_from_u64(12);
        let (p1, _) = tournament_selection(&population, &fitness, 3, &mut rng).unwrap();
        assert_eq!(p1.aircraft, "B");
    }

    #[test]
    fn test_tournament_single_and_empty() {
        let mut rng = StdRng::seed_from_u64(13);
        let single = vec![route("A", &["X"])];
        let (p1, p2) = tournament_selection(&single, &[1.0], 5, &mut rng).unwrap();
        assert_eq!(p1, p2);

        let empty: Vec<CandidateRoute> = Vec::new();
        assert!(matches!(
            tournament_selection(&empty, &[], 5, &mut rng),
            Err(RouteError::EmptyPopulation)
        ));
    }

    #[test]
    fn test_tournament_parents_are_distinct_members() {
        let population: Vec<_> = (0..10).map(|i| route(&format!("M{}", i), &[])).collect();
        let fitness: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let mut rng = StdRng::seed_from_u64(14);
        for _ in 0..50 {
            let (p1, p2) = tournament_selection(&population, &fitness, 5, &mut rng).unwrap();
            assert_ne!(p1, p2);
        }
    }

    #[test]
    fn test_crossover_preserves_stop_multiset_and_endpoints() {
        let p1 = route("A", &["B1", "B2", "B3", "B4"]);
        let p2 = route("Z", &["C1", "C2"]);
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..100 {
            let (c1, c2) = crossover(&p1, &p2, &mut rng);
            for child in [&c1, &c2] {
                assert_eq!(child.source, "SRC");
                assert_eq!(child.destination, "DST");
            }
            let parents = sorted([p1.stops.clone(), p2.stops.clone()].concat());
            let children = sorted([c1.stops.clone(), c2.stops.clone()].concat());
            assert_eq!(parents, children);

            let mut aircraft = vec![c1.aircraft.clone(), c2.aircraft.clone()];
            aircraft.sort();
            assert_eq!(aircraft, vec!["A", "Z"]);
        }
    }

    #[test]
    fn test_crossover_cut_positions() {
        let p1 = route("A", &["B1", "B2", "B3"]);
        let p2 = route("Z", &["C1", "C2", "C3"]);
        let mut rng = StdRng::seed_from_u64(22);

        for _ in 0..100 {
            let (c1, c2) = crossover(&p1, &p2, &mut rng);
            assert_eq!(c1.stops.len(), 3);
            assert_eq!(c1.stops[0], "B1");
            assert_eq!(c2.stops[0], "C1");
        }
    }

    #[test]
    fn test_crossover_direct_parent_trades_aircraft_only() {
        let p1 = route("A", &[]);
        let p2 = route("Z", &["C1", "C2"]);
        let mut rng = StdRng::seed_from_u64(23);

        let (c1, c2) = crossover(&p1, &p2, &mut rng);
        assert_eq!(c1, route("Z", &[]));
        assert_eq!(c2, route("A", &["C1", "C2"]));
    }

    #[test]
    fn test_mutation_only_reorders_stops() {
        let original = route("A", &["S1", "S2", "S3", "S4", "S5"]);
        let mut rng = StdRng::seed_from_u64(31);

        for _ in 0..100 {
            let mut mutated = original.clone();
            swap_mutation(&mut mutated, 0.5, &mut rng);
            assert_eq!(mutated.aircraft, original.aircraft);
            assert_eq!(mutated.source, original.source);
            assert_eq!(mutated.destination, original.destination);
            assert_eq!(sorted(mutated.stops.clone()), sorted(original.stops.clone()));
        }
    }

    #[test]
    fn test_mutation_rate_bounds() {
        let original = route("A", &["S1", "S2", "S3"]);
        let mut rng = StdRng::seed_from_u64(32);

        let mut untouched = original.clone();
        swap_mutation(&mut untouched, 0.0, &mut rng);
        assert_eq!(untouched, original);

        let mut direct = route("A", &[]);
        swap_mutation(&mut direct, 1.0, &mut rng);
        assert_eq!(direct, route("A", &[]));
    }
}
