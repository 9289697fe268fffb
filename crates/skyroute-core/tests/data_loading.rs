use skyroute_core::network::{DataPaths, RouteNetwork};
use skyroute_core::optimizer::optimize_route;
use skyroute_core::config::OptimizerConfig;
use skyroute_core::weather::NoWeather;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const AIRPORTS_CSV: &str = "\
Airport ID,Name,City,Country,IATA,ICAO,Latitude,Longitude
507,London Heathrow Airport,London,United Kingdom,LHR,EGLL,51.4706,-0.461941
1382,Charles de Gaulle International Airport,Paris,France,CDG,LFPG,49.012798,2.55
340,Frankfurt am Main Airport,Frankfurt,Germany,FRA,EDDF,50.033333,8.570556
580,Amsterdam Airport Schiphol,Amsterdam,Netherlands,AMS,EHAM,52.308601,4.76389
9999,Closed Field,Nowhere,Nowhere,\\N,ZZZZ,0,0
";

const ROUTES_JSON: &str = r#"{
    "LHR": {"city_name": "London", "country": "United Kingdom", "name": "Heathrow",
            "latitude": "51.4706", "longitude": "-0.461941",
            "routes": [{"iata": "CDG", "km": 348, "min": 75}, {"iata": "AMS", "km": 371, "min": 80}]},
    "CDG": {"city_name": "Paris", "country": "France", "name": "Charles de Gaulle",
            "latitude": 49.012798, "longitude": 2.55,
            "routes": [{"iata": "FRA", "km": 451, "min": 70}, {"iata": "LHR", "km": 348, "min": 80}]},
    "FRA": {"city_name": "Frankfurt", "country": "Germany", "name": "Frankfurt",
            "latitude": 50.033333, "longitude": 8.570556,
            "routes": [{"iata": "AMS", "km": 365, "min": 65}]},
    "AMS": {"city_name": "Amsterdam", "country": "Netherlands", "name": "Schiphol",
            "latitude": 52.308601, "longitude": 4.76389,
            "routes": [{"iata": "XXX", "km": 10, "min": 5}, {"iata": "LHR", "km": 371, "min": 75}]},
    "XXX": {"city_name": "Ghost", "country": "Nowhere", "name": "Ghost",
            "latitude": 1.0, "longitude": 1.0,
            "routes": [{"iata": "QQQ", "km": 10, "min": 5}]}
}"#;

const AIRCRAFT_CSV: &str = "\
Aircraft Model,Max Range (NM),Max Operation Mach No
Airbus A320,\"3,300 NM\",0.82
Boeing 737-800,\"3,200nm / 2800nm\",
ATR 72,825 NM,0.56
";

fn write_fixtures(dir: &Path) -> DataPaths {
    let paths = DataPaths {
        airports: dir.join("airports.csv"),
        routes: dir.join("airline_routes.json"),
        aircraft: dir.join("Aircrafts.csv"),
    };
    fs::write(&paths.airports, AIRPORTS_CSV).unwrap();
    fs::write(&paths.routes, ROUTES_JSON).unwrap();
    fs::write(&paths.aircraft, AIRCRAFT_CSV).unwrap();
    paths
}

#[test]
fn test_load_network_from_files() {
    let dir = tempdir().unwrap();
    let paths = write_fixtures(dir.path());
    let network = RouteNetwork::load(&paths).unwrap();

    // XXX has no resolvable edge, so only the four real airports are routable
    assert_eq!(network.airport_codes(), &["AMS", "CDG", "FRA", "LHR"]);

    // Conflicting directions: the LHR entry is processed after CDG and wins
    assert_eq!(network.cost("CDG", "LHR"), Some(423.0));
    assert_eq!(network.cost("LHR", "CDG"), Some(423.0));
    assert_eq!(network.distance_km("FRA", "AMS"), Some(365.0));

    // LHR-FRA has no timetable edge: great-circle fallback
    let est = network.distance_km("LHR", "FRA").unwrap();
    assert!(est > 600.0 && est < 700.0, "got {}", est);
    assert_eq!(network.distance_km("FRA", "LHR"), Some(est));

    let b738 = network.catalog().get("Boeing 737-800").unwrap();
    assert!((b738.range_km - 5926.4).abs() < 1e-9);
    assert_eq!(b738.mach, 0.69);

    assert_eq!(network.airport("LHR").unwrap().city, "London");
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let mut paths = write_fixtures(dir.path());
    paths.routes = dir.path().join("missing.json");

    let err = RouteNetwork::load(&paths).unwrap_err();
    assert!(format!("{:#}", err).contains("missing.json"));
}

#[test]
fn test_missing_coordinates_fails_request() {
    let dir = tempdir().unwrap();
    let paths = write_fixtures(dir.path());
    let routes = ROUTES_JSON.replace("\"latitude\": 50.033333", "\"latitude\": null");
    fs::write(&paths.routes, routes).unwrap();

    // FRA also lacks an airport-table fallback once its row is removed
    let airports: String = AIRPORTS_CSV
        .lines()
        .filter(|l| !l.contains("FRA"))
        .map(|l| format!("{}\n", l))
        .collect();
    fs::write(&paths.airports, airports).unwrap();

    let err = RouteNetwork::load(&paths).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("Failed to build cost matrices"), "{}", message);
}

#[test]
fn test_end_to_end_from_files() {
    let dir = tempdir().unwrap();
    let paths = write_fixtures(dir.path());
    let network = RouteNetwork::load(&paths).unwrap();

    let config = OptimizerConfig {
        population_size: 6,
        generations: 4,
        seed: Some(2026),
        ..OptimizerConfig::default()
    };
    let result = optimize_route(&network, "LHR", "FRA", &[], &config, &NoWeather).unwrap();
    assert_eq!(result.best_route.source, "LHR");
    assert_eq!(result.best_route.destination, "FRA");
    assert!(result.total_cost.is_finite());
    assert!(result.total_distance_km > 0.0);
}
