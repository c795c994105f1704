//! Scenario fixtures and random flight generation for testing and local
//! exploration. Gated behind the `mock` feature; never built into a release.

use std::collections::HashMap;

use rand::Rng;

use crate::graph::provider::InMemoryFlightDataProvider;
use crate::schema::FlightRow;

/// Build a plain flight row with no extended fields.
pub fn flight(from: &str, to: &str, dep_time: f64, arr_time: f64, price: f64) -> FlightRow {
    FlightRow {
        departure_airport: from.to_string(),
        arrival_airport: to.to_string(),
        dep_time,
        arr_time,
        price,
        carrier_code: None,
        carrier_name: None,
        terminal_origin: None,
        terminal_dest: None,
        transfer_time_mins: None,
        baggage_included: None,
        scheduled_departure: None,
        scheduled_arrival: None,
        co2_grams: None,
        extra: HashMap::new(),
    }
}

/// Generate `count` random flights among `airports`, with departure times
/// spread across one base week and prices in `$50..=$900`.
pub fn generate_random_flights(airports: &[&str], count: usize) -> Vec<FlightRow> {
    let mut rng = rand::thread_rng();
    let mut rows = Vec::with_capacity(count);

    for _ in 0..count {
        let from = airports[rng.gen_range(0..airports.len())];
        let to = loop {
            let candidate = airports[rng.gen_range(0..airports.len())];
            if candidate != from {
                break candidate;
            }
        };

        let dep_time = rng.gen_range(0.0..7.0 * 24.0 * 60.0);
        let duration = rng.gen_range(30.0..720.0);
        let price = rng.gen_range(50.0..900.0);

        rows.push(flight(from, to, dep_time, dep_time + duration, price));
    }

    rows
}

/// An [`InMemoryFlightDataProvider`] backed by `count` random flights among
/// `airports`.
pub fn random_provider(airports: &[&str], count: usize) -> InMemoryFlightDataProvider {
    InMemoryFlightDataProvider::new(generate_random_flights(airports, count))
}

/// Spec §8 scenario 1: two Pareto-optimal round trips `WAW -> BCN -> WAW`
/// at opposite extremes of cost and speed.
pub fn two_pareto_solutions_scenario() -> Vec<FlightRow> {
    vec![
        flight("WAW", "BCN", 10.0, 20.0, 1.0),
        flight("BCN", "WAW", 20.0, 50.0, 1.0),
        flight("WAW", "BCN", 1.0, 2.0, 100.0),
        flight("BCN", "WAW", 3.0, 4.0, 100.0),
    ]
}

/// Spec §8 scenario 4: a same-day and a next-day return flight, used to
/// exercise minimum-stay enforcement at a required city.
pub fn min_stay_scenario() -> Vec<FlightRow> {
    vec![
        flight("WAW", "BCN", 480.0, 660.0, 100.0),
        flight("BCN", "WAW", 780.0, 960.0, 100.0),
        flight("BCN", "WAW", 2280.0, 2460.0, 120.0),
    ]
}

/// An [`InMemoryFlightDataProvider`] preloaded with [`two_pareto_solutions_scenario`].
pub fn two_pareto_solutions_provider() -> InMemoryFlightDataProvider {
    InMemoryFlightDataProvider::new(two_pareto_solutions_scenario())
}

/// An [`InMemoryFlightDataProvider`] preloaded with [`min_stay_scenario`].
pub fn min_stay_provider() -> InMemoryFlightDataProvider {
    InMemoryFlightDataProvider::new(min_stay_scenario())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::provider::FlightDataProvider;

    #[test]
    fn generate_random_flights_never_produces_self_loops() {
        let rows = generate_random_flights(&["JFK", "ORD", "SFO"], 200);
        assert_eq!(rows.len(), 200);
        assert!(rows
            .iter()
            .all(|r| r.departure_airport != r.arrival_airport));
    }

    #[test]
    fn two_pareto_solutions_provider_round_trips_waw_bcn() {
        let provider = two_pareto_solutions_provider();
        let rows = provider.fetch_flights().unwrap();
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn min_stay_provider_has_two_return_flights() {
        let provider = min_stay_provider();
        let rows = provider.fetch_flights().unwrap();
        let returns = rows.iter().filter(|r| r.departure_airport == "BCN").count();
        assert_eq!(returns, 2);
    }
}
