//! The flight data provider contract (spec §6 "Flight data provider
//! contract"): the cache's upstream, producing a validated row set.

use std::collections::{BTreeSet, HashMap};

use crate::error::CoreError;
use crate::schema::FlightRow;

/// External collaborator that supplies raw flight rows to the cache. The
/// ingestion scanner that actually talks to a data source is out of scope
/// (spec §1); implementations of this trait are the seam the core expects it
/// to sit behind.
pub trait FlightDataProvider {
    /// Fetch the current full flight row set. Schema validation happens in
    /// [`crate::schema::FlightTable::from_rows`], not here — a provider may
    /// return rows with violations and let the boundary reject them.
    fn fetch_flights(&self) -> Result<Vec<FlightRow>, CoreError>;

    /// The full set of airports the provider knows about, independent of
    /// whether a flight currently departs or arrives there.
    fn available_airports(&self) -> Result<BTreeSet<String>, CoreError>;

    /// Lightweight availability signal for health checks; never panics.
    fn health_check(&self) -> bool;
}

/// Reference provider backed by a fixed, in-memory row set. Used by tests and
/// by the `mock` feature's scenario fixtures; a real deployment supplies its
/// own provider backed by the ingestion scanner's output.
pub struct InMemoryFlightDataProvider {
    rows: Vec<FlightRow>,
}

impl InMemoryFlightDataProvider {
    /// Wrap a fixed row set.
    pub fn new(rows: Vec<FlightRow>) -> Self {
        InMemoryFlightDataProvider { rows }
    }
}

impl FlightDataProvider for InMemoryFlightDataProvider {
    fn fetch_flights(&self) -> Result<Vec<FlightRow>, CoreError> {
        if self.rows.is_empty() {
            return Err(CoreError::EmptyData);
        }
        Ok(self.rows.clone())
    }

    fn available_airports(&self) -> Result<BTreeSet<String>, CoreError> {
        let mut airports = BTreeSet::new();
        for row in &self.rows {
            airports.insert(row.departure_airport.clone());
            airports.insert(row.arrival_airport.clone());
        }
        Ok(airports)
    }

    fn health_check(&self) -> bool {
        !self.rows.is_empty()
    }
}

/// Provider backed by untyped `column name -> value` rows — the shape a
/// schema-less ingestion source hands the cache before anything has been
/// parsed. Exists to exercise the column-presence check in
/// [`FlightRow::from_raw`] (spec §7 `MissingColumns`), which
/// [`InMemoryFlightDataProvider`]'s already-typed `Vec<FlightRow>` can never
/// trigger.
pub struct RawFlightDataProvider {
    rows: Vec<HashMap<String, String>>,
}

impl RawFlightDataProvider {
    /// Wrap a fixed set of untyped rows.
    pub fn new(rows: Vec<HashMap<String, String>>) -> Self {
        RawFlightDataProvider { rows }
    }
}

impl FlightDataProvider for RawFlightDataProvider {
    /// Parses every raw row through [`FlightRow::from_raw`], failing fast on
    /// the first violation (mirrors the Python original's fail-fast
    /// validation).
    fn fetch_flights(&self) -> Result<Vec<FlightRow>, CoreError> {
        if self.rows.is_empty() {
            return Err(CoreError::EmptyData);
        }
        self.rows.iter().map(FlightRow::from_raw).collect()
    }

    fn available_airports(&self) -> Result<BTreeSet<String>, CoreError> {
        let typed = self.fetch_flights()?;
        let mut airports = BTreeSet::new();
        for row in &typed {
            airports.insert(row.departure_airport.clone());
            airports.insert(row.arrival_airport.clone());
        }
        Ok(airports)
    }

    fn health_check(&self) -> bool {
        !self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(from: &str, to: &str) -> FlightRow {
        FlightRow {
            departure_airport: from.to_string(),
            arrival_airport: to.to_string(),
            dep_time: 0.0,
            arr_time: 100.0,
            price: 10.0,
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

    #[test]
    fn empty_provider_reports_empty_data_and_fails_health_check() {
        let provider = InMemoryFlightDataProvider::new(vec![]);
        assert!(matches!(
            provider.fetch_flights().unwrap_err(),
            CoreError::EmptyData
        ));
        assert!(!provider.health_check());
    }

    #[test]
    fn available_airports_unions_departures_and_arrivals() {
        let provider = InMemoryFlightDataProvider::new(vec![row("JFK", "ORD")]);
        let airports = provider.available_airports().unwrap();
        assert!(airports.contains("JFK"));
        assert!(airports.contains("ORD"));
        assert!(provider.health_check());
    }

    fn raw_row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn raw_provider_parses_well_formed_rows() {
        let provider = RawFlightDataProvider::new(vec![raw_row(&[
            ("departure_airport", "JFK"),
            ("arrival_airport", "ORD"),
            ("dep_time", "0"),
            ("arr_time", "100"),
            ("price", "49.99"),
        ])]);

        let flights = provider.fetch_flights().unwrap();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].departure_airport, "JFK");
        assert!(provider.health_check());
    }

    #[test]
    fn raw_provider_surfaces_missing_columns() {
        let provider = RawFlightDataProvider::new(vec![raw_row(&[
            ("departure_airport", "JFK"),
            ("arrival_airport", "ORD"),
        ])]);

        let err = provider.fetch_flights().unwrap_err();
        assert!(matches!(err, CoreError::MissingColumns(_)));
    }

    #[test]
    fn raw_provider_reports_empty_data_on_no_rows() {
        let provider = RawFlightDataProvider::new(vec![]);
        assert!(matches!(
            provider.fetch_flights().unwrap_err(),
            CoreError::EmptyData
        ));
        assert!(!provider.health_check());
    }
}
