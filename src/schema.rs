//! Core flight data contract (spec §3).
//!
//! `FlightRow` carries the five required fields plus the recognized
//! optional extended fields; `FlightTable` stores rows in struct-of-arrays
//! form, sorted ascending by `departure_airport`, so [`crate::graph::city_index`]
//! can slice contiguous ranges without copying.

use std::collections::HashMap;

use crate::error::CoreError;

/// Fixed epoch the crate measures all times against: 2026-07-13T00:00:00Z,
/// the Monday of the canonical base week (see [`crate::Config::base_week_start_minutes`]).
pub const EPOCH_REFERENCE: &str = "2026-07-13T00:00:00Z";

/// Column names a raw, untyped flight row must carry (spec §6 "Flight data
/// provider contract"; mirrors `REQUIRED_COLUMNS` in
/// `original_source/src/dijkstra/validation.py`).
pub const REQUIRED_COLUMNS: &[&str] = &[
    "departure_airport",
    "arrival_airport",
    "dep_time",
    "arr_time",
    "price",
];

/// Every column name [`FlightRow::from_raw`] interprets by name. Anything
/// else in a raw row lands in `extra`, preserved but uninterpreted.
const KNOWN_COLUMNS: &[&str] = &[
    "departure_airport",
    "arrival_airport",
    "dep_time",
    "arr_time",
    "price",
    "carrier_code",
    "carrier_name",
    "terminal_origin",
    "terminal_dest",
    "transfer_time_mins",
    "baggage_included",
    "scheduled_departure",
    "scheduled_arrival",
    "co2_grams",
];

/// One flight: the required core fields plus whatever extended fields the
/// data provider supplied. Extra, unrecognized columns are preserved
/// verbatim in `extra`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightRow {
    /// Departure airport IATA code.
    pub departure_airport: String,
    /// Arrival airport IATA code.
    pub arrival_airport: String,
    /// Departure time, minutes since [`EPOCH_REFERENCE`].
    pub dep_time: f64,
    /// Arrival time, minutes since [`EPOCH_REFERENCE`].
    pub arr_time: f64,
    /// Flight price in the provider's base currency.
    pub price: f64,
    /// Operating carrier IATA code.
    pub carrier_code: Option<String>,
    /// Operating carrier display name.
    pub carrier_name: Option<String>,
    /// Departure terminal.
    pub terminal_origin: Option<String>,
    /// Arrival terminal.
    pub terminal_dest: Option<String>,
    /// Minimum connection time at the arrival airport, in minutes.
    pub transfer_time_mins: Option<f64>,
    /// Number of included checked bags.
    pub baggage_included: Option<f64>,
    /// Original departure datetime string, for display.
    pub scheduled_departure: Option<String>,
    /// Original arrival datetime string, for display.
    pub scheduled_arrival: Option<String>,
    /// Estimated CO2 emissions for this segment, in grams.
    pub co2_grams: Option<f64>,
    /// Any other provider-supplied columns, preserved but never interpreted
    /// by the core.
    pub extra: HashMap<String, String>,
}

impl FlightRow {
    /// Build a row from an untyped `column name -> value` map, the shape a
    /// schema-less upstream hands the cache before anything has been parsed
    /// into typed fields. Mirrors `validate_flights_df`'s column-presence
    /// check in `original_source/src/dijkstra/validation.py`, at row
    /// granularity rather than whole-table granularity, since the
    /// struct-of-arrays [`FlightTable`] has no notion of "a row" before it's
    /// typed. Required numeric columns that are present but unparsable
    /// surface as [`CoreError::SchemaViolation`]; a required column missing
    /// entirely surfaces as [`CoreError::MissingColumns`].
    pub fn from_raw(raw: &HashMap<String, String>) -> Result<Self, CoreError> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !raw.contains_key(**col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CoreError::MissingColumns(missing));
        }

        let parse_required = |key: &str| -> Result<f64, CoreError> {
            raw[key].trim().parse::<f64>().map_err(|_| {
                CoreError::SchemaViolation(format!(
                    "column {} is not numeric: {:?}",
                    key, raw[key]
                ))
            })
        };

        let row = FlightRow {
            departure_airport: raw["departure_airport"].clone(),
            arrival_airport: raw["arrival_airport"].clone(),
            dep_time: parse_required("dep_time")?,
            arr_time: parse_required("arr_time")?,
            price: parse_required("price")?,
            carrier_code: raw.get("carrier_code").cloned(),
            carrier_name: raw.get("carrier_name").cloned(),
            terminal_origin: raw.get("terminal_origin").cloned(),
            terminal_dest: raw.get("terminal_dest").cloned(),
            transfer_time_mins: raw.get("transfer_time_mins").and_then(|v| v.parse().ok()),
            baggage_included: raw.get("baggage_included").and_then(|v| v.parse().ok()),
            scheduled_departure: raw.get("scheduled_departure").cloned(),
            scheduled_arrival: raw.get("scheduled_arrival").cloned(),
            co2_grams: raw.get("co2_grams").and_then(|v| v.parse().ok()),
            extra: raw
                .iter()
                .filter(|(k, _)| !KNOWN_COLUMNS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        };

        row.validate()?;
        Ok(row)
    }

    /// Reject rows that violate the core schema's invariants (spec §7).
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.price < 0.0 {
            return Err(CoreError::SchemaViolation(format!(
                "negative price {} on {}->{}",
                self.price, self.departure_airport, self.arrival_airport
            )));
        }
        if self.arr_time < self.dep_time {
            return Err(CoreError::SchemaViolation(format!(
                "arr_time ({}) < dep_time ({}) on {}->{}",
                self.arr_time, self.dep_time, self.departure_airport, self.arrival_airport
            )));
        }
        if self.departure_airport == self.arrival_airport {
            return Err(CoreError::SchemaViolation(format!(
                "self-loop flight at {}",
                self.departure_airport
            )));
        }
        Ok(())
    }
}

/// An immutable, struct-of-arrays table of flight rows, sorted ascending by
/// `departure_airport`. Built once per cache version and never mutated.
#[derive(Debug, Clone, Default)]
pub struct FlightTable {
    departure_airport: Vec<String>,
    arrival_airport: Vec<String>,
    dep_time: Vec<f64>,
    arr_time: Vec<f64>,
    price: Vec<f64>,
    carrier_code: Vec<Option<String>>,
    carrier_name: Vec<Option<String>>,
    terminal_origin: Vec<Option<String>>,
    terminal_dest: Vec<Option<String>>,
    transfer_time_mins: Vec<Option<f64>>,
    baggage_included: Vec<Option<f64>>,
    scheduled_departure: Vec<Option<String>>,
    scheduled_arrival: Vec<Option<String>>,
    co2_grams: Vec<Option<f64>>,
    extra: Vec<HashMap<String, String>>,
}

impl FlightTable {
    /// Build a table from validated rows, sorted ascending by `departure_airport`.
    /// Returns [`CoreError::EmptyData`] if `rows` is empty.
    pub fn from_rows(mut rows: Vec<FlightRow>) -> Result<Self, CoreError> {
        if rows.is_empty() {
            return Err(CoreError::EmptyData);
        }
        for row in &rows {
            row.validate()?;
        }

        rows.sort_by(|a, b| a.departure_airport.cmp(&b.departure_airport));

        let n = rows.len();
        let mut table = FlightTable {
            departure_airport: Vec::with_capacity(n),
            arrival_airport: Vec::with_capacity(n),
            dep_time: Vec::with_capacity(n),
            arr_time: Vec::with_capacity(n),
            price: Vec::with_capacity(n),
            carrier_code: Vec::with_capacity(n),
            carrier_name: Vec::with_capacity(n),
            terminal_origin: Vec::with_capacity(n),
            terminal_dest: Vec::with_capacity(n),
            transfer_time_mins: Vec::with_capacity(n),
            baggage_included: Vec::with_capacity(n),
            scheduled_departure: Vec::with_capacity(n),
            scheduled_arrival: Vec::with_capacity(n),
            co2_grams: Vec::with_capacity(n),
            extra: Vec::with_capacity(n),
        };

        for row in rows {
            table.departure_airport.push(row.departure_airport);
            table.arrival_airport.push(row.arrival_airport);
            table.dep_time.push(row.dep_time);
            table.arr_time.push(row.arr_time);
            table.price.push(row.price);
            table.carrier_code.push(row.carrier_code);
            table.carrier_name.push(row.carrier_name);
            table.terminal_origin.push(row.terminal_origin);
            table.terminal_dest.push(row.terminal_dest);
            table.transfer_time_mins.push(row.transfer_time_mins);
            table.baggage_included.push(row.baggage_included);
            table.scheduled_departure.push(row.scheduled_departure);
            table.scheduled_arrival.push(row.scheduled_arrival);
            table.co2_grams.push(row.co2_grams);
            table.extra.push(row.extra);
        }

        Ok(table)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.departure_airport.len()
    }

    /// True if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.departure_airport.is_empty()
    }

    /// Departure airport at row `idx`.
    pub fn departure_airport(&self, idx: usize) -> &str {
        &self.departure_airport[idx]
    }

    /// Arrival airport at row `idx`.
    pub fn arrival_airport(&self, idx: usize) -> &str {
        &self.arrival_airport[idx]
    }

    /// Departure time at row `idx`.
    pub fn dep_time(&self, idx: usize) -> f64 {
        self.dep_time[idx]
    }

    /// Arrival time at row `idx`.
    pub fn arr_time(&self, idx: usize) -> f64 {
        self.arr_time[idx]
    }

    /// Price at row `idx`.
    pub fn price(&self, idx: usize) -> f64 {
        self.price[idx]
    }

    /// Carrier code at row `idx`, if present.
    pub fn carrier_code(&self, idx: usize) -> Option<&str> {
        self.carrier_code[idx].as_deref()
    }

    /// Carrier name at row `idx`, if present.
    pub fn carrier_name(&self, idx: usize) -> Option<&str> {
        self.carrier_name[idx].as_deref()
    }

    /// Reconstruct a standalone [`FlightRow`] for row `idx` (used at path
    /// reconstruction time, off the hot loop).
    pub fn row(&self, idx: usize) -> FlightRow {
        FlightRow {
            departure_airport: self.departure_airport[idx].clone(),
            arrival_airport: self.arrival_airport[idx].clone(),
            dep_time: self.dep_time[idx],
            arr_time: self.arr_time[idx],
            price: self.price[idx],
            carrier_code: self.carrier_code[idx].clone(),
            carrier_name: self.carrier_name[idx].clone(),
            terminal_origin: self.terminal_origin[idx].clone(),
            terminal_dest: self.terminal_dest[idx].clone(),
            transfer_time_mins: self.transfer_time_mins[idx],
            baggage_included: self.baggage_included[idx],
            scheduled_departure: self.scheduled_departure[idx].clone(),
            scheduled_arrival: self.scheduled_arrival[idx].clone(),
            co2_grams: self.co2_grams[idx],
            extra: self.extra[idx].clone(),
        }
    }

    /// Build a new table keeping only rows at `indices`. Used by the
    /// reachability prune (spec §4.4 step 4); does not re-sort.
    pub fn select(&self, indices: &[usize]) -> FlightTable {
        let mut table = FlightTable::default();
        for &idx in indices {
            table.departure_airport.push(self.departure_airport[idx].clone());
            table.arrival_airport.push(self.arrival_airport[idx].clone());
            table.dep_time.push(self.dep_time[idx]);
            table.arr_time.push(self.arr_time[idx]);
            table.price.push(self.price[idx]);
            table.carrier_code.push(self.carrier_code[idx].clone());
            table.carrier_name.push(self.carrier_name[idx].clone());
            table.terminal_origin.push(self.terminal_origin[idx].clone());
            table.terminal_dest.push(self.terminal_dest[idx].clone());
            table
                .transfer_time_mins
                .push(self.transfer_time_mins[idx]);
            table.baggage_included.push(self.baggage_included[idx]);
            table
                .scheduled_departure
                .push(self.scheduled_departure[idx].clone());
            table
                .scheduled_arrival
                .push(self.scheduled_arrival[idx].clone());
            table.co2_grams.push(self.co2_grams[idx]);
            table.extra.push(self.extra[idx].clone());
        }
        table
    }

    /// Iterate `(departure_airport, arrival_airport)` pairs for every row,
    /// used by the reachability prune's vectorized BFS.
    pub fn endpoint_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.departure_airport
            .iter()
            .zip(self.arrival_airport.iter())
            .map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// The `departure_airport` column, contiguous and already sorted. Lets
    /// [`crate::graph::city_index::CityIndex`] scan it as a flat slice
    /// instead of going through per-row accessors.
    pub fn departure_airport_column(&self) -> &[String] {
        &self.departure_airport
    }

    /// Append another table's rows verbatim, without re-sorting. Used by the
    /// weekly-periodicity expander to concatenate shifted week copies (spec
    /// §4.2: "the output is not re-sorted and not re-indexed").
    pub fn extend_from(&mut self, other: &FlightTable) {
        self.departure_airport
            .extend(other.departure_airport.iter().cloned());
        self.arrival_airport
            .extend(other.arrival_airport.iter().cloned());
        self.dep_time.extend(other.dep_time.iter().copied());
        self.arr_time.extend(other.arr_time.iter().copied());
        self.price.extend(other.price.iter().copied());
        self.carrier_code.extend(other.carrier_code.iter().cloned());
        self.carrier_name.extend(other.carrier_name.iter().cloned());
        self.terminal_origin
            .extend(other.terminal_origin.iter().cloned());
        self.terminal_dest
            .extend(other.terminal_dest.iter().cloned());
        self.transfer_time_mins
            .extend(other.transfer_time_mins.iter().copied());
        self.baggage_included
            .extend(other.baggage_included.iter().copied());
        self.scheduled_departure
            .extend(other.scheduled_departure.iter().cloned());
        self.scheduled_arrival
            .extend(other.scheduled_arrival.iter().cloned());
        self.co2_grams.extend(other.co2_grams.iter().copied());
        self.extra.extend(other.extra.iter().cloned());
    }

    /// A copy of this table with every time column (and, if present, the
    /// textual scheduled-departure/arrival columns) translated by
    /// `offset_minutes` (spec §4.2: "shift only the time columns"). Does not
    /// re-sort or validate; callers that need a city index over the result
    /// rebuild it separately.
    pub fn shifted(&self, offset_days: i64, offset_minutes: f64) -> FlightTable {
        let mut table = self.clone();
        for t in table.dep_time.iter_mut() {
            *t += offset_minutes;
        }
        for t in table.arr_time.iter_mut() {
            *t += offset_minutes;
        }
        for s in table.scheduled_departure.iter_mut() {
            *s = s
                .as_deref()
                .map(|s| shift_iso8601_days(s, offset_days).unwrap_or_else(|| s.to_string()));
        }
        for s in table.scheduled_arrival.iter_mut() {
            *s = s
                .as_deref()
                .map(|s| shift_iso8601_days(s, offset_days).unwrap_or_else(|| s.to_string()));
        }
        table
    }
}

/// Shift the date portion of an `%Y-%m-%dT%H:%M:%S`-style timestamp by whole
/// days, keeping the time-of-day untouched. Returns `None` if the string
/// isn't in the expected shape; callers fall back to the original string
/// unshifted rather than dropping it — this column is display-only and
/// never interpreted by the core.
fn shift_iso8601_days(timestamp: &str, offset_days: i64) -> Option<String> {
    use chrono::{Duration, NaiveDateTime};

    let parsed = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S").ok()?;
    let shifted = parsed.checked_add_signed(Duration::days(offset_days))?;
    Some(shifted.format("%Y-%m-%dT%H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(from: &str, to: &str, dep: f64, arr: f64, price: f64) -> FlightRow {
        FlightRow {
            departure_airport: from.to_string(),
            arrival_airport: to.to_string(),
            dep_time: dep,
            arr_time: arr,
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

    #[test]
    fn from_rows_rejects_empty_input() {
        let err = FlightTable::from_rows(vec![]).unwrap_err();
        assert!(matches!(err, CoreError::EmptyData));
    }

    #[test]
    fn from_rows_rejects_negative_price() {
        let err = FlightTable::from_rows(vec![row("JFK", "ORD", 0.0, 100.0, -1.0)]).unwrap_err();
        assert!(matches!(err, CoreError::SchemaViolation(_)));
    }

    #[test]
    fn from_rows_rejects_arrival_before_departure() {
        let err = FlightTable::from_rows(vec![row("JFK", "ORD", 100.0, 50.0, 10.0)]).unwrap_err();
        assert!(matches!(err, CoreError::SchemaViolation(_)));
    }

    #[test]
    fn from_rows_rejects_self_loop() {
        let err = FlightTable::from_rows(vec![row("JFK", "JFK", 0.0, 100.0, 10.0)]).unwrap_err();
        assert!(matches!(err, CoreError::SchemaViolation(_)));
    }

    #[test]
    fn from_rows_sorts_ascending_by_departure_airport() {
        let table = FlightTable::from_rows(vec![
            row("SFO", "JFK", 0.0, 100.0, 10.0),
            row("ORD", "JFK", 0.0, 100.0, 10.0),
        ])
        .unwrap();
        assert_eq!(table.departure_airport(0), "ORD");
        assert_eq!(table.departure_airport(1), "SFO");
    }

    #[test]
    fn select_preserves_order_of_requested_indices() {
        let table = FlightTable::from_rows(vec![
            row("JFK", "ORD", 0.0, 100.0, 10.0),
            row("ORD", "SFO", 0.0, 100.0, 20.0),
        ])
        .unwrap();
        let selected = table.select(&[1]);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected.departure_airport(0), "ORD");
        assert_eq!(selected.arrival_airport(0), "SFO");
    }

    #[test]
    fn shifted_translates_time_columns_only() {
        let table =
            FlightTable::from_rows(vec![row("JFK", "ORD", 100.0, 200.0, 10.0)]).unwrap();
        let shifted = table.shifted(7, 7.0 * 1440.0);
        assert_eq!(shifted.dep_time(0), 100.0 + 7.0 * 1440.0);
        assert_eq!(shifted.arr_time(0), 200.0 + 7.0 * 1440.0);
        assert_eq!(shifted.departure_airport(0), "JFK");
        assert_eq!(shifted.price(0), 10.0);
    }

    #[test]
    fn shifted_translates_scheduled_departure_string() {
        let mut r = row("JFK", "ORD", 100.0, 200.0, 10.0);
        r.scheduled_departure = Some("2026-07-13T08:00:00".to_string());
        let table = FlightTable::from_rows(vec![r]).unwrap();
        let shifted = table.shifted(7, 7.0 * 1440.0);
        assert_eq!(
            shifted.row(0).scheduled_departure.as_deref(),
            Some("2026-07-20T08:00:00")
        );
    }

    #[test]
    fn shifted_preserves_unparseable_scheduled_string_unshifted() {
        let mut r = row("JFK", "ORD", 100.0, 200.0, 10.0);
        r.scheduled_departure = Some("not-a-timestamp".to_string());
        let table = FlightTable::from_rows(vec![r]).unwrap();
        let shifted = table.shifted(7, 7.0 * 1440.0);
        assert_eq!(
            shifted.row(0).scheduled_departure.as_deref(),
            Some("not-a-timestamp")
        );
    }

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn from_raw_rejects_missing_columns() {
        let err = FlightRow::from_raw(&raw(&[
            ("departure_airport", "JFK"),
            ("arrival_airport", "ORD"),
            ("dep_time", "0"),
        ]))
        .unwrap_err();
        match err {
            CoreError::MissingColumns(missing) => {
                let mut missing = missing;
                missing.sort();
                assert_eq!(missing, vec!["arr_time".to_string(), "price".to_string()]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn from_raw_rejects_unparsable_numeric_column() {
        let err = FlightRow::from_raw(&raw(&[
            ("departure_airport", "JFK"),
            ("arrival_airport", "ORD"),
            ("dep_time", "0"),
            ("arr_time", "100"),
            ("price", "not-a-number"),
        ]))
        .unwrap_err();
        assert!(matches!(err, CoreError::SchemaViolation(_)));
    }

    #[test]
    fn from_raw_parses_a_valid_row_and_keeps_unknown_columns_in_extra() {
        let row = FlightRow::from_raw(&raw(&[
            ("departure_airport", "JFK"),
            ("arrival_airport", "ORD"),
            ("dep_time", "0"),
            ("arr_time", "100"),
            ("price", "49.99"),
            ("carrier_code", "AA"),
            ("fare_basis", "Y26"),
        ]))
        .unwrap();

        assert_eq!(row.departure_airport, "JFK");
        assert_eq!(row.price, 49.99);
        assert_eq!(row.carrier_code.as_deref(), Some("AA"));
        assert_eq!(row.extra.get("fare_basis").map(String::as_str), Some("Y26"));
    }

    #[test]
    fn extend_from_appends_without_resorting() {
        let mut table =
            FlightTable::from_rows(vec![row("SFO", "JFK", 0.0, 100.0, 10.0)]).unwrap();
        let more = FlightTable::from_rows(vec![row("ATL", "JFK", 0.0, 100.0, 10.0)]).unwrap();
        table.extend_from(&more);
        assert_eq!(table.len(), 2);
        assert_eq!(table.departure_airport(0), "SFO");
        assert_eq!(table.departure_airport(1), "ATL");
    }
}
