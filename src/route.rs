//! Route result types: the output contract of the search pipeline (spec §4.3/§4.4).

use std::collections::BTreeSet;

use crate::error::CoreError;
use crate::revalidate::RouteValidation;

/// A single flight leg within a route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSegment {
    /// Zero-based index of this segment within its route.
    pub segment_index: usize,
    /// Departure airport IATA code.
    pub departure_airport: String,
    /// Arrival airport IATA code.
    pub arrival_airport: String,
    /// Departure time, in minutes since the crate's fixed epoch.
    pub dep_time: f64,
    /// Arrival time, in minutes since the crate's fixed epoch.
    pub arr_time: f64,
    /// Segment price.
    pub price: f64,
    /// Operating carrier code, if the data source provided one.
    pub carrier_code: Option<String>,
    /// Operating carrier display name, if the data source provided one.
    pub carrier_name: Option<String>,
}

impl RouteSegment {
    /// Flight duration in minutes.
    pub fn duration(&self) -> f64 {
        self.arr_time - self.dep_time
    }
}

/// A complete Pareto-optimal itinerary: an ordered chain of [`RouteSegment`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// Identifier assigned by the orchestrator, unique within one search call.
    pub route_id: usize,
    /// Flight legs in travel order.
    pub segments: Vec<RouteSegment>,
    /// Set of cities visited (arrival airports), used to check the required-cities constraint.
    pub visited_cities: BTreeSet<String>,
}

impl RouteResult {
    /// Build a validated `RouteResult` from an ordered, non-empty segment list.
    pub fn from_segments(
        route_id: usize,
        segments: Vec<RouteSegment>,
    ) -> Result<Self, CoreError> {
        if segments.is_empty() {
            return Err(CoreError::InvalidParameter(
                "route must have at least one segment".to_string(),
            ));
        }

        let visited_cities = segments
            .iter()
            .map(|seg| seg.arrival_airport.clone())
            .collect();

        Ok(RouteResult {
            route_id,
            segments,
            visited_cities,
        })
    }

    /// Sum of all segment prices.
    pub fn total_cost(&self) -> f64 {
        self.segments.iter().map(|s| s.price).sum()
    }

    /// Wall-clock elapsed time from the first departure to the last arrival, in minutes.
    pub fn elapsed(&self) -> f64 {
        match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => last.arr_time - first.dep_time,
            _ => 0.0,
        }
    }

    /// Sum of per-segment air time, in minutes — the time actually spent flying.
    pub fn flight_time(&self) -> f64 {
        self.segments.iter().map(|s| s.duration()).sum()
    }

    /// Elapsed trip duration expressed in days.
    pub fn trip_duration_days(&self) -> f64 {
        self.elapsed() / (24.0 * 60.0)
    }

    /// Number of flight segments.
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Origin airport of the first segment.
    pub fn start_city(&self) -> &str {
        &self.segments[0].departure_airport
    }

    /// Final destination airport of the last segment.
    pub fn end_city(&self) -> &str {
        &self.segments[self.segments.len() - 1].arrival_airport
    }

    /// Departure time of the first segment.
    pub fn departure_time(&self) -> f64 {
        self.segments[0].dep_time
    }

    /// Arrival time of the last segment.
    pub fn arrival_time(&self) -> f64 {
        self.segments[self.segments.len() - 1].arr_time
    }

    /// Ordered list of every city visited, including the origin.
    pub fn route_cities(&self) -> Vec<&str> {
        let mut cities = Vec::with_capacity(self.segments.len() + 1);
        cities.push(self.segments[0].departure_airport.as_str());
        for seg in &self.segments {
            cities.push(seg.arrival_airport.as_str());
        }
        cities
    }
}

/// A cached [`RouteResult`] paired with its live-offer revalidation, if any
/// was performed (spec §4.5; grounded in `original_source`'s `ValidatedRoute`
/// dataclass). The convenience return type for callers that want a single
/// bookable-or-not answer without reconciling the two pieces themselves.
#[derive(Debug, Clone)]
pub struct ValidatedRoute {
    /// The cached itinerary.
    pub route: RouteResult,
    /// The outcome of revalidating it against the live offer API, or `None`
    /// if no revalidator was configured / the route wasn't checked.
    pub validation: Option<RouteValidation>,
}

impl ValidatedRoute {
    /// Pair a route with its (optional) validation outcome.
    pub fn new(route: RouteResult, validation: Option<RouteValidation>) -> Self {
        ValidatedRoute { route, validation }
    }

    /// True only when a validation was performed and came back bookable
    /// (spec §4.5 `is_bookable`). A route that was never revalidated is
    /// treated as not confidently bookable.
    pub fn is_bookable(&self) -> bool {
        self.validation
            .as_ref()
            .map_or(false, RouteValidation::is_bookable)
    }

    /// The price a caller should actually expect to pay: the live total when
    /// every segment found one, falling back to the cached total otherwise.
    pub fn effective_price(&self) -> f64 {
        self.validation
            .as_ref()
            .and_then(|v| v.total_live_price)
            .unwrap_or_else(|| self.route.total_cost())
    }

    /// Mean match confidence from the validation pass, if one was performed.
    pub fn price_confidence(&self) -> Option<f64> {
        self.validation.as_ref().map(|v| v.average_confidence)
    }
}
