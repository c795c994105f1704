//! Route finder orchestrator (spec §4.4): the public entry point that wires
//! the flight graph cache, the weekly-periodicity expander, the reachability
//! prune, and the Pareto Dijkstra search into one request pipeline.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::{CoreError, UpstreamError};
use crate::expander::FlightDataExpander;
use crate::graph::cache::{CachedFlightGraph, FlightGraphCache};
use crate::graph::city_index::CityIndex;
use crate::graph::provider::FlightDataProvider;
use crate::prune;
use crate::revalidate::OfferRevalidator;
use crate::route::{RouteResult, RouteSegment, ValidatedRoute};
use crate::schema::{FlightRow, FlightTable};
use crate::search::{self, TravelConstraints};
use crate::{orchestrator_debug, orchestrator_info};

/// Stateless, thread-safe domain service coordinating the whole search
/// pipeline: it holds only `Arc`-backed handles and a value-typed `Config`,
/// so cloning a `FlightRouter` is cheap and any number of concurrent
/// searches can share one instance (spec §4.4: "orchestrator is stateless
/// and thread-safe").
pub struct FlightRouter {
    config: Config,
    cache: FlightGraphCache,
    expander: FlightDataExpander,
    revalidator: Option<OfferRevalidator>,
}

impl FlightRouter {
    /// Build a router backed by `provider`, with no live-offer revalidator
    /// configured yet (attach one with [`Self::with_revalidator`]).
    pub fn new(provider: Arc<dyn FlightDataProvider + Send + Sync>, config: Config) -> Self {
        let cache = FlightGraphCache::new(provider, Duration::from_secs(config.cache_ttl_seconds));
        let expander =
            FlightDataExpander::new(config.base_week_start_minutes, config.base_week_end_minutes);

        FlightRouter {
            config,
            cache,
            expander,
            revalidator: None,
        }
    }

    /// Attach a live-offer revalidator, enabling [`Self::validate`].
    pub fn with_revalidator(mut self, api_token: String) -> Result<Self, UpstreamError> {
        self.revalidator = Some(OfferRevalidator::new(&self.config, api_token)?);
        Ok(self)
    }

    /// Find Pareto-optimal routes matching the given constraints, with
    /// `max_stops`/`max_price` post-filters applied (spec §4.4 step 6).
    #[allow(clippy::too_many_arguments)]
    pub async fn search(
        &self,
        start_city: String,
        required_cities: BTreeSet<String>,
        t_min: f64,
        t_max: f64,
        max_stops: Option<u32>,
        max_price: Option<f64>,
        min_stay_hours: Option<f64>,
    ) -> Result<Vec<RouteResult>, CoreError> {
        let constraints = TravelConstraints::new(
            start_city,
            required_cities,
            t_min,
            t_max,
            max_stops,
            max_price,
            min_stay_hours,
        )?;

        let total_start = Instant::now();
        let raw = self.search_raw(&constraints).await?;
        let raw_count = raw.len();
        let filtered = apply_post_filters(raw, &constraints);

        orchestrator_info!(
            "route search completed: {} results (filtered from {}) in {:.3}ms",
            filtered.len(),
            raw_count,
            total_start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(filtered)
    }

    /// Run the search pipeline with no `max_stops`/`max_price` post-filtering:
    /// every Pareto-optimal route the algorithm found. A zero-segment
    /// solution (spec §8: empty `required_cities` with no minimum stay) is
    /// still dropped here, since [`RouteResult`] cannot represent a route
    /// with no segments.
    pub async fn search_raw(
        &self,
        constraints: &TravelConstraints,
    ) -> Result<Vec<RouteResult>, CoreError> {
        orchestrator_debug!(
            "search constraints: start={} required={:?} t_min={} t_max={}",
            constraints.start_city,
            constraints.required_cities,
            constraints.t_min,
            constraints.t_max
        );

        let graph_start = Instant::now();
        let graph = self.cache.get_graph()?;
        orchestrator_debug!(
            "graph retrieved in {:.3}ms ({} flights, {} airports)",
            graph_start.elapsed().as_secs_f64() * 1000.0,
            graph.row_count(),
            graph.airports().len()
        );

        validate_airports_known(&graph, constraints)?;

        self.search_raw_with_graph(&graph, constraints)
    }

    fn search_raw_with_graph(
        &self,
        graph: &CachedFlightGraph,
        constraints: &TravelConstraints,
    ) -> Result<Vec<RouteResult>, CoreError> {
        let offsets = self
            .expander
            .get_week_offsets(constraints.t_min, constraints.t_max);

        // The algorithm always runs over a freshly-built index over the
        // pruned table (below), so the only thing this step needs to
        // produce is the right table: the base table when the window fits
        // inside it, or a re-sorted expansion otherwise.
        let table = if offsets == [0] {
            graph.table().clone()
        } else {
            let expanded = self
                .expander
                .expand(graph.table(), constraints.t_min, constraints.t_max);
            resort(&expanded)?
        };

        let sources: BTreeSet<String> = std::iter::once(constraints.start_city.clone())
            .chain(constraints.required_cities.iter().cloned())
            .collect();
        let mut pruned = prune::prune(&table, &sources, self.config.prune_hop_limit);
        if self.config.defensive_copy {
            pruned = pruned.clone();
        }
        let pruned_index = CityIndex::build(&pruned);

        let algo_start = Instant::now();
        let outcome = search::search(&pruned, &pruned_index, constraints);
        orchestrator_debug!(
            "algorithm produced {} solutions in {:.3}ms ({} rows after pruning from {})",
            outcome.solutions.len(),
            algo_start.elapsed().as_secs_f64() * 1000.0,
            pruned.len(),
            table.len()
        );

        let mut results = Vec::with_capacity(outcome.solutions.len());
        for &label_id in &outcome.solutions {
            let rows = outcome.arena.reconstruct_flight_rows(label_id);
            if rows.is_empty() {
                continue;
            }

            let segments: Vec<RouteSegment> = rows
                .iter()
                .enumerate()
                .map(|(i, &row)| RouteSegment {
                    segment_index: i,
                    departure_airport: pruned.departure_airport(row).to_string(),
                    arrival_airport: pruned.arrival_airport(row).to_string(),
                    dep_time: pruned.dep_time(row),
                    arr_time: pruned.arr_time(row),
                    price: pruned.price(row),
                    carrier_code: pruned.carrier_code(row).map(String::from),
                    carrier_name: pruned.carrier_name(row).map(String::from),
                })
                .collect();

            results.push(RouteResult::from_segments(results.len(), segments)?);
        }

        Ok(results)
    }

    /// Every airport known to the current graph (spec §6).
    pub async fn get_available_airports(&self) -> Result<BTreeSet<String>, CoreError> {
        let graph = self.cache.get_graph()?;
        Ok(graph.airports().clone())
    }

    /// True if a direct flight exists from `origin` to `destination` in the
    /// current graph.
    pub async fn has_route(&self, origin: &str, destination: &str) -> Result<bool, CoreError> {
        let graph = self.cache.get_graph()?;
        Ok(graph.has_route(origin, destination))
    }

    /// Force an immediate, synchronous graph rebuild, bypassing the TTL.
    pub async fn refresh_data(&self) -> Result<(), CoreError> {
        self.cache.force_refresh()?;
        Ok(())
    }

    /// Stop scheduling further background refreshes.
    pub fn shutdown(&self) {
        self.cache.shutdown();
    }

    /// Revalidate a cached route against the live offer API, wrapping it in
    /// a [`ValidatedRoute`] with an unset `validation` if no revalidator is
    /// configured (spec §4.5).
    pub async fn validate(&self, route: RouteResult, departure_date: &str) -> ValidatedRoute {
        let validation = match &self.revalidator {
            Some(revalidator) => Some(revalidator.validate_route(&route, departure_date).await),
            None => None,
        };
        ValidatedRoute::new(route, validation)
    }
}

/// Reject a search whose `start_city` or any `required_cities` entry is not
/// among the graph's known airports (spec §7 `InvalidAirport`).
fn validate_airports_known(
    graph: &CachedFlightGraph,
    constraints: &TravelConstraints,
) -> Result<(), CoreError> {
    if !graph.airports().contains(&constraints.start_city) {
        return Err(CoreError::InvalidAirport(constraints.start_city.clone()));
    }
    for city in &constraints.required_cities {
        if !graph.airports().contains(city) {
            return Err(CoreError::InvalidAirport(city.clone()));
        }
    }
    Ok(())
}

/// Apply `max_stops`/`max_price` post-filters (spec §4.4 step 6): cheaper to
/// check after the algorithm runs than to thread through the search itself.
fn apply_post_filters(results: Vec<RouteResult>, constraints: &TravelConstraints) -> Vec<RouteResult> {
    results
        .into_iter()
        .filter(|r| {
            constraints
                .max_stops
                .map_or(true, |max| r.num_segments().saturating_sub(1) as u32 <= max)
        })
        .filter(|r| constraints.max_price.map_or(true, |max| r.total_cost() <= max))
        .collect()
}

/// Re-sort an expanded table by `departure_airport`. The expander
/// concatenates shifted week blocks without re-sorting (spec §4.2), which
/// leaves the same city split across multiple non-contiguous blocks;
/// [`CityIndex::build`] requires one contiguous run per city, so the
/// orchestrator re-derives a sorted table before indexing it.
fn resort(table: &FlightTable) -> Result<FlightTable, CoreError> {
    let rows: Vec<FlightRow> = (0..table.len()).map(|i| table.row(i)).collect();
    FlightTable::from_rows(rows)
}
