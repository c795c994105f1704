//! The flight graph cache (spec §4.1): amortizes graph construction across
//! requests and refreshes itself in the background with zero-downtime,
//! atomic publication (spec §5).

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::error::CoreError;
use crate::graph::city_index::{CityIndex, FlightView};
use crate::graph::provider::FlightDataProvider;
use crate::schema::FlightTable;
use crate::{cache_debug, cache_error, cache_info, cache_warn};

/// A fully-built, immutable flight graph version (spec §3 "Cached flight
/// graph"). Once published, none of its fields are ever mutated; the cache
/// publishes a brand new value on every refresh instead.
#[derive(Debug)]
pub struct CachedFlightGraph {
    table: FlightTable,
    city_index: CityIndex,
    airports: BTreeSet<String>,
    direct_routes: HashSet<(String, String)>,
    built_at: Instant,
    version: String,
    row_count: usize,
}

impl CachedFlightGraph {
    /// The underlying sorted flight table.
    pub fn table(&self) -> &FlightTable {
        &self.table
    }

    /// The city index over [`Self::table`].
    pub fn city_index(&self) -> &CityIndex {
        &self.city_index
    }

    /// Every airport that appears as a departure or arrival anywhere in the
    /// table.
    pub fn airports(&self) -> &BTreeSet<String> {
        &self.airports
    }

    /// Content-hash version string, stable for identical table contents.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Number of rows in the flight table.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// True if a direct flight exists from `origin` to `destination`.
    pub fn has_route(&self, origin: &str, destination: &str) -> bool {
        self.direct_routes
            .contains(&(origin.to_string(), destination.to_string()))
    }

    /// A zero-copy view over every flight departing `city` (spec §4.1
    /// "Get-flights-for-city").
    pub fn flights_for_city(&self, city: &str) -> FlightView {
        self.city_index.view_for_city(city)
    }

    /// A zero-copy view over the union of flights departing any city in
    /// `cities` (spec §4.1 "Get-flights-for-cities").
    pub fn flights_for_cities<'a>(&self, cities: impl Iterator<Item = &'a str>) -> FlightView {
        self.city_index.view_for_cities(cities)
    }

    /// True if this graph version is older than `ttl`.
    fn is_stale(&self, ttl: Duration) -> bool {
        self.built_at.elapsed() >= ttl
    }
}

/// Caches a [`CachedFlightGraph`] behind a TTL, rebuilding it on a background
/// task when stale and publishing the new version atomically (spec §4.1/§5).
///
/// Publication (spec §5 "Publication mechanism"): `current` is a
/// `std::sync::RwLock`, not a `tokio` one — a reader takes the read lock only
/// long enough to clone the `Option<Arc<CachedFlightGraph>>` (an `Option` of
/// a refcount bump), so the critical section never suspends and never needs
/// an `.await`. The swap itself, in [`Self::build_and_publish`], is a single
/// write-lock critical section that replaces the `Option`; readers who
/// already cloned the old `Arc` keep the old graph alive by reference
/// counting until they drop it. `None` is the pre-cold-start state, before
/// any graph has ever been built.
pub struct FlightGraphCache {
    provider: Arc<dyn FlightDataProvider + Send + Sync>,
    ttl: Duration,
    current: Arc<RwLock<Option<Arc<CachedFlightGraph>>>>,
    refreshing: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
}

impl FlightGraphCache {
    /// Build a cache with no graph yet loaded; the first [`Self::get_graph`]
    /// call performs the cold-start build synchronously.
    pub fn new(provider: Arc<dyn FlightDataProvider + Send + Sync>, ttl: Duration) -> Self {
        FlightGraphCache {
            provider,
            ttl,
            current: Arc::new(RwLock::new(None)),
            refreshing: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Return the current graph snapshot, never blocking on a rebuild after
    /// the first successful load. Cold start builds synchronously and
    /// returns [`CoreError::GraphNotInitialized`] on failure; once a graph
    /// exists, a stale read schedules a background refresh and still returns
    /// the (stale) current version immediately.
    pub fn get_graph(&self) -> Result<Arc<CachedFlightGraph>, CoreError> {
        let snapshot = { self.current.read().expect("graph cache lock poisoned").clone() };

        match snapshot {
            None => self.build_and_publish().map_err(|e| {
                cache_error!("cold start failed, no prior graph to fall back on: {}", e);
                CoreError::GraphNotInitialized
            }),
            Some(graph) => {
                if graph.is_stale(self.ttl) && !self.shutdown.load(Ordering::Relaxed) {
                    self.schedule_background_refresh();
                }
                Ok(graph)
            }
        }
    }

    /// Synchronously rebuild and publish a new graph version, regardless of
    /// TTL. A failure here propagates to the caller (unlike the background
    /// path, which only logs and keeps serving the prior graph).
    pub fn force_refresh(&self) -> Result<Arc<CachedFlightGraph>, CoreError> {
        self.build_and_publish()
    }

    /// Drop the current graph, forcing the next [`Self::get_graph`] call to
    /// perform a fresh cold-start build.
    pub fn invalidate(&self) {
        *self.current.write().expect("graph cache lock poisoned") = None;
        cache_info!("cache invalidated, next read will cold-start");
    }

    /// Stop scheduling further background refreshes. Already-running
    /// refreshes still complete and publish.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        cache_info!("refresh worker shut down");
    }

    fn build_and_publish(&self) -> Result<Arc<CachedFlightGraph>, CoreError> {
        let graph = Arc::new(build_graph(self.provider.as_ref())?);
        cache_info!(
            "published graph version {} ({} rows)",
            graph.version,
            graph.row_count
        );
        *self.current.write().expect("graph cache lock poisoned") = Some(graph.clone());
        Ok(graph)
    }

    fn schedule_background_refresh(&self) {
        if self
            .refreshing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            cache_debug!("refresh already in progress, skipping");
            return;
        }

        let provider = self.provider.clone();
        let current = self.current.clone();
        let refreshing = self.refreshing.clone();

        cache_debug!("scheduling background refresh");
        tokio::spawn(async move {
            match build_graph(provider.as_ref()) {
                Ok(graph) => {
                    cache_info!(
                        "background refresh published version {} ({} rows)",
                        graph.version,
                        graph.row_count
                    );
                    *current.write().expect("graph cache lock poisoned") = Some(Arc::new(graph));
                }
                Err(e) => {
                    cache_warn!(
                        "background refresh failed, keeping previous graph: {}",
                        e
                    );
                }
            }
            refreshing.store(false, Ordering::SeqCst);
        });
    }
}

/// Build protocol (spec §4.1): pull validated rows, sort and index them, and
/// compute the version hash. Never touches the currently-published graph.
fn build_graph(provider: &(dyn FlightDataProvider + Send + Sync)) -> Result<CachedFlightGraph, CoreError> {
    let rows = provider.fetch_flights().map_err(|e| {
        cache_error!("cold start failed: {}", e);
        e
    })?;
    let table = FlightTable::from_rows(rows)?;
    let city_index = CityIndex::build(&table);

    let mut airports = BTreeSet::new();
    let mut direct_routes = HashSet::new();
    for i in 0..table.len() {
        let dep = table.departure_airport(i).to_string();
        let arr = table.arrival_airport(i).to_string();
        airports.insert(dep.clone());
        airports.insert(arr.clone());
        direct_routes.insert((dep, arr));
    }

    let version = version_hash(&table);
    let row_count = table.len();

    Ok(CachedFlightGraph {
        table,
        city_index,
        airports,
        direct_routes,
        built_at: Instant::now(),
        version,
        row_count,
    })
}

/// Content-hash version string from row count, recognized column names, and
/// the first/last row contents (spec §4.1 step 5).
fn version_hash(table: &FlightTable) -> String {
    const COLUMN_NAMES: &[&str] = &[
        "departure_airport",
        "arrival_airport",
        "dep_time",
        "arr_time",
        "price",
    ];

    let mut hasher = DefaultHasher::new();
    table.len().hash(&mut hasher);
    COLUMN_NAMES.hash(&mut hasher);

    if table.len() > 0 {
        hash_row(table, 0, &mut hasher);
        hash_row(table, table.len() - 1, &mut hasher);
    }

    format!("{:016x}", hasher.finish())
}

fn hash_row(table: &FlightTable, idx: usize, hasher: &mut DefaultHasher) {
    table.departure_airport(idx).hash(hasher);
    table.arrival_airport(idx).hash(hasher);
    table.dep_time(idx).to_bits().hash(hasher);
    table.arr_time(idx).to_bits().hash(hasher);
    table.price(idx).to_bits().hash(hasher);
}
