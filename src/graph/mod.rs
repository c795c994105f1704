//! The flight graph cache (spec §4.1): a validated, time-partitioned,
//! index-accelerated view over the flight table that survives across
//! requests and refreshes itself in the background without blocking readers.

pub mod cache;
pub mod city_index;
pub mod provider;

pub use cache::{CachedFlightGraph, FlightGraphCache};
pub use city_index::{CityIndex, FlightView};
pub use provider::{FlightDataProvider, InMemoryFlightDataProvider, RawFlightDataProvider};
