//! Validated travel search parameters (spec §3/§4.3).

use std::collections::BTreeSet;

use crate::error::CoreError;

/// Immutable, validated search constraints passed to the orchestrator.
///
/// Frozen by construction: every field is set once in [`TravelConstraints::new`]
/// and never mutated afterward, so a constraints value can be shared across
/// concurrent searches without synchronization.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelConstraints {
    /// Origin airport IATA code.
    pub start_city: String,
    /// Airports that must be visited (and returned from) on the itinerary.
    pub required_cities: BTreeSet<String>,
    /// Earliest departure time, minutes since the fixed epoch.
    pub t_min: f64,
    /// Latest arrival time, minutes since the fixed epoch.
    pub t_max: f64,
    /// Maximum number of intermediate stops, if constrained.
    pub max_stops: Option<u32>,
    /// Maximum total price, if constrained.
    pub max_price: Option<f64>,
    /// Minimum hours to stay at each required city before departing again, if constrained.
    pub min_stay_hours: Option<f64>,
}

impl TravelConstraints {
    /// Construct and validate a new set of constraints.
    pub fn new(
        start_city: String,
        required_cities: BTreeSet<String>,
        t_min: f64,
        t_max: f64,
        max_stops: Option<u32>,
        max_price: Option<f64>,
        min_stay_hours: Option<f64>,
    ) -> Result<Self, CoreError> {
        if start_city.is_empty() {
            return Err(CoreError::InvalidParameter(
                "start_city cannot be empty".to_string(),
            ));
        }
        if t_min > t_max {
            return Err(CoreError::InvalidTimeRange { t_min, t_max });
        }
        if let Some(price) = max_price {
            if price < 0.0 {
                return Err(CoreError::InvalidParameter(format!(
                    "max_price must be >= 0, got {}",
                    price
                )));
            }
        }
        if let Some(stay) = min_stay_hours {
            if stay < 0.0 {
                return Err(CoreError::InvalidParameter(format!(
                    "min_stay_hours must be >= 0, got {}",
                    stay
                )));
            }
        }

        Ok(TravelConstraints {
            start_city,
            required_cities,
            t_min,
            t_max,
            max_stops,
            max_price,
            min_stay_hours,
        })
    }

    /// Minimum stay, in minutes, resolved from `min_stay_hours` (0 if unset).
    pub fn min_stay_minutes(&self) -> f64 {
        self.min_stay_hours.unwrap_or(0.0) * 60.0
    }

    /// A new constraints value with an updated time window.
    pub fn with_time_window(&self, t_min: f64, t_max: f64) -> Result<Self, CoreError> {
        TravelConstraints::new(
            self.start_city.clone(),
            self.required_cities.clone(),
            t_min,
            t_max,
            self.max_stops,
            self.max_price,
            self.min_stay_hours,
        )
    }
}
