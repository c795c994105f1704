//! Error taxonomy for the flight router core.
//!
//! Two enums cover the two places errors originate: [`CoreError`] for
//! anything that fails a request outright (bad input, uninitialized cache,
//! a bug), and [`UpstreamError`] for the revalidator's live API calls, which
//! are always recovered locally and demoted to a segment-level status
//! rather than propagated.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Errors that fail the request they occur in.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The flight data provider returned zero rows.
    EmptyData,

    /// The flight data provider's table is missing one or more required columns.
    MissingColumns(Vec<String>),

    /// A row violated the core schema (negative price, `arr_time < dep_time`, etc).
    SchemaViolation(String),

    /// `origin` or a required city is not a known airport code.
    InvalidAirport(String),

    /// `t_min > t_max`.
    InvalidTimeRange {
        /// Earliest departure requested.
        t_min: f64,
        /// Latest arrival requested.
        t_max: f64,
    },

    /// A numeric constraint (`max_stops`, `max_price`, `min_stay`) was negative.
    InvalidParameter(String),

    /// Cold start failed and no previously-built graph exists to fall back on.
    GraphNotInitialized,

    /// A component attempted to write to a published, read-only flight table.
    AlgorithmMutationAttempt,
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            CoreError::EmptyData => write!(f, "flight data provider returned no rows"),
            CoreError::MissingColumns(cols) => {
                write!(f, "flight table is missing required columns: {:?}", cols)
            }
            CoreError::SchemaViolation(msg) => write!(f, "schema violation: {}", msg),
            CoreError::InvalidAirport(code) => write!(f, "unknown airport code: {}", code),
            CoreError::InvalidTimeRange { t_min, t_max } => {
                write!(f, "invalid time range: t_min ({}) > t_max ({})", t_min, t_max)
            }
            CoreError::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
            CoreError::GraphNotInitialized => {
                write!(f, "flight graph cache has no graph and cold start failed")
            }
            CoreError::AlgorithmMutationAttempt => {
                write!(f, "attempted to mutate a read-only flight table")
            }
        }
    }
}

impl std::error::Error for CoreError {}

/// Errors surfaced only inside the offer revalidator. None of these ever
/// propagate past [`crate::revalidate::validator::OfferRevalidator`] — they
/// are always demoted to [`crate::revalidate::ValidationStatus::ApiError`]
/// at the segment level (spec §7 propagation policy).
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// The live API responded 429 and retries were exhausted.
    RateLimited,

    /// The request exceeded its configured timeout.
    Timeout,

    /// The live API responded with a non-2xx, non-429 status.
    HttpError(u16),

    /// The live API's response body could not be parsed as expected.
    InvalidPayload(String),
}

impl Display for UpstreamError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            UpstreamError::RateLimited => write!(f, "rate limited, retries exhausted"),
            UpstreamError::Timeout => write!(f, "request timed out"),
            UpstreamError::HttpError(status) => write!(f, "upstream HTTP error: {}", status),
            UpstreamError::InvalidPayload(msg) => write!(f, "invalid upstream payload: {}", msg),
        }
    }
}

impl std::error::Error for UpstreamError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_error_display_is_distinguishable_by_kind() {
        let a = CoreError::EmptyData.to_string();
        let b = CoreError::GraphNotInitialized.to_string();
        assert_ne!(a, b);
    }

    #[test]
    fn invalid_time_range_carries_the_offending_bounds() {
        let err = CoreError::InvalidTimeRange {
            t_min: 100.0,
            t_max: 50.0,
        };
        assert!(err.to_string().contains("100"));
        assert!(err.to_string().contains("50"));
    }

    #[test]
    fn upstream_error_display() {
        assert_eq!(
            UpstreamError::HttpError(503).to_string(),
            "upstream HTTP error: 503"
        );
    }
}
