//! Per-segment and per-route offer revalidation (spec §4.5).

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::error::UpstreamError;
use crate::revalidate::offer_api::OfferApiClient;
use crate::revalidate::scoring::{self, MatchingWeights};
use crate::route::{RouteResult, RouteSegment};
use crate::{revalidate_debug, revalidate_error, Config};

/// Outcome of validating one flight (segment or whole route) against the
/// live offer API. Ordered worst-to-best is NOT the declaration order —
/// see [`ValidationStatus::severity`] for the aggregation ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Price within tolerance, ready to book.
    Confirmed,
    /// Flight exists but price differs beyond the confirmed tolerance.
    PriceChanged,
    /// Flight not found in the live search, or no confident offer match.
    Unavailable,
    /// The live API call itself failed.
    ApiError,
}

impl ValidationStatus {
    /// Worst-status-wins ordering: higher severity dominates when aggregating
    /// segment statuses into a route status (spec §4.5).
    fn severity(self) -> u8 {
        match self {
            ValidationStatus::Confirmed => 0,
            ValidationStatus::PriceChanged => 1,
            ValidationStatus::Unavailable => 2,
            ValidationStatus::ApiError => 3,
        }
    }

    fn worst(self, other: ValidationStatus) -> ValidationStatus {
        if self.severity() >= other.severity() {
            self
        } else {
            other
        }
    }
}

/// Validation result for a single flight segment.
#[derive(Debug, Clone)]
pub struct SegmentValidation {
    /// Index of the segment within its route.
    pub segment_index: usize,
    /// Outcome status.
    pub status: ValidationStatus,
    /// Match confidence, 0-100.
    pub confidence: f64,
    /// Original cached price.
    pub cached_price: f64,
    /// Live price, if a matching offer was found.
    pub live_price: Option<f64>,
    /// Live offer ID, if available (for booking).
    pub offer_id: Option<String>,
    /// Error detail, set only when `status == ApiError`.
    pub error_message: Option<String>,
}

impl SegmentValidation {
    /// Percentage price change from cached to live, if both are known.
    pub fn price_change_percent(&self) -> Option<f64> {
        let live = self.live_price?;
        if self.cached_price == 0.0 {
            return None;
        }
        Some((live - self.cached_price) / self.cached_price * 100.0)
    }
}

/// Aggregated validation result for a complete route.
#[derive(Debug, Clone)]
pub struct RouteValidation {
    /// Identifier of the validated route.
    pub route_id: usize,
    /// Worst-status-wins aggregate of all segment statuses.
    pub status: ValidationStatus,
    /// Per-segment validation results, in segment order.
    pub segments: Vec<SegmentValidation>,
    /// Sum of cached segment prices.
    pub total_cached_price: f64,
    /// Sum of live segment prices, if every segment found a live price.
    pub total_live_price: Option<f64>,
    /// Mean confidence across segments.
    pub average_confidence: f64,
    /// Wall-clock time the validation pass took, in milliseconds.
    pub validation_time_ms: f64,
}

impl RouteValidation {
    /// Total percentage price change across the whole route.
    pub fn total_price_change_percent(&self) -> Option<f64> {
        let live = self.total_live_price?;
        if self.total_cached_price == 0.0 {
            return None;
        }
        Some((live - self.total_cached_price) / self.total_cached_price * 100.0)
    }

    /// True if the route can be confidently offered for booking.
    pub fn is_bookable(&self) -> bool {
        matches!(
            self.status,
            ValidationStatus::Confirmed | ValidationStatus::PriceChanged
        )
    }
}

/// Validates cached routes against a live offer API, bounding concurrency
/// with a semaphore and demoting every upstream failure to a segment-level
/// [`ValidationStatus::ApiError`] rather than propagating it (spec §7).
pub struct OfferRevalidator {
    client: OfferApiClient,
    weights: MatchingWeights,
    semaphore: Arc<Semaphore>,
    confirmed_threshold_pct: f64,
    price_changed_threshold_pct: f64,
    min_confidence: f64,
}

impl OfferRevalidator {
    /// Build a revalidator from the crate [`Config`] and an API token.
    pub fn new(config: &Config, api_token: String) -> Result<Self, UpstreamError> {
        let client = OfferApiClient::new(
            api_token,
            config.revalidator_request_timeout_ms,
            config.revalidator_max_retries,
            config.revalidator_backoff_multiplier,
        )?;

        Ok(OfferRevalidator {
            client,
            weights: config.matching_weights(),
            semaphore: Arc::new(Semaphore::new(config.revalidator_max_concurrent)),
            confirmed_threshold_pct: config.confirmed_threshold_pct,
            price_changed_threshold_pct: config.price_changed_threshold_pct,
            min_confidence: config.min_confidence,
        })
    }

    /// Validate a single segment against the live API.
    pub async fn validate_segment(
        &self,
        segment: &RouteSegment,
        departure_date: &str,
    ) -> SegmentValidation {
        let _permit = self.semaphore.acquire().await;

        match self.validate_segment_impl(segment, departure_date).await {
            Ok(result) => result,
            Err(e) => {
                revalidate_error!(
                    "validation failed for {}->{}: {}",
                    segment.departure_airport,
                    segment.arrival_airport,
                    e
                );
                SegmentValidation {
                    segment_index: segment.segment_index,
                    status: ValidationStatus::ApiError,
                    confidence: 0.0,
                    cached_price: segment.price,
                    live_price: None,
                    offer_id: None,
                    error_message: Some(e.to_string()),
                }
            }
        }
    }

    async fn validate_segment_impl(
        &self,
        segment: &RouteSegment,
        departure_date: &str,
    ) -> Result<SegmentValidation, UpstreamError> {
        let offers = self
            .client
            .search_offers(
                &segment.departure_airport,
                &segment.arrival_airport,
                departure_date,
            )
            .await?;

        if offers.is_empty() || scoring::all_placeholder(&offers) {
            return Ok(SegmentValidation {
                segment_index: segment.segment_index,
                status: ValidationStatus::Unavailable,
                confidence: 0.0,
                cached_price: segment.price,
                live_price: None,
                offer_id: None,
                error_message: Some("no offers found for route".to_string()),
            });
        }

        let expected_hour = ((segment.dep_time.rem_euclid(1440.0)) / 60.0) as u8;
        let best = scoring::best_match(
            &offers,
            segment.carrier_code.as_deref(),
            expected_hour,
            segment.price,
            &self.weights,
        );

        let best = match best {
            Some(b) if b.confidence(&self.weights) >= self.min_confidence => b,
            other => {
                return Ok(SegmentValidation {
                    segment_index: segment.segment_index,
                    status: ValidationStatus::Unavailable,
                    confidence: other.map(|b| b.confidence(&self.weights)).unwrap_or(0.0),
                    cached_price: segment.price,
                    live_price: None,
                    offer_id: None,
                    error_message: Some(
                        "no matching offer found above confidence threshold".to_string(),
                    ),
                });
            }
        };

        let price_change_pct = if segment.price > 0.0 {
            ((best.offer.price - segment.price) / segment.price * 100.0).abs()
        } else {
            0.0
        };

        let status = if price_change_pct <= self.confirmed_threshold_pct {
            ValidationStatus::Confirmed
        } else if price_change_pct <= self.price_changed_threshold_pct {
            ValidationStatus::PriceChanged
        } else {
            ValidationStatus::Unavailable
        };

        Ok(SegmentValidation {
            segment_index: segment.segment_index,
            status,
            confidence: best.confidence(&self.weights),
            cached_price: segment.price,
            live_price: Some(best.offer.price),
            offer_id: Some(best.offer.offer_id.clone()),
            error_message: None,
        })
    }

    /// Validate every segment of a route concurrently (bounded by the
    /// semaphore) and aggregate with worst-status-wins.
    pub async fn validate_route(
        &self,
        route: &RouteResult,
        departure_date: &str,
    ) -> RouteValidation {
        let start = std::time::Instant::now();

        let futures = route
            .segments
            .iter()
            .map(|segment| self.validate_segment(segment, departure_date));
        let segments = futures::future::join_all(futures).await;

        let status = segments
            .iter()
            .fold(ValidationStatus::Confirmed, |acc, s| acc.worst(s.status));

        let total_cached_price: f64 = segments.iter().map(|s| s.cached_price).sum();
        let total_live_price = segments
            .iter()
            .map(|s| s.live_price)
            .collect::<Option<Vec<f64>>>()
            .map(|prices| prices.iter().sum());

        let average_confidence = if segments.is_empty() {
            0.0
        } else {
            segments.iter().map(|s| s.confidence).sum::<f64>() / segments.len() as f64
        };

        revalidate_debug!(
            "validated route {} ({} segments) in {:.0}ms: {:?}",
            route.route_id,
            segments.len(),
            start.elapsed().as_millis(),
            status
        );

        RouteValidation {
            route_id: route.route_id,
            status,
            segments,
            total_cached_price,
            total_live_price,
            average_confidence,
            validation_time_ms: start.elapsed().as_millis() as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_status_wins_prefers_highest_severity() {
        assert_eq!(
            ValidationStatus::Confirmed.worst(ValidationStatus::ApiError),
            ValidationStatus::ApiError
        );
        assert_eq!(
            ValidationStatus::PriceChanged.worst(ValidationStatus::Confirmed),
            ValidationStatus::PriceChanged
        );
        assert_eq!(
            ValidationStatus::Unavailable.worst(ValidationStatus::ApiError),
            ValidationStatus::ApiError
        );
    }

    #[test]
    fn is_bookable_only_for_confirmed_or_price_changed() {
        let base = RouteValidation {
            route_id: 1,
            status: ValidationStatus::Confirmed,
            segments: vec![],
            total_cached_price: 100.0,
            total_live_price: Some(102.0),
            average_confidence: 90.0,
            validation_time_ms: 5.0,
        };
        assert!(base.is_bookable());

        let mut unavailable = base.clone();
        unavailable.status = ValidationStatus::Unavailable;
        assert!(!unavailable.is_bookable());
    }

    #[test]
    fn total_price_change_percent_requires_live_price() {
        let v = RouteValidation {
            route_id: 1,
            status: ValidationStatus::Confirmed,
            segments: vec![],
            total_cached_price: 200.0,
            total_live_price: Some(220.0),
            average_confidence: 80.0,
            validation_time_ms: 1.0,
        };
        assert_eq!(v.total_price_change_percent(), Some(10.0));
    }
}
