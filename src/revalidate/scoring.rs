//! Offer-matching scoring weights (spec §4.5, "weighted scoring algorithm").
//!
//! PoC-validated weights for matching a live offer search result back to a
//! cached flight segment: non-stop bonus, carrier match/mismatch, departure
//! hour alignment, price-delta tiers, and a per-stop penalty.

use ordered_float::OrderedFloat;

/// Weights applied when scoring a live offer against a cached segment.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchingWeights {
    /// Points for a non-stop flight.
    pub non_stop: f64,
    /// Points for an exact carrier code match.
    pub carrier_match: f64,
    /// Points for an exact departure-hour match.
    pub hour_exact: f64,
    /// Points for a departure within +/-1 hour.
    pub hour_close: f64,
    /// Points for a price within 5% of the cached price.
    pub price_exact: f64,
    /// Points for a price within 25% of the cached price.
    pub price_close: f64,
    /// Penalty for a carrier mismatch.
    pub carrier_mismatch_penalty: f64,
    /// Penalty for a departure more than 1 hour off.
    pub hour_outside_penalty: f64,
    /// Penalty for a price more than 25% off.
    pub price_outside_penalty: f64,
    /// Penalty applied once per connecting stop.
    pub per_stop_penalty: f64,
}

impl Default for MatchingWeights {
    fn default() -> Self {
        MatchingWeights {
            non_stop: 20.0,
            carrier_match: 50.0,
            hour_exact: 30.0,
            hour_close: 20.0,
            price_exact: 30.0,
            price_close: 15.0,
            carrier_mismatch_penalty: -20.0,
            hour_outside_penalty: -30.0,
            price_outside_penalty: -50.0,
            per_stop_penalty: -10.0,
        }
    }
}

impl MatchingWeights {
    /// Maximum achievable score, used as the denominator for confidence.
    pub fn max_score(&self) -> f64 {
        self.non_stop + self.carrier_match + self.hour_exact + self.price_exact
    }
}

/// A candidate live offer, reduced to the fields the scorer needs.
#[derive(Debug, Clone)]
pub struct OfferCandidate {
    /// Upstream offer identifier.
    pub offer_id: String,
    /// Total offer price.
    pub price: f64,
    /// Operating carrier code, or `"ZZ"` for the placeholder sentinel.
    pub carrier_code: String,
    /// Departure hour of day, 0-23, in the offer's local clock.
    pub departure_hour: u8,
    /// Number of connecting stops (0 = non-stop).
    pub num_stops: u32,
}

/// An offer scored against a cached segment.
#[derive(Debug, Clone)]
pub struct ScoredOffer {
    /// The offer that was scored.
    pub offer: OfferCandidate,
    /// Raw score (may be negative).
    pub score: f64,
}

impl ScoredOffer {
    /// Score converted to a 0-100 confidence percentage.
    pub fn confidence(&self, weights: &MatchingWeights) -> f64 {
        let max = weights.max_score();
        ((self.score / max) * 100.0).clamp(0.0, 100.0)
    }
}

/// Placeholder carrier code the upstream API uses when a route has no real
/// airline service; offers entirely from this carrier are treated as if the
/// route doesn't exist.
pub const PLACEHOLDER_CARRIER: &str = "ZZ";

/// Score a single offer against the expected carrier and departure hour of a
/// cached segment. Mirrors `_score_offer` in the upstream validator.
pub fn score_offer(
    candidate: &OfferCandidate,
    expected_carrier: Option<&str>,
    expected_hour: u8,
    cached_price: f64,
    weights: &MatchingWeights,
) -> ScoredOffer {
    let mut score = 0.0;

    if candidate.num_stops == 0 {
        score += weights.non_stop;
    }

    if let Some(carrier) = expected_carrier {
        if candidate.carrier_code == carrier {
            score += weights.carrier_match;
        } else {
            score += weights.carrier_mismatch_penalty;
        }
    }

    let hour_diff = (candidate.departure_hour as i16 - expected_hour as i16).unsigned_abs();
    if hour_diff == 0 {
        score += weights.hour_exact;
    } else if hour_diff <= 1 {
        score += weights.hour_close;
    } else {
        score += weights.hour_outside_penalty;
    }

    if cached_price > 0.0 {
        let price_diff_pct = ((candidate.price - cached_price) / cached_price * 100.0).abs();
        if price_diff_pct <= 5.0 {
            score += weights.price_exact;
        } else if price_diff_pct <= 25.0 {
            score += weights.price_close;
        } else {
            score += weights.price_outside_penalty;
        }
    }

    score += candidate.num_stops as f64 * weights.per_stop_penalty;

    ScoredOffer {
        offer: candidate.clone(),
        score,
    }
}

/// Pick the highest-scoring offer out of a batch, skipping placeholder-only
/// offers. Returns `None` if `offers` is empty.
pub fn best_match(
    offers: &[OfferCandidate],
    expected_carrier: Option<&str>,
    expected_hour: u8,
    cached_price: f64,
    weights: &MatchingWeights,
) -> Option<ScoredOffer> {
    offers
        .iter()
        .map(|c| score_offer(c, expected_carrier, expected_hour, cached_price, weights))
        .max_by_key(|scored| OrderedFloat(scored.score))
}

/// True if every offer in the batch is from the placeholder carrier, meaning
/// the route isn't actually served by a real airline.
pub fn all_placeholder(offers: &[OfferCandidate]) -> bool {
    !offers.is_empty() && offers.iter().all(|o| o.carrier_code == PLACEHOLDER_CARRIER)
}
