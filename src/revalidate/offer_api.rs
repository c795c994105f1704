//! HTTP client for the live flight-offer search API (spec §4.5 ambient detail).
//!
//! Implements the re-search strategy: given an origin, destination, and
//! departure date, `search_offers` posts an offer request and returns the
//! raw candidate list for [`super::scoring`] to rank. Retries on HTTP 429
//! with exponential backoff, bounded by [`crate::Config::revalidator_max_retries`].

use std::time::Duration;

use serde::Deserialize;

use crate::error::UpstreamError;
use crate::revalidate_warn;
use crate::revalidate::scoring::OfferCandidate;

const DEFAULT_API_BASE_URL: &str = "https://api.duffel.com";

#[derive(Debug, Deserialize)]
struct OfferRequestResponse {
    data: OfferRequestData,
}

#[derive(Debug, Deserialize)]
struct OfferRequestData {
    #[serde(default)]
    offers: Vec<RawOffer>,
}

#[derive(Debug, Deserialize)]
struct RawOffer {
    id: String,
    total_amount: String,
    slices: Vec<RawSlice>,
}

#[derive(Debug, Deserialize)]
struct RawSlice {
    segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    departing_at: String,
    operating_carrier: RawCarrier,
}

#[derive(Debug, Deserialize)]
struct RawCarrier {
    iata_code: String,
}

/// Thin client over the live offer-search API.
pub struct OfferApiClient {
    http: reqwest::Client,
    api_token: String,
    base_url: String,
    max_retries: u32,
    backoff_multiplier: f64,
}

impl OfferApiClient {
    /// Build a client using the bearer token and timeout pulled from [`crate::Config`].
    pub fn new(
        api_token: String,
        request_timeout_ms: u64,
        max_retries: u32,
        backoff_multiplier: f64,
    ) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(request_timeout_ms))
            .build()
            .map_err(|_| UpstreamError::Timeout)?;

        Ok(OfferApiClient {
            http,
            api_token,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            max_retries,
            backoff_multiplier,
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Search for live offers on a single origin/destination/date slice,
    /// retrying on rate-limit responses with exponential backoff.
    pub async fn search_offers(
        &self,
        origin: &str,
        destination: &str,
        departure_date: &str,
    ) -> Result<Vec<OfferCandidate>, UpstreamError> {
        let payload = serde_json::json!({
            "data": {
                "slices": [{
                    "origin": origin,
                    "destination": destination,
                    "departure_date": departure_date,
                }],
                "passengers": [{"type": "adult"}],
                "cabin_class": "economy",
            }
        });

        let mut retries = 0u32;
        let mut backoff_secs = 1.0f64;

        loop {
            let response = self
                .http
                .post(format!("{}/air/offer_requests", self.base_url))
                .bearer_auth(&self.api_token)
                .header("Duffel-Version", "v2")
                .query(&[("return_offers", "true")])
                .json(&payload)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        UpstreamError::Timeout
                    } else {
                        UpstreamError::HttpError(0)
                    }
                })?;

            let status = response.status();

            if status.is_success() {
                let parsed: OfferRequestResponse = response
                    .json()
                    .await
                    .map_err(|e| UpstreamError::InvalidPayload(e.to_string()))?;
                return Ok(parsed.data.offers.into_iter().map(to_candidate).collect());
            }

            if status.as_u16() == 429 {
                retries += 1;
                if retries > self.max_retries {
                    return Err(UpstreamError::RateLimited);
                }
                revalidate_warn!(
                    "rate limited searching {}->{}, retry {}/{} in {:.1}s",
                    origin,
                    destination,
                    retries,
                    self.max_retries,
                    backoff_secs
                );
                tokio::time::sleep(Duration::from_secs_f64(backoff_secs)).await;
                backoff_secs *= self.backoff_multiplier;
                continue;
            }

            return Err(UpstreamError::HttpError(status.as_u16()));
        }
    }
}

fn to_candidate(offer: RawOffer) -> OfferCandidate {
    let price = offer.total_amount.parse::<f64>().unwrap_or(0.0);
    let first_slice = offer.slices.first();
    let num_stops = first_slice.map(|s| s.segments.len().saturating_sub(1)).unwrap_or(0) as u32;

    let (carrier_code, departure_hour) = match first_slice.and_then(|s| s.segments.first()) {
        Some(seg) => (
            seg.operating_carrier.iata_code.clone(),
            departure_hour_from_iso8601(&seg.departing_at),
        ),
        None => (String::new(), 0),
    };

    OfferCandidate {
        offer_id: offer.id,
        price,
        carrier_code,
        departure_hour,
        num_stops,
    }
}

/// Extract the hour-of-day from an RFC 3339 timestamp without pulling in a
/// full datetime parser for a single field.
fn departure_hour_from_iso8601(timestamp: &str) -> u8 {
    timestamp
        .splitn(2, 'T')
        .nth(1)
        .and_then(|rest| rest.get(0..2))
        .and_then(|hh| hh.parse::<u8>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn departure_hour_parses_rfc3339() {
        assert_eq!(departure_hour_from_iso8601("2026-07-13T14:35:00Z"), 14);
        assert_eq!(departure_hour_from_iso8601("2026-07-13T04:05:00+00:00"), 4);
        assert_eq!(departure_hour_from_iso8601("garbage"), 0);
    }

    #[test]
    fn to_candidate_handles_nonstop_offer() {
        let raw = RawOffer {
            id: "off_1".to_string(),
            total_amount: "249.50".to_string(),
            slices: vec![RawSlice {
                segments: vec![RawSegment {
                    departing_at: "2026-07-13T09:00:00Z".to_string(),
                    operating_carrier: RawCarrier {
                        iata_code: "AA".to_string(),
                    },
                }],
            }],
        };
        let candidate = to_candidate(raw);
        assert_eq!(candidate.price, 249.50);
        assert_eq!(candidate.carrier_code, "AA");
        assert_eq!(candidate.departure_hour, 9);
        assert_eq!(candidate.num_stops, 0);
    }
}
