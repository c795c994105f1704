//! Live offer revalidation (spec §4.5).
//!
//! A cached route is cheap to compute but can go stale the moment real
//! fares and schedules move. This module re-searches the live offer API for
//! each segment of a candidate route, matches the closest offer with
//! [`scoring`], and aggregates the per-segment verdicts into a single
//! route-level [`RouteValidation`] with worst-status-wins semantics.

pub mod offer_api;
pub mod scoring;
pub mod validator;

pub use validator::{
    OfferRevalidator, RouteValidation, SegmentValidation, ValidationStatus,
};
