//! Organization ranking for donors.
//!
//! Scoring is additive and every factor is capped, so the result is a pure function of the
//! donor, the organization list, and the chosen [`ScoringStrategy`].

pub mod domain;
mod geo;
mod import;
mod scoring;

pub use domain::{
    Address, DonationRecord, DonationStatus, Donor, DonorId, GeoPoint, Organization,
    OrganizationId, ScoreBreakdown, ScoredOrganization,
};
pub use geo::{haversine_km, EARTH_RADIUS_KM};
pub use import::{DataImportError, MatchingDataImporter};
pub use scoring::{
    history_points, locality_points, proximity_points, score_organizations, type_match_points,
    ScoringStrategy, MAX_HISTORY_POINTS, MAX_PROXIMITY_POINTS,
};
