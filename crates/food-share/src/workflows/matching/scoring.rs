use serde::{Deserialize, Serialize};

use super::domain::{Donor, GeoPoint, Organization, ScoreBreakdown, ScoredOrganization};
use super::geo::haversine_km;

pub const MAX_PROXIMITY_POINTS: f64 = 50.0;
pub const PROXIMITY_RANGE_KM: f64 = 100.0;
pub const HISTORY_POINTS_PER_DONATION: f64 = 10.0;
pub const MAX_HISTORY_POINTS: f64 = 30.0;
pub const TYPE_MATCH_POINTS: f64 = 20.0;
pub const SAME_CITY_POINTS: f64 = 20.0;
pub const SAME_DISTRICT_POINTS: f64 = 10.0;

/// How organizations are ranked for a donor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// Coordinate distance, donation history, and a flat bonus whenever a
    /// donation type is named. The type is not compared against anything the
    /// organization accepts.
    Proximity {
        #[serde(default)]
        donor_location: Option<GeoPoint>,
        #[serde(default)]
        donation_type: Option<String>,
    },
    /// Donation history plus city/district equality. Used when only the
    /// donor's administrative area is known.
    Locality,
}

impl ScoringStrategy {
    pub fn proximity(donor_location: Option<GeoPoint>, donation_type: Option<String>) -> Self {
        Self::Proximity {
            donor_location,
            donation_type,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Proximity { .. } => "proximity",
            Self::Locality => "locality",
        }
    }

    pub fn breakdown(&self, donor: &Donor, organization: &Organization) -> ScoreBreakdown {
        let history = history_points(donor, &organization.name);
        match self {
            Self::Proximity {
                donor_location,
                donation_type,
            } => {
                let proximity = match (donor_location, organization.location) {
                    (Some(from), Some(to)) => proximity_points(haversine_km(*from, to)),
                    _ => 0.0,
                };
                ScoreBreakdown {
                    proximity,
                    history,
                    type_match: type_match_points(donation_type.as_deref()),
                    locality: 0.0,
                }
            }
            Self::Locality => ScoreBreakdown {
                proximity: 0.0,
                history,
                type_match: 0.0,
                locality: locality_points(donor, organization),
            },
        }
    }
}

/// Rank every organization for the donor, highest score first.
///
/// The sort is stable, so organizations with equal scores keep their input order.
pub fn score_organizations(
    donor: &Donor,
    organizations: &[Organization],
    strategy: &ScoringStrategy,
) -> Vec<ScoredOrganization> {
    let mut scored: Vec<ScoredOrganization> = organizations
        .iter()
        .map(|organization| {
            let factors = strategy.breakdown(donor, organization);
            ScoredOrganization {
                organization: organization.clone(),
                score: factors.total(),
                factors,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// `(100 - clamped distance) * 0.5`; zero at or beyond 100 km.
pub fn proximity_points(distance_km: f64) -> f64 {
    if !distance_km.is_finite() {
        return 0.0;
    }
    (PROXIMITY_RANGE_KM - distance_km.clamp(0.0, PROXIMITY_RANGE_KM)) * 0.5
}

pub fn history_points(donor: &Donor, organization_name: &str) -> f64 {
    let count = donor
        .history
        .iter()
        .filter(|record| record.organization == organization_name)
        .count();
    (count as f64 * HISTORY_POINTS_PER_DONATION).min(MAX_HISTORY_POINTS)
}

pub fn type_match_points(donation_type: Option<&str>) -> f64 {
    match donation_type {
        Some(label) if !label.is_empty() => TYPE_MATCH_POINTS,
        _ => 0.0,
    }
}

/// Same city beats same district. Strings compare exactly, so blank matches blank.
pub fn locality_points(donor: &Donor, organization: &Organization) -> f64 {
    if organization.address.city == donor.city {
        SAME_CITY_POINTS
    } else if organization.address.district == donor.district {
        SAME_DISTRICT_POINTS
    } else {
        0.0
    }
}
