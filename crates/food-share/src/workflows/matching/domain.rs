use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered organizations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrganizationId(pub String);

/// Identifier wrapper for registered donors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DonorId(pub String);

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Postal address as captured at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
}

impl Address {
    /// Slash-joined form stored on donation offers.
    pub fn joined(&self) -> String {
        [
            self.street.as_str(),
            self.city.as_str(),
            self.district.as_str(),
            self.state.as_str(),
            self.pincode.as_str(),
        ]
        .join("/")
    }
}

/// Recipient entity considered during matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub address: Address,
}

/// Lifecycle of a donation offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DonationStatus {
    Pending,
    Accepted,
    Collected,
}

impl DonationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Collected => "Collected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "collected" => Some(Self::Collected),
            _ => None,
        }
    }
}

/// Historical link between a donor and the organization a donation went to.
///
/// The organization is keyed by display name, not by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationRecord {
    pub organization: String,
    pub recorded_at: DateTime<Utc>,
    pub status: DonationStatus,
}

/// The subject a ranking is computed for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    pub id: Option<DonorId>,
    pub name: String,
    pub city: String,
    pub district: String,
    pub state: String,
    pub history: Vec<DonationRecord>,
}

/// Per-factor contributions behind a match score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub proximity: f64,
    pub history: f64,
    pub type_match: f64,
    pub locality: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.proximity + self.history + self.type_match + self.locality
    }
}

/// Organization annotated with its match score for a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredOrganization {
    #[serde(flatten)]
    pub organization: Organization,
    pub score: f64,
    pub factors: ScoreBreakdown,
}
