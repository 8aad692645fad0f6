use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::matching::{
    Address, DonationRecord, DonationStatus, Donor, DonorId, GeoPoint, Organization,
    OrganizationId,
};
use crate::workflows::quality::ImageAnalysisResult;

/// Identifier wrapper for donation offers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

/// Identifier wrapper for chat messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Sign-up payload for an individual or household donor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

/// Sign-up payload for a receiving organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationRegistration {
    pub organization_name: String,
    pub organization_code: String,
    pub owner_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationCredentials {
    pub email: String,
    pub password: String,
    pub organization_code: String,
}

/// Stored donor account. The password digest never leaves the service.
#[derive(Debug, Clone, PartialEq)]
pub struct DonorAccount {
    pub id: DonorId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
    pub location: Option<GeoPoint>,
    pub password_digest: String,
}

impl DonorAccount {
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id.0.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    pub fn profile(&self, donation_count: usize) -> DonorProfileView {
        DonorProfileView {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            location: self.location,
            donation_count,
        }
    }

    /// Matching subject built from the account and its offer history.
    pub fn as_donor(&self, history: Vec<DonationRecord>) -> Donor {
        Donor {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            city: self.address.city.clone(),
            district: self.address.district.clone(),
            state: self.address.state.clone(),
            history,
        }
    }
}

/// Stored organization account.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationAccount {
    pub id: OrganizationId,
    pub name: String,
    pub organization_code: String,
    pub owner_name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
    pub location: Option<GeoPoint>,
    pub password_digest: String,
}

impl OrganizationAccount {
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id.0.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    pub fn profile(&self, donation_count: usize) -> OrganizationProfileView {
        OrganizationProfileView {
            id: self.id.clone(),
            name: self.name.clone(),
            owner_name: self.owner_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            location: self.location,
            donation_count,
        }
    }

    /// Matching candidate view of the organization.
    pub fn as_organization(&self) -> Organization {
        Organization {
            id: self.id.clone(),
            name: self.name.clone(),
            email: Some(self.email.clone()),
            phone: self.phone.clone(),
            location: self.location,
            address: self.address.clone(),
        }
    }
}

/// Id, name, and email as exposed in account listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorProfileView {
    pub id: DonorId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
    pub location: Option<GeoPoint>,
    pub donation_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationProfileView {
    pub id: OrganizationId,
    pub name: String,
    pub owner_name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
    pub location: Option<GeoPoint>,
    pub donation_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DonationKind {
    Food,
    Grocery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationItem {
    pub name: String,
    pub quantity: String,
}

/// Donor-submitted offer addressed to a named organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationSubmission {
    pub donor_id: DonorId,
    pub organization: String,
    pub kind: DonationKind,
    #[serde(default)]
    pub description: String,
    pub items: Vec<DonationItem>,
    #[serde(default)]
    pub quality: Option<ImageAnalysisResult>,
}

/// A donation offer and its pickup progress, shared by donor and organization views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationOffer {
    pub order_id: OrderId,
    pub donor_id: DonorId,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: String,
    pub donor_address: String,
    pub organization_id: OrganizationId,
    pub organization_name: String,
    pub organization_phone: String,
    pub kind: DonationKind,
    pub description: String,
    pub items: Vec<DonationItem>,
    pub status: DonationStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<ImageAnalysisResult>,
}

impl DonationOffer {
    pub fn record(&self) -> DonationRecord {
        DonationRecord {
            organization: self.organization_name.clone(),
            recorded_at: self.submitted_at,
            status: self.status,
        }
    }
}

/// Organization inbox partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationFilter {
    #[default]
    Pending,
    Processed,
}

impl DonationFilter {
    pub fn matches(self, status: DonationStatus) -> bool {
        match self {
            Self::Pending => status == DonationStatus::Pending,
            Self::Processed => status != DonationStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub sender: String,
    pub receiver: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: String,
    pub receiver: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn between(&self, first: &str, second: &str) -> bool {
        (self.sender == first && self.receiver == second)
            || (self.sender == second && self.receiver == first)
    }
}

/// Proximity recommendation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearbyQuery {
    #[serde(default)]
    pub donor_id: Option<DonorId>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub donation_type: Option<String>,
}
