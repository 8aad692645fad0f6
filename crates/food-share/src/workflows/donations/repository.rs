use super::domain::{ChatMessage, DonationOffer, DonorAccount, OrderId, OrganizationAccount};
use crate::workflows::matching::{DonationStatus, DonorId, OrganizationId};

/// Storage abstraction for accounts, donation offers, and chat messages.
pub trait DonationRepository: Send + Sync {
    fn insert_donor(&self, donor: DonorAccount) -> Result<DonorAccount, RepositoryError>;
    fn donor(&self, id: &DonorId) -> Result<Option<DonorAccount>, RepositoryError>;
    fn donor_by_email(&self, email: &str) -> Result<Option<DonorAccount>, RepositoryError>;
    fn donors(&self) -> Result<Vec<DonorAccount>, RepositoryError>;

    fn insert_organization(
        &self,
        organization: OrganizationAccount,
    ) -> Result<OrganizationAccount, RepositoryError>;
    fn organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<OrganizationAccount>, RepositoryError>;
    fn organization_by_email(
        &self,
        email: &str,
    ) -> Result<Option<OrganizationAccount>, RepositoryError>;
    fn organization_by_name(
        &self,
        name: &str,
    ) -> Result<Option<OrganizationAccount>, RepositoryError>;
    /// All organizations in registration order.
    fn organizations(&self) -> Result<Vec<OrganizationAccount>, RepositoryError>;

    fn insert_donation(&self, offer: DonationOffer) -> Result<DonationOffer, RepositoryError>;
    /// Replaces the stored offer only while its status is still `expected`;
    /// otherwise `Conflict`. The check and the write happen under one lock.
    fn update_donation(
        &self,
        offer: DonationOffer,
        expected: DonationStatus,
    ) -> Result<(), RepositoryError>;
    fn donation(&self, id: &OrderId) -> Result<Option<DonationOffer>, RepositoryError>;
    /// Offers in submission order.
    fn donations_by_donor(&self, id: &DonorId) -> Result<Vec<DonationOffer>, RepositoryError>;
    /// Offers in submission order.
    fn donations_for_organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Vec<DonationOffer>, RepositoryError>;

    fn append_message(&self, message: ChatMessage) -> Result<ChatMessage, RepositoryError>;
    /// Messages in insertion order.
    fn messages(&self) -> Result<Vec<ChatMessage>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
