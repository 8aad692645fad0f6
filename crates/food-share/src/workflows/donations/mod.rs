//! Donor and organization accounts, donation offers, and pickup chat.
//!
//! Offers move `pending -> accepted -> collected`; each transition is owned by the
//! receiving organization. Recommendations combine stored accounts with the matching
//! scorer so a donor's past offers feed the history factor.

mod credentials;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AccountSummary, ChatMessage, DonationFilter, DonationItem, DonationKind, DonationOffer,
    DonationSubmission, DonorAccount, DonorCredentials, DonorProfileView, DonorRegistration,
    MessageDraft, MessageId, NearbyQuery, OrderId, OrganizationAccount, OrganizationCredentials,
    OrganizationProfileView, OrganizationRegistration,
};
pub use repository::{DonationRepository, RepositoryError};
pub use router::donation_router;
pub use service::{DonationService, DonationServiceError};
