use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::credentials::{hash_password, verify_password};
use super::domain::{
    AccountSummary, ChatMessage, DonationFilter, DonationOffer, DonationSubmission,
    DonorAccount, DonorCredentials, DonorProfileView, DonorRegistration, MessageDraft, MessageId,
    NearbyQuery, OrderId, OrganizationAccount, OrganizationCredentials, OrganizationProfileView,
    OrganizationRegistration,
};
use super::repository::{DonationRepository, RepositoryError};
use crate::workflows::matching::{
    score_organizations, DonationStatus, Donor, DonorId, Organization, OrganizationId,
    ScoredOrganization, ScoringStrategy,
};

static DONOR_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ORGANIZATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ORDER_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static MESSAGE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_id(sequence: &AtomicU64, prefix: &str) -> String {
    let id = sequence.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id:06}")
}

/// Service coordinating accounts, donation offers, chat, and recommendations.
pub struct DonationService<R> {
    repository: Arc<R>,
}

impl<R> DonationService<R>
where
    R: DonationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn register_donor(
        &self,
        registration: DonorRegistration,
    ) -> Result<DonorProfileView, DonationServiceError> {
        let DonorRegistration {
            name,
            email,
            password,
            confirm_password,
            phone,
            address,
            location,
        } = registration;

        require("name", &name)?;
        require("email", &email)?;
        check_passwords(&password, &confirm_password)?;

        let email = email.trim().to_string();
        if self.repository.donor_by_email(&email)?.is_some() {
            return Err(DonationServiceError::Conflict(
                "donor already exists".to_string(),
            ));
        }

        let account = DonorAccount {
            id: DonorId(next_id(&DONOR_SEQUENCE, "donor")),
            name: name.trim().to_string(),
            email,
            phone,
            address,
            location,
            password_digest: hash_password(&password),
        };

        let stored = self.repository.insert_donor(account)?;
        info!(donor_id = %stored.id.0, "donor registered");
        Ok(stored.profile(0))
    }

    pub fn register_organization(
        &self,
        registration: OrganizationRegistration,
    ) -> Result<OrganizationProfileView, DonationServiceError> {
        let OrganizationRegistration {
            organization_name,
            organization_code,
            owner_name,
            email,
            password,
            confirm_password,
            phone,
            address,
            location,
        } = registration;

        require("organization_name", &organization_name)?;
        require("organization_code", &organization_code)?;
        require("email", &email)?;
        check_passwords(&password, &confirm_password)?;

        let email = email.trim().to_string();
        let name = organization_name.trim().to_string();
        if self.repository.organization_by_email(&email)?.is_some() {
            return Err(DonationServiceError::Conflict(
                "organization already exists".to_string(),
            ));
        }
        if self.repository.organization_by_name(&name)?.is_some() {
            return Err(DonationServiceError::Conflict(format!(
                "organization name '{name}' is already registered"
            )));
        }

        let account = OrganizationAccount {
            id: OrganizationId(next_id(&ORGANIZATION_SEQUENCE, "org")),
            name,
            organization_code: organization_code.trim().to_string(),
            owner_name,
            email,
            phone,
            address,
            location,
            password_digest: hash_password(&password),
        };

        let stored = self.repository.insert_organization(account)?;
        info!(organization_id = %stored.id.0, "organization registered");
        Ok(stored.profile(0))
    }

    pub fn authenticate_donor(
        &self,
        credentials: DonorCredentials,
    ) -> Result<DonorProfileView, DonationServiceError> {
        let account = self
            .repository
            .donor_by_email(credentials.email.trim())?
            .filter(|account| verify_password(&credentials.password, &account.password_digest))
            .ok_or(DonationServiceError::InvalidCredentials)?;

        let count = self.repository.donations_by_donor(&account.id)?.len();
        Ok(account.profile(count))
    }

    pub fn authenticate_organization(
        &self,
        credentials: OrganizationCredentials,
    ) -> Result<OrganizationProfileView, DonationServiceError> {
        let account = self
            .repository
            .organization_by_email(credentials.email.trim())?
            .filter(|account| verify_password(&credentials.password, &account.password_digest))
            .filter(|account| account.organization_code == credentials.organization_code.trim())
            .ok_or(DonationServiceError::InvalidCredentials)?;

        let count = self.repository.donations_for_organization(&account.id)?.len();
        Ok(account.profile(count))
    }

    pub fn donor_profile(&self, id: &DonorId) -> Result<DonorProfileView, DonationServiceError> {
        let account = self.donor_account(id)?;
        let count = self.repository.donations_by_donor(id)?.len();
        Ok(account.profile(count))
    }

    pub fn organization_profile(
        &self,
        id: &OrganizationId,
    ) -> Result<OrganizationProfileView, DonationServiceError> {
        let account = self.organization_account(id)?;
        let count = self.repository.donations_for_organization(id)?.len();
        Ok(account.profile(count))
    }

    pub fn list_donors(&self) -> Result<Vec<AccountSummary>, DonationServiceError> {
        Ok(self
            .repository
            .donors()?
            .iter()
            .map(DonorAccount::summary)
            .collect())
    }

    /// Organizations with address and coordinates, as used for matching.
    pub fn list_organizations(&self) -> Result<Vec<Organization>, DonationServiceError> {
        Ok(self
            .repository
            .organizations()?
            .iter()
            .map(OrganizationAccount::as_organization)
            .collect())
    }

    /// Record a new pending offer against the named organization.
    pub fn submit_donation(
        &self,
        submission: DonationSubmission,
    ) -> Result<DonationOffer, DonationServiceError> {
        if submission.items.is_empty() {
            return Err(DonationServiceError::Validation(
                "a donation must list at least one item".to_string(),
            ));
        }
        if submission
            .items
            .iter()
            .any(|item| item.name.trim().is_empty())
        {
            return Err(DonationServiceError::Validation(
                "every donated item needs a name".to_string(),
            ));
        }

        let donor = self.donor_account(&submission.donor_id)?;
        let organization = self
            .repository
            .organization_by_name(&submission.organization)?
            .ok_or_else(|| {
                DonationServiceError::NotFound(format!(
                    "organization '{}'",
                    submission.organization
                ))
            })?;

        let offer = DonationOffer {
            order_id: OrderId(next_id(&ORDER_SEQUENCE, "order")),
            donor_id: donor.id.clone(),
            donor_name: donor.name.clone(),
            donor_email: donor.email.clone(),
            donor_phone: donor.phone.clone(),
            donor_address: donor.address.joined(),
            organization_id: organization.id.clone(),
            organization_name: organization.name.clone(),
            organization_phone: organization.phone.clone(),
            kind: submission.kind,
            description: submission.description,
            items: submission.items,
            status: DonationStatus::Pending,
            submitted_at: Utc::now(),
            pickup_time: None,
            quality: submission.quality,
        };

        let stored = self.repository.insert_donation(offer)?;
        info!(
            order_id = %stored.order_id.0,
            organization_id = %stored.organization_id.0,
            "donation submitted"
        );
        Ok(stored)
    }

    /// Pending -> Accepted, recording when the organization will pick up.
    pub fn accept_donation(
        &self,
        organization_id: &OrganizationId,
        order_id: &OrderId,
        pickup_time: String,
    ) -> Result<DonationOffer, DonationServiceError> {
        if pickup_time.trim().is_empty() {
            return Err(DonationServiceError::Validation(
                "pickup_time is required".to_string(),
            ));
        }

        self.transition(organization_id, order_id, DonationStatus::Accepted, |offer| {
            offer.pickup_time = Some(pickup_time);
        })
    }

    /// Accepted -> Collected.
    pub fn collect_donation(
        &self,
        organization_id: &OrganizationId,
        order_id: &OrderId,
    ) -> Result<DonationOffer, DonationServiceError> {
        self.transition(organization_id, order_id, DonationStatus::Collected, |_| {})
    }

    pub fn organization_donations(
        &self,
        organization_id: &OrganizationId,
        filter: DonationFilter,
    ) -> Result<Vec<DonationOffer>, DonationServiceError> {
        self.organization_account(organization_id)?;
        Ok(self
            .repository
            .donations_for_organization(organization_id)?
            .into_iter()
            .filter(|offer| filter.matches(offer.status))
            .collect())
    }

    pub fn donor_history(
        &self,
        donor_id: &DonorId,
    ) -> Result<Vec<DonationOffer>, DonationServiceError> {
        self.donor_account(donor_id)?;
        Ok(self.repository.donations_by_donor(donor_id)?)
    }

    pub fn send_message(&self, draft: MessageDraft) -> Result<ChatMessage, DonationServiceError> {
        require("sender", &draft.sender)?;
        require("receiver", &draft.receiver)?;
        require("content", &draft.content)?;

        let message = ChatMessage {
            id: MessageId(next_id(&MESSAGE_SEQUENCE, "msg")),
            sender: draft.sender,
            receiver: draft.receiver,
            content: draft.content,
            sent_at: Utc::now(),
        };
        Ok(self.repository.append_message(message)?)
    }

    /// Messages exchanged between two participants in either direction, oldest first.
    pub fn conversation(
        &self,
        first: &str,
        second: &str,
    ) -> Result<Vec<ChatMessage>, DonationServiceError> {
        require("user1", first)?;
        require("user2", second)?;

        let mut messages: Vec<ChatMessage> = self
            .repository
            .messages()?
            .into_iter()
            .filter(|message| message.between(first, second))
            .collect();
        messages.sort_by_key(|message| message.sent_at);
        Ok(messages)
    }

    /// History and city/district ranking for a registered donor.
    pub fn recommend_for_donor(
        &self,
        donor_id: &DonorId,
    ) -> Result<Vec<ScoredOrganization>, DonationServiceError> {
        let account = self.donor_account(donor_id)?;
        let donor = self.matching_subject(&account)?;
        let organizations = self.list_organizations()?;
        Ok(score_organizations(
            &donor,
            &organizations,
            &ScoringStrategy::Locality,
        ))
    }

    /// Distance, history, and donation-type ranking.
    ///
    /// Without an explicit location the donor's registered coordinate is used, if any.
    pub fn recommend_nearby(
        &self,
        query: NearbyQuery,
    ) -> Result<Vec<ScoredOrganization>, DonationServiceError> {
        let NearbyQuery {
            donor_id,
            location,
            donation_type,
        } = query;

        let (donor, location) = match donor_id {
            Some(id) => {
                let account = self.donor_account(&id)?;
                let location = location.or(account.location);
                (self.matching_subject(&account)?, location)
            }
            None => (Donor::default(), location),
        };

        let organizations = self.list_organizations()?;
        let strategy = ScoringStrategy::proximity(location, donation_type);
        Ok(score_organizations(&donor, &organizations, &strategy))
    }

    fn matching_subject(&self, account: &DonorAccount) -> Result<Donor, DonationServiceError> {
        let history = self
            .repository
            .donations_by_donor(&account.id)?
            .iter()
            .map(DonationOffer::record)
            .collect();
        Ok(account.as_donor(history))
    }

    fn transition<F>(
        &self,
        organization_id: &OrganizationId,
        order_id: &OrderId,
        target: DonationStatus,
        apply: F,
    ) -> Result<DonationOffer, DonationServiceError>
    where
        F: FnOnce(&mut DonationOffer),
    {
        let mut offer = self
            .repository
            .donation(order_id)?
            .filter(|offer| &offer.organization_id == organization_id)
            .ok_or_else(|| DonationServiceError::NotFound(format!("donation '{}'", order_id.0)))?;

        let allowed = matches!(
            (offer.status, target),
            (DonationStatus::Pending, DonationStatus::Accepted)
                | (DonationStatus::Accepted, DonationStatus::Collected)
        );
        if !allowed {
            return Err(DonationServiceError::InvalidTransition {
                order_id: order_id.0.clone(),
                from: offer.status.label(),
                to: target.label(),
            });
        }

        let from = offer.status;
        offer.status = target;
        apply(&mut offer);
        // A concurrent transition may have moved the offer since it was read.
        self.repository
            .update_donation(offer.clone(), from)
            .map_err(|err| match err {
                RepositoryError::Conflict => {
                    let current = self
                        .repository
                        .donation(order_id)
                        .ok()
                        .flatten()
                        .map_or(from, |stored| stored.status);
                    DonationServiceError::InvalidTransition {
                        order_id: order_id.0.clone(),
                        from: current.label(),
                        to: target.label(),
                    }
                }
                other => other.into(),
            })?;

        info!(
            order_id = %offer.order_id.0,
            status = offer.status.label(),
            "donation status updated"
        );
        Ok(offer)
    }

    fn donor_account(&self, id: &DonorId) -> Result<DonorAccount, DonationServiceError> {
        self.repository
            .donor(id)?
            .ok_or_else(|| DonationServiceError::NotFound(format!("donor '{}'", id.0)))
    }

    fn organization_account(
        &self,
        id: &OrganizationId,
    ) -> Result<OrganizationAccount, DonationServiceError> {
        self.repository
            .organization(id)?
            .ok_or_else(|| DonationServiceError::NotFound(format!("organization '{}'", id.0)))
    }
}

fn require(field: &str, value: &str) -> Result<(), DonationServiceError> {
    if value.trim().is_empty() {
        Err(DonationServiceError::Validation(format!(
            "{field} is required"
        )))
    } else {
        Ok(())
    }
}

fn check_passwords(password: &str, confirm: &str) -> Result<(), DonationServiceError> {
    if password.is_empty() {
        return Err(DonationServiceError::Validation(
            "password is required".to_string(),
        ));
    }
    if password != confirm {
        return Err(DonationServiceError::Validation(
            "passwords do not match".to_string(),
        ));
    }
    Ok(())
}

/// Error raised by the donation service.
#[derive(Debug, thiserror::Error)]
pub enum DonationServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("donation {order_id} is {from} and cannot become {to}")]
    InvalidTransition {
        order_id: String,
        from: &'static str,
        to: &'static str,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
