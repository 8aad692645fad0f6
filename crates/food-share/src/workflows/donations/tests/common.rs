use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::donations::domain::{
    ChatMessage, DonationItem, DonationKind, DonationOffer, DonationSubmission, DonorAccount,
    DonorProfileView, DonorRegistration, OrderId, OrganizationAccount, OrganizationProfileView,
    OrganizationRegistration,
};
use crate::workflows::donations::repository::{DonationRepository, RepositoryError};
use crate::workflows::donations::{donation_router, DonationService};
use crate::workflows::matching::{Address, DonationStatus, DonorId, GeoPoint, OrganizationId};

#[derive(Default)]
struct Tables {
    donors: Vec<DonorAccount>,
    organizations: Vec<OrganizationAccount>,
    donations: Vec<DonationOffer>,
    messages: Vec<ChatMessage>,
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryRepository {
    pub(super) fn donation_count(&self) -> usize {
        self.tables
            .lock()
            .expect("repository mutex poisoned")
            .donations
            .len()
    }
}

impl DonationRepository for MemoryRepository {
    fn insert_donor(&self, donor: DonorAccount) -> Result<DonorAccount, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        if guard.donors.iter().any(|existing| existing.id == donor.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.donors.push(donor.clone());
        Ok(donor)
    }

    fn donor(&self, id: &DonorId) -> Result<Option<DonorAccount>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.donors.iter().find(|donor| &donor.id == id).cloned())
    }

    fn donor_by_email(&self, email: &str) -> Result<Option<DonorAccount>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.donors.iter().find(|donor| donor.email == email).cloned())
    }

    fn donors(&self) -> Result<Vec<DonorAccount>, RepositoryError> {
        Ok(self
            .tables
            .lock()
            .expect("repository mutex poisoned")
            .donors
            .clone())
    }

    fn insert_organization(
        &self,
        organization: OrganizationAccount,
    ) -> Result<OrganizationAccount, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        if guard
            .organizations
            .iter()
            .any(|existing| existing.id == organization.id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.organizations.push(organization.clone());
        Ok(organization)
    }

    fn organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<OrganizationAccount>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.organizations.iter().find(|org| &org.id == id).cloned())
    }

    fn organization_by_email(
        &self,
        email: &str,
    ) -> Result<Option<OrganizationAccount>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard
            .organizations
            .iter()
            .find(|org| org.email == email)
            .cloned())
    }

    fn organization_by_name(
        &self,
        name: &str,
    ) -> Result<Option<OrganizationAccount>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard
            .organizations
            .iter()
            .find(|org| org.name == name)
            .cloned())
    }

    fn organizations(&self) -> Result<Vec<OrganizationAccount>, RepositoryError> {
        Ok(self
            .tables
            .lock()
            .expect("repository mutex poisoned")
            .organizations
            .clone())
    }

    fn insert_donation(&self, offer: DonationOffer) -> Result<DonationOffer, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        guard.donations.push(offer.clone());
        Ok(offer)
    }

    fn update_donation(
        &self,
        offer: DonationOffer,
        expected: DonationStatus,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        let slot = guard
            .donations
            .iter_mut()
            .find(|existing| existing.order_id == offer.order_id)
            .ok_or(RepositoryError::NotFound)?;
        if slot.status != expected {
            return Err(RepositoryError::Conflict);
        }
        *slot = offer;
        Ok(())
    }

    fn donation(&self, id: &OrderId) -> Result<Option<DonationOffer>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard
            .donations
            .iter()
            .find(|offer| &offer.order_id == id)
            .cloned())
    }

    fn donations_by_donor(&self, id: &DonorId) -> Result<Vec<DonationOffer>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard
            .donations
            .iter()
            .filter(|offer| &offer.donor_id == id)
            .cloned()
            .collect())
    }

    fn donations_for_organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Vec<DonationOffer>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard
            .donations
            .iter()
            .filter(|offer| &offer.organization_id == id)
            .cloned()
            .collect())
    }

    fn append_message(&self, message: ChatMessage) -> Result<ChatMessage, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        guard.messages.push(message.clone());
        Ok(message)
    }

    fn messages(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        Ok(self
            .tables
            .lock()
            .expect("repository mutex poisoned")
            .messages
            .clone())
    }
}

pub(super) struct UnavailableRepository;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl DonationRepository for UnavailableRepository {
    fn insert_donor(&self, _donor: DonorAccount) -> Result<DonorAccount, RepositoryError> {
        offline()
    }

    fn donor(&self, _id: &DonorId) -> Result<Option<DonorAccount>, RepositoryError> {
        offline()
    }

    fn donor_by_email(&self, _email: &str) -> Result<Option<DonorAccount>, RepositoryError> {
        offline()
    }

    fn donors(&self) -> Result<Vec<DonorAccount>, RepositoryError> {
        offline()
    }

    fn insert_organization(
        &self,
        _organization: OrganizationAccount,
    ) -> Result<OrganizationAccount, RepositoryError> {
        offline()
    }

    fn organization(
        &self,
        _id: &OrganizationId,
    ) -> Result<Option<OrganizationAccount>, RepositoryError> {
        offline()
    }

    fn organization_by_email(
        &self,
        _email: &str,
    ) -> Result<Option<OrganizationAccount>, RepositoryError> {
        offline()
    }

    fn organization_by_name(
        &self,
        _name: &str,
    ) -> Result<Option<OrganizationAccount>, RepositoryError> {
        offline()
    }

    fn organizations(&self) -> Result<Vec<OrganizationAccount>, RepositoryError> {
        offline()
    }

    fn insert_donation(&self, _offer: DonationOffer) -> Result<DonationOffer, RepositoryError> {
        offline()
    }

    fn update_donation(
        &self,
        _offer: DonationOffer,
        _expected: DonationStatus,
    ) -> Result<(), RepositoryError> {
        offline()
    }

    fn donation(&self, _id: &OrderId) -> Result<Option<DonationOffer>, RepositoryError> {
        offline()
    }

    fn donations_by_donor(&self, _id: &DonorId) -> Result<Vec<DonationOffer>, RepositoryError> {
        offline()
    }

    fn donations_for_organization(
        &self,
        _id: &OrganizationId,
    ) -> Result<Vec<DonationOffer>, RepositoryError> {
        offline()
    }

    fn append_message(&self, _message: ChatMessage) -> Result<ChatMessage, RepositoryError> {
        offline()
    }

    fn messages(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        offline()
    }
}

/// Delegates to a `MemoryRepository`, but once armed holds the next `parties`
/// offer lookups at a barrier so they all read the same snapshot. Donor lookups
/// are counted.
pub(super) struct GatedRepository {
    inner: MemoryRepository,
    barrier: Barrier,
    remaining: AtomicUsize,
    parties: usize,
    donor_lookups: AtomicUsize,
}

impl GatedRepository {
    pub(super) fn new(parties: usize) -> Self {
        Self {
            inner: MemoryRepository::default(),
            barrier: Barrier::new(parties),
            remaining: AtomicUsize::new(0),
            parties,
            donor_lookups: AtomicUsize::new(0),
        }
    }

    pub(super) fn take_donor_lookups(&self) -> usize {
        self.donor_lookups.swap(0, Ordering::SeqCst)
    }

    pub(super) fn arm(&self) {
        self.remaining.store(self.parties, Ordering::SeqCst);
    }
}

impl DonationRepository for GatedRepository {
    fn insert_donor(&self, donor: DonorAccount) -> Result<DonorAccount, RepositoryError> {
        self.inner.insert_donor(donor)
    }

    fn donor(&self, id: &DonorId) -> Result<Option<DonorAccount>, RepositoryError> {
        self.donor_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.donor(id)
    }

    fn donor_by_email(&self, email: &str) -> Result<Option<DonorAccount>, RepositoryError> {
        self.inner.donor_by_email(email)
    }

    fn donors(&self) -> Result<Vec<DonorAccount>, RepositoryError> {
        self.inner.donors()
    }

    fn insert_organization(
        &self,
        organization: OrganizationAccount,
    ) -> Result<OrganizationAccount, RepositoryError> {
        self.inner.insert_organization(organization)
    }

    fn organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<OrganizationAccount>, RepositoryError> {
        self.inner.organization(id)
    }

    fn organization_by_email(
        &self,
        email: &str,
    ) -> Result<Option<OrganizationAccount>, RepositoryError> {
        self.inner.organization_by_email(email)
    }

    fn organization_by_name(
        &self,
        name: &str,
    ) -> Result<Option<OrganizationAccount>, RepositoryError> {
        self.inner.organization_by_name(name)
    }

    fn organizations(&self) -> Result<Vec<OrganizationAccount>, RepositoryError> {
        self.inner.organizations()
    }

    fn insert_donation(&self, offer: DonationOffer) -> Result<DonationOffer, RepositoryError> {
        self.inner.insert_donation(offer)
    }

    fn update_donation(
        &self,
        offer: DonationOffer,
        expected: DonationStatus,
    ) -> Result<(), RepositoryError> {
        self.inner.update_donation(offer, expected)
    }

    fn donation(&self, id: &OrderId) -> Result<Option<DonationOffer>, RepositoryError> {
        let snapshot = self.inner.donation(id);
        let gated = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if gated {
            self.barrier.wait();
        }
        snapshot
    }

    fn donations_by_donor(&self, id: &DonorId) -> Result<Vec<DonationOffer>, RepositoryError> {
        self.inner.donations_by_donor(id)
    }

    fn donations_for_organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Vec<DonationOffer>, RepositoryError> {
        self.inner.donations_for_organization(id)
    }

    fn append_message(&self, message: ChatMessage) -> Result<ChatMessage, RepositoryError> {
        self.inner.append_message(message)
    }

    fn messages(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.inner.messages()
    }
}

pub(super) fn build_service() -> (DonationService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = DonationService::new(repository.clone());
    (service, repository)
}

pub(super) fn chennai_address(district: &str) -> Address {
    Address {
        street: "12 Anna Salai".to_string(),
        city: "Chennai".to_string(),
        district: district.to_string(),
        state: "Tamil Nadu".to_string(),
        pincode: "600002".to_string(),
    }
}

pub(super) fn donor_registration(email: &str) -> DonorRegistration {
    DonorRegistration {
        name: "Priya Raman".to_string(),
        email: email.to_string(),
        password: "hunter22".to_string(),
        confirm_password: "hunter22".to_string(),
        phone: "9840012345".to_string(),
        address: chennai_address("Chennai Central"),
        location: Some(GeoPoint::new(13.0827, 80.2707)),
    }
}

pub(super) fn organization_registration(name: &str, email: &str) -> OrganizationRegistration {
    OrganizationRegistration {
        organization_name: name.to_string(),
        organization_code: "ORG-42".to_string(),
        owner_name: "Karthik".to_string(),
        email: email.to_string(),
        password: "feedmore".to_string(),
        confirm_password: "feedmore".to_string(),
        phone: "04428510000".to_string(),
        address: chennai_address("Chennai Central"),
        location: Some(GeoPoint::new(13.0900, 80.2800)),
    }
}

pub(super) fn register_pair(
    service: &DonationService<MemoryRepository>,
) -> (DonorProfileView, OrganizationProfileView) {
    let donor = service
        .register_donor(donor_registration("priya@example.org"))
        .expect("donor registers");
    let organization = service
        .register_organization(organization_registration(
            "Hope Shelter",
            "hope@example.org",
        ))
        .expect("organization registers");
    (donor, organization)
}

pub(super) fn submission(donor_id: &DonorId, organization: &str) -> DonationSubmission {
    DonationSubmission {
        donor_id: donor_id.clone(),
        organization: organization.to_string(),
        kind: DonationKind::Food,
        description: "Leftover lunch from a wedding".to_string(),
        items: vec![DonationItem {
            name: "Vegetable biryani".to_string(),
            quantity: "40 plates".to_string(),
        }],
        quality: None,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: DonationService<MemoryRepository>) -> axum::Router {
    donation_router(Arc::new(service))
}
