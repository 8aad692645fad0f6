use food_share::workflows::donations::{
    ChatMessage, DonationOffer, DonationRepository, DonorAccount, OrderId, OrganizationAccount,
    RepositoryError,
};
use food_share::workflows::matching::{DonationStatus, DonorId, OrganizationId};
use food_share::workflows::quality::ConfiguredClassifier;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) classifier: Arc<ConfiguredClassifier>,
}

#[derive(Default)]
struct Tables {
    donors: Vec<DonorAccount>,
    organizations: Vec<OrganizationAccount>,
    donations: Vec<DonationOffer>,
    messages: Vec<ChatMessage>,
}

/// Process-local store; every table keeps insertion order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDonationRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryDonationRepository {
    fn tables(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl DonationRepository for InMemoryDonationRepository {
    fn insert_donor(&self, donor: DonorAccount) -> Result<DonorAccount, RepositoryError> {
        let mut guard = self.tables()?;
        if guard
            .donors
            .iter()
            .any(|existing| existing.id == donor.id || existing.email == donor.email)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.donors.push(donor.clone());
        Ok(donor)
    }

    fn donor(&self, id: &DonorId) -> Result<Option<DonorAccount>, RepositoryError> {
        Ok(self.tables()?.donors.iter().find(|d| &d.id == id).cloned())
    }

    fn donor_by_email(&self, email: &str) -> Result<Option<DonorAccount>, RepositoryError> {
        Ok(self
            .tables()?
            .donors
            .iter()
            .find(|d| d.email == email)
            .cloned())
    }

    fn donors(&self) -> Result<Vec<DonorAccount>, RepositoryError> {
        Ok(self.tables()?.donors.clone())
    }

    fn insert_organization(
        &self,
        organization: OrganizationAccount,
    ) -> Result<OrganizationAccount, RepositoryError> {
        let mut guard = self.tables()?;
        if guard.organizations.iter().any(|existing| {
            existing.id == organization.id
                || existing.email == organization.email
                || existing.name == organization.name
        }) {
            return Err(RepositoryError::Conflict);
        }
        guard.organizations.push(organization.clone());
        Ok(organization)
    }

    fn organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<OrganizationAccount>, RepositoryError> {
        Ok(self
            .tables()?
            .organizations
            .iter()
            .find(|o| &o.id == id)
            .cloned())
    }

    fn organization_by_email(
        &self,
        email: &str,
    ) -> Result<Option<OrganizationAccount>, RepositoryError> {
        Ok(self
            .tables()?
            .organizations
            .iter()
            .find(|o| o.email == email)
            .cloned())
    }

    fn organization_by_name(
        &self,
        name: &str,
    ) -> Result<Option<OrganizationAccount>, RepositoryError> {
        Ok(self
            .tables()?
            .organizations
            .iter()
            .find(|o| o.name == name)
            .cloned())
    }

    fn organizations(&self) -> Result<Vec<OrganizationAccount>, RepositoryError> {
        Ok(self.tables()?.organizations.clone())
    }

    fn insert_donation(&self, offer: DonationOffer) -> Result<DonationOffer, RepositoryError> {
        let mut guard = self.tables()?;
        if guard
            .donations
            .iter()
            .any(|existing| existing.order_id == offer.order_id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.donations.push(offer.clone());
        Ok(offer)
    }

    fn update_donation(
        &self,
        offer: DonationOffer,
        expected: DonationStatus,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.tables()?;
        match guard
            .donations
            .iter_mut()
            .find(|existing| existing.order_id == offer.order_id)
        {
            Some(slot) if slot.status != expected => Err(RepositoryError::Conflict),
            Some(slot) => {
                *slot = offer;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn donation(&self, id: &OrderId) -> Result<Option<DonationOffer>, RepositoryError> {
        Ok(self
            .tables()?
            .donations
            .iter()
            .find(|offer| &offer.order_id == id)
            .cloned())
    }

    fn donations_by_donor(&self, id: &DonorId) -> Result<Vec<DonationOffer>, RepositoryError> {
        Ok(self
            .tables()?
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
        Ok(self
            .tables()?
            .donations
            .iter()
            .filter(|offer| &offer.organization_id == id)
            .cloned()
            .collect())
    }

    fn append_message(&self, message: ChatMessage) -> Result<ChatMessage, RepositoryError> {
        self.tables()?.messages.push(message.clone());
        Ok(message)
    }

    fn messages(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        Ok(self.tables()?.messages.clone())
    }
}
