//! Business entity and its denormalized `business_jobs` set.

use serde::{Deserialize, Serialize};

use crewmarket_core::{refs, BusinessId, Entity, JobId};

use crate::email::EmailAddress;

/// Denormalized job references kept on a business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessJobs {
    /// Jobs this business has offered to someone.
    pub offered_jobs: Vec<JobId>,
}

/// Business entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    /// Where transition notifications for this business land.
    pub contact_email: EmailAddress,
    pub business_jobs: BusinessJobs,
}

impl Business {
    pub fn new(id: BusinessId, name: impl Into<String>, contact_email: EmailAddress) -> Self {
        Self {
            id,
            name: name.into(),
            contact_email,
            business_jobs: BusinessJobs::default(),
        }
    }

    /// Record an outstanding offer. Idempotent; returns whether anything changed.
    pub fn record_offer(&mut self, id: JobId) -> bool {
        refs::insert_unique(&mut self.business_jobs.offered_jobs, id)
    }

    pub fn remove_offer(&mut self, id: JobId) -> bool {
        refs::remove_value(&mut self.business_jobs.offered_jobs, &id)
    }
}

impl Entity for Business {
    type Id = BusinessId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
