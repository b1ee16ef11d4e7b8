//! User entity: identity, roles, and the denormalized `user_jobs` sets.

use serde::{Deserialize, Serialize};

use crewmarket_core::{refs, ApplicationId, BusinessId, Entity, JobId, UserId};

use crate::email::EmailAddress;

/// Marketplace role held by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can apply to, save, and hold jobs.
    Crew,
    /// Acts on behalf of a business (posting jobs, offering, accepting).
    Business,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Crew => "crew",
            Role::Business => "business",
        }
    }
}

/// The four independent denormalized job-reference sets kept on a user.
///
/// Each set is derived data: the authoritative record is the `JobApplication`
/// (for `applications`) or the `Job`'s placement (for `offered_jobs` /
/// `active_jobs`). Readers trust the authoritative field when they disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserJobs {
    /// Applications this user submitted.
    pub applications: Vec<ApplicationId>,
    /// Bookmarked jobs.
    pub saved_jobs: Vec<JobId>,
    /// Jobs proposed to this user by a business.
    pub offered_jobs: Vec<JobId>,
    /// Jobs this user currently holds. The container is multi-valued but
    /// acceptance replaces the whole set, so in practice it holds at most one.
    pub active_jobs: Vec<JobId>,
}

/// User entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: EmailAddress,
    pub roles: Vec<Role>,
    pub user_jobs: UserJobs,
    /// Owning business when this user acts on behalf of one.
    pub business: Option<BusinessId>,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>, email: EmailAddress) -> Self {
        Self {
            id,
            username: username.into(),
            email,
            roles: Vec::new(),
            user_jobs: UserJobs::default(),
            business: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        refs::insert_unique(&mut self.roles, role);
        self
    }

    pub fn with_business(mut self, business: BusinessId) -> Self {
        self.business = Some(business);
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_crew(&self) -> bool {
        self.has_role(Role::Crew)
    }

    /// Record a submitted application. Idempotent; returns whether anything changed.
    pub fn record_application(&mut self, id: ApplicationId) -> bool {
        refs::insert_unique(&mut self.user_jobs.applications, id)
    }

    pub fn remove_application(&mut self, id: ApplicationId) -> bool {
        refs::remove_value(&mut self.user_jobs.applications, &id)
    }

    pub fn save_job(&mut self, id: JobId) -> bool {
        refs::insert_unique(&mut self.user_jobs.saved_jobs, id)
    }

    pub fn unsave_job(&mut self, id: JobId) -> bool {
        refs::remove_value(&mut self.user_jobs.saved_jobs, &id)
    }

    pub fn record_offer(&mut self, id: JobId) -> bool {
        refs::insert_unique(&mut self.user_jobs.offered_jobs, id)
    }

    pub fn remove_offer(&mut self, id: JobId) -> bool {
        refs::remove_value(&mut self.user_jobs.offered_jobs, &id)
    }

    /// Make `id` the user's only active job (replaces, not appends).
    /// Returns whether anything changed.
    pub fn set_active_job(&mut self, id: JobId) -> bool {
        if self.user_jobs.active_jobs == [id] {
            return false;
        }
        self.user_jobs.active_jobs = vec![id];
        true
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
