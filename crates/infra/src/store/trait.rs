//! Entity store contract.
//!
//! The store offers per-record atomic get/insert/update/delete and **no
//! cross-record transaction**; multi-entity consistency is the reference
//! synchronizer's job. `update_*` runs the supplied closure under the store's
//! write exclusion, which is the per-document atomic read-modify-write the rest
//! of the system relies on.

use thiserror::Error;

use crewmarket_accounts::{Business, EmailAddress, User};
use crewmarket_core::{ApplicationId, BusinessId, JobId, UserId};
use crewmarket_jobs::{Job, JobApplication};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Uniqueness violation (duplicate id, duplicate (job, user) application).
    #[error("store conflict: {0}")]
    Conflict(String),

    /// Internal lock poisoning.
    #[error("store lock poisoned")]
    Poisoned,

    /// Backend-specific failure.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Persistence for Job, JobApplication, User and Business records.
///
/// `update_*` methods return whether the record was found; a missing record is
/// not an error at this layer (callers decide whether absence matters).
pub trait MarketStore: Send + Sync {
    // ── jobs ────────────────────────────────────────────────────────────────
    fn insert_job(&self, job: Job) -> Result<(), StoreError>;
    fn job(&self, id: JobId) -> Result<Option<Job>, StoreError>;
    fn update_job(&self, id: JobId, apply: &mut dyn FnMut(&mut Job)) -> Result<bool, StoreError>;
    fn jobs_for_business(&self, business_id: BusinessId) -> Result<Vec<Job>, StoreError>;
    /// Jobs whose placement axis is `Placed`.
    fn placed_jobs(&self) -> Result<Vec<Job>, StoreError>;

    // ── applications ────────────────────────────────────────────────────────
    /// Insert a new application record.
    ///
    /// Enforces at most one application per `(job, user)` pair inside the
    /// store's critical section; concurrent duplicate applies serialize here
    /// rather than through application-level locking.
    fn insert_application(&self, application: JobApplication) -> Result<(), StoreError>;
    fn application(&self, id: ApplicationId) -> Result<Option<JobApplication>, StoreError>;
    fn application_for(
        &self,
        job: JobId,
        user: UserId,
    ) -> Result<Option<JobApplication>, StoreError>;
    fn update_application(
        &self,
        id: ApplicationId,
        apply: &mut dyn FnMut(&mut JobApplication),
    ) -> Result<bool, StoreError>;
    /// Delete the record. Returns whether it existed; deleting an absent record
    /// is a no-op, not an error.
    fn delete_application(&self, id: ApplicationId) -> Result<bool, StoreError>;

    // ── users ───────────────────────────────────────────────────────────────
    fn insert_user(&self, user: User) -> Result<(), StoreError>;
    fn user(&self, id: UserId) -> Result<Option<User>, StoreError>;
    fn user_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError>;
    fn update_user(&self, id: UserId, apply: &mut dyn FnMut(&mut User)) -> Result<bool, StoreError>;

    // ── businesses ──────────────────────────────────────────────────────────
    fn insert_business(&self, business: Business) -> Result<(), StoreError>;
    fn business(&self, id: BusinessId) -> Result<Option<Business>, StoreError>;
    fn update_business(
        &self,
        id: BusinessId,
        apply: &mut dyn FnMut(&mut Business),
    ) -> Result<bool, StoreError>;
}
