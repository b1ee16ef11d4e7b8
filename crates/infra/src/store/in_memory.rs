//! In-memory entity store.
//!
//! Intended for tests/dev. Not optimized for performance.

use std::collections::HashMap;
use std::sync::RwLock;

use crewmarket_accounts::{Business, EmailAddress, User};
use crewmarket_core::{ApplicationId, BusinessId, JobId, UserId};
use crewmarket_jobs::{Job, JobApplication};

use super::r#trait::{MarketStore, StoreError};

#[derive(Debug, Default)]
pub struct InMemoryMarketStore {
    jobs: RwLock<HashMap<JobId, Job>>,
    applications: RwLock<HashMap<ApplicationId, JobApplication>>,
    users: RwLock<HashMap<UserId, User>>,
    businesses: RwLock<HashMap<BusinessId, Business>>,
}

impl InMemoryMarketStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn insert_new<K, V>(
    map: &RwLock<HashMap<K, V>>,
    key: K,
    value: V,
    what: &'static str,
) -> Result<(), StoreError>
where
    K: Eq + core::hash::Hash + core::fmt::Debug,
{
    let mut map = map.write().map_err(|_| StoreError::Poisoned)?;
    if map.contains_key(&key) {
        return Err(StoreError::Conflict(format!("{what} {key:?} already exists")));
    }
    map.insert(key, value);
    Ok(())
}

fn get_cloned<K, V: Clone>(
    map: &RwLock<HashMap<K, V>>,
    key: &K,
) -> Result<Option<V>, StoreError>
where
    K: Eq + core::hash::Hash,
{
    let map = map.read().map_err(|_| StoreError::Poisoned)?;
    Ok(map.get(key).cloned())
}

fn update_in_place<K, V>(
    map: &RwLock<HashMap<K, V>>,
    key: &K,
    apply: &mut dyn FnMut(&mut V),
) -> Result<bool, StoreError>
where
    K: Eq + core::hash::Hash,
{
    let mut map = map.write().map_err(|_| StoreError::Poisoned)?;
    match map.get_mut(key) {
        Some(value) => {
            apply(value);
            Ok(true)
        }
        None => Ok(false),
    }
}

impl MarketStore for InMemoryMarketStore {
    fn insert_job(&self, job: Job) -> Result<(), StoreError> {
        insert_new(&self.jobs, job.id, job, "job")
    }

    fn job(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        get_cloned(&self.jobs, &id)
    }

    fn update_job(&self, id: JobId, apply: &mut dyn FnMut(&mut Job)) -> Result<bool, StoreError> {
        update_in_place(&self.jobs, &id, apply)
    }

    fn jobs_for_business(&self, business_id: BusinessId) -> Result<Vec<Job>, StoreError> {
        let jobs = self.jobs.read().map_err(|_| StoreError::Poisoned)?;
        let mut found: Vec<Job> = jobs
            .values()
            .filter(|job| job.business_id == business_id)
            .cloned()
            .collect();
        found.sort_by_key(|job| job.id);
        Ok(found)
    }

    fn placed_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let jobs = self.jobs.read().map_err(|_| StoreError::Poisoned)?;
        let mut found: Vec<Job> = jobs
            .values()
            .filter(|job| job.active_crew().is_some())
            .cloned()
            .collect();
        found.sort_by_key(|job| job.id);
        Ok(found)
    }

    fn insert_application(&self, application: JobApplication) -> Result<(), StoreError> {
        let mut applications = self.applications.write().map_err(|_| StoreError::Poisoned)?;

        if applications.contains_key(&application.id) {
            return Err(StoreError::Conflict(format!(
                "application {:?} already exists",
                application.id
            )));
        }

        // Uniqueness of (job, user) is checked inside the same critical section
        // so concurrent duplicate applies serialize here.
        let duplicate = applications
            .values()
            .any(|existing| existing.job == application.job && existing.user == application.user);
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "application for job {:?} by user {:?} already exists",
                application.job, application.user
            )));
        }

        applications.insert(application.id, application);
        Ok(())
    }

    fn application(&self, id: ApplicationId) -> Result<Option<JobApplication>, StoreError> {
        get_cloned(&self.applications, &id)
    }

    fn application_for(
        &self,
        job: JobId,
        user: UserId,
    ) -> Result<Option<JobApplication>, StoreError> {
        let applications = self.applications.read().map_err(|_| StoreError::Poisoned)?;
        Ok(applications
            .values()
            .find(|application| application.job == job && application.user == user)
            .cloned())
    }

    fn update_application(
        &self,
        id: ApplicationId,
        apply: &mut dyn FnMut(&mut JobApplication),
    ) -> Result<bool, StoreError> {
        update_in_place(&self.applications, &id, apply)
    }

    fn delete_application(&self, id: ApplicationId) -> Result<bool, StoreError> {
        let mut applications = self.applications.write().map_err(|_| StoreError::Poisoned)?;
        Ok(applications.remove(&id).is_some())
    }

    fn insert_user(&self, user: User) -> Result<(), StoreError> {
        insert_new(&self.users, user.id, user, "user")
    }

    fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        get_cloned(&self.users, &id)
    }

    fn user_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError> {
        let users = self.users.read().map_err(|_| StoreError::Poisoned)?;
        Ok(users.values().find(|user| &user.email == email).cloned())
    }

    fn update_user(&self, id: UserId, apply: &mut dyn FnMut(&mut User)) -> Result<bool, StoreError> {
        update_in_place(&self.users, &id, apply)
    }

    fn insert_business(&self, business: Business) -> Result<(), StoreError> {
        insert_new(&self.businesses, business.id, business, "business")
    }

    fn business(&self, id: BusinessId) -> Result<Option<Business>, StoreError> {
        get_cloned(&self.businesses, &id)
    }

    fn update_business(
        &self,
        id: BusinessId,
        apply: &mut dyn FnMut(&mut Business),
    ) -> Result<bool, StoreError> {
        update_in_place(&self.businesses, &id, apply)
    }
}
