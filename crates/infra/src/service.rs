//! Marketplace transition service (application-level orchestration).
//!
//! Every operation follows the same pipeline:
//!
//! 1. Resolve and authorize the actor (fails closed).
//! 2. Validate the requested transition against the authoritative records
//!    (state machine + duplicate detection); no mutation has happened yet, so
//!    `NotFound`/`Conflict`/`Forbidden` here leave no partial state.
//! 3. Hand the ordered update list to the reference synchronizer.
//! 4. Fire the best-effort notification and report its fate alongside the
//!    result, never instead of it.
//!
//! Detectable partial states from an earlier interrupted run (authoritative
//! record present, derived reference missing) are resumed rather than reported
//! as duplicates, so retrying a stalled transition converges.

use chrono::Utc;
use thiserror::Error;

use crewmarket_accounts::{Business, EmailAddress, Role, User};
use crewmarket_auth::{
    require_applicant, require_business_actor, require_business_member, require_crew,
    resolve_actor, AccessError,
};
use crewmarket_core::{ApplicationId, BusinessId, DomainError, JobId, UserId};
use crewmarket_jobs::{Job, JobApplication};
use crewmarket_notify::{DeliveryStatus, Dispatcher, EmailMessage};

use crate::store::{MarketStore, StoreError};
use crate::sync::{PartialFailure, Synchronizer};

/// Unified error surface for lifecycle transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A multi-step update stalled partway; retrying the same call converges.
    #[error(transparent)]
    Partial(#[from] PartialFailure),

    /// Store failure on the read path, before any mutation.
    #[error("store failure: {0}")]
    Store(StoreError),
}

impl From<DomainError> for TransitionError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => TransitionError::Validation(msg),
            DomainError::InvalidId(msg) => TransitionError::Validation(msg),
            DomainError::NotFound(what) => TransitionError::NotFound(what),
            DomainError::Conflict(msg) => TransitionError::Conflict(msg),
            DomainError::Forbidden(msg) => TransitionError::Forbidden(msg),
        }
    }
}

impl From<AccessError> for TransitionError {
    fn from(value: AccessError) -> Self {
        match value {
            AccessError::Forbidden(msg) => TransitionError::Forbidden(msg),
        }
    }
}

impl From<StoreError> for TransitionError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(msg) => TransitionError::Conflict(msg),
            other => TransitionError::Store(other),
        }
    }
}

/// A committed transition plus the fate of its best-effort notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub delivery: DeliveryStatus,
}

/// Registration input for a user account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: EmailAddress,
    pub roles: Vec<Role>,
    pub business: Option<BusinessId>,
}

/// Registration input for a business.
#[derive(Debug, Clone)]
pub struct NewBusiness {
    pub name: String,
    pub contact_email: EmailAddress,
}

/// Input for posting a job.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub business_id: BusinessId,
    pub title: String,
    pub job_function: String,
}

/// Flattened application row for a business's review dashboard.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BusinessApplicationRow {
    pub application_id: ApplicationId,
    pub job_id: JobId,
    pub user_id: UserId,
    pub job_title: String,
    pub job_function: String,
    pub date: chrono::DateTime<Utc>,
    pub user: ApplicantSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ApplicantSummary {
    pub username: String,
    pub email: EmailAddress,
}

/// Summary of a crew member currently placed on a job.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CrewSummary {
    pub user_id: UserId,
    pub username: String,
    pub email: EmailAddress,
}

/// The marketplace transition service.
pub struct Marketplace<S> {
    store: S,
    notifier: Dispatcher,
}

impl<S: MarketStore> Marketplace<S> {
    pub fn new(store: S, notifier: Dispatcher) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn sync(&self) -> Synchronizer<'_, S> {
        Synchronizer::new(&self.store)
    }

    // ── resolution helpers ──────────────────────────────────────────────────

    /// Resolve the acting user; an unknown actor is an authorization failure.
    fn actor(&self, id: UserId) -> Result<User, TransitionError> {
        let user = self.store.user(id)?;
        Ok(resolve_actor(user)?)
    }

    fn job(&self, id: JobId) -> Result<Job, TransitionError> {
        self.store.job(id)?.ok_or(TransitionError::NotFound("job"))
    }

    fn application(&self, id: ApplicationId) -> Result<JobApplication, TransitionError> {
        self.store
            .application(id)?
            .ok_or(TransitionError::NotFound("job application"))
    }

    fn user(&self, id: UserId) -> Result<User, TransitionError> {
        self.store.user(id)?.ok_or(TransitionError::NotFound("user"))
    }

    fn business(&self, id: BusinessId) -> Result<Business, TransitionError> {
        self.store
            .business(id)?
            .ok_or(TransitionError::NotFound("business"))
    }

    // ── registration ────────────────────────────────────────────────────────

    pub fn register_user(&self, new: NewUser) -> Result<User, TransitionError> {
        if new.username.trim().is_empty() {
            return Err(TransitionError::Validation("username is required".to_string()));
        }
        if self.store.user_by_email(&new.email)?.is_some() {
            return Err(TransitionError::Conflict("email already registered".to_string()));
        }

        let mut user = User::new(UserId::new(), new.username, new.email);
        for role in new.roles {
            user = user.with_role(role);
        }
        if let Some(business_id) = new.business {
            self.business(business_id)?;
            user = user.with_business(business_id);
        }

        self.store.insert_user(user.clone())?;
        Ok(user)
    }

    pub fn register_business(&self, new: NewBusiness) -> Result<Business, TransitionError> {
        if new.name.trim().is_empty() {
            return Err(TransitionError::Validation("business name is required".to_string()));
        }
        let business = Business::new(BusinessId::new(), new.name, new.contact_email);
        self.store.insert_business(business.clone())?;
        Ok(business)
    }

    pub fn post_job(&self, actor_id: UserId, new: NewJob) -> Result<Job, TransitionError> {
        let actor = self.actor(actor_id)?;
        let business = self.business(new.business_id)?;
        require_business_member(&actor, &business)?;

        if new.title.trim().is_empty() {
            return Err(TransitionError::Validation("job title is required".to_string()));
        }

        let job = Job::new(JobId::new(), business.id, new.title, new.job_function);
        self.store.insert_job(job.clone())?;
        Ok(job)
    }

    // ── crew transitions ────────────────────────────────────────────────────

    /// Apply to a job.
    ///
    /// A fully-linked prior application is a duplicate (`Conflict`); a
    /// partially-linked one (interrupted earlier run) is resumed.
    pub fn apply_to_job(
        &self,
        job_id: JobId,
        actor_id: UserId,
    ) -> Result<Outcome<JobApplication>, TransitionError> {
        let actor = self.actor(actor_id)?;
        let job = self.job(job_id)?;
        let business = self.business(job.business_id)?;

        if let Some(existing) = self.store.application_for(job_id, actor.id)? {
            let fully_linked = job.applications.contains(&existing.id)
                && actor.user_jobs.applications.contains(&existing.id);
            if fully_linked {
                return Err(TransitionError::Conflict(
                    "you have already applied for this job".to_string(),
                ));
            }

            tracing::info!(
                application = %existing.id,
                job = %job_id,
                user = %actor.id,
                "resuming partially-linked application"
            );
            self.sync().apply(&existing, false)?;
            let delivery = self
                .notifier
                .dispatch(EmailMessage::application_submitted(&job, &actor, &business));
            return Ok(Outcome { value: existing, delivery });
        }

        let application = JobApplication::new(ApplicationId::new(), job_id, actor.id, Utc::now());
        match self.sync().apply(&application, true) {
            Ok(()) => {}
            // A concurrent apply won the store's uniqueness race before our
            // first step committed; nothing of ours is durable.
            Err(partial)
                if partial.committed.is_empty()
                    && matches!(partial.source, StoreError::Conflict(_)) =>
            {
                return Err(TransitionError::Conflict(
                    "you have already applied for this job".to_string(),
                ));
            }
            Err(partial) => return Err(partial.into()),
        }

        let delivery = self
            .notifier
            .dispatch(EmailMessage::application_submitted(&job, &actor, &business));
        Ok(Outcome { value: application, delivery })
    }

    pub fn my_applications(&self, actor_id: UserId) -> Result<Vec<JobApplication>, TransitionError> {
        let actor = self.actor(actor_id)?;
        let mut applications = Vec::with_capacity(actor.user_jobs.applications.len());
        for id in &actor.user_jobs.applications {
            match self.store.application(*id)? {
                Some(application) => applications.push(application),
                // Read-time filter: a reference that no longer resolves is
                // dropped rather than surfaced.
                None => tracing::debug!(application = %id, "dropping dangling application reference"),
            }
        }
        Ok(applications)
    }

    pub fn application_by_id(
        &self,
        actor_id: UserId,
        application_id: ApplicationId,
    ) -> Result<JobApplication, TransitionError> {
        let actor = self.actor(actor_id)?;
        let application = self.application(application_id)?;
        require_applicant(actor.id, &application)?;
        Ok(application)
    }

    pub fn withdraw_application(
        &self,
        application_id: ApplicationId,
        actor_id: UserId,
    ) -> Result<(), TransitionError> {
        let actor = self.actor(actor_id)?;
        let application = self.application(application_id)?;
        require_applicant(actor.id, &application)?;

        self.sync().remove_application("withdraw", &application)?;
        Ok(())
    }

    pub fn save_job(&self, job_id: JobId, actor_id: UserId) -> Result<(), TransitionError> {
        let actor = self.actor(actor_id)?;
        self.job(job_id)?;

        if actor.user_jobs.saved_jobs.contains(&job_id) {
            return Err(TransitionError::Conflict("job is already saved".to_string()));
        }

        self.sync().save(job_id, actor.id)?;
        Ok(())
    }

    pub fn unsave_job(&self, job_id: JobId, actor_id: UserId) -> Result<(), TransitionError> {
        let actor = self.actor(actor_id)?;
        self.job(job_id)?;

        self.sync().unsave(job_id, actor.id)?;
        Ok(())
    }

    pub fn saved_jobs(&self, actor_id: UserId) -> Result<Vec<Job>, TransitionError> {
        let actor = self.actor(actor_id)?;
        let mut jobs = Vec::with_capacity(actor.user_jobs.saved_jobs.len());
        for id in &actor.user_jobs.saved_jobs {
            match self.store.job(*id)? {
                Some(job) => jobs.push(job),
                None => tracing::debug!(job = %id, "dropping dangling saved-job reference"),
            }
        }
        Ok(jobs)
    }

    pub fn saved_job_by_id(
        &self,
        actor_id: UserId,
        job_id: JobId,
    ) -> Result<Job, TransitionError> {
        let actor = self.actor(actor_id)?;
        if !actor.user_jobs.saved_jobs.contains(&job_id) {
            return Err(TransitionError::NotFound("saved job"));
        }
        self.store
            .job(job_id)?
            .ok_or(TransitionError::NotFound("saved job"))
    }

    // ── business transitions ────────────────────────────────────────────────

    /// Offer a job to a crew user identified by email.
    ///
    /// All lookups and guards run before any mutation, so a bad target (unknown
    /// email, non-crew user, occupied job) leaves every record untouched.
    pub fn offer_job(
        &self,
        job_id: JobId,
        actor_id: UserId,
        target_email: &EmailAddress,
    ) -> Result<Outcome<Job>, TransitionError> {
        let actor = self.actor(actor_id)?;
        let job = self.job(job_id)?;
        let business = self.business(job.business_id)?;
        require_business_actor(&actor, &business, &job)?;

        let crew = self
            .store
            .user_by_email(target_email)?
            .ok_or(TransitionError::NotFound("crew member"))?;
        require_crew(&crew)?;

        if job.offered_to() == Some(crew.id) {
            let fully_linked = crew.user_jobs.offered_jobs.contains(&job_id)
                && business.business_jobs.offered_jobs.contains(&job_id);
            if fully_linked {
                return Err(TransitionError::Conflict(
                    "job already offered to this user".to_string(),
                ));
            }
            tracing::info!(job = %job_id, user = %crew.id, "resuming partially-linked offer");
        } else {
            // Validates the placement axis: only an open job can be offered.
            job.placement.offer(crew.id)?;
        }

        self.sync().offer(job_id, crew.id, business.id)?;

        let delivery = self
            .notifier
            .dispatch(EmailMessage::job_offered(&crew, &business, &job));
        let job = self.job(job_id)?;
        Ok(Outcome { value: job, delivery })
    }

    pub fn accept_application(
        &self,
        application_id: ApplicationId,
        actor_id: UserId,
    ) -> Result<JobApplication, TransitionError> {
        let actor = self.actor(actor_id)?;
        let application = self.application(application_id)?;
        let applicant = self.user(application.user)?;
        let job = self.job(application.job)?;
        let business = self.business(job.business_id)?;
        require_business_actor(&actor, &business, &job)?;

        // Status check first: a second accept is a conflict even though the
        // placement below would tolerate the same occupant.
        let mut accepted = application.clone();
        accepted.accept()?;
        job.placement.place(applicant.id)?;

        self.sync().accept(&application)?;
        Ok(accepted)
    }

    pub fn reject_application(
        &self,
        application_id: ApplicationId,
        actor_id: UserId,
    ) -> Result<(), TransitionError> {
        let actor = self.actor(actor_id)?;
        let application = self.application(application_id)?;
        self.user(application.user)?;
        let job = self.job(application.job)?;
        let business = self.business(job.business_id)?;
        require_business_actor(&actor, &business, &job)?;

        self.sync().remove_application("reject", &application)?;
        Ok(())
    }

    pub fn list_business_applications(
        &self,
        actor_id: UserId,
        business_id: BusinessId,
    ) -> Result<Vec<BusinessApplicationRow>, TransitionError> {
        let actor = self.actor(actor_id)?;
        let business = self.business(business_id)?;
        require_business_member(&actor, &business)?;

        let jobs = self.store.jobs_for_business(business_id)?;
        if jobs.is_empty() {
            return Err(TransitionError::NotFound("jobs for business"));
        }

        let mut rows = Vec::new();
        for job in &jobs {
            for application_id in &job.applications {
                let Some(application) = self.store.application(*application_id)? else {
                    tracing::debug!(
                        application = %application_id,
                        job = %job.id,
                        "dropping dangling application reference"
                    );
                    continue;
                };
                let Some(applicant) = self.store.user(application.user)? else {
                    tracing::debug!(user = %application.user, "dropping application with unknown user");
                    continue;
                };
                rows.push(BusinessApplicationRow {
                    application_id: application.id,
                    job_id: job.id,
                    user_id: applicant.id,
                    job_title: job.title.clone(),
                    job_function: job.job_function.clone(),
                    date: application.date,
                    user: ApplicantSummary {
                        username: applicant.username.clone(),
                        email: applicant.email.clone(),
                    },
                });
            }
        }
        Ok(rows)
    }

    pub fn active_crew(&self) -> Result<Vec<CrewSummary>, TransitionError> {
        let mut seen = Vec::new();
        let mut crew = Vec::new();
        for job in self.store.placed_jobs()? {
            let Some(user_id) = job.active_crew() else { continue };
            if seen.contains(&user_id) {
                continue;
            }
            seen.push(user_id);
            match self.store.user(user_id)? {
                Some(user) => crew.push(CrewSummary {
                    user_id: user.id,
                    username: user.username.clone(),
                    email: user.email.clone(),
                }),
                None => tracing::debug!(user = %user_id, "placed job references unknown user"),
            }
        }
        Ok(crew)
    }

    /// Email an invitation code to a prospective business member.
    pub fn invite_employee(
        &self,
        actor_id: UserId,
        business_id: BusinessId,
        email: &EmailAddress,
    ) -> Result<DeliveryStatus, TransitionError> {
        let actor = self.actor(actor_id)?;
        let business = self.business(business_id)?;
        require_business_member(&actor, &business)?;

        let code = crewmarket_notify::invitation_code();
        let message = EmailMessage::employee_invitation(email.clone(), &business, &code);
        Ok(self.notifier.dispatch(message))
    }
}
