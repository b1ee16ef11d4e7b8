//! Reference synchronizer: ordered, idempotent multi-entity updates.
//!
//! The store has no cross-record transaction, so every lifecycle transition is
//! expressed as an explicit ordered list of named steps. The ordering rule:
//! the authoritative record is written first, and a denormalized reference is
//! only ever added after the record it points at exists. A failure mid-sequence
//! surfaces as [`PartialFailure`] naming the committed prefix; because each step
//! is idempotent (re-adding a present id and re-deleting an absent record are
//! no-ops), re-running the whole transition converges without duplicating side
//! effects.
//!
//! Append steps require their holder record to be present (a vanished holder
//! means the reference cannot be recorded); removal steps tolerate absent
//! holders, since the reference they would clear is already gone.

use thiserror::Error;

use crewmarket_core::{BusinessId, JobId, UserId};
use crewmarket_jobs::{ApplicationStatus, JobApplication, Placement};

use crate::store::{MarketStore, StoreError};

/// One durable update inside a transition's ordered step list.
pub struct Step<'a> {
    name: &'static str,
    op: Box<dyn FnOnce() -> Result<(), StoreError> + 'a>,
}

impl<'a> Step<'a> {
    pub fn new(name: &'static str, op: impl FnOnce() -> Result<(), StoreError> + 'a) -> Self {
        Self { name, op: Box::new(op) }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A multi-step update stopped partway: the committed prefix is durable, the
/// rest is not. Retrying the same transition converges.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "transition '{transition}' stalled at step '{failed_step}' after {} committed step(s): {source}",
    .committed.len()
)]
pub struct PartialFailure {
    pub transition: &'static str,
    /// Names of the steps that committed, in order.
    pub committed: Vec<&'static str>,
    pub failed_step: &'static str,
    pub source: StoreError,
}

/// Run `steps` in order. Success means every step committed.
pub fn run_steps(transition: &'static str, steps: Vec<Step<'_>>) -> Result<(), PartialFailure> {
    let mut committed = Vec::with_capacity(steps.len());
    for step in steps {
        let name = step.name;
        match (step.op)() {
            Ok(()) => {
                tracing::debug!(transition, step = name, "synchronizer step committed");
                committed.push(name);
            }
            Err(source) => {
                tracing::warn!(
                    transition,
                    step = name,
                    committed = ?committed,
                    error = %source,
                    "synchronizer stalled; transition is retryable"
                );
                return Err(PartialFailure {
                    transition,
                    committed,
                    failed_step: name,
                    source,
                });
            }
        }
    }
    Ok(())
}

fn require_present(found: bool, what: &'static str) -> Result<(), StoreError> {
    if found {
        Ok(())
    } else {
        Err(StoreError::Backend(format!(
            "{what} record disappeared mid-transition"
        )))
    }
}

/// Builds and runs the ordered step list for each lifecycle transition.
pub struct Synchronizer<'a, S> {
    store: &'a S,
}

impl<'a, S: MarketStore> Synchronizer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Apply: create the application record, then link it from the job and the
    /// user. With `create_record = false` the record already exists (a resumed
    /// partial apply) and only the links are replayed.
    pub fn apply(
        &self,
        application: &JobApplication,
        create_record: bool,
    ) -> Result<(), PartialFailure> {
        let (app_id, job_id, user_id) = (application.id, application.job, application.user);

        let mut steps = Vec::with_capacity(3);
        if create_record {
            let record = application.clone();
            steps.push(Step::new("create application record", move || {
                self.store.insert_application(record)
            }));
        }
        steps.push(Step::new("append to job.applications", move || {
            let found = self.store.update_job(job_id, &mut |job| {
                job.record_application(app_id);
            })?;
            require_present(found, "job")
        }));
        steps.push(Step::new("append to user.applications", move || {
            let found = self.store.update_user(user_id, &mut |user| {
                user.record_application(app_id);
            })?;
            require_present(found, "user")
        }));

        run_steps("apply", steps)
    }

    /// Offer: mark the job offered, then link the offer from the crew user and
    /// the owning business.
    pub fn offer(
        &self,
        job_id: JobId,
        crew: UserId,
        business_id: BusinessId,
    ) -> Result<(), PartialFailure> {
        let steps = vec![
            Step::new("set job placement to offered", move || {
                let found = self.store.update_job(job_id, &mut |job| {
                    job.placement = Placement::Offered(crew);
                })?;
                require_present(found, "job")
            }),
            Step::new("append to user.offered_jobs", move || {
                let found = self.store.update_user(crew, &mut |user| {
                    user.record_offer(job_id);
                })?;
                require_present(found, "user")
            }),
            Step::new("append to business.offered_jobs", move || {
                let found = self.store.update_business(business_id, &mut |business| {
                    business.record_offer(job_id);
                })?;
                require_present(found, "business")
            }),
        ];

        run_steps("offer", steps)
    }

    /// Accept: record the user's active job (replacing any previous holding),
    /// place the crew on the job, then flip the authoritative status last so an
    /// interrupted acceptance stays detectable as pending.
    pub fn accept(&self, application: &JobApplication) -> Result<(), PartialFailure> {
        let (app_id, job_id, user_id) = (application.id, application.job, application.user);

        let steps = vec![
            Step::new("replace user.active_jobs", move || {
                let found = self.store.update_user(user_id, &mut |user| {
                    user.set_active_job(job_id);
                })?;
                require_present(found, "user")
            }),
            Step::new("set job placement to placed", move || {
                let found = self.store.update_job(job_id, &mut |job| {
                    job.placement = Placement::Placed(user_id);
                })?;
                require_present(found, "job")
            }),
            Step::new("mark application accepted", move || {
                let found = self.store.update_application(app_id, &mut |application| {
                    application.status = ApplicationStatus::Accepted;
                })?;
                require_present(found, "application")
            }),
        ];

        run_steps("accept", steps)
    }

    /// Reject and withdraw share one plan: unlink the application from the job
    /// and the user, then delete the record. Symmetric cleanup on both ends
    /// leaves no dangling forward reference behind.
    pub fn remove_application(
        &self,
        transition: &'static str,
        application: &JobApplication,
    ) -> Result<(), PartialFailure> {
        let (app_id, job_id, user_id) = (application.id, application.job, application.user);

        let steps = vec![
            Step::new("remove from job.applications", move || {
                self.store.update_job(job_id, &mut |job| {
                    job.remove_application(app_id);
                })?;
                Ok(())
            }),
            Step::new("remove from user.applications", move || {
                self.store.update_user(user_id, &mut |user| {
                    user.remove_application(app_id);
                })?;
                Ok(())
            }),
            Step::new("delete application record", move || {
                self.store.delete_application(app_id)?;
                Ok(())
            }),
        ];

        run_steps(transition, steps)
    }

    pub fn save(&self, job_id: JobId, user_id: UserId) -> Result<(), PartialFailure> {
        let steps = vec![Step::new("append to user.saved_jobs", move || {
            let found = self.store.update_user(user_id, &mut |user| {
                user.save_job(job_id);
            })?;
            require_present(found, "user")
        })];

        run_steps("save_job", steps)
    }

    pub fn unsave(&self, job_id: JobId, user_id: UserId) -> Result<(), PartialFailure> {
        let steps = vec![Step::new("remove from user.saved_jobs", move || {
            self.store.update_user(user_id, &mut |user| {
                user.unsave_job(job_id);
            })?;
            Ok(())
        })];

        run_steps("unsave_job", steps)
    }
}
