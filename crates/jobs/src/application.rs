//! JobApplication entity and its status lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crewmarket_core::{ApplicationId, DomainError, DomainResult, Entity, JobId, UserId};

/// Status of a job application.
///
/// `Pending → Accepted` is the only stored transition; rejection and withdrawal
/// delete the record instead of parking it in a terminal status, so consumers
/// holding an application id must tolerate lookup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
}

/// A crew user's request to be considered for a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: ApplicationId,
    /// Immutable after creation.
    pub job: JobId,
    /// Immutable after creation.
    pub user: UserId,
    pub date: DateTime<Utc>,
    pub status: ApplicationStatus,
}

impl JobApplication {
    pub fn new(id: ApplicationId, job: JobId, user: UserId, date: DateTime<Utc>) -> Self {
        Self {
            id,
            job,
            user,
            date,
            status: ApplicationStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ApplicationStatus::Pending
    }

    /// Mark the application accepted. Only a pending application qualifies;
    /// `Accepted` is terminal.
    pub fn accept(&mut self) -> DomainResult<()> {
        match self.status {
            ApplicationStatus::Pending => {
                self.status = ApplicationStatus::Accepted;
                Ok(())
            }
            ApplicationStatus::Accepted => {
                Err(DomainError::conflict("application is no longer pending"))
            }
        }
    }
}

impl Entity for JobApplication {
    type Id = ApplicationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
