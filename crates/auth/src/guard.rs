//! Access checks gating each lifecycle transition.
//!
//! - No IO
//! - No panics
//! - No business logic (pure policy checks)
//!
//! Fails closed: an unresolved actor or ownership link is an authorization
//! failure, never a silent pass.

use thiserror::Error;

use crewmarket_accounts::{Business, Role, User};
use crewmarket_core::{DomainError, UserId};
use crewmarket_jobs::{Job, JobApplication};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("forbidden: {0}")]
    Forbidden(String),
}

impl AccessError {
    fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }
}

impl From<AccessError> for DomainError {
    fn from(value: AccessError) -> Self {
        match value {
            AccessError::Forbidden(msg) => DomainError::Forbidden(msg),
        }
    }
}

/// Resolve the acting user, failing closed when the identity does not resolve.
pub fn resolve_actor(actor: Option<User>) -> Result<User, AccessError> {
    actor.ok_or_else(|| AccessError::forbidden("actor identity does not resolve to a user"))
}

/// The actor must hold the crew role (apply, save, withdraw).
pub fn require_crew(actor: &User) -> Result<(), AccessError> {
    if actor.has_role(Role::Crew) {
        Ok(())
    } else {
        Err(AccessError::forbidden("actor does not hold the crew role"))
    }
}

/// The actor must act on behalf of `business` (posting, listing, inviting).
pub fn require_business_member(actor: &User, business: &Business) -> Result<(), AccessError> {
    if actor.business == Some(business.id) {
        Ok(())
    } else {
        Err(AccessError::forbidden(
            "actor does not act on behalf of this business",
        ))
    }
}

/// Business-scoped job transitions (offer, accept, reject): the actor must act
/// for the business that owns the target job.
pub fn require_business_actor(
    actor: &User,
    business: &Business,
    job: &Job,
) -> Result<(), AccessError> {
    require_business_member(actor, business)?;
    if job.business_id != business.id {
        return Err(AccessError::forbidden("job is not owned by this business"));
    }
    Ok(())
}

/// Crew-scoped application transitions (withdraw, inspect): the actor must be
/// the applying user.
pub fn require_applicant(actor: UserId, application: &JobApplication) -> Result<(), AccessError> {
    if application.user == actor {
        Ok(())
    } else {
        Err(AccessError::forbidden(
            "actor is not the user who submitted this application",
        ))
    }
}
