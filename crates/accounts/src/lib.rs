//! `crewmarket-accounts` — User and Business entities.
//!
//! Both entities carry denormalized job references (`user_jobs`, `business_jobs`)
//! that the infra layer keeps in sync with the job records.

pub mod business;
pub mod email;
pub mod user;

pub use business::{Business, BusinessJobs};
pub use email::EmailAddress;
pub use user::{Role, User, UserJobs};
