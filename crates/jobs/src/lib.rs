//! `crewmarket-jobs` — Job and JobApplication entities and their lifecycles.
//!
//! The placement axis (`open → offered → placed`, with the direct apply/accept
//! entry `open → placed`) lives here as one state type; callers reach "placed"
//! through its transition methods, never by writing raw crew ids.

pub mod application;
pub mod job;

pub use application::{ApplicationStatus, JobApplication};
pub use job::{Job, Placement};
