//! `crewmarket-auth` — authorization boundary for lifecycle transitions.
//!
//! This crate is intentionally decoupled from HTTP and storage: every check is a
//! pure function over already-resolved records. Actor resolution goes through
//! [`guard::resolve_actor`], which fails closed.

pub mod guard;

pub use guard::{
    require_applicant, require_business_actor, require_business_member, require_crew,
    resolve_actor, AccessError,
};
