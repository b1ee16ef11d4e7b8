//! Infrastructure layer: entity store, reference synchronizer, transition service.

pub mod service;
pub mod store;
pub mod sync;

pub use service::{Marketplace, NewBusiness, NewJob, NewUser, Outcome, TransitionError};
pub use store::{InMemoryMarketStore, MarketStore, StoreError};
pub use sync::{PartialFailure, Step, Synchronizer};
