//! Entity store: per-record atomic persistence for the marketplace entities.

mod in_memory;
mod r#trait;

pub use in_memory::InMemoryMarketStore;
pub use r#trait::{MarketStore, StoreError};
