//! Infrastructure wiring for the HTTP layer.

use std::sync::Arc;

use crewmarket_accounts::EmailAddress;
use crewmarket_infra::{InMemoryMarketStore, Marketplace};
use crewmarket_notify::{DeliveryChannel, Dispatcher, LogChannel, PostmarkChannel};

pub struct AppServices {
    pub marketplace: Marketplace<InMemoryMarketStore>,
}

impl AppServices {
    pub fn new(marketplace: Marketplace<InMemoryMarketStore>) -> Self {
        Self { marketplace }
    }
}

/// Build the service graph from the environment.
///
/// Email delivery needs `POSTMARK_SERVER_TOKEN` and `CREWMARKET_FROM_ADDRESS`;
/// without them outbound mail is logged instead of delivered, and everything
/// else behaves as in production.
pub fn build_services() -> AppServices {
    let channel = delivery_channel_from_env();
    AppServices::new(Marketplace::new(
        InMemoryMarketStore::new(),
        Dispatcher::new(channel),
    ))
}

fn delivery_channel_from_env() -> Arc<dyn DeliveryChannel> {
    let token = std::env::var("POSTMARK_SERVER_TOKEN").ok();
    let from = std::env::var("CREWMARKET_FROM_ADDRESS").ok();

    let (Some(token), Some(from)) = (token, from) else {
        tracing::warn!(
            "POSTMARK_SERVER_TOKEN / CREWMARKET_FROM_ADDRESS not set; logging outbound email"
        );
        return Arc::new(LogChannel);
    };

    let from = match EmailAddress::parse(from) {
        Ok(from) => from,
        Err(e) => {
            tracing::warn!(error = %e, "invalid CREWMARKET_FROM_ADDRESS; logging outbound email");
            return Arc::new(LogChannel);
        }
    };

    Arc::new(PostmarkChannel::new(token, from))
}
