//! Notification dispatcher: best-effort, never blocks a transition's outcome.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::channel::DeliveryChannel;
use crate::message::EmailMessage;

/// Upper bound on how long a transition waits for its notification. A delivery
/// still in flight past this point is abandoned to finish in the background.
const DISPATCH_TIMEOUT: Duration = Duration::from_secs(5);

/// How a transition's notification fared.
///
/// `Failed` is a degraded-success signal: the transition itself committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum DeliveryStatus {
    Delivered,
    Failed(String),
}

impl DeliveryStatus {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryStatus::Delivered)
    }
}

/// Submits transition notifications to a delivery channel.
#[derive(Clone)]
pub struct Dispatcher {
    channel: Arc<dyn DeliveryChannel>,
}

impl Dispatcher {
    pub fn new(channel: Arc<dyn DeliveryChannel>) -> Self {
        Self { channel }
    }

    /// Fire one notification. A delivery failure or timeout is logged and
    /// reported in the return value; it never propagates as an error.
    ///
    /// Delivery runs on its own thread so the caller (which may sit on an async
    /// executor) is never blocked past [`DISPATCH_TIMEOUT`].
    pub fn dispatch(&self, message: EmailMessage) -> DeliveryStatus {
        let (tx, rx) = mpsc::channel();
        let channel = Arc::clone(&self.channel);
        let to_deliver = message.clone();

        std::thread::spawn(move || {
            let _ = tx.send(channel.deliver(&to_deliver));
        });

        match rx.recv_timeout(DISPATCH_TIMEOUT) {
            Ok(Ok(())) => {
                tracing::debug!(to = %message.to, subject = %message.subject, "notification delivered");
                DeliveryStatus::Delivered
            }
            Ok(Err(err)) => {
                tracing::warn!(
                    to = %message.to,
                    subject = %message.subject,
                    error = %err,
                    "notification delivery failed; transition unaffected"
                );
                DeliveryStatus::Failed(err.to_string())
            }
            Err(_) => {
                tracing::warn!(
                    to = %message.to,
                    subject = %message.subject,
                    "notification delivery timed out; transition unaffected"
                );
                DeliveryStatus::Failed("delivery timed out".to_string())
            }
        }
    }
}
