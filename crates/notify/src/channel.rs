//! Delivery channel abstraction (mechanics only).
//!
//! A channel submits one message to an external delivery service. Channels make
//! no retry or queuing promises; the dispatcher decides what a failure means.

use std::sync::Mutex;

use thiserror::Error;

use crate::message::EmailMessage;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The delivery service refused the message.
    #[error("delivery rejected: {0}")]
    Rejected(String),

    /// The bounded delivery timeout elapsed.
    #[error("delivery timed out")]
    Timeout,

    /// Transport-level failure (connection, TLS, lock poisoning).
    #[error("delivery transport error: {0}")]
    Transport(String),
}

/// Outbound delivery contract.
///
/// Implementations must bound their own blocking time; the dispatcher calls
/// `deliver` inline and relies on the channel's timeout to avoid stalling the
/// parent transition.
pub trait DeliveryChannel: Send + Sync {
    fn deliver(&self, message: &EmailMessage) -> Result<(), DeliveryError>;
}

/// Channel that records every message instead of sending it.
///
/// Intended for tests/dev. Failures can be scripted one at a time.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<EmailMessage>>,
    fail_next: Mutex<Option<String>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `deliver` call fail with `reason`.
    pub fn fail_next(&self, reason: impl Into<String>) {
        if let Ok(mut slot) = self.fail_next.lock() {
            *slot = Some(reason.into());
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl DeliveryChannel for RecordingChannel {
    fn deliver(&self, message: &EmailMessage) -> Result<(), DeliveryError> {
        let scripted = self
            .fail_next
            .lock()
            .map_err(|_| DeliveryError::Transport("lock poisoned".to_string()))?
            .take();
        if let Some(reason) = scripted {
            return Err(DeliveryError::Rejected(reason));
        }

        self.sent
            .lock()
            .map_err(|_| DeliveryError::Transport("lock poisoned".to_string()))?
            .push(message.clone());
        Ok(())
    }
}

/// Channel that logs instead of delivering.
///
/// Used when no delivery credentials are configured, so the rest of the system
/// behaves exactly as in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogChannel;

impl DeliveryChannel for LogChannel {
    fn deliver(&self, message: &EmailMessage) -> Result<(), DeliveryError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "email delivery not configured; message logged only"
        );
        Ok(())
    }
}
