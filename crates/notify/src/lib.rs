//! `crewmarket-notify` — best-effort transition notifications.
//!
//! Every lifecycle transition may fire one email. Delivery is a side channel:
//! failures are logged and reported as a degraded-success signal, never as the
//! transition's error.

pub mod channel;
pub mod dispatcher;
pub mod message;
pub mod postmark;

pub use channel::{DeliveryChannel, DeliveryError, LogChannel, RecordingChannel};
pub use dispatcher::{DeliveryStatus, Dispatcher};
pub use message::{invitation_code, EmailMessage};
pub use postmark::PostmarkChannel;
