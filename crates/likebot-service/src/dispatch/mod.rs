//! Event dispatch
//!
//! Inbound transport events, the effects the bot answers with, and the
//! [`Dispatcher`] connecting them to the services.

mod dispatcher;
mod effects;
mod events;
mod handlers;

pub use dispatcher::{DeliveryReport, Dispatcher};
pub use effects::{Delivery, Effect, Notifier, NotifyError};
pub use events::{EventKind, InboundEvent};
pub use handlers::{NOOP_CACHE_SECS, PUBLISH_QUERY, REACT_PAYLOAD};
