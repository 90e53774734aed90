//! Bus Module
//!
//! Replication events and the coordination bus that fans them out.

mod event;
mod pubsub;

pub use event::ReplicationEvent;
pub use pubsub::CoordinationBus;
