//! Redis Pub/Sub module.

mod channels;
mod publisher;

pub use channels::{PubSubChannel, ORG_CHANNEL_PREFIX, USER_CHANNEL_PREFIX};
pub use publisher::{PubSubEvent, Publisher};
