//! # inbox-cache
//!
//! Redis layer: a managed connection pool and the pub/sub publisher that
//! implements the core fan-out port. Realtime delivery to clients is the
//! external collaborator's side of the channel; this crate only publishes.

pub mod pool;
pub mod pubsub;

pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use pubsub::{PubSubChannel, PubSubEvent, Publisher, ORG_CHANNEL_PREFIX, USER_CHANNEL_PREFIX};
