//! # inbox-channels
//!
//! The channel provider abstraction: one pure webhook parser and one vendor
//! API client per messaging provider family, behind a uniform trait, resolved
//! through a closed registry built once at startup.

pub mod error;
pub mod parsers;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod types;

pub use error::ProviderError;
pub use provider::ChannelProvider;
pub use registry::ProviderRegistry;
pub use types::{ChannelCredentials, ConnectedAccount, SendOutcome};
