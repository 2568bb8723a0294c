//! Pure webhook parsers, one per provider family
//!
//! Parsers are total functions from a raw JSON payload to normalized events:
//! malformed or partially populated input yields an empty or partial result,
//! never an error. All I/O stays outside this module.

pub mod instagram;
pub mod meta;
pub mod messenger;
pub mod whatsapp;

use inbox_core::{ParsedWebhook, ProviderKind};

/// Dispatch to the parser for a provider family
#[must_use]
pub fn parse_webhook(kind: ProviderKind, payload: &serde_json::Value) -> ParsedWebhook {
    match kind {
        ProviderKind::WhatsApp => whatsapp::parse(payload),
        ProviderKind::Messenger => messenger::parse(payload),
        ProviderKind::Instagram => instagram::parse(payload),
    }
}
