//! WhatsApp Cloud API webhook parser
//!
//! Deliveries arrive as `entry[].changes[].value` with `messages` (inbound)
//! and `statuses` (delivery callbacks), scoped by the receiving phone-number
//! id in `value.metadata`.

use serde::Deserialize;

use inbox_core::{ContentKind, InboundEvent, MessageStatus, ParsedWebhook, StatusEvent};

use super::meta::normalize_timestamp;

#[derive(Debug, Default, Deserialize)]
struct WabaWebhook {
    #[serde(default)]
    object: String,
    #[serde(default)]
    entry: Vec<WabaEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct WabaEntry {
    #[serde(default)]
    changes: Vec<WabaChange>,
}

#[derive(Debug, Default, Deserialize)]
struct WabaChange {
    #[serde(default)]
    value: Option<WabaValue>,
}

#[derive(Debug, Default, Deserialize)]
struct WabaValue {
    #[serde(default)]
    metadata: Option<WabaMetadata>,
    #[serde(default)]
    contacts: Vec<WabaContact>,
    #[serde(default)]
    messages: Vec<WabaMessage>,
    #[serde(default)]
    statuses: Vec<WabaStatus>,
}

#[derive(Debug, Default, Deserialize)]
struct WabaMetadata {
    #[serde(default)]
    phone_number_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct WabaContact {
    #[serde(default)]
    wa_id: String,
    #[serde(default)]
    profile: Option<WabaProfile>,
}

#[derive(Debug, Default, Deserialize)]
struct WabaProfile {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct WabaMessage {
    #[serde(default)]
    from: String,
    #[serde(default)]
    id: String,
    /// Epoch seconds as a string
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<WabaText>,
    #[serde(default)]
    image: Option<WabaMedia>,
    #[serde(default)]
    video: Option<WabaMedia>,
    #[serde(default)]
    audio: Option<WabaMedia>,
    #[serde(default)]
    document: Option<WabaMedia>,
    #[serde(default)]
    sticker: Option<WabaMedia>,
}

#[derive(Debug, Default, Deserialize)]
struct WabaText {
    #[serde(default)]
    body: String,
}

#[derive(Debug, Default, Deserialize)]
struct WabaMedia {
    #[serde(default)]
    caption: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WabaStatus {
    #[serde(default)]
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    errors: Vec<WabaError>,
}

#[derive(Debug, Default, Deserialize)]
struct WabaError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Parse a WhatsApp Cloud webhook body into normalized events
#[must_use]
pub fn parse(payload: &serde_json::Value) -> ParsedWebhook {
    let Ok(webhook) = serde_json::from_value::<WabaWebhook>(payload.clone()) else {
        return ParsedWebhook::default();
    };

    let mut parsed = ParsedWebhook::default();

    for entry in &webhook.entry {
        for change in &entry.changes {
            let Some(value) = &change.value else {
                continue;
            };
            // The phone-number id scopes everything in this change
            let Some(channel_id) = value
                .metadata
                .as_ref()
                .map(|m| m.phone_number_id.trim())
                .filter(|id| !id.is_empty())
            else {
                continue;
            };

            for message in &value.messages {
                let Some(event) = normalize_message(message, &value.contacts, channel_id) else {
                    continue;
                };
                parsed.inbound.push(event);
            }

            for status in &value.statuses {
                let Some(event) = normalize_status(status, channel_id) else {
                    continue;
                };
                parsed.statuses.push(event);
            }
        }
    }

    parsed
}

fn normalize_message(
    message: &WabaMessage,
    contacts: &[WabaContact],
    channel_id: &str,
) -> Option<InboundEvent> {
    let from = message.from.trim();
    if from.is_empty() {
        return None;
    }

    let text = message
        .text
        .as_ref()
        .map(|t| t.body.trim())
        .unwrap_or("");

    // First matching media object wins when several kinds are populated
    let media = [
        (ContentKind::Image, &message.image),
        (ContentKind::Video, &message.video),
        (ContentKind::Audio, &message.audio),
        (ContentKind::Document, &message.document),
        (ContentKind::Sticker, &message.sticker),
    ]
    .into_iter()
    .find_map(|(kind, media)| media.as_ref().map(|m| (kind, m)));

    let (content, content_kind) = if !text.is_empty() {
        (text.to_string(), ContentKind::Text)
    } else if let Some((kind, media)) = media {
        let caption = media.caption.as_deref().map(str::trim).unwrap_or("");
        let body = if caption.is_empty() {
            kind.placeholder().to_string()
        } else {
            caption.to_string()
        };
        (body, kind)
    } else {
        // Neither text nor a known attachment: unusable, drop the event
        return None;
    };

    let contact_name = contacts
        .iter()
        .find(|c| c.wa_id == from)
        .or_else(|| contacts.first())
        .and_then(|c| c.profile.as_ref())
        .map(|p| p.name.trim().to_string())
        .filter(|n| !n.is_empty());

    Some(InboundEvent {
        channel_external_id: channel_id.to_string(),
        contact_external_id: from.to_string(),
        contact_name,
        external_message_id: Some(message.id.clone()).filter(|id| !id.is_empty()),
        external_thread_id: None,
        content,
        content_kind,
        occurred_at: normalize_timestamp(message.timestamp.as_deref()),
    })
}

fn normalize_status(status: &WabaStatus, channel_id: &str) -> Option<StatusEvent> {
    let id = status.id.trim();
    if id.is_empty() {
        return None;
    }

    let mapped = match status.status.as_str() {
        "sent" => MessageStatus::Sent,
        "delivered" => MessageStatus::Delivered,
        "read" => MessageStatus::Read,
        "failed" => MessageStatus::Failed,
        _ => return None,
    };

    let failure_reason = if mapped == MessageStatus::Failed {
        status.errors.first().map(|e| {
            let detail = e
                .title
                .as_deref()
                .or(e.message.as_deref())
                .unwrap_or("delivery failed");
            match e.code {
                Some(code) => format!("{detail} (code {code})"),
                None => detail.to_string(),
            }
        })
    } else {
        None
    };

    Some(StatusEvent {
        channel_external_id: channel_id.to_string(),
        external_message_id: id.to_string(),
        status: mapped,
        failure_reason,
        occurred_at: normalize_timestamp(status.timestamp.as_deref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text_delivery() -> serde_json::Value {
        json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "waba-1",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "metadata": {"display_phone_number": "15550001111", "phone_number_id": "pn-1"},
                        "contacts": [{"profile": {"name": "Ada"}, "wa_id": "15557654321"}],
                        "messages": [{
                            "from": "15557654321",
                            "id": "wamid.A1",
                            "timestamp": "1700000000",
                            "type": "text",
                            "text": {"body": "hello there"}
                        }]
                    }
                }]
            }]
        })
    }

    #[test]
    fn test_parse_text_message() {
        let parsed = parse(&text_delivery());
        assert_eq!(parsed.inbound.len(), 1);
        assert!(parsed.statuses.is_empty());

        let event = &parsed.inbound[0];
        assert_eq!(event.channel_external_id, "pn-1");
        assert_eq!(event.contact_external_id, "15557654321");
        assert_eq!(event.contact_name.as_deref(), Some("Ada"));
        assert_eq!(event.external_message_id.as_deref(), Some("wamid.A1"));
        assert_eq!(event.content, "hello there");
        assert_eq!(event.content_kind, ContentKind::Text);
        assert_eq!(event.occurred_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_image_without_caption_gets_placeholder() {
        let payload = json!({
            "entry": [{"changes": [{"value": {
                "metadata": {"phone_number_id": "pn-1"},
                "messages": [{
                    "from": "15557654321",
                    "id": "wamid.IMG",
                    "type": "image",
                    "image": {"id": "media-1", "mime_type": "image/jpeg"}
                }]
            }}]}]
        });
        let parsed = parse(&payload);
        assert_eq!(parsed.inbound.len(), 1);
        assert_eq!(parsed.inbound[0].content, "[Image]");
        assert_eq!(parsed.inbound[0].content_kind, ContentKind::Image);
    }

    #[test]
    fn test_image_caption_wins_over_placeholder() {
        let payload = json!({
            "entry": [{"changes": [{"value": {
                "metadata": {"phone_number_id": "pn-1"},
                "messages": [{
                    "from": "15557654321",
                    "id": "wamid.IMG2",
                    "type": "image",
                    "image": {"caption": "look at this"}
                }]
            }}]}]
        });
        let parsed = parse(&payload);
        assert_eq!(parsed.inbound[0].content, "look at this");
        assert_eq!(parsed.inbound[0].content_kind, ContentKind::Image);
    }

    #[test]
    fn test_unusable_message_dropped() {
        // reaction-style event: no text, no known media
        let payload = json!({
            "entry": [{"changes": [{"value": {
                "metadata": {"phone_number_id": "pn-1"},
                "messages": [{"from": "15557654321", "id": "wamid.R", "type": "reaction"}]
            }}]}]
        });
        assert!(parse(&payload).is_empty());
    }

    #[test]
    fn test_missing_channel_id_dropped() {
        let payload = json!({
            "entry": [{"changes": [{"value": {
                "messages": [{"from": "15557654321", "id": "wamid.X", "type": "text", "text": {"body": "hi"}}]
            }}]}]
        });
        assert!(parse(&payload).is_empty());
    }

    #[test]
    fn test_status_callbacks() {
        let payload = json!({
            "entry": [{"changes": [{"value": {
                "metadata": {"phone_number_id": "pn-1"},
                "statuses": [
                    {"id": "wamid.S1", "status": "delivered", "timestamp": "1700000100"},
                    {"id": "wamid.S2", "status": "failed", "timestamp": "1700000200",
                     "errors": [{"code": 131026, "title": "Message undeliverable"}]},
                    {"id": "wamid.S3", "status": "deleted"}
                ]
            }}]}]
        });
        let parsed = parse(&payload);
        assert_eq!(parsed.statuses.len(), 2);

        assert_eq!(parsed.statuses[0].status, MessageStatus::Delivered);
        assert_eq!(parsed.statuses[0].external_message_id, "wamid.S1");

        assert_eq!(parsed.statuses[1].status, MessageStatus::Failed);
        assert_eq!(
            parsed.statuses[1].failure_reason.as_deref(),
            Some("Message undeliverable (code 131026)")
        );
    }

    #[test]
    fn test_malformed_payload_yields_empty() {
        assert!(parse(&json!("garbage")).is_empty());
        assert!(parse(&json!({"entry": "nope"})).is_empty());
        assert!(parse(&json!({})).is_empty());
    }

    #[test]
    fn test_mixed_delivery() {
        let payload = json!({
            "entry": [{"changes": [{"value": {
                "metadata": {"phone_number_id": "pn-1"},
                "messages": [{"from": "1", "id": "wamid.M", "type": "text", "text": {"body": "hi"}}],
                "statuses": [{"id": "wamid.S", "status": "read", "timestamp": "1700000300"}]
            }}]}]
        });
        let parsed = parse(&payload);
        assert_eq!(parsed.inbound.len(), 1);
        assert_eq!(parsed.statuses.len(), 1);
        assert_eq!(parsed.statuses[0].status, MessageStatus::Read);
    }
}
