//! Shared payload shapes and helpers for the Meta messaging family
//!
//! Messenger and Instagram deliver the same `entry[].messaging[]` envelope;
//! they differ only in which id scopes the event to a channel. Everything is
//! `#[serde(default)]` so partially populated vendor payloads degrade to
//! empty results instead of errors.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use inbox_core::{ContentKind, InboundEvent, MessageStatus, ParsedWebhook, StatusEvent};

/// Epoch values at or above this are treated as milliseconds
const MILLIS_CUTOFF: i64 = 100_000_000_000;

/// Interpret an epoch number as seconds or milliseconds by magnitude
#[must_use]
pub fn from_epoch_any(value: i64) -> Option<DateTime<Utc>> {
    if value <= 0 {
        return None;
    }
    if value >= MILLIS_CUTOFF {
        Utc.timestamp_millis_opt(value).single()
    } else {
        Utc.timestamp_opt(value, 0).single()
    }
}

/// Normalize a numeric provider timestamp; unusable values default to now
#[must_use]
pub fn normalize_epoch(raw: Option<i64>) -> DateTime<Utc> {
    raw.and_then(from_epoch_any).unwrap_or_else(Utc::now)
}

/// Normalize a string provider timestamp (epoch seconds/millis or ISO-8601);
/// unusable values default to now
#[must_use]
pub fn normalize_timestamp(raw: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Utc::now();
    };
    if let Ok(epoch) = raw.parse::<i64>() {
        return normalize_epoch(Some(epoch));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

// --- Page / Instagram webhook envelope ---

#[derive(Debug, Default, Deserialize)]
pub struct PageWebhook {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub entry: Vec<PageEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub messaging: Vec<MessagingEvent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessagingEvent {
    #[serde(default)]
    pub sender: Option<Party>,
    #[serde(default)]
    pub recipient: Option<Party>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub message: Option<MessagePayload>,
    #[serde(default)]
    pub delivery: Option<DeliveryPayload>,
    #[serde(default)]
    pub read: Option<ReadPayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Party {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessagePayload {
    #[serde(default)]
    pub mid: String,
    #[serde(default)]
    pub text: Option<String>,
    /// Set on webhook echoes of the page's own outbound traffic
    #[serde(default)]
    pub is_echo: bool,
    #[serde(default)]
    pub attachments: Vec<MessageAttachment>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageAttachment {
    #[serde(default, rename = "type")]
    pub kind: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeliveryPayload {
    #[serde(default)]
    pub mids: Vec<String>,
    #[serde(default)]
    pub watermark: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReadPayload {
    #[serde(default)]
    pub watermark: Option<i64>,
}

/// Map a Meta attachment type string to the normalized content kind
#[must_use]
pub fn attachment_kind(kind: &str) -> ContentKind {
    match kind {
        "image" => ContentKind::Image,
        "video" => ContentKind::Video,
        "audio" => ContentKind::Audio,
        "file" => ContentKind::Document,
        "sticker" => ContentKind::Sticker,
        _ => ContentKind::Attachment,
    }
}

/// Walk a page-style webhook into normalized events
///
/// `prefer_recipient`: Instagram events are scoped by the recipient account
/// id; Messenger events by the page id in the entry envelope.
#[must_use]
pub fn parse_page_events(payload: &serde_json::Value, prefer_recipient: bool) -> ParsedWebhook {
    let Ok(webhook) = serde_json::from_value::<PageWebhook>(payload.clone()) else {
        return ParsedWebhook::default();
    };

    let mut parsed = ParsedWebhook::default();

    for entry in &webhook.entry {
        for event in &entry.messaging {
            let recipient_id = event.recipient.as_ref().map(|p| p.id.as_str()).unwrap_or("");
            let channel_id = if prefer_recipient {
                non_empty(recipient_id).or_else(|| non_empty(&entry.id))
            } else {
                non_empty(&entry.id).or_else(|| non_empty(recipient_id))
            };
            // No resolvable channel id: drop silently
            let Some(channel_id) = channel_id else {
                continue;
            };

            if let Some(message) = &event.message {
                // Echoes of our own outbound traffic must not re-enter as inbound
                if message.is_echo {
                    continue;
                }
                let Some(sender_id) = event
                    .sender
                    .as_ref()
                    .and_then(|p| non_empty(&p.id))
                else {
                    continue;
                };

                let text = message.text.as_deref().map(str::trim).unwrap_or("");
                let first_attachment = message.attachments.first();
                let (content, content_kind) = if !text.is_empty() {
                    (text.to_string(), ContentKind::Text)
                } else if let Some(attachment) = first_attachment {
                    let kind = attachment_kind(&attachment.kind);
                    (kind.placeholder().to_string(), kind)
                } else {
                    // Neither text nor attachment: nothing usable
                    continue;
                };

                parsed.inbound.push(InboundEvent {
                    channel_external_id: channel_id.to_string(),
                    contact_external_id: sender_id.to_string(),
                    contact_name: None,
                    external_message_id: non_empty(&message.mid).map(String::from),
                    external_thread_id: None,
                    content,
                    content_kind,
                    occurred_at: normalize_epoch(event.timestamp),
                });
            }

            if let Some(delivery) = &event.delivery {
                let occurred_at = normalize_epoch(delivery.watermark.or(event.timestamp));
                for mid in &delivery.mids {
                    if let Some(mid) = non_empty(mid) {
                        parsed.statuses.push(StatusEvent {
                            channel_external_id: channel_id.to_string(),
                            external_message_id: mid.to_string(),
                            status: MessageStatus::Delivered,
                            failure_reason: None,
                            occurred_at,
                        });
                    }
                }
            }

            // Read receipts carry only a watermark, no message ids; with no
            // resolvable target they are dropped here.
        }
    }

    parsed
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_seconds_vs_millis() {
        let secs = from_epoch_any(1_700_000_000).unwrap();
        let millis = from_epoch_any(1_700_000_000_000).unwrap();
        assert_eq!(secs, millis);
        assert!(from_epoch_any(0).is_none());
        assert!(from_epoch_any(-5).is_none());
    }

    #[test]
    fn test_normalize_string_timestamp() {
        let dt = normalize_timestamp(Some("1700000000"));
        assert_eq!(dt.timestamp(), 1_700_000_000);

        let dt = normalize_timestamp(Some("2024-03-01T12:00:00Z"));
        assert_eq!(dt.to_rfc3339(), "2024-03-01T12:00:00+00:00");

        // garbage falls back to now rather than erroring
        let before = Utc::now();
        let dt = normalize_timestamp(Some("not-a-date"));
        assert!(dt >= before);
        let dt = normalize_timestamp(None);
        assert!(dt >= before);
    }

    #[test]
    fn test_attachment_kind_mapping() {
        assert_eq!(attachment_kind("image"), ContentKind::Image);
        assert_eq!(attachment_kind("file"), ContentKind::Document);
        assert_eq!(attachment_kind("template"), ContentKind::Attachment);
    }
}
