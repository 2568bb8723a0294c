//! Facebook Messenger webhook parser
//!
//! Page-scoped `entry[].messaging[]` events. The page id in the entry
//! envelope scopes the event to a channel; echoes of the page's own
//! outbound traffic are skipped.

use inbox_core::ParsedWebhook;

use super::meta::parse_page_events;

/// Parse a Messenger webhook body into normalized events
#[must_use]
pub fn parse(payload: &serde_json::Value) -> ParsedWebhook {
    parse_page_events(payload, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inbox_core::{ContentKind, MessageStatus};
    use serde_json::json;

    fn text_delivery(is_echo: bool) -> serde_json::Value {
        json!({
            "object": "page",
            "entry": [{
                "id": "page-1",
                "time": 1_700_000_000_000i64,
                "messaging": [{
                    "sender": {"id": "psid-9"},
                    "recipient": {"id": "page-1"},
                    "timestamp": 1_700_000_000_000i64,
                    "message": {"mid": "m_abc", "text": "hi there", "is_echo": is_echo}
                }]
            }]
        })
    }

    #[test]
    fn test_parse_text_message() {
        let parsed = parse(&text_delivery(false));
        assert_eq!(parsed.inbound.len(), 1);

        let event = &parsed.inbound[0];
        assert_eq!(event.channel_external_id, "page-1");
        assert_eq!(event.contact_external_id, "psid-9");
        assert_eq!(event.external_message_id.as_deref(), Some("m_abc"));
        assert_eq!(event.content, "hi there");
        assert_eq!(event.occurred_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_echo_skipped() {
        assert!(parse(&text_delivery(true)).is_empty());
    }

    #[test]
    fn test_attachment_fallback() {
        let payload = json!({
            "entry": [{
                "id": "page-1",
                "messaging": [{
                    "sender": {"id": "psid-9"},
                    "recipient": {"id": "page-1"},
                    "message": {
                        "mid": "m_img",
                        "attachments": [
                            {"type": "image", "payload": {"url": "https://cdn/img.jpg"}},
                            {"type": "file", "payload": {"url": "https://cdn/doc.pdf"}}
                        ]
                    }
                }]
            }]
        });
        let parsed = parse(&payload);
        assert_eq!(parsed.inbound.len(), 1);
        // first attachment wins
        assert_eq!(parsed.inbound[0].content, "[Image]");
        assert_eq!(parsed.inbound[0].content_kind, ContentKind::Image);
    }

    #[test]
    fn test_empty_message_dropped() {
        let payload = json!({
            "entry": [{
                "id": "page-1",
                "messaging": [{
                    "sender": {"id": "psid-9"},
                    "recipient": {"id": "page-1"},
                    "message": {"mid": "m_empty", "text": "   "}
                }]
            }]
        });
        assert!(parse(&payload).is_empty());
    }

    #[test]
    fn test_delivery_receipt() {
        let payload = json!({
            "entry": [{
                "id": "page-1",
                "messaging": [{
                    "sender": {"id": "psid-9"},
                    "recipient": {"id": "page-1"},
                    "timestamp": 1_700_000_050_000i64,
                    "delivery": {"mids": ["m_1", "m_2"], "watermark": 1_700_000_050_000i64}
                }]
            }]
        });
        let parsed = parse(&payload);
        assert_eq!(parsed.statuses.len(), 2);
        assert!(parsed
            .statuses
            .iter()
            .all(|s| s.status == MessageStatus::Delivered));
        assert_eq!(parsed.statuses[0].external_message_id, "m_1");
    }

    #[test]
    fn test_read_receipt_without_mids_dropped() {
        let payload = json!({
            "entry": [{
                "id": "page-1",
                "messaging": [{
                    "sender": {"id": "psid-9"},
                    "recipient": {"id": "page-1"},
                    "read": {"watermark": 1_700_000_060_000i64}
                }]
            }]
        });
        assert!(parse(&payload).is_empty());
    }

    #[test]
    fn test_missing_sender_dropped() {
        let payload = json!({
            "entry": [{
                "id": "page-1",
                "messaging": [{"message": {"mid": "m_x", "text": "hi"}}]
            }]
        });
        assert!(parse(&payload).is_empty());
    }
}
