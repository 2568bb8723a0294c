//! Instagram Messaging webhook parser
//!
//! Same `entry[].messaging[]` envelope as Messenger, but events are scoped
//! by the receiving Instagram account id carried in `recipient.id`.

use inbox_core::ParsedWebhook;

use super::meta::parse_page_events;

/// Parse an Instagram webhook body into normalized events
#[must_use]
pub fn parse(payload: &serde_json::Value) -> ParsedWebhook {
    parse_page_events(payload, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_scoped_by_recipient_id() {
        let payload = json!({
            "object": "instagram",
            "entry": [{
                "id": "ig-entry",
                "messaging": [{
                    "sender": {"id": "igsid-7"},
                    "recipient": {"id": "ig-account-1"},
                    "timestamp": 1_700_000_000_000i64,
                    "message": {"mid": "mid.ig1", "text": "love this"}
                }]
            }]
        });
        let parsed = parse(&payload);
        assert_eq!(parsed.inbound.len(), 1);
        assert_eq!(parsed.inbound[0].channel_external_id, "ig-account-1");
        assert_eq!(parsed.inbound[0].contact_external_id, "igsid-7");
    }

    #[test]
    fn test_falls_back_to_entry_id() {
        let payload = json!({
            "entry": [{
                "id": "ig-account-2",
                "messaging": [{
                    "sender": {"id": "igsid-7"},
                    "message": {"mid": "mid.ig2", "text": "hi"}
                }]
            }]
        });
        let parsed = parse(&payload);
        assert_eq!(parsed.inbound.len(), 1);
        assert_eq!(parsed.inbound[0].channel_external_id, "ig-account-2");
    }

    #[test]
    fn test_story_reply_without_content_dropped() {
        let payload = json!({
            "entry": [{
                "id": "ig-account-1",
                "messaging": [{
                    "sender": {"id": "igsid-7"},
                    "recipient": {"id": "ig-account-1"},
                    "message": {"mid": "mid.ig3"}
                }]
            }]
        });
        assert!(parse(&payload).is_empty());
    }
}
