//! Inbound webhook payload handling.
//!
//! The gateway posts arbitrary JSON; only the top-level `from` and `body`
//! strings are used. Anything else in the payload is ignored.

use serde_json::Value;

/// A message worth answering. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub sender: String,
    pub body: String,
}

/// Why a payload produced no reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// `from` or `body` absent, empty or not a string
    MissingFields,
    /// Group chat, status broadcast or newsletter
    NotDirectChat,
}

impl IgnoreReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing from/body",
            Self::NotDirectChat => "group, status or newsletter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Message(InboundMessage),
    Ignored(IgnoreReason),
}

const GROUP_SUFFIX: &str = "@g.us";
const NEWSLETTER_SUFFIX: &str = "@newsletter";
const STATUS_BROADCAST: &str = "status@broadcast";

fn non_empty_str<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn flag(payload: &Value, key: &str) -> bool {
    payload.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn is_direct_chat(sender: &str, payload: &Value) -> bool {
    !(sender.ends_with(GROUP_SUFFIX)
        || sender.ends_with(NEWSLETTER_SUFFIX)
        || sender == STATUS_BROADCAST
        || flag(payload, "isGroupMsg")
        || flag(payload, "isStatus"))
}

/// Classify a webhook payload.
///
/// When `ignore_groups` is set, group, status and newsletter events are ignored
/// even if they carry `from` and `body`.
pub fn parse_inbound(payload: &Value, ignore_groups: bool) -> InboundEvent {
    let (Some(sender), Some(body)) = (non_empty_str(payload, "from"), non_empty_str(payload, "body"))
    else {
        return InboundEvent::Ignored(IgnoreReason::MissingFields);
    };

    if ignore_groups && !is_direct_chat(sender, payload) {
        return InboundEvent::Ignored(IgnoreReason::NotDirectChat);
    }

    InboundEvent::Message(InboundMessage {
        sender: sender.to_string(),
        body: body.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_message() {
        let payload = json!({"from": "5511999999999@c.us", "body": "qual o estoque?", "type": "chat"});
        assert_eq!(
            parse_inbound(&payload, true),
            InboundEvent::Message(InboundMessage {
                sender: "5511999999999@c.us".to_string(),
                body: "qual o estoque?".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_or_empty_fields() {
        for payload in [
            json!({}),
            json!({"from": "5511999999999"}),
            json!({"body": "oi"}),
            json!({"from": "", "body": "oi"}),
            json!({"from": "5511999999999", "body": ""}),
            json!({"from": 5511999999999u64, "body": "oi"}),
            json!(["not", "an", "object"]),
        ] {
            assert_eq!(
                parse_inbound(&payload, true),
                InboundEvent::Ignored(IgnoreReason::MissingFields),
                "payload: {payload}"
            );
        }
    }

    #[test]
    fn test_group_status_and_newsletter_ignored() {
        for payload in [
            json!({"from": "120363000000000000@g.us", "body": "oi"}),
            json!({"from": "status@broadcast", "body": "oi"}),
            json!({"from": "120363000000000000@newsletter", "body": "oi"}),
            json!({"from": "5511999999999@c.us", "body": "oi", "isGroupMsg": true}),
            json!({"from": "5511999999999@c.us", "body": "oi", "isStatus": true}),
        ] {
            assert_eq!(
                parse_inbound(&payload, true),
                InboundEvent::Ignored(IgnoreReason::NotDirectChat),
                "payload: {payload}"
            );
        }
    }

    #[test]
    fn test_group_allowed_when_filter_disabled() {
        let payload = json!({"from": "120363000000000000@g.us", "body": "oi"});
        assert!(matches!(
            parse_inbound(&payload, false),
            InboundEvent::Message(_)
        ));
    }
}
