use serde::{Deserialize, Serialize};

/// Opaque keep-alive frame sent by the client on the notification socket.
pub const PING_FRAME: &str = "ping";

/// Display priority of an agent notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    High,
    #[default]
    Normal,
}

/// Server -> client messages on the agent notification socket.
///
/// One JSON object per frame, discriminated by the `type` field. Tags not
/// listed here deserialize into [`ChannelMessage::Unknown`] so the consumer
/// can skip them without a parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChannelMessage {
    /// A lead is due for a callback right now.
    CallbackDue {
        lead_id: i64,
        lead_name: Option<String>,
        lead_phone: Option<String>,
        message: Option<String>,
        #[serde(default)]
        urgency: Urgency,
    },
    /// Server-side liveness signal.
    Heartbeat,
    /// Reply to the client's ping frame.
    Pong,
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_callback_due() {
        let raw = r#"{"type":"callback-due","lead_id":42,"lead_name":"Maya Haddad","lead_phone":"+96170123456","urgency":"high"}"#;
        let msg: ChannelMessage = serde_json::from_str(raw).unwrap();
        match msg {
            ChannelMessage::CallbackDue {
                lead_id,
                lead_name,
                message,
                urgency,
                ..
            } => {
                assert_eq!(lead_id, 42);
                assert_eq!(lead_name.as_deref(), Some("Maya Haddad"));
                assert_eq!(message, None);
                assert_eq!(urgency, Urgency::High);
            }
            other => panic!("expected CallbackDue, got {other:?}"),
        }
    }

    #[test]
    fn test_urgency_defaults_to_normal() {
        let raw = r#"{"type":"callback-due","lead_id":7,"lead_name":null,"lead_phone":null,"message":null}"#;
        let msg: ChannelMessage = serde_json::from_str(raw).unwrap();
        match msg {
            ChannelMessage::CallbackDue { urgency, .. } => {
                assert_eq!(urgency, Urgency::Normal)
            }
            other => panic!("expected CallbackDue, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_liveness_tags() {
        assert!(matches!(
            serde_json::from_str(r#"{"type":"heartbeat"}"#).unwrap(),
            ChannelMessage::Heartbeat
        ));
        assert!(matches!(
            serde_json::from_str(r#"{"type":"pong"}"#).unwrap(),
            ChannelMessage::Pong
        ));
    }

    #[test]
    fn test_unknown_tag_is_not_an_error() {
        let msg: ChannelMessage =
            serde_json::from_str(r#"{"type":"agent-stats-updated","payload":{}}"#).unwrap();
        assert!(matches!(msg, ChannelMessage::Unknown));
    }
}
