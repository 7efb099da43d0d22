//! Connection state machine and notification queue of the agent channel.
//!
//! `ChannelCore` is plain data: the transport binding and the timers live in
//! [`super::service`], which drives the core through its `handle_*` entry
//! points and executes whatever the returned outcome asks for. Keeping JS
//! types out of this module is what lets the whole state machine run under
//! native `cargo test`.

use contracts::system::channel::{ChannelMessage, Urgency};

/// Upper bound of the in-memory notification queue.
pub const MAX_VISIBLE_NOTIFICATIONS: usize = 10;

/// Keep-alive ping cadence while the socket is open.
pub const KEEP_ALIVE_INTERVAL_MS: i32 = 25_000;

const RECONNECT_BASE_MS: u64 = 1_000;
const RECONNECT_CEILING_MS: u64 = 30_000;

const UNKNOWN_LEAD_NAME: &str = "Unknown";
const MISSING_PHONE_PLACEHOLDER: &str = "—";

/// Lifecycle of the logical connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelStatus {
    #[default]
    Connecting,
    Open,
    Closed,
}

/// What a notification is about. Only callback reminders ride the channel
/// today; the tag keeps the queue self-describing as more arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    CallbackDue,
}

/// An in-memory, user-dismissible "act on this now" entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRecord {
    /// Unique per record: source lead id plus arrival time.
    pub id: String,
    pub kind: NotificationKind,
    pub lead_id: i64,
    pub lead_name: String,
    pub lead_phone: String,
    pub message: String,
    pub urgency: Urgency,
    /// Stamped at arrival, not taken from the server.
    pub received_at_ms: u64,
}

/// Result of feeding one inbound frame to the core.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageOutcome {
    /// A record was queued; `play_sound` reflects the sound flag at arrival.
    Notification {
        record: NotificationRecord,
        play_sound: bool,
    },
    /// Heartbeat/pong: liveness confirmed, nothing else.
    Liveness,
    /// Unknown tag or unparseable payload.
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelCore {
    status: ChannelStatus,
    reconnect_attempt: u32,
    sound_enabled: bool,
    records: Vec<NotificationRecord>,
}

impl Default for ChannelCore {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelCore {
    /// A freshly mounted channel is already in `Connecting`.
    pub fn new() -> Self {
        Self {
            status: ChannelStatus::Connecting,
            reconnect_attempt: 0,
            sound_enabled: true,
            records: Vec::new(),
        }
    }

    pub fn status(&self) -> ChannelStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.status == ChannelStatus::Open
    }

    pub fn reconnect_attempt(&self) -> u32 {
        self.reconnect_attempt
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Current queue, most recent first, never longer than
    /// [`MAX_VISIBLE_NOTIFICATIONS`].
    pub fn records(&self) -> &[NotificationRecord] {
        &self.records
    }

    /// A reconnect delay is about to elapse and a new attempt starts.
    pub fn begin_connect(&mut self) {
        self.status = ChannelStatus::Connecting;
    }

    /// Handshake succeeded.
    pub fn handle_open(&mut self) {
        self.status = ChannelStatus::Open;
        self.reconnect_attempt = 0;
    }

    /// The connection terminated (error or normal close).
    ///
    /// Returns the backoff delay to wait before the next attempt, computed
    /// from the attempt counter *before* it is incremented. Returns `None`
    /// when the channel is already closed — WebSocket fires `error` and
    /// `close` for the same termination, and only the first may schedule.
    pub fn handle_close(&mut self) -> Option<u64> {
        if self.status == ChannelStatus::Closed {
            return None;
        }
        self.status = ChannelStatus::Closed;
        let delay = reconnect_delay_ms(self.reconnect_attempt);
        self.reconnect_attempt += 1;
        Some(delay)
    }

    /// Feed one inbound frame. Never fails: anything that does not parse
    /// into a known message is reported as `Ignored`.
    pub fn handle_message(&mut self, raw: &str, now_ms: u64) -> MessageOutcome {
        let msg: ChannelMessage = match serde_json::from_str(raw) {
            Ok(msg) => msg,
            Err(e) => {
                log::debug!("notification channel: dropping unparseable frame: {e}");
                return MessageOutcome::Ignored;
            }
        };

        match msg {
            ChannelMessage::CallbackDue {
                lead_id,
                lead_name,
                lead_phone,
                message,
                urgency,
            } => {
                let record = self.push_callback_due(
                    lead_id, lead_name, lead_phone, message, urgency, now_ms,
                );
                MessageOutcome::Notification {
                    record,
                    play_sound: self.sound_enabled,
                }
            }
            ChannelMessage::Heartbeat | ChannelMessage::Pong => MessageOutcome::Liveness,
            ChannelMessage::Unknown => {
                log::debug!("notification channel: ignoring frame with unknown tag");
                MessageOutcome::Ignored
            }
        }
    }

    fn push_callback_due(
        &mut self,
        lead_id: i64,
        lead_name: Option<String>,
        lead_phone: Option<String>,
        message: Option<String>,
        urgency: Urgency,
        now_ms: u64,
    ) -> NotificationRecord {
        let lead_name = lead_name.unwrap_or_else(|| UNKNOWN_LEAD_NAME.to_string());
        let message =
            message.unwrap_or_else(|| format!("Callback due for {}", lead_name));
        let record = NotificationRecord {
            id: format!("{}-{}", lead_id, now_ms),
            kind: NotificationKind::CallbackDue,
            lead_id,
            lead_name,
            lead_phone: lead_phone.unwrap_or_else(|| MISSING_PHONE_PLACEHOLDER.to_string()),
            message,
            urgency,
            received_at_ms: now_ms,
        };
        self.records.insert(0, record.clone());
        self.records.truncate(MAX_VISIBLE_NOTIFICATIONS);
        record
    }

    /// Remove one record by id. Silent no-op when the id is not present.
    pub fn dismiss(&mut self, id: &str) {
        self.records.retain(|r| r.id != id);
    }

    /// Drop every record.
    pub fn dismiss_all(&mut self) {
        self.records.clear();
    }

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
    }
}

fn reconnect_delay_ms(attempt: u32) -> u64 {
    // The ceiling is reached by attempt 5; clamping the exponent keeps the
    // shift defined for arbitrarily large counters.
    let exp = attempt.min(5);
    (RECONNECT_BASE_MS << exp).min(RECONNECT_CEILING_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn callback_due_json(lead_id: i64, name: &str) -> String {
        format!(
            r#"{{"type":"callback-due","lead_id":{lead_id},"lead_name":"{name}","lead_phone":"+96171000{lead_id}","message":"Call back now","urgency":"normal"}}"#
        )
    }

    #[test]
    fn test_queue_is_bounded_and_newest_first() {
        let mut core = ChannelCore::new();
        core.handle_open();
        for i in 0..15 {
            core.handle_message(&callback_due_json(i, "Lead"), 1_000 + i as u64);
        }
        assert_eq!(core.records().len(), MAX_VISIBLE_NOTIFICATIONS);
        assert_eq!(core.records()[0].lead_id, 14);
        assert_eq!(core.records()[9].lead_id, 5);
    }

    #[test]
    fn test_record_id_derived_from_lead_and_arrival() {
        let mut core = ChannelCore::new();
        core.handle_message(&callback_due_json(42, "Maya"), 1_700_000_000_000);
        assert_eq!(core.records()[0].id, "42-1700000000000");
        assert_eq!(core.records()[0].received_at_ms, 1_700_000_000_000);
    }

    #[test]
    fn test_missing_fields_get_placeholders() {
        let mut core = ChannelCore::new();
        let outcome =
            core.handle_message(r#"{"type":"callback-due","lead_id":9}"#, 5);
        let MessageOutcome::Notification { record, .. } = outcome else {
            panic!("expected a notification");
        };
        assert_eq!(record.lead_name, "Unknown");
        assert_eq!(record.lead_phone, "—");
        assert_eq!(record.message, "Callback due for Unknown");
        assert_eq!(record.urgency, Urgency::Normal);
    }

    #[test]
    fn test_dismiss_absent_id_is_noop() {
        let mut core = ChannelCore::new();
        core.handle_message(&callback_due_json(1, "A"), 10);
        let before = core.records().to_vec();
        core.dismiss("no-such-id");
        assert_eq!(core.records(), &before[..]);
    }

    #[test]
    fn test_dismiss_removes_only_the_target() {
        let mut core = ChannelCore::new();
        core.handle_message(&callback_due_json(1, "A"), 10);
        core.handle_message(&callback_due_json(2, "B"), 20);
        core.dismiss("1-10");
        assert_eq!(core.records().len(), 1);
        assert_eq!(core.records()[0].lead_id, 2);
    }

    #[test]
    fn test_dismiss_all_empties_regardless_of_content() {
        let mut core = ChannelCore::new();
        for i in 0..4 {
            core.handle_message(&callback_due_json(i, "X"), i as u64);
        }
        core.dismiss_all();
        assert!(core.records().is_empty());
    }

    #[test]
    fn test_liveness_frames_do_not_touch_the_queue() {
        let mut core = ChannelCore::new();
        core.handle_message(&callback_due_json(1, "A"), 10);
        assert_eq!(
            core.handle_message(r#"{"type":"heartbeat"}"#, 20),
            MessageOutcome::Liveness
        );
        assert_eq!(
            core.handle_message(r#"{"type":"pong"}"#, 30),
            MessageOutcome::Liveness
        );
        assert_eq!(core.records().len(), 1);
    }

    #[test]
    fn test_unknown_and_malformed_frames_are_ignored() {
        let mut core = ChannelCore::new();
        assert_eq!(
            core.handle_message(r#"{"type":"discount-changed"}"#, 1),
            MessageOutcome::Ignored
        );
        assert_eq!(core.handle_message("{not json", 2), MessageOutcome::Ignored);
        assert_eq!(core.handle_message("", 3), MessageOutcome::Ignored);
        assert!(core.records().is_empty());
    }

    #[test]
    fn test_backoff_doubles_and_caps_at_thirty_seconds() {
        let mut core = ChannelCore::new();
        let expected = [1_000, 2_000, 4_000, 8_000, 16_000, 30_000, 30_000];
        for (n, want) in expected.iter().enumerate() {
            assert_eq!(core.reconnect_attempt(), n as u32);
            assert_eq!(core.handle_close(), Some(*want));
            // The counter moves as soon as the close is observed, not after
            // the delay elapses.
            assert_eq!(core.reconnect_attempt(), n as u32 + 1);
            core.begin_connect();
        }
    }

    #[test]
    fn test_close_while_already_closed_schedules_nothing() {
        let mut core = ChannelCore::new();
        assert!(core.handle_close().is_some());
        assert_eq!(core.handle_close(), None);
        assert_eq!(core.reconnect_attempt(), 1);
    }

    #[test]
    fn test_open_resets_attempt_counter_and_connectivity() {
        let mut core = ChannelCore::new();
        for _ in 0..3 {
            core.handle_close();
            core.begin_connect();
        }
        assert_eq!(core.reconnect_attempt(), 3);
        assert!(!core.is_connected());
        core.handle_open();
        assert_eq!(core.reconnect_attempt(), 0);
        assert!(core.is_connected());
    }

    #[test]
    fn test_sound_flag_snapshot_in_outcome() {
        let mut core = ChannelCore::new();
        assert!(core.sound_enabled());
        core.toggle_sound();
        let outcome = core.handle_message(&callback_due_json(3, "C"), 40);
        let MessageOutcome::Notification { play_sound, .. } = outcome else {
            panic!("expected a notification");
        };
        assert!(!play_sound);
        core.toggle_sound();
        assert!(core.sound_enabled());
    }
}
