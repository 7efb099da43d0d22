//! Side-effect collaborators of the notification channel: chime playback and
//! platform-level notifications. Both are fire-and-forget; neither failure
//! mode reaches the channel state machine.

use web_sys::{Notification, NotificationOptions, NotificationPermission};

use super::core::NotificationRecord;

const ALERT_SOUND_SRC: &str = "/static/sounds/callback-alert.mp3";
const NEW_LEAD_SOUND_SRC: &str = "/static/sounds/new-lead.mp3";

/// Play the callback chime. Browsers reject `play()` before the first user
/// gesture; a missed chime is acceptable.
pub fn play_alert() {
    play(ALERT_SOUND_SRC);
}

/// Softer chime used by the lead watcher.
pub fn play_new_lead_alert() {
    play(NEW_LEAD_SOUND_SRC);
}

fn play(src: &str) {
    if let Ok(audio) = web_sys::HtmlAudioElement::new_with_src(src) {
        let _ = audio.play();
    }
}

/// Ask for platform-notification permission once, if the user has not
/// decided yet. The promise is not awaited: the grant state is re-read on
/// every raise.
pub fn request_permission_if_undecided() {
    if Notification::permission() == NotificationPermission::Default {
        let _ = Notification::request_permission();
    }
}

/// Raise a platform notification for a freshly queued record.
///
/// Tagged with the lead id so repeat callbacks for the same lead replace the
/// previous notification instead of stacking. Skipped entirely unless the
/// user already granted permission.
pub fn raise_platform_notification(record: &NotificationRecord) {
    if Notification::permission() != NotificationPermission::Granted {
        return;
    }
    let options = NotificationOptions::new();
    options.set_body(&record.message);
    options.set_tag(&record.lead_id.to_string());
    let title = format!("Callback due: {}", record.lead_name);
    let _ = Notification::new_with_options(&title, &options);
}
