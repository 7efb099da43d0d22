//! TopHeader component - application top navigation bar.
//!
//! Contains:
//! - Product brand
//! - Channel connectivity indicator
//! - Notification bell with the callback panel
//! - Agent identity

use leptos::prelude::*;

use crate::shared::icons::icon;
use crate::system::notifications::service::NotificationService;
use crate::system::notifications::ui::panel::NotificationBell;
use crate::system::session::context::use_session;

#[component]
pub fn TopHeader() -> impl IntoView {
    let notifications = use_context::<NotificationService>()
        .expect("NotificationService not provided in context");
    let session = use_session();

    let agent_label = move || {
        session
            .agent
            .get()
            .map(|a| a.display_name().to_string())
            .unwrap_or_else(|| "Signing in…".to_string())
    };

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <span class="top-header__title">"CoD CRM"</span>
            </div>

            <div class="top-header__actions">
                // Persistent reconnecting indicator; the channel keeps
                // retrying on its own, this only tells the agent why the
                // bell went quiet.
                <Show when=move || !notifications.is_connected()>
                    <span class="top-header__reconnecting" title="Notification channel is down">
                        {icon("wifi-off")}
                        " Reconnecting…"
                    </span>
                </Show>

                <NotificationBell />

                <div class="top-header__user">
                    {icon("user")}
                    <span>{agent_label}</span>
                    <Show when=move || session.offline_fallback.get()>
                        <span class="top-header__offline-tag" title="Showing cached profile">
                            "offline"
                        </span>
                    </Show>
                </div>
            </div>
        </div>
    }
}
