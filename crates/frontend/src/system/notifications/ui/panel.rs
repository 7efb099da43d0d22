//! Bell button + dropdown panel for pending callback notifications.

use leptos::prelude::*;
use thaw::*;
use wasm_bindgen::JsValue;

use crate::shared::icons::icon;
use crate::system::notifications::core::NotificationRecord;
use crate::system::notifications::service::NotificationService;
use contracts::system::channel::Urgency;

fn format_arrival(ms: u64) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(ms as f64));
    String::from(date.to_locale_time_string("en-GB"))
}

/// Header bell with unread count; opens the notification panel.
#[component]
pub fn NotificationBell() -> impl IntoView {
    let svc = use_context::<NotificationService>()
        .expect("NotificationService not provided in context");
    let (panel_open, set_panel_open) = signal(false);

    // Close the panel when clicking anywhere outside it.
    Effect::new(move |_| {
        if panel_open.get() {
            use wasm_bindgen::prelude::*;
            use wasm_bindgen::JsCast;

            let closure = Closure::wrap(Box::new(move |_event: web_sys::MouseEvent| {
                set_panel_open.set(false);
            }) as Box<dyn FnMut(_)>);

            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    });

    let pending = move || svc.notifications().len();

    view! {
        <div class="notification-bell" style="position: relative;">
            <button
                class="top-header__icon-btn"
                on:click=move |ev| {
                    ev.stop_propagation();
                    set_panel_open.update(|open| *open = !*open);
                }
                title="Pending callbacks"
            >
                {icon("bell")}
                <Show when=move || { pending() > 0 }>
                    <span class="notification-bell__count">{pending}</span>
                </Show>
            </button>

            <Show when=move || panel_open.get()>
                <NotificationPanel />
            </Show>
        </div>
    }
}

/// Dropdown listing the queued records with dismiss / clear-all / sound
/// controls and the reconnecting indicator.
#[component]
fn NotificationPanel() -> impl IntoView {
    let svc = use_context::<NotificationService>()
        .expect("NotificationService not provided in context");

    view! {
        <div class="notification-panel" on:click=move |ev| ev.stop_propagation()>
            <div class="notification-panel__header">
                <span class="notification-panel__title">"Callbacks"</span>
                <Badge>{move || svc.notifications().len().to_string()}</Badge>
                <div class="notification-panel__actions">
                    <button
                        class="notification-panel__icon-btn"
                        on:click=move |_| svc.toggle_sound()
                        title=move || if svc.sound_enabled() { "Mute alerts" } else { "Unmute alerts" }
                    >
                        {move || icon(if svc.sound_enabled() { "sound-on" } else { "sound-off" })}
                    </button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| svc.dismiss_all()
                    >
                        "Clear all"
                    </Button>
                </div>
            </div>

            <Show when=move || !svc.is_connected()>
                <div class="notification-panel__reconnecting">
                    {icon("wifi-off")}
                    " Reconnecting…"
                </div>
            </Show>

            <Show
                when=move || !svc.notifications().is_empty()
                fallback=|| view! {
                    <div class="notification-panel__empty">"No pending callbacks"</div>
                }
            >
                <div class="notification-panel__list">
                    <For
                        each=move || svc.notifications()
                        key=|record| record.id.clone()
                        children=move |record: NotificationRecord| {
                            view! { <NotificationRow record=record /> }
                        }
                    />
                </div>
            </Show>
        </div>
    }
}

#[component]
fn NotificationRow(record: NotificationRecord) -> impl IntoView {
    let svc = use_context::<NotificationService>()
        .expect("NotificationService not provided in context");

    let urgency_class = match record.urgency {
        Urgency::High => "notification-card__urgency notification-card__urgency--high",
        Urgency::Normal => "notification-card__urgency",
    };
    let record_id = record.id.clone();

    view! {
        <div class="notification-card">
            <div class="notification-card__main">
                <div class="notification-card__top">
                    <span class="notification-card__name">{record.lead_name.clone()}</span>
                    <span class=urgency_class>
                        {match record.urgency {
                            Urgency::High => "high",
                            Urgency::Normal => "normal",
                        }}
                    </span>
                    <span class="notification-card__time">
                        {format_arrival(record.received_at_ms)}
                    </span>
                </div>
                <div class="notification-card__message">{record.message.clone()}</div>
                <div class="notification-card__phone">
                    {icon("phone")}
                    <span>{record.lead_phone.clone()}</span>
                </div>
            </div>
            <button
                class="notification-card__dismiss"
                on:click=move |_| svc.dismiss(&record_id)
                title="Dismiss"
            >
                {icon("close")}
            </button>
        </div>
    }
}
