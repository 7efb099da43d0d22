//! Live activity dashboard: the call-center's at-a-glance view of channel
//! connectivity and lead-register growth.

use leptos::prelude::*;
use thaw::*;
use wasm_bindgen::JsValue;

use crate::domain::a001_lead::watch::{use_lead_watch, LeadWatchOptions, NewLeadAlert};
use crate::shared::date_utils::format_datetime_opt;
use crate::shared::icons::icon;
use crate::system::notifications::service::NotificationService;

fn format_clock(ms: u64) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(ms as f64));
    String::from(date.to_locale_time_string("en-GB"))
}

#[component]
pub fn LiveActivityDashboard() -> impl IntoView {
    let svc = use_context::<NotificationService>()
        .expect("NotificationService not provided in context");

    let last_alert = RwSignal::new(None::<NewLeadAlert>);
    let watch = use_lead_watch(LeadWatchOptions {
        on_new_leads: Some(Callback::new(move |alert: NewLeadAlert| {
            last_alert.set(Some(alert));
        })),
        ..LeadWatchOptions::default()
    });

    let check_now = move |_| watch.check_now();

    view! {
        <div class="page__header">
            <div class="page__header-left">
                <h1 class="page__title">"Live activity"</h1>
                <Badge>{move || watch.total.get().to_string()}</Badge>
            </div>
            <div class="page__header-right">
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=check_now
                    disabled=Signal::derive(move || watch.busy.get())
                >
                    {icon("refresh")}
                    {move || if watch.busy.get() { " Checking..." } else { " Check now" }}
                </Button>
            </div>
        </div>

        <div class="page__content">
            {move || watch.error.get().map(|e| view! {
                <div class="alert alert--error">"Lead check failed: " {e}</div>
            })}

            <Flex gap=FlexGap::Small>
                <div class="stat-card">
                    <div class="stat-card__label">"Channel"</div>
                    <div class="stat-card__value">
                        <Show
                            when=move || svc.is_connected()
                            fallback=|| view! {
                                <span class="stat-card__status stat-card__status--down">
                                    {icon("wifi-off")}
                                    " Reconnecting…"
                                </span>
                            }
                        >
                            <span class="stat-card__status stat-card__status--live">
                                {icon("activity")}
                                " Live"
                            </span>
                        </Show>
                    </div>
                </div>

                <div class="stat-card">
                    <div class="stat-card__label">"Total leads"</div>
                    <div class="stat-card__value">{move || watch.total.get().to_string()}</div>
                </div>

                <div class="stat-card">
                    <div class="stat-card__label">"Last increase"</div>
                    <div class="stat-card__value">
                        {move || {
                            let delta = watch.delta.get();
                            if delta == 0 { "-".to_string() } else { format!("+{delta}") }
                        }}
                    </div>
                </div>

                <div class="stat-card">
                    <div class="stat-card__label">"Last check"</div>
                    <div class="stat-card__value">
                        {move || watch
                            .last_checked_ms
                            .get()
                            .map(format_clock)
                            .unwrap_or_else(|| "-".to_string())}
                        <Show when=move || watch.busy.get()>
                            <Spinner />
                        </Show>
                    </div>
                </div>
            </Flex>

            {move || last_alert.get().map(|alert| {
                let newest = alert.newest.map(|lead| {
                    let city = lead.city.map(|c| format!(" ({c})")).unwrap_or_default();
                    format!(
                        "{}{}, registered {}",
                        lead.name,
                        city,
                        format_datetime_opt(&lead.created_at)
                    )
                });
                view! {
                    <div class="alert alert--info">
                        {format!("+{} new lead(s)", alert.delta)}
                        {newest.map(|n| format!(", newest: {n}"))}
                    </div>
                }
            })}
        </div>
    }
}
