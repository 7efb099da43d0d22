//! Interval watcher for new leads.
//!
//! Polls the lead register, compares the total against the persisted
//! baseline, and announces growth to the caller. Push notifications cover
//! callbacks; this covers the register itself, which only changes a few
//! times an hour and is cheap to poll.

pub mod cycle;

use contracts::domain::a001_lead::LeadSummary;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::shared::storage::BrowserStorage;
use crate::system::notifications::alerts;

use super::api;

pub const DEFAULT_POLL_INTERVAL_MS: i32 = 30_000;

/// How many leads to pull per poll; only the newest one is ever announced.
const POLL_PAGE_SIZE: u32 = 5;

#[derive(Clone)]
pub struct LeadWatchOptions {
    pub interval_ms: i32,
    pub enabled: bool,
    pub sound_enabled: bool,
    pub on_new_leads: Option<Callback<NewLeadAlert>>,
}

impl Default for LeadWatchOptions {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            enabled: true,
            sound_enabled: true,
            on_new_leads: None,
        }
    }
}

/// Payload handed to the new-lead callback.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLeadAlert {
    pub delta: u32,
    pub newest: Option<LeadSummary>,
}

/// Reactive view of the watcher, handed back to the owning component.
#[derive(Clone, Copy)]
pub struct LeadWatchHandle {
    pub total: RwSignal<u32>,
    /// Size of the last announced increase.
    pub delta: RwSignal<u32>,
    pub last_checked_ms: RwSignal<Option<u64>>,
    pub busy: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    /// In-memory copy of the baseline; concurrent cycles compare against
    /// this, so a delta is reported at most once even when `check_now` races
    /// the interval tick.
    baseline: RwSignal<Option<u32>>,
    options: StoredValue<LeadWatchOptions>,
}

impl LeadWatchHandle {
    /// Run one poll cycle immediately. Safe next to the scheduled timer:
    /// cycles are independent and idempotent about announcements.
    pub fn check_now(&self) {
        run_cycle(*self);
    }
}

fn run_cycle(handle: LeadWatchHandle) {
    handle.busy.set(true);
    spawn_local(async move {
        let fetched = api::fetch_recent_leads(POLL_PAGE_SIZE).await;
        let baseline = handle.baseline.get_untracked();
        let effects =
            cycle::evaluate_cycle(baseline, fetched.as_ref().map_err(|e| e.as_str()));

        if let Some(total) = effects.accepted_total {
            // In-memory baseline first, persisted copy second: whatever runs
            // next already sees the acknowledged count.
            handle.baseline.set(Some(total));
            handle.total.set(total);
            cycle::write_baseline(&BrowserStorage, total);
            handle.error.set(None);
        }

        if let Some(delta) = effects.announce_delta {
            handle.delta.set(delta);
            let options = handle.options.get_value();
            if options.sound_enabled {
                alerts::play_new_lead_alert();
            }
            if let Some(on_new_leads) = options.on_new_leads {
                on_new_leads.run(NewLeadAlert {
                    delta,
                    newest: fetched.as_ref().ok().and_then(|p| p.newest().cloned()),
                });
            }
        }

        if let Some(error) = effects.error {
            handle.error.set(Some(error));
        }

        handle.last_checked_ms.set(Some(js_sys::Date::now() as u64));
        handle.busy.set(false);
    });
}

/// Start watching the lead register. The interval lives until the calling
/// component unmounts; a failed cycle never stops it.
pub fn use_lead_watch(options: LeadWatchOptions) -> LeadWatchHandle {
    let initial_baseline = cycle::read_baseline(&BrowserStorage);
    let enabled = options.enabled;
    let interval_ms = options.interval_ms;

    let handle = LeadWatchHandle {
        total: RwSignal::new(initial_baseline.unwrap_or(0)),
        delta: RwSignal::new(0),
        last_checked_ms: RwSignal::new(None),
        busy: RwSignal::new(false),
        error: RwSignal::new(None),
        baseline: RwSignal::new(initial_baseline),
        options: StoredValue::new(options),
    };

    if enabled {
        run_cycle(handle);

        let interval_id = StoredValue::new(None::<i32>);
        let tick = Closure::wrap(Box::new(move || run_cycle(handle)) as Box<dyn FnMut()>);
        if let Some(window) = web_sys::window() {
            if let Ok(id) = window.set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref::<js_sys::Function>(),
                interval_ms,
            ) {
                interval_id.set_value(Some(id));
            }
        }
        tick.forget();

        on_cleanup(move || {
            if let Some(id) = interval_id.get_value() {
                if let Some(window) = web_sys::window() {
                    window.clear_interval_with_handle(id);
                }
            }
        });
    }

    handle
}
