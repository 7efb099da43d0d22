//! Context service wiring the channel core to the browser: one socket, one
//! reconnect timer, one keep-alive timer, all owned here and released
//! together on teardown.

use std::rc::Rc;

use contracts::system::channel::PING_FRAME;
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::shared::api_utils::ws_url;
use crate::system::session::context::use_session;

use super::alerts;
use super::core::{ChannelCore, MessageOutcome, NotificationRecord, KEEP_ALIVE_INTERVAL_MS};
use super::transport::{ChannelTransport, SocketHandle, TransportEvents, WsTransport};

/// Reactive facade over the notification channel.
///
/// Provided once at the app root; any component may copy it out of context
/// to read the queue or connectivity, dismiss records, or toggle sound. The
/// socket and timer handles live in local (UI-thread) storage because they
/// wrap JS values; the state machine itself is plain data inside a signal.
#[derive(Clone, Copy)]
pub struct NotificationService {
    core: RwSignal<ChannelCore>,
    /// Bumped on every connect and on teardown. Socket callbacks and timers
    /// carry the generation they were created under and go quiet once it is
    /// stale, so a superseded connection can never feed the state machine.
    generation: StoredValue<u64>,
    transport: StoredValue<Rc<dyn ChannelTransport>, LocalStorage>,
    socket: StoredValue<Option<SocketHandle>, LocalStorage>,
    reconnect_timer: StoredValue<Option<i32>>,
    keep_alive_timer: StoredValue<Option<i32>>,
    endpoint: StoredValue<String>,
}

impl NotificationService {
    pub fn new() -> Self {
        Self::with_transport(Rc::new(WsTransport))
    }

    pub fn with_transport(transport: Rc<dyn ChannelTransport>) -> Self {
        Self {
            core: RwSignal::new(ChannelCore::new()),
            generation: StoredValue::new(0),
            transport: StoredValue::new_local(transport),
            socket: StoredValue::new_local(None),
            reconnect_timer: StoredValue::new(None),
            keep_alive_timer: StoredValue::new(None),
            endpoint: StoredValue::new(String::new()),
        }
    }

    // ── Public contract ─────────────────────────────────────────────

    /// Current queue, most recent first, at most 10 entries. Reactive.
    pub fn notifications(&self) -> Vec<NotificationRecord> {
        self.core.with(|c| c.records().to_vec())
    }

    /// Reactive connectivity flag; the only externally visible failure
    /// signal this service has.
    pub fn is_connected(&self) -> bool {
        self.core.with(|c| c.is_connected())
    }

    pub fn sound_enabled(&self) -> bool {
        self.core.with(|c| c.sound_enabled())
    }

    pub fn toggle_sound(&self) {
        self.core.update(|c| c.toggle_sound());
    }

    pub fn dismiss(&self, id: &str) {
        let id = id.to_string();
        self.core.update(|c| c.dismiss(&id));
    }

    pub fn dismiss_all(&self) {
        self.core.update(|c| c.dismiss_all());
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Open the channel for the given agent. Called once per session by
    /// [`NotificationHost`].
    pub fn start(&self, agent_id: i64) {
        alerts::request_permission_if_undecided();
        self.endpoint
            .set_value(ws_url(&format!("/ws/agent-alerts?agent_id={agent_id}")));
        self.connect();
    }

    /// Tear everything down: cancel both timers, close the socket, and
    /// invalidate every callback still in flight. No further transitions.
    pub fn shutdown(&self) {
        self.generation.update_value(|g| *g += 1);
        self.clear_reconnect_timer();
        self.stop_keep_alive();
        let mut socket = None;
        self.socket.update_value(|slot| socket = slot.take());
        if let Some(socket) = socket {
            socket.close();
        }
    }

    fn connect(&self) {
        let generation = self.generation.get_value() + 1;
        self.generation.set_value(generation);
        self.clear_reconnect_timer();
        self.stop_keep_alive();

        // Drop the previous connection, if any, together with its callbacks.
        // Safe here: connect() only ever runs from the reconnect timer or
        // start(), never from inside a socket callback.
        let mut previous = None;
        self.socket.update_value(|slot| previous = slot.take());
        if let Some(previous) = previous {
            previous.close();
        }

        self.core.update(|c| c.begin_connect());

        let svc = *self;
        let events = TransportEvents {
            on_open: Box::new(move || {
                if svc.generation.get_value() == generation {
                    svc.handle_open(generation);
                }
            }),
            on_message: Box::new(move |raw| {
                if svc.generation.get_value() == generation {
                    svc.handle_message(&raw);
                }
            }),
            on_close: Box::new(move || {
                if svc.generation.get_value() == generation {
                    svc.handle_close();
                }
            }),
        };

        let url = self.endpoint.get_value();
        let connected = self.transport.with_value(|t| t.connect(&url, events));
        match connected {
            Ok(handle) => self.socket.update_value(|slot| *slot = Some(handle)),
            Err(e) => {
                // Same recovery as a failed handshake: back off and retry.
                log::warn!("notification channel: connect failed: {e}");
                self.handle_close();
            }
        }
    }

    fn handle_open(&self, generation: u64) {
        self.core.update(|c| c.handle_open());
        self.start_keep_alive(generation);
    }

    fn handle_message(&self, raw: &str) {
        let now_ms = js_sys::Date::now() as u64;
        let outcome = self.core.try_update(|c| c.handle_message(raw, now_ms));
        if let Some(MessageOutcome::Notification { record, play_sound }) = outcome {
            if play_sound {
                alerts::play_alert();
            }
            alerts::raise_platform_notification(&record);
        }
    }

    fn handle_close(&self) {
        self.stop_keep_alive();
        // The dead SocketHandle stays in its slot until the next connect():
        // this may run from inside the socket's own close callback, and the
        // closure must not be dropped while executing.
        let delay = self.core.try_update(|c| c.handle_close()).flatten();
        if let Some(delay_ms) = delay {
            self.schedule_reconnect(delay_ms);
        }
    }

    fn schedule_reconnect(&self, delay_ms: u64) {
        self.clear_reconnect_timer();
        let generation = self.generation.get_value();
        let svc = *self;
        let fire = Closure::wrap(Box::new(move || {
            svc.reconnect_timer.set_value(None);
            if svc.generation.get_value() == generation {
                svc.connect();
            }
        }) as Box<dyn FnMut()>);
        if let Some(window) = web_sys::window() {
            if let Ok(id) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                fire.as_ref().unchecked_ref::<js_sys::Function>(),
                delay_ms as i32,
            ) {
                self.reconnect_timer.set_value(Some(id));
            }
        }
        fire.forget();
    }

    fn clear_reconnect_timer(&self) {
        if let Some(id) = self.reconnect_timer.get_value() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(id);
            }
            self.reconnect_timer.set_value(None);
        }
    }

    fn start_keep_alive(&self, generation: u64) {
        self.stop_keep_alive();
        let svc = *self;
        let tick = Closure::wrap(Box::new(move || {
            if svc.generation.get_value() != generation {
                return;
            }
            svc.socket.with_value(|slot| {
                if let Some(handle) = slot {
                    handle.send(PING_FRAME);
                }
            });
        }) as Box<dyn FnMut()>);
        if let Some(window) = web_sys::window() {
            if let Ok(id) = window.set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref::<js_sys::Function>(),
                KEEP_ALIVE_INTERVAL_MS,
            ) {
                self.keep_alive_timer.set_value(Some(id));
            }
        }
        tick.forget();
    }

    fn stop_keep_alive(&self) {
        if let Some(id) = self.keep_alive_timer.get_value() {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(id);
            }
            self.keep_alive_timer.set_value(None);
        }
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Mounts the channel exactly once per session.
///
/// Waits for the agent session to resolve (the socket URL is scoped by agent
/// id), then starts the service from context. Renders nothing; teardown
/// happens in `on_cleanup` when the shell unmounts.
#[component]
pub fn NotificationHost() -> impl IntoView {
    let svc = use_context::<NotificationService>()
        .expect("NotificationService not provided in context (provide it in app root)");
    let session = use_session();

    let started = StoredValue::new(false);
    Effect::new(move |_| {
        if started.get_value() {
            return;
        }
        if let Some(agent) = session.agent.get() {
            started.set_value(true);
            svc.start(agent.id);
        }
    });

    on_cleanup(move || svc.shutdown());
}
