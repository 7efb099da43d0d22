//! Transport capability of the notification channel.
//!
//! The state machine never touches `web_sys::WebSocket` directly: it is
//! handed a [`ChannelTransport`] and drives whatever [`SocketHandle`] comes
//! back. Tests can substitute a transport that replays scripted events.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

/// Callbacks the transport fires into the state machine.
pub struct TransportEvents {
    pub on_open: Box<dyn Fn()>,
    pub on_message: Box<dyn Fn(String)>,
    pub on_close: Box<dyn Fn()>,
}

/// One live connection: send/close plus ownership of whatever must stay
/// alive for events to keep arriving (the JS callbacks, for WebSocket).
pub struct SocketHandle {
    send: Box<dyn Fn(&str)>,
    close: Box<dyn Fn()>,
    _keep_alive: Box<dyn std::any::Any>,
}

impl SocketHandle {
    pub fn new(
        send: Box<dyn Fn(&str)>,
        close: Box<dyn Fn()>,
        keep_alive: Box<dyn std::any::Any>,
    ) -> Self {
        Self {
            send,
            close,
            _keep_alive: keep_alive,
        }
    }

    /// Best-effort send. A dead socket reports itself through its close
    /// event, not through this path.
    pub fn send(&self, data: &str) {
        (self.send)(data);
    }

    pub fn close(&self) {
        (self.close)();
    }
}

pub trait ChannelTransport {
    /// Open a connection to `url`. Events fire on the UI thread until the
    /// returned handle is closed or dropped.
    fn connect(&self, url: &str, events: TransportEvents) -> Result<SocketHandle, String>;
}

/// Production transport over the browser WebSocket API.
#[derive(Clone, Copy, Default)]
pub struct WsTransport;

impl ChannelTransport for WsTransport {
    fn connect(&self, url: &str, events: TransportEvents) -> Result<SocketHandle, String> {
        let ws = WebSocket::new(url).map_err(|e| format!("WebSocket open failed: {e:?}"))?;

        let TransportEvents {
            on_open,
            on_message,
            on_close,
        } = events;

        let open_cb = Closure::wrap(Box::new(move || on_open()) as Box<dyn FnMut()>);
        ws.set_onopen(Some(open_cb.as_ref().unchecked_ref()));

        let msg_cb = Closure::wrap(Box::new(move |ev: MessageEvent| {
            // Binary frames are not part of the channel protocol.
            if let Some(text) = ev.data().as_string() {
                on_message(text);
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(msg_cb.as_ref().unchecked_ref()));

        // `error` is always followed by `close`, so close alone feeds the
        // state machine.
        let close_cb = Closure::wrap(Box::new(move |_ev: CloseEvent| on_close())
            as Box<dyn FnMut(CloseEvent)>);
        ws.set_onclose(Some(close_cb.as_ref().unchecked_ref()));

        let ws_send = ws.clone();
        let ws_close = ws.clone();
        Ok(SocketHandle::new(
            Box::new(move |data: &str| {
                if let Err(e) = ws_send.send_with_str(data) {
                    log::debug!("notification channel: send failed: {e:?}");
                }
            }),
            Box::new(move || {
                let _ = ws_close.close();
            }),
            Box::new((ws, open_cb, msg_cb, close_cb)),
        ))
    }
}
