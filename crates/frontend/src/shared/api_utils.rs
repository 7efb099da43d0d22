//! URL helpers for frontend-backend communication.
//!
//! The CRM backend serves REST and the notification socket from the same
//! host as the dashboard, on port 3000.

/// Base URL for REST requests, derived from the current window location.
///
/// Returns an empty string when no window is available so that callers can
/// still build relative URLs in non-browser contexts.
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full REST URL from a path starting with `/api/`.
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Build a WebSocket URL from a path, swapping the scheme to ws/wss.
pub fn ws_url(path: &str) -> String {
    let base = api_base();
    let base = if let Some(rest) = base.strip_prefix("https:") {
        format!("wss:{}", rest)
    } else if let Some(rest) = base.strip_prefix("http:") {
        format!("ws:{}", rest)
    } else {
        base
    };
    format!("{}{}", base, path)
}
