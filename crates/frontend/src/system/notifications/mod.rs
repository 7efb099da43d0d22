//! Live notification channel: one WebSocket per session, scoped to the
//! signed-in agent, translated into a bounded queue of dismissible records.

pub mod alerts;
pub mod core;
pub mod service;
pub mod transport;
pub mod ui;
