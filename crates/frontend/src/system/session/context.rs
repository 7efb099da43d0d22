use contracts::system::session::AgentProfile;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};
use crate::shared::storage::BrowserStorage;

/// Who is signed in, resolved once at startup.
#[derive(Clone, Copy)]
pub struct SessionContext {
    pub agent: RwSignal<Option<AgentProfile>>,
    /// True when the profile came from the localStorage cache because the
    /// backend was unreachable.
    pub offline_fallback: RwSignal<bool>,
}

/// Session context provider component.
#[component]
pub fn SessionProvider(children: ChildrenFn) -> impl IntoView {
    let agent = RwSignal::new(None::<AgentProfile>);
    let offline_fallback = RwSignal::new(false);

    Effect::new(move |_| {
        spawn_local(async move {
            match api::get_current_agent().await {
                Ok(profile) => {
                    storage::save_cached_profile(&BrowserStorage, &profile);
                    agent.set(Some(profile));
                }
                Err(e) => match storage::load_cached_profile(&BrowserStorage) {
                    Some(cached) => {
                        log::warn!("session: profile fetch failed ({e}), using cached profile");
                        offline_fallback.set(true);
                        agent.set(Some(cached));
                    }
                    None => {
                        log::warn!("session: profile fetch failed and no cached profile: {e}");
                    }
                },
            }
        });
    });

    provide_context(SessionContext {
        agent,
        offline_fallback,
    });

    children()
}

/// Hook to access the session context.
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionProvider not found in component tree")
}
