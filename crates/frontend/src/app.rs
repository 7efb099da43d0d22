use leptos::prelude::*;

use crate::dashboards::LiveActivityDashboard;
use crate::layout::Shell;
use crate::system::notifications::service::{NotificationHost, NotificationService};
use crate::system::session::context::SessionProvider;

#[component]
pub fn App() -> impl IntoView {
    // One channel service for the whole app; the host below owns its
    // lifecycle, everything else only reads it from context.
    provide_context(NotificationService::new());

    view! {
        <SessionProvider>
            <NotificationHost />
            <Shell center=|| view! { <LiveActivityDashboard /> }.into_any() />
        </SessionProvider>
    }
}
