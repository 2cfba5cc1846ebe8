//! Bottom status bar component

use crate::state::{AUTOSAVE_INDICATOR_DURATION, AppState};
use dioxus::prelude::*;

/// Application version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Bottom status bar showing application state
#[component]
pub fn StatusBar() -> Element {
    let state = use_context::<Signal<AppState>>();

    let (status_text, renders, online, modified, last_autosave) = {
        let s = state.read();
        let status = if s.preview_unavailable {
            "Preview unavailable"
        } else if s.render_pending() {
            "Waiting for changes to settle"
        } else {
            "Ready"
        };
        (
            status,
            s.playground.render_count(),
            s.online,
            s.playground.sources().is_modified(),
            s.last_autosave,
        )
    };

    rsx! {
        div { class: "status-bar",
            span { class: "status-item", "{status_text}" }
            span { class: "status-item", "Renders: {renders}" }
            if modified {
                span { class: "status-item unsaved", "Modified" }
            }
            if let Some(saved_at) = last_autosave {
                AutoSavedBadge { key: "{saved_at.timestamp_millis()}" }
            }
            if !online {
                span { class: "status-item offline", "Offline" }
            }
            span { class: "status-item version", "v{VERSION}" }
        }
    }
}

/// Transient "Auto-saved" marker; keyed by save time so each save shows it again
#[component]
fn AutoSavedBadge() -> Element {
    let mut visible = use_signal(|| true);

    use_hook(move || {
        spawn(async move {
            tokio::time::sleep(AUTOSAVE_INDICATOR_DURATION).await;
            visible.set(false);
        })
    });

    rsx! {
        if visible() {
            span { class: "status-item autosaved", "Auto-saved" }
        }
    }
}
