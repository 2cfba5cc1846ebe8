//! Toast notifications and the touch hint

use crate::state::{AppState, NOTIFICATION_DURATION, Notification, TOUCH_HINT_DURATION};
use dioxus::prelude::*;

/// Stack of transient toasts in the corner of the window
#[component]
pub fn NotificationStack() -> Element {
    let state = use_context::<Signal<AppState>>();
    let notifications = state.read().notifications.clone();

    rsx! {
        div { class: "notification-stack",
            for notification in notifications {
                Toast { key: "{notification.id}", notification }
            }
        }
    }
}

/// A single toast; removes itself after [`NOTIFICATION_DURATION`]
#[component]
fn Toast(notification: Notification) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let id = notification.id;

    use_hook(move || {
        spawn(async move {
            tokio::time::sleep(NOTIFICATION_DURATION).await;
            state.write().dismiss(id);
        })
    });

    rsx! {
        div {
            class: "notification {notification.kind.class()}",
            onclick: move |_| state.write().dismiss(id),
            "{notification.message}"
        }
    }
}

/// One-time hint shown on touch devices
#[component]
pub fn TouchHint() -> Element {
    let mut state = use_context::<Signal<AppState>>();

    use_hook(move || {
        spawn(async move {
            tokio::time::sleep(TOUCH_HINT_DURATION).await;
            state.write().dismiss_touch_hint();
        })
    });

    rsx! {
        div { class: "touch-hint",
            p { "Tap a tab to switch between HTML, CSS and JS. Drag the divider to resize the editor and preview." }
            button {
                class: "modal-button",
                onclick: move |_| state.write().dismiss_touch_hint(),
                "Got it"
            }
        }
    }
}
