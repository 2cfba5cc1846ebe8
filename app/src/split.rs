//! Resizable editor / preview split

use crate::editor::Editor;
use crate::js_interop::{self, SPLIT_CONTAINER_ID};
use crate::preview::PreviewPane;
use crate::settings;
use crate::state::AppState;
use dioxus::prelude::*;

/// Editor and preview separated by a draggable handle
///
/// The panes sit side by side on wide windows and stack on narrow ones (see
/// the breakpoint in style.css).
#[component]
pub fn SplitView() -> Element {
    let mut state = use_context::<Signal<AppState>>();

    let (editor_percent, preview_percent, dragging) = {
        let s = state.read();
        (
            s.split.editor_percent(),
            s.split.preview_percent(),
            s.is_dragging(),
        )
    };

    rsx! {
        div {
            id: SPLIT_CONTAINER_ID,
            class: if dragging { "split-container dragging" } else { "split-container" },
            onmousemove: move |evt| {
                if state.read().is_dragging() {
                    let point = evt.client_coordinates();
                    state.write().drag_to(point.x, point.y);
                }
            },
            onmouseup: move |_| finish_drag(state),
            onmouseleave: move |_| finish_drag(state),
            ontouchmove: move |evt| {
                if !state.read().is_dragging() {
                    return;
                }
                if let Some(touch) = evt.touches().first() {
                    let point = touch.client_coordinates();
                    state.write().drag_to(point.x, point.y);
                }
            },
            ontouchend: move |_| finish_drag(state),

            div {
                class: "split-pane editor-side",
                style: "flex-basis: {editor_percent}%;",
                Editor {}
            }
            div {
                class: "resize-handle",
                onmousedown: move |evt| {
                    evt.prevent_default();
                    start_drag(state);
                },
                ontouchstart: move |_| start_drag(state),
            }
            div {
                class: "split-pane preview-side",
                style: "flex-basis: {preview_percent}%;",
                PreviewPane {}
            }
        }
    }
}

/// Capture the container bounds and begin following the pointer
fn start_drag(mut state: Signal<AppState>) {
    spawn(async move {
        if let Some(rect) = js_interop::split_container_rect().await {
            state.write().begin_drag(rect);
        } else {
            tracing::warn!("Split container not found, resize disabled");
        }
    });
}

/// Stop dragging and remember the new split
fn finish_drag(mut state: Signal<AppState>) {
    if state.write().end_drag() {
        settings::persist(&state.read().settings);
    }
}
