//! Preview pane and render plumbing
//!
//! The webview surface recreates the sandboxed iframe on every render. The
//! write happens asynchronously, so failures are handled when the script
//! reports back rather than through the synchronous return value. A failed
//! write shows the fallback document in that same frame, and a frame that a
//! newer render already replaced is never touched again.

use crate::js_interop::{self, FrameWrite, PREVIEW_CONTAINER_ID};
use crate::state::{AppState, DebounceTask};
use dioxus::prelude::*;
use livepen_core::preview::fallback_document;
use livepen_core::{FragmentKind, PreviewSurface, SurfaceError};

/// Preview surface backed by the iframe inside [`PREVIEW_CONTAINER_ID`]
///
/// Holds the app state only to report failures once the write completes;
/// it must not borrow the state while a render is in progress.
#[derive(Clone, Copy)]
pub struct WebviewSurface {
    state: Signal<AppState>,
}

impl WebviewSurface {
    pub fn new(state: Signal<AppState>) -> Self {
        Self { state }
    }
}

impl PreviewSurface for WebviewSurface {
    fn replace_and_write(&mut self, document: &str) -> std::result::Result<(), SurfaceError> {
        let mut state = self.state;
        let html = document.to_string();
        spawn(async move {
            match js_interop::replace_preview(&html).await {
                Ok(FrameWrite::Written) => {}
                Ok(FrameWrite::Superseded) => {
                    tracing::debug!("Preview frame replaced by a newer render");
                }
                Ok(FrameWrite::Failed { frame, message }) => {
                    tracing::warn!("Error updating preview: {}", message);
                    state
                        .write()
                        .handle_render_result(Err(SurfaceError::Write(message.clone())));
                    show_fallback(frame, &message).await;
                }
                Err(SurfaceError::Missing(id)) => {
                    tracing::error!("Preview container `{}` not found", id);
                    state.write().mark_preview_unavailable();
                }
                Err(e @ SurfaceError::Write(_)) => {
                    tracing::warn!("Error updating preview: {}", e);
                    state.write().handle_render_result(Err(e));
                }
            }
        });
        Ok(())
    }
}

/// Put the error document into the frame whose write failed
async fn show_fallback(frame: u64, message: &str) {
    match js_interop::write_into_frame(frame, &fallback_document(message)).await {
        Ok(FrameWrite::Written | FrameWrite::Superseded) => {}
        Ok(FrameWrite::Failed { message, .. }) => {
            tracing::error!("Failed to show preview error: {}", message);
        }
        Err(e) => tracing::error!("Failed to show preview error: {}", e),
    }
}

/// Render right away (Run, Refresh, startup)
pub fn run_preview(mut state: Signal<AppState>) {
    let mut surface = WebviewSurface::new(state);
    state.write().run(&mut surface);
}

/// Record an edit and (re)start the debounce countdown
pub fn schedule_render(mut state: Signal<AppState>, kind: FragmentKind, text: String) {
    let (ticket, delay) = {
        let mut s = state.write();
        let ticket = s.playground.edit(kind, text);
        (ticket, s.playground.debounce())
    };

    let task = spawn(async move {
        tokio::time::sleep(delay).await;
        let mut surface = WebviewSurface::new(state);
        state.write().debounce_elapsed(ticket, &mut surface);
    });

    state.write().playground.attach_timer(ticket, DebounceTask(task));
}

/// Right-hand pane hosting the preview iframe
#[component]
pub fn PreviewPane() -> Element {
    let state = use_context::<Signal<AppState>>();
    let unavailable = state.read().preview_unavailable;

    rsx! {
        div { class: "preview-pane",
            div { class: "pane-header",
                span { class: "pane-title", "Preview" }
            }
            if unavailable {
                div { class: "preview-unavailable", "Preview is unavailable" }
            }
            div {
                id: PREVIEW_CONTAINER_ID,
                class: "preview-container",
            }
        }
    }
}
