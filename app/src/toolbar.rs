//! Top toolbar component with playground actions and window controls

use crate::preview::run_preview;
use crate::settings;
use crate::state::AppState;
use dioxus::desktop::DesktopContext;
use dioxus::prelude::*;

/// Top toolbar with playground actions and window controls
#[component]
pub fn Toolbar() -> Element {
    let state = use_context::<Signal<AppState>>();
    let window = dioxus::desktop::use_window();

    // Clone window for each closure that needs it
    let window_drag = window.clone();
    let window_min = window.clone();
    let window_max = window.clone();
    let window_close = window.clone();

    rsx! {
        div {
            class: "titlebar",
            onmousedown: move |_| { window_drag.drag(); },

            // Render controls
            RenderControls { state }

            // Snippets and sharing
            LibraryControls { state }

            // Title
            WindowTitle { state }

            ThemeToggle { state }

            // Window controls
            div { class: "window-controls",
                button {
                    class: "window-button minimize",
                    title: "Minimize",
                    onclick: move |_| window_min.set_minimized(true),
                    onmousedown: |e| e.stop_propagation(),
                    "-"
                }
                button {
                    class: "window-button maximize",
                    title: "Maximize",
                    onclick: {
                        let window_max = window_max.clone();
                        move |_| window_max.set_maximized(!window_max.is_maximized())
                    },
                    onmousedown: |e| e.stop_propagation(),
                    "[]"
                }
                button {
                    class: "window-button close",
                    title: "Close",
                    onclick: move |_| close_window(state, &window_close),
                    onmousedown: |e| e.stop_propagation(),
                    "x"
                }
            }
        }
    }
}

/// Run and Refresh
#[component]
fn RenderControls(state: Signal<AppState>) -> Element {
    rsx! {
        div { class: "toolbar-group",
            ToolbarButton {
                title: "Run (Ctrl+Enter)",
                label: "Run",
                class: "run",
                onclick: move |_| { run_preview(state); }
            }
            ToolbarButton {
                title: "Refresh preview",
                label: "Refresh",
                onclick: move |_| { run_preview(state); }
            }
        }
    }
}

/// Save, Load and Share
#[component]
fn LibraryControls(state: Signal<AppState>) -> Element {
    let mut state = state;

    rsx! {
        div { class: "toolbar-group",
            ToolbarButton {
                title: "Save snippet (Ctrl+S)",
                label: "Save",
                onclick: move |_| { state.write().open_save_dialog(); }
            }
            ToolbarButton {
                title: "Load snippet",
                label: "Load",
                onclick: move |_| { state.write().open_snippets(); }
            }
            ToolbarButton {
                title: "Share link",
                label: "Share",
                onclick: move |_| { state.write().open_share(); }
            }
        }
    }
}

/// Dark / light switch
#[component]
fn ThemeToggle(state: Signal<AppState>) -> Element {
    let mut state = state;
    let label = state.read().settings.theme.toggle_label();

    rsx! {
        div { class: "toolbar-group",
            ToolbarButton {
                title: "Toggle theme",
                label,
                onclick: move |_| {
                    state.write().toggle_theme();
                    settings::persist(&state.read().settings);
                }
            }
        }
    }
}

/// Window title, marked while edits wait for a render
#[component]
fn WindowTitle(state: Signal<AppState>) -> Element {
    let pending = state.read().render_pending();
    let marker = if pending { " *" } else { "" };

    rsx! {
        div { class: "toolbar-title",
            "Livepen Studio{marker}"
        }
    }
}

/// Reusable toolbar button component
#[component]
fn ToolbarButton(
    title: &'static str,
    label: &'static str,
    onclick: EventHandler<MouseEvent>,
    #[props(default = "")] class: &'static str,
) -> Element {
    let button_class = if class.is_empty() {
        "toolbar-button".to_string()
    } else {
        format!("toolbar-button {}", class)
    };

    rsx! {
        button {
            class: "{button_class}",
            title: "{title}",
            onclick: move |evt| onclick.call(evt),
            onmousedown: |e| e.stop_propagation(),
            "{label}"
        }
    }
}

/// Save unsaved work, stop timers, then close
fn close_window(mut state: Signal<AppState>, window: &DesktopContext) {
    state.write().prepare_close(chrono::Utc::now());
    window.close();
}
