//! Fragment editor: HTML / CSS / JS tabs over a single textarea

use crate::js_interop::{self, editor_id};
use crate::preview::{run_preview, schedule_render};
use crate::state::AppState;
use dioxus::prelude::*;
use livepen_core::FragmentKind;

/// Tabs plus the editor for the active fragment
#[component]
pub fn Editor() -> Element {
    let state = use_context::<Signal<AppState>>();

    let (active, code, font_size, font_family, word_wrap, line_numbers, tab_size) = {
        let s = state.read();
        (
            s.active_tab,
            s.playground.fragment(s.active_tab).to_string(),
            s.settings.editor_font_size(s.touch_mode),
            s.settings.font_family.clone(),
            s.settings.word_wrap,
            s.settings.line_numbers,
            s.settings.tab_size,
        )
    };

    let id = editor_id(active);
    let input_class = if word_wrap {
        "code-input wrap"
    } else {
        "code-input"
    };

    rsx! {
        div { class: "editor-pane",
            TabBar { active }

            div { class: "editor-content",
                if line_numbers {
                    div {
                        id: "line-numbers-{active.id()}",
                        class: "line-numbers",
                        style: "font-size: {font_size}px;",
                        { render_line_numbers(&code) }
                    }
                }
                textarea {
                    key: "{id}",
                    id: "{id}",
                    class: "{input_class}",
                    spellcheck: false,
                    autocomplete: "off",
                    style: "font-size: {font_size}px; font-family: {font_family};",
                    value: "{code}",
                    // Scroll sync handled by native JS in main.rs
                    oninput: move |evt| schedule_render(state, active, evt.value()),
                    onkeydown: move |evt| handle_editor_keydown(state, active, tab_size, &evt),
                }
            }
        }
    }
}

/// One tab per fragment; a dot marks edits not yet rendered
#[component]
fn TabBar(active: FragmentKind) -> Element {
    let mut state = use_context::<Signal<AppState>>();

    rsx! {
        div { class: "editor-tabs",
            for kind in FragmentKind::ALL {
                {
                    let is_active = kind == active;
                    let is_dirty = state.read().playground.sources().is_dirty(kind);

                    rsx! {
                        button {
                            key: "{kind.id()}",
                            class: if is_active { "editor-tab active" } else { "editor-tab" },
                            "data-tab": kind.id(),
                            onclick: move |_| state.write().select_tab(kind),
                            "{kind.label()}"
                            if is_dirty {
                                span { class: "dirty-indicator", "*" }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Handle keyboard shortcuts in the editor
fn handle_editor_keydown(
    mut state: Signal<AppState>,
    kind: FragmentKind,
    tab_size: u32,
    evt: &KeyboardEvent,
) {
    let ctrl = evt.modifiers().ctrl() || evt.modifiers().meta();

    // Ctrl+Enter: Run
    if ctrl && evt.key() == Key::Enter {
        evt.prevent_default();
        run_preview(state);
    }

    // Ctrl+S: Save snippet
    if ctrl && evt.key() == Key::Character("s".to_string()) {
        evt.prevent_default();
        state.write().open_save_dialog();
    }

    // Tab: indent
    if evt.key() == Key::Tab && !evt.modifiers().shift() {
        evt.prevent_default();
        spawn(async move {
            js_interop::insert_indent(kind, tab_size).await;
        });
    }
}

/// Render line numbers for the editor
fn render_line_numbers(code: &str) -> Element {
    let line_count = line_count(code);

    rsx! {
        for i in 1..=line_count {
            div { key: "{i}", class: "line-number", "{i}" }
        }
    }
}

fn line_count(code: &str) -> usize {
    if code.is_empty() {
        1
    } else if code.ends_with('\n') {
        code.lines().count() + 1
    } else {
        code.lines().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count() {
        assert_eq!(line_count(""), 1);
        assert_eq!(line_count("a"), 1);
        assert_eq!(line_count("a\nb"), 2);
        assert_eq!(line_count("a\nb\n"), 3);
    }
}
