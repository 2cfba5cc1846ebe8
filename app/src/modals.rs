//! Modal dialogs: snippet save/load/delete, share link, session restore

use crate::preview::WebviewSurface;
use crate::state::{AppState, Modal, NotificationKind};
use chrono::{Local, Utc};
use dioxus::prelude::*;
use livepen_core::{AutoSaveRecord, OnConflict, Snippet};

/// Renders whichever modal is open, if any
#[component]
pub fn ModalHost() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let modal = state.read().modal.clone();

    let Some(modal) = modal else {
        return rsx! {};
    };

    let body = match modal {
        Modal::SaveSnippet => rsx! { SaveSnippetDialog {} },
        Modal::ConfirmOverwrite { name } => rsx! { ConfirmOverwriteDialog { name } },
        Modal::Snippets => rsx! { SnippetListDialog {} },
        Modal::ConfirmDelete { name } => rsx! { ConfirmDeleteDialog { name } },
        Modal::Share { link } => rsx! { ShareDialog { link } },
        Modal::Restore(record) => rsx! { RestoreDialog { record } },
    };

    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| state.write().close_modal(),
            div {
                class: "modal",
                onclick: |e| e.stop_propagation(),
                {body}
            }
        }
    }
}

#[component]
fn SaveSnippetDialog() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let mut name = use_signal(String::new);

    let mut submit = move || {
        let value = name.read().clone();
        state
            .write()
            .save_snippet(&value, OnConflict::Reject, Utc::now());
    };

    rsx! {
        h3 { "Save Snippet" }
        input {
            class: "modal-input",
            r#type: "text",
            placeholder: "Snippet name",
            autofocus: true,
            value: "{name}",
            oninput: move |evt| name.set(evt.value()),
            onkeydown: move |evt| {
                if evt.key() == Key::Enter {
                    submit();
                }
            },
        }
        div { class: "modal-actions",
            button { class: "modal-button", onclick: move |_| state.write().close_modal(), "Cancel" }
            button { class: "modal-button primary", onclick: move |_| submit(), "Save" }
        }
    }
}

#[component]
fn ConfirmOverwriteDialog(name: String) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let overwrite_name = name.clone();

    rsx! {
        h3 { "Overwrite Snippet?" }
        p { "A snippet named \"{name}\" already exists. Do you want to overwrite it?" }
        div { class: "modal-actions",
            button { class: "modal-button", onclick: move |_| state.write().decline_overwrite(), "Cancel" }
            button {
                class: "modal-button danger",
                onclick: move |_| {
                    state
                        .write()
                        .save_snippet(&overwrite_name, OnConflict::Overwrite, Utc::now());
                },
                "Overwrite"
            }
        }
    }
}

#[component]
fn SnippetListDialog() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let snippets = state.read().snippet_list();

    rsx! {
        h3 { "Saved Snippets" }
        ul { class: "snippet-list",
            for snippet in snippets {
                SnippetRow { key: "{snippet.name}", snippet }
            }
        }
        div { class: "modal-actions",
            button { class: "modal-button", onclick: move |_| state.write().close_modal(), "Close" }
        }
    }
}

#[component]
fn SnippetRow(snippet: Snippet) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let saved = snippet
        .saved_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string();
    let load_name = snippet.name.clone();
    let delete_name = snippet.name.clone();

    rsx! {
        li { class: "snippet-item",
            div { class: "snippet-info",
                span { class: "snippet-name", "{snippet.name}" }
                span { class: "snippet-date", "{saved}" }
            }
            div { class: "snippet-actions",
                button {
                    class: "modal-button primary",
                    onclick: move |_| {
                        let mut surface = WebviewSurface::new(state);
                        state.write().load_snippet(&load_name, &mut surface);
                    },
                    "Load"
                }
                button {
                    class: "modal-button danger",
                    onclick: move |_| state.write().request_delete(&delete_name),
                    "Delete"
                }
            }
        }
    }
}

#[component]
fn ConfirmDeleteDialog(name: String) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let delete_name = name.clone();

    rsx! {
        h3 { "Delete Snippet?" }
        p { "Are you sure you want to delete \"{name}\"?" }
        div { class: "modal-actions",
            button {
                class: "modal-button",
                onclick: move |_| state.write().modal = Some(Modal::Snippets),
                "Cancel"
            }
            button {
                class: "modal-button danger",
                onclick: move |_| state.write().confirm_delete(&delete_name),
                "Delete"
            }
        }
    }
}

#[component]
fn ShareDialog(link: String) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let copy_link = link.clone();

    rsx! {
        h3 { "Share Your Code" }
        p { "Anyone with this link can open your code:" }
        input {
            class: "modal-input share-link",
            r#type: "text",
            readonly: true,
            value: "{link}",
        }
        div { class: "modal-actions",
            button { class: "modal-button", onclick: move |_| state.write().close_modal(), "Close" }
            button {
                class: "modal-button primary",
                onclick: move |_| copy_to_clipboard(state, &copy_link),
                "Copy"
            }
        }
    }
}

#[component]
fn RestoreDialog(record: AutoSaveRecord) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let minutes = record.age(Utc::now()).num_minutes().max(0);
    let age = if minutes < 60 {
        format!("{minutes} minutes ago")
    } else {
        format!("{} hours ago", minutes / 60)
    };

    rsx! {
        h3 { "Restore previous session?" }
        p { "Unsaved work from {age} was found." }
        div { class: "modal-actions",
            button { class: "modal-button", onclick: move |_| state.write().decline_restore(), "Discard" }
            button {
                class: "modal-button primary",
                onclick: move |_| {
                    let mut surface = WebviewSurface::new(state);
                    state.write().accept_restore(&mut surface);
                },
                "Restore"
            }
        }
    }
}

/// Put `text` on the system clipboard and report the result
fn copy_to_clipboard(mut state: Signal<AppState>, text: &str) {
    let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));

    match result {
        Ok(()) => {
            tracing::info!("Share link copied to clipboard");
            state
                .write()
                .notify(NotificationKind::Success, "Link copied to clipboard");
        }
        Err(e) => {
            tracing::warn!("Failed to copy to clipboard: {}", e);
            state
                .write()
                .notify(NotificationKind::Error, "Failed to copy link");
        }
    }
}
