//! Application state management
//!
//! `AppState` lives in a `Signal` provided at the root. It owns the
//! playground (sources + debounce scheduler) and everything the UI shows
//! around it: open modal, notifications, split position, touch mode.
//! Methods here never touch the DOM; components hand in a preview surface
//! when a render is needed.

use chrono::{DateTime, Utc};
use dioxus::prelude::Task;
use livepen_core::share;
use livepen_core::{
    AutoSaveRecord, AutoSaver, ContainerRect, Error, FileStore, FragmentKind, KeyValueStore,
    MemoryStore, OnConflict, Playground, PreviewSurface, RenderOutcome, Snippet, SnippetLibrary,
    SourceBundle, SourceStore, SplitLayout, SurfaceError, Ticket, TimerHandle,
};
use std::sync::Arc;
use std::time::Duration;

use crate::js_interop::PREVIEW_CONTAINER_ID;
use crate::settings::Settings;

/// Store shared by snippets, auto-save and the touch hint flag
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Storage key remembering that the touch hint was shown
pub const TOUCH_HINT_KEY: &str = "touchHintShown";

/// Delay before the first render after startup
pub const INITIAL_RENDER_DELAY: Duration = Duration::from_millis(500);

/// How long a notification stays on screen
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(3);

/// How long the touch hint stays up unless dismissed
pub const TOUCH_HINT_DURATION: Duration = Duration::from_secs(10);

/// How long the "Auto-saved" indicator is shown
pub const AUTOSAVE_INDICATOR_DURATION: Duration = Duration::from_secs(2);

/// Debounce timer backed by a Dioxus task
pub struct DebounceTask(pub Task);

impl TimerHandle for DebounceTask {
    fn cancel(self) {
        self.0.cancel();
    }
}

/// Stands in for the preview once its mount point is gone
///
/// Renders still run through the playground so the scheduler settles and
/// loads replace the sources; only the write is refused.
struct DetachedSurface;

impl PreviewSurface for DetachedSurface {
    fn replace_and_write(&mut self, _document: &str) -> Result<(), SurfaceError> {
        Err(SurfaceError::Missing(PREVIEW_CONTAINER_ID.to_string()))
    }
}

/// Open the on-disk store, falling back to memory when there is no config dir
pub fn open_store() -> SharedStore {
    if let Some(store) = FileStore::default_location() {
        tracing::info!("Using storage at {}", store.root().display());
        Arc::new(store)
    } else {
        tracing::warn!("No config directory available, snippets will not persist");
        Arc::new(MemoryStore::new())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

impl NotificationKind {
    pub fn class(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A transient toast
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

/// The dialog currently on screen
#[derive(Clone, Debug, PartialEq)]
pub enum Modal {
    /// Asking for a snippet name
    SaveSnippet,
    /// The name is taken; overwrite?
    ConfirmOverwrite { name: String },
    /// Saved snippet list
    Snippets,
    /// Delete a snippet?
    ConfirmDelete { name: String },
    /// Share link ready to copy
    Share { link: String },
    /// A recent auto-save can be restored
    Restore(AutoSaveRecord),
}

/// Global application state
pub struct AppState {
    /// Sources and render scheduling
    pub playground: Playground<DebounceTask>,
    pub snippets: SnippetLibrary<SharedStore>,
    pub autosaver: AutoSaver<SharedStore>,
    store: SharedStore,
    /// Application settings
    pub settings: Settings,
    /// Fragment shown in the editor
    pub active_tab: FragmentKind,
    pub split: SplitLayout,
    /// Container bounds captured when a split drag starts
    drag_rect: Option<ContainerRect>,
    pub modal: Option<Modal>,
    pub notifications: Vec<Notification>,
    next_notification_id: u64,
    pub touch_mode: bool,
    pub touch_hint_visible: bool,
    pub online: bool,
    /// Time of the last successful auto-save
    pub last_autosave: Option<DateTime<Utc>>,
    /// Set when the preview mount point is gone
    pub preview_unavailable: bool,
}

impl AppState {
    /// Create with loaded settings and the sample sources
    pub fn new(settings: Settings, store: SharedStore) -> Self {
        Self::with_sources(settings, store, SourceStore::new())
    }

    fn with_sources(settings: Settings, store: SharedStore, sources: SourceStore) -> Self {
        Self {
            playground: Playground::with_sources(sources, settings.debounce()),
            snippets: SnippetLibrary::new(store.clone()),
            autosaver: AutoSaver::with_restore_window(store.clone(), settings.restore_window_hours),
            store,
            split: SplitLayout::new(settings.split_percent),
            settings,
            active_tab: FragmentKind::Markup,
            drag_rect: None,
            modal: None,
            notifications: Vec::new(),
            next_notification_id: 1,
            touch_mode: false,
            touch_hint_visible: false,
            online: true,
            last_autosave: None,
            preview_unavailable: false,
        }
    }

    /// Build the startup state
    ///
    /// Shared code given on the command line wins; otherwise a recent
    /// auto-save is offered for restore.
    pub fn startup(
        settings: Settings,
        store: SharedStore,
        shared: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let Some(input) = shared else {
            let mut state = Self::new(settings, store);
            state.offer_restore(now);
            return state;
        };

        let decoded = share::token_from_input(input)
            .ok_or(share::ShareError::Empty)
            .and_then(|token| share::decode(&token));

        match decoded {
            Ok(bundle) => {
                tracing::info!("Loaded shared code");
                let mut state = Self::with_sources(settings, store, SourceStore::from_bundle(bundle));
                state.notify(NotificationKind::Success, "Shared code loaded");
                state
            }
            Err(e) => {
                tracing::warn!("Failed to load shared code: {}", e);
                let mut state = Self::new(settings, store);
                state.notify(NotificationKind::Error, "Could not load shared code");
                state
            }
        }
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Queue a notification; returns its id
    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        let id = self.next_notification_id;
        self.next_notification_id += 1;
        self.notifications.push(Notification {
            id,
            kind,
            message: message.into(),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.notifications.retain(|n| n.id != id);
    }

    // ========================================================================
    // Editor
    // ========================================================================

    pub fn select_tab(&mut self, kind: FragmentKind) {
        self.active_tab = kind;
    }

    /// Whether a debounced render is waiting
    pub fn render_pending(&self) -> bool {
        self.playground.scheduler().is_pending()
    }

    /// Render right away (Run, Refresh, startup)
    pub fn run<S: PreviewSurface>(&mut self, surface: &mut S) {
        let mut detached = DetachedSurface;
        let surface = self.live_surface(surface, &mut detached);
        let result = self.playground.run(surface);
        self.handle_render_result(result);
    }

    /// The debounce countdown for `ticket` elapsed
    pub fn debounce_elapsed<S: PreviewSurface>(&mut self, ticket: Ticket, surface: &mut S) {
        let mut detached = DetachedSurface;
        let surface = self.live_surface(surface, &mut detached);
        match self.playground.debounce_elapsed(ticket, surface) {
            Ok(Some(outcome)) => self.handle_render_result(Ok(outcome)),
            Ok(None) => tracing::trace!("Debounce ticket {:?} was superseded", ticket),
            Err(e) => self.handle_render_result(Err(e)),
        }
    }

    /// Replace every fragment and render right away
    fn load_sources<S: PreviewSurface>(&mut self, sources: SourceBundle, surface: &mut S) {
        let mut detached = DetachedSurface;
        let surface = self.live_surface(surface, &mut detached);
        let result = self.playground.load(sources, surface);
        self.handle_render_result(result);
    }

    fn live_surface<'a, S: PreviewSurface>(
        &self,
        surface: &'a mut S,
        detached: &'a mut DetachedSurface,
    ) -> &'a mut dyn PreviewSurface {
        if self.preview_unavailable {
            detached
        } else {
            surface
        }
    }

    /// Report the outcome of a render
    pub fn handle_render_result(&mut self, result: Result<RenderOutcome, SurfaceError>) {
        match result {
            Ok(RenderOutcome::Rendered) => {}
            Ok(RenderOutcome::Fallback(_)) | Err(SurfaceError::Write(_)) => {
                self.notify(NotificationKind::Error, "Error updating preview");
            }
            Err(SurfaceError::Missing(_)) => self.mark_preview_unavailable(),
        }
    }

    /// The preview mount point is gone; stop offering renders
    pub fn mark_preview_unavailable(&mut self) {
        if !self.preview_unavailable {
            self.preview_unavailable = true;
            self.notify(NotificationKind::Error, "Preview is unavailable");
        }
    }

    // ========================================================================
    // Snippets
    // ========================================================================

    pub fn open_save_dialog(&mut self) {
        self.modal = Some(Modal::SaveSnippet);
    }

    /// Save the current sources as a snippet
    ///
    /// A taken name with [`OnConflict::Reject`] opens the overwrite prompt.
    pub fn save_snippet(&mut self, name: &str, on_conflict: OnConflict, now: DateTime<Utc>) {
        match self
            .snippets
            .save(name, self.playground.bundle(), now, on_conflict)
        {
            Ok(_) => {
                self.modal = None;
                self.notify(
                    NotificationKind::Success,
                    format!("Snippet \"{}\" saved", name.trim()),
                );
            }
            Err(Error::EmptySnippetName) => {
                self.notify(NotificationKind::Error, "Please enter a name for the snippet");
            }
            Err(Error::SnippetExists(name)) => {
                self.modal = Some(Modal::ConfirmOverwrite { name });
            }
            Err(e) => {
                tracing::error!("Failed to save snippet: {}", e);
                self.notify(NotificationKind::Error, "Failed to save snippet");
            }
        }
    }

    /// Overwrite declined: nothing is saved
    pub fn decline_overwrite(&mut self) {
        self.modal = None;
        self.notify(NotificationKind::Info, "Snippet not saved");
    }

    /// Saved snippets, newest last; empty on read failure
    pub fn snippet_list(&self) -> Vec<Snippet> {
        self.snippets.list().unwrap_or_else(|e| {
            tracing::warn!("Error loading snippets: {}", e);
            Vec::new()
        })
    }

    /// Show the snippet list, or a notice when there is nothing to show
    pub fn open_snippets(&mut self) {
        match self.snippets.list() {
            Ok(list) if list.is_empty() => {
                self.notify(NotificationKind::Info, "No saved snippets found");
            }
            Ok(_) => self.modal = Some(Modal::Snippets),
            Err(e) => {
                tracing::warn!("Error loading snippets: {}", e);
                self.notify(NotificationKind::Error, "Error loading snippets");
            }
        }
    }

    /// Replace the sources with a saved snippet and render right away
    pub fn load_snippet<S: PreviewSurface>(&mut self, name: &str, surface: &mut S) {
        match self.snippets.get(name) {
            Ok(Some(snippet)) => {
                self.load_sources(snippet.sources, surface);
                self.modal = None;
                self.notify(NotificationKind::Success, format!("Loaded \"{}\"", snippet.name));
            }
            Ok(None) => {
                self.notify(NotificationKind::Error, format!("Snippet \"{name}\" not found"));
            }
            Err(e) => {
                tracing::warn!("Error loading snippet: {}", e);
                self.notify(NotificationKind::Error, "Error loading snippet");
            }
        }
    }

    pub fn request_delete(&mut self, name: &str) {
        self.modal = Some(Modal::ConfirmDelete {
            name: name.to_string(),
        });
    }

    /// Delete a snippet; the list closes once it is empty
    pub fn confirm_delete(&mut self, name: &str) {
        match self.snippets.delete(name) {
            Ok(_) => {
                self.notify(NotificationKind::Success, format!("Deleted \"{name}\""));
                self.modal = if self.snippet_list().is_empty() {
                    None
                } else {
                    Some(Modal::Snippets)
                };
            }
            Err(e) => {
                tracing::warn!("Failed to delete snippet: {}", e);
                self.notify(NotificationKind::Error, "Failed to delete snippet");
            }
        }
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    // ========================================================================
    // Share
    // ========================================================================

    pub fn open_share(&mut self) {
        match share::share_link(&self.settings.share_base, &self.playground.bundle()) {
            Ok(link) => {
                tracing::info!("Generated share link ({} bytes)", link.len());
                self.modal = Some(Modal::Share { link });
            }
            Err(e) => {
                tracing::error!("Failed to generate share link: {}", e);
                self.notify(NotificationKind::Error, "Failed to generate share link");
            }
        }
    }

    // ========================================================================
    // Auto-save
    // ========================================================================

    /// Write the auto-save record; returns whether it succeeded
    pub fn autosave(&mut self, now: DateTime<Utc>) -> bool {
        match self.autosaver.save(self.playground.bundle(), now) {
            Ok(()) => {
                self.last_autosave = Some(now);
                true
            }
            Err(e) => {
                tracing::warn!("Auto-save failed: {}", e);
                false
            }
        }
    }

    fn offer_restore(&mut self, now: DateTime<Utc>) {
        if let Some(record) = self.autosaver.restore_candidate(now) {
            tracing::info!("Found auto-save from {}", record.timestamp);
            self.modal = Some(Modal::Restore(record));
        }
    }

    /// Load the offered auto-save and render it
    pub fn accept_restore<S: PreviewSurface>(&mut self, surface: &mut S) {
        if let Some(Modal::Restore(record)) = self.modal.take() {
            self.load_sources(record.sources, surface);
            self.notify(NotificationKind::Success, "Previous session restored");
        }
    }

    /// Keep the sample sources; the record stays until the next auto-save replaces it
    pub fn decline_restore(&mut self) {
        if matches!(self.modal, Some(Modal::Restore(_))) {
            self.modal = None;
        }
    }

    /// Window is closing: save unsaved work and stop timers
    pub fn prepare_close(&mut self, now: DateTime<Utc>) {
        if self.playground.sources().is_modified() {
            self.autosave(now);
        }
        self.playground.shutdown();
    }

    // ========================================================================
    // Layout
    // ========================================================================

    pub fn begin_drag(&mut self, rect: ContainerRect) {
        self.drag_rect = Some(rect);
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_rect.is_some()
    }

    /// Follow the pointer while dragging
    pub fn drag_to(&mut self, x: f64, y: f64) {
        if let Some(rect) = self.drag_rect {
            self.split.drag_to(x, y, rect);
        }
    }

    /// Finish a drag; returns whether one was in progress
    pub fn end_drag(&mut self) -> bool {
        if self.drag_rect.take().is_some() {
            self.settings.split_percent = self.split.editor_percent();
            true
        } else {
            false
        }
    }

    pub fn toggle_theme(&mut self) {
        self.settings.theme = self.settings.theme.toggled();
    }

    // ========================================================================
    // Touch & connectivity
    // ========================================================================

    /// Switch to touch mode; shows the hint until it has been dismissed once
    pub fn enable_touch_mode(&mut self) {
        self.touch_mode = true;

        let shown = matches!(self.store.get(TOUCH_HINT_KEY), Ok(Some(ref v)) if v == "true");
        if !shown {
            self.touch_hint_visible = true;
        }
    }

    /// Hide the hint (button or timeout) and never show it again
    pub fn dismiss_touch_hint(&mut self) {
        if !self.touch_hint_visible {
            return;
        }
        self.touch_hint_visible = false;
        if let Err(e) = self.store.set(TOUCH_HINT_KEY, "true") {
            tracing::warn!("Failed to remember touch hint: {}", e);
        }
    }

    pub fn set_online(&mut self, online: bool) {
        if self.online == online {
            return;
        }
        self.online = online;
        if online {
            self.notify(NotificationKind::Info, "Back online");
        } else {
            self.notify(
                NotificationKind::Info,
                "You're offline. Changes will be saved locally.",
            );
        }
    }
}
