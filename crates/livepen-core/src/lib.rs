//! # Livepen Core
//!
//! Platform-agnostic core of the Livepen live-preview playground.
//!
//! The user edits three fragments (HTML, CSS, JavaScript). Every edit lands in
//! the [`SourceStore`] and restarts a debounce countdown in the
//! [`RenderScheduler`]; when the countdown elapses, the fragments are
//! assembled into one document and written into a fresh sandboxed preview
//! surface. Explicit actions render immediately.
//!
//! ```rust,ignore
//! use livepen_core::prelude::*;
//!
//! let mut playground: Playground = Playground::default();
//! let ticket = playground.edit(FragmentKind::Markup, "<h1>Hi</h1>");
//!
//! // ...once the debounce delay has passed without further edits:
//! playground.debounce_elapsed(ticket, &mut surface)?;
//! ```
//!
//! Persistence goes through a [`KeyValueStore`]: [`SnippetLibrary`] keeps
//! named snippets, [`AutoSaver`] the periodic auto-save record. The
//! [`share`] module turns sources into URL-safe tokens and back.

pub mod autosave;
pub mod fragment;
pub mod layout;
pub mod playground;
pub mod preview;
pub mod scheduler;
pub mod share;
pub mod snippet;
pub mod storage;

mod error;

pub use autosave::{AutoSaveRecord, AutoSaver};
pub use error::{Error, Result};
pub use fragment::{FragmentKind, SourceBundle, SourceStore};
pub use layout::{ContainerRect, SplitAxis, SplitLayout};
pub use playground::Playground;
pub use preview::{PreviewSurface, RenderOutcome, SurfaceError};
pub use scheduler::{RenderScheduler, Ticket, TimerHandle};
pub use share::ShareError;
pub use snippet::{OnConflict, SaveOutcome, Snippet, SnippetLibrary};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::autosave::{AutoSaveRecord, AutoSaver};
    pub use crate::fragment::{FragmentKind, SourceBundle, SourceStore};
    pub use crate::playground::Playground;
    pub use crate::preview::{PreviewSurface, RenderOutcome, SurfaceError};
    pub use crate::scheduler::{Ticket, TimerHandle};
    pub use crate::snippet::{OnConflict, SaveOutcome, Snippet, SnippetLibrary};
    pub use crate::storage::{FileStore, KeyValueStore, MemoryStore};
    pub use crate::{Error, Result};
}
