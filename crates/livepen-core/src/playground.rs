//! The playground context
//!
//! Owns the source store and the render scheduler and wires them to the
//! preview renderer. One `Playground` is created at startup and passed to
//! every handler; [`Playground::shutdown`] clears its timers on exit.

use std::time::Duration;

use crate::fragment::{FragmentKind, SourceBundle, SourceStore};
use crate::preview::{self, PreviewSurface, RenderOutcome, SurfaceError};
use crate::scheduler::{RenderScheduler, Ticket, TimerHandle};

/// Source store + render scheduler + renderer
#[derive(Debug)]
pub struct Playground<H: TimerHandle = ()> {
    sources: SourceStore,
    scheduler: RenderScheduler<H>,
    render_count: u64,
    last_rendered: Option<SourceBundle>,
}

impl<H: TimerHandle> Playground<H> {
    /// Create a playground with the sample sources
    pub fn new(debounce: Duration) -> Self {
        Self::with_sources(SourceStore::new(), debounce)
    }

    pub fn with_sources(sources: SourceStore, debounce: Duration) -> Self {
        Self {
            sources,
            scheduler: RenderScheduler::new(debounce),
            render_count: 0,
            last_rendered: None,
        }
    }

    pub fn sources(&self) -> &SourceStore {
        &self.sources
    }

    pub fn fragment(&self, kind: FragmentKind) -> &str {
        self.sources.get(kind)
    }

    pub fn bundle(&self) -> SourceBundle {
        self.sources.bundle()
    }

    pub fn scheduler(&self) -> &RenderScheduler<H> {
        &self.scheduler
    }

    /// Debounce delay to wait after an edit
    pub fn debounce(&self) -> Duration {
        self.scheduler.delay()
    }

    /// Number of completed renders
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// The sources used by the most recent completed render
    pub fn last_rendered(&self) -> Option<&SourceBundle> {
        self.last_rendered.as_ref()
    }

    /// Apply an editor change and restart the debounce countdown
    pub fn edit(&mut self, kind: FragmentKind, text: impl Into<String>) -> Ticket {
        self.sources.set(kind, text);
        self.scheduler.on_edit()
    }

    /// Hand over the timer started for `ticket`
    pub fn attach_timer(&mut self, ticket: Ticket, handle: H) {
        self.scheduler.attach_timer(ticket, handle);
    }

    /// Called when the countdown for `ticket` elapses
    ///
    /// Renders if the ticket is still current and returns the outcome;
    /// `Ok(None)` means the ticket was stale and nothing happened.
    pub fn debounce_elapsed<S: PreviewSurface + ?Sized>(
        &mut self,
        ticket: Ticket,
        surface: &mut S,
    ) -> Result<Option<RenderOutcome>, SurfaceError> {
        if self.scheduler.elapse(ticket) {
            self.render_into(surface).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Render immediately (run / refresh / initial load)
    pub fn run<S: PreviewSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Result<RenderOutcome, SurfaceError> {
        self.scheduler.trigger_manual();
        self.render_into(surface)
    }

    /// Replace all sources and render immediately (snippet, share, restore)
    pub fn load<S: PreviewSurface + ?Sized>(
        &mut self,
        bundle: SourceBundle,
        surface: &mut S,
    ) -> Result<RenderOutcome, SurfaceError> {
        self.sources.load_bundle(bundle);
        self.run(surface)
    }

    /// Cancel pending timers
    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
    }

    fn render_into<S: PreviewSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Result<RenderOutcome, SurfaceError> {
        let bundle = self.sources.bundle();
        let outcome = preview::render(surface, &bundle)?;

        self.sources.mark_clean();
        self.render_count += 1;
        self.last_rendered = Some(bundle);
        Ok(outcome)
    }
}

impl<H: TimerHandle> Default for Playground<H> {
    fn default() -> Self {
        Self::new(crate::scheduler::DEFAULT_DEBOUNCE)
    }
}
