//! Render scheduling
//!
//! Edits restart a countdown; only when the countdown elapses without a
//! further edit does a render happen. Explicit actions (run, refresh, loading
//! a snippet) render immediately and cancel whatever countdown is pending.
//!
//! The scheduler does not own a clock. The caller starts a timer for
//! [`RenderScheduler::delay`] after each edit, hands its handle back with
//! [`RenderScheduler::attach_timer`], and reports expiry with
//! [`RenderScheduler::elapse`]. Every countdown carries a [`Ticket`]; expiry
//! of anything but the newest ticket is ignored, so a timer whose
//! cancellation raced with its wake-up can never render stale sources.

use std::time::Duration;

/// Default quiet period before an edit triggers a render
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// A handle to a scheduled timer that can be cancelled
pub trait TimerHandle {
    fn cancel(self);
}

/// For callers that discard stale timers by ticket alone
impl TimerHandle for () {
    fn cancel(self) {}
}

/// Identifies one debounce countdown
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug)]
enum SchedulerState<H> {
    /// No render is pending
    Idle,
    /// A countdown is running; `timer` is `None` until the caller attaches it
    PendingDebounce { ticket: Ticket, timer: Option<H> },
}

/// Two-state debounce machine (Idle / PendingDebounce)
#[derive(Debug)]
pub struct RenderScheduler<H: TimerHandle = ()> {
    state: SchedulerState<H>,
    delay: Duration,
    next_ticket: u64,
}

impl<H: TimerHandle> RenderScheduler<H> {
    pub fn new(delay: Duration) -> Self {
        Self {
            state: SchedulerState::Idle,
            delay,
            next_ticket: 0,
        }
    }

    /// The countdown length
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, SchedulerState::PendingDebounce { .. })
    }

    /// The ticket of the running countdown, if any
    pub fn pending_ticket(&self) -> Option<Ticket> {
        match self.state {
            SchedulerState::PendingDebounce { ticket, .. } => Some(ticket),
            SchedulerState::Idle => None,
        }
    }

    /// Record an edit: cancel any running countdown and start a new one
    ///
    /// Returns the ticket the caller must pass to [`Self::elapse`] when its
    /// timer fires.
    pub fn on_edit(&mut self) -> Ticket {
        self.cancel_timer();

        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.state = SchedulerState::PendingDebounce {
            ticket,
            timer: None,
        };
        ticket
    }

    /// Attach the timer started for `ticket`
    ///
    /// If the ticket is no longer current the handle is cancelled right away.
    pub fn attach_timer(&mut self, ticket: Ticket, handle: H) {
        match &mut self.state {
            SchedulerState::PendingDebounce {
                ticket: current,
                timer,
            } if *current == ticket => {
                if let Some(previous) = timer.replace(handle) {
                    previous.cancel();
                }
            }
            _ => handle.cancel(),
        }
    }

    /// Report that the countdown for `ticket` elapsed
    ///
    /// Returns `true` when the caller should render now; the scheduler is
    /// back to Idle in that case.
    pub fn elapse(&mut self, ticket: Ticket) -> bool {
        match self.state {
            SchedulerState::PendingDebounce { ticket: current, .. } if current == ticket => {
                // The timer fired on its own, nothing left to cancel
                self.state = SchedulerState::Idle;
                true
            }
            _ => false,
        }
    }

    /// An explicit render request: cancel any countdown and go Idle
    ///
    /// The caller renders immediately afterwards.
    pub fn trigger_manual(&mut self) {
        self.cancel_timer();
    }

    /// Cancel pending timers on teardown
    pub fn shutdown(&mut self) {
        self.cancel_timer();
    }

    fn cancel_timer(&mut self) {
        if let SchedulerState::PendingDebounce {
            timer: Some(handle),
            ..
        } = std::mem::replace(&mut self.state, SchedulerState::Idle)
        {
            handle.cancel();
        }
    }
}

impl<H: TimerHandle> Default for RenderScheduler<H> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
