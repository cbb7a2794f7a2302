//! Transient notifications.
//!
//! Alerts and feedback messages share one lifecycle:
//!
//! ```text
//! Created ──insert──▶ Visible ──display──▶ FadingOut ──fade──▶ Removed
//! ```
//!
//! A [`NoticeHost`] knows where a variant lives in the page and how to find
//! the one currently shown; a [`Scheduler`] fires the delayed transitions.
//! Showing a notice always removes the previous one of the same host first,
//! so at most one is visible per variant.

use crate::types::{AppResult, NoticeKind};

/// Display and fade durations of a notice variant, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoticeTiming {
    pub display_ms: u32,
    pub fade_ms: u32,
}

impl NoticeTiming {
    pub const fn new(display_ms: u32, fade_ms: u32) -> Self {
        Self { display_ms, fade_ms }
    }

    /// Time from insertion to removal.
    pub fn total_ms(&self) -> u32 {
        self.display_ms + self.fade_ms
    }
}

/// Lifecycle phase of a notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticePhase {
    Created,
    Visible,
    FadingOut,
    Removed,
}

impl NoticePhase {
    pub fn next(self) -> Option<NoticePhase> {
        match self {
            NoticePhase::Created => Some(NoticePhase::Visible),
            NoticePhase::Visible => Some(NoticePhase::FadingOut),
            NoticePhase::FadingOut => Some(NoticePhase::Removed),
            NoticePhase::Removed => None,
        }
    }
}

/// Runs a callback after a delay.
pub trait Scheduler: Clone + 'static {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>);
}

/// A notice element already inserted into the page.
pub trait NoticeSurface: Clone + 'static {
    /// Start the fade-out transition.
    fn fade_out(&self);
    /// Detach from the page. Must tolerate being called twice.
    fn remove(&self);
}

/// Where one notice variant is placed.
pub trait NoticeHost {
    type Surface: NoticeSurface;

    /// The notice of this variant currently in the page, if any.
    fn existing(&self) -> Option<Self::Surface>;

    /// Create the element and insert it.
    fn insert(&self, text: &str, kind: NoticeKind) -> AppResult<Self::Surface>;
}

/// A notice moving through its lifecycle.
#[derive(Debug)]
pub struct Notice<N> {
    surface: N,
    timing: NoticeTiming,
    phase: NoticePhase,
}

impl<N: NoticeSurface> Notice<N> {
    pub fn new(surface: N, timing: NoticeTiming) -> Self {
        Self {
            surface,
            timing,
            phase: NoticePhase::Created,
        }
    }

    pub fn phase(&self) -> NoticePhase {
        self.phase
    }

    /// Enter the next phase, applying its effect on the surface.
    ///
    /// Returns the delay before the following transition, or `None` once
    /// the notice is removed.
    pub fn advance(&mut self) -> Option<u32> {
        let next = self.phase.next()?;
        self.phase = next;
        match next {
            NoticePhase::Created => None,
            NoticePhase::Visible => Some(self.timing.display_ms),
            NoticePhase::FadingOut => {
                self.surface.fade_out();
                Some(self.timing.fade_ms)
            }
            NoticePhase::Removed => {
                self.surface.remove();
                None
            }
        }
    }

    /// Drive the remaining transitions on `scheduler`.
    pub fn run<S: Scheduler>(mut self, scheduler: S) {
        if let Some(delay) = self.advance() {
            let next = scheduler.clone();
            scheduler.schedule(delay, Box::new(move || self.run(next)));
        }
    }
}

/// Replace the host's current notice with a new one and start its lifecycle.
pub fn show_notice<H, S>(
    host: &H,
    scheduler: &S,
    timing: NoticeTiming,
    text: &str,
    kind: NoticeKind,
) -> AppResult<H::Surface>
where
    H: NoticeHost,
    S: Scheduler,
{
    if let Some(previous) = host.existing() {
        previous.remove();
    }

    let surface = host.insert(text, kind)?;
    Notice::new(surface.clone(), timing).run(scheduler.clone());
    Ok(surface)
}
