//! Single-slot frame scheduler for coalescing pointer moves.
//!
//! Pointer moves can arrive many times between two repaints. Instead of
//! writing each one to the store, the engine schedules the latest rectangle
//! here and the host applies it on its next frame tick. The scheduler holds
//! at most one pending unit of work: scheduling again cancels and replaces
//! the previous one, and cancelling drops it entirely.

use std::time::Duration;
use web_time::Instant;

/// A unit of work waiting for the next frame.
#[derive(Debug)]
struct Pending<T> {
    value: T,
    /// When the oldest of the coalesced updates was scheduled.
    first_scheduled: Instant,
    /// How many earlier updates this one replaced.
    replaced: u32,
}

/// Holds at most one value until the next frame tick.
#[derive(Debug)]
pub struct FrameScheduler<T> {
    pending: Option<Pending<T>>,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `value` for the next frame, replacing any pending value.
    ///
    /// Returns true if a pending value was replaced.
    pub fn schedule(&mut self, value: T) -> bool {
        match &mut self.pending {
            Some(pending) => {
                pending.value = value;
                pending.replaced = pending.replaced.saturating_add(1);
                true
            }
            None => {
                self.pending = Some(Pending {
                    value,
                    first_scheduled: Instant::now(),
                    replaced: 0,
                });
                false
            }
        }
    }

    /// Drop the pending value without applying it.
    pub fn cancel(&mut self) -> Option<T> {
        let cancelled = self.pending.take().map(|p| p.value);
        if cancelled.is_some() {
            log::trace!("Frame scheduler: pending update cancelled");
        }
        cancelled
    }

    /// Take the pending value at a frame tick.
    pub fn take(&mut self) -> Option<T> {
        let pending = self.pending.take()?;
        log::trace!(
            "Frame scheduler: applying update after {:?} ({} coalesced)",
            pending.first_scheduled.elapsed(),
            pending.replaced
        );
        Some(pending.value)
    }

    /// Check if a value is waiting for the next frame.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Peek at the pending value.
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    /// Time since the pending work was first scheduled.
    pub fn pending_for(&self) -> Option<Duration> {
        self.pending.as_ref().map(|p| p.first_scheduled.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_replaces_pending() {
        let mut scheduler = FrameScheduler::new();
        assert!(!scheduler.schedule(1));
        assert!(scheduler.schedule(2));
        assert!(scheduler.schedule(3));

        assert_eq!(scheduler.pending(), Some(&3));
        assert_eq!(scheduler.take(), Some(3));
        assert_eq!(scheduler.take(), None);
    }

    #[test]
    fn test_replacement_count_saturates() {
        let mut scheduler = FrameScheduler::new();
        scheduler.schedule(0u8);
        if let Some(pending) = scheduler.pending.as_mut() {
            pending.replaced = u32::MAX;
        }
        assert!(scheduler.schedule(1));
        assert_eq!(scheduler.pending.as_ref().map(|p| p.replaced), Some(u32::MAX));
        assert_eq!(scheduler.take(), Some(1));
    }

    #[test]
    fn test_cancel_is_total() {
        let mut scheduler = FrameScheduler::new();
        scheduler.schedule("a");
        scheduler.schedule("b");

        assert_eq!(scheduler.cancel(), Some("b"));
        assert!(!scheduler.is_pending());
        assert_eq!(scheduler.take(), None);
        assert_eq!(scheduler.cancel(), None);
    }

    #[test]
    fn test_pending_for() {
        let mut scheduler = FrameScheduler::new();
        assert!(scheduler.pending_for().is_none());
        scheduler.schedule(());
        assert!(scheduler.pending_for().is_some());
    }
}
