use tracing::trace;

use crate::frame::{FrameHandle, FrameScheduler};

/// Coalesces bursts of triggers into at most one pending unit of work.
///
/// Each [`Debouncer::trigger`] cancels the frame requested by the previous
/// trigger (if it has not fired yet) and requests a fresh one. When a frame
/// fires, the host hands its handle to [`Debouncer::fire`]; only the handle of
/// the latest trigger yields the work.
#[derive(Debug)]
pub struct Debouncer<T> {
    pending: Option<(FrameHandle, T)>,
    dropped: u64,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self {
            pending: None,
            dropped: 0,
        }
    }
}

impl<T> Debouncer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger<S>(&mut self, frames: &mut S, work: T) -> FrameHandle
    where
        S: FrameScheduler + ?Sized,
    {
        if let Some((stale, _)) = self.pending.take() {
            frames.cancel_frame(stale);
            self.dropped += 1;
            trace!(handle = stale.0, "debounce: replaced pending work");
        }
        let handle = frames.request_frame();
        self.pending = Some((handle, work));
        handle
    }

    /// Take the pending work if `handle` belongs to the latest trigger.
    pub fn fire(&mut self, handle: FrameHandle) -> Option<T> {
        match self.pending.take() {
            Some((h, work)) if h == handle => Some(work),
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// Drop any pending work and cancel its frame.
    pub fn cancel<S>(&mut self, frames: &mut S) -> Option<T>
    where
        S: FrameScheduler + ?Sized,
    {
        let (handle, work) = self.pending.take()?;
        frames.cancel_frame(handle);
        Some(work)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Triggers replaced before their frame fired.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;
    use crate::frame::ManualFrames;

    #[test]
    fn only_latest_trigger_survives() {
        let mut frames = ManualFrames::new();
        let mut debounce = Debouncer::new();
        debounce.trigger(&mut frames, [100.0, 100.0]);
        debounce.trigger(&mut frames, [200.0, 150.0]);
        debounce.trigger(&mut frames, [640.0, 480.0]);

        let fired = frames.advance();
        assert_eq!(fired.len(), 1);
        let work: Vec<_> = fired.into_iter().filter_map(|h| debounce.fire(h)).collect();
        assert_eq!(work, vec![[640.0, 480.0]]);
        assert_eq!(debounce.dropped(), 2);
        assert!(!debounce.is_pending());
    }

    #[test]
    fn stale_handle_does_not_take_work() {
        let mut frames = ManualFrames::new();
        let mut debounce = Debouncer::new();
        let old = debounce.trigger(&mut frames, 1);
        let new = debounce.trigger(&mut frames, 2);
        assert_eq!(debounce.fire(old), None);
        assert!(debounce.is_pending());
        assert_eq!(debounce.fire(new), Some(2));
    }

    #[test]
    fn cancel_clears_frame_and_work() {
        let mut frames = ManualFrames::new();
        let mut debounce = Debouncer::new();
        debounce.trigger(&mut frames, "redraw");
        assert_eq!(debounce.cancel(&mut frames), Some("redraw"));
        assert!(frames.advance().is_empty());
    }
}
