/// Opaque handle for a requested frame callback.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Host animation-frame source.
///
/// Mirrors the browser's request/cancel pair: a requested frame fires once,
/// unless it is cancelled first. Hosts call back into the owner of the handle
/// when the frame fires.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Deterministic frame source driven by the caller.
///
/// Nothing fires on its own; [`ManualFrames::advance`] releases every frame
/// requested (and not cancelled) since the previous advance, in request order.
#[derive(Debug, Default)]
pub struct ManualFrames {
    next_id: u64,
    frame_index: u64,
    pending: Vec<FrameHandle>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames released so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    pub fn advance(&mut self) -> Vec<FrameHandle> {
        self.frame_index += 1;
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameScheduler, ManualFrames};

    #[test]
    fn advance_releases_requests_in_order() {
        let mut frames = ManualFrames::new();
        let a = frames.request_frame();
        let b = frames.request_frame();
        assert_eq!(frames.advance(), vec![a, b]);
        assert!(frames.pending().is_empty());
        assert_eq!(frames.frame_index(), 1);
    }

    #[test]
    fn cancelled_frames_never_fire() {
        let mut frames = ManualFrames::new();
        let a = frames.request_frame();
        let b = frames.request_frame();
        frames.cancel_frame(a);
        assert_eq!(frames.advance(), vec![b]);
    }

    #[test]
    fn handles_are_unique() {
        let mut frames = ManualFrames::new();
        let a = frames.request_frame();
        frames.advance();
        let b = frames.request_frame();
        assert_ne!(a, b);
    }
}
