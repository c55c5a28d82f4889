use crate::paint::Color;

use super::{DrawCall, TriangleScene};

/// Presentation seam: hands out drawables, records into them, presents them.
pub trait FrameSurface {
    type Drawable;

    /// Next drawable target, or `None` when the surface is not ready.
    fn acquire(&mut self) -> Option<Self::Drawable>;

    /// Clears `drawable` to `clear` and records `draw`.
    fn encode(&mut self, drawable: &mut Self::Drawable, clear: Color, draw: DrawCall);

    /// Submits the recorded work and hands the drawable to the display.
    fn present(&mut self, drawable: Self::Drawable);
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FrameState {
    #[default]
    Idle,
    Rendering,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Presented,
    /// No drawable was available; nothing was encoded or presented.
    Dropped,
}

/// Per-refresh driver for a [`TriangleScene`].
#[derive(Debug, Default)]
pub struct FrameLoop {
    state: FrameState,
    presented: u64,
    dropped: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> FrameState {
        self.state
    }

    #[inline]
    pub fn presented(&self) -> u64 {
        self.presented
    }

    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Renders one frame in response to a display refresh.
    ///
    /// A missing drawable drops the frame silently: no retry, no queuing.
    pub fn on_refresh<S: FrameSurface>(
        &mut self,
        scene: &TriangleScene,
        surface: &mut S,
    ) -> FrameOutcome {
        debug_assert_eq!(self.state, FrameState::Idle, "refresh while a frame is in flight");
        self.state = FrameState::Rendering;

        let outcome = match surface.acquire() {
            Some(mut drawable) => {
                surface.encode(&mut drawable, scene.clear_color(), scene.draw_call());
                surface.present(drawable);
                self.presented += 1;
                FrameOutcome::Presented
            }
            None => {
                self.dropped += 1;
                log::trace!("no drawable available; frame dropped ({} total)", self.dropped);
                FrameOutcome::Dropped
            }
        };

        self.state = FrameState::Idle;
        outcome
    }
}
