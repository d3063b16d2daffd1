//! Frame-driven playback of settle animations.

use twix_controls::{AnimationDriver, PreviewStyle, SettleAnimation};

/// Plays the most recent settle animation against egui's clock.
///
/// `start` only records the animation; the start time is taken on the next
/// frame so it lines up with what is actually painted.
#[derive(Default)]
pub struct FrameDriver {
    queued: Option<SettleAnimation>,
    active: Option<(SettleAnimation, f64)>,
}

impl FrameDriver {
    /// Style to paint at `now_ms`, and whether more frames are needed.
    pub fn style(&mut self, now_ms: f64) -> (PreviewStyle, bool) {
        if let Some(anim) = self.queued.take() {
            self.active = Some((anim, now_ms));
        }
        match self.active {
            Some((anim, started)) => {
                let t = now_ms - started;
                if t >= anim.settle_time() {
                    self.active = None;
                    (anim.to, false)
                } else {
                    (anim.style_at(t), true)
                }
            }
            None => (PreviewStyle::REST, false),
        }
    }
}

impl AnimationDriver for FrameDriver {
    fn start(&mut self, animation: SettleAnimation) {
        self.queued = Some(animation);
    }
}
