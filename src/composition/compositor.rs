use serde::{Deserialize, Serialize};

use crate::frame::{blend_over, Extent, Frame};

/// How a foreground is brought to the background's extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitPolicy {
    /// Scale each axis independently to cover the target exactly
    #[default]
    Stretch,
    /// Uniform scale covering the target, excess cropped around the center
    Fill,
    /// Uniform scale inside the target, uncovered area left transparent
    Fit,
}

/// Blends a foreground frame onto a background frame
///
/// The output always covers the background extent. Compositing is pure:
/// the same inputs give the same output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compositor {
    fit: FitPolicy,
}

impl Compositor {
    pub fn new(fit: FitPolicy) -> Self {
        Self { fit }
    }

    pub fn fit(&self) -> FitPolicy {
        self.fit
    }

    /// Scale and place `foreground` relative to `target` per the fit policy
    pub fn conform(&self, foreground: &Frame, target: Extent) -> Frame {
        if foreground.is_empty() || target.is_empty() {
            return Frame::new_transparent(Extent::new(target.x, target.y, 0, 0));
        }
        if foreground.extent() == target {
            return foreground.clone();
        }

        let (fw, fh) = (foreground.width() as f32, foreground.height() as f32);
        let (tw, th) = (target.width as f32, target.height as f32);

        match self.fit {
            FitPolicy::Stretch => foreground
                .resized(target.width, target.height)
                .moved_to(target.x, target.y),
            FitPolicy::Fill | FitPolicy::Fit => {
                let scale = if self.fit == FitPolicy::Fill {
                    (tw / fw).max(th / fh)
                } else {
                    (tw / fw).min(th / fh)
                };
                let width = ((fw * scale).round() as u32).max(1);
                let height = ((fh * scale).round() as u32).max(1);
                let x = target.x + (target.width as i32 - width as i32) / 2;
                let y = target.y + (target.height as i32 - height as i32) / 2;
                foreground
                    .resized(width, height)
                    .moved_to(x, y)
                    .cropped(target)
            }
        }
    }

    /// Composite `foreground` over `background` with the given opacity
    ///
    /// Foreground alpha is multiplied by `opacity` (clamped to [0, 1]) and
    /// blended source-over. Where the conformed foreground does not reach,
    /// the background shows through unchanged.
    pub fn composite(&self, background: &Frame, foreground: &Frame, opacity: f32) -> Frame {
        let target = background.extent();
        let opacity = opacity.clamp(0.0, 1.0);
        if foreground.is_empty() || target.is_empty() || opacity == 0.0 {
            return background.clone();
        }

        let layer = self.conform(foreground, target);
        Frame::render(target, |x, y| {
            // render only visits `target`, which is the background extent
            let bg = background.pixel_at(x, y).unwrap_or_default();
            match layer.pixel_at(x, y) {
                Some(fg) => blend_over([fg[0], fg[1], fg[2], fg[3] * opacity], bg),
                None => bg,
            }
        })
    }
}

/// One compositing call, as handed to the compositor by other components
#[derive(Debug, Clone)]
pub struct CompositeRequest<'a> {
    pub background: &'a Frame,
    pub foreground: &'a Frame,
    pub opacity: f32,
    pub fit: FitPolicy,
}

impl<'a> CompositeRequest<'a> {
    pub fn execute(&self) -> Frame {
        Compositor::new(self.fit).composite(self.background, self.foreground, self.opacity)
    }
}
