//! Drawing surface abstraction used by the show.
//!
//! The show only ever issues draw commands through [`RenderTarget`]; it never
//! reads pixels back. Coordinates are logical units with the origin in the
//! top-left corner and `y` growing downward.

pub mod halfblock;

pub use halfblock::HalfBlockCanvas;

/// 24-bit colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Scale every channel by `factor` (clamped to `[0, 1]`).
    pub fn dimmed(self, factor: f32) -> Rgb {
        let f = factor.clamp(0.0, 1.0);
        Rgb(
            (self.0 as f32 * f) as u8,
            (self.1 as f32 * f) as u8,
            (self.2 as f32 * f) as u8,
        )
    }
}

pub trait RenderTarget {
    /// Current logical `(width, height)`. A zero-area result means there is
    /// no drawable surface.
    fn dimensions(&self) -> (f32, f32);

    /// Paint `color` over the whole surface at opacity `alpha`. Anything
    /// below 1.0 leaves a fading afterimage of the previous frame.
    fn clear_or_fade(&mut self, color: Rgb, alpha: f32);

    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32, glow: bool);

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb);
}
