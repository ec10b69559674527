use super::explosion::Shape;
use super::palette;
use crate::render::{RenderTarget, Rgb};

pub const ROCKET_GRAVITY: f32 = 0.25;
/// A rocket bursts once its vertical velocity rises to this value.
pub const APEX_VELOCITY: f32 = -1.0;

const LAUNCH_SPEED_MIN: f32 = 13.0;
const LAUNCH_SPEED_MAX: f32 = 19.0;
const DRIFT: f32 = 2.0;
const TRAIL_TICKS: f32 = 3.0;
const HEAD_RADIUS: f32 = 2.0;

#[derive(Clone, Debug)]
pub struct Rocket {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Rgb,
    pub shape: Shape,
    exploded: bool,
}

impl Rocket {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, color: Rgb, shape: Shape) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            color,
            shape,
            exploded: false,
        }
    }

    /// New rocket on the bottom edge of a `width` x `height` viewport.
    pub fn launch(width: f32, height: f32, rng: &mut fastrand::Rng) -> Self {
        let speed = LAUNCH_SPEED_MIN + rng.f32() * (LAUNCH_SPEED_MAX - LAUNCH_SPEED_MIN);

        Self {
            x: rng.f32() * width.max(0.0),
            y: height,
            vx: (rng.f32() * 2.0 - 1.0) * DRIFT,
            vy: -speed, // Negative because up is negative y
            color: palette::pick(rng),
            shape: Shape::random(rng),
            exploded: false,
        }
    }

    /// Step one tick. Returns `false` on the tick the rocket reaches its apex;
    /// the caller must explode and drop it. That happens exactly once.
    pub fn advance(&mut self) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += ROCKET_GRAVITY;

        if self.vy >= APEX_VELOCITY && !self.exploded {
            self.exploded = true;
            return false;
        }
        !self.exploded
    }

    pub fn exploded(&self) -> bool {
        self.exploded
    }

    pub fn draw(&self, target: &mut dyn RenderTarget) {
        // Trail - follows the rocket's trajectory
        target.draw_line(
            self.x,
            self.y,
            self.x - self.vx * TRAIL_TICKS,
            self.y - self.vy * TRAIL_TICKS,
            self.color.dimmed(0.6),
        );
        target.draw_circle(self.x, self.y, HEAD_RADIUS, self.color, 1.0, false);
    }
}
