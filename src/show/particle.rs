use crate::render::{RenderTarget, Rgb};

pub const DEFAULT_GRAVITY: f32 = 0.06;
pub const DEFAULT_FRICTION: f32 = 0.96;
/// Particles brighter than this get a glow halo.
pub const GLOW_ALPHA: f32 = 0.5;

const RADIUS_MIN: f32 = 1.5;
const RADIUS_JITTER: f32 = 1.5;

#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Rgb,
    pub alpha: f32,
    pub decay: f32,
    pub gravity: f32,
    pub friction: f32,
}

impl Particle {
    /// Particle leaving `(x, y)` at `angle` radians with `speed` units/tick.
    pub fn emit(x: f32, y: f32, angle: f32, speed: f32, color: Rgb, decay: f32) -> Self {
        Self {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            color,
            alpha: 1.0,
            decay,
            gravity: DEFAULT_GRAVITY,
            friction: DEFAULT_FRICTION,
        }
    }

    pub fn speed(&self) -> f32 {
        self.vx.hypot(self.vy)
    }

    /// Step one tick. Returns `false` once the particle has faded out.
    pub fn advance(&mut self) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += self.gravity;
        // Air drag
        self.vx *= self.friction;
        self.vy *= self.friction;
        self.alpha -= self.decay;

        self.alpha > 0.0
    }

    /// `jitter` only varies the drawn radius; physics never reads it.
    pub fn draw(&self, target: &mut dyn RenderTarget, jitter: &mut fastrand::Rng) {
        let radius = RADIUS_MIN + jitter.f32() * RADIUS_JITTER;
        target.draw_circle(
            self.x,
            self.y,
            radius,
            self.color,
            self.alpha,
            self.alpha > GLOW_ALPHA,
        );
    }
}
