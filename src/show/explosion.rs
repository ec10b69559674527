//! Burst patterns. Each shape is an independent function appending its
//! particles to the show's particle arena.

use std::f32::consts::TAU;

use super::particle::Particle;
use super::rocket::Rocket;
use crate::render::Rgb;

pub const STAR_RAYS: usize = 5;
pub const STAR_PARTICLES_PER_RAY: usize = 25;
pub const RING_PARTICLES: usize = 80;
pub const BURST_MIN: usize = 100;
pub const BURST_MAX: usize = 150;

pub const SPARKLER_DECAY: f32 = 0.03;
pub const SPARKLER_GRAVITY: f32 = 0.15;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Shape {
    #[default]
    Sphere,
    Star,
    Ring,
    Sparkler,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Sphere, Shape::Star, Shape::Ring, Shape::Sparkler];

    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::ALL[rng.usize(0..Self::ALL.len())]
    }
}

/// Append the burst for `rocket` to `out` and return how many particles it
/// produced.
pub fn explode(rocket: &Rocket, rng: &mut fastrand::Rng, out: &mut Vec<Particle>) -> usize {
    let before = out.len();
    let (x, y, color) = (rocket.x, rocket.y, rocket.color);

    match rocket.shape {
        Shape::Sphere => sphere(x, y, color, rng, out),
        Shape::Star => star(x, y, color, rng, out),
        Shape::Ring => ring(x, y, color, rng, out),
        Shape::Sparkler => sparkler(x, y, color, rng, out),
    }

    out.len() - before
}

/// Stereo position of a burst at `x`: -1 hard left, 1 hard right.
pub fn stereo_pan(x: f32, width: f32) -> f32 {
    if width <= 0.0 {
        return 0.0;
    }
    (2.0 * (x / width) - 1.0).clamp(-1.0, 1.0)
}

fn default_decay(rng: &mut fastrand::Rng) -> f32 {
    0.005 + rng.f32() * 0.01
}

fn sphere(x: f32, y: f32, color: Rgb, rng: &mut fastrand::Rng, out: &mut Vec<Particle>) {
    let count = rng.usize(BURST_MIN..BURST_MAX);
    out.reserve(count);
    for _ in 0..count {
        let angle = rng.f32() * TAU;
        let speed = 2.0 + rng.f32() * 7.0;
        let decay = default_decay(rng);
        out.push(Particle::emit(x, y, angle, speed, color, decay));
    }
}

fn star(x: f32, y: f32, color: Rgb, rng: &mut fastrand::Rng, out: &mut Vec<Particle>) {
    out.reserve(STAR_RAYS * STAR_PARTICLES_PER_RAY);
    for ray in 0..STAR_RAYS {
        let angle = TAU * ray as f32 / STAR_RAYS as f32;

        // Faster particles further out along the ray
        for j in 0..STAR_PARTICLES_PER_RAY {
            let speed = (j as f32 / STAR_PARTICLES_PER_RAY as f32) * 8.0 + 2.0;
            let decay = default_decay(rng);
            out.push(Particle::emit(x, y, angle, speed, color, decay));
        }
    }
}

fn ring(x: f32, y: f32, color: Rgb, rng: &mut fastrand::Rng, out: &mut Vec<Particle>) {
    out.reserve(RING_PARTICLES);
    for i in 0..RING_PARTICLES {
        let angle = TAU * i as f32 / RING_PARTICLES as f32;
        // Narrow speed band keeps the ring thin
        let speed = 5.0 + rng.f32();
        let decay = default_decay(rng);
        out.push(Particle::emit(x, y, angle, speed, color, decay));
    }
}

fn sparkler(x: f32, y: f32, color: Rgb, rng: &mut fastrand::Rng, out: &mut Vec<Particle>) {
    let count = rng.usize(BURST_MIN..BURST_MAX);
    out.reserve(count);
    for _ in 0..count {
        let angle = rng.f32() * TAU;
        let speed = 1.0 + rng.f32() * 12.0;
        let mut particle = Particle::emit(x, y, angle, speed, color, SPARKLER_DECAY);
        particle.gravity = SPARKLER_GRAVITY;
        out.push(particle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_maps_edges_and_centre() {
        assert_eq!(stereo_pan(0.0, 800.0), -1.0);
        assert_eq!(stereo_pan(400.0, 800.0), 0.0);
        assert_eq!(stereo_pan(800.0, 800.0), 1.0);
        assert!((stereo_pan(200.0, 800.0) + 0.5).abs() < 1e-6);
    }

    #[test]
    fn pan_clamps_drifted_rockets() {
        assert_eq!(stereo_pan(-30.0, 800.0), -1.0);
        assert_eq!(stereo_pan(900.0, 800.0), 1.0);
        assert_eq!(stereo_pan(10.0, 0.0), 0.0);
    }

    #[test]
    fn random_shape_covers_all_variants() {
        let mut rng = fastrand::Rng::with_seed(11);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let shape = Shape::random(&mut rng);
            let idx = Shape::ALL.iter().position(|s| *s == shape).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
