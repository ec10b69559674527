//! The fireworks show: rockets, their bursts, and the tick loop that drives
//! them.

pub mod explosion;
pub mod palette;
pub mod particle;
pub mod rocket;

pub use explosion::{Shape, stereo_pan};
pub use particle::Particle;
pub use rocket::Rocket;

use crate::audio::AudioTrigger;
use crate::error::Error;
use crate::render::{RenderTarget, Rgb};

/// Frames between regular launches.
pub const LAUNCH_EVERY: u64 = 35;
/// Frames between chances of a bonus launch.
pub const BONUS_EVERY: u64 = 100;
pub const BONUS_CHANCE: f32 = 0.5;
/// Opacity of the background overlay painted each tick.
pub const FADE_ALPHA: f32 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

/// Cumulative counters since the last `start`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub launched: u64,
    pub explosions: u64,
}

pub struct Show {
    state: RunState,
    width: f32,
    height: f32,
    rockets: Vec<Rocket>,
    particles: Vec<Particle>,
    frame: u64,
    background: Rgb,
    sound: bool,
    stats: Stats,
    rng: fastrand::Rng,
    jitter: fastrand::Rng,
}

impl Show {
    pub fn new(background: Rgb) -> Self {
        Self::from_rng(background, fastrand::Rng::new())
    }

    /// Show whose every random draw derives from `seed`.
    pub fn with_seed(background: Rgb, seed: u64) -> Self {
        Self::from_rng(background, fastrand::Rng::with_seed(seed))
    }

    fn from_rng(background: Rgb, mut rng: fastrand::Rng) -> Self {
        let jitter = rng.fork();
        Self {
            state: RunState::Stopped,
            width: 0.0,
            height: 0.0,
            rockets: Vec::new(),
            particles: Vec::with_capacity(1024),
            frame: 0,
            background,
            sound: false,
            stats: Stats::default(),
            rng,
            jitter,
        }
    }

    /// Begin (or restart) the show on `target` with no live entities.
    ///
    /// Fails when the target has no drawable area; the caller should not
    /// retry until the surface changes.
    pub fn start(&mut self, target: &dyn RenderTarget) -> Result<(), Error> {
        let (width, height) = target.dimensions();
        if width <= 0.0 || height <= 0.0 {
            self.stop();
            return Err(Error::SurfaceUnavailable { width, height });
        }

        self.release();
        self.width = width;
        self.height = height;
        self.frame = 0;
        self.stats = Stats::default();
        self.state = RunState::Running;
        log::info!("show started on {width:.0}x{height:.0} surface");
        Ok(())
    }

    /// Halt the show and drop every live entity. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.state == RunState::Running {
            log::info!(
                "show stopped after {} frames ({} launched, {} bursts)",
                self.frame,
                self.stats.launched,
                self.stats.explosions
            );
        }
        self.state = RunState::Stopped;
        self.release();
    }

    fn release(&mut self) {
        self.rockets.clear();
        self.particles.clear();
    }

    /// Run one frame: physics, culling, drawing, launches.
    ///
    /// Returns whether the caller should schedule another tick. A stopped
    /// show neither draws nor mutates anything.
    pub fn tick(&mut self, target: &mut dyn RenderTarget, audio: &mut dyn AudioTrigger) -> bool {
        if self.state != RunState::Running {
            return false;
        }

        target.clear_or_fade(self.background, FADE_ALPHA);

        // Rockets that peak this tick burst and leave the live set
        let Self {
            rockets,
            particles,
            rng,
            stats,
            sound,
            width,
            ..
        } = self;
        rockets.retain_mut(|rocket| {
            if rocket.advance() {
                return true;
            }
            let produced = explosion::explode(rocket, rng, particles);
            stats.explosions += 1;
            log::trace!(
                "{:?} burst at ({:.0}, {:.0}) with {produced} particles",
                rocket.shape,
                rocket.x,
                rocket.y
            );
            if *sound {
                let pan = stereo_pan(rocket.x, *width);
                if let Err(err) = audio.play_pop(pan) {
                    log::debug!("pop dropped: {err}");
                }
            }
            false
        });

        self.particles.retain_mut(Particle::advance);

        for rocket in &self.rockets {
            rocket.draw(target);
        }
        for particle in &self.particles {
            particle.draw(target, &mut self.jitter);
        }

        self.frame += 1;
        if self.frame % LAUNCH_EVERY == 0 {
            self.launch();
        }
        if self.frame % BONUS_EVERY == 0 && self.rng.f32() < BONUS_CHANCE {
            self.launch();
        }

        true
    }

    /// Send up one rocket from a random spot on the bottom edge.
    pub fn launch(&mut self) {
        if self.state != RunState::Running {
            return;
        }
        let rocket = Rocket::launch(self.width, self.height, &mut self.rng);
        log::trace!("launch {:?} rocket at x={:.0}", rocket.shape, rocket.x);
        self.rockets.push(rocket);
        self.stats.launched += 1;
    }

    /// Track a new viewport size. Live entities are left where they are;
    /// only later launches and pans see the new bounds.
    ///
    /// Shrinking to zero area means the surface is gone: the show stops and
    /// has to be started again once there is something to draw on.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            if self.is_running() {
                log::warn!("surface lost ({width:.0}x{height:.0}), stopping show");
            }
            self.stop();
            return;
        }
        log::debug!("viewport resized to {width:.0}x{height:.0}");
        self.width = width;
        self.height = height;
    }

    pub fn set_sound(&mut self, enabled: bool) {
        self.sound = enabled;
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Silent;

    struct Blank(f32, f32);

    impl RenderTarget for Blank {
        fn dimensions(&self) -> (f32, f32) {
            (self.0, self.1)
        }
        fn clear_or_fade(&mut self, _: Rgb, _: f32) {}
        fn draw_circle(&mut self, _: f32, _: f32, _: f32, _: Rgb, _: f32, _: bool) {}
        fn draw_line(&mut self, _: f32, _: f32, _: f32, _: f32, _: Rgb) {}
    }

    #[test]
    fn bonus_launch_is_a_coin_flip() {
        let mut with_bonus = 0;
        for seed in 0..64 {
            let mut target = Blank(800.0, 600.0);
            let mut show = Show::with_seed(Rgb(0, 0, 0), seed);
            show.start(&target).unwrap();
            for _ in 0..BONUS_EVERY {
                show.tick(&mut target, &mut Silent);
            }
            // Regular launches on frames 35 and 70
            let launched = show.stats().launched;
            assert!(launched == 2 || launched == 3, "launched {launched}");
            if launched == 3 {
                with_bonus += 1;
            }
        }
        assert!(with_bonus > 0 && with_bonus < 64);
    }

    #[test]
    fn new_show_waits_for_start() {
        let mut target = Blank(800.0, 600.0);
        let mut show = Show::new(Rgb(0, 0, 0));
        assert_eq!(show.state(), RunState::Stopped);
        assert!(!show.tick(&mut target, &mut Silent));
        assert_eq!(show.frame(), 0);
    }
}
