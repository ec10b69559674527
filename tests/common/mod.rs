#![allow(dead_code)]

use skyburst::audio::{AudioError, AudioTrigger};
use skyburst::render::{RenderTarget, Rgb};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Fade { color: Rgb, alpha: f32 },
    Circle { x: f32, y: f32, radius: f32, alpha: f32, glow: bool },
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
}

/// Render target that remembers every command it receives.
pub struct Recorder {
    pub width: f32,
    pub height: f32,
    pub calls: Vec<Call>,
}

impl Recorder {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    /// Calls grouped per tick, split on each fade.
    pub fn frames(&self) -> Vec<&[Call]> {
        let starts: Vec<usize> = self
            .calls
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Call::Fade { .. }))
            .map(|(i, _)| i)
            .collect();
        starts
            .iter()
            .enumerate()
            .map(|(n, &start)| {
                let end = starts.get(n + 1).copied().unwrap_or(self.calls.len());
                &self.calls[start..end]
            })
            .collect()
    }
}

impl RenderTarget for Recorder {
    fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear_or_fade(&mut self, color: Rgb, alpha: f32) {
        self.calls.push(Call::Fade { color, alpha });
    }

    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, _color: Rgb, alpha: f32, glow: bool) {
        self.calls.push(Call::Circle { x, y, radius, alpha, glow });
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, _color: Rgb) {
        self.calls.push(Call::Line { x1, y1, x2, y2 });
    }
}

/// Audio trigger that records pans.
#[derive(Default)]
pub struct PanLog {
    pub pans: Vec<f32>,
}

impl AudioTrigger for PanLog {
    fn play_pop(&mut self, pan: f32) -> Result<(), AudioError> {
        self.pans.push(pan);
        Ok(())
    }
}

/// Audio trigger whose device is always gone.
#[derive(Default)]
pub struct Broken {
    pub attempts: usize,
}

impl AudioTrigger for Broken {
    fn play_pop(&mut self, _pan: f32) -> Result<(), AudioError> {
        self.attempts += 1;
        Err(AudioError::NoDevice)
    }
}
