//! Explosion sound hook.
//!
//! The show calls [`AudioTrigger::play_pop`] once per burst and ignores any
//! error it gets back, so implementations must return quickly and never wait
//! on the audio device.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device")]
    NoDevice,
    #[error("audio device config: {0}")]
    Config(String),
    #[error("audio stream: {0}")]
    Stream(String),
    #[error("audio mixer busy")]
    Busy,
}

pub trait AudioTrigger {
    /// Fire a pop at stereo position `pan` (-1 left, 1 right).
    fn play_pop(&mut self, pan: f32) -> Result<(), AudioError>;

    /// Master volume in `[0, 1]`, applied to everything the trigger plays.
    fn set_volume(&mut self, _volume: f32) {}
}

/// Discards every pop.
#[derive(Debug, Default)]
pub struct Silent;

impl AudioTrigger for Silent {
    fn play_pop(&mut self, _pan: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Left/right gains for `pan` with constant total power.
pub fn equal_power_gains(pan: f32) -> (f32, f32) {
    let angle = (pan.clamp(-1.0, 1.0) + 1.0) * std::f32::consts::FRAC_PI_4; // 0..pi/2
    (angle.cos(), angle.sin())
}

#[cfg(feature = "audio")]
pub use synth::PopSynth;

#[cfg(feature = "audio")]
mod synth {
    use super::{AudioError, AudioTrigger, equal_power_gains};
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use std::sync::{Arc, Mutex};

    const POP_SECONDS: f32 = 0.25;
    const POP_GAIN: f32 = 0.35;
    // Mixer stops accepting pops past this many overlapping voices
    const MAX_VOICES: usize = 24;

    struct Voice {
        samples_left: u32,
        total_samples: u32,
        left_gain: f32,
        right_gain: f32,
        noise: u32,
        body: f32,
    }

    impl Voice {
        fn next(&mut self) -> (f32, f32) {
            // xorshift32 noise, low-passed for the boomy body
            let mut x = self.noise;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.noise = x;
            let n = (x as f32 / u32::MAX as f32) * 2.0 - 1.0;
            self.body += (n - self.body) * 0.08;

            let t = 1.0 - self.samples_left as f32 / self.total_samples as f32;
            let env = (-t * 9.0).exp();
            let crackle = if t < 0.05 { n * 0.5 } else { 0.0 };
            let s = (self.body * 3.0 + crackle) * env * POP_GAIN;
            self.samples_left -= 1;
            (s * self.left_gain, s * self.right_gain)
        }
    }

    struct Mixer {
        sample_rate: f32,
        volume: f32,
        voices: Vec<Voice>,
        seed: u32,
    }

    impl Mixer {
        fn mix(&mut self) -> (f32, f32) {
            let mut left = 0.0f32;
            let mut right = 0.0f32;
            let mut i = 0usize;
            while i < self.voices.len() {
                let (l, r) = self.voices[i].next();
                left += l;
                right += r;
                if self.voices[i].samples_left == 0 {
                    self.voices.swap_remove(i);
                    continue;
                }
                i += 1;
            }
            ((left * self.volume).tanh(), (right * self.volume).tanh())
        }
    }

    /// Synthesised firework pops on the default output device.
    pub struct PopSynth {
        mixer: Arc<Mutex<Mixer>>,
        _stream: cpal::Stream,
    }

    impl PopSynth {
        pub fn open(volume: f32) -> Result<Self, AudioError> {
            let host = cpal::default_host();
            let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
            let supported = device
                .default_output_config()
                .map_err(|e| AudioError::Config(e.to_string()))?;
            let channels = supported.channels() as usize;
            let sample_rate = supported.sample_rate().0 as f32;
            let format = supported.sample_format();
            let config: cpal::StreamConfig = supported.into();

            let mixer = Arc::new(Mutex::new(Mixer {
                sample_rate,
                volume: volume.clamp(0.0, 1.0),
                voices: Vec::with_capacity(MAX_VOICES),
                seed: 0x1234_ABCD,
            }));

            let err_fn = |err| log::warn!("audio stream error: {err}");
            let shared = Arc::clone(&mixer);
            let stream = match format {
                cpal::SampleFormat::F32 => device.build_output_stream(
                    &config,
                    move |data: &mut [f32], _| fill(data, channels, &shared, |v| v),
                    err_fn,
                    None,
                ),
                cpal::SampleFormat::I16 => device.build_output_stream(
                    &config,
                    move |data: &mut [i16], _| {
                        fill(data, channels, &shared, |v| (v * i16::MAX as f32) as i16)
                    },
                    err_fn,
                    None,
                ),
                cpal::SampleFormat::U16 => device.build_output_stream(
                    &config,
                    move |data: &mut [u16], _| {
                        fill(data, channels, &shared, |v| {
                            ((v * 0.5 + 0.5).clamp(0.0, 1.0) * u16::MAX as f32) as u16
                        })
                    },
                    err_fn,
                    None,
                ),
                other => {
                    return Err(AudioError::Config(format!(
                        "unsupported sample format {other:?}"
                    )));
                }
            }
            .map_err(|e| AudioError::Stream(e.to_string()))?;

            stream.play().map_err(|e| AudioError::Stream(e.to_string()))?;
            log::info!("audio: {channels}ch @ {sample_rate} Hz");

            Ok(Self {
                mixer,
                _stream: stream,
            })
        }
    }

    fn fill<T: Copy>(
        data: &mut [T],
        channels: usize,
        mixer: &Mutex<Mixer>,
        convert: impl Fn(f32) -> T,
    ) {
        let Ok(mut mixer) = mixer.lock() else {
            // Poisoned: play silence rather than whatever the buffer held
            data.fill(convert(0.0));
            return;
        };
        for frame in data.chunks_mut(channels.max(1)) {
            let (l, r) = mixer.mix();
            if frame.len() >= 2 {
                frame[0] = convert(l);
                frame[1] = convert(r);
                for extra in &mut frame[2..] {
                    *extra = convert(0.0);
                }
            } else {
                frame[0] = convert(0.5 * (l + r));
            }
        }
    }

    impl AudioTrigger for PopSynth {
        fn play_pop(&mut self, pan: f32) -> Result<(), AudioError> {
            // Never wait on the audio thread
            let mut mixer = self.mixer.try_lock().map_err(|_| AudioError::Busy)?;
            if mixer.voices.len() >= MAX_VOICES {
                return Err(AudioError::Busy);
            }
            let total_samples = ((POP_SECONDS * mixer.sample_rate) as u32).max(1);
            let (left_gain, right_gain) = equal_power_gains(pan);
            mixer.seed = mixer.seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let noise = mixer.seed | 1;
            mixer.voices.push(Voice {
                samples_left: total_samples,
                total_samples,
                left_gain,
                right_gain,
                noise,
                body: 0.0,
            });
            Ok(())
        }

        fn set_volume(&mut self, volume: f32) {
            let volume = volume.clamp(0.0, 1.0);
            match self.mixer.lock() {
                Ok(mut mixer) => mixer.volume = volume,
                Err(poisoned) => poisoned.into_inner().volume = volume,
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn mixer(volume: f32) -> Mixer {
            let mut mixer = Mixer {
                sample_rate: 8000.0,
                volume,
                voices: Vec::new(),
                seed: 0x1234_ABCD,
            };
            mixer.voices.push(Voice {
                samples_left: 400,
                total_samples: 400,
                left_gain: 1.0,
                right_gain: 1.0,
                noise: 0xDEAD_BEEF,
                body: 0.0,
            });
            mixer
        }

        #[test]
        fn poisoned_mixer_plays_silence() {
            let shared = Arc::new(Mutex::new(mixer(1.0)));
            let clone = Arc::clone(&shared);
            let _ = std::thread::spawn(move || {
                let _guard = clone.lock().unwrap();
                panic!("audio thread died");
            })
            .join();
            assert!(shared.is_poisoned());

            let mut data = vec![0.7f32; 64];
            fill(&mut data, 2, &shared, |v| v);
            assert!(data.iter().all(|s| *s == 0.0));
        }

        #[test]
        fn zero_volume_mutes_the_mix() {
            let mut muted = mixer(0.0);
            let mut loud = mixer(1.0);
            let mut heard = false;
            for _ in 0..200 {
                assert_eq!(muted.mix(), (0.0, 0.0));
                let (l, _) = loud.mix();
                heard |= l != 0.0;
            }
            assert!(heard);
        }
    }
}
