//! Command-line options.

use std::path::PathBuf;

use thiserror::Error;

use crate::render::Rgb;
use crate::show::palette::NIGHT_SKY;

pub const DEFAULT_FPS: u32 = 60;
pub const MAX_FPS: u32 = 240;
pub const DEFAULT_VOLUME: f32 = 0.5;
/// Change applied by one press of `+` or `-`.
pub const VOLUME_STEP: f32 = 0.1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid hex color: {0} (expected RRGGBB, e.g. 1a1b26)")]
    InvalidColor(String),
    #[error("{0} requires a value")]
    MissingValue(&'static str),
    #[error("invalid value for {option}: {value}")]
    InvalidNumber { option: &'static str, value: String },
    #[error("unknown option: {0}")]
    UnknownOption(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub background: Rgb,
    pub sound: bool,
    pub volume: f32,
    pub seed: Option<u64>,
    pub fps: u32,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            background: NIGHT_SKY,
            sound: false,
            volume: DEFAULT_VOLUME,
            seed: None,
            fps: DEFAULT_FPS,
            log_file: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Run(Config),
    Help,
}

pub fn usage() -> String {
    [
        "skyburst - endless fireworks in your terminal",
        "",
        "Usage: skyburst [OPTIONS]",
        "",
        "Options:",
        "  --bg-color RRGGBB  Set background color as hex (e.g., --bg-color 1a1b26)",
        "  --sound            Play a pop for every burst (needs the `audio` feature)",
        "  --volume V         Pop volume from 0 to 1 (default 0.5)",
        "  --seed N           Seed the random source for a repeatable show",
        "  --fps N            Frames per second, 1-240 (default 60)",
        "  --log-file PATH    Write logs to PATH (level from RUST_LOG, default info)",
        "  -h, --help         Show this help",
        "",
        "Keys: space = launch a rocket, s = toggle sound, +/- = volume",
        "Press 'q', ESC, or Ctrl+C to exit",
    ]
    .join("\n")
}

/// Parse arguments, excluding the program name.
pub fn parse_args<I, S>(args: I) -> Result<Command, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
    let mut config = Config::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--bg-color" => {
                let value = value_of(&args, i, "--bg-color")?;
                config.background =
                    parse_hex_color(value).ok_or_else(|| ConfigError::InvalidColor(value.to_owned()))?;
                i += 2;
            }
            "--seed" => {
                let value = value_of(&args, i, "--seed")?;
                config.seed = Some(value.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                    option: "--seed",
                    value: value.to_owned(),
                })?);
                i += 2;
            }
            "--fps" => {
                let value = value_of(&args, i, "--fps")?;
                config.fps = value
                    .parse::<u32>()
                    .ok()
                    .filter(|fps| (1..=MAX_FPS).contains(fps))
                    .ok_or_else(|| ConfigError::InvalidNumber {
                        option: "--fps",
                        value: value.to_owned(),
                    })?;
                i += 2;
            }
            "--volume" => {
                let value = value_of(&args, i, "--volume")?;
                config.volume = value
                    .parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(|v| v.clamp(0.0, 1.0))
                    .ok_or_else(|| ConfigError::InvalidNumber {
                        option: "--volume",
                        value: value.to_owned(),
                    })?;
                i += 2;
            }
            "--log-file" => {
                config.log_file = Some(PathBuf::from(value_of(&args, i, "--log-file")?));
                i += 2;
            }
            "--sound" => {
                config.sound = true;
                i += 1;
            }
            "help" | "--help" | "-h" => return Ok(Command::Help),
            other => return Err(ConfigError::UnknownOption(other.to_owned())),
        }
    }

    Ok(Command::Run(config))
}

/// Volume after `steps` presses of `+` (negative for `-`), kept in `[0, 1]`.
pub fn step_volume(volume: f32, steps: i32) -> f32 {
    let stepped = volume + steps as f32 * VOLUME_STEP;
    // Snap to whole percents so repeated steps don't drift
    ((stepped * 100.0).round() / 100.0).clamp(0.0, 1.0)
}

fn value_of<'a>(args: &'a [String], i: usize, option: &'static str) -> Result<&'a str, ConfigError> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or(ConfigError::MissingValue(option))
}

pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Rgb(r, g, b))
}
