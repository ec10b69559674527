//! Terminal host: owns the screen, forwards resizes, and schedules ticks.

use crossterm::{
    cursor::{Hide, Show as ShowCursor},
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{BufWriter, Stdout, Write, stdout};
use std::time::{Duration, Instant};

use crate::audio::{AudioTrigger, Silent};
use crate::config::{self, Config};
use crate::error::Error;
use crate::render::{HalfBlockCanvas, RenderTarget};
use crate::show::Show;

// Never run more than this many catch-up ticks per frame
const MAX_CATCH_UP: f32 = 3.0;

/// Raw mode + alternate screen for as long as it lives.
struct Screen {
    out: BufWriter<Stdout>,
}

impl Screen {
    fn enter() -> Result<Self, Error> {
        let mut out = BufWriter::with_capacity(1024 * 64, stdout());
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(Self { out })
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = execute!(self.out, ShowCursor, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

enum Input {
    Quit,
    Launch,
    ToggleSound,
    Volume(i32),
    Resize(u16, u16),
    Ignore,
}

fn classify(event: &Event) -> Input {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Input::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Input::Quit,
            KeyCode::Char(' ') => Input::Launch,
            KeyCode::Char('s') => Input::ToggleSound,
            KeyCode::Char('+') | KeyCode::Char('=') => Input::Volume(1),
            KeyCode::Char('-') => Input::Volume(-1),
            _ => Input::Ignore,
        },
        Event::Resize(cols, rows) => Input::Resize(*cols, *rows),
        _ => Input::Ignore,
    }
}

pub fn open_audio(config: &Config) -> Box<dyn AudioTrigger> {
    if !config.sound {
        return Box::new(Silent);
    }

    #[cfg(feature = "audio")]
    {
        match crate::audio::PopSynth::open(config.volume) {
            Ok(synth) => return Box::new(synth),
            Err(err) => log::warn!("sound disabled: {err}"),
        }
    }
    #[cfg(not(feature = "audio"))]
    log::warn!("sound requested but skyburst was built without the `audio` feature");

    Box::new(Silent)
}

/// Run every whole tick banked in `accumulator`. Returns whether any of them
/// drew, i.e. whether the frame needs presenting.
fn catch_up(
    show: &mut Show,
    canvas: &mut HalfBlockCanvas,
    audio: &mut dyn AudioTrigger,
    accumulator: &mut f32,
    fixed_dt: f32,
) -> bool {
    let mut ticked = false;
    while *accumulator >= fixed_dt {
        *accumulator -= fixed_dt;
        ticked |= show.tick(canvas, audio);
    }
    ticked
}

/// Run the show until the user quits.
pub fn run(config: &Config) -> Result<(), Error> {
    let (cols, rows) = terminal::size()?;
    let mut canvas = HalfBlockCanvas::new(cols as usize, rows as usize, config.background);

    let mut show = match config.seed {
        Some(seed) => Show::with_seed(config.background, seed),
        None => Show::new(config.background),
    };
    show.set_sound(config.sound);
    // Refuse to start before touching the terminal
    show.start(&canvas)?;

    let mut audio = open_audio(config);
    let mut volume = config.volume;
    let mut screen = Screen::enter()?;

    let fixed_dt = 1.0 / config.fps as f32;
    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;
    let mut quit = false;

    while !quit {
        if event::poll(Duration::from_millis(1))? {
            match classify(&event::read()?) {
                Input::Quit => {
                    show.stop();
                    quit = true;
                }
                Input::Launch => show.launch(),
                Input::ToggleSound => {
                    show.set_sound(!show.sound_enabled());
                    log::info!("sound {}", if show.sound_enabled() { "on" } else { "off" });
                }
                Input::Volume(steps) => {
                    volume = config::step_volume(volume, steps);
                    audio.set_volume(volume);
                    log::info!("volume {:.0}%", volume * 100.0);
                }
                Input::Resize(cols, rows) => {
                    canvas.resize(cols as usize, rows as usize, config.background);
                    let (width, height) = canvas.dimensions();
                    if show.is_running() {
                        show.resize(width, height);
                    } else if show.start(&canvas).is_ok() {
                        // Surface is back after shrinking to nothing
                        log::info!("surface restored, show restarted");
                    }
                    execute!(screen.out, Clear(ClearType::All))?;
                }
                Input::Ignore => {}
            }
        }

        let now = Instant::now();
        accumulator += now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        accumulator = accumulator.min(fixed_dt * MAX_CATCH_UP);

        if catch_up(&mut show, &mut canvas, audio.as_mut(), &mut accumulator, fixed_dt) {
            canvas.present(&mut screen.out)?;
        }
    }

    screen.out.flush()?;
    Ok(())
}
