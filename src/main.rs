mod shared;
mod tui;
mod audio_api;
mod audio;
mod loader;
mod middle;
mod pipeline;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use crossterm::terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use loader::sample_loader;
use middle::Middle;
use pipeline::clock::StepSequencerClock;
use pipeline::config;
use pipeline::sequence::SequencerState;
use shared::InputEvent;

const LOG_FILE: &str = "stepseq.log";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    let project_dir: PathBuf = args
        .iter()
        .find(|a| !a.starts_with('-'))
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    init_logging(&project_dir, verbose);

    // everything slow happens here, before the first stream can exist
    let config = config::load_config(&project_dir);
    let bank = sample_loader::load_bank(&config.slot_sources(&project_dir), config.downmix_to_mono);
    let slot_names = bank.names();
    let mut audio = audio::start_audio(bank);
    let mut middle = Middle::new(
        SequencerState::with_playlist(config.playlist()),
        StepSequencerClock::new(config.step_duration_secs),
        slot_names,
    );

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // auto drops when out of scope
    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let frame_time = Duration::from_millis(16); // ~60fps
    let start = Instant::now();

    loop {
        // reap a stream whose sample ran out
        audio.poll_completed();

        let ds = middle.display_state(audio.active_position());
        term.draw(|frame| {
            let area = frame.area();
            tui::view::render(frame, area, &ds);
        })?;

        let events = tui::input::poll_input(frame_time)?;
        for event in events {
            if event == InputEvent::Quit {
                log::info!("quitting");
                audio.stop();
                term.clear()?;
                return Ok(());
            }
            let now = start.elapsed().as_secs_f64();
            for cmd in middle.handle_input(event, now) {
                audio.send(cmd);
            }
        }

        let now = start.elapsed().as_secs_f64();
        for cmd in middle.tick(now) {
            audio.send(cmd);
        }
    }
}

// The TUI owns stdout, so logs go to a file next to the project.
fn init_logging(dir: &Path, verbose: bool) {
    use simplelog::{Config, LevelFilter, WriteLogger};

    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let path = dir.join(LOG_FILE);
    let file = match File::create(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("stepseq: can't create {}: {e}, logging disabled", path.display());
            return;
        }
    };
    if WriteLogger::init(level, Config::default(), file).is_ok() {
        log::info!("stepseq starting (log level: {:?})", level);
    }
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
