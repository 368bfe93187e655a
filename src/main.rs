mod app;
mod assets;
mod button;
mod entities;
mod event;
mod fleet;
mod game;
mod geometry;
mod platform;
mod scoreboard;
mod settings;
mod stats;
mod ui;

use std::fs::File;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use assets::Assets;
use event::EventHandler;
use game::AlienInvasion;
use settings::Settings;
use ui::TerminalShell;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct CliArgs {
    /// JSON file overriding the default settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding ship.txt and alien.txt
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Where log output goes while the terminal is in use
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Puts the terminal back on every exit path
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl TerminalGuard {
    fn enter() -> anyhow::Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;

        // Terminals without the kitty protocol refuse this; releases are
        // then synthesized from auto-repeat.
        let keyboard_enhanced = execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .is_ok();
        if !keyboard_enhanced {
            log::warn!("Key release events unavailable, emulating from key repeat");
        }
        Ok(Self { keyboard_enhanced })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if self.keyboard_enhanced {
            let _ = execute!(stdout, PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout,
            LeaveAlternateScreen,
            DisableMouseCapture,
            cursor::Show
        );
    }
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("alien_invasion.log"));
    init_logging(&log_path)?;

    let settings = Settings::load(args.config.as_deref())?;
    let assets = Assets::load(&args.assets, &settings)?;

    let guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("Failed to open terminal")?;
    terminal.clear()?;

    let shell = TerminalShell::new(settings.screen_width, settings.screen_height);
    let game = AlienInvasion::new(settings, &assets, &shell);
    let mut app = App::new(game, shell);
    let mut events = EventHandler::new(guard.keyboard_enhanced);

    run(&mut terminal, &mut app, &mut events)?;
    log::info!("Bye, high score {}", app.game.stats().high_score);
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> anyhow::Result<()> {
    let frame = app.game.frame_duration();
    log::info!("Running at {} ms per frame", frame.as_millis());

    loop {
        let frame_start = Instant::now();

        for event in events.drain(&app.shell.viewport) {
            app.on_event(event);
        }
        if app.should_quit {
            break;
        }

        app.on_tick();
        terminal
            .draw(|f| ui::render(f, app))
            .context("Failed to draw frame")?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
    Ok(())
}
