use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lane_shooter::clock::FrameClock;
use lane_shooter::config::GameConfig;
use lane_shooter::display::TerminalRenderer;
use lane_shooter::engine::Engine;
use lane_shooter::entities::GameStatus;
use lane_shooter::input::{command_for, Command};

#[derive(Parser, Debug)]
#[command(name = "lane_shooter", about = "Shoot the enemies coming down the lanes")]
struct Cli {
    /// Game config (TOML).  Defaults to <config dir>/lane_shooter/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write logs; the terminal itself is busy drawing the game.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| std::env::temp_dir().join("lane_shooter.log"));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.  Input is drained at the start of every
/// frame, then the engine ticks with the measured frame time.  After game
/// over no further ticks are scheduled; only restart and quit are honoured.
fn game_loop<W: Write>(
    renderer: &mut TerminalRenderer<W>,
    engine: &mut Engine,
    rng: &mut StdRng,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let frame = Duration::from_millis(engine.config().frame_millis());
    let mut clock = FrameClock::new();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            if let Event::Resize(cols, rows) = ev {
                renderer.resize(cols, rows);
                // No more ticks are coming to repaint a finished game.
                if engine.status() == GameStatus::GameOver {
                    engine.redraw(renderer)?;
                    renderer.present()?;
                }
                continue;
            }
            match command_for(&ev) {
                Some(Command::Quit) => return Ok(()),
                Some(Command::MoveLeft) => engine.on_move_left(),
                Some(Command::MoveRight) => engine.on_move_right(),
                Some(Command::Fire) => {
                    engine.on_fire();
                }
                Some(Command::Restart) if engine.status() == GameStatus::GameOver => {
                    engine.restart(rng);
                    clock = FrameClock::new();
                }
                Some(Command::Restart) | None => {}
            }
        }

        let dt = clock.delta_ms();
        if engine.status() == GameStatus::Playing {
            engine.tick(dt, rng, renderer)?;
            renderer.present()?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file)?;

    let config = GameConfig::resolve(cli.config.as_deref())?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(seed, "starting lane_shooter");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut engine = Engine::new(config, &mut rng)?;

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Press/repeat/release reporting where the terminal supports it.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                warn!(error = %e, "input thread stopped");
                break;
            }
        }
    });

    let result = terminal::size()
        .map_err(anyhow::Error::from)
        .and_then(|(cols, rows)| {
            let mut renderer = TerminalRenderer::new(&mut out, cols, rows, engine.config());
            game_loop(&mut renderer, &mut engine, &mut rng, &rx)
        });

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!(score = engine.score(), "exiting");
    result
}
