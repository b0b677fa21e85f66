use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use ocean_duel::assets::AssetStore;
use ocean_duel::clock::FrameClock;
use ocean_duel::compute::{init_state, GameState, Sprites};
use ocean_duel::config::GameConfig;
use ocean_duel::display::TerminalRenderer;
use ocean_duel::error::{GameError, GameResult};
use ocean_duel::input::{FrameInput, KeyTracker};

// ── Input polling ────────────────────────────────────────────────────────────

/// Drain every pending terminal event without blocking.
///
/// A dead reader thread or a read error ends the game: there is no useful
/// way to keep playing without input.
fn poll_input(
    rx: &mpsc::Receiver<std::io::Result<Event>>,
    keys: &mut KeyTracker,
    renderer: &mut TerminalRenderer,
    frame: u64,
) -> GameResult<FrameInput> {
    loop {
        match rx.try_recv() {
            Ok(Ok(Event::Key(key))) => {
                if keys.handle(&key, frame) {
                    return Ok(FrameInput {
                        quit: true,
                        pressed: Default::default(),
                    });
                }
            }
            Ok(Ok(Event::Resize(cols, rows))) => renderer.resize(cols, rows),
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(GameError::InputPoll(e.to_string())),
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                return Err(GameError::InputPoll("input reader stopped".into()));
            }
        }
    }
    Ok(FrameInput {
        quit: false,
        pressed: keys.pressed(frame),
    })
}

// ── Game loop ────────────────────────────────────────────────────────────────

/// How a session ended, for the exit log line.
#[derive(Debug, Default)]
struct Summary {
    frames: u64,
    collision_frame: Option<u64>,
}

/// Runs until a quit key. After both ships are gone the loop keeps drawing
/// so the explosions and the ocean stay on screen.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    renderer: &mut TerminalRenderer,
    rx: &mpsc::Receiver<std::io::Result<Event>>,
    fps: u32,
    keyboard_enhanced: bool,
) -> GameResult<Summary> {
    let mut keys = KeyTracker::new(keyboard_enhanced);
    let mut clock = FrameClock::new(fps);
    let mut summary = Summary::default();

    loop {
        let input = poll_input(rx, &mut keys, renderer, state.frame)?;
        if input.quit {
            summary.frames = state.frame;
            return Ok(summary);
        }

        let frame = state.frame;
        if state.tick(&input.pressed, renderer) {
            summary.collision_frame = Some(frame);
        }

        renderer.present(out)?;
        clock.tick();
    }
}

// ── Entry point ──────────────────────────────────────────────────────────────

fn main() {
    // Logs go to stderr and only outside the alternate screen.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let path = GameConfig::default_path();
    let result = GameConfig::load_or_default(&path).and_then(|config| {
        info!(
            "Starting ocean_duel ({}x{} at {} fps, assets in {})",
            config.width,
            config.height,
            config.fps,
            config.asset_dir.display()
        );
        let store = AssetStore::new(config.asset_dir.clone());
        // Load everything before touching the terminal so asset errors are
        // printed to a normal screen.
        let sprites = Sprites::load(&store, &config)?;
        run(&config, &sprites)
    });

    match result {
        Ok(summary) => match summary.collision_frame {
            Some(at) => info!(
                "Game over: ships collided on frame {}, quit after {} frames",
                at, summary.frames
            ),
            None => info!("Quit after {} frames", summary.frames),
        },
        Err(e) => {
            error!("ocean_duel: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(config: &GameConfig, sprites: &Sprites) -> GameResult<Summary> {
    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Release events and bare Shift presses need the kitty keyboard protocol;
    // other terminals fall back to the hold-window heuristic.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES,
        ))
        .is_ok();

    let (tx, rx) = mpsc::channel::<std::io::Result<Event>>();
    thread::spawn(move || loop {
        let ev = event::read();
        let failed = ev.is_err();
        if tx.send(ev).is_err() || failed {
            break;
        }
    });

    let result = terminal::size().map_err(GameError::from).and_then(|(cols, rows)| {
        let mut renderer = TerminalRenderer::new(config.width, config.height, cols, rows);
        let mut state = init_state(config, sprites, &mut thread_rng());
        game_loop(
            &mut out,
            &mut state,
            &mut renderer,
            &rx,
            config.fps,
            keyboard_enhanced,
        )
    });

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
