mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use alien_invasion::compute::{handle_event, tick, Game};
use alien_invasion::highscores::{self, HighScores};
use alien_invasion::input::{Control, InputEvent, Key};
use alien_invasion::render::draw;
use alien_invasion::settings::Settings;

use display::TerminalRenderer;

#[derive(Parser)]
#[command(name = "alien_invasion")]
#[command(about = "Defend the bottom of the screen against a descending alien fleet")]
struct Args {
    /// JSON file overriding any subset of the game settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// High score table (defaults to ~/.alien_invasion_scores.json)
    #[arg(long)]
    scores: Option<PathBuf>,
    /// Seed for enemy fire, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Where log output goes; stderr would draw over the game
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// Frames a freshly pressed key stays held without a repeat.  Covers the
/// OS key-repeat delay (≈ 250–500 ms) before repeats start arriving.
const INITIAL_HOLD_WINDOW: u64 = 36;

/// Once repeats are flowing (≥ 15 Hz) a key that goes this many frames
/// without one has been released.
const REPEAT_HOLD_WINDOW: u64 = 8;

struct Held {
    last_frame: u64,
    repeating: bool,
}

/// Turns raw terminal key events into clean down/up transitions.
///
/// Keyboard-enhancement terminals (kitty protocol) report releases, so
/// keys are dropped on `Release`.  Classic terminals only send presses,
/// with OS key-repeat showing up as more presses; there a key counts as
/// released once its hold window passes without a repeat.
///
/// Only movement keys are tracked.  Fire, play and quit are one-shot
/// triggers, so every press of them goes through.
struct KeyTracker {
    held: HashMap<Key, Held>,
    reports_release: bool,
}

impl KeyTracker {
    fn new(reports_release: bool) -> Self {
        Self {
            held: HashMap::new(),
            reports_release,
        }
    }

    /// Returns true for a new press, false for a repeat of a held key.
    fn press(&mut self, key: Key, frame: u64) -> bool {
        if !is_movement(key) {
            return true;
        }
        match self.held.get_mut(&key) {
            Some(held) => {
                held.last_frame = frame;
                held.repeating = true;
                false
            }
            None => {
                self.held.insert(
                    key,
                    Held {
                        last_frame: frame,
                        repeating: false,
                    },
                );
                true
            }
        }
    }

    /// An explicit auto-repeat.  Keeps a movement key held; one-shot keys
    /// ignore it.
    fn repeat(&mut self, key: Key, frame: u64) -> bool {
        is_movement(key) && self.press(key, frame)
    }

    fn release(&mut self, key: Key) -> bool {
        self.held.remove(&key).is_some()
    }

    /// Keys whose hold window ran out this frame.
    fn expire(&mut self, frame: u64) -> Vec<Key> {
        if self.reports_release {
            return Vec::new();
        }
        let mut expired = Vec::new();
        self.held.retain(|key, held| {
            let window = if held.repeating {
                REPEAT_HOLD_WINDOW
            } else {
                INITIAL_HOLD_WINDOW
            };
            let alive = frame.saturating_sub(held.last_frame) <= window;
            if !alive {
                expired.push(*key);
            }
            alive
        });
        expired
    }
}

fn is_movement(key: Key) -> bool {
    matches!(key, Key::Left | Key::Right)
}

fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Key::Quit),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
        KeyCode::Char(' ') => Some(Key::Fire),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Enter => Some(Key::Play),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Key::Quit),
        _ => None,
    }
}

/// Translate one terminal event into a game input event, if it maps to one.
fn translate<W: Write>(
    event: Event,
    keys: &mut KeyTracker,
    frame: u64,
    screen: &TerminalRenderer<W>,
) -> Option<InputEvent> {
    match event {
        Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        }) => {
            let key = map_key(code, modifiers)?;
            match kind {
                KeyEventKind::Press => keys.press(key, frame).then_some(InputEvent::KeyDown(key)),
                KeyEventKind::Repeat => keys.repeat(key, frame).then_some(InputEvent::KeyDown(key)),
                KeyEventKind::Release => keys.release(key).then_some(InputEvent::KeyUp(key)),
            }
        }
        Event::Mouse(MouseEvent {
            kind, column, row, ..
        }) => {
            let (x, y) = screen.to_logical(column, row);
            match kind {
                MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::Click { x, y }),
                MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                    Some(InputEvent::PointerMoved { x, y })
                }
                _ => None,
            }
        }
        _ => None,
    }
}

// ── High scores ───────────────────────────────────────────────────────────────

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn record_game(scores: &mut HighScores, path: &Path, game: &Game) {
    if let Some(rank) = scores.add_score(game.stats.score, game.stats.level, unix_now()) {
        log::info!("Score {} ranked #{rank}", game.stats.score);
        if let Err(err) = scores.save(path) {
            log::warn!("Could not save high scores: {err:#}");
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until a quit event.  Drains all pending input, advances the
/// simulation once, redraws, then sleeps out the rest of the frame.
fn game_loop<W: Write>(
    screen: &mut TerminalRenderer<W>,
    game: &mut Game,
    rx: &mpsc::Receiver<Event>,
    keys: &mut KeyTracker,
    rng: &mut StdRng,
    scores: &mut HighScores,
    scores_path: &Path,
) -> std::io::Result<()> {
    let frame_time = Duration::from_secs_f64(1.0 / game.settings.frame_rate.max(1) as f64);
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Input ─────────────────────────────────────────────────────────────
        let mut inputs = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let Some(input) = translate(event, keys, frame, screen) {
                inputs.push(input);
            }
        }
        inputs.extend(keys.expire(frame).into_iter().map(InputEvent::KeyUp));

        for input in inputs {
            if handle_event(game, input, frame_start) == Control::Quit {
                log::info!("Quit requested");
                return Ok(());
            }
        }

        // ── Simulation ────────────────────────────────────────────────────────
        let report = tick(game, frame_start, rng);
        if report.game_over {
            record_game(scores, scores_path, game);
        }

        // ── Redraw (every frame, active or not) ───────────────────────────────
        draw(screen, game)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Opens the log file, warning on stderr when it can't be created.  Runs
/// before raw mode so the warning stays readable.
fn open_log_file(path: &Path) -> Option<File> {
    match File::create(path) {
        Ok(file) => Some(file),
        Err(err) => {
            eprintln!("alien_invasion: logging disabled, cannot create {}: {err}", path.display());
            None
        }
    }
}

fn init_logging(path: Option<PathBuf>) {
    let path = path.unwrap_or_else(|| std::env::temp_dir().join("alien_invasion.log"));
    let Some(file) = open_log_file(&path) else {
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

/// Best-effort undo of everything `main` did to the terminal.
fn restore_terminal<W: Write>(out: &mut W, keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file);

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let scores_path = args.scores.unwrap_or_else(highscores::default_path);
    let mut scores = HighScores::load_or_default(&scores_path);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut game = Game::new(settings, scores.top_score());

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("enabling raw mode")?;
    let setup = out
        .execute(terminal::EnterAlternateScreen)
        .and_then(|out| out.execute(cursor::Hide))
        .map(|_| ());
    if let Err(err) = setup {
        restore_terminal(&mut out, false);
        return Err(err).context("preparing terminal");
    }

    // Ask for key-release (and key-repeat) events.  Terminals without the
    // kitty protocol fall back to hold-window expiry.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok()
        && terminal::supports_keyboard_enhancement().unwrap_or(false);
    log::info!("Keyboard enhancement: {keyboard_enhanced}");

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let mut screen = TerminalRenderer::new(
        out,
        game.settings.screen_width,
        game.settings.screen_height,
    );
    let mut keys = KeyTracker::new(keyboard_enhanced);
    let result = game_loop(
        &mut screen,
        &mut game,
        &rx,
        &mut keys,
        &mut rng,
        &mut scores,
        &scores_path,
    );

    restore_terminal(screen.writer(), keyboard_enhanced);

    if game.stats.game_active() {
        record_game(&mut scores, &scores_path, &game);
    }

    result.context("running game loop")
}
