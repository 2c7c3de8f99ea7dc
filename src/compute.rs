//! The simulation core.
//!
//! `Game` is the one context object every update works on.  The frame loop
//! feeds it input events through [`handle_event`] and advances it with
//! [`tick`]; time (a monotonic `Instant`) and randomness (an `Rng`) are
//! always passed in, so a test can drive a run deterministically.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::collision::{resolve_bullet_hits, score_for, ship_collision, ShipHit};
use crate::entities::{AlienBullet, Bullet, Ship, Side};
use crate::fleet::Fleet;
use crate::input::{Control, InputEvent, Key};
use crate::render::Button;
use crate::settings::Settings;
use crate::stats::{GameStats, GameStatus};

#[derive(Clone, Debug)]
pub struct Game {
    pub settings: Settings,
    pub stats: GameStats,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub alien_bullets: Vec<AlienBullet>,
    pub fleet: Fleet,
    pub play_button: Button,
    pub pointer_visible: bool,
    pub last_alien_shot: Option<Instant>,
    pub frame: u64,
}

/// What happened during one call to [`tick`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Aliens shot down this frame.
    pub destroyed: usize,
    pub points: u64,
    pub level_up: bool,
    pub alien_fired: bool,
    pub ship_hit: Option<ShipHit>,
    /// The last ship was lost and the game went inactive.
    pub game_over: bool,
}

impl Game {
    /// A game sitting at the menu, with a fleet already on screen behind
    /// the play button.
    pub fn new(settings: Settings, high_score: u64) -> Self {
        let stats = GameStats::new(&settings, high_score);
        let ship = Ship::new(&settings);
        let play_button = Button::centered(&settings);
        let mut fleet = Fleet::new();
        fleet.build(&settings);
        Self {
            settings,
            stats,
            ship,
            bullets: Vec::new(),
            alien_bullets: Vec::new(),
            fleet,
            play_button,
            pointer_visible: true,
            last_alien_shot: None,
            frame: 0,
        }
    }

    fn clear_field(&mut self) {
        self.fleet.clear();
        self.bullets.clear();
        self.alien_bullets.clear();
    }
}

// ── Input ────────────────────────────────────────────────────────────────────

pub fn handle_event(game: &mut Game, event: InputEvent, now: Instant) -> Control {
    match event {
        InputEvent::Close | InputEvent::KeyDown(Key::Quit) => return Control::Quit,
        InputEvent::KeyDown(Key::Left) => game.ship.moving_left = true,
        InputEvent::KeyDown(Key::Right) => game.ship.moving_right = true,
        InputEvent::KeyDown(Key::Fire) => {
            if game.stats.status == GameStatus::Playing {
                fire_bullet(game);
            }
        }
        InputEvent::KeyDown(Key::Play) => {
            if !game.stats.game_active() {
                start_game(game, now);
            }
        }
        InputEvent::KeyUp(Key::Left) => game.ship.moving_left = false,
        InputEvent::KeyUp(Key::Right) => game.ship.moving_right = false,
        InputEvent::KeyUp(_) => {}
        InputEvent::Click { x, y } => {
            if game.play_button.contains(x, y) && !game.stats.game_active() {
                start_game(game, now);
            }
        }
        InputEvent::PointerMoved { x, y } => {
            game.play_button.hovered = game.play_button.contains(x, y);
        }
    }
    Control::Continue
}

/// Inactive → Playing.  Everything dynamic goes back to its base value.
pub fn start_game(game: &mut Game, now: Instant) {
    game.settings.initialize_dynamic_settings();
    game.stats.reset(&game.settings);
    game.stats.status = GameStatus::Playing;

    game.clear_field();
    game.fleet.build(&game.settings);
    game.ship.center(&game.settings);

    game.pointer_visible = false;
    game.play_button.hovered = false;
    game.last_alien_shot = Some(now);
    log::info!("New game started ({} aliens)", game.fleet.len());
}

/// Fire the double shot if the bullet cap allows it.  The cap is checked
/// once, before both bullets are added.
pub fn fire_bullet(game: &mut Game) -> bool {
    if game.bullets.len() >= game.settings.bullets_allowed {
        return false;
    }
    for side in [Side::Left, Side::Right] {
        game.bullets
            .push(Bullet::fired_from(&game.ship, side, &game.settings));
    }
    true
}

/// Fire from a random fleet member.  A no-op on an empty fleet.
pub fn fire_alien(game: &mut Game, now: Instant, rng: &mut impl Rng) -> bool {
    let Some(alien) = game.fleet.random_member(rng) else {
        return false;
    };
    let bullet = AlienBullet::fired_from(alien, &game.settings);
    game.alien_bullets.push(bullet);
    game.last_alien_shot = Some(now);
    log::debug!("Alien fired at frame {}", game.frame);
    true
}

fn fire_interval(settings: &Settings) -> Duration {
    Duration::from_secs_f32(settings.alien_fire_interval.max(0.0))
}

/// Fire if at least `alien_fire_interval` has passed since the last shot.
pub fn update_fire_alien(game: &mut Game, now: Instant, rng: &mut impl Rng) -> bool {
    match game.last_alien_shot {
        None => {
            game.last_alien_shot = Some(now);
            false
        }
        Some(last) => {
            if now.saturating_duration_since(last) >= fire_interval(&game.settings) {
                fire_alien(game, now, rng)
            } else {
                false
            }
        }
    }
}

// ── Per-frame pieces ─────────────────────────────────────────────────────────

/// Move both projectile sets and drop the ones that left the screen.
pub fn update_bullets(game: &mut Game) {
    let bullet_speed = game.settings.bullet_speed;
    for bullet in &mut game.bullets {
        bullet.update(bullet_speed);
    }
    game.bullets.retain(|b| !b.is_off_screen());

    let alien_bullet_speed = game.settings.alien_bullet_speed;
    let screen_height = game.settings.screen_height;
    for bullet in &mut game.alien_bullets {
        bullet.update(alien_bullet_speed);
    }
    game.alien_bullets
        .retain(|b| !b.is_off_screen(screen_height));
}

/// Shoot-down resolution, scoring, and the level-up on a cleared fleet.
fn check_bullet_alien_collisions(game: &mut Game, report: &mut TickReport) {
    let destroyed = resolve_bullet_hits(&mut game.bullets, &mut game.fleet.aliens);
    if destroyed > 0 {
        let points = score_for(destroyed, game.settings.alien_points);
        game.stats.add_points(points);
        report.destroyed = destroyed;
        report.points = points;
    }

    if game.fleet.is_empty() {
        game.bullets.clear();
        game.fleet.build(&game.settings);
        game.settings.increase_speed();
        game.stats.level += 1;
        report.level_up = true;
        log::info!("Level {} reached, score {}", game.stats.level, game.stats.score);
    }
}

/// Lose a ship.  With ships to spare the field is rebuilt and the game
/// freezes briefly; losing the last one ends the game.
pub fn ship_hit(game: &mut Game, cause: ShipHit) -> bool {
    game.stats.ships_left = game.stats.ships_left.saturating_sub(1);
    debug_assert!(game.stats.ships_left <= game.settings.ship_limit);
    log::debug!("Ship hit by {cause:?}, {} left", game.stats.ships_left);

    if game.stats.ships_left > 0 {
        game.clear_field();
        game.fleet.build(&game.settings);
        game.ship.center(&game.settings);
        let ticks = game.settings.stun_ticks();
        game.stats.status = if ticks > 0 {
            GameStatus::Stunned { remaining_ticks: ticks }
        } else {
            GameStatus::Playing
        };
        false
    } else {
        game.stats.status = GameStatus::Inactive;
        game.pointer_visible = true;
        log::info!(
            "Game over: score {}, level {}",
            game.stats.score,
            game.stats.level
        );
        true
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.
///
/// While inactive nothing moves.  While stunned only the countdown runs;
/// the frame on which it reaches zero hands control back to play without
/// simulating.  Otherwise the fixed order is: ship, projectiles, fleet,
/// enemy fire, shoot-downs, then the lethal checks (first hit wins).
pub fn tick(game: &mut Game, now: Instant, rng: &mut impl Rng) -> TickReport {
    let mut report = TickReport::default();

    match game.stats.status {
        GameStatus::Inactive => return report,
        GameStatus::Stunned { remaining_ticks } => {
            game.frame += 1;
            let remaining_ticks = remaining_ticks.saturating_sub(1);
            game.stats.status = if remaining_ticks == 0 {
                GameStatus::Playing
            } else {
                GameStatus::Stunned { remaining_ticks }
            };
            return report;
        }
        GameStatus::Playing => {}
    }

    game.frame += 1;

    // ── 1. Ship ──────────────────────────────────────────────────────────────
    game.ship.update(&game.settings);

    // ── 2. Projectiles ───────────────────────────────────────────────────────
    update_bullets(game);

    // ── 3. Fleet ─────────────────────────────────────────────────────────────
    game.fleet.update(&mut game.settings);

    // ── 4. Enemy fire ────────────────────────────────────────────────────────
    report.alien_fired = update_fire_alien(game, now, rng);

    // ── 5. Shoot-downs ───────────────────────────────────────────────────────
    check_bullet_alien_collisions(game, &mut report);

    // ── 6. Lethal checks ─────────────────────────────────────────────────────
    let cause = ship_collision(&game.ship, &game.fleet.aliens, &game.alien_bullets).or_else(|| {
        game.fleet
            .reached_bottom(&game.settings)
            .then_some(ShipHit::Breach)
    });
    if let Some(cause) = cause {
        report.ship_hit = Some(cause);
        report.game_over = ship_hit(game, cause);
    }

    report
}
