use std::time::{Duration, Instant};

use alien_invasion::collision::ShipHit;
use alien_invasion::compute::*;
use alien_invasion::entities::{Alien, AlienBullet, Bullet, Side};
use alien_invasion::geometry::Rect;
use alien_invasion::input::{Control, InputEvent, Key};
use alien_invasion::settings::Settings;
use alien_invasion::stats::GameStatus;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// A game already in play, started at `t0`.
fn playing_game(t0: Instant) -> Game {
    let mut game = Game::new(Settings::default(), 0);
    start_game(&mut game, t0);
    game
}

/// A playing game whose fleet is replaced by the given aliens.
fn game_with_aliens(t0: Instant, positions: &[(f32, f32)]) -> Game {
    let mut game = playing_game(t0);
    let aliens = positions
        .iter()
        .map(|&(x, y)| Alien::new(x, y, &game.settings))
        .collect();
    game.fleet.aliens = aliens;
    game
}

fn player_bullet(x: i32, y: i32) -> Bullet {
    Bullet {
        y: y as f32,
        rect: Rect::new(x, y, 3, 15),
        side: Side::Left,
    }
}

// ── Game::new ─────────────────────────────────────────────────────────────────

#[test]
fn new_game_waits_at_menu() {
    let game = Game::new(Settings::default(), 1234);
    assert_eq!(game.stats.status, GameStatus::Inactive);
    assert!(!game.stats.game_active());
    assert!(game.pointer_visible);
    assert_eq!(game.stats.ships_left, 3);
    assert_eq!(game.stats.level, 1);
    assert_eq!(game.stats.high_score, 1234);
    assert_eq!(game.fleet.len(), 121);
}

#[test]
fn inactive_tick_changes_nothing() {
    let t0 = Instant::now();
    let mut game = Game::new(Settings::default(), 0);
    let before = game.fleet.aliens.clone();
    let report = tick(&mut game, t0, &mut seeded_rng());
    assert_eq!(report, TickReport::default());
    assert_eq!(game.fleet.aliens, before);
    assert_eq!(game.frame, 0);
}

// ── Starting a game ───────────────────────────────────────────────────────────

#[test]
fn click_on_play_button_starts_game() {
    let t0 = Instant::now();
    let mut game = Game::new(Settings::default(), 0);
    let control = handle_event(&mut game, InputEvent::Click { x: 600.0, y: 400.0 }, t0);
    assert_eq!(control, Control::Continue);
    assert_eq!(game.stats.status, GameStatus::Playing);
    assert!(!game.pointer_visible);
    assert_eq!(game.last_alien_shot, Some(t0));
}

#[test]
fn click_outside_button_does_nothing() {
    let t0 = Instant::now();
    let mut game = Game::new(Settings::default(), 0);
    handle_event(&mut game, InputEvent::Click { x: 10.0, y: 10.0 }, t0);
    assert_eq!(game.stats.status, GameStatus::Inactive);
}

#[test]
fn click_while_playing_does_not_restart() {
    let t0 = Instant::now();
    let mut game = playing_game(t0);
    game.stats.score = 500;
    handle_event(&mut game, InputEvent::Click { x: 600.0, y: 400.0 }, t0);
    assert_eq!(game.stats.score, 500);
}

#[test]
fn play_key_starts_game() {
    let t0 = Instant::now();
    let mut game = Game::new(Settings::default(), 0);
    handle_event(&mut game, InputEvent::KeyDown(Key::Play), t0);
    assert!(game.stats.game_active());
}

#[test]
fn pointer_hover_highlights_button() {
    let t0 = Instant::now();
    let mut game = Game::new(Settings::default(), 0);
    handle_event(&mut game, InputEvent::PointerMoved { x: 550.0, y: 390.0 }, t0);
    assert!(game.play_button.hovered);
    handle_event(&mut game, InputEvent::PointerMoved { x: 50.0, y: 390.0 }, t0);
    assert!(!game.play_button.hovered);
}

#[test]
fn new_game_restores_base_settings_after_level_ups() {
    let t0 = Instant::now();
    let mut game = playing_game(t0);
    for _ in 0..4 {
        game.settings.increase_speed();
    }
    game.settings.fleet_direction = -1.0;
    game.stats.level = 5;
    game.stats.score = 9000;
    game.stats.high_score = 9000;
    game.stats.ships_left = 1;
    game.stats.status = GameStatus::Inactive;
    game.bullets.push(player_bullet(100, 100));
    game.alien_bullets.push(AlienBullet {
        y: 100.0,
        rect: Rect::new(100, 100, 3, 15),
    });

    start_game(&mut game, t0);

    let base = Settings::default();
    assert_eq!(game.settings.alien_speed, base.alien_speed);
    assert_eq!(game.settings.bullet_speed, base.bullet_speed);
    assert_eq!(game.settings.ship_speed, base.ship_speed);
    assert_eq!(game.settings.alien_bullet_speed, base.alien_bullet_speed);
    assert_eq!(game.settings.alien_points, base.alien_points);
    assert_eq!(game.settings.fleet_direction, 1.0);
    assert_eq!(game.stats.level, 1);
    assert_eq!(game.stats.score, 0);
    assert_eq!(game.stats.ships_left, 3);
    assert_eq!(game.stats.high_score, 9000);
    assert!(game.bullets.is_empty());
    assert!(game.alien_bullets.is_empty());
    assert_eq!(game.fleet.len(), 121);
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[test]
fn quit_and_close_stop_the_loop() {
    let t0 = Instant::now();
    let mut game = playing_game(t0);
    assert_eq!(handle_event(&mut game, InputEvent::KeyDown(Key::Quit), t0), Control::Quit);
    assert_eq!(handle_event(&mut game, InputEvent::Close, t0), Control::Quit);
}

#[test]
fn movement_keys_set_and_clear_flags() {
    let t0 = Instant::now();
    let mut game = playing_game(t0);
    handle_event(&mut game, InputEvent::KeyDown(Key::Right), t0);
    assert!(game.ship.moving_right);
    tick(&mut game, t0, &mut seeded_rng());
    assert_eq!(game.ship.rect.x, 571);
    handle_event(&mut game, InputEvent::KeyUp(Key::Right), t0);
    assert!(!game.ship.moving_right);

    handle_event(&mut game, InputEvent::KeyDown(Key::Left), t0);
    assert!(game.ship.moving_left);
    handle_event(&mut game, InputEvent::KeyUp(Key::Left), t0);
    assert!(!game.ship.moving_left);
}

#[test]
fn fire_key_spawns_double_shot() {
    let t0 = Instant::now();
    let mut game = playing_game(t0);
    handle_event(&mut game, InputEvent::KeyDown(Key::Fire), t0);
    assert_eq!(game.bullets.len(), 2);
    assert_eq!(game.bullets[0].side, Side::Left);
    assert_eq!(game.bullets[1].side, Side::Right);
    assert_eq!(game.bullets[0].rect, game.bullets[1].rect);
}

#[test]
fn fire_ignored_while_inactive() {
    let t0 = Instant::now();
    let mut game = Game::new(Settings::default(), 0);
    handle_event(&mut game, InputEvent::KeyDown(Key::Fire), t0);
    assert!(game.bullets.is_empty());
}

// ── fire_bullet ───────────────────────────────────────────────────────────────

#[test]
fn fire_rejected_at_bullet_cap() {
    let t0 = Instant::now();
    let mut game = playing_game(t0);
    for _ in 0..6 {
        game.bullets.push(player_bullet(100, 400));
    }
    assert!(!fire_bullet(&mut game));
    assert_eq!(game.bullets.len(), 6);
}

#[test]
fn fire_allowed_below_cap_adds_both_halves() {
    let t0 = Instant::now();
    let mut game = playing_game(t0);
    for _ in 0..5 {
        game.bullets.push(player_bullet(100, 400));
    }
    assert!(fire_bullet(&mut game));
    assert_eq!(game.bullets.len(), 7);
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[test]
fn player_bullets_rise_and_leave() {
    let t0 = Instant::now();
    let mut game = playing_game(t0);
    game.bullets.push(player_bullet(100, 400));
    game.bullets.push(player_bullet(110, -12));
    update_bullets(&mut game);
    assert_eq!(game.bullets.len(), 1);
    assert_eq!(game.bullets[0].rect.y, 397);
}

#[test]
fn alien_bullets_fall_and_leave_at_screen_height() {
    let t0 = Instant::now();
    let mut game = playing_game(t0);
    game.alien_bullets.push(AlienBullet {
        y: 100.0,
        rect: Rect::new(100, 100, 3, 15),
    });
    game.alien_bullets.push(AlienBullet {
        y: 799.0,
        rect: Rect::new(300, 799, 3, 15),
    });
    update_bullets(&mut game);
    assert_eq!(game.alien_bullets.len(), 1);
    assert_eq!(game.alien_bullets[0].y, 101.5);
}

// ── Enemy fire ────────────────────────────────────────────────────────────────

#[test]
fn alien_fire_waits_for_interval() {
    let t0 = Instant::now();
    let mut game = playing_game(t0);
    let mut rng = seeded_rng();

    let report = tick(&mut game, t0 + Duration::from_millis(500), &mut rng);
    assert!(!report.alien_fired);
    assert!(game.alien_bullets.is_empty());

    let t1 = t0 + Duration::from_millis(1000);
    let report = tick(&mut game, t1, &mut rng);
    assert!(report.alien_fired);
    assert_eq!(game.alien_bullets.len(), 1);
    assert_eq!(game.last_alien_shot, Some(t1));

    let report = tick(&mut game, t1 + Duration::from_millis(999), &mut rng);
    assert!(!report.alien_fired);
    assert_eq!(game.alien_bullets.len(), 1);
}

#[test]
fn alien_shot_starts_at_a_fleet_member() {
    let t0 = Instant::now();
    let mut game = playing_game(t0);
    assert!(fire_alien(&mut game, t0, &mut seeded_rng()));
    let shot = &game.alien_bullets[0];
    let shooter = game
        .fleet
        .aliens
        .iter()
        .find(|a| a.rect.top() == shot.rect.top() && a.rect.center_x() - 1 == shot.rect.x);
    assert!(shooter.is_some());
}

#[test]
fn alien_fire_with_empty_fleet_is_noop() {
    let t0 = Instant::now();
    let mut game = playing_game(t0);
    game.fleet.clear();
    let later = t0 + Duration::from_secs(5);
    assert!(!fire_alien(&mut game, later, &mut seeded_rng()));
    assert!(game.alien_bullets.is_empty());
    assert_eq!(game.last_alien_shot, Some(t0));
}

// ── Shoot-downs & levels ──────────────────────────────────────────────────────

#[test]
fn tick_shoots_down_alien_and_scores() {
    let t0 = Instant::now();
    let mut game = game_with_aliens(t0, &[(100.0, 100.0), (600.0, 300.0)]);
    // Bullet rises 3px to y=107, alien slides 1px to x=101: they overlap.
    game.bullets.push(player_bullet(110, 110));
    let report = tick(&mut game, t0, &mut seeded_rng());
    assert_eq!(report.destroyed, 1);
    assert_eq!(report.points, 50);
    assert_eq!(game.stats.score, 50);
    assert_eq!(game.stats.high_score, 50);
    assert_eq!(game.fleet.len(), 1);
    assert!(game.bullets.is_empty());
    assert!(!report.level_up);
}

#[test]
fn several_kills_in_one_frame_aggregate() {
    let t0 = Instant::now();
    let mut game = game_with_aliens(t0, &[(100.0, 100.0), (300.0, 100.0), (600.0, 300.0)]);
    game.bullets.push(player_bullet(110, 110));
    game.bullets.push(player_bullet(310, 110));
    let report = tick(&mut game, t0, &mut seeded_rng());
    assert_eq!(report.destroyed, 2);
    assert_eq!(game.stats.score, 100);
}

#[test]
fn clearing_fleet_levels_up() {
    let t0 = Instant::now();
    let mut game = game_with_aliens(t0, &[(100.0, 100.0)]);
    game.bullets.push(player_bullet(110, 110));
    game.bullets.push(player_bullet(900, 500));
    let report = tick(&mut game, t0, &mut seeded_rng());
    assert!(report.level_up);
    assert_eq!(game.stats.score, 50);
    assert_eq!(game.stats.level, 2);
    assert!(game.bullets.is_empty());
    assert_eq!(game.fleet.len(), 121);
    assert!((game.settings.alien_speed - 1.1).abs() < 1e-6);
    assert_eq!(game.settings.alien_points, 75);
}

#[test]
fn rebuilt_fleet_matches_initial_layout() {
    let t0 = Instant::now();
    let fresh = playing_game(t0);
    let mut game = game_with_aliens(t0, &[(100.0, 100.0)]);
    game.bullets.push(player_bullet(110, 110));
    tick(&mut game, t0, &mut seeded_rng());
    assert_eq!(game.fleet.aliens, fresh.fleet.aliens);
}

// ── Ship hits ─────────────────────────────────────────────────────────────────

#[test]
fn alien_contact_costs_a_ship_and_stuns() {
    let t0 = Instant::now();
    let mut game = game_with_aliens(t0, &[(570.0, 750.0), (100.0, 100.0)]);
    game.bullets.push(player_bullet(900, 500));
    game.ship.x = 575.0;
    let report = tick(&mut game, t0, &mut seeded_rng());
    assert_eq!(report.ship_hit, Some(ShipHit::Alien));
    assert!(!report.game_over);
    assert_eq!(game.stats.ships_left, 2);
    assert_eq!(game.stats.status, GameStatus::Stunned { remaining_ticks: 30 });
    assert_eq!(game.fleet.len(), 121);
    assert!(game.bullets.is_empty());
    assert!(game.alien_bullets.is_empty());
    assert_eq!(game.ship.rect.x, 570);
}

#[test]
fn alien_bullet_costs_a_ship() {
    let t0 = Instant::now();
    let mut game = game_with_aliens(t0, &[(100.0, 100.0)]);
    game.alien_bullets.push(AlienBullet {
        y: 750.0,
        rect: Rect::new(600, 750, 3, 15),
    });
    let report = tick(&mut game, t0, &mut seeded_rng());
    assert_eq!(report.ship_hit, Some(ShipHit::AlienBullet));
    assert_eq!(game.stats.ships_left, 2);
}

#[test]
fn alien_reaching_bottom_costs_a_ship() {
    let t0 = Instant::now();
    let mut game = game_with_aliens(t0, &[(100.0, 775.0)]);
    let report = tick(&mut game, t0, &mut seeded_rng());
    assert_eq!(report.ship_hit, Some(ShipHit::Breach));
    assert_eq!(game.stats.ships_left, 2);
}

#[test]
fn only_one_ship_lost_per_frame() {
    let t0 = Instant::now();
    let mut game = game_with_aliens(t0, &[(570.0, 750.0), (100.0, 775.0)]);
    game.alien_bullets.push(AlienBullet {
        y: 750.0,
        rect: Rect::new(600, 750, 3, 15),
    });
    let report = tick(&mut game, t0, &mut seeded_rng());
    assert_eq!(report.ship_hit, Some(ShipHit::Alien));
    assert_eq!(game.stats.ships_left, 2);
}

#[test]
fn last_ship_lost_ends_game_without_rebuild() {
    let t0 = Instant::now();
    let mut game = game_with_aliens(t0, &[(570.0, 750.0), (100.0, 100.0)]);
    game.stats.ships_left = 1;
    let report = tick(&mut game, t0, &mut seeded_rng());
    assert!(report.game_over);
    assert_eq!(game.stats.ships_left, 0);
    assert_eq!(game.stats.status, GameStatus::Inactive);
    assert!(!game.stats.game_active());
    assert!(game.pointer_visible);
    assert_eq!(game.fleet.len(), 2);
}

#[test]
fn ship_hit_directly_with_spares() {
    let t0 = Instant::now();
    let mut game = playing_game(t0);
    assert!(!ship_hit(&mut game, ShipHit::AlienBullet));
    assert!(!ship_hit(&mut game, ShipHit::AlienBullet));
    assert!(ship_hit(&mut game, ShipHit::AlienBullet));
    assert_eq!(game.stats.ships_left, 0);
    assert_eq!(game.stats.status, GameStatus::Inactive);
}

// ── Stun interlude ────────────────────────────────────────────────────────────

#[test]
fn stun_freezes_then_resumes() {
    let t0 = Instant::now();
    let mut game = playing_game(t0);
    ship_hit(&mut game, ShipHit::Alien);
    let frozen = game.fleet.aliens.clone();
    let mut rng = seeded_rng();

    for n in (1..30).rev() {
        tick(&mut game, t0, &mut rng);
        assert_eq!(game.stats.status, GameStatus::Stunned { remaining_ticks: n });
    }
    tick(&mut game, t0, &mut rng);
    assert_eq!(game.stats.status, GameStatus::Playing);
    assert_eq!(game.fleet.aliens, frozen);

    tick(&mut game, t0, &mut rng);
    assert_ne!(game.fleet.aliens, frozen);
}

#[test]
fn quit_works_while_stunned() {
    let t0 = Instant::now();
    let mut game = playing_game(t0);
    ship_hit(&mut game, ShipHit::Alien);
    assert!(matches!(game.stats.status, GameStatus::Stunned { .. }));
    assert_eq!(handle_event(&mut game, InputEvent::KeyDown(Key::Quit), t0), Control::Quit);
}

#[test]
fn zero_pause_skips_stun() {
    let t0 = Instant::now();
    let settings = Settings {
        ship_hit_pause: 0.0,
        ..Settings::default()
    };
    let mut game = Game::new(settings, 0);
    start_game(&mut game, t0);
    ship_hit(&mut game, ShipHit::Alien);
    assert_eq!(game.stats.status, GameStatus::Playing);
}

// ── Long run invariants ───────────────────────────────────────────────────────

#[test]
fn ships_never_increase_during_play() {
    let t0 = Instant::now();
    let mut game = playing_game(t0);
    let mut rng = seeded_rng();
    let mut ships = game.stats.ships_left;
    let mut score = game.stats.score;
    let mut level = game.stats.level;

    for i in 0..20_000u64 {
        if i % 20 == 0 {
            fire_bullet(&mut game);
        }
        let now = t0 + Duration::from_millis(i * 16);
        tick(&mut game, now, &mut rng);
        if !game.stats.game_active() {
            break;
        }
        assert!(game.stats.ships_left <= ships);
        assert!(game.stats.score >= score);
        assert!(game.stats.level >= level);
        ships = game.stats.ships_left;
        score = game.stats.score;
        level = game.stats.level;
    }
}
