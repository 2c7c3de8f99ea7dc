//! Rendering seam.
//!
//! The core never touches a terminal or a window: it describes each frame
//! as rectangles and text through the [`Renderer`] trait, and the backend
//! decides how logical coordinates map onto its surface.

use std::io;

use crate::compute::Game;
use crate::geometry::Rect;
use crate::settings::{Rgb, Settings};

/// Horizontal anchoring for text; the `x` given to `draw_text` is the
/// left edge, the centre, or the right edge of the string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

pub trait Renderer {
    fn clear(&mut self, color: Rgb) -> io::Result<()>;
    fn draw_rect(&mut self, color: Rgb, rect: Rect) -> io::Result<()>;
    fn draw_text(&mut self, text: &str, x: i32, y: i32, align: Align, color: Rgb)
        -> io::Result<()>;
    fn set_pointer_visible(&mut self, visible: bool) -> io::Result<()>;
    /// Make everything drawn since the last `present` visible.
    fn present(&mut self) -> io::Result<()>;
}

// ── Play button ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Button {
    pub rect: Rect,
    pub label: String,
    pub hovered: bool,
}

impl Button {
    pub fn centered(settings: &Settings) -> Self {
        let screen = Rect::new(0, 0, settings.screen_width, settings.screen_height);
        Self {
            rect: screen.centered(settings.button_width, settings.button_height),
            label: settings.button_label.clone(),
            hovered: false,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.rect.contains_point(x, y)
    }

    fn draw<R: Renderer>(&self, out: &mut R, settings: &Settings) -> io::Result<()> {
        let color = if self.hovered {
            settings.button_hover_color
        } else {
            settings.button_color
        };
        out.draw_rect(color, self.rect)?;
        out.draw_text(
            &self.label,
            self.rect.center_x(),
            self.rect.center_y(),
            Align::Center,
            Rgb(255, 255, 255),
        )
    }
}

// ── Scoreboard ───────────────────────────────────────────────────────────────

/// Score rounded to the nearest ten, with thousands separators.
pub fn format_score(score: u64) -> String {
    group_thousands(score.saturating_add(5) / 10 * 10)
}

pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

const SCOREBOARD_MARGIN: i32 = 20;
const LEVEL_OFFSET: i32 = 40;

fn draw_scoreboard<R: Renderer>(out: &mut R, game: &Game) -> io::Result<()> {
    let settings = &game.settings;
    let stats = &game.stats;

    out.draw_text(
        &format_score(stats.score),
        settings.screen_width - SCOREBOARD_MARGIN,
        SCOREBOARD_MARGIN,
        Align::Right,
        settings.text_color,
    )?;
    out.draw_text(
        &format_score(stats.high_score),
        settings.screen_width / 2,
        SCOREBOARD_MARGIN,
        Align::Center,
        settings.text_color,
    )?;
    out.draw_text(
        &stats.level.to_string(),
        settings.screen_width - SCOREBOARD_MARGIN,
        SCOREBOARD_MARGIN + LEVEL_OFFSET,
        Align::Right,
        settings.text_color,
    )?;

    // Remaining ships, lined up from the top-left corner.
    for n in 0..stats.ships_left as i32 {
        let rect = Rect::new(
            10 + n * settings.ship_width,
            10,
            settings.ship_width,
            settings.ship_height,
        );
        out.draw_rect(settings.ship_color, rect)?;
    }
    Ok(())
}

// ── Frame ────────────────────────────────────────────────────────────────────

/// Draw one complete frame.  Called every tick whether or not the game is
/// active, so the menu stays live.
pub fn draw<R: Renderer>(out: &mut R, game: &Game) -> io::Result<()> {
    let settings = &game.settings;
    out.clear(settings.bg_color)?;

    out.draw_rect(settings.ship_color, game.ship.rect)?;
    for bullet in &game.bullets {
        out.draw_rect(settings.bullet_color, bullet.rect)?;
    }
    for alien in &game.fleet.aliens {
        out.draw_rect(settings.alien_color, alien.rect)?;
    }
    for bullet in &game.alien_bullets {
        out.draw_rect(settings.alien_bullet_color, bullet.rect)?;
    }

    draw_scoreboard(out, game)?;

    if !game.stats.game_active() {
        game.play_button.draw(out, settings)?;
    }

    out.set_pointer_visible(game.pointer_visible)?;
    out.present()
}
