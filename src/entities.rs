//! All game entity types: plain data plus their per-frame motion.
//!
//! Every entity keeps a float position for sub-pixel accuracy and an
//! integer `rect` truncated from it after each move.

use crate::geometry::Rect;
use crate::settings::Settings;

// ── Player ship ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Ship {
    pub x: f32,
    pub rect: Rect,
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Ship {
    /// A ship sitting centred on the bottom edge of the screen.
    pub fn new(settings: &Settings) -> Self {
        let mut ship = Self {
            x: 0.0,
            rect: Rect::new(0, 0, settings.ship_width, settings.ship_height),
            moving_left: false,
            moving_right: false,
        };
        ship.center(settings);
        ship
    }

    pub fn center(&mut self, settings: &Settings) {
        self.rect.x = (settings.screen_width - self.rect.width) / 2;
        self.rect.y = settings.screen_height - self.rect.height;
        self.x = self.rect.x as f32;
    }

    /// Move by `ship_speed` according to the movement flags, never letting
    /// the rect leave the screen horizontally.
    pub fn update(&mut self, settings: &Settings) {
        if self.moving_right {
            self.x += settings.ship_speed;
        }
        if self.moving_left {
            self.x -= settings.ship_speed;
        }
        let max_x = (settings.screen_width - self.rect.width).max(0) as f32;
        self.x = self.x.clamp(0.0, max_x);
        self.rect.x = self.x as i32;
    }
}

// ── Aliens ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Alien {
    pub x: f32,
    pub y: f32,
    pub rect: Rect,
}

impl Alien {
    pub fn new(x: f32, y: f32, settings: &Settings) -> Self {
        Self {
            x,
            y,
            rect: Rect::new(x as i32, y as i32, settings.alien_width, settings.alien_height),
        }
    }

    /// Horizontal step in the fleet's shared direction.
    pub fn update(&mut self, speed: f32, direction: f32) {
        self.x += speed * direction;
        self.rect.x = self.x as i32;
    }

    pub fn drop_by(&mut self, amount: i32) {
        self.y += amount as f32;
        self.rect.y = self.y as i32;
    }

    pub fn check_edges(&self, screen_width: i32) -> bool {
        self.rect.right() >= screen_width || self.rect.left() <= 0
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Which half of the double shot a player bullet belongs to.  Both halves
/// currently share the same straight-up trajectory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub struct Bullet {
    pub y: f32,
    pub rect: Rect,
    pub side: Side,
}

impl Bullet {
    /// A bullet whose top-centre sits on the ship's top-centre.
    pub fn fired_from(ship: &Ship, side: Side, settings: &Settings) -> Self {
        let width = settings.bullet_width;
        let rect = Rect::new(
            ship.rect.center_x() - width / 2,
            ship.rect.top(),
            width,
            settings.bullet_height,
        );
        Self {
            y: rect.y as f32,
            rect,
            side,
        }
    }

    pub fn update(&mut self, speed: f32) {
        self.y -= speed;
        self.rect.y = self.y as i32;
    }

    pub fn is_off_screen(&self) -> bool {
        self.rect.bottom() <= 0
    }
}

#[derive(Clone, Debug)]
pub struct AlienBullet {
    pub y: f32,
    pub rect: Rect,
}

impl AlienBullet {
    /// Centred horizontally on the shooter, starting at its top edge.
    pub fn fired_from(alien: &Alien, settings: &Settings) -> Self {
        let width = settings.alien_bullet_width;
        let rect = Rect::new(
            alien.rect.center_x() - width / 2,
            alien.rect.top(),
            width,
            settings.alien_bullet_height,
        );
        Self {
            y: rect.y as f32,
            rect,
        }
    }

    pub fn update(&mut self, speed: f32) {
        self.y += speed;
        self.rect.y = self.y as i32;
    }

    pub fn is_off_screen(&self, screen_height: i32) -> bool {
        self.rect.top() >= screen_height
    }
}
