//! Game tunables.
//!
//! Static tunables never change during a run.  Dynamic tunables (speeds,
//! points per alien, fleet direction) are rescaled on every level-up and
//! restored to their base values whenever a new game starts.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// 24-bit colour, independent of any rendering backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Base values for the tunables that scale with level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseSpeeds {
    pub ship_speed: f32,
    pub bullet_speed: f32,
    pub alien_speed: f32,
    pub alien_bullet_speed: f32,
    pub alien_points: u64,
}

impl Default for BaseSpeeds {
    fn default() -> Self {
        Self {
            ship_speed: 1.5,
            bullet_speed: 3.0,
            alien_speed: 1.0,
            alien_bullet_speed: 1.5,
            alien_points: 50,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ── Screen ───────────────────────────────────────────────────────────────
    pub screen_width: i32,
    pub screen_height: i32,
    pub bg_color: Rgb,
    pub text_color: Rgb,

    // ── Ship ─────────────────────────────────────────────────────────────────
    pub ship_width: i32,
    pub ship_height: i32,
    pub ship_color: Rgb,
    pub ship_limit: u32,

    // ── Player bullets ───────────────────────────────────────────────────────
    pub bullet_width: i32,
    pub bullet_height: i32,
    pub bullet_color: Rgb,
    pub bullets_allowed: usize,

    // ── Aliens ───────────────────────────────────────────────────────────────
    pub alien_width: i32,
    pub alien_height: i32,
    pub alien_color: Rgb,
    pub fleet_drop_speed: i32,

    // ── Alien bullets ────────────────────────────────────────────────────────
    pub alien_bullet_width: i32,
    pub alien_bullet_height: i32,
    pub alien_bullet_color: Rgb,
    /// Minimum seconds between two enemy shots.
    pub alien_fire_interval: f32,

    // ── Play button ──────────────────────────────────────────────────────────
    pub button_width: i32,
    pub button_height: i32,
    pub button_color: Rgb,
    pub button_hover_color: Rgb,
    pub button_label: String,

    // ── Pacing ───────────────────────────────────────────────────────────────
    pub frame_rate: u32,
    /// Seconds the simulation stays frozen after a non-fatal ship hit.
    pub ship_hit_pause: f32,
    pub speedup_scale: f32,
    pub score_scale: f32,
    /// Upper bound for any scaled speed, as a multiple of its base value.
    pub max_speed_multiplier: f32,

    pub base: BaseSpeeds,

    // ── Dynamic (reset by `initialize_dynamic_settings`) ─────────────────────
    #[serde(skip)]
    pub ship_speed: f32,
    #[serde(skip)]
    pub bullet_speed: f32,
    #[serde(skip)]
    pub alien_speed: f32,
    #[serde(skip)]
    pub alien_bullet_speed: f32,
    #[serde(skip)]
    pub alien_points: u64,
    /// +1 moves the fleet right, -1 left.
    #[serde(skip)]
    pub fleet_direction: f32,
}

impl Default for Settings {
    fn default() -> Self {
        let mut settings = Self {
            screen_width: 1200,
            screen_height: 800,
            bg_color: Rgb(230, 230, 230),
            text_color: Rgb(30, 30, 30),

            ship_width: 60,
            ship_height: 40,
            ship_color: Rgb(40, 60, 200),
            ship_limit: 3,

            bullet_width: 3,
            bullet_height: 15,
            bullet_color: Rgb(60, 60, 60),
            bullets_allowed: 6,

            alien_width: 50,
            alien_height: 30,
            alien_color: Rgb(60, 160, 60),
            fleet_drop_speed: 10,

            alien_bullet_width: 3,
            alien_bullet_height: 15,
            alien_bullet_color: Rgb(200, 40, 40),
            alien_fire_interval: 1.0,

            button_width: 200,
            button_height: 50,
            button_color: Rgb(0, 160, 0),
            button_hover_color: Rgb(0, 210, 90),
            button_label: "May the C<>DE be with you".to_string(),

            frame_rate: 60,
            ship_hit_pause: 0.5,
            speedup_scale: 1.1,
            score_scale: 1.5,
            max_speed_multiplier: 3.0,

            base: BaseSpeeds::default(),

            ship_speed: 0.0,
            bullet_speed: 0.0,
            alien_speed: 0.0,
            alien_bullet_speed: 0.0,
            alien_points: 0,
            fleet_direction: 1.0,
        };
        settings.initialize_dynamic_settings();
        settings
    }
}

impl Settings {
    /// Load settings from a JSON file.  Keys missing from the file keep
    /// their default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let settings = Self::from_json(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let mut settings: Self = serde_json::from_str(text)?;
        settings.initialize_dynamic_settings();
        Ok(settings)
    }

    /// Restore every dynamic tunable to its base value.
    pub fn initialize_dynamic_settings(&mut self) {
        self.ship_speed = self.base.ship_speed;
        self.bullet_speed = self.base.bullet_speed;
        self.alien_speed = self.base.alien_speed;
        self.alien_bullet_speed = self.base.alien_bullet_speed;
        self.alien_points = self.base.alien_points;
        self.fleet_direction = 1.0;
    }

    /// Level-up scaling.  Speeds grow by `speedup_scale` but never beyond
    /// `max_speed_multiplier` times their base; points grow by
    /// `score_scale` without a cap.
    pub fn increase_speed(&mut self) {
        let scale = self.speedup_scale;
        let cap = self.max_speed_multiplier;
        self.ship_speed = (self.ship_speed * scale).min(self.base.ship_speed * cap);
        self.bullet_speed = (self.bullet_speed * scale).min(self.base.bullet_speed * cap);
        self.alien_speed = (self.alien_speed * scale).min(self.base.alien_speed * cap);
        self.alien_bullet_speed =
            (self.alien_bullet_speed * scale).min(self.base.alien_bullet_speed * cap);
        self.alien_points = (self.alien_points as f64 * self.score_scale as f64) as u64;
    }

    /// Number of frames the post-hit freeze lasts.
    pub fn stun_ticks(&self) -> u32 {
        (self.ship_hit_pause * self.frame_rate as f32).ceil().max(0.0) as u32
    }
}
