//! Formation manager for the alien fleet.
//!
//! All members share one direction sign (kept in `Settings` because it is a
//! dynamic tunable reset on each new game) and move by the same delta every
//! frame.  When any member touches a side of the screen the whole fleet
//! drops by `fleet_drop_speed` and reverses, once per frame.

use rand::Rng;

use crate::entities::Alien;
use crate::settings::Settings;

#[derive(Clone, Debug, Default)]
pub struct Fleet {
    pub aliens: Vec<Alien>,
}

/// Columns and rows of a freshly built fleet.
pub fn fleet_dimensions(settings: &Settings) -> (usize, usize) {
    let aw = settings.alien_width;
    let ah = settings.alien_height;
    if aw <= 0 || ah <= 0 {
        return (0, 0);
    }
    let available_x = settings.screen_width - 2 * aw;
    let available_y = settings.screen_height - 3 * ah - settings.ship_height;
    let cols = (available_x / (2 * aw)).max(0) as usize;
    let rows = (available_y / (2 * ah)).max(0) as usize;
    (cols, rows)
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current members with a full grid.  Spacing between
    /// aliens is one alien width horizontally and one alien height
    /// vertically.
    pub fn build(&mut self, settings: &Settings) {
        let (cols, rows) = fleet_dimensions(settings);
        let aw = settings.alien_width as f32;
        let ah = settings.alien_height as f32;

        self.aliens.clear();
        self.aliens.reserve(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let x = aw + 2.0 * aw * col as f32;
                let y = 1.5 * ah + 2.0 * ah * row as f32;
                self.aliens.push(Alien::new(x, y, settings));
            }
        }
        log::debug!("Built fleet of {} aliens ({cols}x{rows})", self.aliens.len());
    }

    pub fn len(&self) -> usize {
        self.aliens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliens.is_empty()
    }

    pub fn clear(&mut self) {
        self.aliens.clear();
    }

    pub fn check_edges(&self, settings: &Settings) -> bool {
        self.aliens
            .iter()
            .any(|alien| alien.check_edges(settings.screen_width))
    }

    /// Drop every member and flip the shared direction.
    pub fn change_direction(&mut self, settings: &mut Settings) {
        for alien in &mut self.aliens {
            alien.drop_by(settings.fleet_drop_speed);
        }
        settings.fleet_direction = -settings.fleet_direction;
    }

    /// One frame of fleet motion: at most one drop-and-reverse, then the
    /// horizontal step.  Returns whether the fleet reversed.
    pub fn update(&mut self, settings: &mut Settings) -> bool {
        let reversed = self.check_edges(settings);
        if reversed {
            self.change_direction(settings);
        }
        for alien in &mut self.aliens {
            alien.update(settings.alien_speed, settings.fleet_direction);
        }
        reversed
    }

    /// True when any member has reached the bottom of the screen.
    pub fn reached_bottom(&self, settings: &Settings) -> bool {
        self.aliens
            .iter()
            .any(|alien| alien.rect.bottom() >= settings.screen_height)
    }

    /// A uniformly chosen live member, or `None` for an empty fleet.
    pub fn random_member(&self, rng: &mut impl Rng) -> Option<&Alien> {
        if self.aliens.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.aliens.len());
        self.aliens.get(index)
    }
}
