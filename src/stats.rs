//! Game statistics and the active / stunned / inactive status.

use crate::settings::Settings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Menu / game over.  Nothing moves; the play button is shown.
    Inactive,
    Playing,
    /// Frozen interlude after a non-fatal ship hit.
    Stunned { remaining_ticks: u32 },
}

#[derive(Clone, Debug)]
pub struct GameStats {
    pub ships_left: u32,
    pub score: u64,
    pub level: u32,
    /// Survives `reset`; only ever raised.
    pub high_score: u64,
    pub status: GameStatus,
}

impl GameStats {
    pub fn new(settings: &Settings, high_score: u64) -> Self {
        Self {
            ships_left: settings.ship_limit,
            score: 0,
            level: 1,
            high_score,
            status: GameStatus::Inactive,
        }
    }

    /// Back to the values a fresh game starts with.  Leaves `status` and
    /// `high_score` alone.
    pub fn reset(&mut self, settings: &Settings) {
        self.ships_left = settings.ship_limit;
        self.score = 0;
        self.level = 1;
    }

    pub fn game_active(&self) -> bool {
        self.status != GameStatus::Inactive
    }

    pub fn add_points(&mut self, points: u64) {
        self.score += points;
        self.check_high_score();
    }

    /// Returns true when the current score became the new high score.
    pub fn check_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }
}
