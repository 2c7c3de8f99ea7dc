//! Alien Invasion, a fleet-shooting arcade game.
//!
//! The library holds the whole simulation and the collaborator seams
//! (`render::Renderer`, `input::InputEvent`); the binary is a terminal
//! front-end on top of it.

pub mod collision;
pub mod compute;
pub mod entities;
pub mod fleet;
pub mod geometry;
pub mod highscores;
pub mod input;
pub mod render;
pub mod settings;
pub mod stats;

pub use compute::{handle_event, tick, Game, TickReport};
pub use settings::Settings;
