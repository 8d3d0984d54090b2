//! Maze-chase simulation core: a player collecting dots on a fixed pillar
//! maze while a single pursuer chases it. Rendering is left to whoever
//! drains the [`GameEvent`] queue.

pub mod config;
pub mod error;
pub mod events;
pub mod game;
pub mod maze;
pub mod pursuer;
pub mod schedule;
pub mod simulation;

pub use config::Settings;
pub use error::{GameError, GameResult};
pub use events::{EndMessage, GameEvent};
pub use game::{Game, Outcome, SessionStatus};
pub use maze::{Cell, Direction, DotField, Grid, Position, GRID_SIZE, MIN_GRID_SIZE, PLAYER_START, PURSUER_START};
pub use simulation::{ScoreState, Simulation, DOT_SCORE, STARTING_LIVES};
