//! Application state and core logic

pub mod screen;
pub mod state;

pub use screen::{AppCoordinator, Screen, ScoreEntry, TeamSide};
pub use state::{MatchTimer, Tournament, MATCH_TIMER_SECONDS, TIMER_WARN_SECONDS};
