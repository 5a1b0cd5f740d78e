//! Tournament engine: stats aggregation, standings, round generation
//!
//! Everything in this module tree is a pure function over the
//! caller-supplied match history. Statistics and standings are
//! recomputed from `(players, rounds)` on every call and never stored,
//! so the history is the single source of truth and derived data can
//! never drift from it.

pub mod pairing;
pub mod stats;

pub use pairing::{generate_round, generate_round_with_rng};
pub use stats::{compute_stats, leaderboard, LeaderboardEntry, PlayerStats};

/// Number of players in a tournament. The format is fixed at eight.
pub const TOTAL_PLAYERS: usize = 8;

/// Number of rounds in a tournament. Seven rounds let each of the eight
/// players partner every other player exactly once (a full rotation).
pub const TOTAL_ROUNDS: usize = 7;

/// Games won by each team in one match.
///
/// Normal play ends 3 to something lower, but the engine only compares
/// the two values; an equal score credits neither team with a win.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    pub team1: u32,
    pub team2: u32,
}

/// One doubles match: two teams of two roster indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub team1: [usize; 2],
    pub team2: [usize; 2],
    /// `None` until the result is recorded.
    pub score: Option<MatchScore>,
}

impl Match {
    /// Create an unscored match between two teams.
    pub fn new(team1: [usize; 2], team2: [usize; 2]) -> Self {
        Match {
            team1,
            team2,
            score: None,
        }
    }

    /// All four roster indices taking part in this match.
    pub fn players(&self) -> [usize; 4] {
        [self.team1[0], self.team1[1], self.team2[0], self.team2[1]]
    }

    /// Whether a result has been recorded.
    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }
}

/// One round: two matches covering the full roster, in play order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub matches: Vec<Match>,
}

impl Round {
    /// Whether every match in the round has a recorded result.
    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(|m| m.is_scored())
    }
}
