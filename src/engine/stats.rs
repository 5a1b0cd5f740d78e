//! Per-player statistics and the standings order
//!
//! Stats are derived from scored matches only and recomputed from the
//! full history on every call. Points equal games won, not matches won:
//! a 3-2 loss is still worth two points, which keeps close losers ahead
//! of blown-out losers.

use super::{Round, TOTAL_PLAYERS};

/// Cumulative statistics for one player, derived from scored matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerStats {
    /// Roster index of this player.
    pub index: usize,
    /// Tournament points. Equal to games won across all scored matches.
    pub points: u32,
    pub matches_played: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub match_wins: u32,
    pub match_losses: u32,
}

impl PlayerStats {
    /// Match wins minus match losses.
    pub fn match_balance(&self) -> i64 {
        self.match_wins as i64 - self.match_losses as i64
    }

    /// Games won minus games lost.
    pub fn game_diff(&self) -> i64 {
        self.games_won as i64 - self.games_lost as i64
    }
}

/// One standings row: a player's stats plus their display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub stats: PlayerStats,
}

/// Aggregate per-player statistics over every scored match in `rounds`.
///
/// A match with an equal score counts as played but credits neither team
/// with a win or a loss.
pub fn compute_stats(players: &[String], rounds: &[Round]) -> Vec<PlayerStats> {
    assert_eq!(
        players.len(),
        TOTAL_PLAYERS,
        "roster must hold exactly {} players",
        TOTAL_PLAYERS
    );

    let mut stats: Vec<PlayerStats> = (0..TOTAL_PLAYERS)
        .map(|index| PlayerStats {
            index,
            ..Default::default()
        })
        .collect();

    for round in rounds {
        for m in &round.matches {
            let Some(score) = m.score else { continue };
            let team1_won = score.team1 > score.team2;
            let team2_won = score.team2 > score.team1;

            for &p in &m.team1 {
                let s = &mut stats[p];
                s.matches_played += 1;
                s.games_won += score.team1;
                s.games_lost += score.team2;
                s.points += score.team1;
                if team1_won {
                    s.match_wins += 1;
                } else if team2_won {
                    s.match_losses += 1;
                }
            }

            for &p in &m.team2 {
                let s = &mut stats[p];
                s.matches_played += 1;
                s.games_won += score.team2;
                s.games_lost += score.team1;
                s.points += score.team2;
                if team2_won {
                    s.match_wins += 1;
                } else if team1_won {
                    s.match_losses += 1;
                }
            }
        }
    }

    stats
}

/// Current standings, best first.
///
/// Ties on points break by match balance, then total match wins, then
/// game differential. Players tied on all four keys stay in roster
/// order (the sort is stable), but no caller should rely on that.
pub fn leaderboard(players: &[String], rounds: &[Round]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = compute_stats(players, rounds)
        .into_iter()
        .map(|stats| LeaderboardEntry {
            name: players[stats.index].clone(),
            stats,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.stats
            .points
            .cmp(&a.stats.points)
            .then_with(|| b.stats.match_balance().cmp(&a.stats.match_balance()))
            .then_with(|| b.stats.match_wins.cmp(&a.stats.match_wins))
            .then_with(|| b.stats.game_diff().cmp(&a.stats.game_diff()))
    });

    entries
}
