//! Tournament state: roster, rounds, score recording, match timer
//!
//! The whole tournament is the pair (players, rounds); standings and
//! stats are derived from it on demand by the engine. Mutations here
//! are the only ones in the application, and each one is followed by a
//! whole-state save by the owning coordinator.

use rand::prelude::*;

use crate::engine::{self, MatchScore, Round, TOTAL_PLAYERS, TOTAL_ROUNDS};

/// Court timer length in seconds: 14 minutes per match slot.
pub const MATCH_TIMER_SECONDS: u32 = 14 * 60;

/// Timer display turns to a warning below this many seconds.
pub const TIMER_WARN_SECONDS: u32 = 120;

/// Fallback names for the quick-fill action on the setup screen.
const NAME_POOL: [&str; 16] = [
    "Lyon", "Porto", "Malmo", "Ghent", "Turin", "Split", "Riga", "Bilbao",
    "Aarhus", "Leeds", "Nantes", "Parma", "Cadiz", "Bergen", "Lodz", "Graz",
];

/// A full tournament: the eight-player roster and the rounds played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tournament {
    /// Display names by roster index. Blank means not yet entered.
    pub players: Vec<String>,
    /// Rounds in play order. Always engine-generated, never hand-built.
    pub rounds: Vec<Round>,
}

impl Default for Tournament {
    fn default() -> Self {
        Self {
            players: vec![String::new(); TOTAL_PLAYERS],
            rounds: Vec::new(),
        }
    }
}

impl Tournament {
    /// Create an empty tournament with a blank roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted state.
    pub fn from_parts(players: Vec<String>, rounds: Vec<Round>) -> Self {
        Self { players, rounds }
    }

    /// Set one roster name. Leading/trailing whitespace is dropped.
    pub fn set_player_name(&mut self, index: usize, name: &str) {
        if index < self.players.len() {
            self.players[index] = name.trim().to_string();
        }
    }

    /// All eight names entered?
    pub fn is_ready(&self) -> bool {
        self.players.iter().all(|name| !name.is_empty())
    }

    /// Has round 1 been dealt?
    pub fn has_started(&self) -> bool {
        !self.rounds.is_empty()
    }

    /// Deal round 1. No-op unless the roster is complete and nothing
    /// has been played yet.
    pub fn start(&mut self) -> bool {
        if !self.is_ready() || self.has_started() {
            return false;
        }
        let matches = engine::generate_round(&self.players, &self.rounds);
        self.rounds.push(Round { matches });
        true
    }

    /// Record a match result. The first recorded score sticks; a match
    /// that already has one is left untouched.
    pub fn record_score(
        &mut self,
        round_idx: usize,
        match_idx: usize,
        team1: u32,
        team2: u32,
    ) -> bool {
        let Some(m) = self
            .rounds
            .get_mut(round_idx)
            .and_then(|r| r.matches.get_mut(match_idx))
        else {
            return false;
        };
        if m.score.is_some() {
            return false;
        }
        m.score = Some(MatchScore { team1, team2 });
        true
    }

    /// The round currently in play (the last one dealt).
    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    /// Index of the round currently in play.
    pub fn current_round_index(&self) -> usize {
        self.rounds.len().saturating_sub(1)
    }

    /// Every match of the current round scored?
    pub fn current_round_complete(&self) -> bool {
        self.rounds.last().is_some_and(|r| r.is_complete())
    }

    /// Deal the next round. Refused while the current round is open and
    /// once all seven rounds exist.
    pub fn next_round(&mut self) -> bool {
        if self.rounds.len() >= TOTAL_ROUNDS || !self.current_round_complete() {
            return false;
        }
        let matches = engine::generate_round(&self.players, &self.rounds);
        self.rounds.push(Round { matches });
        true
    }

    /// Seven rounds dealt and the last one scored.
    pub fn is_finished(&self) -> bool {
        self.rounds.len() >= TOTAL_ROUNDS && self.current_round_complete()
    }

    /// Wipe everything back to a blank roster.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Fill every blank roster slot with a distinct name from the
    /// built-in pool. Names already entered are left alone.
    pub fn fill_random_names(&mut self) {
        self.fill_random_names_with_rng(&mut rand::rng());
    }

    /// Quick-fill using a specific RNG (for testing/seeding).
    pub fn fill_random_names_with_rng<R: Rng>(&mut self, rng: &mut R) {
        let mut pool: Vec<&str> = NAME_POOL
            .iter()
            .copied()
            .filter(|candidate| !self.players.iter().any(|p| p == candidate))
            .collect();
        pool.shuffle(rng);

        for slot in self.players.iter_mut().filter(|s| s.is_empty()) {
            if let Some(name) = pool.pop() {
                *slot = name.to_string();
            }
        }
    }
}

/// Countdown clock for the match slot in play.
///
/// Purely presentational; the engine never reads it. Mirrors a court
/// booking: 14 minutes, pause/resume, restart when it has run out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchTimer {
    /// Seconds left on the clock.
    pub remaining: u32,
    /// Whether the clock is counting down.
    pub running: bool,
}

impl Default for MatchTimer {
    fn default() -> Self {
        Self {
            remaining: MATCH_TIMER_SECONDS,
            running: false,
        }
    }
}

impl MatchTimer {
    /// Fresh, paused, full-length timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one second. Stops itself at zero.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        if self.remaining > 0 {
            self.remaining -= 1;
            if self.remaining == 0 {
                self.running = false;
            }
        }
    }

    /// Pause/resume. Toggling an expired timer restarts it from full.
    pub fn toggle(&mut self) {
        if self.remaining == 0 {
            self.remaining = MATCH_TIMER_SECONDS;
            self.running = true;
        } else {
            self.running = !self.running;
        }
    }

    /// Back to full length, paused.
    pub fn reset(&mut self) {
        self.remaining = MATCH_TIMER_SECONDS;
        self.running = false;
    }

    /// Has the clock run out?
    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Clock face, MM:SS.
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn named_tournament() -> Tournament {
        let mut t = Tournament::new();
        for (i, name) in ["A", "B", "C", "D", "E", "F", "G", "H"].iter().enumerate() {
            t.set_player_name(i, name);
        }
        t
    }

    fn score_current_round(t: &mut Tournament) {
        let round_idx = t.current_round_index();
        t.record_score(round_idx, 0, 3, 1);
        t.record_score(round_idx, 1, 3, 2);
    }

    #[test]
    fn test_blank_roster_is_not_ready() {
        let mut t = Tournament::new();
        assert!(!t.is_ready());
        t.set_player_name(0, "Anna");
        assert!(!t.is_ready());
    }

    #[test]
    fn test_full_roster_is_ready() {
        let t = named_tournament();
        assert!(t.is_ready());
    }

    #[test]
    fn test_names_are_trimmed() {
        let mut t = Tournament::new();
        t.set_player_name(0, "  Anna  ");
        assert_eq!(t.players[0], "Anna");
        t.set_player_name(1, "   ");
        assert!(t.players[1].is_empty());
    }

    #[test]
    fn test_start_requires_full_roster() {
        let mut t = Tournament::new();
        assert!(!t.start());
        assert!(!t.has_started());

        let mut t = named_tournament();
        assert!(t.start());
        assert!(t.has_started());
        assert_eq!(t.rounds.len(), 1);
        assert_eq!(t.rounds[0].matches.len(), 2);
    }

    #[test]
    fn test_start_twice_is_a_no_op() {
        let mut t = named_tournament();
        assert!(t.start());
        assert!(!t.start());
        assert_eq!(t.rounds.len(), 1);
    }

    #[test]
    fn test_score_recording_is_set_once() {
        let mut t = named_tournament();
        t.start();

        assert!(t.record_score(0, 0, 3, 1));
        assert_eq!(
            t.rounds[0].matches[0].score,
            Some(MatchScore { team1: 3, team2: 1 })
        );

        // Second write bounces off
        assert!(!t.record_score(0, 0, 0, 3));
        assert_eq!(
            t.rounds[0].matches[0].score,
            Some(MatchScore { team1: 3, team2: 1 })
        );
    }

    #[test]
    fn test_score_recording_rejects_bad_targets() {
        let mut t = named_tournament();
        t.start();
        assert!(!t.record_score(5, 0, 3, 1));
        assert!(!t.record_score(0, 9, 3, 1));
    }

    #[test]
    fn test_next_round_gated_on_completion() {
        let mut t = named_tournament();
        t.start();

        assert!(!t.next_round());
        assert_eq!(t.rounds.len(), 1);

        score_current_round(&mut t);
        assert!(t.current_round_complete());
        assert!(t.next_round());
        assert_eq!(t.rounds.len(), 2);
    }

    #[test]
    fn test_tournament_stops_after_seven_rounds() {
        let mut t = named_tournament();
        t.start();

        for _ in 0..TOTAL_ROUNDS - 1 {
            score_current_round(&mut t);
            assert!(t.next_round());
        }
        assert_eq!(t.rounds.len(), TOTAL_ROUNDS);
        assert!(!t.is_finished());

        score_current_round(&mut t);
        assert!(t.is_finished());
        assert!(!t.next_round());
        assert_eq!(t.rounds.len(), TOTAL_ROUNDS);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut t = named_tournament();
        t.start();
        score_current_round(&mut t);
        t.reset();

        assert!(!t.has_started());
        assert!(t.players.iter().all(|p| p.is_empty()));
    }

    #[test]
    fn test_random_fill_completes_the_roster() {
        let mut t = Tournament::new();
        t.set_player_name(2, "Anna");

        let mut rng = StdRng::seed_from_u64(5);
        t.fill_random_names_with_rng(&mut rng);

        assert!(t.is_ready());
        assert_eq!(t.players[2], "Anna");

        // All distinct
        let mut names = t.players.clone();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), TOTAL_PLAYERS);
    }

    #[test]
    fn test_random_fill_avoids_existing_pool_name() {
        let mut t = Tournament::new();
        t.set_player_name(0, "Lyon");

        let mut rng = StdRng::seed_from_u64(9);
        t.fill_random_names_with_rng(&mut rng);

        assert_eq!(t.players.iter().filter(|p| *p == "Lyon").count(), 1);
    }

    #[test]
    fn test_timer_counts_down_and_stops() {
        let mut timer = MatchTimer::new();
        assert_eq!(timer.remaining, MATCH_TIMER_SECONDS);

        timer.tick();
        assert_eq!(timer.remaining, MATCH_TIMER_SECONDS); // paused

        timer.toggle();
        timer.tick();
        timer.tick();
        assert_eq!(timer.remaining, MATCH_TIMER_SECONDS - 2);
    }

    #[test]
    fn test_timer_expires_and_restarts_on_toggle() {
        let mut timer = MatchTimer {
            remaining: 1,
            running: true,
        };
        timer.tick();
        assert!(timer.is_expired());
        assert!(!timer.running);

        timer.tick();
        assert_eq!(timer.remaining, 0); // never negative

        timer.toggle();
        assert_eq!(timer.remaining, MATCH_TIMER_SECONDS);
        assert!(timer.running);
    }

    #[test]
    fn test_timer_display() {
        let timer = MatchTimer::new();
        assert_eq!(timer.display(), "14:00");

        let timer = MatchTimer {
            remaining: 65,
            running: false,
        };
        assert_eq!(timer.display(), "01:05");
    }
}
