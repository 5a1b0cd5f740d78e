//! Round generation: who partners whom, who faces whom
//!
//! Round 1 is a random deal. Every later round re-seats the field by
//! current points, pairing the best available player with the worst
//! available player under the rule that nobody partners the same
//! person twice in a tournament. The pair search is a greedy
//! backtracker rather than an exhaustive matcher, so it can miss a
//! valid seating that exists; when it does, the round falls back to
//! pairing adjacent ranks and knowingly repeats a partnership.

use rand::prelude::*;
use std::collections::HashSet;

use super::stats::compute_stats;
use super::{Match, Round, TOTAL_PLAYERS};

/// Generate the next round's two matches from the history so far.
///
/// Never fails: if no repeat-free seating is found, the fallback still
/// returns a structurally valid round.
pub fn generate_round(players: &[String], rounds: &[Round]) -> Vec<Match> {
    generate_round_with_rng(players, rounds, &mut rand::rng())
}

/// Generate a round using a specific RNG (for testing/seeding).
///
/// The RNG is only consulted for round 1; later rounds are a
/// deterministic function of the history.
pub fn generate_round_with_rng<R: Rng>(
    players: &[String],
    rounds: &[Round],
    rng: &mut R,
) -> Vec<Match> {
    if rounds.is_empty() {
        return random_first_round(rng);
    }

    // Seating order is by points alone. The displayed standings use the
    // full tie-break cascade; the mismatch is deliberate and keeps
    // seating independent of presentation-level tie-breaking.
    let stats = compute_stats(players, rounds);
    let mut order: Vec<usize> = (0..TOTAL_PLAYERS).collect();
    order.sort_by(|&a, &b| stats[b].points.cmp(&stats[a].points));

    let partnerships = previous_partnerships(rounds);

    let pairs = find_pairs(&order, &partnerships).unwrap_or_else(|| {
        log::warn!("no repeat-free seating found, pairing adjacent ranks instead");
        order.chunks(2).map(|c| [c[0], c[1]]).collect()
    });

    assemble_matches(&pairs)
}

/// Round 1: shuffle the roster and deal it into four consecutive pairs.
fn random_first_round<R: Rng>(rng: &mut R) -> Vec<Match> {
    let mut indices: Vec<usize> = (0..TOTAL_PLAYERS).collect();
    indices.shuffle(rng);

    vec![
        Match::new([indices[0], indices[1]], [indices[2], indices[3]]),
        Match::new([indices[4], indices[5]], [indices[6], indices[7]]),
    ]
}

/// Every unordered pair that has already been a team, keyed low-high.
fn previous_partnerships(rounds: &[Round]) -> HashSet<(usize, usize)> {
    let mut partnerships = HashSet::new();
    for round in rounds {
        for m in &round.matches {
            partnerships.insert(pair_key(m.team1[0], m.team1[1]));
            partnerships.insert(pair_key(m.team2[0], m.team2[1]));
        }
    }
    partnerships
}

fn pair_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Greedy backtracking pair search over a rank-sorted list.
///
/// The head of the list (best remaining player) is tried against
/// candidates from the tail upward, skipping anyone they have already
/// partnered. The head itself is never reconsidered at the parent
/// level, so exhausting its candidates fails the whole branch.
fn find_pairs(
    available: &[usize],
    partnerships: &HashSet<(usize, usize)>,
) -> Option<Vec<[usize; 2]>> {
    if available.is_empty() {
        return Some(Vec::new());
    }

    let p1 = available[0];
    for i in (1..available.len()).rev() {
        let p2 = available[i];
        if partnerships.contains(&pair_key(p1, p2)) {
            continue;
        }

        let remaining: Vec<usize> = available[1..]
            .iter()
            .copied()
            .filter(|&p| p != p2)
            .collect();

        if let Some(mut pairs) = find_pairs(&remaining, partnerships) {
            pairs.insert(0, [p1, p2]);
            return Some(pairs);
        }
    }

    None
}

/// Turn four rank-ordered pairs into two balanced matches.
///
/// Pairs arrive strongest-first, so pair[0]+pair[3] and pair[1]+pair[2]
/// carry roughly equal combined rank (1+8 vs 4+5, 2+7 vs 3+6).
fn assemble_matches(pairs: &[[usize; 2]]) -> Vec<Match> {
    vec![
        Match::new(pairs[0], pairs[3]),
        Match::new(pairs[1], pairs[2]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MatchScore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn roster() -> Vec<String> {
        ["A", "B", "C", "D", "E", "F", "G", "H"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn scored(team1: [usize; 2], team2: [usize; 2], t1: u32, t2: u32) -> Match {
        Match {
            team1,
            team2,
            score: Some(MatchScore { team1: t1, team2: t2 }),
        }
    }

    /// Two matches, four teams of two, every roster index exactly once.
    fn assert_valid_round(matches: &[Match]) {
        assert_eq!(matches.len(), 2);
        let mut seen = HashSet::new();
        for m in matches {
            for p in m.players() {
                assert!(p < TOTAL_PLAYERS, "index {} out of roster", p);
                assert!(seen.insert(p), "player {} appears twice", p);
            }
        }
        assert_eq!(seen.len(), TOTAL_PLAYERS);
    }

    /// Pairs in `matches` that already appear in `partnerships`.
    fn repeated_pairs(matches: &[Match], partnerships: &HashSet<(usize, usize)>) -> usize {
        matches
            .iter()
            .flat_map(|m| [pair_key(m.team1[0], m.team1[1]), pair_key(m.team2[0], m.team2[1])])
            .filter(|pair| partnerships.contains(pair))
            .count()
    }

    #[test]
    fn test_first_round_is_structurally_valid() {
        for _ in 0..100 {
            let matches = generate_round(&roster(), &[]);
            assert_valid_round(&matches);
            assert!(matches.iter().all(|m| !m.is_scored()));
        }
    }

    #[test]
    fn test_first_round_is_seed_deterministic() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        let first = generate_round_with_rng(&roster(), &[], &mut rng1);
        let second = generate_round_with_rng(&roster(), &[], &mut rng2);

        assert_eq!(first, second);
    }

    #[test]
    fn test_second_round_avoids_first_round_partners() {
        let rounds = vec![Round {
            matches: vec![scored([0, 1], [2, 3], 3, 1), scored([4, 5], [6, 7], 3, 0)],
        }];
        let matches = generate_round(&roster(), &rounds);

        assert_valid_round(&matches);
        let partnerships = previous_partnerships(&rounds);
        assert_eq!(repeated_pairs(&matches, &partnerships), 0);
    }

    #[test]
    fn test_second_round_pairs_high_with_low() {
        // Points after round 1: 0,1 and 4,5 on 3; 6,7 on 1; 2,3 on 0.
        // Seating order (stable on roster index): 0 1 4 5 6 7 2 3.
        let rounds = vec![Round {
            matches: vec![scored([0, 1], [2, 3], 3, 0), scored([4, 5], [6, 7], 3, 1)],
        }];
        let matches = generate_round(&roster(), &rounds);

        // Best available takes the worst available they haven't
        // partnered: 0-3, then 1-2, then 4-7, then 5-6. Balanced
        // assembly puts pair 0 against pair 3 and pair 1 against pair 2.
        assert_eq!(matches[0].team1, [0, 3]);
        assert_eq!(matches[0].team2, [5, 6]);
        assert_eq!(matches[1].team1, [1, 2]);
        assert_eq!(matches[1].team2, [4, 7]);
    }

    #[test]
    fn test_later_rounds_are_deterministic() {
        let rounds = vec![Round {
            matches: vec![scored([0, 1], [2, 3], 3, 1), scored([4, 5], [6, 7], 3, 2)],
        }];
        let first = generate_round(&roster(), &rounds);
        let second = generate_round(&roster(), &rounds);
        assert_eq!(first, second);
    }

    #[test]
    fn test_search_skips_blocked_candidate_and_recovers() {
        // Block the head's preferred (worst-ranked) candidate and make
        // sure the search settles on the next-worst instead of failing.
        let order: Vec<usize> = (0..TOTAL_PLAYERS).collect();
        let mut partnerships = HashSet::new();
        partnerships.insert(pair_key(0, 7));

        let pairs = find_pairs(&order, &partnerships).unwrap();
        assert_eq!(pairs[0], [0, 6]);
        assert_eq!(pairs.len(), 4);
    }

    #[test]
    fn test_search_fails_when_head_is_fully_blocked() {
        let order: Vec<usize> = (0..TOTAL_PLAYERS).collect();
        let partnerships: HashSet<(usize, usize)> =
            (1..TOTAL_PLAYERS).map(|p| pair_key(0, p)).collect();

        assert_eq!(find_pairs(&order, &partnerships), None);
    }

    #[test]
    fn test_fallback_pairs_adjacent_ranks() {
        // Player 0 has partnered everyone, so no repeat-free seating
        // exists and the fallback must kick in. History scores keep
        // every match 2-2 so the seating order stays 0..7.
        let rounds: Vec<Round> = (1..TOTAL_PLAYERS)
            .map(|p| {
                let others: Vec<usize> = (1..TOTAL_PLAYERS).filter(|&q| q != p).collect();
                Round {
                    matches: vec![
                        scored([0, p], [others[0], others[1]], 2, 2),
                        scored([others[2], others[3]], [others[4], others[5]], 2, 2),
                    ],
                }
            })
            .collect();

        let matches = generate_round(&roster(), &rounds);
        assert_valid_round(&matches);

        // Adjacent-rank pairs (0,1) (2,3) (4,5) (6,7), assembled
        // pair[0] vs pair[3] and pair[1] vs pair[2].
        assert_eq!(matches[0].team1, [0, 1]);
        assert_eq!(matches[0].team2, [6, 7]);
        assert_eq!(matches[1].team1, [2, 3]);
        assert_eq!(matches[1].team2, [4, 5]);

        // This round does repeat a partnership; that is the accepted
        // cost of the fallback.
        let partnerships = previous_partnerships(&rounds);
        assert!(repeated_pairs(&matches, &partnerships) > 0);
    }

    #[test]
    fn test_full_tournament_simulation() {
        // Play all seven rounds with a fixed score pattern. Every
        // generated round must be structurally valid; rounds where the
        // search succeeded (no repeated pair) must respect the
        // no-repeat rule against the entire history.
        let players = roster();
        let mut rng = StdRng::seed_from_u64(7);
        let mut rounds: Vec<Round> = Vec::new();

        for round_no in 0..crate::engine::TOTAL_ROUNDS {
            let mut matches = generate_round_with_rng(&players, &rounds, &mut rng);
            assert_valid_round(&matches);

            let partnerships = previous_partnerships(&rounds);
            let repeats = repeated_pairs(&matches, &partnerships);
            // Either the search path held the invariant, or the
            // fallback produced the adjacent-rank seating.
            if repeats > 0 {
                let stats = compute_stats(&players, &rounds);
                let mut order: Vec<usize> = (0..TOTAL_PLAYERS).collect();
                order.sort_by(|&a, &b| stats[b].points.cmp(&stats[a].points));
                assert_eq!(matches[0].team1, [order[0], order[1]]);
                assert_eq!(matches[1].team1, [order[2], order[3]]);
            }

            for (i, m) in matches.iter_mut().enumerate() {
                m.score = Some(MatchScore {
                    team1: 3,
                    team2: ((round_no + i) % 3) as u32,
                });
            }
            rounds.push(Round { matches });
        }

        assert_eq!(rounds.len(), crate::engine::TOTAL_ROUNDS);
    }

    #[test]
    fn test_generated_rounds_are_unscored() {
        let rounds = vec![Round {
            matches: vec![scored([0, 1], [2, 3], 3, 1), scored([4, 5], [6, 7], 3, 0)],
        }];
        let matches = generate_round(&roster(), &rounds);
        assert!(matches.iter().all(|m| m.score.is_none()));
    }
}
