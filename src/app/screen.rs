//! Application screen state management
//!
//! Handles transitions between different application screens:
//! - Setup (roster entry)
//! - Tournament (round in play, score entry, match timer)
//! - Leaderboard (standings)
//! - About (format rules)
//!
//! All key handling that touches state lives here; `main` only maps
//! terminal events onto the coordinator.

use crossterm::event::KeyCode;

use crate::app::state::{MatchTimer, Tournament};
use crate::engine::TOTAL_PLAYERS;
use crate::storage::Storage;

/// Longest accepted player name.
const MAX_NAME_LEN: usize = 12;

/// Which team of a match a score entry targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSide {
    Team1,
    Team2,
}

/// Two-step score entry for one team of one match.
///
/// Step one asks for the selected team's games. Picking 3 means they
/// won and step two asks for the loser's games; picking less means
/// the opponent took the match 3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub match_index: usize,
    pub side: TeamSide,
    /// `Some(3)` once step one established the selected team won.
    pub winner_games: Option<u32>,
}

impl ScoreEntry {
    /// Order `(own, opponent)` games into `(team1, team2)`.
    fn resolve(&self, own: u32, opponent: u32) -> (u32, u32) {
        match self.side {
            TeamSide::Team1 => (own, opponent),
            TeamSide::Team2 => (opponent, own),
        }
    }
}

/// The current application screen.
pub enum Screen {
    /// Roster entry before round 1
    Setup {
        selected: usize,
        input: String,
        editing: bool,
    },
    /// Round in play
    Tournament {
        entry: Option<ScoreEntry>,
        show_standings: bool,
        confirm_reset: bool,
    },
    /// Standings
    Leaderboard,
    /// Format rules
    About { from_setup: bool },
}

impl Screen {
    fn setup() -> Self {
        Screen::Setup {
            selected: 0,
            input: String::new(),
            editing: false,
        }
    }

    fn tournament() -> Self {
        Screen::Tournament {
            entry: None,
            show_standings: false,
            confirm_reset: false,
        }
    }

    /// Short tag used to persist the active screen.
    pub fn tag(&self) -> &'static str {
        match self {
            Screen::Setup { .. } => "setup",
            Screen::Tournament { .. } => "tournament",
            Screen::Leaderboard => "leaderboard",
            Screen::About { .. } => "about",
        }
    }

    /// Rebuild a screen from its persisted tag. Screens that need a
    /// running tournament fall back to setup when there is none.
    fn from_tag(tag: &str, has_started: bool) -> Self {
        match tag {
            "tournament" if has_started => Screen::tournament(),
            "leaderboard" if has_started => Screen::Leaderboard,
            "about" => Screen::About {
                from_setup: !has_started,
            },
            _ => Screen::setup(),
        }
    }
}

/// Deferred effect of a key press, applied once the screen borrow ends.
enum Action {
    None,
    CommitName(usize, String),
    FillNames,
    StartTournament,
    OpenEntry(usize, TeamSide),
    RecordScore(usize, u32, u32),
    NextRound,
    ResetTournament,
    GoLeaderboard,
    GoAbout,
    GoTournament,
    Quit,
}

/// Main application coordinator.
pub struct AppCoordinator {
    pub tournament: Tournament,
    pub timer: MatchTimer,
    pub screen: Screen,
    pub should_quit: bool,
    storage: Option<Storage>,
}

impl AppCoordinator {
    /// Create a coordinator, restoring any tournament saved on disk.
    pub fn new() -> Self {
        let storage = match Storage::open() {
            Ok(storage) => Some(storage),
            Err(e) => {
                log::warn!("persistence disabled: {}", e);
                None
            }
        };

        let mut coordinator = Self {
            tournament: Tournament::new(),
            timer: MatchTimer::new(),
            screen: Screen::setup(),
            should_quit: false,
            storage,
        };

        let saved = coordinator
            .storage
            .as_ref()
            .and_then(|s| s.load_tournament().ok().flatten());
        if let Some(saved) = saved {
            coordinator.tournament = Tournament::from_parts(saved.players, saved.rounds);
            coordinator.screen =
                Screen::from_tag(&saved.screen, coordinator.tournament.has_started());
        }

        coordinator
    }

    /// One-second tick from the event loop.
    pub fn tick(&mut self) {
        self.timer.tick();
    }

    /// Dispatch a key press to the active screen.
    pub fn handle_key(&mut self, key: KeyCode) {
        let action = match self.screen {
            Screen::Setup { .. } => self.setup_key(key),
            Screen::Tournament { .. } => self.tournament_key(key),
            Screen::Leaderboard => Self::leaderboard_key(key),
            Screen::About { .. } => self.about_key(key),
        };
        self.apply(action);
    }

    fn setup_key(&mut self, key: KeyCode) -> Action {
        let Screen::Setup {
            selected,
            input,
            editing,
        } = &mut self.screen
        else {
            return Action::None;
        };

        if *editing {
            match key {
                KeyCode::Char(c) => {
                    if input.chars().count() < MAX_NAME_LEN {
                        input.push(c);
                    }
                }
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Enter => {
                    let name = std::mem::take(input);
                    *editing = false;
                    return Action::CommitName(*selected, name);
                }
                KeyCode::Esc => {
                    *editing = false;
                    input.clear();
                }
                _ => {}
            }
            return Action::None;
        }

        match key {
            KeyCode::Up => {
                *selected = selected.saturating_sub(1);
                Action::None
            }
            KeyCode::Down => {
                if *selected + 1 < TOTAL_PLAYERS {
                    *selected += 1;
                }
                Action::None
            }
            KeyCode::Enter => {
                *editing = true;
                *input = self.tournament.players[*selected].clone();
                Action::None
            }
            KeyCode::Char('r') => Action::FillNames,
            KeyCode::Char('s') => Action::StartTournament,
            KeyCode::Char('a') => Action::GoAbout,
            KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }

    fn tournament_key(&mut self, key: KeyCode) -> Action {
        let Screen::Tournament {
            entry,
            show_standings,
            confirm_reset,
        } = &mut self.screen
        else {
            return Action::None;
        };

        if *confirm_reset {
            return match key {
                KeyCode::Char('y') => {
                    *confirm_reset = false;
                    Action::ResetTournament
                }
                _ => {
                    *confirm_reset = false;
                    Action::None
                }
            };
        }

        if let Some(e) = entry {
            match key {
                KeyCode::Esc => {
                    *entry = None;
                }
                KeyCode::Char(c @ '0'..='3') => {
                    let games = c.to_digit(10).unwrap_or(0);
                    match e.winner_games {
                        None => {
                            if games == 3 {
                                // They won; still need the loser's games
                                e.winner_games = Some(3);
                            } else {
                                let (t1, t2) = e.resolve(games, 3);
                                let match_index = e.match_index;
                                *entry = None;
                                return Action::RecordScore(match_index, t1, t2);
                            }
                        }
                        Some(_) => {
                            if games <= 2 {
                                let (t1, t2) = e.resolve(3, games);
                                let match_index = e.match_index;
                                *entry = None;
                                return Action::RecordScore(match_index, t1, t2);
                            }
                        }
                    }
                }
                _ => {}
            }
            return Action::None;
        }

        match key {
            KeyCode::Char(c @ '1'..='4') => {
                let slot = c.to_digit(10).unwrap_or(1) as usize - 1;
                let side = if slot % 2 == 0 {
                    TeamSide::Team1
                } else {
                    TeamSide::Team2
                };
                Action::OpenEntry(slot / 2, side)
            }
            KeyCode::Char(' ') => {
                self.timer.toggle();
                Action::None
            }
            KeyCode::Char('t') => {
                self.timer.reset();
                Action::None
            }
            KeyCode::Tab => {
                *show_standings = !*show_standings;
                Action::None
            }
            KeyCode::Char('n') => Action::NextRound,
            KeyCode::Char('l') => Action::GoLeaderboard,
            KeyCode::Char('a') => Action::GoAbout,
            KeyCode::Char('r') => {
                *confirm_reset = true;
                Action::None
            }
            KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }

    fn leaderboard_key(key: KeyCode) -> Action {
        match key {
            KeyCode::Esc | KeyCode::Backspace => Action::GoTournament,
            _ => Action::None,
        }
    }

    fn about_key(&mut self, key: KeyCode) -> Action {
        let Screen::About { from_setup } = self.screen else {
            return Action::None;
        };
        match key {
            KeyCode::Esc | KeyCode::Backspace => {
                if from_setup {
                    self.screen = Screen::setup();
                } else {
                    self.screen = Screen::tournament();
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::CommitName(index, name) => {
                self.tournament.set_player_name(index, &name);
                self.persist();
            }
            Action::FillNames => {
                self.tournament.fill_random_names();
                self.persist();
            }
            Action::StartTournament => {
                if self.tournament.start() {
                    self.timer.reset();
                    self.screen = Screen::tournament();
                    self.persist();
                }
            }
            Action::OpenEntry(match_index, side) => {
                let unscored = self
                    .tournament
                    .current_round()
                    .and_then(|r| r.matches.get(match_index))
                    .is_some_and(|m| !m.is_scored());
                if unscored {
                    if let Screen::Tournament { entry, .. } = &mut self.screen {
                        *entry = Some(ScoreEntry {
                            match_index,
                            side,
                            winner_games: None,
                        });
                    }
                }
            }
            Action::RecordScore(match_index, t1, t2) => {
                let round_idx = self.tournament.current_round_index();
                if self.tournament.record_score(round_idx, match_index, t1, t2) {
                    self.persist();
                }
            }
            Action::NextRound => {
                if self.tournament.next_round() {
                    self.timer.reset();
                    self.persist();
                }
            }
            Action::ResetTournament => {
                self.tournament.reset();
                self.timer.reset();
                self.screen = Screen::setup();
                self.persist();
            }
            Action::GoLeaderboard => {
                self.screen = Screen::Leaderboard;
                self.persist();
            }
            Action::GoAbout => {
                let from_setup = matches!(self.screen, Screen::Setup { .. });
                self.screen = Screen::About { from_setup };
                self.persist();
            }
            Action::GoTournament => {
                self.screen = Screen::tournament();
                self.persist();
            }
            Action::Quit => {
                self.should_quit = true;
            }
        }
    }

    fn persist(&mut self) {
        let tag = self.screen.tag();
        let players = &self.tournament.players;
        let rounds = &self.tournament.rounds;
        if let Some(storage) = &mut self.storage {
            if let Err(e) = storage.save_tournament(players, rounds, tag) {
                log::warn!("failed to save tournament: {}", e);
            }
        }
    }
}
