#![allow(dead_code)]
//! UI rendering using ratatui
//!
//! Supports multiple screens:
//! - Setup: roster entry before round 1
//! - Tournament: round in play, score entry, match timer
//! - Leaderboard: standings
//! - About: format rules

use crate::app::{
    AppCoordinator, MatchTimer, Screen, ScoreEntry, TeamSide, Tournament, TIMER_WARN_SECONDS,
};
use crate::engine::{self, Match, TOTAL_ROUNDS};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

/// Render the appropriate screen based on app state
pub fn render(frame: &mut Frame, coordinator: &AppCoordinator) {
    match &coordinator.screen {
        Screen::Setup {
            selected,
            input,
            editing,
        } => {
            render_setup(frame, &coordinator.tournament, *selected, input, *editing);
        }
        Screen::Tournament {
            entry,
            show_standings,
            confirm_reset,
        } => {
            render_tournament(
                frame,
                &coordinator.tournament,
                &coordinator.timer,
                entry.as_ref(),
                *show_standings,
                *confirm_reset,
            );
        }
        Screen::Leaderboard => render_leaderboard(frame, &coordinator.tournament),
        Screen::About { .. } => render_about(frame),
    }
}

/// Render the roster entry screen
fn render_setup(
    frame: &mut Frame,
    tournament: &Tournament,
    selected: usize,
    input: &str,
    editing: bool,
) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),  // Logo
            Constraint::Length(1),  // Spacer
            Constraint::Min(10),    // Name slots
            Constraint::Length(2),  // Start hint
            Constraint::Length(2),  // Footer
        ])
        .margin(2)
        .split(area);

    // Logo
    let logo = r#"
 __  __ _____  __ ___ ____    _    _   _  ___
|  \/  | ____| \ \/ /|_ _/ __|  / \  | \ | |/ _ \
| |\/| |  _|    \  /  | | |   / _ \ |  \| | | | |
| |  | | |___   /  \  | | |__/ ___ \| |\  | |_| |
|_|  |_|_____| /_/\_\|___\___/_/  \_\_| \_|\___/
"#;
    let logo_widget = Paragraph::new(logo)
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(logo_widget, layout[0]);

    // Name slots
    let items: Vec<ListItem> = tournament
        .players
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let is_selected = i == selected;
            let display = if is_selected && editing {
                format!("> {}. [{}]_", i + 1, input)
            } else if name.is_empty() {
                let prefix = if is_selected { "> " } else { "  " };
                format!("{}{}. ---", prefix, i + 1)
            } else {
                let prefix = if is_selected { "> " } else { "  " };
                format!("{}{}. {}", prefix, i + 1, name)
            };
            let style = if is_selected && editing {
                Style::default().fg(Color::Cyan)
            } else if is_selected {
                Style::default().fg(Color::Yellow).bold()
            } else if name.is_empty() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(display).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Players (8 needed)"),
    );
    frame.render_widget(list, layout[2]);

    // Start hint
    let (start_text, start_style) = if tournament.is_ready() {
        (
            "[ Press S to deal round 1 ]",
            Style::default().fg(Color::Green).bold(),
        )
    } else {
        (
            "Enter all 8 names to start (R fills the blanks)",
            Style::default().fg(Color::DarkGray),
        )
    };
    let start = Paragraph::new(start_text)
        .style(start_style)
        .alignment(Alignment::Center);
    frame.render_widget(start, layout[3]);

    // Footer
    let footer = Paragraph::new("↑↓ Navigate  Enter Edit  R Random  S Start  A Rules  Esc Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[4]);
}

/// Render the round-in-play screen
fn render_tournament(
    frame: &mut Frame,
    tournament: &Tournament,
    timer: &MatchTimer,
    entry: Option<&ScoreEntry>,
    show_standings: bool,
    confirm_reset: bool,
) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(10),    // Matches (and standings panel)
            Constraint::Length(2),  // Footer
        ])
        .margin(1)
        .split(area);

    // Header: round counter left, timer right
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[0]);

    let round_no = tournament.rounds.len();
    let header = Paragraph::new(format!("MEXICANO — Round {}/{}", round_no, TOTAL_ROUNDS))
        .style(Style::default().fg(Color::Yellow).bold())
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, header_chunks[0]);

    let timer_style = if timer.is_expired() {
        Style::default().fg(Color::Red).bold()
    } else if timer.remaining <= TIMER_WARN_SECONDS {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::Green).bold()
    };
    let timer_icon = if timer.running { "▶" } else { "⏸" };
    let timer_widget = Paragraph::new(format!("{} {}", timer_icon, timer.display()))
        .style(timer_style)
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(timer_widget, header_chunks[1]);

    // Matches, with an optional standings panel on the right
    let body = if show_standings {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(30)])
            .split(layout[1]);
        render_standings_panel(frame, tournament, chunks[1]);
        chunks[0]
    } else {
        layout[1]
    };

    if let Some(round) = tournament.current_round() {
        let match_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Length(5), Constraint::Min(0)])
            .split(body);

        for (i, m) in round.matches.iter().enumerate() {
            render_match(frame, tournament, m, i, match_chunks[i]);
        }
    }

    // Footer hints depend on where the round stands
    let hint = if tournament.is_finished() {
        "L Final standings  R Reset  A Rules  Esc Quit"
    } else if tournament.current_round_complete() {
        "N Next round  L Standings  Tab Panel  Space Timer  Esc Quit"
    } else {
        "1-4 Enter score  Space Timer  T Reset timer  Tab Standings  Esc Quit"
    };
    let footer = Paragraph::new(hint)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[2]);

    // Overlays
    if let Some(e) = entry {
        render_score_entry(frame, tournament, e, area);
    }
    if confirm_reset {
        render_confirm_reset(frame, area);
    }
}

/// Render one match card
fn render_match(frame: &mut Frame, tournament: &Tournament, m: &Match, index: usize, area: Rect) {
    let key_base = index * 2 + 1;
    let (score1, score2) = match m.score {
        Some(s) => (s.team1.to_string(), s.team2.to_string()),
        None => ("-".to_string(), "-".to_string()),
    };

    let team_style = |won: bool| {
        if won {
            Style::default().fg(Color::Green).bold()
        } else {
            Style::default().fg(Color::White)
        }
    };
    let (team1_won, team2_won) = match m.score {
        Some(s) => (s.team1 > s.team2, s.team2 > s.team1),
        None => (false, false),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(format!("[{}] ", key_base), Style::default().fg(Color::DarkGray)),
            Span::styled(team_names(tournament, &m.team1), team_style(team1_won)),
            Span::raw("  "),
            Span::styled(score1, team_style(team1_won)),
        ]),
        Line::from(vec![
            Span::styled(format!("[{}] ", key_base + 1), Style::default().fg(Color::DarkGray)),
            Span::styled(team_names(tournament, &m.team2), team_style(team2_won)),
            Span::raw("  "),
            Span::styled(score2, team_style(team2_won)),
        ]),
    ];

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Match {}", index + 1)),
    );
    frame.render_widget(card, area);
}

/// Render the collapsible standings panel
fn render_standings_panel(frame: &mut Frame, tournament: &Tournament, area: Rect) {
    let board = engine::leaderboard(&tournament.players, &tournament.rounds);
    let items: Vec<ListItem> = board
        .iter()
        .enumerate()
        .map(|(i, e)| {
            ListItem::new(format!("{}. {} {} pts", i + 1, e.name, e.stats.points))
                .style(Style::default().fg(Color::White))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Standings"));
    frame.render_widget(list, area);
}

/// Render the two-step score entry overlay
fn render_score_entry(frame: &mut Frame, tournament: &Tournament, entry: &ScoreEntry, area: Rect) {
    let Some(round) = tournament.current_round() else {
        return;
    };
    let Some(m) = round.matches.get(entry.match_index) else {
        return;
    };

    let (own_team, other_team) = match entry.side {
        TeamSide::Team1 => (&m.team1, &m.team2),
        TeamSide::Team2 => (&m.team2, &m.team1),
    };

    let text = match entry.winner_games {
        None => format!(
            "{}\n\nGames won? [0-3]\n(3 = they took the match)",
            team_names(tournament, own_team)
        ),
        Some(_) => format!(
            "{} won 3.\n\n{} games? [0-2]",
            team_names(tournament, own_team),
            team_names(tournament, other_team)
        ),
    };

    let popup = centered_rect(44, 8, area);
    frame.render_widget(Clear, popup);
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Record score (Esc cancels)")
                .style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(widget, popup);
}

/// Render the reset confirmation overlay
fn render_confirm_reset(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(40, 5, area);
    frame.render_widget(Clear, popup);
    let widget = Paragraph::new("Wipe the whole tournament?\n\n[y] yes   [any other key] no")
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Reset")
                .style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(widget, popup);
}

/// Render the standings screen
fn render_leaderboard(frame: &mut Frame, tournament: &Tournament) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(10),    // Rows
            Constraint::Length(2),  // Footer
        ])
        .margin(1)
        .split(area);

    let played = tournament
        .rounds
        .iter()
        .flat_map(|r| &r.matches)
        .filter(|m| m.is_scored())
        .count();
    let header = Paragraph::new(format!(
        "Standings — round {}/{}, {} matches played",
        tournament.rounds.len(),
        TOTAL_ROUNDS,
        played
    ))
    .style(Style::default().fg(Color::Cyan).bold())
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, layout[0]);

    let board = engine::leaderboard(&tournament.players, &tournament.rounds);
    let items: Vec<ListItem> = board
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let medal = match i {
                0 => "🥇",
                1 => "🥈",
                2 => "🥉",
                _ => "  ",
            };
            let style = match i {
                0 => Style::default().fg(Color::Yellow).bold(),
                1 | 2 => Style::default().fg(Color::White).bold(),
                _ => Style::default().fg(Color::White),
            };
            ListItem::new(format!(
                "{} {:2}. {:<14} {:>3} pts   W {} / L {}   games {:+}",
                medal,
                i + 1,
                e.name,
                e.stats.points,
                e.stats.match_wins,
                e.stats.match_losses,
                e.stats.game_diff(),
            ))
            .style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL));
    frame.render_widget(list, layout[1]);

    let footer = Paragraph::new("Esc Back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[2]);
}

/// Render the rules screen
fn render_about(frame: &mut Frame) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(10),    // Body
            Constraint::Length(2),  // Footer
        ])
        .margin(2)
        .split(area);

    let header = Paragraph::new("How Mexicano works")
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, layout[0]);

    let body = "\
Eight players, seven rounds, two courts.

Round 1 is a random draw. From round 2 on, teams are re-formed from \
the current standings: the best-placed free player partners the \
worst-placed free player they have not partnered yet, and so on down \
the list. Nobody partners the same person twice.

Each match is first to 3 games. Your points are the games your team \
wins — a tight 3-2 loss is worth almost as much as a win, so every \
game counts.

Matches are balanced: the pair holding ranks 1 and 8 faces the pair \
holding ranks 4 and 5, so both sides carry about the same combined \
strength.

After seven rounds everyone has partnered everyone once, and the \
player with the most points takes the night.";

    let widget = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White));
    frame.render_widget(widget, layout[1]);

    let footer = Paragraph::new("Esc Back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[2]);
}

/// "Anna & Bob" for a team of roster indices
fn team_names(tournament: &Tournament, team: &[usize; 2]) -> String {
    format!(
        "{} & {}",
        tournament.players[team[0]], tournament.players[team[1]]
    )
}

/// Fixed-size rectangle centered in `area`
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
