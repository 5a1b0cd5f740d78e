//! Persistent storage using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite database with schema versioning
//! - Whole-tournament persistence: every save replaces the full state
//!   in one transaction, so the database always holds one consistent
//!   snapshot and never a partial update
//!
//! Stats and standings are never stored; they are derived from the
//! saved (players, rounds) by the engine.

use directories::ProjectDirs;
use rusqlite::{params, Connection};
use std::path::PathBuf;

use crate::engine::{Match, MatchScore, Round};

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: Initial schema with meta, players and matches tables
const SCHEMA_VERSION: u32 = 1;

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// Database error from SQLite
    Database(rusqlite::Error),
    /// Could not determine data directory
    NoDataDirectory,
    /// Schema version mismatch (future version)
    FutureSchemaVersion { found: u32, supported: u32 },
    /// Failed to create data directory
    CreateDirFailed(std::io::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Database(e) => write!(f, "database error: {}", e),
            StorageError::NoDataDirectory => write!(f, "could not determine data directory"),
            StorageError::FutureSchemaVersion { found, supported } => {
                write!(
                    f,
                    "database schema version {} is newer than supported version {}",
                    found, supported
                )
            }
            StorageError::CreateDirFailed(e) => write!(f, "failed to create data directory: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e)
    }
}

/// A tournament as loaded from disk: roster, rounds and the screen the
/// user was last on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedTournament {
    pub players: Vec<String>,
    pub rounds: Vec<Round>,
    pub screen: String,
}

/// Storage handle for the tournament database.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the storage database.
    ///
    /// Uses OS-standard directories:
    /// - Linux: `$XDG_DATA_HOME/mexicano/` or `~/.local/share/mexicano/`
    /// - macOS: `~/Library/Application Support/mexicano/`
    pub fn open() -> Result<Self, StorageError> {
        let data_dir = Self::data_dir()?;

        std::fs::create_dir_all(&data_dir).map_err(StorageError::CreateDirFailed)?;

        let db_path = data_dir.join("mexicano.db");
        let conn = Connection::open(&db_path)?;

        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Get the OS-standard data directory for the app.
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "mexicano")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    /// Replace the stored tournament with the given state.
    ///
    /// Read-modify-write happens at the caller's level; this call
    /// deletes and re-inserts everything inside one transaction.
    pub fn save_tournament(
        &mut self,
        players: &[String],
        rounds: &[Round],
        screen: &str,
    ) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM players", [])?;
        tx.execute("DELETE FROM matches", [])?;

        for (idx, name) in players.iter().enumerate() {
            tx.execute(
                "INSERT INTO players (idx, name) VALUES (?1, ?2)",
                params![idx as i64, name],
            )?;
        }

        for (round_idx, round) in rounds.iter().enumerate() {
            for (match_idx, m) in round.matches.iter().enumerate() {
                tx.execute(
                    "INSERT INTO matches (round_idx, match_idx, team1_a, team1_b, team2_a, team2_b, score_team1, score_team2)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        round_idx as i64,
                        match_idx as i64,
                        m.team1[0] as i64,
                        m.team1[1] as i64,
                        m.team2[0] as i64,
                        m.team2[1] as i64,
                        m.score.map(|s| s.team1 as i64),
                        m.score.map(|s| s.team2 as i64),
                    ],
                )?;
            }
        }

        tx.execute("UPDATE meta SET screen = ?1", params![screen])?;
        tx.commit()?;
        Ok(())
    }

    /// Load the stored tournament, if one has ever been saved.
    pub fn load_tournament(&self) -> Result<Option<SavedTournament>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT idx, name FROM players ORDER BY idx")?;
        let rows = stmt.query_map([], |row| {
            let idx: i64 = row.get(0)?;
            let name: String = row.get(1)?;
            Ok((idx, name))
        })?;

        let mut players = Vec::new();
        for row in rows {
            let (_, name) = row?;
            players.push(name);
        }

        if players.is_empty() {
            // Nothing was ever saved
            return Ok(None);
        }

        let rounds = self.load_rounds()?;
        let screen: String = self
            .conn
            .query_row("SELECT screen FROM meta LIMIT 1", [], |row| row.get(0))?;

        Ok(Some(SavedTournament {
            players,
            rounds,
            screen,
        }))
    }

    fn load_rounds(&self) -> Result<Vec<Round>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT round_idx, team1_a, team1_b, team2_a, team2_b, score_team1, score_team2
             FROM matches ORDER BY round_idx, match_idx",
        )?;

        let rows = stmt.query_map([], |row| {
            let round_idx: i64 = row.get(0)?;
            let team1 = [row.get::<_, i64>(1)? as usize, row.get::<_, i64>(2)? as usize];
            let team2 = [row.get::<_, i64>(3)? as usize, row.get::<_, i64>(4)? as usize];
            let score_team1: Option<i64> = row.get(5)?;
            let score_team2: Option<i64> = row.get(6)?;
            Ok((round_idx, team1, team2, score_team1, score_team2))
        })?;

        let mut rounds: Vec<Round> = Vec::new();
        for row in rows {
            let (round_idx, team1, team2, score_team1, score_team2) = row?;
            let score = match (score_team1, score_team2) {
                (Some(t1), Some(t2)) => Some(MatchScore {
                    team1: t1 as u32,
                    team2: t2 as u32,
                }),
                _ => None,
            };

            while rounds.len() <= round_idx as usize {
                rounds.push(Round {
                    matches: Vec::new(),
                });
            }
            rounds[round_idx as usize].matches.push(Match {
                team1,
                team2,
                score,
            });
        }

        Ok(rounds)
    }

    // Private helper methods

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema_v1()?;
        } else if current_version > SCHEMA_VERSION {
            // Database is from a newer version of the app
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: u32 = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(version)
    }

    fn create_schema_v1(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            -- Meta table: schema version and last visible screen
            CREATE TABLE meta (
                schema_version INTEGER NOT NULL,
                screen TEXT NOT NULL DEFAULT 'setup',
                created_at INTEGER NOT NULL
            );

            -- Roster: one row per roster slot
            CREATE TABLE players (
                idx INTEGER PRIMARY KEY,
                name TEXT NOT NULL
            );

            -- Match history: team indices plus the optional result
            CREATE TABLE matches (
                round_idx INTEGER NOT NULL,
                match_idx INTEGER NOT NULL,
                team1_a INTEGER NOT NULL,
                team1_b INTEGER NOT NULL,
                team2_a INTEGER NOT NULL,
                team2_b INTEGER NOT NULL,
                score_team1 INTEGER,
                score_team2 INTEGER,
                PRIMARY KEY (round_idx, match_idx)
            );
            "#,
        )?;

        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        self.conn.execute(
            "INSERT INTO meta (schema_version, screen, created_at) VALUES (?1, 'setup', ?2)",
            params![SCHEMA_VERSION, created_at],
        )?;

        Ok(())
    }
}
