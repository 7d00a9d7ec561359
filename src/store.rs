use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

use crate::model::{
    Fixture, Gameweek, Player, PlayerHistorySample, Position, PreviousSeasonSample, Table, Team,
};

pub const PLAYERS_FILE: &str = "Players.csv";
pub const TEAMS_FILE: &str = "Teams.csv";
pub const POSITIONS_FILE: &str = "Positions.csv";
pub const GAMEWEEKS_FILE: &str = "Gameweeks.csv";
pub const FIXTURES_FILE: &str = "Fixtures.csv";
pub const FACT_PLAYER_FILE: &str = "Fact_Player.csv";
pub const PLAYER_HISTORY_FILE: &str = "Player_history.csv";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("create data dir {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("flush {}", .path.display())]
    Flush {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("swap {}", .path.display())]
    Swap {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Writes `rows` to `dir/file` through a temp file, so a failed write leaves
/// the previous snapshot of that one file in place. An empty table still
/// gets its header row.
pub fn write_table<T: Serialize + Table>(
    dir: &Path,
    file: &str,
    rows: &[T],
) -> Result<PathBuf, StoreError> {
    fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(file);
    let tmp = path.with_extension("csv.tmp");

    let mut writer = csv::Writer::from_path(&tmp).map_err(|source| StoreError::Write {
        path: tmp.clone(),
        source,
    })?;
    if rows.is_empty() {
        writer.write_record(T::COLUMNS).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
    }
    for row in rows {
        writer.serialize(row).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
    }
    writer.flush().map_err(|source| StoreError::Flush {
        path: tmp.clone(),
        source,
    })?;
    drop(writer);

    fs::rename(&tmp, &path).map_err(|source| StoreError::Swap {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), rows = rows.len(), "table written");
    Ok(path)
}

pub fn read_table<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>, StoreError> {
    let path = dir.join(file);
    let mut reader = csv::Reader::from_path(&path).map_err(|source| StoreError::Read {
        path: path.clone(),
        source,
    })?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| StoreError::Read { path, source })
}

/// All seven tables of one batch run.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub players: Vec<Player>,
    pub teams: Vec<Team>,
    pub positions: Vec<Position>,
    pub gameweeks: Vec<Gameweek>,
    pub fixtures: Vec<Fixture>,
    pub fact_player: Vec<PlayerHistorySample>,
    pub player_history: Vec<PreviousSeasonSample>,
}

impl Snapshot {
    /// Files are written one after another; a failure part way leaves the
    /// earlier files updated and the later ones at their previous version.
    pub fn write_all(&self, dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
        Ok(vec![
            write_table(dir, PLAYERS_FILE, &self.players)?,
            write_table(dir, TEAMS_FILE, &self.teams)?,
            write_table(dir, POSITIONS_FILE, &self.positions)?,
            write_table(dir, GAMEWEEKS_FILE, &self.gameweeks)?,
            write_table(dir, FACT_PLAYER_FILE, &self.fact_player)?,
            write_table(dir, PLAYER_HISTORY_FILE, &self.player_history)?,
            write_table(dir, FIXTURES_FILE, &self.fixtures)?,
        ])
    }

    pub fn read_all(dir: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            players: read_table(dir, PLAYERS_FILE)?,
            teams: read_table(dir, TEAMS_FILE)?,
            positions: read_table(dir, POSITIONS_FILE)?,
            gameweeks: read_table(dir, GAMEWEEKS_FILE)?,
            fixtures: read_table(dir, FIXTURES_FILE)?,
            fact_player: read_table(dir, FACT_PLAYER_FILE)?,
            player_history: read_table(dir, PLAYER_HISTORY_FILE)?,
        })
    }

    pub fn table_counts(&self) -> [(&'static str, usize); 7] {
        [
            (PLAYERS_FILE, self.players.len()),
            (TEAMS_FILE, self.teams.len()),
            (POSITIONS_FILE, self.positions.len()),
            (GAMEWEEKS_FILE, self.gameweeks.len()),
            (FACT_PLAYER_FILE, self.fact_player.len()),
            (PLAYER_HISTORY_FILE, self.player_history.len()),
            (FIXTURES_FILE, self.fixtures.len()),
        ]
    }
}
