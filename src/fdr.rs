//! Fixture difficulty: team name resolution, the per-side record split and
//! the team x gameweek matrix with its colour overlay.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Fixture, Team};

#[derive(Debug, Error)]
pub enum JoinError {
    #[error("fixture {fixture_id}: unknown team id {team_id}")]
    UnknownTeam { fixture_id: u32, team_id: u32 },
    #[error("fixture {fixture_id}: invalid kickoff time {value:?}")]
    Timestamp {
        fixture_id: u32,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("{table} row references unknown {key} {id}")]
    UnknownKey {
        table: &'static str,
        key: &'static str,
        id: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRef {
    pub id: u32,
    pub name: String,
    pub short_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct TeamLookup {
    names: HashMap<u32, String>,
    short_names: HashMap<u32, String>,
}

impl TeamLookup {
    pub fn from_teams(teams: &[Team]) -> Self {
        let mut lookup = Self::default();
        for team in teams {
            lookup.names.insert(team.id, team.team_name.clone());
            lookup.short_names.insert(team.id, team.short_name.clone());
        }
        lookup
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn short_name(&self, id: u32) -> Option<&str> {
        self.short_names.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn resolve(&self, fixture_id: u32, team_id: u32) -> Result<TeamRef, JoinError> {
        match (self.name(team_id), self.short_name(team_id)) {
            (Some(name), Some(short_name)) => Ok(TeamRef {
                id: team_id,
                name: name.to_string(),
                short_name: short_name.to_string(),
            }),
            _ => Err(JoinError::UnknownTeam {
                fixture_id,
                team_id,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedFixture {
    pub id: u32,
    pub event: Option<u32>,
    pub kickoff_time: Option<DateTime<Utc>>,
    pub finished: bool,
    pub home: TeamRef,
    pub away: TeamRef,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub home_difficulty: u8,
    pub away_difficulty: u8,
}

pub fn resolve_fixtures(
    fixtures: &[Fixture],
    lookup: &TeamLookup,
) -> Result<Vec<NamedFixture>, JoinError> {
    fixtures
        .iter()
        .map(|f| {
            let kickoff_time = f
                .kickoff_time
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(|s| parse_kickoff(f.id, s))
                .transpose()?;
            Ok(NamedFixture {
                id: f.id,
                event: f.event,
                kickoff_time,
                finished: f.finished,
                home: lookup.resolve(f.id, f.team_h)?,
                away: lookup.resolve(f.id, f.team_a)?,
                home_score: f.team_h_score,
                away_score: f.team_a_score,
                home_difficulty: f.team_h_difficulty,
                away_difficulty: f.team_a_difficulty,
            })
        })
        .collect()
}

pub fn parse_kickoff(fixture_id: u32, value: &str) -> Result<DateTime<Utc>, JoinError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| JoinError::Timestamp {
            fixture_id,
            value: value.to_string(),
            source,
        })
}

/// Unfinished fixtures that already belong to a gameweek.
pub fn upcoming(fixtures: &[NamedFixture]) -> impl Iterator<Item = &NamedFixture> {
    fixtures.iter().filter(|f| !f.finished && f.event.is_some())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Venue {
    Home,
    Away,
}

impl Venue {
    pub fn tag(self) -> &'static str {
        match self {
            Venue::Home => "H",
            Venue::Away => "A",
        }
    }
}

/// One side's view of a fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FdrRecord {
    pub team: String,
    pub opponent: String,
    pub gameweek: u32,
    pub venue: Venue,
    pub difficulty: u8,
}

impl FdrRecord {
    pub fn label(&self) -> String {
        format!("{} ({})", self.opponent, self.venue.tag())
    }
}

/// `None` when the fixture has no gameweek yet.
pub fn perspective_records(fixture: &NamedFixture) -> Option<[FdrRecord; 2]> {
    let gameweek = fixture.event?;
    Some([
        FdrRecord {
            team: fixture.home.short_name.clone(),
            opponent: fixture.away.short_name.clone(),
            gameweek,
            venue: Venue::Home,
            difficulty: fixture.home_difficulty,
        },
        FdrRecord {
            team: fixture.away.short_name.clone(),
            opponent: fixture.home.short_name.clone(),
            gameweek,
            venue: Venue::Away,
            difficulty: fixture.away_difficulty,
        },
    ])
}

pub fn gameweek_label(gameweek: u32) -> String {
    format!("GW{gameweek}")
}

#[derive(Debug, Clone, Default)]
pub struct FdrMatrix {
    cells: BTreeMap<String, BTreeMap<u32, Vec<FdrRecord>>>,
    gameweeks: BTreeSet<u32>,
}

impl FdrMatrix {
    pub fn build(fixtures: &[NamedFixture]) -> Self {
        Self::from_records(upcoming(fixtures).filter_map(perspective_records).flatten())
    }

    pub fn from_records(records: impl IntoIterator<Item = FdrRecord>) -> Self {
        let mut matrix = Self::default();
        for record in records {
            matrix.gameweeks.insert(record.gameweek);
            matrix
                .cells
                .entry(record.team.clone())
                .or_default()
                .entry(record.gameweek)
                .or_default()
                .push(record);
        }
        matrix
    }

    pub fn teams(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn gameweeks(&self) -> impl Iterator<Item = u32> + '_ {
        self.gameweeks.iter().copied()
    }

    pub fn column_labels(&self) -> Vec<String> {
        self.gameweeks().map(gameweek_label).collect()
    }

    pub fn records(&self, team: &str, gameweek: u32) -> &[FdrRecord] {
        self.cells
            .get(team)
            .and_then(|row| row.get(&gameweek))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `"OPP (H)"`; double gameweeks list every fixture.
    pub fn label(&self, team: &str, gameweek: u32) -> Option<String> {
        let records = self.records(team, gameweek);
        if records.is_empty() {
            return None;
        }
        Some(
            records
                .iter()
                .map(FdrRecord::label)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    /// The hardest rating when a team plays more than once in the gameweek.
    pub fn difficulty(&self, team: &str, gameweek: u32) -> Option<u8> {
        self.records(team, gameweek)
            .iter()
            .map(|r| r.difficulty)
            .max()
    }

    pub fn color(&self, team: &str, gameweek: u32) -> FdrColor {
        fdr_color(self.difficulty(team, gameweek))
    }

    /// Keyed by `(team, "GW{n}")`, the shape the grid renderers look cells up by.
    pub fn difficulty_values(&self) -> BTreeMap<(String, String), u8> {
        let mut out = BTreeMap::new();
        for (team, row) in &self.cells {
            for &gameweek in row.keys() {
                if let Some(value) = self.difficulty(team, gameweek) {
                    out.insert((team.clone(), gameweek_label(gameweek)), value);
                }
            }
        }
        out
    }

    /// Header row plus one row per team, blank where a team has no fixture.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let mut header = vec!["Team".to_string()];
        header.extend(self.column_labels());
        let mut rows = vec![header];
        for team in self.teams() {
            let mut row = vec![team.to_string()];
            row.extend(
                self.gameweeks()
                    .map(|gw| self.label(team, gw).unwrap_or_default()),
            );
            rows.push(row);
        }
        rows
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    Black,
    White,
}

impl TextColor {
    pub fn css_name(self) -> &'static str {
        match self {
            TextColor::Black => "black",
            TextColor::White => "white",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FdrColor {
    /// 0xRRGGBB
    pub background: u32,
    pub text: TextColor,
}

pub const NEUTRAL_COLOR: FdrColor = FdrColor {
    background: 0xffffff,
    text: TextColor::Black,
};

const PALETTE: [FdrColor; 5] = [
    FdrColor {
        background: 0x257d5a,
        text: TextColor::Black,
    },
    FdrColor {
        background: 0x00ff86,
        text: TextColor::Black,
    },
    FdrColor {
        background: 0xebebe4,
        text: TextColor::Black,
    },
    FdrColor {
        background: 0xff005a,
        text: TextColor::White,
    },
    FdrColor {
        background: 0x861d46,
        text: TextColor::White,
    },
];

impl FdrColor {
    pub fn background_hex(self) -> String {
        format!("#{:06x}", self.background)
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        let [_, r, g, b] = self.background.to_be_bytes();
        (r, g, b)
    }

    pub fn css(self) -> String {
        format!(
            "background-color: {}; color: {};",
            self.background_hex(),
            self.text.css_name()
        )
    }
}

/// 1 (easiest, green) to 5 (hardest, dark red); anything else is neutral.
pub fn fdr_color(difficulty: Option<u8>) -> FdrColor {
    match difficulty {
        Some(d @ 1..=5) => PALETTE[usize::from(d - 1)],
        _ => NEUTRAL_COLOR,
    }
}

/// First gameweek, in ascending order, that still has an unfinished fixture.
/// Once the season is over this falls back to the first gameweek.
pub fn next_gameweek(fixtures: &[Fixture]) -> Option<u32> {
    let gameweeks: BTreeSet<u32> = fixtures.iter().filter_map(|f| f.event).collect();
    gameweeks
        .iter()
        .copied()
        .find(|&gw| fixtures.iter().any(|f| f.event == Some(gw) && !f.finished))
        .or_else(|| gameweeks.first().copied())
}
