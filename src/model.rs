//! Row types for the seven persisted tables.
//!
//! Cost columns hold decimal millions here; the raw API tenths only exist on
//! the `Raw*` types in [`crate::fetch`], so a row can't be rescaled twice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub web_name: String,
    pub full_name: String,
    pub team: u32,
    pub element_type: u32,
    pub now_cost: f64,
    pub status: String,
    pub news: String,
    pub news_added: Option<DateTime<Utc>>,
    pub photo: String,
    pub chance_of_playing_next_round: Option<u32>,
    pub total_points: i32,
    pub points_per_game: f64,
    pub form: f64,
    pub selected_by_percent: f64,
    pub minutes: u32,
    pub goals_scored: u32,
    pub assists: u32,
    pub clean_sheets: u32,
    pub bonus: u32,
    pub bps: i32,
    pub influence: f64,
    pub creativity: f64,
    pub threat: f64,
    pub ict_index: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub code: u32,
    pub id: u32,
    pub team_name: String,
    pub short_name: String,
    pub strength: u32,
    pub strength_overall_home: u32,
    pub strength_overall_away: u32,
    pub strength_attack_home: u32,
    pub strength_attack_away: u32,
    pub strength_defence_home: u32,
    pub strength_defence_away: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: u32,
    pub plural_name: String,
    pub plural_name_short: String,
    pub singular_name: String,
    pub singular_name_short: String,
    pub squad_select: u32,
    pub squad_min_play: u32,
    pub squad_max_play: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gameweek {
    pub id: u32,
    pub gw_name: String,
    pub deadline_time: DateTime<Utc>,
    pub finished: bool,
    pub highest_score: Option<u32>,
    pub average_entry_score: u32,
    pub most_selected: Option<u32>,
    pub most_transferred_in: Option<u32>,
    pub top_element: Option<u32>,
    pub most_captained: Option<u32>,
    pub most_vice_captained: Option<u32>,
    pub transfers_made: u64,
    pub bboost: u32,
    #[serde(rename = "3xc")]
    pub triple_captain: u32,
    pub wildcard: u32,
    pub freehit: u32,
}

/// Persisted as fetched. `team_h`/`team_a` stay team ids and `kickoff_time`
/// stays text; both are resolved on the read side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: u32,
    #[serde(default)]
    pub code: u32,
    pub event: Option<u32>,
    pub kickoff_time: Option<String>,
    pub team_h: u32,
    pub team_a: u32,
    #[serde(default)]
    pub team_h_score: Option<u32>,
    #[serde(default)]
    pub team_a_score: Option<u32>,
    #[serde(default)]
    pub started: Option<bool>,
    pub finished: bool,
    #[serde(default)]
    pub finished_provisional: bool,
    #[serde(default)]
    pub minutes: u32,
    pub team_h_difficulty: u8,
    pub team_a_difficulty: u8,
    #[serde(default)]
    pub pulse_id: u32,
}

/// One player's line for one fixture of the current season (`Fact_Player`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerHistorySample {
    pub element: u32,
    pub fixture: u32,
    pub opponent_team: u32,
    pub gameweek: u32,
    pub kickoff_time: DateTime<Utc>,
    pub was_home: bool,
    pub team_h_score: Option<u32>,
    pub team_a_score: Option<u32>,
    pub total_points: i32,
    pub minutes_played: u32,
    pub goals_scored: u32,
    pub assists: u32,
    pub clean_sheets: u32,
    pub goals_conceded: u32,
    pub saves: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub bonus: u32,
    pub bps: f64,
    pub influence: f64,
    pub creativity: f64,
    pub threat: f64,
    pub ict_index: f64,
    pub cost: f64,
    pub transfers_balance: i64,
    pub selected: u64,
}

/// Season totals from earlier seasons (`Player_history`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviousSeasonSample {
    pub element: u32,
    pub element_code: u32,
    pub season_name: String,
    pub start_cost: f64,
    pub end_cost: f64,
    pub total_points: i32,
    pub minutes: u32,
    pub goals_scored: u32,
    pub assists: u32,
    pub clean_sheets: u32,
    pub bonus: u32,
    pub bps: i32,
    pub influence: String,
    pub creativity: String,
    pub threat: String,
    pub ict_index: String,
}

/// Column names in serialisation order. Written as the header of an empty
/// table, since the csv writer only emits a header with the first record.
pub trait Table {
    const COLUMNS: &'static [&'static str];
}

impl Table for Player {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "web_name",
        "full_name",
        "team",
        "element_type",
        "now_cost",
        "status",
        "news",
        "news_added",
        "photo",
        "chance_of_playing_next_round",
        "total_points",
        "points_per_game",
        "form",
        "selected_by_percent",
        "minutes",
        "goals_scored",
        "assists",
        "clean_sheets",
        "bonus",
        "bps",
        "influence",
        "creativity",
        "threat",
        "ict_index",
    ];
}

impl Table for Team {
    const COLUMNS: &'static [&'static str] = &[
        "code",
        "id",
        "team_name",
        "short_name",
        "strength",
        "strength_overall_home",
        "strength_overall_away",
        "strength_attack_home",
        "strength_attack_away",
        "strength_defence_home",
        "strength_defence_away",
    ];
}

impl Table for Position {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "plural_name",
        "plural_name_short",
        "singular_name",
        "singular_name_short",
        "squad_select",
        "squad_min_play",
        "squad_max_play",
    ];
}

impl Table for Gameweek {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "gw_name",
        "deadline_time",
        "finished",
        "highest_score",
        "average_entry_score",
        "most_selected",
        "most_transferred_in",
        "top_element",
        "most_captained",
        "most_vice_captained",
        "transfers_made",
        "bboost",
        "3xc",
        "wildcard",
        "freehit",
    ];
}

impl Table for Fixture {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "code",
        "event",
        "kickoff_time",
        "team_h",
        "team_a",
        "team_h_score",
        "team_a_score",
        "started",
        "finished",
        "finished_provisional",
        "minutes",
        "team_h_difficulty",
        "team_a_difficulty",
        "pulse_id",
    ];
}

impl Table for PlayerHistorySample {
    const COLUMNS: &'static [&'static str] = &[
        "element",
        "fixture",
        "opponent_team",
        "gameweek",
        "kickoff_time",
        "was_home",
        "team_h_score",
        "team_a_score",
        "total_points",
        "minutes_played",
        "goals_scored",
        "assists",
        "clean_sheets",
        "goals_conceded",
        "saves",
        "yellow_cards",
        "red_cards",
        "bonus",
        "bps",
        "influence",
        "creativity",
        "threat",
        "ict_index",
        "cost",
        "transfers_balance",
        "selected",
    ];
}

impl Table for PreviousSeasonSample {
    const COLUMNS: &'static [&'static str] = &[
        "element",
        "element_code",
        "season_name",
        "start_cost",
        "end_cost",
        "total_points",
        "minutes",
        "goals_scored",
        "assists",
        "clean_sheets",
        "bonus",
        "bps",
        "influence",
        "creativity",
        "threat",
        "ict_index",
    ];
}

pub fn tenths_to_decimal(tenths: u32) -> f64 {
    f64::from(tenths) / 10.0
}
