use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::fetch::{
    ChipPlay, RawGameweek, RawHistorySample, RawPlayer, RawPosition, RawPreviousSeason, RawTeam,
};
use crate::model::{
    Gameweek, Player, PlayerHistorySample, Position, PreviousSeasonSample, Team,
    tenths_to_decimal,
};

pub const NO_NEWS: &str = "No news";
const PHOTO_URL_PREFIX: &str =
    "https://resources.premierleague.com/premierleague/photos/players/250x250/p";

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("{table} row {id}: invalid timestamp {value:?}")]
    Timestamp {
        table: &'static str,
        id: u32,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("{table} row {id}: column {column} is not a number: {value:?}")]
    Number {
        table: &'static str,
        id: u32,
        column: &'static str,
        value: String,
    },
}

pub fn transform_players(raw: Vec<RawPlayer>) -> Result<Vec<Player>, TransformError> {
    let out = raw
        .into_iter()
        .map(transform_player)
        .collect::<Result<Vec<_>, _>>()?;
    debug!(rows = out.len(), "players transformed");
    Ok(out)
}

fn transform_player(p: RawPlayer) -> Result<Player, TransformError> {
    const TABLE: &str = "players";
    let id = p.id;
    let num = |column: &'static str, value: &str| parse_decimal(TABLE, id, column, value);

    let news = match p.news {
        Some(news) if !news.is_empty() => news,
        _ => NO_NEWS.to_string(),
    };
    let news_added = p
        .news_added
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_timestamp(TABLE, id, s))
        .transpose()?;

    Ok(Player {
        id,
        web_name: p.web_name,
        full_name: format!("{} {}", p.first_name, p.second_name),
        team: p.team,
        element_type: p.element_type,
        now_cost: tenths_to_decimal(p.now_cost),
        status: p.status,
        news,
        news_added,
        photo: photo_url(&p.photo),
        chance_of_playing_next_round: p.chance_of_playing_next_round,
        total_points: p.total_points,
        points_per_game: num("points_per_game", &p.points_per_game)?,
        form: num("form", &p.form)?,
        selected_by_percent: num("selected_by_percent", &p.selected_by_percent)?,
        minutes: p.minutes,
        goals_scored: p.goals_scored,
        assists: p.assists,
        clean_sheets: p.clean_sheets,
        bonus: p.bonus,
        bps: p.bps,
        influence: num("influence", &p.influence)?,
        creativity: num("creativity", &p.creativity)?,
        threat: num("threat", &p.threat)?,
        ict_index: num("ict_index", &p.ict_index)?,
    })
}

pub fn transform_teams(raw: Vec<RawTeam>) -> Vec<Team> {
    raw.into_iter()
        .map(|t| Team {
            code: t.code,
            id: t.id,
            team_name: t.name,
            short_name: t.short_name,
            strength: t.strength,
            strength_overall_home: t.strength_overall_home,
            strength_overall_away: t.strength_overall_away,
            strength_attack_home: t.strength_attack_home,
            strength_attack_away: t.strength_attack_away,
            strength_defence_home: t.strength_defence_home,
            strength_defence_away: t.strength_defence_away,
        })
        .collect()
}

pub fn transform_positions(raw: Vec<RawPosition>) -> Vec<Position> {
    raw.into_iter()
        .map(|p| Position {
            id: p.id,
            plural_name: p.plural_name,
            plural_name_short: p.plural_name_short,
            singular_name: p.singular_name,
            singular_name_short: p.singular_name_short,
            squad_select: p.squad_select,
            squad_min_play: p.squad_min_play,
            squad_max_play: p.squad_max_play,
        })
        .collect()
}

pub fn transform_gameweeks(raw: Vec<RawGameweek>) -> Result<Vec<Gameweek>, TransformError> {
    raw.into_iter()
        .map(|gw| {
            let chips = ChipCounts::from_plays(&gw.chip_plays);
            Ok(Gameweek {
                id: gw.id,
                deadline_time: parse_timestamp("gameweeks", gw.id, &gw.deadline_time)?,
                gw_name: gw.name,
                finished: gw.finished,
                highest_score: gw.highest_score,
                average_entry_score: gw.average_entry_score,
                most_selected: gw.most_selected,
                most_transferred_in: gw.most_transferred_in,
                top_element: gw.top_element,
                most_captained: gw.most_captained,
                most_vice_captained: gw.most_vice_captained,
                transfers_made: gw.transfers_made,
                bboost: chips.bboost,
                triple_captain: chips.triple_captain,
                wildcard: chips.wildcard,
                freehit: chips.freehit,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChipCounts {
    pub bboost: u32,
    pub triple_captain: u32,
    pub wildcard: u32,
    pub freehit: u32,
}

impl ChipCounts {
    /// Unknown chip names are ignored; a chip listed twice keeps the last count.
    pub fn from_plays(plays: &[ChipPlay]) -> Self {
        let mut counts = Self::default();
        for play in plays {
            match play.chip_name.as_str() {
                "bboost" => counts.bboost = play.num_played,
                "3xc" => counts.triple_captain = play.num_played,
                "wildcard" => counts.wildcard = play.num_played,
                "freehit" => counts.freehit = play.num_played,
                _ => {}
            }
        }
        counts
    }
}

pub fn transform_fact_history(
    raw: Vec<RawHistorySample>,
) -> Result<Vec<PlayerHistorySample>, TransformError> {
    const TABLE: &str = "fact_player";
    raw.into_iter()
        .map(|h| {
            let id = h.element;
            Ok(PlayerHistorySample {
                element: h.element,
                fixture: h.fixture,
                opponent_team: h.opponent_team,
                gameweek: h.round,
                kickoff_time: parse_timestamp(TABLE, id, &h.kickoff_time)?,
                was_home: h.was_home,
                team_h_score: h.team_h_score,
                team_a_score: h.team_a_score,
                total_points: h.total_points,
                minutes_played: h.minutes,
                goals_scored: h.goals_scored,
                assists: h.assists,
                clean_sheets: h.clean_sheets,
                goals_conceded: h.goals_conceded,
                saves: h.saves,
                yellow_cards: h.yellow_cards,
                red_cards: h.red_cards,
                bonus: h.bonus,
                bps: f64::from(h.bps),
                influence: parse_decimal(TABLE, id, "influence", &h.influence)?,
                creativity: parse_decimal(TABLE, id, "creativity", &h.creativity)?,
                threat: parse_decimal(TABLE, id, "threat", &h.threat)?,
                ict_index: parse_decimal(TABLE, id, "ict_index", &h.ict_index)?,
                cost: tenths_to_decimal(h.value),
                transfers_balance: h.transfers_balance,
                selected: h.selected,
            })
        })
        .collect()
}

pub fn transform_previous_season(raw: Vec<RawPreviousSeason>) -> Vec<PreviousSeasonSample> {
    raw.into_iter()
        .map(|s| PreviousSeasonSample {
            element: s.element,
            element_code: s.element_code,
            season_name: s.season_name,
            start_cost: tenths_to_decimal(s.start_cost),
            end_cost: tenths_to_decimal(s.end_cost),
            total_points: s.total_points,
            minutes: s.minutes,
            goals_scored: s.goals_scored,
            assists: s.assists,
            clean_sheets: s.clean_sheets,
            bonus: s.bonus,
            bps: s.bps,
            influence: s.influence,
            creativity: s.creativity,
            threat: s.threat,
            ict_index: s.ict_index,
        })
        .collect()
}

pub fn parse_timestamp(
    table: &'static str,
    id: u32,
    value: &str,
) -> Result<DateTime<Utc>, TransformError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| TransformError::Timestamp {
            table,
            id,
            value: value.to_string(),
            source,
        })
}

fn parse_decimal(
    table: &'static str,
    id: u32,
    column: &'static str,
    value: &str,
) -> Result<f64, TransformError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TransformError::Number {
            table,
            id,
            column,
            value: value.to_string(),
        })
}

fn photo_url(photo: &str) -> String {
    if photo.is_empty() {
        return String::new();
    }
    format!("{PHOTO_URL_PREFIX}{}", photo.replace(".jpg", ".png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_url_swaps_extension() {
        assert_eq!(
            photo_url("154561.jpg"),
            "https://resources.premierleague.com/premierleague/photos/players/250x250/p154561.png"
        );
        assert_eq!(photo_url(""), "");
    }

    #[test]
    fn decimal_rejects_blank_and_nan() {
        assert!(parse_decimal("t", 1, "c", "").is_err());
        assert!(parse_decimal("t", 1, "c", "NaN").is_err());
        assert_eq!(parse_decimal("t", 1, "c", " 12.5 ").ok(), Some(12.5));
    }
}
