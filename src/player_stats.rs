use std::collections::HashMap;

use crate::fdr::JoinError;
use crate::model::{Gameweek, Player, Position, Team};
use crate::store::Snapshot;

/// A `Fact_Player` line with every foreign key replaced by what it points at.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerGameweekRow {
    pub player_id: u32,
    pub web_name: String,
    pub full_name: String,
    pub team_name: String,
    pub team_short_name: String,
    pub position: String,
    pub gameweek: u32,
    pub gw_name: String,
    pub cost: f64,
    pub total_points: i32,
    pub minutes_played: u32,
    pub goals_scored: u32,
    pub assists: u32,
}

pub fn join_player_history(snapshot: &Snapshot) -> Result<Vec<PlayerGameweekRow>, JoinError> {
    const TABLE: &str = "fact_player";

    let players: HashMap<u32, &Player> = snapshot.players.iter().map(|p| (p.id, p)).collect();
    let positions: HashMap<u32, &Position> =
        snapshot.positions.iter().map(|p| (p.id, p)).collect();
    let teams: HashMap<u32, &Team> = snapshot.teams.iter().map(|t| (t.id, t)).collect();
    let gameweeks: HashMap<u32, &Gameweek> =
        snapshot.gameweeks.iter().map(|g| (g.id, g)).collect();

    let missing = |key: &'static str, id: u32| JoinError::UnknownKey {
        table: TABLE,
        key,
        id,
    };

    snapshot
        .fact_player
        .iter()
        .map(|sample| {
            let player = players
                .get(&sample.element)
                .ok_or_else(|| missing("player", sample.element))?;
            let position = positions
                .get(&player.element_type)
                .ok_or_else(|| missing("position", player.element_type))?;
            let team = teams
                .get(&player.team)
                .ok_or_else(|| missing("team", player.team))?;
            let gameweek = gameweeks
                .get(&sample.gameweek)
                .ok_or_else(|| missing("gameweek", sample.gameweek))?;

            Ok(PlayerGameweekRow {
                player_id: player.id,
                web_name: player.web_name.clone(),
                full_name: player.full_name.clone(),
                team_name: team.team_name.clone(),
                team_short_name: team.short_name.clone(),
                position: position.singular_name_short.clone(),
                gameweek: gameweek.id,
                gw_name: gameweek.gw_name.clone(),
                cost: sample.cost,
                total_points: sample.total_points,
                minutes_played: sample.minutes_played,
                goals_scored: sample.goals_scored,
                assists: sample.assists,
            })
        })
        .collect()
}

/// Season points per player, highest first; ties broken by lower cost.
pub fn points_leaders(rows: &[PlayerGameweekRow], limit: usize) -> Vec<(String, f64, i32)> {
    let mut totals: HashMap<u32, (String, f64, i32)> = HashMap::new();
    for row in rows {
        let entry = totals
            .entry(row.player_id)
            .or_insert_with(|| (row.web_name.clone(), row.cost, 0));
        entry.1 = row.cost;
        entry.2 += row.total_points;
    }
    let mut out: Vec<(String, f64, i32)> = totals.into_values().collect();
    out.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.total_cmp(&b.1)).then(a.0.cmp(&b.0)));
    out.truncate(limit);
    out
}
