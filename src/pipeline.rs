use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::fetch::{self, Bootstrap, PlayerHistories};
use crate::model::Fixture;
use crate::store::Snapshot;
use crate::transform::{
    TransformError, transform_fact_history, transform_gameweeks, transform_players,
    transform_positions, transform_previous_season, transform_teams,
};

#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub data_dir: PathBuf,
    pub tables: Vec<(&'static str, usize)>,
    pub files: Vec<PathBuf>,
}

/// Fetch, transform and persist every table. Nothing is retried; the first
/// failure ends the run.
pub fn run(cfg: &Config) -> Result<IngestSummary> {
    let bootstrap = fetch::fetch_bootstrap(cfg).context("fetch bootstrap-static")?;

    let mut player_ids: Vec<u32> = bootstrap.elements.iter().map(|p| p.id).collect();
    if let Some(limit) = cfg.player_limit {
        player_ids.truncate(limit);
    }
    let histories =
        fetch::fetch_player_histories(cfg, &player_ids).context("fetch player histories")?;
    let fixtures = fetch::fetch_fixtures(cfg).context("fetch fixtures")?;

    let snapshot = build_snapshot(bootstrap, histories, fixtures).context("transform tables")?;
    let files = snapshot
        .write_all(&cfg.data_dir)
        .with_context(|| format!("write snapshot to {}", cfg.data_dir.display()))?;

    Ok(IngestSummary {
        data_dir: cfg.data_dir.clone(),
        tables: snapshot.table_counts().to_vec(),
        files,
    })
}

pub fn build_snapshot(
    bootstrap: Bootstrap,
    histories: PlayerHistories,
    fixtures: Vec<Fixture>,
) -> Result<Snapshot, TransformError> {
    let players = transform_players(bootstrap.elements)?;
    let teams = transform_teams(bootstrap.teams);
    let positions = transform_positions(bootstrap.element_types);
    let gameweeks = transform_gameweeks(bootstrap.events)?;
    let fact_player = transform_fact_history(histories.current)?;
    let player_history = transform_previous_season(histories.previous);

    info!(
        players = players.len(),
        teams = teams.len(),
        positions = positions.len(),
        gameweeks = gameweeks.len(),
        fact_player = fact_player.len(),
        player_history = player_history.len(),
        fixtures = fixtures.len(),
        "tables transformed"
    );

    Ok(Snapshot {
        players,
        teams,
        positions,
        gameweeks,
        fixtures,
        fact_player,
        player_history,
    })
}
