use rayon::prelude::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::http_client::http_client;
use crate::model::Fixture;

const BOOTSTRAP_PATH: &str = "bootstrap-static/";
const FIXTURES_PATH: &str = "fixtures/";
const BODY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum RemoteFetchError {
    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("http {status} from {url}: {body}")]
    Status { url: String, status: u16, body: String },
    #[error("invalid json from {url}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bootstrap {
    pub elements: Vec<RawPlayer>,
    pub teams: Vec<RawTeam>,
    pub element_types: Vec<RawPosition>,
    pub events: Vec<RawGameweek>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayer {
    pub id: u32,
    pub first_name: String,
    pub second_name: String,
    pub web_name: String,
    pub team: u32,
    pub element_type: u32,
    /// Tenths of a million.
    pub now_cost: u32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub news: Option<String>,
    #[serde(default)]
    pub news_added: Option<String>,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub chance_of_playing_next_round: Option<u32>,
    #[serde(default)]
    pub total_points: i32,
    pub points_per_game: String,
    pub form: String,
    pub selected_by_percent: String,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub goals_scored: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub clean_sheets: u32,
    #[serde(default)]
    pub bonus: u32,
    #[serde(default)]
    pub bps: i32,
    pub influence: String,
    pub creativity: String,
    pub threat: String,
    pub ict_index: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTeam {
    pub code: u32,
    pub id: u32,
    pub name: String,
    pub short_name: String,
    pub strength: u32,
    pub strength_overall_home: u32,
    pub strength_overall_away: u32,
    pub strength_attack_home: u32,
    pub strength_attack_away: u32,
    pub strength_defence_home: u32,
    pub strength_defence_away: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPosition {
    pub id: u32,
    pub plural_name: String,
    pub plural_name_short: String,
    pub singular_name: String,
    pub singular_name_short: String,
    #[serde(default)]
    pub squad_select: u32,
    #[serde(default)]
    pub squad_min_play: u32,
    #[serde(default)]
    pub squad_max_play: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGameweek {
    pub id: u32,
    pub name: String,
    pub deadline_time: String,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub highest_score: Option<u32>,
    #[serde(default)]
    pub average_entry_score: u32,
    #[serde(default)]
    pub most_selected: Option<u32>,
    #[serde(default)]
    pub most_transferred_in: Option<u32>,
    #[serde(default)]
    pub top_element: Option<u32>,
    #[serde(default)]
    pub most_captained: Option<u32>,
    #[serde(default)]
    pub most_vice_captained: Option<u32>,
    #[serde(default)]
    pub transfers_made: u64,
    #[serde(default)]
    pub chip_plays: Vec<ChipPlay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChipPlay {
    pub chip_name: String,
    pub num_played: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ElementSummary {
    #[serde(default)]
    pub history: Vec<RawHistorySample>,
    #[serde(default)]
    pub history_past: Vec<RawPreviousSeason>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHistorySample {
    pub element: u32,
    pub fixture: u32,
    pub opponent_team: u32,
    pub round: u32,
    pub kickoff_time: String,
    #[serde(default)]
    pub was_home: bool,
    #[serde(default)]
    pub team_h_score: Option<u32>,
    #[serde(default)]
    pub team_a_score: Option<u32>,
    #[serde(default)]
    pub total_points: i32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub goals_scored: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub clean_sheets: u32,
    #[serde(default)]
    pub goals_conceded: u32,
    #[serde(default)]
    pub saves: u32,
    #[serde(default)]
    pub yellow_cards: u32,
    #[serde(default)]
    pub red_cards: u32,
    #[serde(default)]
    pub bonus: u32,
    pub bps: i32,
    pub influence: String,
    pub creativity: String,
    pub threat: String,
    pub ict_index: String,
    /// Tenths of a million.
    pub value: u32,
    #[serde(default)]
    pub transfers_balance: i64,
    #[serde(default)]
    pub selected: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPreviousSeason {
    /// Not part of the payload; filled with the id the summary was fetched for.
    #[serde(default)]
    pub element: u32,
    pub season_name: String,
    pub element_code: u32,
    pub start_cost: u32,
    pub end_cost: u32,
    #[serde(default)]
    pub total_points: i32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub goals_scored: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub clean_sheets: u32,
    #[serde(default)]
    pub bonus: u32,
    #[serde(default)]
    pub bps: i32,
    #[serde(default)]
    pub influence: String,
    #[serde(default)]
    pub creativity: String,
    #[serde(default)]
    pub threat: String,
    #[serde(default)]
    pub ict_index: String,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerHistories {
    pub current: Vec<RawHistorySample>,
    pub previous: Vec<RawPreviousSeason>,
}

pub fn fetch_bootstrap(cfg: &Config) -> Result<Bootstrap, RemoteFetchError> {
    let bootstrap: Bootstrap = get_json(cfg, BOOTSTRAP_PATH)?;
    info!(
        players = bootstrap.elements.len(),
        teams = bootstrap.teams.len(),
        positions = bootstrap.element_types.len(),
        gameweeks = bootstrap.events.len(),
        "bootstrap loaded"
    );
    Ok(bootstrap)
}

pub fn fetch_fixtures(cfg: &Config) -> Result<Vec<Fixture>, RemoteFetchError> {
    let fixtures: Vec<Fixture> = get_json(cfg, FIXTURES_PATH)?;
    info!(fixtures = fixtures.len(), "fixtures loaded");
    Ok(fixtures)
}

/// An empty or `null` body is a player with no history.
pub fn fetch_element_summary(
    cfg: &Config,
    player_id: u32,
) -> Result<ElementSummary, RemoteFetchError> {
    let (url, body) = get_text(cfg, &format!("element-summary/{player_id}/"))?;
    parse_element_summary_json(&body).map_err(|source| RemoteFetchError::Json { url, source })
}

/// One request per player. Output order follows `player_ids` whatever the
/// configured parallelism; the first failure aborts the whole batch.
pub fn fetch_player_histories(
    cfg: &Config,
    player_ids: &[u32],
) -> Result<PlayerHistories, RemoteFetchError> {
    info!(
        players = player_ids.len(),
        parallelism = cfg.fetch_parallelism,
        "fetching player histories"
    );

    let fetch_one = |id: &u32| fetch_element_summary(cfg, *id).map(|summary| (*id, summary));
    let summaries: Vec<(u32, ElementSummary)> = if cfg.fetch_parallelism > 1 {
        with_fetch_pool(cfg.fetch_parallelism, || {
            player_ids
                .par_iter()
                .map(fetch_one)
                .collect::<Result<Vec<_>, RemoteFetchError>>()
        })?
    } else {
        player_ids
            .iter()
            .map(fetch_one)
            .collect::<Result<Vec<_>, RemoteFetchError>>()?
    };

    Ok(merge_summaries(summaries))
}

pub fn merge_summaries(summaries: Vec<(u32, ElementSummary)>) -> PlayerHistories {
    let mut out = PlayerHistories::default();
    for (player_id, summary) in summaries {
        out.current.extend(summary.history);
        out.previous
            .extend(summary.history_past.into_iter().map(|mut season| {
                season.element = player_id;
                season
            }));
    }
    out
}

pub fn parse_bootstrap_json(raw: &str) -> Result<Bootstrap, serde_json::Error> {
    serde_json::from_str(raw.trim())
}

pub fn parse_fixtures_json(raw: &str) -> Result<Vec<Fixture>, serde_json::Error> {
    serde_json::from_str(raw.trim())
}

pub fn parse_element_summary_json(raw: &str) -> Result<ElementSummary, serde_json::Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(ElementSummary::default());
    }
    serde_json::from_str(trimmed)
}

fn get_json<T: DeserializeOwned>(cfg: &Config, path: &str) -> Result<T, RemoteFetchError> {
    let (url, body) = get_text(cfg, path)?;
    serde_json::from_str(body.trim()).map_err(|source| RemoteFetchError::Json { url, source })
}

/// GET `path`, returning the url and body of a 2xx response.
fn get_text(cfg: &Config, path: &str) -> Result<(String, String), RemoteFetchError> {
    let client = http_client(cfg.http_timeout).map_err(RemoteFetchError::Client)?;
    let url = cfg.endpoint(path);
    debug!(%url, "GET");

    let resp = client
        .get(&url)
        .send()
        .map_err(|source| RemoteFetchError::Transport {
            url: url.clone(),
            source,
        })?;
    let status = resp.status();
    let body = resp.text().map_err(|source| RemoteFetchError::Transport {
        url: url.clone(),
        source,
    })?;
    if !status.is_success() {
        return Err(RemoteFetchError::Status {
            url,
            status: status.as_u16(),
            body: body.chars().take(BODY_PREVIEW_CHARS).collect(),
        });
    }
    Ok((url, body))
}

fn with_fetch_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}
