use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Europe::London;
use tracing::{debug, info};

use crate::fdr::{FdrMatrix, NamedFixture, TeamLookup, next_gameweek, resolve_fixtures};
use crate::model::Fixture;
use crate::store::Snapshot;

static CACHE: Mutex<Option<HashMap<PathBuf, Arc<DashboardData>>>> = Mutex::new(None);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    FixtureDifficulty,
    Fixtures,
}

impl DisplayMode {
    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::FixtureDifficulty => "Fixture Difficulty Rating",
            DisplayMode::Fixtures => "Premier League Fixtures",
        }
    }
}

/// Per-session selections, passed to whatever renders a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardState {
    pub selected_gameweek: Option<u32>,
    pub display_mode: DisplayMode,
}

impl DashboardState {
    pub fn initial(fixtures: &[Fixture]) -> Self {
        Self {
            selected_gameweek: next_gameweek(fixtures),
            display_mode: DisplayMode::default(),
        }
    }

    /// No-op at the first gameweek or when the selection isn't in `gameweeks`.
    pub fn previous(&mut self, gameweeks: &[u32]) {
        if let Some(idx) = self.selected_index(gameweeks) {
            if idx > 0 {
                self.selected_gameweek = Some(gameweeks[idx - 1]);
            }
        }
    }

    pub fn next(&mut self, gameweeks: &[u32]) {
        if let Some(idx) = self.selected_index(gameweeks) {
            if let Some(&gw) = gameweeks.get(idx + 1) {
                self.selected_gameweek = Some(gw);
            }
        }
    }

    fn selected_index(&self, gameweeks: &[u32]) -> Option<usize> {
        let selected = self.selected_gameweek?;
        gameweeks.iter().position(|&gw| gw == selected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Finished,
    Upcoming,
}

impl MatchStatus {
    pub fn label(self) -> &'static str {
        match self {
            MatchStatus::Finished => "Finished",
            MatchStatus::Upcoming => "Upcoming",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureLine {
    pub home: String,
    pub away: String,
    /// `HH:MM` UK local time.
    pub time: Option<String>,
    pub status: MatchStatus,
    pub score: Option<(u32, u32)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureDay {
    /// `None` collects fixtures without a kickoff time.
    pub date: Option<NaiveDate>,
    pub matches: Vec<FixtureLine>,
}

/// A gameweek's fixtures grouped by UK kickoff date, dated days first.
pub fn fixtures_for_gameweek(fixtures: &[NamedFixture], gameweek: u32) -> Vec<FixtureDay> {
    let mut selected: Vec<&NamedFixture> = fixtures
        .iter()
        .filter(|f| f.event == Some(gameweek))
        .collect();
    selected.sort_by_key(|f| (f.kickoff_time.is_none(), f.kickoff_time, f.id));

    let mut days: Vec<FixtureDay> = Vec::new();
    for fixture in selected {
        let local = fixture.kickoff_time.map(|dt| dt.with_timezone(&London));
        let date = local.map(|dt| dt.date_naive());
        let line = FixtureLine {
            home: fixture.home.name.clone(),
            away: fixture.away.name.clone(),
            time: local.map(|dt| dt.format("%H:%M").to_string()),
            status: if fixture.finished {
                MatchStatus::Finished
            } else {
                MatchStatus::Upcoming
            },
            score: fixture.home_score.zip(fixture.away_score),
        };
        match days.last_mut() {
            Some(day) if day.date == date => day.matches.push(line),
            _ => days.push(FixtureDay {
                date,
                matches: vec![line],
            }),
        }
    }
    days
}

/// Everything a page render needs, derived once from a snapshot directory.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub snapshot: Snapshot,
    pub fixtures: Vec<NamedFixture>,
    pub matrix: FdrMatrix,
    pub gameweeks: Vec<u32>,
}

impl DashboardData {
    pub fn load(dir: &Path) -> Result<Self> {
        let snapshot = Snapshot::read_all(dir)
            .with_context(|| format!("read snapshot from {}", dir.display()))?;
        Self::from_snapshot(snapshot)
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let lookup = TeamLookup::from_teams(&snapshot.teams);
        let fixtures =
            resolve_fixtures(&snapshot.fixtures, &lookup).context("resolve fixture teams")?;
        let matrix = FdrMatrix::build(&fixtures);
        let gameweeks = fixtures
            .iter()
            .filter_map(|f| f.event)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Ok(Self {
            snapshot,
            fixtures,
            matrix,
            gameweeks,
        })
    }

    pub fn initial_state(&self) -> DashboardState {
        DashboardState::initial(&self.snapshot.fixtures)
    }

    pub fn fixture_days(&self, state: &DashboardState) -> Vec<FixtureDay> {
        state
            .selected_gameweek
            .map(|gw| fixtures_for_gameweek(&self.fixtures, gw))
            .unwrap_or_default()
    }
}

/// Memoised [`DashboardData::load`], keyed by directory. Entries live until
/// [`clear_cache`] or process exit.
pub fn load_cached(dir: &Path) -> Result<Arc<DashboardData>> {
    let key = dir.to_path_buf();
    {
        let guard = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = guard.as_ref().and_then(|cache| cache.get(&key)) {
            debug!(dir = %dir.display(), "dashboard cache hit");
            return Ok(Arc::clone(hit));
        }
    }

    info!(dir = %dir.display(), "loading dashboard data");
    let data = Arc::new(DashboardData::load(dir)?);
    let mut guard = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    let cache = guard.get_or_insert_with(HashMap::new);
    Ok(Arc::clone(cache.entry(key).or_insert(data)))
}

pub fn clear_cache() {
    let mut guard = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    *guard = None;
}
