use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;

use fpl_fdr::dashboard::{
    self, DashboardData, DashboardState, DisplayMode, MatchStatus, fixtures_for_gameweek,
};
use fpl_fdr::fetch::{
    merge_summaries, parse_bootstrap_json, parse_element_summary_json, parse_fixtures_json,
};
use fpl_fdr::pipeline::build_snapshot;
use fpl_fdr::store::Snapshot;

fn read_fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn sample_snapshot() -> Snapshot {
    let bootstrap = parse_bootstrap_json(&read_fixture("bootstrap.json")).unwrap();
    let summary = parse_element_summary_json(&read_fixture("element_summary.json")).unwrap();
    let fixtures = parse_fixtures_json(&read_fixture("fixtures.json")).unwrap();
    build_snapshot(bootstrap, merge_summaries(vec![(2, summary)]), fixtures).unwrap()
}

#[test]
fn initial_state_selects_next_gameweek() {
    let data = DashboardData::from_snapshot(sample_snapshot()).unwrap();
    let state = data.initial_state();
    assert_eq!(state.selected_gameweek, Some(2));
    assert_eq!(state.display_mode, DisplayMode::FixtureDifficulty);
    assert_eq!(data.gameweeks, vec![1, 2]);
}

#[test]
fn navigation_stays_in_bounds() {
    let gameweeks = [1, 2, 3];
    let mut state = DashboardState {
        selected_gameweek: Some(1),
        display_mode: DisplayMode::Fixtures,
    };
    state.previous(&gameweeks);
    assert_eq!(state.selected_gameweek, Some(1));
    state.next(&gameweeks);
    state.next(&gameweeks);
    state.next(&gameweeks);
    assert_eq!(state.selected_gameweek, Some(3));
    state.previous(&gameweeks);
    assert_eq!(state.selected_gameweek, Some(2));

    let mut detached = DashboardState {
        selected_gameweek: Some(9),
        ..DashboardState::default()
    };
    detached.next(&gameweeks);
    assert_eq!(detached.selected_gameweek, Some(9));
}

#[test]
fn fixtures_grouped_by_kickoff_date() {
    let data = DashboardData::from_snapshot(sample_snapshot()).unwrap();
    let days = fixtures_for_gameweek(&data.fixtures, 2);

    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 8, 24));
    assert_eq!(days[0].matches[0].home, "Aston Villa");
    assert_eq!(days[0].matches[0].away, "Arsenal");
    assert_eq!(days[0].matches[0].time.as_deref(), Some("15:00"));
    assert_eq!(days[0].matches[0].status, MatchStatus::Upcoming);
    assert_eq!(days[1].matches[0].home, "Arsenal");

    let played = fixtures_for_gameweek(&data.fixtures, 1);
    assert_eq!(played[0].matches[0].status, MatchStatus::Finished);
    assert_eq!(played[0].matches[0].score, Some((2, 0)));
}

#[test]
fn kickoffs_shown_in_uk_local_time() {
    let mut snapshot = sample_snapshot();
    snapshot.fixtures[1].kickoff_time = Some("2024-08-24T23:30:00Z".to_string());
    snapshot.fixtures[2].kickoff_time = Some("2024-12-26T15:00:00Z".to_string());
    let data = DashboardData::from_snapshot(snapshot).unwrap();
    let days = fixtures_for_gameweek(&data.fixtures, 2);

    assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 8, 25));
    assert_eq!(days[0].matches[0].time.as_deref(), Some("00:30"));
    assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2024, 12, 26));
    assert_eq!(days[1].matches[0].time.as_deref(), Some("15:00"));
}

#[test]
fn fdr_matrix_built_from_snapshot() {
    let data = DashboardData::from_snapshot(sample_snapshot()).unwrap();
    assert_eq!(data.matrix.label("AVL", 2).as_deref(), Some("ARS (H)"));
    assert_eq!(data.matrix.label("ARS", 2).as_deref(), Some("AVL (A), BOU (H)"));
    assert_eq!(data.matrix.difficulty("BOU", 2), Some(5));
    assert_eq!(data.matrix.column_labels(), vec!["GW2"]);
}

#[test]
fn unknown_fixture_team_fails_the_load() {
    let mut snapshot = sample_snapshot();
    snapshot.fixtures[1].team_a = 77;
    let err = DashboardData::from_snapshot(snapshot).unwrap_err();
    assert!(format!("{err:#}").contains("unknown team id 77"));
}

#[test]
fn cached_load_reuses_data_per_directory() {
    let dir = tempfile::tempdir().unwrap();
    sample_snapshot().write_all(dir.path()).unwrap();

    let first = dashboard::load_cached(dir.path()).unwrap();
    let second = dashboard::load_cached(dir.path()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    dashboard::clear_cache();
    let third = dashboard::load_cached(dir.path()).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(third.matrix.column_labels(), first.matrix.column_labels());
}
