use fpl_fdr::fdr::{
    FdrMatrix, JoinError, TeamLookup, TextColor, Venue, fdr_color, next_gameweek,
    perspective_records, resolve_fixtures, upcoming,
};
use fpl_fdr::model::{Fixture, Team};

fn team(id: u32, name: &str, short: &str) -> Team {
    Team {
        code: id * 10,
        id,
        team_name: name.to_string(),
        short_name: short.to_string(),
        strength: 3,
        strength_overall_home: 1200,
        strength_overall_away: 1200,
        strength_attack_home: 1200,
        strength_attack_away: 1200,
        strength_defence_home: 1200,
        strength_defence_away: 1200,
    }
}

fn fixture(id: u32, event: Option<u32>, home: u32, away: u32, fdr: (u8, u8), finished: bool) -> Fixture {
    Fixture {
        id,
        code: 0,
        event,
        kickoff_time: event.map(|gw| format!("2024-10-{:02}T14:00:00Z", gw.min(28))),
        team_h: home,
        team_a: away,
        team_h_score: None,
        team_a_score: None,
        started: Some(finished),
        finished,
        finished_provisional: finished,
        minutes: 0,
        team_h_difficulty: fdr.0,
        team_a_difficulty: fdr.1,
        pulse_id: 0,
    }
}

fn teams() -> Vec<Team> {
    vec![
        team(1, "Alpha Town", "ALP"),
        team(2, "Bravo United", "BRA"),
        team(3, "Charlie City", "CHA"),
    ]
}

#[test]
fn lookups_cover_every_team() {
    let teams = teams();
    let lookup = TeamLookup::from_teams(&teams);
    assert_eq!(lookup.len(), teams.len());
    for t in &teams {
        assert_eq!(lookup.name(t.id), Some(t.team_name.as_str()));
        assert_eq!(lookup.short_name(t.id), Some(t.short_name.as_str()));
    }
    assert_eq!(lookup.name(99), None);
}

#[test]
fn home_easy_away_hard_scenario() {
    let lookup = TeamLookup::from_teams(&teams());
    let named = resolve_fixtures(&[fixture(100, Some(10), 1, 2, (2, 4), false)], &lookup).unwrap();
    let matrix = FdrMatrix::build(&named);

    assert_eq!(matrix.label("ALP", 10).as_deref(), Some("BRA (H)"));
    assert_eq!(matrix.label("BRA", 10).as_deref(), Some("ALP (A)"));
    assert_eq!(matrix.difficulty("ALP", 10), Some(2));
    assert_eq!(matrix.difficulty("BRA", 10), Some(4));

    let values = matrix.difficulty_values();
    assert_eq!(values.get(&("ALP".to_string(), "GW10".to_string())), Some(&2));
    assert_eq!(values.get(&("BRA".to_string(), "GW10".to_string())), Some(&4));

    let home = matrix.color("ALP", 10);
    assert_eq!(home.background_hex(), "#00ff86");
    assert_eq!(home.text, TextColor::Black);
    let away = matrix.color("BRA", 10);
    assert_eq!(away.background_hex(), "#ff005a");
    assert_eq!(away.text, TextColor::White);
}

#[test]
fn unknown_team_id_is_rejected() {
    let lookup = TeamLookup::from_teams(&teams());
    let err = resolve_fixtures(&[fixture(7, Some(3), 1, 42, (3, 3), false)], &lookup).unwrap_err();
    assert!(matches!(
        err,
        JoinError::UnknownTeam {
            fixture_id: 7,
            team_id: 42
        }
    ));
}

#[test]
fn malformed_kickoff_is_rejected() {
    let lookup = TeamLookup::from_teams(&teams());
    let mut bad = fixture(8, Some(3), 1, 2, (3, 3), false);
    bad.kickoff_time = Some("Sat 5 Oct 15:00".to_string());
    let err = resolve_fixtures(&[bad], &lookup).unwrap_err();
    assert!(matches!(err, JoinError::Timestamp { fixture_id: 8, .. }));
}

#[test]
fn each_upcoming_fixture_yields_two_records() {
    let lookup = TeamLookup::from_teams(&teams());
    let named = resolve_fixtures(
        &[
            fixture(1, Some(9), 2, 3, (5, 1), true),
            fixture(2, Some(10), 1, 2, (2, 4), false),
            fixture(3, Some(10), 3, 1, (3, 5), false),
            fixture(4, None, 2, 3, (3, 3), false),
        ],
        &lookup,
    )
    .unwrap();

    let pending: Vec<_> = upcoming(&named).collect();
    assert_eq!(pending.len(), 2);

    for f in pending {
        let [home, away] = perspective_records(f).expect("scheduled fixture");
        assert_eq!(home.venue, Venue::Home);
        assert_eq!(away.venue, Venue::Away);
        assert_eq!(home.difficulty, f.home_difficulty);
        assert_eq!(away.difficulty, f.away_difficulty);
        assert_eq!(home.team, away.opponent);
        assert_eq!(away.team, home.opponent);
    }
    assert!(perspective_records(&named[3]).is_none());
}

#[test]
fn matrix_leaves_blank_cells_absent() {
    let lookup = TeamLookup::from_teams(&teams());
    let named = resolve_fixtures(
        &[
            fixture(1, Some(10), 1, 2, (2, 4), false),
            fixture(2, Some(11), 3, 1, (3, 3), false),
        ],
        &lookup,
    )
    .unwrap();
    let matrix = FdrMatrix::build(&named);

    assert_eq!(matrix.teams().collect::<Vec<_>>(), vec!["ALP", "BRA", "CHA"]);
    assert_eq!(matrix.column_labels(), vec!["GW10", "GW11"]);
    assert_eq!(matrix.label("CHA", 10), None);
    assert_eq!(matrix.difficulty("BRA", 11), None);
    assert_eq!(matrix.color("BRA", 11), fdr_color(None));

    let rows = matrix.to_rows();
    assert_eq!(rows[0], vec!["Team", "GW10", "GW11"]);
    assert_eq!(rows[2], vec!["BRA", "ALP (A)", ""]);
    assert_eq!(rows[3], vec!["CHA", "", "ALP (H)"]);
    assert!(rows.iter().all(|r| r.len() == 3));
}

#[test]
fn double_gameweek_keeps_both_fixtures() {
    let lookup = TeamLookup::from_teams(&teams());
    let named = resolve_fixtures(
        &[
            fixture(1, Some(12), 1, 2, (2, 4), false),
            fixture(2, Some(12), 3, 1, (3, 4), false),
        ],
        &lookup,
    )
    .unwrap();
    let matrix = FdrMatrix::build(&named);
    assert_eq!(matrix.label("ALP", 12).as_deref(), Some("BRA (H), CHA (A)"));
    assert_eq!(matrix.difficulty("ALP", 12), Some(4));
}

#[test]
fn next_gameweek_is_first_with_unfinished_fixture() {
    let fixtures = vec![
        fixture(1, Some(2), 1, 2, (3, 3), true),
        fixture(2, Some(4), 1, 3, (3, 3), false),
        fixture(3, Some(3), 2, 3, (3, 3), false),
        fixture(4, None, 2, 1, (3, 3), false),
    ];
    assert_eq!(next_gameweek(&fixtures), Some(3));
}

#[test]
fn next_gameweek_falls_back_to_first_at_season_end() {
    let fixtures = vec![
        fixture(1, Some(38), 1, 2, (3, 3), true),
        fixture(2, Some(1), 1, 3, (3, 3), true),
    ];
    assert_eq!(next_gameweek(&fixtures), Some(1));
    assert_eq!(next_gameweek(&[]), None);
}
