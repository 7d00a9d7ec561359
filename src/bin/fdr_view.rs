use std::path::PathBuf;

use anyhow::{Context, Result};
use crossterm::style::{Color, Stylize, style};

use fpl_fdr::config::{self, Config};
use fpl_fdr::dashboard::{self, DashboardData, DashboardState, DisplayMode};
use fpl_fdr::export::export_fdr_xlsx;
use fpl_fdr::fdr::{FdrMatrix, TextColor, fdr_color, gameweek_label};
use fpl_fdr::player_stats::{join_player_history, points_leaders};

const CELL_WIDTH: usize = 12;

#[derive(Debug, Default)]
struct ViewArgs {
    data_dir: Option<PathBuf>,
    gameweek: Option<u32>,
    horizon: Option<usize>,
    fixtures: bool,
    players: Option<usize>,
    xlsx: Option<PathBuf>,
}

fn main() -> Result<()> {
    config::load_dotenv();
    fpl_fdr::init_tracing();

    let args = parse_args(std::env::args().skip(1).collect());
    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| Config::from_env().data_dir);

    let data = dashboard::load_cached(&data_dir)?;
    let mut state = data.initial_state();
    if let Some(gw) = args.gameweek {
        state.selected_gameweek = Some(gw);
    }
    if args.fixtures {
        state.display_mode = DisplayMode::Fixtures;
    }

    println!("{}", state.display_mode.label());
    match state.display_mode {
        DisplayMode::FixtureDifficulty => print_matrix(&data.matrix, &state, args.horizon),
        DisplayMode::Fixtures => print_fixtures(&data, &state),
    }

    if let Some(limit) = args.players {
        let rows = join_player_history(&data.snapshot).context("join player history")?;
        println!();
        println!("{:<20} {:>6} {:>6}", "Player", "Cost", "Pts");
        for (name, cost, points) in points_leaders(&rows, limit) {
            println!("{name:<20} {cost:>6.1} {points:>6}");
        }
    }

    if let Some(path) = args.xlsx.as_deref() {
        let report = export_fdr_xlsx(path, &data.matrix)?;
        println!(
            "Wrote {} ({} teams x {} gameweeks, {} fixtures)",
            path.display(),
            report.teams,
            report.gameweeks,
            report.filled_cells
        );
    }

    Ok(())
}

fn print_matrix(matrix: &FdrMatrix, state: &DashboardState, horizon: Option<usize>) {
    if matrix.is_empty() {
        println!("No upcoming fixtures.");
        return;
    }
    let start = state.selected_gameweek.unwrap_or_default();
    let gameweeks: Vec<u32> = matrix
        .gameweeks()
        .filter(|&gw| gw >= start)
        .take(horizon.unwrap_or(usize::MAX))
        .collect();

    print!("{:<6}", "");
    for &gw in &gameweeks {
        print!("{:^CELL_WIDTH$}", gameweek_label(gw));
    }
    println!();

    for team in matrix.teams() {
        print!("{team:<6}");
        for &gw in &gameweeks {
            let label = matrix.label(team, gw).unwrap_or_default();
            let color = fdr_color(matrix.difficulty(team, gw));
            let (r, g, b) = color.rgb();
            let fg = match color.text {
                TextColor::Black => Color::Black,
                TextColor::White => Color::White,
            };
            let text = format!("{label:^CELL_WIDTH$}");
            print!("{}", style(text).with(fg).on(Color::Rgb { r, g, b }));
        }
        println!();
    }
}

fn print_fixtures(data: &DashboardData, state: &DashboardState) {
    let Some(gw) = state.selected_gameweek else {
        println!("No fixtures scheduled.");
        return;
    };
    println!("Premier League Fixtures - Gameweek {gw}");
    for day in data.fixture_days(state) {
        match day.date {
            Some(date) => println!("{}", date.format("%A %d %B %Y")),
            None => println!("Date TBC"),
        }
        for line in day.matches {
            let time = line.time.as_deref().unwrap_or("--:--");
            match line.score {
                Some((home, away)) => println!(
                    "  {} {home}-{away} {} - {time} ({})",
                    line.home,
                    line.away,
                    line.status.label()
                ),
                None => println!(
                    "  {} vs {} - {time} ({})",
                    line.home,
                    line.away,
                    line.status.label()
                ),
            }
        }
    }
}

fn parse_args(args: Vec<String>) -> ViewArgs {
    let mut out = ViewArgs::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
            None => (arg, None),
        };
        match flag.as_str() {
            "--fixtures" => out.fixtures = true,
            "--data-dir" | "--gameweek" | "--horizon" | "--players" | "--xlsx" => {
                let Some(value) = inline.or_else(|| iter.next()) else {
                    continue;
                };
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                match flag.as_str() {
                    "--data-dir" => out.data_dir = Some(PathBuf::from(value)),
                    "--gameweek" => out.gameweek = value.parse().ok(),
                    "--horizon" => out.horizon = value.parse().ok(),
                    "--players" => out.players = value.parse().ok(),
                    _ => out.xlsx = Some(PathBuf::from(value)),
                }
            }
            _ => eprintln!("ignoring unknown argument {flag}"),
        }
    }
    out
}
