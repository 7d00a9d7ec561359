use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

use crate::fdr::{FdrMatrix, TextColor, fdr_color};

pub struct ExportReport {
    pub teams: usize,
    pub gameweeks: usize,
    pub filled_cells: usize,
}

/// One sheet, one row per team, each fixture cell filled with its FDR colour.
pub fn export_fdr_xlsx(path: &Path, matrix: &FdrMatrix) -> Result<ExportReport> {
    let gameweeks: Vec<u32> = matrix.gameweeks().collect();
    let header = Format::new().set_bold();
    let mut filled_cells = 0usize;
    let mut teams = 0usize;

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("FDR")?;
        write_header(sheet, &matrix.column_labels(), &header)?;

        for (row_idx, team) in matrix.teams().enumerate() {
            let row = (row_idx + 1) as u32;
            sheet
                .write_string_with_format(row, 0, team, &header)
                .with_context(|| format!("write team cell {team}"))?;
            for (col_idx, &gw) in gameweeks.iter().enumerate() {
                let Some(label) = matrix.label(team, gw) else {
                    continue;
                };
                let format = cell_format(matrix.difficulty(team, gw));
                sheet
                    .write_string_with_format(row, (col_idx + 1) as u16, &label, &format)
                    .with_context(|| format!("write cell ({team}, GW{gw})"))?;
                filled_cells += 1;
            }
            teams += 1;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        teams,
        gameweeks: gameweeks.len(),
        filled_cells,
    })
}

fn write_header(sheet: &mut Worksheet, labels: &[String], format: &Format) -> Result<()> {
    sheet.write_string_with_format(0, 0, "Team", format)?;
    for (idx, label) in labels.iter().enumerate() {
        sheet
            .write_string_with_format(0, (idx + 1) as u16, label, format)
            .with_context(|| format!("write header {label}"))?;
    }
    Ok(())
}

fn cell_format(difficulty: Option<u8>) -> Format {
    let color = fdr_color(difficulty);
    let font = match color.text {
        TextColor::Black => Color::Black,
        TextColor::White => Color::White,
    };
    Format::new()
        .set_background_color(Color::RGB(color.background))
        .set_font_color(font)
}
