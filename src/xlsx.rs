use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};
use tracing::info;

use crate::error::Result;
use crate::models::FileRecord;
use crate::session::Session;
use crate::statement::{statement_rows, StatementRow, COLUMN_HEADERS};

pub const EXPORT_FILE_NAME: &str = "files_data.xlsx";

/// Rows 0..TITLE_ROWS get the title format.
const TITLE_ROWS: usize = 3;
const TITLE_FONT_SIZE: u8 = 12;

const MAX_SHEET_NAME: usize = 31;
const INVALID_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

/// One worksheet as plain rows of cells, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

#[derive(Debug, PartialEq)]
pub enum ExportOutcome {
    Written { path: PathBuf, sheets: usize },
    NothingSelected,
}

/// Cells for one file's sheet. The highlight flag of account rows is not
/// carried into the workbook; only the on-screen views use it.
fn sheet_rows(file: &FileRecord) -> Vec<Vec<CellValue>> {
    statement_rows(file)
        .into_iter()
        .map(|row| match row {
            StatementRow::Header(text) | StatementRow::ClassHeading(text) => {
                vec![CellValue::Text(text)]
            }
            StatementRow::ColumnHeaders => COLUMN_HEADERS
                .iter()
                .map(|h| CellValue::Text(h.to_string()))
                .collect(),
            StatementRow::Account { account, .. } => {
                let mut cells = vec![CellValue::Text(account.account_number.clone())];
                cells.extend(account.amounts().into_iter().map(CellValue::Number));
                cells
            }
        })
        .collect()
}

/// Make a bank name acceptable to Excel as a sheet name.
/// `ordinal` is the 1-based sheet position, used when nothing usable remains.
pub fn sanitize_sheet_name(raw: &str, ordinal: usize) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| if INVALID_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let truncated: String = replaced
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME)
        .collect();
    let mut name = truncated.trim_end_matches('\'').to_string();
    if name.trim().is_empty() {
        return format!("Sheet{ordinal}");
    }
    // Reserved by Excel.
    if name.eq_ignore_ascii_case("history") {
        name.push('_');
    }
    name
}

/// Sheet names compare case-insensitively in Excel.
fn unique_sheet_name(base: String, taken: &[String]) -> String {
    let is_taken = |candidate: &str| {
        let lower = candidate.to_lowercase();
        taken.iter().any(|t| t.to_lowercase() == lower)
    };
    if !is_taken(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let suffix = format!(" ({n})");
        let stem: String = base
            .chars()
            .take(MAX_SHEET_NAME - suffix.chars().count())
            .collect();
        let candidate = format!("{stem}{suffix}");
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// One sheet per selected file, in file-list order. Unselected files are
/// skipped entirely.
pub fn build_sheets(session: &Session) -> Vec<SheetLayout> {
    let mut names: Vec<String> = Vec::new();
    let mut sheets = Vec::new();
    for (i, file) in session.selected_files().enumerate() {
        let name = unique_sheet_name(sanitize_sheet_name(&file.bank_name, i + 1), &names);
        names.push(name.clone());
        sheets.push(SheetLayout {
            name,
            rows: sheet_rows(file),
        });
    }
    sheets
}

pub fn write_workbook(sheets: &[SheetLayout], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let title_format = Format::new()
        .set_bold()
        .set_font_size(TITLE_FONT_SIZE)
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name.as_str())?;

        for (r, cells) in sheet.rows.iter().enumerate() {
            let row = r as u32;
            let titled = r < TITLE_ROWS;
            for (c, cell) in cells.iter().enumerate() {
                let col = c as u16;
                match (cell, titled) {
                    (CellValue::Text(s), true) => {
                        worksheet.write_string_with_format(row, col, s.as_str(), &title_format)?
                    }
                    (CellValue::Text(s), false) => worksheet.write_string(row, col, s.as_str())?,
                    (CellValue::Number(n), true) => {
                        worksheet.write_number_with_format(row, col, *n, &title_format)?
                    }
                    (CellValue::Number(n), false) => worksheet.write_number(row, col, *n)?,
                };
            }
        }
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    workbook.save(path)?;
    Ok(())
}

/// Export the selected files to `dir/files_data.xlsx`. With nothing selected
/// no file is written.
pub fn export_to_excel(session: &Session, dir: &Path) -> Result<ExportOutcome> {
    let sheets = build_sheets(session);
    if sheets.is_empty() {
        info!("no files selected, skipping export");
        return Ok(ExportOutcome::NothingSelected);
    }
    let path = dir.join(EXPORT_FILE_NAME);
    write_workbook(&sheets, &path)?;
    info!(path = %path.display(), sheets = sheets.len(), "workbook written");
    Ok(ExportOutcome::Written {
        path,
        sheets: sheets.len(),
    })
}
