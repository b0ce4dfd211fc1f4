use colored::Colorize;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};

use crate::fmt::amount;
use crate::loader::load_files;
use crate::models::FileRecord;
use crate::statement::{statement_rows, StatementRow, COLUMN_HEADERS};

pub fn run(endpoint: &str, ids: &[i64]) {
    let session = super::select(load_files(endpoint), ids);
    let statements: Vec<String> = session.selected_files().map(format_statement).collect();
    if statements.is_empty() {
        println!("No files selected.");
    } else {
        println!("{}", statements.join("\n\n"));
    }
}

fn flush(out: &mut String, table: Option<Table>) {
    if let Some(table) = table {
        out.push_str(&format!("{table}\n"));
    }
}

/// One file's statement: header lines, then a table per account class.
pub fn format_statement(file: &FileRecord) -> String {
    render_statement(file, colored::control::SHOULD_COLORIZE.should_colorize())
}

fn render_statement(file: &FileRecord, styled: bool) -> String {
    let mut out = String::new();
    let mut table: Option<Table> = None;

    for row in statement_rows(file) {
        match row {
            StatementRow::Header(text) => {
                out.push_str(&text);
                out.push('\n');
            }
            StatementRow::ClassHeading(text) => {
                flush(&mut out, table.take());
                let heading = if styled { text.bold().to_string() } else { text };
                out.push_str(&format!("\n{heading}\n"));
            }
            StatementRow::ColumnHeaders => {
                let mut t = Table::new();
                if styled {
                    t.enforce_styling();
                } else {
                    t.force_no_tty();
                }
                t.set_header(COLUMN_HEADERS.to_vec());
                table = Some(t);
            }
            StatementRow::Account { account, highlight } => {
                let Some(t) = table.as_mut() else { continue };
                // comfy-table applies the style after measuring column widths.
                let paint = |cell: Cell| {
                    if highlight {
                        cell.fg(Color::Yellow).add_attribute(Attribute::Bold)
                    } else {
                        cell
                    }
                };
                let mut cells = vec![paint(Cell::new(&account.account_number))];
                cells.extend(account.amounts().into_iter().map(|v| {
                    paint(Cell::new(amount(v)).set_alignment(CellAlignment::Right))
                }));
                t.add_row(cells);
            }
        }
    }
    flush(&mut out, table.take());
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::tests::{acct, file};

    #[test]
    fn test_format_statement() {
        let f = file(
            1,
            "Bank A",
            vec![acct(1, "1", "10"), acct(2, "2", "20"), acct(3, "1", "101")],
        );
        let out = render_statement(&f, false);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Название банка: Bank A");
        assert_eq!(lines[4], "1/1/2017 0:00:00 в руб. Bank A");
        assert!(lines.contains(&" 1"));
        assert!(lines.contains(&" 2"));
        let first = out.find("\n 1\n").unwrap();
        let second = out.find("\n 2\n").unwrap();
        assert!(first < second);
        assert!(out.contains("Входящее сальдо (Актив)"));
        assert!(out.contains("101"));
        assert!(out.contains("5.5"));
    }

    #[test]
    fn test_highlighted_rows_keep_table_aligned() {
        let f = file(1, "Bank A", vec![acct(1, "1", "10"), acct(2, "1", "101")]);
        let out = render_statement(&f, true);
        assert!(out.contains("\x1b["));

        let ansi = regex::Regex::new(r"\x1b\[[0-9;]*m").unwrap();
        let plain = ansi.replace_all(&out, "");
        let widths: Vec<usize> = plain
            .lines()
            .filter(|l| l.starts_with('+') || l.starts_with('|'))
            .map(|l| l.chars().count())
            .collect();
        assert_eq!(widths.len(), 7);
        assert!(widths.iter().all(|&w| w == widths[0]), "{widths:?}");
    }

    #[test]
    fn test_format_statement_without_accounts() {
        let f = file(1, "Bank A", vec![]);
        assert_eq!(format_statement(&f).lines().count(), 5);
    }
}
