use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use tracing::error;

use crate::fmt::amount;
use crate::models::{AccountRecord, FileRecord};
use crate::session::Session;
use crate::statement::{statement_rows, StatementRow, COLUMN_HEADERS};
use crate::tui::{
    View, ViewAction, COLUMN_HEADER_STYLE, FOOTER_STYLE, HEADER_STYLE, HIGHLIGHT_STYLE,
    SECTION_STYLE, SELECTED_STYLE, TITLE_STYLE,
};
use crate::xlsx::{export_to_excel, ExportOutcome};

const MAX_LIST_HEIGHT: usize = 10;
const PAGE_SCROLL: u16 = 10;
const SIDE_SCROLL: u16 = 8;
const CELL_GAP: &str = "  ";

fn account_cells(account: &AccountRecord) -> [String; 7] {
    let [oa, op, d, c, ca, cp] = account.amounts().map(amount);
    [account.account_number.clone(), oa, op, d, c, ca, cp]
}

/// Column widths wide enough for the headers and every account row of a file.
fn column_widths(rows: &[StatementRow]) -> [usize; 7] {
    let mut widths = COLUMN_HEADERS.map(|h| h.chars().count());
    for row in rows {
        if let StatementRow::Account { account, .. } = row {
            for (w, cell) in widths.iter_mut().zip(account_cells(account)) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    widths
}

fn table_line(cells: &[String], widths: &[usize; 7], style: Style) -> Line<'static> {
    let mut spans = Vec::with_capacity(cells.len() * 2);
    for (i, (cell, &w)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            spans.push(Span::raw(CELL_GAP));
        }
        let padded = if i == 0 {
            format!("{cell:<w$}")
        } else {
            format!("{cell:>w$}")
        };
        spans.push(Span::styled(padded, style));
    }
    Line::from(spans)
}

/// Statement of one file as terminal lines.
pub fn file_lines(file: &FileRecord) -> Vec<Line<'static>> {
    let rows = statement_rows(file);
    let widths = column_widths(&rows);
    let headers: Vec<String> = COLUMN_HEADERS.iter().map(|h| h.to_string()).collect();

    let mut header_index = 0;
    rows.iter()
        .map(|row| match row {
            StatementRow::Header(text) => {
                let line = match header_index {
                    0 => Line::styled(text.clone(), TITLE_STYLE),
                    1..=3 => Line::from(text.clone()).centered(),
                    _ => Line::from(text.clone()),
                };
                header_index += 1;
                line
            }
            StatementRow::ClassHeading(text) => Line::styled(text.clone(), SECTION_STYLE),
            StatementRow::ColumnHeaders => table_line(&headers, &widths, COLUMN_HEADER_STYLE),
            StatementRow::Account { account, highlight } => {
                let style = if *highlight { HIGHLIGHT_STYLE } else { Style::new() };
                table_line(&account_cells(account), &widths, style)
            }
        })
        .collect()
}

/// Detail view: the statements of selected files only, in list order.
pub fn detail_lines(session: &Session) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for file in session.selected_files() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(file_lines(file));
    }
    lines
}

pub struct FileBrowser {
    session: Session,
    pending: Option<Receiver<Vec<FileRecord>>>,
    export_dir: PathBuf,
    list_state: ListState,
    detail_scroll: (u16, u16),
    status_message: Option<(String, bool)>, // (message, is_error)
}

impl FileBrowser {
    pub fn new(export_dir: PathBuf) -> Self {
        Self {
            session: Session::default(),
            pending: None,
            export_dir,
            list_state: ListState::default(),
            detail_scroll: (0, 0),
            status_message: None,
        }
    }

    /// Show a loading placeholder until `files` delivers the list.
    pub fn with_loader(mut self, files: Receiver<Vec<FileRecord>>) -> Self {
        self.pending = Some(files);
        self
    }

    pub fn set_files(&mut self, files: Vec<FileRecord>) {
        self.session.replace_files(files);
        self.list_state
            .select(if self.session.files().is_empty() { None } else { Some(0) });
        self.detail_scroll = (0, 0);
    }

    fn cursor_file_id(&self) -> Option<i64> {
        let i = self.list_state.selected()?;
        self.session.files().get(i).map(|f| f.id)
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.session.files().len();
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.list_state.select(Some(next as usize));
    }

    fn export(&mut self) {
        self.status_message = Some(match export_to_excel(&self.session, &self.export_dir) {
            Ok(ExportOutcome::Written { path, sheets }) => {
                (format!("Exported {sheets} sheet(s) to {}", path.display()), false)
            }
            Ok(ExportOutcome::NothingSelected) => ("No files selected".to_string(), false),
            Err(e) => {
                error!(error = %e, "export failed");
                (format!("Export failed: {e}"), true)
            }
        });
    }

    fn draw_list(&mut self, frame: &mut Frame, area: ratatui::layout::Rect) {
        if self.pending.is_some() {
            frame.render_widget(Paragraph::new(" Loading files\u{2026}").style(FOOTER_STYLE), area);
            return;
        }
        if self.session.files().is_empty() {
            frame.render_widget(Paragraph::new(" No files loaded.").style(FOOTER_STYLE), area);
            return;
        }
        let items: Vec<ListItem> = self
            .session
            .files()
            .iter()
            .map(|f| {
                let mark = if self.session.is_selected(f.id) { "[x]" } else { "[ ]" };
                ListItem::new(format!(" {mark} {}", f.file_name))
            })
            .collect();
        let list = List::new(items).highlight_style(SELECTED_STYLE);
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}

impl View for FileBrowser {
    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let border_style = Style::default().fg(Color::DarkGray);
        let list_height = self.session.files().len().clamp(1, MAX_LIST_HEIGHT) as u16;

        let [header_area, sep1, list_area, sep2, detail_area, status_area, keys_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(list_height),
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(area);

        frame.render_widget(
            Paragraph::new(" Список загруженных файлов").style(HEADER_STYLE),
            header_area,
        );
        let sep_line = "\u{2501}".repeat(area.width as usize);
        frame.render_widget(Paragraph::new(sep_line.as_str()).style(border_style), sep1);
        self.draw_list(frame, list_area);
        frame.render_widget(Paragraph::new(sep_line.as_str()).style(border_style), sep2);

        if self.session.selection().is_empty() {
            frame.render_widget(
                Paragraph::new(" Select a file to see its statement.").style(FOOTER_STYLE),
                detail_area,
            );
        } else {
            let details = detail_lines(&self.session);
            frame.render_widget(Paragraph::new(details).scroll(self.detail_scroll), detail_area);
        }

        let counts = format!(
            "{} file(s), {} selected",
            self.session.files().len(),
            self.session.selection().len()
        );
        let status = match &self.status_message {
            Some((msg, true)) => Line::from(vec![
                Span::styled(format!("{counts} | "), FOOTER_STYLE),
                Span::styled(msg.clone(), Style::default().fg(Color::Red)),
            ]),
            Some((msg, false)) => Line::styled(format!("{counts} | {msg}"), FOOTER_STYLE),
            None => Line::styled(counts, FOOTER_STYLE),
        };
        frame.render_widget(Paragraph::new(status), status_area);

        frame.render_widget(
            Paragraph::new(
                "\u{2191}/\u{2193}:move  space:select  a:all  PgUp/PgDn/\u{2190}/\u{2192}:scroll  x:Экспортировать в Excel  q:quit",
            )
            .style(FOOTER_STYLE),
            keys_area,
        );
    }

    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        self.status_message = None;

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Close,
            KeyCode::Down => self.move_cursor(1),
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.cursor_file_id() {
                    self.session.handle_file_selection(id);
                }
            }
            KeyCode::Char('a') => self.session.toggle_all(),
            KeyCode::PageDown => self.detail_scroll.0 = self.detail_scroll.0.saturating_add(PAGE_SCROLL),
            KeyCode::PageUp => self.detail_scroll.0 = self.detail_scroll.0.saturating_sub(PAGE_SCROLL),
            KeyCode::Right => self.detail_scroll.1 = self.detail_scroll.1.saturating_add(SIDE_SCROLL),
            KeyCode::Left => self.detail_scroll.1 = self.detail_scroll.1.saturating_sub(SIDE_SCROLL),
            KeyCode::Home => self.detail_scroll = (0, 0),
            KeyCode::Char('x') => self.export(),
            _ => {}
        }
        ViewAction::Continue
    }

    fn tick(&mut self) {
        let Some(rx) = &self.pending else { return };
        match rx.try_recv() {
            Ok(files) => {
                self.pending = None;
                self.set_files(files);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => self.pending = None,
        }
    }
}
