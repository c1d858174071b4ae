//! TUI rendering: orchestrates all panes.

pub mod employee_detail;
pub mod employee_form;
pub mod employee_table;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};
use roster_core::{notice::Severity, store::RecordStore};

use crate::app::{App, Mode};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S: RecordStore>(f: &mut Frame, app: &App<S>) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0]);
  employee_table::draw(f, rows[1], app);
  draw_status(f, rows[2], app);

  // Modals render over the table.
  if app.listing.viewer().is_open() {
    employee_detail::draw(f, area, app.listing.viewer());
  }
  if app.form.is_open() {
    employee_form::draw(f, area, app);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " roster  [a] add  [/] search  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S: RecordStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let (mode_label, hints) = if app.form.is_open() {
    ("FORM", "Tab/↑↓ move  Enter select  Ctrl-S submit")
  } else if app.listing.viewer().is_open() {
    ("DETAIL", "Enter close")
  } else {
    match app.mode {
      Mode::Search => ("SEARCH", "Type to filter  Enter keep  Esc clear"),
      Mode::Table => (
        "NORMAL",
        "↑↓/jk move  Enter view  e edit  d delete  [ ] page  s size  r reload",
      ),
    }
  };

  let (text, text_style) = match app.notice() {
    Some(notice) => {
      let color = match notice.severity {
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
      };
      (notice.message.clone(), Style::default().fg(color))
    }
    None if !app.status_msg.is_empty() => {
      (app.status_msg.clone(), Style::default().fg(Color::Green))
    }
    None => (hints.to_string(), Style::default().fg(Color::DarkGray)),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let text_span = Span::styled(format!("  {text}"), text_style);

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, text_span])).style(Style::default().bg(Color::Black)),
    area,
  );
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// A rectangle `width_pct` wide and `height` rows tall, centred in `area`.
pub(crate) fn centered_rect(width_pct: u16, height: u16, area: Rect) -> Rect {
  let vertical = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Fill(1),
      Constraint::Length(height.min(area.height)),
      Constraint::Fill(1),
    ])
    .split(area);

  let side = (100 - width_pct.min(100)) / 2;
  Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Percentage(side),
      Constraint::Percentage(width_pct.min(100)),
      Constraint::Percentage(side),
    ])
    .split(vertical[1])[1]
}
