//! Employee table: the main pane, with search bar and paginator.

use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use roster_core::{employee::Field, store::RecordStore};

use crate::app::{App, Mode};

/// Render the table, search bar, and paginator into `area`.
pub fn draw<S: RecordStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // search
      Constraint::Min(0),    // table
      Constraint::Length(1), // paginator
    ])
    .split(area);

  draw_search(f, rows[0], app);
  draw_rows(f, rows[1], app);
  draw_paginator(f, rows[2], app);
}

fn draw_search<S: RecordStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let active = app.mode == Mode::Search;
  let text = if active {
    format!(" Search Employee: {}_", app.listing.query())
  } else if app.listing.query().is_empty() {
    " Search Employee: (press /)".to_string()
  } else {
    format!(" Search Employee: {}", app.listing.query())
  };
  let style = if active {
    Style::default().fg(Color::Yellow)
  } else {
    Style::default().fg(Color::DarkGray)
  };
  f.render_widget(Paragraph::new(text).style(style), area);
}

fn draw_rows<S: RecordStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let visible = app.listing.visible_rows();
  let block = Block::default()
    .title(format!(" Employees ({}) ", app.listing.snapshot().len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if app.listing.filtered_count() == 0 {
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new(Line::from(vec![Span::styled(
        "No Data Available",
        Style::default().fg(Color::DarkGray),
      )]))
      .alignment(Alignment::Center),
      inner,
    );
    return;
  }

  let header = Row::new(Field::ALL.iter().map(|f| Cell::from(f.label()))).style(
    Style::default()
      .fg(Color::White)
      .bg(Color::DarkGray)
      .add_modifier(Modifier::BOLD),
  );

  let body: Vec<Row> = visible
    .iter()
    .map(|e| Row::new(Field::ALL.iter().map(|f| Cell::from(e.get(*f).to_string()))))
    .collect();

  let table = Table::new(body, [Constraint::Fill(1); 6])
    .header(header)
    .block(block)
    .row_highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    );

  let mut state = TableState::default().with_selected(Some(app.cursor));
  f.render_stateful_widget(table, area, &mut state);
}

fn draw_paginator<S: RecordStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let size = app.listing.page_size().rows();
  let text = format!(
    "Rows per page: {size}   {}   page {}/{} ",
    range_label(app.listing.page(), size, app.listing.filtered_count()),
    app.listing.page() + 1,
    app.listing.page_count().max(1),
  );
  f.render_widget(
    Paragraph::new(text)
      .alignment(Alignment::Right)
      .style(Style::default().fg(Color::Gray)),
    area,
  );
}

/// `"start–end of total"` for a 1-based display of the current page.
fn range_label(page: usize, size: usize, total: usize) -> String {
  let from = page * size;
  if from >= total {
    return format!("0–0 of {total}");
  }
  let to = (from + size).min(total);
  format!("{}–{to} of {total}", from + 1)
}
