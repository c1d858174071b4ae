//! Add/edit modal.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};
use roster_core::{employee::Field, store::RecordStore};

use super::centered_rect;
use crate::app::{App, FormFocus};

/// Width reserved for field labels.
const LABEL_WIDTH: usize = 14;

pub fn draw<S: RecordStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  // Two lines per field (value, error), a gap, the buttons, and borders.
  let height = (Field::ALL.len() * 2 + 4) as u16;
  let rect = centered_rect(60, height, area);

  let form = &app.form;
  let draft = form.draft();
  let mut lines: Vec<Line> = Vec::with_capacity(height as usize);

  for field in Field::ALL {
    let focused = app.form_focus == FormFocus::Input(field);
    let value = field.get(&draft.fields);

    let label_style = if focused {
      Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::DarkGray)
    };
    let value_text = if focused { format!("{value}_") } else { value.to_string() };

    lines.push(Line::from(vec![
      Span::styled(format!("{:<LABEL_WIDTH$}", field.label()), label_style),
      Span::styled(value_text, Style::default().fg(Color::White)),
    ]));

    lines.push(match form.error(field) {
      Some(message) => Line::from(vec![
        Span::raw(" ".repeat(LABEL_WIDTH)),
        Span::styled(message.to_string(), Style::default().fg(Color::Red)),
      ]),
      None => Line::default(),
    });
  }

  lines.push(Line::default());
  lines.push(Line::from(vec![
    button(form.submit_label(), app.form_focus == FormFocus::Submit),
    Span::raw("  "),
    button("Cancel", app.form_focus == FormFocus::Cancel),
  ]));

  let block = Block::default()
    .title(format!(" {} ", form.title()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));

  f.render_widget(Clear, rect);
  f.render_widget(Paragraph::new(lines).block(block), rect);
}

fn button(label: &str, focused: bool) -> Span<'static> {
  let style = if focused {
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Cyan)
  };
  Span::styled(format!("[ {label} ]"), style)
}
