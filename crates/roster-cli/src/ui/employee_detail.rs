//! Read-only detail modal.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};
use roster_core::detail::DetailViewer;

use super::centered_rect;

pub fn draw(f: &mut Frame, area: Rect, viewer: &DetailViewer) {
  let rows = viewer.rows();
  let height = (rows.len() + 4) as u16;
  let rect = centered_rect(50, height, area);

  let mut lines: Vec<Line> = rows
    .into_iter()
    .map(|(label, value)| {
      Line::from(vec![
        Span::styled(
          format!("{label:<14}"),
          Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
        ),
        Span::styled(value.to_string(), Style::default().fg(Color::White)),
      ])
    })
    .collect();

  lines.push(Line::default());
  lines.push(Line::from(Span::styled(
    "[ OK ]",
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  )));

  let block = Block::default()
    .title(" Employee Details ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));

  f.render_widget(Clear, rect);
  f.render_widget(Paragraph::new(lines).block(block), rect);
}
