use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;

use crate::logs::LogPage;

use super::super::terminal_text::log_line;
use super::header::panel_block;

pub(super) fn render_page(frame: &mut Frame<'_>, area: Rect, page: Option<&LogPage>) {
    let Some(page) = page else {
        let empty = Paragraph::new(Line::from(Span::styled(
            "no containers",
            Style::default().fg(Color::DarkGray),
        )))
        .block(panel_block(None, false, Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let output_height = area.height.saturating_sub(2) as usize;
    page.set_viewport(output_height);
    let view = page.view();

    let title = format!(" {} ", page.name());
    let mut panel = panel_block(Some(title.as_str()), false, Color::DarkGray);
    if view.follow {
        panel = panel.title_bottom(
            Line::from(Span::styled(" follow ", Style::default().fg(Color::Green)))
                .right_aligned(),
        );
    }
    let lines = view
        .lines
        .iter()
        .map(|line| log_line(line))
        .collect::<Vec<Line>>();
    let logs = Paragraph::new(lines)
        .block(panel)
        .scroll((view.offset.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(logs, area);

    let mut scrollbar_state = ScrollbarState::new(view.max_offset.max(1))
        .viewport_content_length(output_height.max(1))
        .position(view.offset.min(view.max_offset));
    frame.render_stateful_widget(
        Scrollbar::default().orientation(ScrollbarOrientation::VerticalRight),
        area,
        &mut scrollbar_state,
    );
}
