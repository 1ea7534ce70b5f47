use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::border;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Tabs};
use ratatui::Frame;

use crate::logs::NumKeys;

pub(super) fn render_tabs(
    frame: &mut Frame<'_>,
    area: Rect,
    names: &[&str],
    active_index: usize,
    selection: &str,
) {
    let titles = tab_labels(names)
        .into_iter()
        .enumerate()
        .map(|(idx, label)| {
            let style = if idx == active_index {
                Style::default().fg(Color::Magenta)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(Span::styled(label, style))
        })
        .collect::<Vec<Line>>();

    let title = format!(" TAILVIEW · {selection} ");
    let tabs = Tabs::new(titles)
        .select(active_index)
        .block(panel_block(Some(title.as_str()), true, Color::Magenta))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

/// Sources reachable by digit carry the digit as a prefix.
pub(super) fn tab_labels(names: &[&str]) -> Vec<String> {
    let keys = NumKeys::default();
    names
        .iter()
        .enumerate()
        .map(|(idx, name)| match keys.key(idx + 1) {
            Some(KeyCode::Char(digit)) if names.len() > 1 => format!("{digit}:{name}"),
            _ => (*name).to_owned(),
        })
        .collect()
}

pub(super) fn panel_block<'a>(
    title: Option<&'a str>,
    show_version: bool,
    border_color: Color,
) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(border_color));
    if let Some(title) = title {
        block = block.title_top(
            Line::from(Span::styled(
                title.to_owned(),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ))
            .left_aligned(),
        );
    }
    if show_version {
        let version = format!(" v{} ", env!("CARGO_PKG_VERSION"));
        block = block.title_bottom(
            Line::from(Span::styled(
                version,
                Style::default().fg(Color::LightMagenta),
            ))
            .right_aligned(),
        );
    }
    block
}
