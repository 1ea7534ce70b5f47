use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::logs::{NO_LOGS_PLACEHOLDER, NO_MORE_LOGS};

/// Drops control bytes that would corrupt the terminal, keeping ESC for SGR.
pub(crate) fn sanitize_log_text(raw: &str) -> String {
    raw.chars()
        .filter(|ch| {
            !matches!(
                ch,
                '\r' | '\u{0000}'..='\u{0008}'
                    | '\u{000B}'
                    | '\u{000C}'
                    | '\u{000E}'..='\u{001A}'
                    | '\u{001C}'..='\u{001F}'
                    | '\u{007F}'
            )
        })
        .collect()
}

/// Styles one buffered line for the page pane.
pub(crate) fn log_line(raw: &str) -> Line<'static> {
    if raw == NO_MORE_LOGS {
        return Line::from(Span::styled(
            raw.to_owned(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    }
    if raw == NO_LOGS_PLACEHOLDER {
        return Line::from(Span::styled(
            raw.to_owned(),
            Style::default().fg(Color::Yellow),
        ));
    }
    ansi_line(&sanitize_log_text(raw), Style::default())
}

/// Converts SGR colour sequences into styled spans; other CSI sequences are dropped.
pub(crate) fn ansi_line(raw: &str, base: Style) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut style = base;
    let mut text = String::new();
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\u{1b}' || chars.peek() != Some(&'[') {
            text.push(ch);
            continue;
        }
        chars.next();
        if !text.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut text), style));
        }
        let mut params = String::new();
        for next in chars.by_ref() {
            if ('@'..='~').contains(&next) {
                if next == 'm' {
                    style = apply_sgr(style, &params, base);
                }
                break;
            }
            params.push(next);
        }
    }
    if !text.is_empty() {
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}

fn apply_sgr(current: Style, params: &str, base: Style) -> Style {
    let codes = if params.is_empty() { "0" } else { params };
    codes
        .split(';')
        .filter_map(|code| code.parse::<u8>().ok())
        .fold(current, |style, code| match code {
            0 => base,
            1 => style.add_modifier(Modifier::BOLD),
            2 => style.add_modifier(Modifier::DIM),
            3 => style.add_modifier(Modifier::ITALIC),
            4 => style.add_modifier(Modifier::UNDERLINED),
            22 => style.remove_modifier(Modifier::BOLD | Modifier::DIM),
            23 => style.remove_modifier(Modifier::ITALIC),
            24 => style.remove_modifier(Modifier::UNDERLINED),
            30..=37 => style.fg(ansi_color(code - 30, false)),
            39 => style.fg(base.fg.unwrap_or(Color::Reset)),
            90..=97 => style.fg(ansi_color(code - 90, true)),
            _ => style,
        })
}

fn ansi_color(index: u8, bright: bool) -> Color {
    match (index, bright) {
        (0, false) => Color::Black,
        (1, false) => Color::Red,
        (2, false) => Color::Green,
        (3, false) => Color::Yellow,
        (4, false) => Color::Blue,
        (5, false) => Color::Magenta,
        (6, false) => Color::Cyan,
        (7, false) => Color::Gray,
        (0, true) => Color::DarkGray,
        (1, true) => Color::LightRed,
        (2, true) => Color::LightGreen,
        (3, true) => Color::LightYellow,
        (4, true) => Color::LightBlue,
        (5, true) => Color::LightMagenta,
        (6, true) => Color::LightCyan,
        _ => Color::White,
    }
}
