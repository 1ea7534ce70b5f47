use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::logs::{FlashLevel, Hint};

use super::super::diagnostics::RuntimeDiagnostics;
use super::super::host::Flash;

pub(super) fn render_footer(
    frame: &mut Frame<'_>,
    area: Rect,
    hints: &[Hint],
    flash: Option<Flash>,
    diagnostics: &RuntimeDiagnostics,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let mut spans = hint_spans(hints);
    if let Some(flash) = flash {
        let color = match flash.level {
            FlashLevel::Info => Color::Cyan,
            FlashLevel::Warn => Color::Yellow,
            FlashLevel::Error => Color::Red,
        };
        spans.push(Span::styled("  ▸ ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(flash.message, Style::default().fg(color)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), rows[0]);

    if diagnostics.enabled() {
        let line = format!(
            "diag t={}ms frames={} keys={} loads={} failed={}  {}",
            diagnostics.elapsed_ms(),
            diagnostics.frame_count(),
            diagnostics.keypress_count(),
            diagnostics.load_count(),
            diagnostics.load_failures(),
            diagnostics.last_trace().unwrap_or_default(),
        );
        let diag = Paragraph::new(line).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(diag, rows[1]);
    }
}

fn hint_spans(hints: &[Hint]) -> Vec<Span<'static>> {
    let muted = Style::default().fg(Color::DarkGray);
    let key = Style::default().fg(Color::Magenta);
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (idx, hint) in hints.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled("  ", muted));
        }
        spans.push(Span::styled(format!("<{}>", hint.key), key));
        spans.push(Span::styled(format!(" {}", hint.description), muted));
    }
    spans
}
