use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, AppMode};

/// Key definitions: (key_label, description)
const KEYS_NORMAL: &[(&str, &str)] = &[
    ("F1", "Help  "),
    ("t", "Reset today "),
    ("m", "Reset month "),
    ("x", "Cleanup "),
    ("c", "Colors "),
    ("F10", "Quit "),
];

const KEYS_CONFIRM: &[(&str, &str)] = &[
    ("Enter", "Reset "),
    ("Esc", "Cancel "),
];

/// Draw the bottom key bar, with the status message (if any) after it
pub fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let cs = &app.color_scheme;

    // Full-width background first
    let bg_fill = " ".repeat(area.width as usize);
    f.render_widget(
        Paragraph::new(bg_fill).style(Style::default().bg(cs.footer_label_bg)),
        area,
    );

    let keys = match app.mode {
        AppMode::ConfirmReset(_) => KEYS_CONFIRM,
        _ => KEYS_NORMAL,
    };

    let mut spans: Vec<Span> = Vec::new();
    for (key, desc) in keys {
        spans.push(Span::styled(key.to_string(), cs.footer_key_style()));
        spans.push(Span::styled(desc.to_string(), cs.footer_label_style()));
    }

    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!("  {}", status),
            cs.footer_label_style().fg(cs.title),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
