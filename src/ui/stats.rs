use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::ui::format::{format_bytes, format_speed};

/// Draw the traffic panel:
///
///   Up  [||||||            ]  12.3 KB/s
///   Down[|||||||||||||     ] 301.9 KB/s
///
///   Since reset   ↑ 4.1 MB   ↓ 88.0 MB
///   Today         92.1 MB
///   This month    1.2 GB     (avg 63.4 MB/day)
pub fn draw_stats(f: &mut Frame, app: &App, area: Rect) {
    let cs = &app.color_scheme;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" Traffic {} ", app.snapshot.date.format("%Y-%m-%d")),
            cs.title_style(),
        ))
        .border_style(Style::default().fg(cs.dim))
        .style(Style::default().bg(cs.bg));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // upload bar
            Constraint::Length(1), // download bar
            Constraint::Length(1),
            Constraint::Min(3), // totals
        ])
        .split(inner);

    // Auto-scale the bars to the recent peak
    let scale = app.peak_speed();
    draw_speed_bar(f, app, rows[0], "Up  ", app.snapshot.upload_speed, scale, cs.upload);
    draw_speed_bar(f, app, rows[1], "Down", app.snapshot.download_speed, scale, cs.download);
    draw_totals(f, app, rows[3]);
}

/// "Up  [||||||         ]  12.3 KB/s"
fn draw_speed_bar(
    f: &mut Frame,
    app: &App,
    area: Rect,
    prefix: &str,
    speed: f64,
    scale: f64,
    color: Color,
) {
    let cs = &app.color_scheme;
    let suffix = format!("{:>12}", format_speed(speed));

    let bracket_len = 2;
    let available = (area.width as usize).saturating_sub(prefix.len() + suffix.len() + bracket_len + 1);

    let frac = if scale > 0.0 { (speed / scale).clamp(0.0, 1.0) } else { 0.0 };
    let filled = ((frac * available as f64) as usize).min(available);
    let empty = available.saturating_sub(filled);

    let line = Line::from(vec![
        Span::styled(prefix.to_string(), cs.label_style().add_modifier(Modifier::BOLD)),
        Span::styled("[", cs.label_style()),
        Span::styled("|".repeat(filled), Style::default().fg(color)),
        Span::styled(" ".repeat(empty), Style::default().fg(cs.dim)),
        Span::styled("]", cs.label_style()),
        Span::styled(suffix, cs.value_style()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_totals(f: &mut Frame, app: &App, area: Rect) {
    let cs = &app.color_scheme;
    let snap = &app.snapshot;
    let label = |text: &str| Span::styled(format!("{:<14}", text), cs.label_style());

    let lines = vec![
        Line::from(vec![
            label("Since reset"),
            Span::styled("↑ ", Style::default().fg(cs.upload)),
            Span::styled(format!("{:<12}", format_bytes(snap.total_upload as f64)), cs.value_style()),
            Span::styled("↓ ", Style::default().fg(cs.download)),
            Span::styled(format_bytes(snap.total_download as f64), cs.value_style()),
        ]),
        Line::from(vec![
            label("Today"),
            Span::styled(format_bytes(snap.usage.today), cs.value_style()),
        ]),
        Line::from(vec![
            label("This month"),
            Span::styled(format!("{:<12}", format_bytes(snap.usage.monthly)), cs.value_style()),
            Span::styled(
                format!("(avg {}/day)", format_bytes(snap.usage.daily_average(snap.date))),
                Style::default().fg(cs.dim),
            ),
        ]),
    ];
    f.render_widget(Paragraph::new(lines), area);
}
