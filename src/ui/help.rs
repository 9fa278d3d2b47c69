use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::App;
use crate::ui::centered_rect;

/// Draw the Help popup (F1)
pub fn draw_help(f: &mut Frame, app: &App) {
    let cs = &app.color_scheme;
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD).fg(cs.popup_title),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            " netmeter - Wi-Fi and cellular traffic meter ",
            cs.title_style(),
        )),
        Line::from(""),
        section(" Display "),
        Line::from("  Up/Down     Live throughput of monitored interfaces"),
        Line::from("  Since reset Bytes counted since the last reset"),
        Line::from("  Today       Bytes recorded for today"),
        Line::from("  This month  Sum of this month's daily records"),
        Line::from(""),
        section(" Keys "),
        Line::from("  F1/h/?      Show this help"),
        Line::from("  t           Reset today's traffic"),
        Line::from("  m           Reset this month's traffic"),
        Line::from("  x           Drop records past the retention window"),
        Line::from("  c           Cycle color scheme"),
        Line::from("  Esc         Clear status message"),
        Line::from("  F10/q       Quit netmeter"),
        Line::from("  Ctrl+C      Quit"),
        Line::from(""),
        Line::from(Span::styled(
            " Press any key to close ",
            Style::default().fg(cs.dim),
        )),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(cs.popup_border)),
        )
        .style(cs.popup_style())
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
