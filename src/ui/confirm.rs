use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::App;
use crate::traffic::ResetScope;
use crate::ui::centered_rect;
use crate::ui::format::format_bytes;

/// Draw the reset confirmation popup (t / m)
pub fn draw_confirm_reset(f: &mut Frame, app: &App, scope: ResetScope) {
    let cs = &app.color_scheme;
    let area = centered_rect(45, 30, f.area());
    f.render_widget(Clear, area);

    let (question, amount) = match scope {
        ResetScope::Today => ("Reset today's traffic?", app.snapshot.usage.today),
        ResetScope::Month => ("Reset this month's traffic?", app.snapshot.usage.monthly),
    };

    let lines = vec![
        Line::from(Span::styled(
            format!(" {} ", question),
            Style::default().fg(cs.popup_title).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" {} will be discarded.", format_bytes(amount)),
            Style::default().fg(cs.popup_warning),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " y/Enter Reset  Esc Cancel ",
            Style::default().fg(cs.dim),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Reset ")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(cs.popup_warning)),
        )
        .style(cs.popup_style());

    f.render_widget(paragraph, area);
}
