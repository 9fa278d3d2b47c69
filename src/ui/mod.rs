pub mod confirm;
pub mod footer;
pub mod format;
pub mod help;
pub mod stats;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::{App, AppMode};

/// Render the complete UI
pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // traffic panel
            Constraint::Length(1), // footer (key bar)
        ])
        .split(size);

    stats::draw_stats(f, app, chunks[0]);
    footer::draw_footer(f, app, chunks[1]);

    // Overlay popups
    match app.mode {
        AppMode::Help => help::draw_help(f, app),
        AppMode::ConfirmReset(scope) => confirm::draw_confirm_reset(f, app, scope),
        AppMode::Normal => {}
    }
}

/// Create a centered rectangle with percentage width/height
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
