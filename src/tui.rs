use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info, warn};

use crate::app::App;
use crate::color_scheme::ColorSchemeId;
use crate::config::NetmeterConfig;
use crate::input::{self, Action};
use crate::traffic::MonitorHandle;
use crate::ui;

/// Input poll timeout; redraws happen at least this often
const POLL_MS: u64 = 100;

/// Run the interactive view until the user quits
pub async fn run(
    handle: &MonitorHandle,
    cfg: &mut NetmeterConfig,
    config_path: Option<&Path>,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, handle, cfg.color_scheme_id).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let app = result?;
    if app.config_dirty {
        cfg.color_scheme_id = app.color_scheme_id;
        if let Some(path) = config_path {
            match cfg.save_to(path) {
                Ok(()) => info!("saved settings to {}", path.display()),
                Err(e) => warn!("could not save settings: {:#}", e),
            }
        }
    }
    Ok(())
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    handle: &MonitorHandle,
    color_scheme_id: ColorSchemeId,
) -> Result<App> {
    let mut snapshots = handle.watch();
    let mut app = App::new(*snapshots.borrow_and_update(), color_scheme_id);
    let timeout = Duration::from_millis(POLL_MS);
    let mut sampling_stopped = false;

    loop {
        // Pick up whatever the sampling task published since the last frame
        match snapshots.has_changed() {
            Ok(true) => app.update(*snapshots.borrow_and_update()),
            Ok(false) => {}
            Err(_) if !sampling_stopped => {
                sampling_stopped = true;
                error!("traffic monitor task stopped");
                app.status = Some("Sampling stopped; see log".to_string());
            }
            Err(_) => {}
        }

        terminal.draw(|f| ui::draw(f, &app))?;

        if app.should_quit {
            return Ok(app);
        }

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // On Windows, crossterm fires Press and Release; only handle Press
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match input::handle_input(&mut app, key) {
                    Some(Action::Reset(scope)) => match handle.reset(scope).await {
                        Ok(usage) => {
                            info!("reset {}: today={} monthly={}", scope.label(), usage.today, usage.monthly);
                            app.reset_done(scope, handle.snapshot());
                        }
                        Err(e) => {
                            error!("reset {} failed: {:#}", scope.label(), e);
                            app.reset_failed(&e);
                        }
                    },
                    Some(Action::Cleanup) => match handle.cleanup().await {
                        Ok(report) => app.cleanup_done(report),
                        Err(e) => {
                            error!("cleanup failed: {:#}", e);
                            app.status = Some(format!("Cleanup failed: {}", e));
                        }
                    },
                    None => {}
                }
            }
        }
    }
}
