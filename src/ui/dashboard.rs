use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::app::{Action, App};
use super::widgets;
use crate::cache::HistoryCache;
use crate::config::Config;

/// Dashboard manages the TUI lifecycle
pub struct Dashboard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
    cache: Arc<HistoryCache>,
    pending: Option<JoinHandle<()>>,
}

impl Dashboard {
    /// Create new dashboard instance
    pub fn new(cache: Arc<HistoryCache>, config: &Config) -> Result<Self> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;

        let app = App::new(config.trends.policy(), config.ui.date_format.clone());

        Ok(Self {
            terminal,
            app,
            cache,
            pending: None,
        })
    }

    /// Run the dashboard event loop
    pub async fn run(&mut self) -> Result<()> {
        let cache = Arc::clone(&self.cache);
        self.start_load(async move { cache.activate().await });

        loop {
            self.collect_finished_load().await?;

            let app = &self.app;
            self.terminal.draw(|f| ui(f, app))?;

            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == event::KeyEventKind::Press {
                        if let Some(Action::Refresh) = self.app.handle_key(key.code) {
                            let cache = Arc::clone(&self.cache);
                            self.start_load(async move {
                                cache.refresh().await;
                            });
                        }
                    }
                }
            }

            if self.app.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Run a cache load in the background so input stays responsive
    fn start_load<F>(&mut self, load: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        if self.pending.is_some() {
            tracing::debug!("Load already running, ignoring request");
            return;
        }

        self.app.mark_loading();
        self.pending = Some(tokio::spawn(load));
    }

    async fn collect_finished_load(&mut self) -> Result<()> {
        let finished = self
            .pending
            .as_ref()
            .map(|handle| handle.is_finished())
            .unwrap_or(false);

        if finished {
            if let Some(handle) = self.pending.take() {
                handle.await.context("Cache load task failed")?;
            }
            self.app.sync(self.cache.snapshot().await);
        }

        Ok(())
    }

    /// Cleanup terminal on exit
    pub fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to restore terminal")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;

        Ok(())
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        let _ = self.cleanup();
    }
}

/// Render the UI
fn ui(f: &mut Frame, app: &App) {
    let size = f.area();

    // Main layout: top area + status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(size);

    // History list (left) + selected analysis (right)
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(main_chunks[0]);

    // Detail (top) + chart (middle) + recommendations (bottom)
    let detail_panels = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(30),
            Constraint::Percentage(35),
        ])
        .split(columns[1]);

    let selected = app.selected();
    let trends = app.selected_trends();
    let chart = app.selected_chart();

    widgets::render_history_list(
        columns[0],
        f.buffer_mut(),
        &app.state.history,
        app.selected_index,
        app.date_format(),
    );

    widgets::render_record_detail(
        detail_panels[0],
        f.buffer_mut(),
        selected,
        &trends,
        app.date_format(),
    );

    widgets::render_metrics_chart(detail_panels[1], f.buffer_mut(), chart.as_ref());

    widgets::render_recommendations(detail_panels[2], f.buffer_mut(), selected, app.tab);

    // Render status bar
    widgets::render_status_bar(main_chunks[1], f.buffer_mut(), &app.state);

    // Render help overlay if active
    if app.show_help {
        let help_area = centered_rect(50, 50, size);
        widgets::render_help_overlay(help_area, f.buffer_mut());
    }
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
