use crossterm::event::KeyCode;

use crate::analytics::{chart, compute_trend_with, ChartSeries, TrendPolicy, Trends};
use crate::cache::CacheState;
use crate::models::{AnalysisRecord, RecommendationCategory};

/// Work the dashboard loop must do on the app's behalf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Refresh,
}

/// Application state for the TUI dashboard
pub struct App {
    /// Should the application quit?
    pub should_quit: bool,
    /// Show help overlay
    pub show_help: bool,
    /// Selected row in the history list
    pub selected_index: usize,
    /// Recommendation category shown in the detail pane
    pub tab: RecommendationCategory,
    /// Latest cache snapshot
    pub state: CacheState,
    policy: TrendPolicy,
    date_format: String,
}

impl App {
    pub fn new(policy: TrendPolicy, date_format: String) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            selected_index: 0,
            tab: RecommendationCategory::Activity,
            state: CacheState::default(),
            policy,
            date_format,
        }
    }

    /// Take a fresh snapshot, keeping the same record selected when it still exists
    pub fn sync(&mut self, state: CacheState) {
        let selected_id = self.selected().map(|record| record.id);
        self.state = state;

        let last_index = self.state.history.len().saturating_sub(1);
        self.selected_index = selected_id
            .and_then(|id| self.state.history.position(id))
            .unwrap_or(self.selected_index)
            .min(last_index);
    }

    /// Show the loading indicator until the next sync
    pub fn mark_loading(&mut self) {
        self.state.loading = true;
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn selected(&self) -> Option<&AnalysisRecord> {
        self.state.history.get(self.selected_index)
    }

    pub fn selected_trends(&self) -> Trends {
        self.selected()
            .map(|record| compute_trend_with(record, &self.state.history, &self.policy))
            .unwrap_or_default()
    }

    pub fn selected_chart(&self) -> Option<ChartSeries> {
        self.selected().and_then(chart::build)
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyCode) -> Option<Action> {
        // Help overlay takes precedence
        if self.show_help {
            if matches!(key, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return None;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }

            KeyCode::Char('?') => {
                self.show_help = true;
            }

            KeyCode::Char('r') | KeyCode::Char('R') => {
                return Some(Action::Refresh);
            }

            KeyCode::Tab | KeyCode::Right => {
                self.tab = self.tab.next();
            }

            KeyCode::BackTab | KeyCode::Left => {
                self.tab = self.tab.previous();
            }

            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }

            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_index + 1 < self.state.history.len() {
                    self.selected_index += 1;
                }
            }

            KeyCode::Home | KeyCode::Char('g') => {
                self.selected_index = 0;
            }

            KeyCode::End | KeyCode::Char('G') => {
                self.selected_index = self.state.history.len().saturating_sub(1);
            }

            _ => {}
        }

        None
    }
}
