// Terminal UI module using ratatui

mod app;
mod dashboard;
mod widgets;

pub use app::{Action, App};
pub use dashboard::Dashboard;
pub(crate) use widgets::{display_key, display_value};
