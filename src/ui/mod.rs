//! Ratatui front-end: a numbered menu whose entries open popups for adding,
//! deleting, finding and updating books.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
