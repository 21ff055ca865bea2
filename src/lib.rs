//! Core library surface for the book catalog TUI.
//!
//! The binary only glues these pieces together: configuration and logging at
//! startup, the [`BookStore`] for the records, the [`App`] event loop, and
//! [`session::save_on_exit`] to write the catalog back.
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod store;
pub mod ui;

pub use config::Config;
pub use error::CatalogError;

/// The domain types other layers manipulate.
pub use models::{Book, BookId, Status};

/// The in-memory catalog and the result of reading its file.
pub use store::{BookStore, LoadOutcome};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
