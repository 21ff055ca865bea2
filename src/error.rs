use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::BookId;

/// Everything the catalog can report back to its caller. Validation and
/// lookup failures are recoverable by asking the user again; only the
/// persistence variants carry an underlying source.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Author name must contain only letters and spaces, got {0:?}.")]
    InvalidAuthor(String),
    #[error("Year must be a number, got {0:?}.")]
    InvalidYear(String),
    #[error("Book id must be a number, got {0:?}.")]
    InvalidId(String),
    #[error("Invalid status {0:?}. Please enter 'Available' or 'Borrowed'.")]
    InvalidStatus(String),
    #[error("No book found with id {0}.")]
    IdNotFound(BookId),
    #[error("No book found with title {0:?}.")]
    TitleNotFound(String),
    #[error("No book found by author {0:?}.")]
    AuthorNotFound(String),
    #[error("No book found from year {0}.")]
    YearNotFound(i32),
    #[error("There are no books in the catalog.")]
    Empty,
    #[error("Every book id between 1000 and 9999 is already taken.")]
    IdSpaceExhausted,
    #[error("Book id {0} appears more than once.")]
    DuplicateId(BookId),
    #[error("{0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to write catalog file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize catalog")]
    Serialize(#[from] serde_json::Error),
}

impl CatalogError {
    /// True for the "nothing matched" family, which the UI reports and then
    /// re-prompts for.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::IdNotFound(_)
                | CatalogError::TitleNotFound(_)
                | CatalogError::AuthorNotFound(_)
                | CatalogError::YearNotFound(_)
        )
    }
}
