use std::collections::HashSet;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{info, warn};

use crate::error::CatalogError;
use crate::models::{validate_author, Book};

/// Indentation used for the catalog file so diffs between runs stay readable.
const INDENT: &[u8] = b"    ";

/// What happened when the catalog file was read. None of these outcomes are
/// fatal: every variant except `Loaded` means the run starts empty.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The file parsed; carries the number of records read.
    Loaded(usize),
    /// No file yet. This is the normal first-run state.
    Missing,
    /// The file exists but is not an array of valid, uniquely numbered book
    /// objects.
    Malformed(CatalogError),
    /// The file exists but could not be read.
    Unreadable(io::Error),
}

impl LoadOutcome {
    /// Message shown to the user once the catalog is loaded.
    pub fn describe(&self) -> String {
        match self {
            LoadOutcome::Loaded(1) => "Loaded 1 book.".to_string(),
            LoadOutcome::Loaded(count) => format!("Loaded {count} books."),
            LoadOutcome::Missing => {
                "No previous data found, starting with an empty catalog.".to_string()
            }
            LoadOutcome::Malformed(err) => {
                format!("Error reading the book data ({err}); starting with an empty catalog.")
            }
            LoadOutcome::Unreadable(err) => {
                format!("Could not open the book data ({err}); starting with an empty catalog.")
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadOutcome::Malformed(_) | LoadOutcome::Unreadable(_))
    }
}

/// Read and parse the catalog file. The books are only returned when the whole
/// document parsed; a partial read never leaks into the store.
pub fn read_books(path: &Path) -> (Vec<Book>, LoadOutcome) {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "catalog file not found, starting empty");
            return (Vec::new(), LoadOutcome::Missing);
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "catalog file unreadable");
            return (Vec::new(), LoadOutcome::Unreadable(err));
        }
    };

    match decode(&raw) {
        Ok(books) => {
            info!(path = %path.display(), count = books.len(), "catalog loaded");
            let count = books.len();
            (books, LoadOutcome::Loaded(count))
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "catalog file malformed");
            (Vec::new(), LoadOutcome::Malformed(err))
        }
    }
}

/// Serialize the books and overwrite the catalog file, creating its parent
/// directory when needed.
pub fn write_books(path: &Path, books: &[Book]) -> Result<(), CatalogError> {
    let payload = encode(books)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CatalogError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, payload).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), count = books.len(), "catalog saved");
    Ok(())
}

/// Turn a JSON document into books. Anything other than an array of complete
/// book objects is rejected, as are repeated ids and author names that could
/// not have been entered through [`validate_author`].
pub fn decode(raw: &str) -> Result<Vec<Book>, CatalogError> {
    let books: Vec<Book> = serde_json::from_str(raw).map_err(CatalogError::Parse)?;

    let mut seen = HashSet::with_capacity(books.len());
    for book in &books {
        if !seen.insert(book.id) {
            return Err(CatalogError::DuplicateId(book.id));
        }
        validate_author(&book.author)?;
    }
    Ok(books)
}

/// Render books as the indented JSON array stored on disk.
pub fn encode(books: &[Book]) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    books.serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(out)
}
