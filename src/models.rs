//! Domain models persisted to the catalog file and passed throughout the TUI.
//! These types stay light-weight data holders so the store can focus on the
//! collection rules and the UI on presentation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Identifier assigned to a book when it is added to the catalog.
pub type BookId = u32;

/// Smallest id handed out by [`crate::BookStore::add`].
pub const MIN_BOOK_ID: BookId = 1000;
/// Largest id handed out by [`crate::BookStore::add`].
pub const MAX_BOOK_ID: BookId = 9999;

/// Availability of a book. Serialized as the bare variant name so the JSON
/// file reads `"Available"` / `"Borrowed"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Available,
    Borrowed,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Available => "Available",
            Status::Borrowed => "Borrowed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = CatalogError;

    /// Accept exactly the two spellings written to disk.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "Available" => Ok(Status::Available),
            "Borrowed" => Ok(Status::Borrowed),
            other => Err(CatalogError::InvalidStatus(other.to_string())),
        }
    }
}

/// One catalog entry. Field names double as the JSON keys of the catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Random id in `[MIN_BOOK_ID, MAX_BOOK_ID]`, unique among live records.
    pub id: BookId,
    pub title: String,
    /// Letters and spaces only; see [`validate_author`].
    pub author: String,
    pub year: i32,
    pub status: Status,
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} \"{}\" by {} ({}) [{}]",
            self.id, self.title, self.author, self.year, self.status
        )
    }
}

/// Check that an author name holds only letters and spaces, with at least one
/// letter. Returns the name with surrounding whitespace removed.
pub fn validate_author(raw: &str) -> Result<String, CatalogError> {
    let trimmed = raw.trim();
    let mut letters = trimmed.chars().filter(|ch| *ch != ' ').peekable();
    if letters.peek().is_none() || !letters.all(char::is_alphabetic) {
        return Err(CatalogError::InvalidAuthor(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Parse a publication year typed by the user.
pub fn parse_year(raw: &str) -> Result<i32, CatalogError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| CatalogError::InvalidYear(raw.to_string()))
}

/// Parse a book id typed by the user.
pub fn parse_id(raw: &str) -> Result<BookId, CatalogError> {
    raw.trim()
        .parse::<BookId>()
        .map_err(|_| CatalogError::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_accepts_letters_and_spaces() {
        assert_eq!(validate_author(" Frank Herbert ").unwrap(), "Frank Herbert");
        assert_eq!(validate_author("Gabriel García Márquez").unwrap(), "Gabriel García Márquez");
    }

    #[test]
    fn author_rejects_digits_punctuation_and_blank() {
        for raw in ["R2D2", "J.R.R. Tolkien", "", "   ", "O'Brien"] {
            assert!(
                matches!(validate_author(raw), Err(CatalogError::InvalidAuthor(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn year_and_id_must_be_numeric() {
        assert_eq!(parse_year(" 1965 ").unwrap(), 1965);
        assert!(matches!(parse_year("nineteen"), Err(CatalogError::InvalidYear(_))));
        assert_eq!(parse_id("4242").unwrap(), 4242);
        assert!(matches!(parse_id("-3"), Err(CatalogError::InvalidId(_))));
    }

    #[test]
    fn status_parses_only_known_values() {
        assert_eq!("Available".parse::<Status>().unwrap(), Status::Available);
        assert_eq!("Borrowed".parse::<Status>().unwrap(), Status::Borrowed);
        assert!(matches!(
            " Borrowed\n".parse::<Status>(),
            Err(CatalogError::InvalidStatus(value)) if value == " Borrowed\n"
        ));
        assert!(matches!(
            "borrowed".parse::<Status>(),
            Err(CatalogError::InvalidStatus(value)) if value == "borrowed"
        ));
        assert!("Lost".parse::<Status>().is_err());
    }

    #[test]
    fn book_display_includes_every_field() {
        let book = Book {
            id: 1234,
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            year: 1965,
            status: Status::Borrowed,
        };
        assert_eq!(book.to_string(), "#1234 \"Dune\" by Frank Herbert (1965) [Borrowed]");
    }
}
