use ratatui::text::Line;

use crate::error::CatalogError;
use crate::models::{parse_id, parse_year, validate_author, BookId, Status};

use super::helpers::{field_line, OPTIONAL, REQUIRED};

/// Internal representation of the "add book" form fields.
#[derive(Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: String,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

/// Fields available within the book form.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Year,
}

/// Values from a book form that passed validation.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct NewBook {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: i32,
}

impl BookForm {
    /// Cycle focus forward through title, author and year.
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Author,
            BookField::Author => BookField::Year,
            BookField::Year => BookField::Title,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Year,
            BookField::Author => BookField::Title,
            BookField::Year => BookField::Author,
        };
    }

    /// Append a character to the active field. The year only takes digits and
    /// a leading minus sign.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            BookField::Title => self.title.push(ch),
            BookField::Author => self.author.push(ch),
            BookField::Year => {
                let leading_minus = ch == '-' && self.year.is_empty();
                if !ch.is_ascii_digit() && !leading_minus {
                    return false;
                }
                self.year.push(ch);
            }
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookField::Title => self.title.pop(),
            BookField::Author => self.author.pop(),
            BookField::Year => self.year.pop(),
        };
    }

    /// Validate the inputs and focus the first offending field on failure.
    pub(crate) fn parse_inputs(&mut self) -> Result<NewBook, CatalogError> {
        let author = validate_author(&self.author).inspect_err(|_| {
            self.active = BookField::Author;
        })?;
        let year = parse_year(&self.year).inspect_err(|_| {
            self.active = BookField::Year;
        })?;
        Ok(NewBook {
            title: self.title.clone(),
            author,
            year,
        })
    }

    pub(crate) fn build_line(&self, field: BookField) -> Line<'static> {
        let (name, value, placeholder) = match field {
            BookField::Title => ("Title", &self.title, OPTIONAL),
            BookField::Author => ("Author", &self.author, REQUIRED),
            BookField::Year => ("Year", &self.year, REQUIRED),
        };
        field_line(name, value, self.active == field, placeholder)
    }

    /// Column offset of the cursor inside the active line.
    pub(crate) fn cursor_column(&self) -> usize {
        match self.active {
            BookField::Title => "Title: ".len() + self.title.chars().count(),
            BookField::Author => "Author: ".len() + self.author.chars().count(),
            BookField::Year => "Year: ".len() + self.year.chars().count(),
        }
    }

    pub(crate) fn cursor_row(&self) -> u16 {
        match self.active {
            BookField::Title => 0,
            BookField::Author => 1,
            BookField::Year => 2,
        }
    }
}

/// Single numeric prompt used by the delete flow.
#[derive(Default, Clone)]
pub(crate) struct IdPrompt {
    pub(crate) id: String,
    pub(crate) error: Option<String>,
}

impl IdPrompt {
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.id.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.id.pop();
    }

    pub(crate) fn parse_id(&self) -> Result<BookId, CatalogError> {
        parse_id(&self.id)
    }
}

/// Which field a search runs against.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum SearchField {
    Title,
    Author,
    Year,
}

impl SearchField {
    /// Map the digit typed in the "find by" chooser.
    pub(crate) fn from_choice(ch: char) -> Option<Self> {
        match ch {
            '1' => Some(SearchField::Title),
            '2' => Some(SearchField::Author),
            '3' => Some(SearchField::Year),
            _ => None,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            SearchField::Title => "Title",
            SearchField::Author => "Author",
            SearchField::Year => "Year",
        }
    }
}

/// State of an in-progress search prompt.
#[derive(Clone)]
pub(crate) struct SearchForm {
    pub(crate) field: SearchField,
    pub(crate) query: String,
    pub(crate) error: Option<String>,
}

impl SearchForm {
    pub(crate) fn new(field: SearchField) -> Self {
        Self {
            field,
            query: String::new(),
            error: None,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.query.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.query.pop();
    }

    pub(crate) fn build_line(&self) -> Line<'static> {
        field_line(self.field.label(), &self.query, true, REQUIRED)
    }
}

/// Fields of the change-status form.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) enum StatusField {
    #[default]
    Id,
    Status,
}

/// Book id plus the status it should move to.
#[derive(Default, Clone)]
pub(crate) struct StatusForm {
    pub(crate) id: String,
    pub(crate) status: String,
    pub(crate) active: StatusField,
    pub(crate) error: Option<String>,
}

impl StatusForm {
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            StatusField::Id => StatusField::Status,
            StatusField::Status => StatusField::Id,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            StatusField::Id => self.id.push(ch),
            StatusField::Status => self.status.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            StatusField::Id => self.id.pop(),
            StatusField::Status => self.status.pop(),
        };
    }

    /// Parse the id, moving focus back to it when it is not a number.
    pub(crate) fn parse_id(&mut self) -> Result<BookId, CatalogError> {
        parse_id(&self.id).inspect_err(|_| {
            self.active = StatusField::Id;
        })
    }

    /// The status typed so far, if it is already a valid one. Used to show a
    /// hint while the user is typing.
    pub(crate) fn typed_status(&self) -> Option<Status> {
        self.status.parse().ok()
    }

    pub(crate) fn build_line(&self, field: StatusField) -> Line<'static> {
        match field {
            StatusField::Id => field_line("Book id", &self.id, self.active == field, REQUIRED),
            StatusField::Status => {
                field_line("New status", &self.status, self.active == field, REQUIRED)
            }
        }
    }

    pub(crate) fn cursor_column(&self) -> usize {
        match self.active {
            StatusField::Id => "Book id: ".len() + self.id.chars().count(),
            StatusField::Status => "New status: ".len() + self.status.chars().count(),
        }
    }

    pub(crate) fn cursor_row(&self) -> u16 {
        match self.active {
            StatusField::Id => 0,
            StatusField::Status => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(title: &str, author: &str, year: &str) -> BookForm {
        BookForm {
            title: title.into(),
            author: author.into(),
            year: year.into(),
            ..BookForm::default()
        }
    }

    #[test]
    fn year_field_only_accepts_digits_and_leading_minus() {
        let mut form = BookForm {
            active: BookField::Year,
            ..BookForm::default()
        };
        assert!(form.push_char('-'));
        assert!(form.push_char('4'));
        assert!(!form.push_char('-'));
        assert!(!form.push_char('x'));
        assert_eq!(form.year, "-4");
    }

    #[test]
    fn parse_inputs_focuses_invalid_author() {
        let mut form = filled("Dune", "Frank 3", "1965");
        assert!(matches!(form.parse_inputs(), Err(CatalogError::InvalidAuthor(_))));
        assert_eq!(form.active, BookField::Author);
    }

    #[test]
    fn parse_inputs_focuses_missing_year() {
        let mut form = filled("Dune", "Frank Herbert", "");
        assert!(matches!(form.parse_inputs(), Err(CatalogError::InvalidYear(_))));
        assert_eq!(form.active, BookField::Year);
    }

    #[test]
    fn parse_inputs_trims_author_but_keeps_title_verbatim() {
        let mut form = filled(" Dune ", " Frank Herbert", "1965");
        assert_eq!(
            form.parse_inputs().unwrap(),
            NewBook {
                title: " Dune ".into(),
                author: "Frank Herbert".into(),
                year: 1965,
            }
        );
    }

    #[test]
    fn empty_title_is_marked_optional() {
        let form = BookForm::default();
        assert_eq!(form.build_line(BookField::Title).spans[1].content, "<optional>");
        assert_eq!(form.build_line(BookField::Author).spans[1].content, "<required>");
        assert_eq!(form.build_line(BookField::Year).spans[1].content, "<required>");
    }

    #[test]
    fn field_focus_cycles_both_ways() {
        let mut form = BookForm::default();
        form.next_field();
        form.next_field();
        assert_eq!(form.active, BookField::Year);
        form.next_field();
        assert_eq!(form.active, BookField::Title);
        form.previous_field();
        assert_eq!(form.active, BookField::Year);
    }

    #[test]
    fn status_form_hint_only_for_valid_values() {
        let mut form = StatusForm::default();
        form.toggle_field();
        for ch in "Borrow".chars() {
            form.push_char(ch);
        }
        assert_eq!(form.typed_status(), None);
        form.push_char('e');
        form.push_char('d');
        assert_eq!(form.typed_status(), Some(Status::Borrowed));
    }

    #[test]
    fn search_choices_map_to_fields() {
        assert_eq!(SearchField::from_choice('2'), Some(SearchField::Author));
        assert_eq!(SearchField::from_choice('4'), None);
    }
}
