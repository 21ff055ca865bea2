use std::path::Path;

use rand::Rng;
use tracing::info;

use crate::error::CatalogError;
use crate::models::{validate_author, Book, BookId, Status, MAX_BOOK_ID, MIN_BOOK_ID};

use super::persistence::{read_books, write_books, LoadOutcome};

/// Number of distinct ids `add` can hand out.
const ID_SPACE: usize = (MAX_BOOK_ID - MIN_BOOK_ID + 1) as usize;

/// In-memory catalog. Records keep their insertion order, which is also the
/// order they are listed and written back to disk. Every lookup is a linear
/// scan.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BookStore {
    books: Vec<Book>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store around records that were obtained elsewhere.
    pub fn from_books(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// Replace the collection with the contents of `path`. Whatever was in the
    /// store before is dropped even when the file turns out to be missing or
    /// broken, so the caller always ends up with a consistent catalog.
    pub fn load(&mut self, path: &Path) -> LoadOutcome {
        let (books, outcome) = read_books(path);
        self.books = books;
        outcome
    }

    /// Write the whole collection to `path`, replacing its previous content.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        write_books(path, &self.books)
    }

    /// Add a book using the thread-local random generator for its id.
    pub fn add(&mut self, title: &str, author: &str, year: i32) -> Result<BookId, CatalogError> {
        self.add_with_rng(&mut rand::thread_rng(), title, author, year)
    }

    /// Add a book drawing its id from `rng`. The id is re-drawn while it clashes
    /// with a live record.
    pub fn add_with_rng<R: Rng>(
        &mut self,
        rng: &mut R,
        title: &str,
        author: &str,
        year: i32,
    ) -> Result<BookId, CatalogError> {
        let author = validate_author(author)?;
        if self.books.len() >= ID_SPACE {
            return Err(CatalogError::IdSpaceExhausted);
        }

        let id = loop {
            let candidate = rng.gen_range(MIN_BOOK_ID..=MAX_BOOK_ID);
            if self.get(candidate).is_none() {
                break candidate;
            }
        };

        self.books.push(Book {
            id,
            title: title.to_string(),
            author,
            year,
            status: Status::Available,
        });
        info!(id, title, year, "book added");
        Ok(id)
    }

    /// Delete the record with `id`, handing it back to the caller.
    pub fn remove(&mut self, id: BookId) -> Result<Book, CatalogError> {
        let index = self
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or(CatalogError::IdNotFound(id))?;
        let removed = self.books.remove(index);
        info!(book = %removed, "book removed");
        Ok(removed)
    }

    pub fn find_by_title(&self, title: &str) -> Result<&Book, CatalogError> {
        self.books
            .iter()
            .find(|book| book.title == title)
            .ok_or_else(|| CatalogError::TitleNotFound(title.to_string()))
    }

    /// Every record written by `author`, in insertion order.
    pub fn find_by_author(&self, author: &str) -> Result<Vec<&Book>, CatalogError> {
        let author = validate_author(author)?;
        let matches: Vec<&Book> = self
            .books
            .iter()
            .filter(|book| book.author == author)
            .collect();
        if matches.is_empty() {
            Err(CatalogError::AuthorNotFound(author))
        } else {
            Ok(matches)
        }
    }

    pub fn find_by_year(&self, year: i32) -> Result<&Book, CatalogError> {
        self.books
            .iter()
            .find(|book| book.year == year)
            .ok_or(CatalogError::YearNotFound(year))
    }

    /// Lazily walk every record in insertion order. An empty catalog is
    /// reported as [`CatalogError::Empty`] instead of an empty iterator.
    pub fn list_all(&self) -> Result<impl Iterator<Item = &Book> + '_, CatalogError> {
        if self.books.is_empty() {
            Err(CatalogError::Empty)
        } else {
            Ok(self.books.iter())
        }
    }

    /// Change the status of the record with `id`, returning the status it had
    /// before. The value is validated before the record is touched.
    pub fn set_status(&mut self, id: BookId, new_status: &str) -> Result<Status, CatalogError> {
        let status: Status = new_status.parse()?;
        let book = self
            .books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(CatalogError::IdNotFound(id))?;
        let previous = std::mem::replace(&mut book.status, status);
        info!(id, from = %previous, to = %status, "status changed");
        Ok(previous)
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn book(id: BookId, title: &str, author: &str, year: i32) -> Book {
        Book {
            id,
            title: title.into(),
            author: author.into(),
            year,
            status: Status::Available,
        }
    }

    #[test]
    fn add_assigns_available_status_and_bounded_id() {
        let mut store = BookStore::new();
        let id = store.add("Dune", "Frank Herbert", 1965).unwrap();
        assert!((MIN_BOOK_ID..=MAX_BOOK_ID).contains(&id));
        let added = store.get(id).unwrap();
        assert_eq!(added.status, Status::Available);
        assert_eq!(added.title, "Dune");
        assert_eq!(added.year, 1965);
    }

    #[test]
    fn add_rejects_invalid_author_without_touching_store() {
        let mut store = BookStore::new();
        let err = store.add("Neuromancer", "W1lliam Gibson", 1984).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidAuthor(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn add_never_reuses_a_live_id() {
        let mut store = BookStore::new();
        let mut rng = seeded();
        for n in 0..500 {
            store.add_with_rng(&mut rng, &format!("Book {n}"), "Anon", 2000).unwrap();
        }
        let mut ids: Vec<BookId> = store.books().iter().map(|b| b.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn add_fails_once_every_id_is_taken() {
        let books = (MIN_BOOK_ID..=MAX_BOOK_ID)
            .map(|id| book(id, "Filler", "Anon", 1))
            .collect();
        let mut store = BookStore::from_books(books);
        let err = store.add_with_rng(&mut seeded(), "One more", "Anon", 1).unwrap_err();
        assert!(matches!(err, CatalogError::IdSpaceExhausted));
        assert_eq!(store.len(), ID_SPACE);
    }

    #[test]
    fn remove_missing_id_leaves_store_unchanged() {
        let mut empty = BookStore::new();
        assert!(matches!(empty.remove(1234), Err(CatalogError::IdNotFound(1234))));
        assert!(empty.is_empty());

        let mut store = BookStore::from_books(vec![book(1000, "A", "Ann", 1)]);
        let before = store.clone();
        assert!(store.remove(4321).unwrap_err().is_not_found());
        assert_eq!(store, before);
    }

    #[test]
    fn remove_returns_the_deleted_record_and_keeps_order() {
        let mut store = BookStore::from_books(vec![
            book(1000, "A", "Ann", 1),
            book(2000, "B", "Bob", 2),
            book(3000, "C", "Cid", 3),
        ]);
        assert_eq!(store.remove(2000).unwrap().title, "B");
        let ids: Vec<BookId> = store.books().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1000, 3000]);
    }

    #[test]
    fn find_by_title_and_year_return_first_match() {
        let store = BookStore::from_books(vec![
            book(1000, "Dune", "Frank Herbert", 1965),
            book(2000, "Dune", "Someone Else", 1965),
        ]);
        assert_eq!(store.find_by_title("Dune").unwrap().id, 1000);
        assert_eq!(store.find_by_year(1965).unwrap().id, 1000);
        assert!(matches!(store.find_by_title("dune"), Err(CatalogError::TitleNotFound(_))));
        assert!(matches!(store.find_by_year(1966), Err(CatalogError::YearNotFound(1966))));
    }

    #[test]
    fn find_by_author_returns_every_match() {
        let store = BookStore::from_books(vec![
            book(1000, "Dune", "Frank Herbert", 1965),
            book(2000, "Neuromancer", "William Gibson", 1984),
            book(3000, "Dune Messiah", "Frank Herbert", 1969),
        ]);
        let found: Vec<BookId> = store
            .find_by_author("Frank Herbert")
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(found, vec![1000, 3000]);
        assert!(matches!(
            store.find_by_author("Ursula Le Guin"),
            Err(CatalogError::AuthorNotFound(_))
        ));
        assert!(matches!(
            store.find_by_author("H. G. Wells"),
            Err(CatalogError::InvalidAuthor(_))
        ));
    }

    #[test]
    fn list_all_signals_empty_catalog() {
        assert!(matches!(BookStore::new().list_all(), Err(CatalogError::Empty)));
        let store = BookStore::from_books(vec![book(1000, "A", "Ann", 1), book(2000, "B", "Bob", 2)]);
        let titles: Vec<&str> = store.list_all().unwrap().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn set_status_round_trips_and_rejects_unknown_values() {
        let mut store = BookStore::from_books(vec![book(1000, "A", "Ann", 1)]);
        assert_eq!(store.set_status(1000, "Borrowed").unwrap(), Status::Available);
        assert_eq!(store.get(1000).unwrap().status, Status::Borrowed);
        assert_eq!(store.set_status(1000, "Available").unwrap(), Status::Borrowed);
        assert_eq!(store.get(1000).unwrap().status, Status::Available);

        let before = store.clone();
        assert!(matches!(
            store.set_status(1000, "Lost"),
            Err(CatalogError::InvalidStatus(_))
        ));
        assert!(matches!(
            store.set_status(1000, " Borrowed\n"),
            Err(CatalogError::InvalidStatus(_))
        ));
        assert_eq!(store, before);
        assert!(matches!(
            store.set_status(9999, "Borrowed"),
            Err(CatalogError::IdNotFound(9999))
        ));
    }
}
