use crate::models::Book;

/// Entries of the numbered main menu, in display order.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum MenuAction {
    Add,
    Delete,
    Find,
    ShowAll,
    ChangeStatus,
    Exit,
}

impl MenuAction {
    pub(crate) const ALL: [MenuAction; 6] = [
        MenuAction::Add,
        MenuAction::Delete,
        MenuAction::Find,
        MenuAction::ShowAll,
        MenuAction::ChangeStatus,
        MenuAction::Exit,
    ];

    /// Map the digit typed on the menu to its action.
    pub(crate) fn from_choice(ch: char) -> Option<Self> {
        let index = ch.to_digit(10)?.checked_sub(1)? as usize;
        Self::ALL.get(index).copied()
    }

    pub(crate) fn number(self) -> usize {
        Self::ALL.iter().position(|a| *a == self).unwrap_or(0) + 1
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            MenuAction::Add => "Add books",
            MenuAction::Delete => "Delete books",
            MenuAction::Find => "Find books",
            MenuAction::ShowAll => "Show all books",
            MenuAction::ChangeStatus => "Change book status",
            MenuAction::Exit => "Exit",
        }
    }

    /// Question asked after the action succeeded, if it can be repeated.
    pub(crate) fn repeat_question(self) -> Option<&'static str> {
        match self {
            MenuAction::Add => Some("Do you want to add another book? (y/n)"),
            MenuAction::Delete => Some("Do you want to delete another book? (y/n)"),
            MenuAction::Find => Some("Do you want to search for another book? (y/n)"),
            MenuAction::ChangeStatus => {
                Some("Do you want to change the status of another book? (y/n)")
            }
            MenuAction::ShowAll | MenuAction::Exit => None,
        }
    }

    /// Message used when the action needs books and the catalog has none.
    pub(crate) fn empty_catalog_message(self) -> Option<&'static str> {
        match self {
            MenuAction::Delete => {
                Some("There are no books to delete now. Please add a book first.")
            }
            MenuAction::Find => Some("There are no books to find now. Please add a book first."),
            MenuAction::ChangeStatus => {
                Some("There are no books to update now. Please add a book first.")
            }
            MenuAction::ShowAll => Some("There are no books in the catalog yet."),
            MenuAction::Add | MenuAction::Exit => None,
        }
    }
}

/// Outcome of a finished action plus the "again?" question that follows it.
#[derive(Clone)]
pub(crate) struct RepeatPrompt {
    pub(crate) action: MenuAction,
    pub(crate) message: String,
    /// Books to show above the question, e.g. search hits.
    pub(crate) books: Vec<Book>,
}

impl RepeatPrompt {
    pub(crate) fn new<S: Into<String>>(action: MenuAction, message: S) -> Self {
        Self {
            action,
            message: message.into(),
            books: Vec::new(),
        }
    }

    pub(crate) fn with_books(mut self, books: Vec<Book>) -> Self {
        self.books = books;
        self
    }
}

/// Scroll state for the "show all books" listing.
#[derive(Default)]
pub(crate) struct CatalogScreen {
    pub(crate) selected: usize,
}

impl CatalogScreen {
    pub(crate) fn move_selection(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let max_index = len as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, max_index) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }
}
