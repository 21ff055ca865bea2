use std::mem;

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::debug;

use crate::error::CatalogError;
use crate::models::{parse_id, parse_year, Book};
use crate::store::{BookStore, LoadOutcome};

use super::forms::{
    BookField, BookForm, IdPrompt, SearchField, SearchForm, StatusField, StatusForm,
};
use super::helpers::{book_line, centered_rect, field_line, status_style, REQUIRED};
use super::screens::{CatalogScreen, MenuAction, RepeatPrompt};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// What fills the main area behind any popup.
enum Screen {
    Menu,
    Catalog(CatalogScreen),
}

/// Popups and prompts layered over the current screen.
enum Mode {
    Normal,
    Adding(BookForm),
    Deleting(IdPrompt),
    ChoosingSearch,
    Searching(SearchForm),
    ChangingStatus(StatusForm),
    ConfirmRepeat(RepeatPrompt),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state. Owns the catalog for the whole run; `main`
/// takes it back with [`App::into_store`] to save it after the loop ends.
pub struct App {
    store: BookStore,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: BookStore) -> Self {
        Self {
            store,
            screen: Screen::Menu,
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Show how loading the catalog went in the footer.
    pub fn report_load(&mut self, outcome: &LoadOutcome) {
        let kind = if outcome.is_error() {
            StatusKind::Error
        } else {
            StatusKind::Info
        };
        self.set_status(outcome.describe(), kind);
    }

    /// Add a startup problem that did not stop the run to the footer, after
    /// whatever is already shown there.
    pub fn report_warning(&mut self, warning: &str) {
        let text = match self.status.take() {
            Some(previous) => format!("{} {warning}", previous.text),
            None => warning.to_string(),
        };
        self.set_status(text, StatusKind::Error);
    }

    pub fn store(&self) -> &BookStore {
        &self.store
    }

    pub fn into_store(self) -> BookStore {
        self.store
    }

    /// Feed one key press through the state machine. Returns `true` once the
    /// user asked to exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Adding(form) => self.handle_add(code, form),
            Mode::Deleting(prompt) => self.handle_delete(code, prompt),
            Mode::ChoosingSearch => self.handle_choose_search(code),
            Mode::Searching(form) => self.handle_search(code, form),
            Mode::ChangingStatus(form) => self.handle_change_status(code, form),
            Mode::ConfirmRepeat(prompt) => self.handle_confirm_repeat(code, prompt),
        };

        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        if let Screen::Catalog(catalog) = &mut self.screen {
            let len = self.store.len();
            let back_to_menu = match code {
                KeyCode::Up => {
                    catalog.move_selection(-1, len);
                    false
                }
                KeyCode::Down => {
                    catalog.move_selection(1, len);
                    false
                }
                KeyCode::PageUp => {
                    catalog.move_selection(-10, len);
                    false
                }
                KeyCode::PageDown => {
                    catalog.move_selection(10, len);
                    false
                }
                KeyCode::Home => {
                    catalog.select_first();
                    false
                }
                KeyCode::End => {
                    catalog.select_last(len);
                    false
                }
                KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => true,
                _ => false,
            };
            if back_to_menu {
                self.screen = Screen::Menu;
                self.clear_status();
            }
            return Mode::Normal;
        }

        if let KeyCode::Char(ch) = code {
            if let Some(action) = MenuAction::from_choice(ch) {
                return self.start_action(action, exit);
            }
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.start_action(MenuAction::Exit, exit),
            KeyCode::Char(_) | KeyCode::Enter => {
                self.set_status(
                    "Invalid choice. Please select a valid option (1-6).",
                    StatusKind::Error,
                );
                Mode::Normal
            }
            _ => Mode::Normal,
        }
    }

    /// Open the prompt for a menu action. Actions that need existing books
    /// bounce straight back to the menu when the catalog is empty.
    fn start_action(&mut self, action: MenuAction, exit: &mut bool) -> Mode {
        debug!(?action, "menu action selected");
        if self.store.is_empty() {
            if let Some(message) = action.empty_catalog_message() {
                self.set_status(message, StatusKind::Info);
                return Mode::Normal;
            }
        }

        self.clear_status();
        match action {
            MenuAction::Add => Mode::Adding(BookForm::default()),
            MenuAction::Delete => Mode::Deleting(IdPrompt::default()),
            MenuAction::Find => Mode::ChoosingSearch,
            MenuAction::ShowAll => {
                self.screen = Screen::Catalog(CatalogScreen::default());
                Mode::Normal
            }
            MenuAction::ChangeStatus => Mode::ChangingStatus(StatusForm::default()),
            MenuAction::Exit => {
                self.set_status("Saving the catalog. Goodbye!", StatusKind::Info);
                *exit = true;
                Mode::Normal
            }
        }
    }

    fn handle_add(&mut self, code: KeyCode, mut form: BookForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_book(&mut form) {
                Ok(prompt) => return Mode::ConfirmRepeat(prompt),
                Err(err) => form.error = Some(err.to_string()),
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::Adding(form)
    }

    fn handle_delete(&mut self, code: KeyCode, mut prompt: IdPrompt) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Delete cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Enter => match prompt.parse_id().and_then(|id| self.store.remove(id)) {
                Ok(book) => {
                    let message = format!(
                        "The book with id {} (\"{}\") has been deleted.",
                        book.id, book.title
                    );
                    if self.store.is_empty() {
                        self.set_status(
                            format!("{message} No books left to delete."),
                            StatusKind::Info,
                        );
                        return Mode::Normal;
                    }
                    self.set_status(message.clone(), StatusKind::Info);
                    return Mode::ConfirmRepeat(RepeatPrompt::new(MenuAction::Delete, message));
                }
                Err(err) => prompt.error = Some(err.to_string()),
            },
            KeyCode::Char(ch) => {
                if prompt.push_char(ch) {
                    prompt.error = None;
                }
            }
            _ => {}
        }
        Mode::Deleting(prompt)
    }

    fn handle_choose_search(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Search cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Char(ch) => match SearchField::from_choice(ch) {
                Some(field) => {
                    self.clear_status();
                    Mode::Searching(SearchForm::new(field))
                }
                None => {
                    self.set_status("Invalid choice. Please enter 1, 2 or 3.", StatusKind::Error);
                    Mode::ChoosingSearch
                }
            },
            _ => Mode::ChoosingSearch,
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut form: SearchForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Search cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.run_search(&form) {
                Ok(books) => {
                    let message = match books.len() {
                        1 => "Found 1 book.".to_string(),
                        count => format!("Found {count} books."),
                    };
                    self.set_status(message.clone(), StatusKind::Info);
                    return Mode::ConfirmRepeat(
                        RepeatPrompt::new(MenuAction::Find, message).with_books(books),
                    );
                }
                Err(err) => form.error = Some(err.to_string()),
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::Searching(form)
    }

    fn handle_change_status(&mut self, code: KeyCode, mut form: StatusForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Status change cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.apply_status_change(&mut form) {
                Ok(prompt) => return Mode::ConfirmRepeat(prompt),
                Err(err) => form.error = Some(err.to_string()),
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::ChangingStatus(form)
    }

    fn handle_confirm_repeat(&mut self, code: KeyCode, prompt: RepeatPrompt) -> Mode {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let mut exit = false;
                self.start_action(prompt.action, &mut exit)
            }
            _ => Mode::Normal,
        }
    }

    fn save_new_book(&mut self, form: &mut BookForm) -> Result<RepeatPrompt, CatalogError> {
        let new_book = form.parse_inputs()?;
        let id = self.store.add(&new_book.title, &new_book.author, new_book.year)?;
        let status = self
            .store
            .get(id)
            .map(|book| book.status)
            .ok_or(CatalogError::IdNotFound(id))?;
        let message = format!(
            "Added \"{}\". The book is {status} now; its id is {id}.",
            new_book.title
        );
        self.set_status(message.clone(), StatusKind::Info);
        Ok(RepeatPrompt::new(MenuAction::Add, message))
    }

    fn run_search(&self, form: &SearchForm) -> Result<Vec<Book>, CatalogError> {
        match form.field {
            SearchField::Title => self
                .store
                .find_by_title(&form.query)
                .map(|book| vec![book.clone()]),
            SearchField::Author => self
                .store
                .find_by_author(&form.query)
                .map(|books| books.into_iter().cloned().collect()),
            SearchField::Year => parse_year(&form.query)
                .and_then(|year| self.store.find_by_year(year))
                .map(|book| vec![book.clone()]),
        }
    }

    fn apply_status_change(&mut self, form: &mut StatusForm) -> Result<RepeatPrompt, CatalogError> {
        let id = form.parse_id()?;
        let previous = match self.store.set_status(id, &form.status) {
            Ok(previous) => previous,
            Err(err) => {
                form.active = match &err {
                    CatalogError::InvalidStatus(_) => StatusField::Status,
                    _ => StatusField::Id,
                };
                return Err(err);
            }
        };
        let book = self.store.get(id).ok_or(CatalogError::IdNotFound(id))?;
        let message = format!(
            "The status of \"{}\" has been updated from {previous} to {}.",
            book.title, book.status
        );
        self.set_status(message.clone(), StatusKind::Info);
        Ok(RepeatPrompt::new(MenuAction::ChangeStatus, message))
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Menu => self.draw_menu(frame, content_area),
            Screen::Catalog(catalog) => self.draw_catalog(frame, content_area, catalog),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Adding(form) => self.draw_book_form(frame, area, form),
            Mode::Deleting(prompt) => self.draw_delete_prompt(frame, area, prompt),
            Mode::ChoosingSearch => self.draw_search_choice(frame, area),
            Mode::Searching(form) => self.draw_search_form(frame, area, form),
            Mode::ChangingStatus(form) => self.draw_status_form(frame, area, form),
            Mode::ConfirmRepeat(prompt) => self.draw_repeat_prompt(frame, area, prompt),
            Mode::Normal => {}
        }
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![Line::from("Choose an action:"), Line::from("")];
        for action in MenuAction::ALL {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}. ", action.number()), key_style),
                Span::raw(action.label()),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            match self.store.len() {
                0 => "The catalog is empty.".to_string(),
                1 => "1 book in the catalog.".to_string(),
                count => format!("{count} books in the catalog."),
            },
            Style::default().fg(Color::Gray),
        )));

        let block = Block::default()
            .title("Library Management System")
            .borders(Borders::ALL);
        let paragraph = Paragraph::new(lines).block(block);
        frame.render_widget(paragraph, area);
    }

    fn draw_catalog(&self, frame: &mut Frame, area: Rect, catalog: &CatalogScreen) {
        let block = Block::default()
            .title(format!("All books ({})", self.store.len()))
            .borders(Borders::ALL);

        match self.store.list_all() {
            Ok(books) => {
                let items: Vec<ListItem> =
                    books.map(|book| ListItem::new(book_line(book))).collect();
                let list = List::new(items)
                    .block(block)
                    .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                    .highlight_symbol("> ");
                let mut state = ListState::default().with_selected(Some(catalog.selected));
                frame.render_stateful_widget(list, area, &mut state);
            }
            Err(err) => {
                let paragraph = Paragraph::new(err.to_string()).block(block);
                frame.render_widget(paragraph, area);
            }
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (Screen::Menu, Mode::Normal) => &[("[1-6]", " Choose   "), ("[q]", " Save & exit")],
            (Screen::Catalog(_), Mode::Normal) => &[("[↑↓]", " Scroll   "), ("[Esc]", " Menu")],
            (_, Mode::ChoosingSearch) => &[("[1-3]", " Search by   "), ("[Esc]", " Cancel")],
            (_, Mode::ConfirmRepeat(_)) => &[("[y]", " Again   "), ("[any key]", " Menu")],
            (_, Mode::Deleting(_)) | (_, Mode::Searching(_)) => {
                &[("[Enter]", " Submit   "), ("[Esc]", " Cancel")]
            }
            (_, Mode::Adding(_)) | (_, Mode::ChangingStatus(_)) => &[
                ("[Enter]", " Submit   "),
                ("[Tab]", " Next field   "),
                ("[Esc]", " Cancel"),
            ],
        };

        let spans = hints
            .iter()
            .flat_map(|(key, text)| [Span::styled(*key, key_style), Span::raw(*text)])
            .collect::<Vec<_>>();
        Line::from(spans)
    }

    /// Clear `area`, draw a bordered popup and return its inner rectangle.
    fn draw_popup(&self, frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) -> Rect {
        frame.render_widget(Clear, area);
        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        let inner = block.inner(area);
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
        inner
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, form: &BookForm) {
        let popup_area = centered_rect(60, 40, area);

        let mut lines = vec![
            form.build_line(BookField::Title),
            form.build_line(BookField::Author),
            form.build_line(BookField::Year),
            Line::from(""),
        ];
        lines.push(form_footer(
            form.error.as_deref(),
            "Enter to save • Tab to switch • Esc to cancel",
        ));

        let inner = self.draw_popup(frame, popup_area, "Add Book", lines);
        frame.set_cursor_position((
            inner.x + form.cursor_column() as u16,
            inner.y + form.cursor_row(),
        ));
    }

    fn draw_delete_prompt(&self, frame: &mut Frame, area: Rect, prompt: &IdPrompt) {
        let popup_area = centered_rect(50, 30, area);
        let lines = vec![
            field_line("Book id", &prompt.id, true, REQUIRED),
            Line::from(""),
            form_footer(prompt.error.as_deref(), "Enter to delete • Esc to cancel"),
        ];
        let inner = self.draw_popup(frame, popup_area, "Delete Book", lines);
        frame.set_cursor_position((
            inner.x + ("Book id: ".len() + prompt.id.chars().count()) as u16,
            inner.y,
        ));
    }

    fn draw_search_choice(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 40, area);
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let mut lines = vec![Line::from("Find the book by:"), Line::from("")];
        let choices = [
            ('1', SearchField::Title),
            ('2', SearchField::Author),
            ('3', SearchField::Year),
        ];
        for (digit, field) in choices {
            lines.push(Line::from(vec![
                Span::styled(format!("  {digit}. "), key_style),
                Span::raw(field.label()),
            ]));
        }
        self.draw_popup(frame, popup_area, "Find Book", lines);
    }

    fn draw_search_form(&self, frame: &mut Frame, area: Rect, form: &SearchForm) {
        let popup_area = centered_rect(60, 30, area);
        let lines = vec![
            form.build_line(),
            Line::from(""),
            form_footer(form.error.as_deref(), "Enter to search • Esc to cancel"),
        ];
        let title = format!("Find by {}", form.field.label());
        let inner = self.draw_popup(frame, popup_area, &title, lines);
        let prefix = form.field.label().len() + ": ".len();
        frame.set_cursor_position((
            inner.x + (prefix + form.query.chars().count()) as u16,
            inner.y,
        ));
    }

    fn draw_status_form(&self, frame: &mut Frame, area: Rect, form: &StatusForm) {
        let popup_area = centered_rect(60, 40, area);

        let current = parse_id(&form.id)
            .ok()
            .and_then(|id| self.store.get(id));
        let current_line = match current {
            Some(book) => Line::from(vec![
                Span::raw(format!("Current status of \"{}\" is ", book.title)),
                Span::styled(book.status.to_string(), status_style(book.status)),
                Span::raw("."),
            ]),
            None => Line::from(""),
        };
        let target_hint = match form.typed_status() {
            Some(status) => Span::styled(format!("-> {status}"), status_style(status)),
            None => Span::styled("Available or Borrowed", Style::default().fg(Color::DarkGray)),
        };

        let lines = vec![
            form.build_line(StatusField::Id),
            form.build_line(StatusField::Status),
            Line::from(target_hint),
            current_line,
            form_footer(
                form.error.as_deref(),
                "Enter to update • Tab to switch • Esc to cancel",
            ),
        ];

        let inner = self.draw_popup(frame, popup_area, "Change Status", lines);
        frame.set_cursor_position((
            inner.x + form.cursor_column() as u16,
            inner.y + form.cursor_row(),
        ));
    }

    fn draw_repeat_prompt(&self, frame: &mut Frame, area: Rect, prompt: &RepeatPrompt) {
        let popup_area = centered_rect(70, 50, area);
        let mut lines = vec![Line::from(prompt.message.clone()), Line::from("")];
        lines.extend(prompt.books.iter().map(book_line));
        if !prompt.books.is_empty() {
            lines.push(Line::from(""));
        }
        if let Some(question) = prompt.action.repeat_question() {
            lines.push(Line::from(Span::styled(
                question,
                Style::default().add_modifier(Modifier::BOLD),
            )));
        }
        self.draw_popup(frame, popup_area, prompt.action.label(), lines);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

/// Last line of every form: the current error in red, or a usage hint.
fn form_footer(error: Option<&str>, hint: &'static str) -> Line<'static> {
    match error {
        Some(error) => Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(hint, Style::default().fg(Color::Gray))),
    }
}
