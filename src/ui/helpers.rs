use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{Book, Status};

pub(crate) const REQUIRED: &str = "<required>";
pub(crate) const OPTIONAL: &str = "<optional>";

/// Render a `Name: value` form line, highlighting the focused field and
/// showing `placeholder` while it is empty.
pub(crate) fn field_line(
    name: &str,
    value: &str,
    is_active: bool,
    placeholder: &str,
) -> Line<'static> {
    let display = if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{name}: ")),
        Span::styled(display, style),
    ])
}

/// Colour used for a status badge.
pub(crate) fn status_style(status: Status) -> Style {
    match status {
        Status::Available => Style::default().fg(Color::Green),
        Status::Borrowed => Style::default().fg(Color::Magenta),
    }
}

/// One-line summary of a book for lists and search results.
pub(crate) fn book_line(book: &Book) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:>4}  ", book.id),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("{} - {} ({})  ", book.title, book.author, book.year)),
        Span::styled(book.status.to_string(), status_style(book.status)),
    ])
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}
