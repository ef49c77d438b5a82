//! Plain-text rendering of engine state.

use std::fmt::Write;

use shelfsync_core::{OwnedBook, ResultView};

/// Render the visible page with the heading and page indicator.
pub fn page(heading: &str, cards: &[ResultView], current: usize, total: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading);

    for (position, card) in cards.iter().enumerate() {
        let _ = writeln!(out, "{}", self::card(position + 1, card));
    }

    if total > 0 {
        let _ = write!(out, "Page {} of {}", current, total);
    }
    out.trim_end().to_string()
}

/// Render one card. `position` is its 1-based place on the page.
pub fn card(position: usize, card: &ResultView) -> String {
    let mut out = format!("[{}] {}\n    by {}", position, card.title, card.authors.join(", "));

    if let Some(image) = &card.image_url {
        let _ = write!(out, "\n    cover: {}", image);
    }
    if card.description_expanded && !card.description.is_empty() {
        let _ = write!(out, "\n    {}", card.description);
    }
    if let Some(label) = card.save_state.label() {
        let marker = if card.save_state.is_enabled() { "" } else { " (disabled)" };
        let _ = write!(out, "\n    [{}]{}", label, marker);
    }
    out
}

/// Render the owned collection.
pub fn owned(books: &[OwnedBook]) -> String {
    if books.is_empty() {
        return "Your collection is empty".to_string();
    }
    let mut out = format!("Your collection ({} books):", books.len());
    for book in books {
        let _ = write!(out, "\n  {} by {}", book.title, book.authors.join(", "));
    }
    out
}
