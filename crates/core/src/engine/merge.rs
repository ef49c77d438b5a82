//! Merging server-confirmed books into the local mirror.

use crate::owned_books::OwnedBook;

/// Add `entry` to `mirror`, keyed by catalog id.
///
/// An existing entry with the same `book_id` is replaced in place, so the
/// mirror never holds two records for one catalog id and keeps its order.
pub fn merge_owned(mut mirror: Vec<OwnedBook>, entry: OwnedBook) -> Vec<OwnedBook> {
    match mirror.iter_mut().find(|b| b.book_id == entry.book_id) {
        Some(existing) => *existing = entry,
        None => mirror.push(entry),
    }
    mirror
}

/// Whether the mirror holds a record for `book_id`.
pub fn contains_book(mirror: &[OwnedBook], book_id: &str) -> bool {
    mirror.iter().any(|b| b.book_id == book_id)
}
