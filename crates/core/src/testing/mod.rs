//! Testing utilities and mock implementations.
//!
//! Mocks for every collaborator the engine talks to, so sessions can be
//! driven end to end without a catalog or a collection server.
//!
//! # Example
//!
//! ```rust,ignore
//! use shelfsync_core::testing::{fixtures, MockAuth, MockCatalog, MockOwnedBooksStore};
//!
//! let catalog = MockCatalog::new();
//! catalog.set_results("dune", fixtures::dune_entries(7)).await;
//! let store = MockOwnedBooksStore::new();
//! let auth = MockAuth::logged_in("jwt");
//! ```

mod mock_auth;
mod mock_catalog;
mod mock_store;

pub use mock_auth::MockAuth;
pub use mock_catalog::MockCatalog;
pub use mock_store::MockOwnedBooksStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{ImageLinks, RawEntry};
    use crate::owned_books::OwnedBook;

    /// A catalog entry with one author and no description or image.
    pub fn raw_entry(id: &str, title: &str) -> RawEntry {
        RawEntry {
            id: id.to_string(),
            title: Some(title.to_string()),
            authors: Some(vec!["Frank Herbert".to_string()]),
            description: None,
            image_links: None,
        }
    }

    /// `count` fully populated entries for a "dune" search, ids `dune-1`..
    pub fn dune_entries(count: usize) -> Vec<RawEntry> {
        (1..=count)
            .map(|i| RawEntry {
                id: format!("dune-{}", i),
                title: Some(format!("Dune, part {}", i)),
                authors: Some(vec!["Frank Herbert".to_string()]),
                description: Some(format!("Volume {} of the Dune saga.", i)),
                image_links: Some(ImageLinks {
                    small_thumbnail: None,
                    thumbnail: Some(format!("http://books.example/dune-{}.jpg", i)),
                }),
            })
            .collect()
    }

    /// A server record for `book_id`.
    pub fn owned_book(book_id: &str, title: &str) -> OwnedBook {
        OwnedBook {
            server_id: format!("srv-{}", book_id),
            book_id: book_id.to_string(),
            title: title.to_string(),
            authors: vec!["Frank Herbert".to_string()],
            description: None,
            image: None,
            condition: None,
            category: None,
            owner: None,
        }
    }
}
