//! Engine-facing records.

use serde::{Deserialize, Serialize};

use crate::owned_books::BookInput;

/// A normalized catalog search result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// Catalog identifier, unique within one result list.
    pub id: String,
    pub title: String,
    /// Never empty; a placeholder stands in for unknown authors.
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description_expanded: bool,
}

impl SearchResult {
    /// Payload for the owned-books append mutation.
    pub fn to_book_input(&self) -> BookInput {
        BookInput {
            book_id: self.id.clone(),
            title: self.title.clone(),
            authors: self.authors.clone(),
            description: self.description.clone(),
            image: self.image_url.clone(),
        }
    }

    /// Description text as shown on a card.
    ///
    /// Collapsed cards show no preview text; only an expanded card shows
    /// the description.
    pub fn rendered_description(&self) -> &str {
        match (&self.description, self.description_expanded) {
            (Some(description), true) => description,
            _ => "",
        }
    }
}

/// Save affordance state for one result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveState {
    /// Already in the collection.
    Saved,
    /// A save request is in flight.
    Saving,
    /// Can be saved.
    Available,
    /// Strict policy without login: no save affordance.
    LoginRequired,
}

impl SaveState {
    /// Button label, or `None` when the button is hidden.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            SaveState::Saved => Some("Book is Saved"),
            SaveState::Saving => Some("Saving..."),
            SaveState::Available => Some("Save Book"),
            SaveState::LoginRequired => None,
        }
    }

    /// Whether the save control accepts clicks.
    pub fn is_enabled(&self) -> bool {
        matches!(self, SaveState::Available)
    }
}

/// One card of the visible page.
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    /// Position in the full result list.
    pub index: usize,
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub description: String,
    pub image_url: Option<String>,
    pub description_expanded: bool,
    pub save_state: SaveState,
}

/// Handle for an issued search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    /// Trimmed query text sent to the catalog.
    pub query: String,
}

/// What a search call did to the result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query; nothing issued, nothing changed.
    Ignored,
    /// The result list was replaced.
    Applied { generation: u64, count: usize },
    /// A newer search was issued before this one finished; response dropped.
    Superseded { generation: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(description: Option<&str>) -> SearchResult {
        SearchResult {
            id: "id".to_string(),
            title: "Title".to_string(),
            authors: vec!["A".to_string()],
            description: description.map(str::to_string),
            image_url: None,
            description_expanded: false,
        }
    }

    #[test]
    fn test_collapsed_description_is_empty() {
        let r = result(Some("Long text"));
        assert_eq!(r.rendered_description(), "");
    }

    #[test]
    fn test_expanded_description_is_full() {
        let mut r = result(Some("Long text"));
        r.description_expanded = true;
        assert_eq!(r.rendered_description(), "Long text");

        let mut none = result(None);
        none.description_expanded = true;
        assert_eq!(none.rendered_description(), "");
    }

    #[test]
    fn test_book_input_carries_catalog_fields() {
        let mut r = result(Some("d"));
        r.image_url = Some("http://img".to_string());
        let input = r.to_book_input();
        assert_eq!(input.book_id, "id");
        assert_eq!(input.authors, vec!["A".to_string()]);
        assert_eq!(input.description.as_deref(), Some("d"));
        assert_eq!(input.image.as_deref(), Some("http://img"));
    }

    #[test]
    fn test_save_state_labels() {
        assert_eq!(SaveState::Saved.label(), Some("Book is Saved"));
        assert_eq!(SaveState::Available.label(), Some("Save Book"));
        assert_eq!(SaveState::LoginRequired.label(), None);
        assert!(SaveState::Available.is_enabled());
        assert!(!SaveState::Saved.is_enabled());
        assert!(!SaveState::Saving.is_enabled());
    }
}
