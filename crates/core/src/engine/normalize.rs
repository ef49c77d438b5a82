//! Raw catalog entries to search results.

use std::collections::HashSet;

use tracing::warn;

use super::types::SearchResult;
use crate::catalog::RawEntry;

/// Author list used when the catalog has none.
pub const NO_AUTHOR_PLACEHOLDER: &str = "No author to display";

/// Normalize a single entry. Entries without an id or title are unusable.
pub fn normalize_entry(raw: RawEntry) -> Option<SearchResult> {
    let image_url = non_blank(raw.thumbnail_url().map(str::to_string));

    let id = raw.id.trim().to_string();
    let title = non_blank(raw.title)?;
    if id.is_empty() {
        return None;
    }

    let authors: Vec<String> = raw
        .authors
        .unwrap_or_default()
        .into_iter()
        .filter(|a| !a.trim().is_empty())
        .collect();
    let authors = if authors.is_empty() {
        vec![NO_AUTHOR_PLACEHOLDER.to_string()]
    } else {
        authors
    };

    Some(SearchResult {
        id,
        title,
        authors,
        description: non_blank(raw.description),
        image_url,
        description_expanded: false,
    })
}

/// Normalize a whole response, keeping catalog order.
///
/// Ids must be unique within a result list; a repeated id keeps its first
/// occurrence.
pub fn normalize_entries(raw: Vec<RawEntry>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    let mut results = Vec::with_capacity(raw.len());

    for entry in raw {
        let raw_id = entry.id.clone();
        let Some(result) = normalize_entry(entry) else {
            warn!("Dropping catalog entry '{}' without id or title", raw_id);
            continue;
        };
        if !seen.insert(result.id.clone()) {
            warn!("Dropping duplicate catalog entry '{}'", result.id);
            continue;
        }
        results.push(result);
    }

    results
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ImageLinks;

    fn raw(id: &str, title: Option<&str>) -> RawEntry {
        RawEntry {
            id: id.to_string(),
            title: title.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_authors_get_placeholder() {
        let result = normalize_entry(raw("a", Some("Dune"))).unwrap();
        assert_eq!(result.authors, vec![NO_AUTHOR_PLACEHOLDER.to_string()]);
    }

    #[test]
    fn test_empty_authors_get_placeholder() {
        let mut entry = raw("a", Some("Dune"));
        entry.authors = Some(vec![]);
        let result = normalize_entry(entry).unwrap();
        assert_eq!(result.authors, vec![NO_AUTHOR_PLACEHOLDER.to_string()]);
    }

    #[test]
    fn test_blank_author_names_get_placeholder() {
        let mut entry = raw("a", Some("Dune"));
        entry.authors = Some(vec!["".into(), "  ".into()]);
        let result = normalize_entry(entry).unwrap();
        assert_eq!(result.authors, vec![NO_AUTHOR_PLACEHOLDER.to_string()]);

        let mut mixed = raw("b", Some("Dune"));
        mixed.authors = Some(vec!["".into(), "Frank Herbert".into()]);
        let result = normalize_entry(mixed).unwrap();
        assert_eq!(result.authors, vec!["Frank Herbert"]);
    }

    #[test]
    fn test_authors_keep_order() {
        let mut entry = raw("a", Some("Good Omens"));
        entry.authors = Some(vec!["Terry Pratchett".into(), "Neil Gaiman".into()]);
        let result = normalize_entry(entry).unwrap();
        assert_eq!(result.authors, vec!["Terry Pratchett", "Neil Gaiman"]);
    }

    #[test]
    fn test_thumbnail_becomes_image_url() {
        let mut entry = raw("a", Some("Dune"));
        entry.image_links = Some(ImageLinks {
            small_thumbnail: None,
            thumbnail: Some("http://thumb".to_string()),
        });
        let result = normalize_entry(entry).unwrap();
        assert_eq!(result.image_url.as_deref(), Some("http://thumb"));
        assert!(!result.description_expanded);
    }

    #[test]
    fn test_empty_image_and_description_are_none() {
        let mut entry = raw("a", Some("Dune"));
        entry.description = Some("  ".to_string());
        entry.image_links = Some(ImageLinks {
            small_thumbnail: None,
            thumbnail: Some(String::new()),
        });
        let result = normalize_entry(entry).unwrap();
        assert!(result.description.is_none());
        assert!(result.image_url.is_none());
    }

    #[test]
    fn test_entries_without_title_or_id_are_dropped() {
        let results = normalize_entries(vec![
            raw("a", None),
            raw("", Some("No id")),
            raw("b", Some("Kept")),
        ]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "b");
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let results = normalize_entries(vec![
            raw("a", Some("First")),
            raw("b", Some("Other")),
            raw("a", Some("Second")),
        ]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "First");
        assert_eq!(results[1].id, "b");
    }
}
