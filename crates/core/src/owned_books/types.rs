//! Owned-book records as exchanged with the collection server.

use serde::{Deserialize, Serialize};

/// A book confirmed by the server as part of the user's collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnedBook {
    /// Server-assigned record id.
    #[serde(rename = "_id")]
    pub server_id: String,
    /// Catalog identifier the book was saved from.
    #[serde(rename = "bookId")]
    pub book_id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Owner {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
}

/// Payload of the append mutation: the catalog fields of a search result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub book_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_book_from_graphql_json() {
        let json = r#"{
            "_id": "650a1b",
            "bookId": "B1hSG45JCX4C",
            "title": "Dune",
            "authors": ["Frank Herbert"],
            "description": null,
            "image": "http://thumb",
            "category": {"_id": "c1", "name": "Fiction"},
            "owner": {"_id": "u1", "username": "paul"}
        }"#;

        let book: OwnedBook = serde_json::from_str(json).unwrap();
        assert_eq!(book.server_id, "650a1b");
        assert_eq!(book.book_id, "B1hSG45JCX4C");
        assert!(book.description.is_none());
        assert_eq!(book.category.unwrap().name, "Fiction");
        assert_eq!(book.owner.unwrap().username, "paul");
    }

    #[test]
    fn test_book_input_serializes_camel_case() {
        let input = BookInput {
            book_id: "abc".to_string(),
            title: "Dune".to_string(),
            authors: vec!["Frank Herbert".to_string()],
            description: None,
            image: Some("http://thumb".to_string()),
        };

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["bookId"], "abc");
        assert_eq!(json["image"], "http://thumb");
        assert!(json["description"].is_null());
        assert!(json.get("book_id").is_none());
    }
}
