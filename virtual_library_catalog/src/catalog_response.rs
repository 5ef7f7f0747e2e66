use std::time::UNIX_EPOCH;

use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use crate::api::{Book, ReadingStatus, MISSING_ISBN};

const ISBN_13: &str = "ISBN_13";

/// Body of the catalog `volumes` search endpoint
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CatalogResponse {
    /// Omitted by the catalog when nothing matched
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
    pub image_links: Option<ImageLinks>,
    pub categories: Option<Vec<String>>,
    pub page_count: Option<i64>,
    pub info_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub identifier_type: String,
    pub identifier: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
}

impl CatalogResponse {
    /// Maps every item into a book, dropping the ones that are incomplete
    pub fn into_books(self) -> Vec<Book> {
        let item_count = self.items.len();
        let books: Vec<Book> = self
            .items
            .into_iter()
            .filter_map(|item| item.volume_info.into_book())
            .collect();
        if books.len() < item_count {
            tracing::debug!(
                "Dropped {} of {} catalog items with missing fields",
                item_count - books.len(),
                item_count
            );
        }
        books
    }
}

impl VolumeInfo {
    /// Builds a freshly fetched book from catalog data
    /// Returns None when title, authors, description, publisher, a parsable info link
    /// or a non-negative page count is missing
    pub fn into_book(self) -> Option<Book> {
        let title = self.title.filter(|title| !title.trim().is_empty())?;
        let authors = self.authors.filter(|authors| !authors.is_empty())?;
        let description = self.description?;
        let publisher = self.publisher?;
        let purchase_link = Url::parse(self.info_link.as_deref()?).ok()?;
        let total_pages = u32::try_from(self.page_count?).ok()?;

        let isbn = self
            .industry_identifiers
            .unwrap_or_default()
            .into_iter()
            .find(|id| id.identifier_type == ISBN_13)
            .map(|id| id.identifier)
            .unwrap_or_else(|| MISSING_ISBN.to_string());

        let cover_image_url = self
            .image_links
            .and_then(|links| links.thumbnail)
            .and_then(|thumbnail| secure_url(&thumbnail));

        Some(Book {
            id: Uuid::new_v4(),
            title,
            author: authors.join(", "),
            description,
            publisher,
            isbn,
            cover_image_url,
            genres: self.categories.unwrap_or_default(),
            purchase_link,
            total_pages,
            pages_read: 0,
            reading_status: ReadingStatus::ToRead,
            rating: None,
            notes: None,
            time_spent_reading: 0,
            checked_out_by: Default::default(),
            added_at: std::time::SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or_default(),
        })
    }
}

/// Parses the url, upgrading a plain `http://` link to `https://`
fn secure_url(link: &str) -> Option<Url> {
    let link = match link.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => link.to_string(),
    };
    Url::parse(&link).ok()
}

#[cfg(test)]
mod catalog_response_tests {
    use serde_json::json;

    use super::*;

    fn complete_volume_info() -> serde_json::Value {
        json!({
            "title": "Dune",
            "authors": ["Frank Herbert"],
            "description": "Spice and sand",
            "publisher": "Chilton Books",
            "industryIdentifiers": [
                {"type": "ISBN_10", "identifier": "0441013597"},
                {"type": "ISBN_13", "identifier": "9780441013593"}
            ],
            "imageLinks": {"thumbnail": "http://books.google.com/books/content?id=B1hSG45JCX4C"},
            "categories": ["Fiction", "Science Fiction"],
            "pageCount": 896,
            "infoLink": "https://books.google.com/books?id=B1hSG45JCX4C"
        })
    }

    fn volume_info(value: serde_json::Value) -> VolumeInfo {
        serde_json::from_value(value).unwrap()
    }

    fn without(field: &str) -> VolumeInfo {
        let mut value = complete_volume_info();
        value.as_object_mut().unwrap().remove(field);
        volume_info(value)
    }

    #[test]
    fn test_complete_item_is_mapped() {
        let book = volume_info(complete_volume_info()).into_book().unwrap();

        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.description, "Spice and sand");
        assert_eq!(book.publisher, "Chilton Books");
        assert_eq!(book.isbn, "9780441013593");
        assert_eq!(book.genres, vec!["Fiction", "Science Fiction"]);
        assert_eq!(book.total_pages, 896);
        assert_eq!(book.pages_read, 0);
        assert_eq!(book.reading_status, ReadingStatus::ToRead);
        assert_eq!(book.rating, None);
        assert_eq!(book.notes, None);
        assert_eq!(book.time_spent_reading, 0);
        assert!(book.checked_out_by.is_empty());
        assert_eq!(
            book.purchase_link.as_str(),
            "https://books.google.com/books?id=B1hSG45JCX4C"
        );
    }

    #[test]
    fn test_items_with_missing_required_fields_are_dropped() {
        for field in [
            "title",
            "authors",
            "description",
            "publisher",
            "pageCount",
            "infoLink",
        ] {
            assert!(without(field).into_book().is_none(), "{} is required", field);
        }
    }

    #[test]
    fn test_unusable_values_are_dropped() {
        let mut value = complete_volume_info();
        value["authors"] = json!([]);
        assert!(volume_info(value).into_book().is_none());

        let mut value = complete_volume_info();
        value["pageCount"] = json!(-1);
        assert!(volume_info(value).into_book().is_none());

        let mut value = complete_volume_info();
        value["infoLink"] = json!("not a link");
        assert!(volume_info(value).into_book().is_none());
    }

    #[test]
    fn test_optional_fields_have_defaults() {
        let book = without("categories").into_book().unwrap();
        assert!(book.genres.is_empty());

        let book = without("imageLinks").into_book().unwrap();
        assert_eq!(book.cover_image_url, None);

        let book = without("industryIdentifiers").into_book().unwrap();
        assert_eq!(book.isbn, MISSING_ISBN);
    }

    #[test]
    fn test_authors_are_joined_in_order() {
        let mut value = complete_volume_info();
        value["authors"] = json!(["A", "B"]);
        assert_eq!(volume_info(value).into_book().unwrap().author, "A, B");
    }

    #[test]
    fn test_isbn_prefers_isbn_13_and_never_falls_back_to_other_types() {
        let mut value = complete_volume_info();
        value["industryIdentifiers"] = json!([
            {"type": "ISBN_10", "identifier": "X"},
            {"type": "ISBN_13", "identifier": "Y"}
        ]);
        assert_eq!(volume_info(value).into_book().unwrap().isbn, "Y");

        let mut value = complete_volume_info();
        value["industryIdentifiers"] = json!([
            {"type": "ISBN_10", "identifier": "X"},
            {"type": "OTHER", "identifier": "Z"}
        ]);
        assert_eq!(volume_info(value).into_book().unwrap().isbn, "N/A");
    }

    #[test]
    fn test_cover_is_upgraded_to_https() {
        let mut value = complete_volume_info();
        value["imageLinks"] = json!({"thumbnail": "http://example.com/x.jpg"});
        let cover = volume_info(value).into_book().unwrap().cover_image_url.unwrap();
        assert_eq!(cover.scheme(), "https");
        assert_eq!(cover.as_str(), "https://example.com/x.jpg");

        let mut value = complete_volume_info();
        value["imageLinks"] = json!({"thumbnail": "https://example.com/y.jpg"});
        let cover = volume_info(value).into_book().unwrap().cover_image_url.unwrap();
        assert_eq!(cover.as_str(), "https://example.com/y.jpg");
    }

    #[test]
    fn test_response_filters_incomplete_items_and_keeps_order() {
        let mut incomplete = complete_volume_info();
        incomplete.as_object_mut().unwrap().remove("pageCount");
        let mut second = complete_volume_info();
        second["title"] = json!("Dune Messiah");

        let response: CatalogResponse = serde_json::from_value(json!({
            "items": [
                {"volumeInfo": complete_volume_info()},
                {"volumeInfo": incomplete},
                {"volumeInfo": second}
            ]
        }))
        .unwrap();

        let titles: Vec<String> = response
            .into_books()
            .into_iter()
            .map(|book| book.title)
            .collect();
        assert_eq!(titles, vec!["Dune", "Dune Messiah"]);
    }

    #[test]
    fn test_missing_items_field_is_empty_response() {
        let response: CatalogResponse =
            serde_json::from_value(json!({"kind": "books#volumes", "totalItems": 0})).unwrap();
        assert!(response.into_books().is_empty());
    }
}
