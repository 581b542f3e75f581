//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all catalog-server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

/// Builds the inline cover string accepted by the JSON book endpoints
pub fn inline_cover(mime: &str, data: &[u8]) -> String {
    json!({"type": mime, "data": STANDARD.encode(data)}).to_string()
}

/// JSON body for a valid book by the given author
pub fn book_json(title: &str, author_id: &str, published_on: &str, page_count: i64) -> Value {
    json!({
        "title": title,
        "author_id": author_id,
        "published_on": published_on,
        "page_count": page_count,
    })
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Home
    // ========================================================================

    /// GET /
    pub async fn get_home(&self) -> Response {
        self.client
            .get(self.url("/"))
            .send()
            .await
            .expect("Home request failed")
    }

    // ========================================================================
    // Author Endpoints
    // ========================================================================

    /// GET /v1/authors?name=
    pub async fn list_authors(&self, name: Option<&str>) -> Response {
        let mut request = self.client.get(self.url("/v1/authors"));
        if let Some(name) = name {
            request = request.query(&[("name", name)]);
        }
        request.send().await.expect("List authors request failed")
    }

    /// POST /v1/authors
    pub async fn create_author(&self, name: &str) -> Response {
        self.client
            .post(self.url("/v1/authors"))
            .json(&json!({ "name": name }))
            .send()
            .await
            .expect("Create author request failed")
    }

    /// GET /v1/authors/{id}
    pub async fn get_author(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("/v1/authors/{}", id)))
            .send()
            .await
            .expect("Get author request failed")
    }

    /// PUT /v1/authors/{id}
    pub async fn update_author(&self, id: &str, name: &str) -> Response {
        self.client
            .put(self.url(&format!("/v1/authors/{}", id)))
            .json(&json!({ "name": name }))
            .send()
            .await
            .expect("Update author request failed")
    }

    /// DELETE /v1/authors/{id}
    pub async fn delete_author(&self, id: &str) -> Response {
        self.client
            .delete(self.url(&format!("/v1/authors/{}", id)))
            .send()
            .await
            .expect("Delete author request failed")
    }

    // ========================================================================
    // Book Endpoints
    // ========================================================================

    /// GET /v1/books with the given query parameters
    pub async fn list_books(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(self.url("/v1/books"))
            .query(query)
            .send()
            .await
            .expect("List books request failed")
    }

    /// POST /v1/books
    pub async fn create_book(&self, body: &Value) -> Response {
        self.client
            .post(self.url("/v1/books"))
            .json(body)
            .send()
            .await
            .expect("Create book request failed")
    }

    /// POST /v1/books/upload
    pub async fn create_book_upload(
        &self,
        fields: &[(&str, &str)],
        cover: Option<(&str, &[u8])>,
    ) -> Response {
        self.client
            .post(self.url("/v1/books/upload"))
            .multipart(book_form(fields, cover))
            .send()
            .await
            .expect("Create book upload request failed")
    }

    /// GET /v1/books/{id}
    pub async fn get_book(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("/v1/books/{}", id)))
            .send()
            .await
            .expect("Get book request failed")
    }

    /// PUT /v1/books/{id}
    pub async fn update_book(&self, id: &str, body: &Value) -> Response {
        self.client
            .put(self.url(&format!("/v1/books/{}", id)))
            .json(body)
            .send()
            .await
            .expect("Update book request failed")
    }

    /// PUT /v1/books/{id}/upload
    pub async fn update_book_upload(
        &self,
        id: &str,
        fields: &[(&str, &str)],
        cover: Option<(&str, &[u8])>,
    ) -> Response {
        self.client
            .put(self.url(&format!("/v1/books/{}/upload", id)))
            .multipart(book_form(fields, cover))
            .send()
            .await
            .expect("Update book upload request failed")
    }

    /// DELETE /v1/books/{id}
    pub async fn delete_book(&self, id: &str) -> Response {
        self.client
            .delete(self.url(&format!("/v1/books/{}", id)))
            .send()
            .await
            .expect("Delete book request failed")
    }

    /// GET /v1/books/{id}/cover
    pub async fn get_book_cover(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("/v1/books/{}/cover", id)))
            .send()
            .await
            .expect("Get book cover request failed")
    }
}

fn book_form(fields: &[(&str, &str)], cover: Option<(&str, &[u8])>) -> Form {
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name.to_string(), value.to_string());
    }
    if let Some((mime, data)) = cover {
        let part = Part::bytes(data.to_vec())
            .file_name("cover")
            .mime_str(mime)
            .expect("Invalid test MIME type");
        form = form.part("cover", part);
    }
    form
}
