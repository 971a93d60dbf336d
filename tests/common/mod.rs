//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use book_api::application::service::BookService;
use book_api::domain::model::book::{Book, BookDetails};
use book_api::domain::model::id::BookId;
use book_api::domain::repository::BookRepository;
use book_api::infra::memory_store::InMemoryBookRepository;
use book_api::interface::http;

// =============================================================================
// FailingRepo — 常に失敗するリポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("disk on fire")]
pub struct FailingError;

pub struct FailingRepo;

impl BookRepository for FailingRepo {
    type Error = FailingError;

    fn find_all(&self) -> Result<Vec<Book>, Self::Error> {
        Err(FailingError)
    }

    fn find_by_id(&self, _id: BookId) -> Result<Option<Book>, Self::Error> {
        Err(FailingError)
    }

    fn insert(&self, _details: BookDetails) -> Result<Book, Self::Error> {
        Err(FailingError)
    }

    fn save(&self, _book: &Book) -> Result<Book, Self::Error> {
        Err(FailingError)
    }

    fn update(&self, _book: &Book) -> Result<Option<Book>, Self::Error> {
        Err(FailingError)
    }

    fn delete_by_id(&self, _id: BookId) -> Result<(), Self::Error> {
        Err(FailingError)
    }
}

// =============================================================================
// VanishingRepo — find直後に該当行が消えるリポジトリ
// =============================================================================

/// find_by_idで見つけた行をその場で削除する。findと書き込みの間に
/// 別リクエストのDELETEが割り込んだ状況を再現する。
pub struct VanishingRepo(pub InMemoryBookRepository);

impl BookRepository for VanishingRepo {
    type Error = <InMemoryBookRepository as BookRepository>::Error;

    fn find_all(&self) -> Result<Vec<Book>, Self::Error> {
        self.0.find_all()
    }

    fn find_by_id(&self, id: BookId) -> Result<Option<Book>, Self::Error> {
        let found = self.0.find_by_id(id)?;
        self.0.delete_by_id(id)?;
        Ok(found)
    }

    fn insert(&self, details: BookDetails) -> Result<Book, Self::Error> {
        self.0.insert(details)
    }

    fn save(&self, book: &Book) -> Result<Book, Self::Error> {
        self.0.save(book)
    }

    fn update(&self, book: &Book) -> Result<Option<Book>, Self::Error> {
        self.0.update(book)
    }

    fn delete_by_id(&self, id: BookId) -> Result<(), Self::Error> {
        self.0.delete_by_id(id)
    }
}

// =============================================================================
// Builders
// =============================================================================

pub fn memory_service() -> BookService<InMemoryBookRepository> {
    BookService::new(InMemoryBookRepository::new())
}

pub fn app() -> Router {
    http::router(Arc::new(memory_service()))
}

pub fn app_with<R: BookRepository + 'static>(repo: R) -> Router {
    http::router(Arc::new(BookService::new(repo)))
}

// =============================================================================
// Request helpers
// =============================================================================

/// Routerに1リクエスト送り、ステータスとJSONボディを返す。空ボディはNull。
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
