//! HTTP interface for book-api
//!
//! axum Router <-> application::BookService
//!
//! GET/POST /books, GET/PUT/DELETE /books/:id, GET /health

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::application::error::AppError;
use crate::application::service::BookService;
use crate::domain::model::book::{Book, BookDetails};
use crate::domain::model::id::BookId;
use crate::domain::repository::BookRepository;

type SharedService<R> = State<Arc<BookService<R>>>;

// =============================================================================
// Router
// =============================================================================

/// 全エンドポイントを束ねたRouterを返す。
pub fn router<R: BookRepository + 'static>(service: Arc<BookService<R>>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/books", get(list_books::<R>).post(create_book::<R>))
        .route(
            "/books/:id",
            get(get_book::<R>)
                .put(update_book::<R>)
                .delete(delete_book::<R>),
        )
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// =============================================================================
// Handlers
// =============================================================================

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_books<R: BookRepository + 'static>(
    State(svc): SharedService<R>,
) -> Result<Json<Vec<Book>>, AppError> {
    blocking(svc, |svc| svc.list()).await.map(Json)
}

async fn create_book<R: BookRepository + 'static>(
    State(svc): SharedService<R>,
    Json(details): Json<BookDetails>,
) -> Result<Json<Book>, AppError> {
    blocking(svc, move |svc| svc.create(details)).await.map(Json)
}

async fn get_book<R: BookRepository + 'static>(
    State(svc): SharedService<R>,
    Path(id): Path<BookId>,
) -> Result<Json<Book>, AppError> {
    blocking(svc, move |svc| svc.get(id))
        .await?
        .map(Json)
        .ok_or(AppError::BookNotFound(id))
}

async fn update_book<R: BookRepository + 'static>(
    State(svc): SharedService<R>,
    Path(id): Path<BookId>,
    Json(details): Json<BookDetails>,
) -> Result<Json<Book>, AppError> {
    blocking(svc, move |svc| svc.update(id, details))
        .await?
        .map(Json)
        .ok_or(AppError::BookNotFound(id))
}

async fn delete_book<R: BookRepository + 'static>(
    State(svc): SharedService<R>,
    Path(id): Path<BookId>,
) -> Result<(), AppError> {
    blocking(svc, move |svc| svc.delete(id)).await
}

/// ストア呼び出しはファイルI/Oとロックを伴うため、blockingプールで実行する。
async fn blocking<R, T, F>(svc: Arc<BookService<R>>, f: F) -> Result<T, AppError>
where
    R: BookRepository + 'static,
    T: Send + 'static,
    F: FnOnce(&BookService<R>) -> Result<T, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&svc)).await?
}

// =============================================================================
// Error mapping
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BookNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(e) => {
                tracing::error!(error = %e, "storage failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Task(e) => {
                tracing::error!(error = %e, "blocking task failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
