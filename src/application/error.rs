use crate::domain::model::id::BookId;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("book not found: {0}")]
    BookNotFound(BookId),

    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
