use crate::domain::model::book::{Book, BookDetails};
use crate::domain::model::id::BookId;
use crate::domain::repository::BookRepository;

use super::error::AppError;

/// Bookに対するユースケース。
/// 各操作はリポジトリへの独立した呼び出しで、トランザクション境界は持たない。
pub struct BookService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// 全件を返す。ページングなし。
    pub fn list(&self) -> Result<Vec<Book>, AppError> {
        let books = self.repo.find_all().map_err(storage)?;
        tracing::debug!(count = books.len(), "listed books");
        Ok(books)
    }

    /// 新規作成。IDはストアが採番する。
    pub fn create(&self, details: BookDetails) -> Result<Book, AppError> {
        let book = self.repo.insert(details).map_err(storage)?;
        tracing::info!(id = %book.id(), "created book");
        Ok(book)
    }

    /// IDで取得する。見つからなければ `None`。
    pub fn get(&self, id: BookId) -> Result<Option<Book>, AppError> {
        self.repo.find_by_id(id).map_err(storage)
    }

    /// title/authorを置き換える。存在しないIDなら `None` を返し、作成はしない。
    /// find と書き込みの間に削除された場合も `None`。
    pub fn update(&self, id: BookId, details: BookDetails) -> Result<Option<Book>, AppError> {
        let Some(existing) = self.repo.find_by_id(id).map_err(storage)? else {
            tracing::debug!(%id, "update skipped: book not found");
            return Ok(None);
        };
        let updated = self
            .repo
            .update(&existing.with_details(details))
            .map_err(storage)?;
        match &updated {
            Some(_) => tracing::info!(%id, "updated book"),
            None => tracing::debug!(%id, "update skipped: book deleted concurrently"),
        }
        Ok(updated)
    }

    /// 削除する。存在しないIDでも成功扱い。
    pub fn delete(&self, id: BookId) -> Result<(), AppError> {
        self.repo.delete_by_id(id).map_err(storage)?;
        tracing::info!(%id, "deleted book");
        Ok(())
    }
}

fn storage<E: std::error::Error + Send + Sync + 'static>(e: E) -> AppError {
    AppError::Storage(Box::new(e))
}
