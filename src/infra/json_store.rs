use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::domain::model::book::{Book, BookDetails};
use crate::domain::model::id::BookId;
use crate::domain::repository::BookRepository;

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
}

/// ファイル上の表現。削除済みIDを再利用しないよう採番値も保存する。
#[derive(Debug, Serialize, Deserialize)]
struct Shelf {
    next_id: i64,
    books: Vec<Book>,
}

/// JSONファイルによるBookRepository実装。
/// 全Bookを1ファイルに持ち、書き込みは tmp → rename で置き換える。
pub struct JsonBookRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonBookRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Shelf, JsonStoreError> {
        if !self.path.exists() {
            return Ok(Shelf {
                next_id: 1,
                books: Vec::new(),
            });
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn store(&self, shelf: &Shelf) -> Result<(), JsonStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(shelf)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// ロックを取って load → mutate → store する。
    fn modify<T>(&self, f: impl FnOnce(&mut Shelf) -> T) -> Result<T, JsonStoreError> {
        let _guard = self.lock.lock().map_err(|_| JsonStoreError::Poisoned)?;
        let mut shelf = self.load()?;
        let out = f(&mut shelf);
        self.store(&shelf)?;
        Ok(out)
    }
}

impl BookRepository for JsonBookRepository {
    type Error = JsonStoreError;

    fn find_all(&self) -> Result<Vec<Book>, Self::Error> {
        let _guard = self.lock.lock().map_err(|_| JsonStoreError::Poisoned)?;
        let mut books = self.load()?.books;
        books.sort_by_key(Book::id);
        Ok(books)
    }

    fn find_by_id(&self, id: BookId) -> Result<Option<Book>, Self::Error> {
        let _guard = self.lock.lock().map_err(|_| JsonStoreError::Poisoned)?;
        Ok(self.load()?.books.into_iter().find(|b| b.id() == id))
    }

    fn insert(&self, details: BookDetails) -> Result<Book, Self::Error> {
        self.modify(|shelf| {
            let id = BookId::new(shelf.next_id.max(1));
            shelf.next_id = id.next().get();
            let book = Book::new(id, details);
            shelf.books.push(book.clone());
            book
        })
    }

    fn save(&self, book: &Book) -> Result<Book, Self::Error> {
        self.modify(|shelf| {
            match shelf.books.iter_mut().find(|b| b.id() == book.id()) {
                Some(slot) => *slot = book.clone(),
                None => {
                    shelf.books.push(book.clone());
                    shelf.next_id = shelf.next_id.max(book.id().next().get());
                }
            }
            book.clone()
        })
    }

    fn update(&self, book: &Book) -> Result<Option<Book>, Self::Error> {
        self.modify(|shelf| {
            let slot = shelf.books.iter_mut().find(|b| b.id() == book.id())?;
            *slot = book.clone();
            Some(book.clone())
        })
    }

    fn delete_by_id(&self, id: BookId) -> Result<(), Self::Error> {
        self.modify(|shelf| shelf.books.retain(|b| b.id() != id))
    }
}
