use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::domain::model::book::{Book, BookDetails};
use crate::domain::model::id::BookId;
use crate::domain::repository::BookRepository;

#[derive(Debug, thiserror::Error)]
#[error("in-memory store lock poisoned")]
pub struct MemoryStoreError;

#[derive(Debug)]
struct Table {
    next_id: BookId,
    rows: BTreeMap<BookId, Book>,
}

/// プロセス内だけで完結するリポジトリ。テストやデモ用。
#[derive(Debug)]
pub struct InMemoryBookRepository {
    table: Mutex<Table>,
}

impl Default for InMemoryBookRepository {
    fn default() -> Self {
        Self {
            table: Mutex::new(Table {
                next_id: BookId::new(1),
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_table<T>(&self, f: impl FnOnce(&mut Table) -> T) -> Result<T, MemoryStoreError> {
        let mut table = self.table.lock().map_err(|_| MemoryStoreError)?;
        Ok(f(&mut table))
    }
}

impl BookRepository for InMemoryBookRepository {
    type Error = MemoryStoreError;

    fn find_all(&self) -> Result<Vec<Book>, Self::Error> {
        self.with_table(|t| t.rows.values().cloned().collect())
    }

    fn find_by_id(&self, id: BookId) -> Result<Option<Book>, Self::Error> {
        self.with_table(|t| t.rows.get(&id).cloned())
    }

    fn insert(&self, details: BookDetails) -> Result<Book, Self::Error> {
        self.with_table(|t| {
            let id = t.next_id;
            t.next_id = id.next();
            let book = Book::new(id, details);
            t.rows.insert(id, book.clone());
            book
        })
    }

    fn save(&self, book: &Book) -> Result<Book, Self::Error> {
        self.with_table(|t| {
            if book.id() >= t.next_id {
                t.next_id = book.id().next();
            }
            t.rows.insert(book.id(), book.clone());
            book.clone()
        })
    }

    fn update(&self, book: &Book) -> Result<Option<Book>, Self::Error> {
        self.with_table(|t| {
            let slot = t.rows.get_mut(&book.id())?;
            *slot = book.clone();
            Some(book.clone())
        })
    }

    fn delete_by_id(&self, id: BookId) -> Result<(), Self::Error> {
        self.with_table(|t| {
            t.rows.remove(&id);
        })
    }
}
