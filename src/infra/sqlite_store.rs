use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::instrument;

use crate::domain::model::book::{Book, BookDetails};
use crate::domain::model::id::BookId;
use crate::domain::repository::BookRepository;

#[derive(Debug, thiserror::Error)]
pub enum SqliteStoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("connection lock poisoned")]
    Poisoned,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS books (
    id     INTEGER PRIMARY KEY AUTOINCREMENT,
    title  TEXT NOT NULL,
    author TEXT NOT NULL
);";

/// SQLiteのbooksテーブルによるBookRepository実装。
///
/// 接続は1本をMutexで共有する。AUTOINCREMENTなので削除済みIDは再利用されない。
pub struct SqliteBookRepository {
    conn: Mutex<Connection>,
}

impl SqliteBookRepository {
    /// ファイルを開き、テーブルがなければ作る。
    #[instrument(name = "store::sqlite::open", level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteStoreError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, SqliteStoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, SqliteStoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, SqliteStoreError> {
        let conn = self.conn.lock().map_err(|_| SqliteStoreError::Poisoned)?;
        Ok(f(&conn)?)
    }
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book::new(
        BookId::new(row.get(0)?),
        BookDetails::new(row.get::<_, String>(1)?, row.get::<_, String>(2)?),
    ))
}

impl BookRepository for SqliteBookRepository {
    type Error = SqliteStoreError;

    fn find_all(&self) -> Result<Vec<Book>, Self::Error> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, title, author FROM books ORDER BY id")?;
            let books = stmt
                .query_map([], book_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(books)
        })
    }

    fn find_by_id(&self, id: BookId) -> Result<Option<Book>, Self::Error> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, title, author FROM books WHERE id = ?1",
                params![id.get()],
                book_from_row,
            )
            .optional()
        })
    }

    fn insert(&self, details: BookDetails) -> Result<Book, Self::Error> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO books (title, author) VALUES (?1, ?2)",
                params![details.title, details.author],
            )?;
            Ok(Book::new(BookId::new(conn.last_insert_rowid()), details))
        })
    }

    fn save(&self, book: &Book) -> Result<Book, Self::Error> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO books (id, title, author) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET title = excluded.title, author = excluded.author",
                params![book.id().get(), book.title(), book.author()],
            )?;
            Ok(book.clone())
        })
    }

    fn update(&self, book: &Book) -> Result<Option<Book>, Self::Error> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE books SET title = ?2, author = ?3 WHERE id = ?1",
                params![book.id().get(), book.title(), book.author()],
            )?;
            Ok((changed > 0).then(|| book.clone()))
        })
    }

    fn delete_by_id(&self, id: BookId) -> Result<(), Self::Error> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM books WHERE id = ?1", params![id.get()])?;
            Ok(())
        })
    }
}
