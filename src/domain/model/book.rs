use serde::{Deserialize, Serialize};

use super::id::BookId;

/// クライアントが送ってくるBookの中身。
/// 欠けたフィールドは空文字として扱い、`id` が含まれていても無視する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetails {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
}

impl BookDetails {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }
}

/// 永続化済みのBook。IDは採番後に変わらない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    title: String,
    author: String,
}

impl Book {
    pub fn new(id: BookId, details: BookDetails) -> Self {
        Self {
            id,
            title: details.title,
            author: details.author,
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// title/authorを差し替えた新しいBookを返す。IDは保持する。
    pub fn with_details(self, details: BookDetails) -> Self {
        Self::new(self.id, details)
    }

    pub fn details(&self) -> BookDetails {
        BookDetails::new(&self.title, &self.author)
    }
}
