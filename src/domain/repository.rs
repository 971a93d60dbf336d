use super::model::book::{Book, BookDetails};
use super::model::id::BookId;

/// 永続化の抽象。Infra層が実装する。
/// IDの採番と耐久性はストア側の責務。
pub trait BookRepository: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// ストア定義の順序で全件を返す。
    fn find_all(&self) -> Result<Vec<Book>, Self::Error>;

    fn find_by_id(&self, id: BookId) -> Result<Option<Book>, Self::Error>;

    /// 新規レコードを保存し、採番済みのBookを返す。
    fn insert(&self, details: BookDetails) -> Result<Book, Self::Error>;

    /// ID付きのBookを保存する（なければ挿入、あれば上書き）。
    fn save(&self, book: &Book) -> Result<Book, Self::Error>;

    /// 既存レコードだけを上書きする。行がなければ `None` を返し、挿入はしない。
    fn update(&self, book: &Book) -> Result<Option<Book>, Self::Error>;

    /// 存在しないIDでもエラーにしない。
    fn delete_by_id(&self, id: BookId) -> Result<(), Self::Error>;
}
