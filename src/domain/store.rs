use async_trait::async_trait;

use super::model::book::{Book, BookDraft};
use super::model::id::BookId;

/// データ層の抽象。Infra層が実装する。
/// 各操作はネットワーク往復を模した非同期呼び出しで、遅延の後に完了する。
#[async_trait]
pub trait BookStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// 全書籍のスナップショットを登録順で返す。
    async fn list_books(&self) -> Result<Vec<Book>, Self::Error>;

    /// ID一致の書籍を返す。存在しなければNotFound。
    async fn get_book(&self, id: BookId) -> Result<Book, Self::Error>;

    /// 書籍を登録し、採番済みのレコードを返す。
    async fn add_book(&self, draft: BookDraft) -> Result<Book, Self::Error>;
}
