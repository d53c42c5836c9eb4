use crate::domain::{Book, BookId, commands::SaveBook};
use async_trait::async_trait;

use super::error::Result;

/// 書籍リポジトリポート
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// すべての書籍を取得する（順序はストレージ依存）
    async fn find_all(&self) -> Result<Vec<Book>>;

    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>>;

    /// 書籍を保存する
    ///
    /// IDが無ければ採番してINSERT、あればupsert。
    async fn save(&self, cmd: SaveBook) -> Result<Book>;

    /// 書籍を削除する
    ///
    /// 参照している貸出もカスケード削除される。
    /// 削除した場合は `true` を返す。
    async fn delete(&self, book_id: BookId) -> Result<bool>;
}
