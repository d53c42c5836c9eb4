use crate::domain::{Book, BookId, commands::SaveBook};

use super::ServiceDependencies;
use super::errors::{ApplicationError, EntityKind, Result};

/// 書籍一覧を取得する
pub async fn list_books(deps: &ServiceDependencies) -> Result<Vec<Book>> {
    Ok(deps.books.find_all().await?)
}

/// IDで書籍を取得する
///
/// # エラー
/// - NotFound: 書籍が存在しない
pub async fn get_book(deps: &ServiceDependencies, book_id: BookId) -> Result<Book> {
    deps.books
        .find_by_id(book_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found(EntityKind::Book, book_id.value()))
}

/// 書籍を登録・更新する
///
/// フィールドの検証は行わない。ISBNの重複はストレージで検出され、
/// Duplicateとして返る。
pub async fn save_book(deps: &ServiceDependencies, cmd: SaveBook) -> Result<Book> {
    let book = deps.books.save(cmd).await?;
    tracing::info!(book_id = %book.id, isbn = %book.isbn, "book saved");
    Ok(book)
}

/// 書籍を削除する
///
/// 事前に存在を確認し、無ければNotFound。
/// この書籍の貸出はストレージのカスケードで削除される。
pub async fn delete_book(deps: &ServiceDependencies, book_id: BookId) -> Result<()> {
    let book = get_book(deps, book_id).await?;
    deps.books.delete(book.id).await?;
    tracing::info!(book_id = %book.id, "book deleted");
    Ok(())
}
