use serde::{Deserialize, Serialize};

use super::BookId;

/// ISBNの桁数（ストレージのカラム長と一致）
pub const ISBN_LENGTH: usize = 13;

/// 書籍 - カタログに登録された1冊
///
/// 貸出は書籍を参照するが、書籍は貸出を所有しない。
/// ISBNの一意性はストレージが保証する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: Option<String>,
}
