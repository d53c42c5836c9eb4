use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    Book, BookId, Loan, LoanStatus, Member, MemberId,
    commands::{SaveBook, SaveMember},
};

// ============================================================================
// JSON requests
// ============================================================================

/// 書籍の登録・更新リクエスト（POST /api/books, PUT /api/books/:id）
#[derive(Debug, Deserialize, ToSchema)]
pub struct BookRequest {
    /// 書名
    #[schema(example = "Dune")]
    pub title: String,
    /// 著者
    #[schema(example = "Frank Herbert")]
    pub author: String,
    /// ISBN（最大13文字、一意）
    #[schema(example = "9780441013593", max_length = 13)]
    pub isbn: String,
    /// 分類
    #[serde(default)]
    pub category: Option<String>,
}

impl BookRequest {
    pub fn into_command(self, id: Option<BookId>) -> SaveBook {
        SaveBook {
            id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            category: self.category,
        }
    }
}

/// 会員の登録・更新リクエスト
#[derive(Debug, Deserialize, ToSchema)]
pub struct MemberRequest {
    /// 氏名
    #[schema(example = "Ana")]
    pub name: String,
    /// メールアドレス（一意）
    #[schema(example = "ana@x.com")]
    pub email: String,
    /// 貸出停止の期限
    #[serde(default)]
    pub penalty_until: Option<NaiveDate>,
}

impl MemberRequest {
    pub fn into_command(self, id: Option<MemberId>) -> SaveMember {
        SaveMember {
            id,
            name: self.name,
            email: self.email,
            penalty_until: self.penalty_until,
        }
    }
}

/// 貸出作成リクエスト（POST /api/loans）
///
/// 日付・状態は省略可能。
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoanRequest {
    pub book_id: Uuid,
    pub member_id: Uuid,
    /// 省略時は今日
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// 省略時は開始日 + 14日
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// 省略時はACTIVE
    #[serde(default)]
    pub status: Option<LoanStatus>,
}

// ============================================================================
// JSON responses
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: Option<String>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.value(),
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            category: book.category,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub penalty_until: Option<NaiveDate>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id.value(),
            name: member.name,
            email: member.email,
            penalty_until: member.penalty_until,
        }
    }
}

/// 貸出レスポンス
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoanResponse {
    pub id: Uuid,
    pub book_id: Uuid,
    pub member_id: Uuid,
    pub start_date: NaiveDate,
    /// 返却期限（返却後は返却日）
    pub due_date: NaiveDate,
    /// 返却日
    pub returned_on: Option<NaiveDate>,
    pub status: LoanStatus,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            id: loan.id.value(),
            book_id: loan.book_id.value(),
            member_id: loan.member_id.value(),
            start_date: loan.start_date,
            due_date: loan.due_date,
            returned_on: loan.returned_on,
            status: loan.status,
        }
    }
}

/// 延滞検出の結果（POST /api/loans/overdue）
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OverdueScanResponse {
    /// 延滞に変更した貸出の件数
    pub marked_overdue: usize,
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// エラー種別（例: BOOK_NOT_FOUND）
    pub error: String,
    /// 詳細メッセージ
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// HTML forms
// ============================================================================

/// 空文字のフォーム項目を `None` として扱う
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(de::Error::custom),
    }
}

/// 書籍フォーム（POST /books/save）
///
/// `id` が空なら新規登録。
#[derive(Debug, Deserialize)]
pub struct BookForm {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub id: Option<Uuid>,
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category: Option<String>,
}

impl From<BookForm> for SaveBook {
    fn from(form: BookForm) -> Self {
        SaveBook {
            id: form.id.map(BookId::from_uuid),
            title: form.title,
            author: form.author,
            isbn: form.isbn,
            category: form.category,
        }
    }
}

/// 会員フォーム（POST /members/save）
#[derive(Debug, Deserialize)]
pub struct MemberForm {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub penalty_until: Option<NaiveDate>,
}

impl From<MemberForm> for SaveMember {
    fn from(form: MemberForm) -> Self {
        SaveMember {
            id: form.id.map(MemberId::from_uuid),
            name: form.name,
            email: form.email,
            penalty_until: form.penalty_until,
        }
    }
}

/// 貸出フォーム（POST /loans/save）
#[derive(Debug, Deserialize)]
pub struct LoanForm {
    pub book_id: Uuid,
    pub member_id: Uuid,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub due_date: Option<NaiveDate>,
}
