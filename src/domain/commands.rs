use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BookId, LoanId, LoanStatus, MemberId};

/// コマンド：書籍を保存する
///
/// `id` が無ければ新規登録、あればストレージ側でupsertされる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveBook {
    pub id: Option<BookId>,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: Option<String>,
}

/// コマンド：会員を保存する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveMember {
    pub id: Option<MemberId>,
    pub name: String,
    pub email: String,
    pub penalty_until: Option<NaiveDate>,
}

/// コマンド：貸出を保存する
///
/// 書籍と会員は呼び出し側で解決済みであること。
/// 日付と状態は省略可能で、省略時は `loan::schedule_loan` が既定値を補う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveLoan {
    pub id: Option<LoanId>,
    pub book_id: BookId,
    pub member_id: MemberId,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub returned_on: Option<NaiveDate>,
    pub status: Option<LoanStatus>,
}

impl SaveLoan {
    /// 日付・状態を指定しない新規貸出
    pub fn new(book_id: BookId, member_id: MemberId) -> Self {
        Self {
            id: None,
            book_id,
            member_id,
            start_date: None,
            due_date: None,
            returned_on: None,
            status: None,
        }
    }
}
