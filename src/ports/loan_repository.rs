use crate::domain::{Loan, LoanId, ScheduledLoan};
use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::Result;

/// 貸出リポジトリポート
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// すべての貸出を取得する
    ///
    /// 順序の保証はない。
    async fn find_all(&self) -> Result<Vec<Loan>>;

    async fn find_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>>;

    /// 日付確定済みの貸出を保存する
    ///
    /// IDが無ければ採番してINSERT、あればupsert。
    /// 書籍・会員が存在しない場合は `RepositoryError::MissingReference`。
    async fn save(&self, loan: ScheduledLoan) -> Result<Loan>;

    async fn delete(&self, loan_id: LoanId) -> Result<bool>;

    /// 延滞候補の貸出を検索する
    ///
    /// status が ACTIVE かつ due_date < today の貸出を返す。
    async fn find_overdue_candidates(&self, today: NaiveDate) -> Result<Vec<Loan>>;
}
