use crate::domain::{BookId, Loan, LoanId, LoanStatus, MemberId, ScheduledLoan};
use crate::ports::error::{RepositoryError, Result};
use crate::ports::loan_repository::LoanRepository as LoanRepositoryTrait;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::str::FromStr;

const LOAN_COLUMNS: &str = "id, book_id, member_id, start_date, due_date, returned_on, status";

/// PostgreSQLの行データをLoanに変換する
///
/// statusは文字列から変換するため、未知の値はエラーになる。
fn map_row_to_loan(row: &PgRow) -> Result<Loan> {
    let status_str: &str = row.get("status");
    let status = LoanStatus::from_str(status_str).map_err(|e| {
        RepositoryError::Backend(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e,
        )))
    })?;

    Ok(Loan {
        id: LoanId::from_uuid(row.get("id")),
        book_id: BookId::from_uuid(row.get("book_id")),
        member_id: MemberId::from_uuid(row.get("member_id")),
        start_date: row.get("start_date"),
        due_date: row.get("due_date"),
        returned_on: row.get("returned_on"),
        status,
    })
}

/// LoanRepositoryのPostgreSQL実装
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    /// 開始日の新しい順に返す
    async fn find_all(&self) -> Result<Vec<Loan>> {
        let rows = sqlx::query(&format!(
            "SELECT {LOAN_COLUMNS} FROM loans ORDER BY start_date DESC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_loan).collect()
    }

    async fn find_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let row = sqlx::query(&format!("SELECT {LOAN_COLUMNS} FROM loans WHERE id = $1"))
            .bind(loan_id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_loan).transpose()
    }

    /// 貸出を保存（IDが無ければ採番、あればupsert）
    ///
    /// 書籍・会員の外部キー違反は `MissingReference` に変換される。
    async fn save(&self, loan: ScheduledLoan) -> Result<Loan> {
        let row = match loan.id {
            None => {
                sqlx::query(&format!(
                    r#"
                    INSERT INTO loans (book_id, member_id, start_date, due_date, returned_on, status)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    RETURNING {LOAN_COLUMNS}
                    "#
                ))
                .bind(loan.book_id.value())
                .bind(loan.member_id.value())
                .bind(loan.start_date)
                .bind(loan.due_date)
                .bind(loan.returned_on)
                .bind(loan.status.as_str())
                .fetch_one(&self.pool)
                .await?
            }
            Some(loan_id) => {
                sqlx::query(&format!(
                    r#"
                    INSERT INTO loans (id, book_id, member_id, start_date, due_date, returned_on, status)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    ON CONFLICT (id)
                    DO UPDATE SET
                        book_id = EXCLUDED.book_id,
                        member_id = EXCLUDED.member_id,
                        start_date = EXCLUDED.start_date,
                        due_date = EXCLUDED.due_date,
                        returned_on = EXCLUDED.returned_on,
                        status = EXCLUDED.status
                    RETURNING {LOAN_COLUMNS}
                    "#
                ))
                .bind(loan_id.value())
                .bind(loan.book_id.value())
                .bind(loan.member_id.value())
                .bind(loan.start_date)
                .bind(loan.due_date)
                .bind(loan.returned_on)
                .bind(loan.status.as_str())
                .fetch_one(&self.pool)
                .await?
            }
        };

        map_row_to_loan(&row)
    }

    async fn delete(&self, loan_id: LoanId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM loans WHERE id = $1")
            .bind(loan_id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 延滞候補を検索
    ///
    /// (status, due_date)の部分インデックスを使用する。
    async fn find_overdue_candidates(&self, today: NaiveDate) -> Result<Vec<Loan>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {LOAN_COLUMNS}
            FROM loans
            WHERE status = 'ACTIVE' AND due_date < $1
            ORDER BY due_date ASC
            "#
        ))
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_loan).collect()
    }
}
