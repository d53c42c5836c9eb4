use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use super::{BookId, LoanId, MemberId, commands::SaveLoan};

/// 貸出期間（日数）
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// 貸出ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    /// 貸出中
    Active,
    /// 返却済み
    Returned,
    /// 延滞中
    Overdue,
}

impl LoanStatus {
    /// 文字列表現を取得する（ストレージ・APIで共通）
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "ACTIVE",
            LoanStatus::Returned => "RETURNED",
            LoanStatus::Overdue => "OVERDUE",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(LoanStatus::Active),
            "RETURNED" => Ok(LoanStatus::Returned),
            "OVERDUE" => Ok(LoanStatus::Overdue),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

/// 永続化済みの貸出 - 1冊の書籍の1人の会員への1回の貸出
///
/// 永続化後は開始日と返却期限が必ず存在する（型で保証）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,

    // 他のエンティティへの参照（IDのみ）
    pub book_id: BookId,
    pub member_id: MemberId,

    pub start_date: NaiveDate,
    /// 返却期限。返却時には実際の返却日で上書きされる。
    pub due_date: NaiveDate,
    pub returned_on: Option<NaiveDate>,
    pub status: LoanStatus,
}

/// 日付が確定した保存前の貸出
///
/// `id` が無ければストレージが採番する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledLoan {
    pub id: Option<LoanId>,
    pub book_id: BookId,
    pub member_id: MemberId,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub returned_on: Option<NaiveDate>,
    pub status: LoanStatus,
}

impl From<Loan> for ScheduledLoan {
    fn from(loan: Loan) -> Self {
        Self {
            id: Some(loan.id),
            book_id: loan.book_id,
            member_id: loan.member_id,
            start_date: loan.start_date,
            due_date: loan.due_date,
            returned_on: loan.returned_on,
            status: loan.status,
        }
    }
}

/// 開始日から返却期限を求める
pub fn due_date_for(start_date: NaiveDate) -> NaiveDate {
    start_date + Duration::days(LOAN_PERIOD_DAYS)
}

/// 純粋関数：貸出の既定値を補う
///
/// ビジネスルール：
/// - 開始日が無ければ今日
/// - 返却期限が無ければ開始日 + 14日
/// - 状態が無ければActive
///
/// 指定済みの値は上書きしない。
pub fn schedule_loan(cmd: SaveLoan, today: NaiveDate) -> ScheduledLoan {
    let start_date = cmd.start_date.unwrap_or(today);
    let due_date = cmd.due_date.unwrap_or_else(|| due_date_for(start_date));

    ScheduledLoan {
        id: cmd.id,
        book_id: cmd.book_id,
        member_id: cmd.member_id,
        start_date,
        due_date,
        returned_on: cmd.returned_on,
        status: cmd.status.unwrap_or(LoanStatus::Active),
    }
}

/// 純粋関数：貸出を返却済みにする
///
/// 返却期限フィールドは実際の返却日で上書きされ、
/// 同じ日付が `returned_on` にも記録される。
pub fn return_loan(loan: Loan, returned_on: NaiveDate) -> Loan {
    Loan {
        due_date: returned_on,
        returned_on: Some(returned_on),
        status: LoanStatus::Returned,
        ..loan
    }
}

/// 延滞判定：Activeかつ返却期限を過ぎている
pub fn is_overdue(loan: &Loan, today: NaiveDate) -> bool {
    loan.status == LoanStatus::Active && loan.due_date < today
}

/// 純粋関数：延滞している貸出をOverdueにする
///
/// 延滞していなければ `None` を返す。
pub fn mark_overdue(loan: Loan, today: NaiveDate) -> Option<Loan> {
    if !is_overdue(&loan, today) {
        return None;
    }
    Some(Loan {
        status: LoanStatus::Overdue,
        ..loan
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn active_loan(start_date: NaiveDate) -> Loan {
        Loan {
            id: LoanId::new(),
            book_id: BookId::new(),
            member_id: MemberId::new(),
            start_date,
            due_date: due_date_for(start_date),
            returned_on: None,
            status: LoanStatus::Active,
        }
    }

    #[test]
    fn test_schedule_loan_defaults_dates_from_today() {
        let today = date(2025, 1, 10);
        let cmd = SaveLoan::new(BookId::new(), MemberId::new());

        let loan = schedule_loan(cmd, today);

        assert_eq!(loan.start_date, today);
        assert_eq!(loan.due_date, date(2025, 1, 24));
        assert_eq!(loan.status, LoanStatus::Active);
        assert!(loan.id.is_none());
    }

    #[test]
    fn test_schedule_loan_due_date_follows_given_start_date() {
        let mut cmd = SaveLoan::new(BookId::new(), MemberId::new());
        cmd.start_date = Some(date(2024, 12, 25));

        let loan = schedule_loan(cmd, date(2025, 3, 1));

        assert_eq!(loan.start_date, date(2024, 12, 25));
        assert_eq!(loan.due_date, date(2025, 1, 8));
    }

    #[test]
    fn test_schedule_loan_keeps_supplied_values() {
        let id = LoanId::new();
        let mut cmd = SaveLoan::new(BookId::new(), MemberId::new());
        cmd.id = Some(id);
        cmd.start_date = Some(date(2025, 2, 1));
        cmd.due_date = Some(date(2025, 2, 3));
        cmd.status = Some(LoanStatus::Overdue);

        let loan = schedule_loan(cmd, date(2025, 6, 1));

        assert_eq!(loan.id, Some(id));
        assert_eq!(loan.start_date, date(2025, 2, 1));
        assert_eq!(loan.due_date, date(2025, 2, 3));
        assert_eq!(loan.status, LoanStatus::Overdue);
    }

    #[test]
    fn test_due_date_crosses_month_and_year() {
        assert_eq!(due_date_for(date(2024, 12, 20)), date(2025, 1, 3));
        assert_eq!(due_date_for(date(2024, 2, 20)), date(2024, 3, 5));
    }

    #[test]
    fn test_return_loan_stamps_return_date() {
        let loan = active_loan(date(2025, 1, 1));
        let returned = return_loan(loan.clone(), date(2025, 1, 5));

        assert_eq!(returned.status, LoanStatus::Returned);
        assert_eq!(returned.due_date, date(2025, 1, 5));
        assert_eq!(returned.returned_on, Some(date(2025, 1, 5)));
        assert_eq!(returned.start_date, loan.start_date);
        assert_eq!(returned.id, loan.id);
    }

    #[test]
    fn test_is_overdue_false_on_due_date() {
        let loan = active_loan(date(2025, 1, 1));
        assert!(!is_overdue(&loan, loan.due_date));
    }

    #[test]
    fn test_is_overdue_true_after_due_date() {
        let loan = active_loan(date(2025, 1, 1));
        assert!(is_overdue(&loan, date(2025, 1, 16)));
    }

    #[test]
    fn test_is_overdue_false_when_returned() {
        let loan = return_loan(active_loan(date(2025, 1, 1)), date(2025, 1, 2));
        assert!(!is_overdue(&loan, date(2025, 6, 1)));
    }

    #[test]
    fn test_mark_overdue() {
        let loan = active_loan(date(2025, 1, 1));
        assert!(mark_overdue(loan.clone(), date(2025, 1, 10)).is_none());

        let overdue = mark_overdue(loan, date(2025, 1, 20)).unwrap();
        assert_eq!(overdue.status, LoanStatus::Overdue);
    }

    #[test]
    fn test_loan_status_round_trip_through_str() {
        for status in [LoanStatus::Active, LoanStatus::Returned, LoanStatus::Overdue] {
            assert_eq!(status.as_str().parse::<LoanStatus>(), Ok(status));
        }
        assert!("active".parse::<LoanStatus>().is_err());
    }

    #[test]
    fn test_loan_status_serializes_upper_case() {
        let json = serde_json::to_string(&LoanStatus::Returned).unwrap();
        assert_eq!(json, "\"RETURNED\"");
    }
}
