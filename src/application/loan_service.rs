use crate::domain::{self, Loan, LoanId, commands::SaveLoan};
use chrono::NaiveDate;

use super::ServiceDependencies;
use super::errors::{ApplicationError, Result};

/// 貸出一覧を取得する
///
/// 順序はストレージ依存。
pub async fn list_loans(deps: &ServiceDependencies) -> Result<Vec<Loan>> {
    Ok(deps.loans.find_all().await?)
}

/// 貸出を保存する
///
/// ビジネスルール：
/// - 貸出が渡されなければInvalidArgument
/// - 開始日が無ければ `today`
/// - 返却期限が無ければ開始日 + 14日
/// - 状態が無ければActive
///
/// 書籍の貸出可否や期間の重複は確認しない。
/// 同じ書籍への同時貸出は防がれない。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `cmd` - 貸出コマンド（書籍・会員は解決済み）
/// * `today` - 既定値の基準日
pub async fn save_loan(
    deps: &ServiceDependencies,
    cmd: Option<SaveLoan>,
    today: NaiveDate,
) -> Result<Loan> {
    let cmd = cmd.ok_or_else(|| {
        ApplicationError::InvalidArgument("Loan must not be null".to_string())
    })?;

    let scheduled = domain::loan::schedule_loan(cmd, today);
    let loan = deps.loans.save(scheduled).await?;

    tracing::info!(
        loan_id = %loan.id,
        book_id = %loan.book_id,
        member_id = %loan.member_id,
        start_date = %loan.start_date,
        due_date = %loan.due_date,
        "loan saved"
    );
    Ok(loan)
}

/// IDで貸出を取得する
///
/// 書籍・会員と異なり、存在しない場合はエラーではなく `None`。
pub async fn get_loan(deps: &ServiceDependencies, loan_id: LoanId) -> Result<Option<Loan>> {
    Ok(deps.loans.find_by_id(loan_id).await?)
}

/// 貸出を削除する
///
/// 存在しない場合は何もしない（`Ok(false)`）。
pub async fn delete_loan(deps: &ServiceDependencies, loan_id: LoanId) -> Result<bool> {
    let deleted = deps.loans.delete(loan_id).await?;
    if deleted {
        tracing::info!(loan_id = %loan_id, "loan deleted");
    } else {
        tracing::debug!(loan_id = %loan_id, "loan not found, nothing to delete");
    }
    Ok(deleted)
}

/// 貸出を返却済みにする
///
/// 見つかった場合：状態をReturnedにし、返却期限を `today` で上書きし、
/// `returned_on` にも同じ日付を記録して保存する。
/// 見つからない場合は何もしない（`Ok(None)`）。
pub async fn mark_returned(
    deps: &ServiceDependencies,
    loan_id: LoanId,
    today: NaiveDate,
) -> Result<Option<Loan>> {
    let Some(loan) = deps.loans.find_by_id(loan_id).await? else {
        tracing::debug!(loan_id = %loan_id, "loan not found, nothing to return");
        return Ok(None);
    };

    let returned = domain::loan::return_loan(loan, today);
    let saved = deps.loans.save(returned.into()).await?;

    tracing::info!(loan_id = %saved.id, returned_on = %today, "loan returned");
    Ok(Some(saved))
}
