use crate::domain;
use chrono::NaiveDate;

use super::ServiceDependencies;
use super::errors::Result;

/// 延滞検出
///
/// 呼び出されたときだけ実行される（定期実行はしない）。
///
/// ビジネスルール：
/// - 返却期限（due_date）が `today` より前のActive状態の貸出を延滞とする
/// - 既にOverdue、またはReturnedの貸出は処理しない
///
/// # 戻り値
/// 延滞に変更した貸出の件数
pub async fn mark_overdue_loans(deps: &ServiceDependencies, today: NaiveDate) -> Result<usize> {
    let candidates = deps.loans.find_overdue_candidates(today).await?;
    let mut marked = 0;

    for loan in candidates {
        // 候補取得後に状態が変わっている可能性があるため、ドメイン側で再判定する
        let Some(overdue) = domain::loan::mark_overdue(loan, today) else {
            continue;
        };

        deps.loans.save(overdue.into()).await?;
        marked += 1;
    }

    if marked > 0 {
        tracing::info!(count = marked, %today, "loans marked overdue");
    }
    Ok(marked)
}
