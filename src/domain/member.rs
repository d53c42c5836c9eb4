use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::MemberId;

/// 会員
///
/// メールアドレスの一意性はストレージが保証する。
/// `penalty_until` は記録されるだけで、計算はされない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub penalty_until: Option<NaiveDate>,
}
