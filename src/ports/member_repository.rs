use crate::domain::{Member, MemberId, commands::SaveMember};
use async_trait::async_trait;

use super::error::Result;

/// 会員リポジトリポート
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Member>>;

    async fn find_by_id(&self, member_id: MemberId) -> Result<Option<Member>>;

    /// 会員を保存する（IDの有無でINSERT / upsert）
    async fn save(&self, cmd: SaveMember) -> Result<Member>;

    /// 会員を削除する
    ///
    /// 会員の貸出もカスケード削除される。
    async fn delete(&self, member_id: MemberId) -> Result<bool>;
}
