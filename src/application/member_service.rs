use crate::domain::{Member, MemberId, commands::SaveMember};

use super::ServiceDependencies;
use super::errors::{ApplicationError, EntityKind, Result};

pub async fn list_members(deps: &ServiceDependencies) -> Result<Vec<Member>> {
    Ok(deps.members.find_all().await?)
}

/// IDで会員を取得する（無ければNotFound）
pub async fn get_member(deps: &ServiceDependencies, member_id: MemberId) -> Result<Member> {
    deps.members
        .find_by_id(member_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found(EntityKind::Member, member_id.value()))
}

/// 会員を登録・更新する（メール重複はDuplicate）
pub async fn save_member(deps: &ServiceDependencies, cmd: SaveMember) -> Result<Member> {
    let member = deps.members.save(cmd).await?;
    tracing::info!(member_id = %member.id, "member saved");
    Ok(member)
}

/// 会員を削除する
///
/// 存在しなければNotFound。会員の貸出もカスケード削除される。
pub async fn delete_member(deps: &ServiceDependencies, member_id: MemberId) -> Result<()> {
    let member = get_member(deps, member_id).await?;
    deps.members.delete(member.id).await?;
    tracing::info!(member_id = %member.id, "member deleted");
    Ok(())
}
