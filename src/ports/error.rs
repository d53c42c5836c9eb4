use thiserror::Error;

/// ストレージ層のエラー
///
/// 一意制約・外部キー制約の違反だけを区別し、
/// それ以外はバックエンドのエラーをそのまま包む。
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// 一意制約違反（ISBN・メールアドレスの重複など）
    #[error("Duplicate value: {0}")]
    Duplicate(String),

    /// 参照先が存在しない（外部キー制約違反）
    #[error("Missing reference: {0}")]
    MissingReference(String),

    /// 値がカラムの制約を満たさない（ISBNが長すぎるなど）
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// その他のストレージ障害
    #[error("Storage backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
