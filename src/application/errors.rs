use crate::ports::RepositoryError;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// 存在確認の対象となるエンティティの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Book,
    Member,
    Loan,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Book => "Book",
            EntityKind::Member => "Member",
            EntityKind::Loan => "Loan",
        };
        f.write_str(name)
    }
}

/// アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 必須の値が渡されなかった（例: 貸出が null）
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 書籍・会員が見つからない
    #[error("{kind} with id {id} not found")]
    NotFound { kind: EntityKind, id: Uuid },

    /// 一意制約違反
    #[error("Duplicate value: {0}")]
    Duplicate(String),

    /// ストレージのエラー
    #[error("Repository error")]
    Repository(#[source] RepositoryError),
}

impl ApplicationError {
    pub fn not_found(kind: EntityKind, id: Uuid) -> Self {
        ApplicationError::NotFound { kind, id }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(msg) => ApplicationError::Duplicate(msg),
            RepositoryError::MissingReference(msg) => ApplicationError::InvalidArgument(msg),
            RepositoryError::InvalidValue(msg) => ApplicationError::InvalidArgument(msg),
            err @ RepositoryError::Backend(_) => ApplicationError::Repository(err),
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_entity_and_id() {
        let id = Uuid::new_v4();
        let err = ApplicationError::not_found(EntityKind::Book, id);
        assert_eq!(err.to_string(), format!("Book with id {} not found", id));
    }

    #[test]
    fn test_repository_errors_are_classified() {
        let dup = ApplicationError::from(RepositoryError::Duplicate("isbn".into()));
        assert!(matches!(dup, ApplicationError::Duplicate(_)));

        let missing = ApplicationError::from(RepositoryError::MissingReference("book".into()));
        assert!(matches!(missing, ApplicationError::InvalidArgument(_)));

        let invalid = ApplicationError::from(RepositoryError::InvalidValue("isbn".into()));
        assert!(matches!(invalid, ApplicationError::InvalidArgument(_)));

        let backend = ApplicationError::from(RepositoryError::Backend("down".into()));
        assert!(matches!(backend, ApplicationError::Repository(_)));
    }
}
