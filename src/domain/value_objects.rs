use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 書籍ID - カタログの識別子
///
/// 永続化時にストレージ側で採番される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 会員ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(Uuid);

impl MemberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 貸出ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(Uuid);

impl LoanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for LoanId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_id_creation() {
        let id1 = LoanId::new();
        let id2 = LoanId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_book_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = BookId::from_uuid(uuid);
        assert_eq!(id.value(), uuid);
    }

    #[test]
    fn test_member_id_display_matches_uuid() {
        let uuid = Uuid::new_v4();
        assert_eq!(MemberId::from_uuid(uuid).to_string(), uuid.to_string());
    }

    #[test]
    fn test_ids_serialize_as_plain_uuid() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&BookId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }
}
