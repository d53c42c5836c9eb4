mod book_service;
mod errors;
mod loan_service;
mod member_service;
mod overdue_detection;

use crate::ports::{BookRepository, LoanRepository, MemberRepository};
use std::sync::Arc;

pub use book_service::{delete_book, get_book, list_books, save_book};
pub use errors::{ApplicationError, EntityKind, Result};
pub use loan_service::{delete_loan, get_loan, list_loans, mark_returned, save_loan};
pub use member_service::{delete_member, get_member, list_members, save_member};
pub use overdue_detection::mark_overdue_loans;

/// サービスの依存関係
///
/// 起動時に一度だけ組み立てられ、各サービス関数に明示的に渡される。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub books: Arc<dyn BookRepository>,
    pub members: Arc<dyn MemberRepository>,
    pub loans: Arc<dyn LoanRepository>,
}
