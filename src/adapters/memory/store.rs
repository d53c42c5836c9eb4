use crate::domain::{
    Book, BookId, Loan, LoanId, LoanStatus, Member, MemberId, ScheduledLoan,
    commands::{SaveBook, SaveMember},
};
use crate::domain::book::ISBN_LENGTH;
use crate::ports::error::{RepositoryError, Result};
use crate::ports::{BookRepository, LoanRepository, MemberRepository};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Tables {
    books: Vec<Book>,
    members: Vec<Member>,
    loans: Vec<Loan>,
}

/// In-process storage implementing all three repositories
///
/// Mirrors the PostgreSQL schema rules: ISBN length, unique ISBN and email,
/// loans must reference existing books and members, and deleting
/// a book or member cascades to its loans. Rows keep insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Backend("memory store lock poisoned".into()))
    }
}

/// Replace the row with the same id, or append it
fn upsert<T, K: PartialEq>(rows: &mut Vec<T>, row: T, key: impl Fn(&T) -> K) {
    let id = key(&row);
    match rows.iter_mut().find(|existing| key(existing) == id) {
        Some(existing) => *existing = row,
        None => rows.push(row),
    }
}

#[async_trait]
impl BookRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Book>> {
        Ok(self.tables()?.books.clone())
    }

    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        Ok(self.tables()?.books.iter().find(|b| b.id == book_id).cloned())
    }

    async fn save(&self, cmd: SaveBook) -> Result<Book> {
        let mut tables = self.tables()?;
        let id = cmd.id.unwrap_or_default();

        if cmd.isbn.chars().count() > ISBN_LENGTH {
            return Err(RepositoryError::InvalidValue(format!(
                "isbn {} is longer than {} characters",
                cmd.isbn, ISBN_LENGTH
            )));
        }

        if tables.books.iter().any(|b| b.isbn == cmd.isbn && b.id != id) {
            return Err(RepositoryError::Duplicate(format!(
                "isbn {} already exists",
                cmd.isbn
            )));
        }

        let book = Book {
            id,
            title: cmd.title,
            author: cmd.author,
            isbn: cmd.isbn,
            category: cmd.category,
        };
        upsert(&mut tables.books, book.clone(), |b| b.id);
        Ok(book)
    }

    async fn delete(&self, book_id: BookId) -> Result<bool> {
        let mut tables = self.tables()?;
        let before = tables.books.len();
        tables.books.retain(|b| b.id != book_id);
        if tables.books.len() == before {
            return Ok(false);
        }
        tables.loans.retain(|l| l.book_id != book_id);
        Ok(true)
    }
}

#[async_trait]
impl MemberRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Member>> {
        Ok(self.tables()?.members.clone())
    }

    async fn find_by_id(&self, member_id: MemberId) -> Result<Option<Member>> {
        Ok(self
            .tables()?
            .members
            .iter()
            .find(|m| m.id == member_id)
            .cloned())
    }

    async fn save(&self, cmd: SaveMember) -> Result<Member> {
        let mut tables = self.tables()?;
        let id = cmd.id.unwrap_or_default();

        if tables.members.iter().any(|m| m.email == cmd.email && m.id != id) {
            return Err(RepositoryError::Duplicate(format!(
                "email {} already exists",
                cmd.email
            )));
        }

        let member = Member {
            id,
            name: cmd.name,
            email: cmd.email,
            penalty_until: cmd.penalty_until,
        };
        upsert(&mut tables.members, member.clone(), |m| m.id);
        Ok(member)
    }

    async fn delete(&self, member_id: MemberId) -> Result<bool> {
        let mut tables = self.tables()?;
        let before = tables.members.len();
        tables.members.retain(|m| m.id != member_id);
        if tables.members.len() == before {
            return Ok(false);
        }
        tables.loans.retain(|l| l.member_id != member_id);
        Ok(true)
    }
}

#[async_trait]
impl LoanRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Loan>> {
        Ok(self.tables()?.loans.clone())
    }

    async fn find_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        Ok(self.tables()?.loans.iter().find(|l| l.id == loan_id).cloned())
    }

    async fn save(&self, loan: ScheduledLoan) -> Result<Loan> {
        let mut tables = self.tables()?;

        if !tables.books.iter().any(|b| b.id == loan.book_id) {
            return Err(RepositoryError::MissingReference(format!(
                "book {} does not exist",
                loan.book_id
            )));
        }
        if !tables.members.iter().any(|m| m.id == loan.member_id) {
            return Err(RepositoryError::MissingReference(format!(
                "member {} does not exist",
                loan.member_id
            )));
        }

        let loan = Loan {
            id: loan.id.unwrap_or_default(),
            book_id: loan.book_id,
            member_id: loan.member_id,
            start_date: loan.start_date,
            due_date: loan.due_date,
            returned_on: loan.returned_on,
            status: loan.status,
        };
        upsert(&mut tables.loans, loan.clone(), |l| l.id);
        Ok(loan)
    }

    async fn delete(&self, loan_id: LoanId) -> Result<bool> {
        let mut tables = self.tables()?;
        let before = tables.loans.len();
        tables.loans.retain(|l| l.id != loan_id);
        Ok(tables.loans.len() != before)
    }

    async fn find_overdue_candidates(&self, today: NaiveDate) -> Result<Vec<Loan>> {
        Ok(self
            .tables()?
            .loans
            .iter()
            .filter(|l| l.status == LoanStatus::Active && l.due_date < today)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn save_book_cmd(isbn: &str) -> SaveBook {
        SaveBook {
            id: None,
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            isbn: isbn.to_string(),
            category: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_with_existing_id_replaces_row() {
        let store = MemoryStore::new();
        let book = BookRepository::save(&store, save_book_cmd("9780441013593"))
            .await
            .unwrap();

        let mut update = save_book_cmd("9780441013593");
        update.id = Some(book.id);
        update.title = "Dune Messiah".to_string();
        BookRepository::save(&store, update).await.unwrap();

        let books = BookRepository::find_all(&store).await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune Messiah");
    }

    #[tokio::test]
    async fn test_duplicate_isbn_is_rejected() {
        let store = MemoryStore::new();
        BookRepository::save(&store, save_book_cmd("9780441013593"))
            .await
            .unwrap();

        let result = BookRepository::save(&store, save_book_cmd("9780441013593")).await;
        assert!(matches!(result, Err(RepositoryError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_isbn_longer_than_column_is_rejected() {
        let store = MemoryStore::new();

        let result = BookRepository::save(&store, save_book_cmd("97804410135930000000")).await;

        assert!(matches!(result, Err(RepositoryError::InvalidValue(_))));
        assert!(BookRepository::find_all(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_isbn_of_exactly_thirteen_characters_is_accepted() {
        let store = MemoryStore::new();

        let result = BookRepository::save(&store, save_book_cmd("9780441013593")).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_loan_requires_existing_book() {
        let store = MemoryStore::new();
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let loan = ScheduledLoan {
            id: None,
            book_id: BookId::new(),
            member_id: MemberId::new(),
            start_date: today,
            due_date: today,
            returned_on: None,
            status: LoanStatus::Active,
        };

        let result = LoanRepository::save(&store, loan).await;
        assert!(matches!(result, Err(RepositoryError::MissingReference(_))));
    }
}
