pub mod book_repository;
pub mod loan_repository;
pub mod member_repository;

use crate::ports::RepositoryError;
use sqlx::PgPool;
use sqlx::error::ErrorKind;

// パブリックに型を再エクスポート
pub use book_repository::BookRepository as PostgresBookRepository;
pub use loan_repository::LoanRepository as PostgresLoanRepository;
pub use member_repository::MemberRepository as PostgresMemberRepository;

/// Apply the migrations under `./migrations`
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// SQLSTATE 22001 (string_data_right_truncation)
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

/// Constraint violations become typed errors; everything else is a backend failure.
impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(STRING_DATA_RIGHT_TRUNCATION) {
                return RepositoryError::InvalidValue(db_err.message().to_string());
            }
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    return RepositoryError::Duplicate(db_err.message().to_string());
                }
                ErrorKind::ForeignKeyViolation => {
                    return RepositoryError::MissingReference(db_err.message().to_string());
                }
                ErrorKind::CheckViolation => {
                    return RepositoryError::InvalidValue(db_err.message().to_string());
                }
                _ => {}
            }
        }
        RepositoryError::Backend(Box::new(err))
    }
}
