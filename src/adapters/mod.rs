pub mod memory;
pub mod postgres;

use crate::application::ServiceDependencies;
use sqlx::PgPool;
use std::sync::Arc;

/// すべてのリポジトリを1つのインメモリストアで構成する
pub fn memory_dependencies() -> ServiceDependencies {
    let store = Arc::new(memory::MemoryStore::new());
    ServiceDependencies {
        books: store.clone(),
        members: store.clone(),
        loans: store,
    }
}

/// PostgreSQLのコネクションプールを共有してリポジトリを構成する
pub fn postgres_dependencies(pool: PgPool) -> ServiceDependencies {
    ServiceDependencies {
        books: Arc::new(postgres::PostgresBookRepository::new(pool.clone())),
        members: Arc::new(postgres::PostgresMemberRepository::new(pool.clone())),
        loans: Arc::new(postgres::PostgresLoanRepository::new(pool)),
    }
}
