use crate::domain::{Book, BookId, commands::SaveBook};
use crate::ports::book_repository::BookRepository as BookRepositoryTrait;
use crate::ports::error::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

fn map_row_to_book(row: &PgRow) -> Book {
    Book {
        id: BookId::from_uuid(row.get("id")),
        title: row.get("title"),
        author: row.get("author"),
        isbn: row.get("isbn"),
        category: row.get("category"),
    }
}

/// PostgreSQL implementation of BookRepository
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn find_all(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, author, isbn, category
            FROM books
            ORDER BY title ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_book).collect())
    }

    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, author, isbn, category
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_book))
    }

    /// Insert a new book (id generated by the database) or upsert by id
    async fn save(&self, cmd: SaveBook) -> Result<Book> {
        let row = match cmd.id {
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO books (title, author, isbn, category)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, title, author, isbn, category
                    "#,
                )
                .bind(&cmd.title)
                .bind(&cmd.author)
                .bind(&cmd.isbn)
                .bind(&cmd.category)
                .fetch_one(&self.pool)
                .await?
            }
            Some(book_id) => {
                sqlx::query(
                    r#"
                    INSERT INTO books (id, title, author, isbn, category)
                    VALUES ($1, $2, $3, $4, $5)
                    ON CONFLICT (id)
                    DO UPDATE SET
                        title = EXCLUDED.title,
                        author = EXCLUDED.author,
                        isbn = EXCLUDED.isbn,
                        category = EXCLUDED.category
                    RETURNING id, title, author, isbn, category
                    "#,
                )
                .bind(book_id.value())
                .bind(&cmd.title)
                .bind(&cmd.author)
                .bind(&cmd.isbn)
                .bind(&cmd.category)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(map_row_to_book(&row))
    }

    /// Delete a book; dependent loans go with it through the FK cascade
    async fn delete(&self, book_id: BookId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(book_id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
