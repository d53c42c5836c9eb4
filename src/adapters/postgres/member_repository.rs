use crate::domain::{Member, MemberId, commands::SaveMember};
use crate::ports::error::Result;
use crate::ports::member_repository::MemberRepository as MemberRepositoryTrait;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

fn map_row_to_member(row: &PgRow) -> Member {
    Member {
        id: MemberId::from_uuid(row.get("id")),
        name: row.get("name"),
        email: row.get("email"),
        penalty_until: row.get("penalty_until"),
    }
}

/// PostgreSQL implementation of MemberRepository
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepositoryTrait for MemberRepository {
    async fn find_all(&self) -> Result<Vec<Member>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, penalty_until
            FROM members
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_member).collect())
    }

    async fn find_by_id(&self, member_id: MemberId) -> Result<Option<Member>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, penalty_until
            FROM members
            WHERE id = $1
            "#,
        )
        .bind(member_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_member))
    }

    async fn save(&self, cmd: SaveMember) -> Result<Member> {
        let row = match cmd.id {
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO members (name, email, penalty_until)
                    VALUES ($1, $2, $3)
                    RETURNING id, name, email, penalty_until
                    "#,
                )
                .bind(&cmd.name)
                .bind(&cmd.email)
                .bind(cmd.penalty_until)
                .fetch_one(&self.pool)
                .await?
            }
            Some(member_id) => {
                sqlx::query(
                    r#"
                    INSERT INTO members (id, name, email, penalty_until)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (id)
                    DO UPDATE SET
                        name = EXCLUDED.name,
                        email = EXCLUDED.email,
                        penalty_until = EXCLUDED.penalty_until
                    RETURNING id, name, email, penalty_until
                    "#,
                )
                .bind(member_id.value())
                .bind(&cmd.name)
                .bind(&cmd.email)
                .bind(cmd.penalty_until)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(map_row_to_member(&row))
    }

    async fn delete(&self, member_id: MemberId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(member_id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
