/*
 * Responsibility
 * - votes テーブル + arts.upvotes / downvotes の集計
 * - vote の insert とカウンタ更新は 1 トランザクションで行う
 */
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VoteRow {
    #[sqlx(rename = "voteId")]
    pub vote_id: i64,
    #[sqlx(rename = "artId")]
    pub art_id: i64,
    #[sqlx(rename = "userId")]
    pub user_id: Option<Uuid>,
    pub value: i16,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Record a vote and bump the matching counter on the art.
pub async fn cast(
    db: &PgPool,
    art_id: i64,
    user_id: Uuid,
    value: i16,
) -> Result<VoteRow, RepoError> {
    let mut tx = db.begin().await?;

    let row = sqlx::query_as::<_, VoteRow>(
        r#"
        INSERT INTO votes ("artId", "userId", value)
        VALUES ($1, $2, $3)
        RETURNING "voteId", "artId", "userId", value, "createdAt"
        "#,
    )
    .bind(art_id)
    .bind(user_id)
    .bind(value)
    .fetch_one(&mut *tx)
    .await
    .map_err(RepoError::from_sqlx)?;

    sqlx::query(
        r#"
        UPDATE arts
        SET
            upvotes = upvotes + CASE WHEN $2 > 0 THEN 1 ELSE 0 END,
            downvotes = downvotes + CASE WHEN $2 < 0 THEN 1 ELSE 0 END,
            "updatedAt" = now()
        WHERE "artId" = $1
        "#,
    )
    .bind(art_id)
    .bind(value)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(row)
}

pub async fn list_for_art(db: &PgPool, art_id: i64) -> Result<Vec<VoteRow>, RepoError> {
    let rows = sqlx::query_as::<_, VoteRow>(
        r#"
        SELECT "voteId", "artId", "userId", value, "createdAt"
        FROM votes
        WHERE "artId" = $1
        ORDER BY "voteId"
        "#,
    )
    .bind(art_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}
