/*
 * Responsibility
 * - comments テーブル (art ごとのコメント)
 */
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
    #[sqlx(rename = "commentId")]
    pub comment_id: i64,
    #[sqlx(rename = "artId")]
    pub art_id: i64,
    #[sqlx(rename = "userId")]
    pub user_id: Option<Uuid>,
    pub title: String,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

pub async fn create(
    db: &PgPool,
    art_id: i64,
    user_id: Uuid,
    title: &str,
) -> Result<CommentRow, RepoError> {
    let row = sqlx::query_as::<_, CommentRow>(
        r#"
        INSERT INTO comments ("artId", "userId", title)
        VALUES ($1, $2, $3)
        RETURNING "commentId", "artId", "userId", title, "createdAt"
        "#,
    )
    .bind(art_id)
    .bind(user_id)
    .bind(title)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn list_for_art(db: &PgPool, art_id: i64) -> Result<Vec<CommentRow>, RepoError> {
    let rows = sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT "commentId", "artId", "userId", title, "createdAt"
        FROM comments
        WHERE "artId" = $1
        ORDER BY "commentId"
        "#,
    )
    .bind(art_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}
