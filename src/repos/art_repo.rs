/*
 * Responsibility
 * - arts テーブルの CRUD
 * - art_places (art ↔ place の中間テーブル) へのリンク
 * - places / comments / votes は artId の FK (CASCADE) 前提で削除挙動を意識
 */
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArtRow {
    #[sqlx(rename = "artId")]
    pub art_id: i64,

    #[sqlx(rename = "fileType")]
    pub file_type: String,

    pub upvotes: i32,
    pub downvotes: i32,

    #[sqlx(rename = "userId")]
    pub user_id: Option<Uuid>,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

pub async fn list(db: &PgPool) -> Result<Vec<ArtRow>, RepoError> {
    let rows = sqlx::query_as::<_, ArtRow>(
        r#"
        SELECT
            "artId", "fileType", upvotes, downvotes, "userId", "createdAt", "updatedAt"
        FROM arts
        ORDER BY "artId" DESC
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn create(db: &PgPool, file_type: &str, user_id: Uuid) -> Result<ArtRow, RepoError> {
    let row = sqlx::query_as::<_, ArtRow>(
        r#"
        INSERT INTO arts ("fileType", "userId")
        VALUES ($1, $2)
        RETURNING
            "artId", "fileType", upvotes, downvotes, "userId", "createdAt", "updatedAt"
        "#,
    )
    .bind(file_type)
    .bind(user_id)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn get(db: &PgPool, art_id: i64) -> Result<Option<ArtRow>, RepoError> {
    let row = sqlx::query_as::<_, ArtRow>(
        r#"
        SELECT
            "artId", "fileType", upvotes, downvotes, "userId", "createdAt", "updatedAt"
        FROM arts
        WHERE "artId" = $1
        "#,
    )
    .bind(art_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Delete and return the removed row (`None` if nothing was there).
pub async fn delete(db: &PgPool, art_id: i64) -> Result<Option<ArtRow>, RepoError> {
    let row = sqlx::query_as::<_, ArtRow>(
        r#"
        DELETE FROM arts
        WHERE "artId" = $1
        RETURNING
            "artId", "fileType", upvotes, downvotes, "userId", "createdAt", "updatedAt"
        "#,
    )
    .bind(art_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Link an art to places. Already-linked pairs are ignored.
pub async fn link_places(db: &PgPool, art_id: i64, place_ids: &[i64]) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        INSERT INTO art_places ("artId", "placeId")
        SELECT $1, place_id FROM UNNEST($2::bigint[]) AS t(place_id)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(art_id)
    .bind(place_ids)
    .execute(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(())
}
