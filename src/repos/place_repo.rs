/*
 * Responsibility
 * - places テーブル (lat / long / sector)
 * - sector 単位の検索と、art に紐づく place の一覧
 */
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlaceRow {
    #[sqlx(rename = "placeId")]
    pub place_id: i64,
    pub lat: f64,
    pub long: f64,
    pub sector: String,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

pub async fn find_by_sector(db: &PgPool, sector: &str) -> Result<Vec<PlaceRow>, RepoError> {
    let rows = sqlx::query_as::<_, PlaceRow>(
        r#"
        SELECT "placeId", lat, long, sector, "createdAt"
        FROM places
        WHERE sector = $1
        ORDER BY "placeId"
        "#,
    )
    .bind(sector)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn create(db: &PgPool, lat: f64, long: f64, sector: &str) -> Result<PlaceRow, RepoError> {
    let row = sqlx::query_as::<_, PlaceRow>(
        r#"
        INSERT INTO places (lat, long, sector)
        VALUES ($1, $2, $3)
        RETURNING "placeId", lat, long, sector, "createdAt"
        "#,
    )
    .bind(lat)
    .bind(long)
    .bind(sector)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn list_for_art(db: &PgPool, art_id: i64) -> Result<Vec<PlaceRow>, RepoError> {
    let rows = sqlx::query_as::<_, PlaceRow>(
        r#"
        SELECT p."placeId", p.lat, p.long, p.sector, p."createdAt"
        FROM places p
        JOIN art_places ap ON ap."placeId" = p."placeId"
        WHERE ap."artId" = $1
        ORDER BY p."placeId"
        "#,
    )
    .bind(art_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}
