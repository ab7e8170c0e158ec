/*
 * Responsibility
 * - Arts の response DTO
 * - 公開 ID (encode 済み) と asset の公開 URL を返す (内部 ID を漏らさない)
 */
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::v1::dto::places::PlaceResponse;

#[derive(Debug, Serialize)]
pub struct ArtResponse {
    pub id: String, // encoded
    pub file_type: String,
    pub upvotes: i32,
    pub downvotes: i32,
    pub owner_id: Option<Uuid>,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PlacedArtResponse {
    #[serde(flatten)]
    pub art: ArtResponse,
    pub places: Vec<PlaceResponse>,
}
