/*
 * Responsibility
 * - Comments の request/response DTO
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TITLE_MAX_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub title: String,
}

impl CreateCommentRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        if self.title.chars().count() > TITLE_MAX_CHARS {
            return Err("title must be <= 500 chars");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub art_id: String, // encoded
    pub user_id: Option<Uuid>,
    pub title: String,
    pub created_at: DateTime<Utc>,
}
