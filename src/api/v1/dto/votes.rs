/*
 * Responsibility
 * - Votes の request/response DTO
 * - vote は +1 (up) / -1 (down) のみ
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CastVoteRequest {
    pub vote: i16,
}

impl CastVoteRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        match self.vote {
            1 | -1 => Ok(()),
            _ => Err("vote must be 1 or -1"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub id: i64,
    pub art_id: String, // encoded
    pub user_id: Option<Uuid>,
    pub value: i16,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unit_votes_are_valid() {
        assert!(CastVoteRequest { vote: 1 }.validate().is_ok());
        assert!(CastVoteRequest { vote: -1 }.validate().is_ok());
        assert!(CastVoteRequest { vote: 0 }.validate().is_err());
        assert!(CastVoteRequest { vote: 5 }.validate().is_err());
    }
}
