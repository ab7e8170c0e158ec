/*
 * Responsibility
 * - Places の request/response DTO
 */
use serde::{Deserialize, Serialize};

use crate::repos::place_repo::PlaceRow;

#[derive(Debug, Deserialize)]
pub struct PlaceArtRequest {
    pub lat: f64,
    pub long: f64,
}

#[derive(Debug, Serialize)]
pub struct PlaceResponse {
    pub id: i64,
    pub lat: f64,
    pub long: f64,
    pub sector: String,
}

impl From<PlaceRow> for PlaceResponse {
    fn from(row: PlaceRow) -> Self {
        Self {
            id: row.place_id,
            lat: row.lat,
            long: row.long,
            sector: row.sector,
        }
    }
}
