/*
 * Responsibility
 * - POST /arts/{id}/place : 座標 → sector を求め、同じ sector の place に art を紐づける
 *   (sector に place が無ければ作る)
 * - GET /arts/{id}/places
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{
        dto::{
            arts::PlacedArtResponse,
            places::{PlaceArtRequest, PlaceResponse},
        },
        extractors::public_id::PublicArtId,
    },
    error::AppError,
    repos::{art_repo, place_repo},
    services::geo,
    state::AppState,
};

use super::arts::{find_art, row_to_response};

pub async fn place_art(
    State(state): State<AppState>,
    art_id: PublicArtId,
    Json(req): Json<PlaceArtRequest>,
) -> Result<Json<PlacedArtResponse>, AppError> {
    let art = find_art(&state, art_id.id).await?;
    let sector = geo::sector(req.lat, req.long)?;

    let mut places = place_repo::find_by_sector(&state.db, &sector).await?;
    if places.is_empty() {
        places.push(place_repo::create(&state.db, req.lat, req.long, &sector).await?);
    }

    let place_ids: Vec<i64> = places.iter().map(|p| p.place_id).collect();
    art_repo::link_places(&state.db, art.art_id, &place_ids).await?;
    tracing::debug!(art_id = art.art_id, sector = %sector, places = place_ids.len(), "art placed");

    let linked = place_repo::list_for_art(&state.db, art.art_id).await?;

    Ok(Json(PlacedArtResponse {
        art: row_to_response(&state, art)?,
        places: linked.into_iter().map(PlaceResponse::from).collect(),
    }))
}

pub async fn list_places(
    State(state): State<AppState>,
    art_id: PublicArtId,
) -> Result<Json<Vec<PlaceResponse>>, AppError> {
    let art = find_art(&state, art_id.id).await?;
    let rows = place_repo::list_for_art(&state.db, art.art_id).await?;

    Ok(Json(rows.into_iter().map(PlaceResponse::from).collect()))
}
