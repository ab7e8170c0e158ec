/*
 * Responsibility
 * - /arts/{id}/votes 系 handler
 * - vote の記録と arts.upvotes / downvotes の更新は repo 側で 1 トランザクション
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::votes::{CastVoteRequest, VoteResponse},
        extractors::{AuthCtxExtractor, public_id::PublicArtId},
    },
    error::AppError,
    repos::vote_repo::{self, VoteRow},
    state::AppState,
};

use super::arts::find_art;

fn row_to_response(state: &AppState, row: VoteRow) -> Result<VoteResponse, AppError> {
    Ok(VoteResponse {
        id: row.vote_id,
        art_id: state.id_codec.encode(row.art_id)?,
        user_id: row.user_id,
        value: row.value,
        created_at: row.created_at,
    })
}

pub async fn cast_vote(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    art_id: PublicArtId,
    Json(req): Json<CastVoteRequest>,
) -> Result<(StatusCode, Json<VoteResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_REQUEST", msg))?;

    let art = find_art(&state, art_id.id).await?;
    let row = vote_repo::cast(&state.db, art.art_id, ctx.user_id, req.vote).await?;

    Ok((StatusCode::CREATED, Json(row_to_response(&state, row)?)))
}

pub async fn list_votes(
    State(state): State<AppState>,
    art_id: PublicArtId,
) -> Result<Json<Vec<VoteResponse>>, AppError> {
    let art = find_art(&state, art_id.id).await?;
    let rows = vote_repo::list_for_art(&state.db, art.art_id).await?;

    let mut res = Vec::with_capacity(rows.len());
    for row in rows {
        res.push(row_to_response(&state, row)?);
    }

    Ok(Json(res))
}
