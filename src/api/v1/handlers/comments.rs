/*
 * Responsibility
 * - /arts/{id}/comments 系 handler
 * - コメントの所有者は認証済みユーザー (AuthCtx)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::comments::{CommentResponse, CreateCommentRequest},
        extractors::{AuthCtxExtractor, public_id::PublicArtId},
    },
    error::AppError,
    repos::comment_repo::{self, CommentRow},
    state::AppState,
};

use super::arts::find_art;

fn row_to_response(state: &AppState, row: CommentRow) -> Result<CommentResponse, AppError> {
    Ok(CommentResponse {
        id: row.comment_id,
        art_id: state.id_codec.encode(row.art_id)?,
        user_id: row.user_id,
        title: row.title,
        created_at: row.created_at,
    })
}

pub async fn create_comment(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    art_id: PublicArtId,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_REQUEST", msg))?;

    let art = find_art(&state, art_id.id).await?;
    let row = comment_repo::create(&state.db, art.art_id, ctx.user_id, req.title.trim()).await?;

    Ok((StatusCode::CREATED, Json(row_to_response(&state, row)?)))
}

pub async fn list_comments(
    State(state): State<AppState>,
    art_id: PublicArtId,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let art = find_art(&state, art_id.id).await?;
    let rows = comment_repo::list_for_art(&state.db, art.art_id).await?;

    let mut res = Vec::with_capacity(rows.len());
    for row in rows {
        res.push(row_to_response(&state, row)?);
    }

    Ok(Json(res))
}
