/*
 * Responsibility
 * - /arts 系 handler (upload / list / get / download / delete)
 * - Path の {id} は公開 ID → extractor で内部 ID に変換して受け取る
 * - asset 本体は AssetStore に、メタデータは arts テーブルに置く (key = 内部 ID)
 */
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    api::v1::{
        dto::arts::ArtResponse,
        extractors::{AuthCtxExtractor, public_id::PublicArtId},
    },
    error::AppError,
    middleware::cors::FILE_TYPE_HEADER,
    repos::art_repo::{self, ArtRow},
    state::AppState,
};

const FALLBACK_FILE_TYPE: &str = "application/octet-stream";

pub(super) fn row_to_response(state: &AppState, row: ArtRow) -> Result<ArtResponse, AppError> {
    let public_id = state.id_codec.encode(row.art_id)?;

    Ok(ArtResponse {
        id: public_id,
        url: state.asset_url(&row.art_id.to_string()),
        file_type: row.file_type,
        upvotes: row.upvotes,
        downvotes: row.downvotes,
        owner_id: row.user_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Child routes (places / comments / votes) 404 when the art is gone.
pub(super) async fn find_art(state: &AppState, art_id: i64) -> Result<ArtRow, AppError> {
    art_repo::get(&state.db, art_id)
        .await?
        .ok_or(AppError::not_found("art"))
}

/// MIME type of an upload: `file-type`, then `content-type`, then octet-stream.
fn upload_file_type(headers: &HeaderMap) -> String {
    [FILE_TYPE_HEADER, header::CONTENT_TYPE.as_str()]
        .into_iter()
        .filter_map(|name| headers.get(name))
        .filter_map(|value| value.to_str().ok())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(FALLBACK_FILE_TYPE)
        .to_owned()
}

pub async fn list_arts(State(state): State<AppState>) -> Result<Json<Vec<ArtResponse>>, AppError> {
    let rows = art_repo::list(&state.db).await?;

    let mut res = Vec::with_capacity(rows.len());
    for row in rows {
        res.push(row_to_response(&state, row)?);
    }

    Ok(Json(res))
}

pub async fn upload_art(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ArtResponse>), AppError> {
    if body.is_empty() {
        return Err(AppError::bad_request("EMPTY_ASSET", "request body is empty"));
    }
    let file_type = upload_file_type(&headers);

    let row = art_repo::create(&state.db, &file_type, ctx.user_id).await?;
    let key = row.art_id.to_string();
    let size = body.len();

    if let Err(err) = state.assets.put(&key, body, &file_type).await {
        // row without an asset is useless; drop it before reporting the failure
        if let Err(cleanup) = art_repo::delete(&state.db, row.art_id).await {
            tracing::error!(art_id = row.art_id, error = %cleanup, "failed to remove orphaned art");
        }
        return Err(err.into());
    }

    tracing::info!(
        art_id = row.art_id,
        user_id = %ctx.user_id,
        user_name = %ctx.user_name,
        scopes = ?ctx.scopes,
        file_type = %file_type,
        size,
        "art uploaded"
    );

    Ok((StatusCode::CREATED, Json(row_to_response(&state, row)?)))
}

pub async fn get_art(
    State(state): State<AppState>,
    art_id: PublicArtId,
) -> Result<Json<ArtResponse>, AppError> {
    let row = find_art(&state, art_id.id).await?;
    Ok(Json(row_to_response(&state, row)?))
}

pub async fn download_art(
    State(state): State<AppState>,
    art_id: PublicArtId,
) -> Result<Response, AppError> {
    let row = find_art(&state, art_id.id).await?;
    let asset = state.assets.get(&row.art_id.to_string()).await?;

    let content_type = asset.content_type.as_deref().unwrap_or(&row.file_type);
    let content_type = HeaderValue::from_str(content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(FALLBACK_FILE_TYPE));

    Ok(([(header::CONTENT_TYPE, content_type)], asset.bytes).into_response())
}

/// 204 when nothing was there, 200 with the removed art otherwise.
pub async fn delete_art(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    art_id: PublicArtId,
) -> Result<Response, AppError> {
    let Some(row) = art_repo::delete(&state.db, art_id.id).await? else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    state.assets.delete(&row.art_id.to_string()).await?;
    tracing::info!(
        art_id = row.art_id,
        user_id = %ctx.user_id,
        user_name = %ctx.user_name,
        "art deleted"
    );

    Ok(Json(row_to_response(&state, row)?).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use sqlx::postgres::PgPoolOptions;
    use url::Url;
    use uuid::Uuid;

    use super::*;
    use crate::services::auth::BearerStrategy;
    use crate::services::auth::bearer::{Verification, verifier::verify_fn};
    use crate::services::id_codec::IdCodec;
    use crate::services::storage::MemoryAssetStore;

    fn state() -> AppState {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://emblem@localhost/emblem_test")
            .unwrap();
        let auth = BearerStrategy::new(verify_fn(|_token: String| async {
            Verification::rejected()
        }));

        AppState::new(
            db,
            IdCodec::new(10, "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789")
                .unwrap(),
            Arc::new(auth),
            Arc::new(MemoryAssetStore::new()),
            Url::parse("https://assets.example/emblem/").unwrap(),
        )
    }

    #[tokio::test]
    async fn art_response_uses_public_id_and_asset_url() {
        let state = state();
        let created_at = Utc::now() - Duration::hours(1);
        let updated_at = Utc::now();
        let owner = Uuid::new_v4();

        let res = row_to_response(
            &state,
            ArtRow {
                art_id: 42,
                file_type: "image/png".into(),
                upvotes: 3,
                downvotes: 1,
                user_id: Some(owner),
                created_at,
                updated_at,
            },
        )
        .unwrap();

        assert_eq!(state.id_codec.decode(&res.id).unwrap(), 42);
        assert_eq!(res.url, "https://assets.example/emblem/42");
        assert_eq!(res.owner_id, Some(owner));
        assert_eq!(res.created_at, created_at);
        assert_eq!(res.updated_at, updated_at);
    }

    #[test]
    fn file_type_header_wins_over_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));
        headers.insert(FILE_TYPE_HEADER, HeaderValue::from_static("image/png"));

        assert_eq!(upload_file_type(&headers), "image/png");
    }

    #[test]
    fn falls_back_to_content_type_then_octet_stream() {
        let mut headers = HeaderMap::new();
        assert_eq!(upload_file_type(&headers), FALLBACK_FILE_TYPE);

        headers.insert(FILE_TYPE_HEADER, HeaderValue::from_static("  "));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/gif"));
        assert_eq!(upload_file_type(&headers), "image/gif");
    }
}
