/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は公開、/arts 以下はすべて Bearer 必須 (route_layer で適用)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    arts::{delete_art, download_art, get_art, list_arts, upload_art},
    comments::{create_comment, list_comments},
    health::health,
    places::{list_places, place_art},
    votes::{cast_vote, list_votes},
};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let arts = Router::new()
        .route("/arts", get(list_arts).post(upload_art))
        .route("/arts/{id}", get(get_art).delete(delete_art))
        .route("/arts/{id}/download", get(download_art))
        .route("/arts/{id}/place", post(place_art))
        .route("/arts/{id}/places", get(list_places))
        .route(
            "/arts/{id}/comments",
            get(list_comments).post(create_comment),
        )
        .route("/arts/{id}/votes", get(list_votes).post(cast_vote));

    let arts = middleware::auth::access::apply(arts, state.auth.clone());

    Router::new().route("/health", get(health)).merge(arts)
}
