/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware (bearer strategy) が Authenticated<Principal> を extensions に格納し、
 *   extractor がこの型に詰め替える
 *
 * Notes
 * - token の取り出し/検証は middleware/services 側の責務
 */
use serde_json::Value;
use uuid::Uuid;

use crate::services::auth::Principal;
use crate::services::auth::bearer::Authenticated;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は内部ユーザーID（UUID）
/// - `scopes` は token の `scope` claim を空白区切りで分解したもの
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: Uuid,
    pub user_name: String,
    pub scopes: Vec<String>,
}

impl From<Authenticated<Principal>> for AuthCtx {
    fn from(authenticated: Authenticated<Principal>) -> Self {
        let scopes = authenticated
            .info
            .as_ref()
            .and_then(|info| info.get("scope"))
            .and_then(Value::as_str)
            .map(|scope| scope.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default();

        Self {
            user_id: authenticated.principal.user_id,
            user_name: authenticated.principal.user_name,
            scopes,
        }
    }
}
