/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::access::apply (bearer), cors::apply, http::apply, security_headers::apply
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
