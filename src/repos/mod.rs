/*
 * Responsibility
 * - テーブルごとの SQLx 操作 (arts / places / comments / votes / users)
 */
pub mod art_repo;
pub mod comment_repo;
pub mod error;
pub mod place_repo;
pub mod user_repo;
pub mod vote_repo;
