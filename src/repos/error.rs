/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("referenced row does not exist")]
    MissingReference,
}

impl RepoError {
    // 23503 = foreign_key_violation (e.g. the art was deleted between lookup and insert)
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23503")
        {
            return RepoError::MissingReference;
        }
        RepoError::Db(e)
    }
}
