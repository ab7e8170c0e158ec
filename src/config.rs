/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, CORS 許可、Auth / S3 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use url::Url;

use crate::services::auth::bearer::challenge::DEFAULT_REALM;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Where art binaries live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetBackend {
    S3,
    Memory,
}

impl FromStr for AssetBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s3" => Ok(Self::S3),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::Invalid("ASSET_BACKEND")),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,

    pub sqids_min_length: usize,
    pub sqids_alphabet: String,

    // bearer strategy
    pub auth_realm: String,
    pub auth_scope: Vec<String>,

    // access token (JWT) verification
    pub auth_issuer: String,
    pub auth_audience: String,
    pub access_token_leeway_seconds: u64,
    pub access_jwt_public_key_pem: String,

    // asset storage
    pub asset_backend: AssetBackend,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>,
    pub asset_public_base_url: Url,
}

fn var(key: &'static str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    var(key).ok_or(ConfigError::Missing(key))
}

fn parsed<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match var(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Base URL for public asset links; always ends with `/` so `join(key)` appends.
fn public_base_url(raw: &str) -> Result<Url, ConfigError> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&with_slash).map_err(|_| ConfigError::Invalid("ASSET_PUBLIC_BASE_URL"))
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = parsed("PORT", 3000)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url = required("DATABASE_URL")?;
        let database_max_connections = parsed("DATABASE_MAX_CONNECTIONS", 5)?;

        let cors_allowed_origins = comma_list(&var("CORS_ALLOWED_ORIGINS").unwrap_or_default());
        let max_upload_bytes = parsed("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?;

        let sqids_min_length = parsed("SQIDS_MIN_LENGTH", 10)?;
        let sqids_alphabet = var("SQIDS_ALPHABET").unwrap_or_else(|| {
            "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".to_string()
        });

        let auth_realm = var("AUTH_REALM").unwrap_or_else(|| DEFAULT_REALM.to_string());
        let auth_scope = comma_list(&var("AUTH_SCOPE").unwrap_or_default());

        let auth_issuer = required("AUTH_ISSUER")?;
        let auth_audience = required("AUTH_AUDIENCE")?;
        let access_token_leeway_seconds = parsed("ACCESS_TOKEN_LEEWAY_SECONDS", 60)?;
        let access_jwt_public_key_pem =
            required("ACCESS_JWT_PUBLIC_KEY_PEM")?.replace("\\n", "\n");

        let asset_backend = parsed("ASSET_BACKEND", AssetBackend::S3)?;
        let s3_bucket = var("S3_BUCKET").unwrap_or_else(|| "hadashco-emblem".to_string());
        let s3_region = var("S3_REGION").unwrap_or_else(|| "us-east-1".to_string());
        let s3_endpoint = var("S3_ENDPOINT");
        let asset_public_base_url = public_base_url(
            &var("ASSET_PUBLIC_BASE_URL")
                .unwrap_or_else(|| format!("https://s3.amazonaws.com/{s3_bucket}/")),
        )?;

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            cors_allowed_origins,
            max_upload_bytes,
            sqids_min_length,
            sqids_alphabet,
            auth_realm,
            auth_scope,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            access_jwt_public_key_pem,
            asset_backend,
            s3_bucket,
            s3_region,
            s3_endpoint,
            asset_public_base_url,
        })
    }
}
