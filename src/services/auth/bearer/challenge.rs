//! `WWW-Authenticate: Bearer ...` challenge (RFC 6750 §3).
//!
//! Parameter order is fixed: realm, scope, error, error_description, error_uri.
//! Values are written as-is (no quoting/escaping).

use std::fmt;

pub const DEFAULT_REALM: &str = "Users";

/// Error code used when the verifier rejected a presented token.
pub const INVALID_TOKEN: &str = "invalid_token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    realm: String,
    scope: Vec<String>,
    error: Option<String>,
    error_description: Option<String>,
    error_uri: Option<String>,
}

impl Challenge {
    /// Plain "please authenticate" challenge.
    pub fn new(realm: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
            scope: Vec::new(),
            error: None,
            error_description: None,
            error_uri: None,
        }
    }

    pub fn with_scope(mut self, scope: &[String]) -> Self {
        self.scope = scope.to_vec();
        self
    }

    pub fn with_error(mut self, code: impl Into<String>) -> Self {
        self.error = Some(code.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.error_description = Some(description.into());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.error_uri = Some(uri.into());
        self
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn error(&self) -> Option<&str> {
        non_empty(self.error.as_deref())
    }

    pub fn description(&self) -> Option<&str> {
        non_empty(self.error_description.as_deref())
    }

    pub fn uri(&self) -> Option<&str> {
        non_empty(self.error_uri.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bearer realm=\"{}\"", self.realm)?;
        if !self.scope.is_empty() {
            write!(f, ", scope=\"{}\"", self.scope.join(" "))?;
        }
        if let Some(code) = self.error() {
            write!(f, ", error=\"{}\"", code)?;
        }
        if let Some(description) = self.description() {
            write!(f, ", error_description=\"{}\"", description)?;
        }
        if let Some(uri) = self.uri() {
            write!(f, ", error_uri=\"{}\"", uri)?;
        }
        Ok(())
    }
}
