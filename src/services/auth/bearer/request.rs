/*
 * Responsibility
 * - bearer strategy に渡す request の view (method / uri / headers / body / query)
 * - body / query は parse 済みの形で持つ (strategy 側は axum の Body を知らない)
 */
use axum::http::{HeaderMap, Method, Uri, header};
use serde_json::{Map, Value};

/// Field name for tokens sent in the body or query (RFC 6750 §2.2, §2.3).
pub const ACCESS_TOKEN_FIELD: &str = "access_token";

#[derive(Debug, Clone, Default)]
pub struct AuthRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
}

impl AuthRequest {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        let query = uri
            .query()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();

        Self {
            method,
            uri,
            headers,
            body: None,
            query,
        }
    }

    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    /// Non-empty string field of the parsed body.
    pub fn body_field(&self, name: &str) -> Option<&str> {
        self.body
            .as_ref()?
            .get(name)?
            .as_str()
            .filter(|v| !v.is_empty())
    }

    /// First occurrence of a query parameter, if non-empty.
    pub fn query_field(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .filter(|v| !v.is_empty())
    }
}

/// Body encodings that can carry `access_token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Form,
}

impl BodyKind {
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let content_type = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "application/json" => Some(Self::Json),
            "application/x-www-form-urlencoded" => Some(Self::Form),
            _ => None,
        }
    }

    /// Parse the raw body. Anything unparsable is treated as "no body".
    pub fn parse(self, raw: &[u8]) -> Option<Value> {
        match self {
            Self::Json => serde_json::from_slice::<Value>(raw).ok(),
            Self::Form => {
                let mut fields = Map::new();
                for (key, value) in url::form_urlencoded::parse(raw).into_owned() {
                    fields.entry(key).or_insert(Value::String(value));
                }
                Some(Value::Object(fields))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    #[test]
    fn parses_query_pairs_from_uri() {
        let req = AuthRequest::new(
            Method::GET,
            Uri::from_static("/arts?access_token=abc%20def&access_token=second"),
            HeaderMap::new(),
        );

        assert_eq!(req.query_field(ACCESS_TOKEN_FIELD), Some("abc def"));
        assert_eq!(req.query_field("missing"), None);
    }

    #[test]
    fn empty_values_count_as_absent() {
        let req = AuthRequest::new(Method::GET, Uri::from_static("/?access_token="), HeaderMap::new())
            .with_body(Some(json!({ "access_token": "" })));

        assert_eq!(req.query_field(ACCESS_TOKEN_FIELD), None);
        assert_eq!(req.body_field(ACCESS_TOKEN_FIELD), None);
    }

    #[test]
    fn non_string_body_token_is_ignored() {
        let req = AuthRequest::default().with_body(Some(json!({ "access_token": 42 })));
        assert_eq!(req.body_field(ACCESS_TOKEN_FIELD), None);
    }

    #[test]
    fn detects_body_kind_from_content_type() {
        let mut headers = HeaderMap::new();
        assert_eq!(BodyKind::from_headers(&headers), None);

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert_eq!(BodyKind::from_headers(&headers), Some(BodyKind::Json));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        assert_eq!(BodyKind::from_headers(&headers), Some(BodyKind::Form));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
        assert_eq!(BodyKind::from_headers(&headers), None);
    }

    #[test]
    fn form_body_keeps_first_value() {
        let body = BodyKind::Form
            .parse(b"access_token=first&access_token=second&title=hi")
            .unwrap();

        assert_eq!(body["access_token"], "first");
        assert_eq!(body["title"], "hi");
    }

    #[test]
    fn invalid_json_body_is_none() {
        assert_eq!(BodyKind::Json.parse(b"{not json"), None);
    }
}
