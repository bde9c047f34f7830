//! Middleware for logging requests and responses.

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// Bodies longer than this many bytes are truncated in `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED: &str = "********";

/// Body fields that are never logged as is.
const SECRET_FIELDS: [&str; 2] = ["password", "access_token"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
///
/// Passwords and tokens in form and JSON bodies, and the `Authorization` header, are redacted.
/// Bodies that cannot be redacted are logged as their length only.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let body_text = String::from_utf8_lossy(&body_bytes);
    log_message(
        &format!(
            "Received request: {} {}\nheaders: {:#?}",
            parts.method,
            parts.uri,
            redact_headers(&parts.headers)
        ),
        &redact_body(&parts.headers, &body_text),
    );

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let body_text = String::from_utf8_lossy(&body_bytes);
    log_message(
        &format!(
            "Sending response: {}\nheaders: {:#?}",
            parts.status,
            redact_headers(&parts.headers)
        ),
        &redact_body(&parts.headers, &body_text),
    );

    Response::from_parts(parts, Body::from(body_bytes))
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    if headers.contains_key(AUTHORIZATION) {
        headers.insert(AUTHORIZATION, HeaderValue::from_static(REDACTED));
    }

    headers
}

/// The body as it should appear in the logs.
///
/// Only form and JSON bodies that parse are logged, with their secret fields redacted. Any other
/// body is replaced by a placeholder that gives its length.
fn redact_body(headers: &HeaderMap, body_text: &str) -> String {
    if body_text.is_empty() {
        return String::new();
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let redacted = if content_type.starts_with("application/x-www-form-urlencoded") {
        redact_form(body_text)
    } else if content_type.starts_with("application/json") {
        redact_json(body_text)
    } else {
        None
    };

    redacted.unwrap_or_else(|| format!("<{} bytes, not logged>", body_text.len()))
}

fn is_field_name(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

/// Redact the secret fields of a form body, or `None` if the body is not a well formed form.
fn redact_form(form_text: &str) -> Option<String> {
    // A pair without '=' would be logged as a field name, whatever it holds.
    if !form_text
        .split('&')
        .filter(|pair| !pair.is_empty())
        .all(|pair| pair.contains('='))
    {
        return None;
    }

    let fields = serde_urlencoded::from_str::<Vec<(String, String)>>(form_text).ok()?;

    if !fields.iter().all(|(key, _)| is_field_name(key)) {
        return None;
    }

    let fields: Vec<(String, String)> = fields
        .into_iter()
        .map(|(key, value)| {
            if SECRET_FIELDS.contains(&key.as_str()) {
                (key, REDACTED.to_owned())
            } else {
                (key, value)
            }
        })
        .collect();

    serde_urlencoded::to_string(&fields).ok()
}

/// Redact the secret fields of a JSON body, or `None` if the body is not valid JSON.
fn redact_json(json_text: &str) -> Option<String> {
    let mut value = serde_json::from_str::<Value>(json_text).ok()?;
    redact_json_value(&mut value);

    Some(value.to_string())
}

fn redact_json_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if SECRET_FIELDS.contains(&key.as_str()) {
                    *field = Value::String(REDACTED.to_owned());
                } else {
                    redact_json_value(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_json_value),
        _ => {}
    }
}

/// The longest prefix of `text` that is at most `limit` bytes and ends on a char boundary.
fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}

fn log_message(message: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "{message}\nbody: {:}...",
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{message}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        http::{
            HeaderMap, HeaderValue,
            header::{AUTHORIZATION, CONTENT_TYPE},
        },
        middleware,
        routing::post,
    };
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use super::{
        logging_middleware, redact_body, redact_form, redact_headers, redact_json, truncate,
    };

    fn content_type(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn redacts_password_in_form() {
        let redacted =
            redact_form("grant_type=password&username=a%40x.com&password=hunter2").unwrap();

        assert!(!redacted.contains("hunter2"));
        assert!(redacted.contains("username=a%40x.com"));
        assert!(redacted.contains("password=********"));
    }

    #[test]
    fn redacts_password_in_json() {
        let redacted = redact_json(r#"{"email": "a@x.com", "password": "hunter2"}"#).unwrap();

        let value: Value = serde_json::from_str(&redacted).unwrap();
        assert_eq!(value, json!({ "email": "a@x.com", "password": "********" }));
    }

    #[test]
    fn redacts_access_token_in_json() {
        let redacted =
            redact_json(r#"{"access_token": "a.b.c", "token_type": "bearer"}"#).unwrap();

        assert!(!redacted.contains("a.b.c"));
        assert!(redacted.contains("bearer"));
    }

    #[test]
    fn redacts_password_in_form_body() {
        let redacted = redact_body(
            &content_type("application/x-www-form-urlencoded"),
            "username=a%40x.com&password=hunter2",
        );

        assert_eq!(redacted, "username=a%40x.com&password=********");
    }

    #[test]
    fn truncated_json_body_is_not_logged() {
        let body = r#"{"email":"a@x.com","password":"hunter2""#;

        let redacted = redact_body(&content_type("application/json"), body);

        assert_eq!(redacted, format!("<{} bytes, not logged>", body.len()));
    }

    #[test]
    fn malformed_form_body_is_not_logged() {
        let headers = content_type("application/x-www-form-urlencoded");

        for body in [
            "username=a%40x.com&password hunter2",
            "username=a%40x.com&hunter2",
            "username=a%40x.com&%7B%22password%22%3A%22hunter2%22%7D=1",
        ] {
            let redacted = redact_body(&headers, body);

            assert!(!redacted.contains("hunter2"), "logged {redacted:?}");
            assert!(redacted.ends_with("bytes, not logged>"));
        }
    }

    #[test]
    fn body_with_other_content_type_is_not_logged() {
        let body = "username=a%40x.com&password=hunter2";

        let plain_text = redact_body(&content_type("text/plain"), body);
        let no_content_type = redact_body(&HeaderMap::new(), body);

        assert_eq!(plain_text, "<35 bytes, not logged>");
        assert_eq!(no_content_type, "<35 bytes, not logged>");
    }

    #[test]
    fn empty_body_is_logged_as_empty() {
        assert_eq!(redact_body(&HeaderMap::new(), ""), "");
    }

    #[test]
    fn redacts_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer a.b.c"));

        let redacted = redact_headers(&headers);

        assert_eq!(redacted.get(AUTHORIZATION).unwrap(), "********");
    }

    #[test]
    fn truncates_on_char_boundary() {
        let text = "ab🔥cd";

        assert_eq!(truncate(text, 3), "ab");
        assert_eq!(truncate(text, 6), "ab🔥");
        assert_eq!(truncate(text, 100), text);
    }

    async fn echo(Json(body): Json<Value>) -> Json<Value> {
        Json(body)
    }

    #[tokio::test]
    async fn middleware_passes_bodies_through_unchanged() {
        let app = Router::new()
            .route("/echo", post(echo))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app);
        let body = json!({ "email": "a@x.com", "password": "hunter2" });

        let response = server.post("/echo").json(&body).await;

        response.assert_status_ok();
        response.assert_json(&body);
    }
}
