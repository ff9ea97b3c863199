//! Middleware for logging requests and responses.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// Fields of JSON request bodies that must never be written to the logs.
const REDACTED_FIELDS: [&str; 2] = ["token", "credential"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// ID tokens in request bodies are replaced with asterisks, whatever the
/// declared content type.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (headers, body_bytes) = match split_request(request).await {
        Ok(parts) => parts,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return crate::Error::MalformedBody(error.to_string()).into_response();
        }
    };
    let body_text = String::from_utf8_lossy(&body_bytes);
    log_request(&headers, &redact_json_fields(&body_text));

    let request = Request::from_parts(headers, body_bytes.into());
    let response = next.run(request).await;

    let (headers, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return Response::from_parts(headers, axum::body::Body::empty());
        }
    };
    log_response(&headers, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(headers, body_bytes.into())
}

async fn split_request(
    request: Request,
) -> Result<(axum::http::request::Parts, axum::body::Bytes), axum::Error> {
    let (headers, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok((headers, body_bytes))
}

/// Replace the values of [REDACTED_FIELDS] in a JSON object with asterisks.
///
/// Text that is not a JSON object is returned unchanged.
fn redact_json_fields(body_text: &str) -> String {
    let Ok(Value::Object(mut object)) = serde_json::from_str::<Value>(body_text) else {
        return body_text.to_string();
    };

    let mut redacted = false;

    for field in REDACTED_FIELDS {
        if let Some(value) = object.get_mut(field) {
            *value = Value::String("********".to_owned());
            redacted = true;
        }
    }

    if redacted {
        Value::Object(object).to_string()
    } else {
        body_text.to_string()
    }
}

/// The maximum number of bytes of a request or response body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

fn truncate(body: &str) -> &str {
    let mut end = LOG_BODY_LENGTH_LIMIT;

    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn log_request(headers: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {:}...",
            headers.method,
            headers.uri,
            truncate(body)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            headers.method,
            headers.uri
        );
    }
}

fn log_response(headers: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {:}...",
            headers.status,
            truncate(body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", headers.status);
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use axum::{Json, Router, middleware, routing::post};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use super::{LOG_BODY_LENGTH_LIMIT, logging_middleware, redact_json_fields, truncate};

    #[test]
    fn redacts_token() {
        let got = redact_json_fields(r#"{"token":"secret-id-token"}"#);

        assert_eq!(got, r#"{"token":"********"}"#);
    }

    #[test]
    fn leaves_other_json_untouched() {
        let body = r#"{"description":"Rent","lines":[]}"#;

        assert_eq!(redact_json_fields(body), body);
    }

    #[test]
    fn leaves_non_json_untouched() {
        assert_eq!(redact_json_fields("token=abc"), "token=abc");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(LOG_BODY_LENGTH_LIMIT);

        let got = truncate(&body);

        assert!(got.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(body.starts_with(got));
    }

    #[tokio::test]
    async fn passes_body_through_to_handler() {
        let app = Router::new()
            .route("/echo", post(|Json(body): Json<Value>| async move { Json(body) }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app).expect("Could not create test server.");
        let body = json!({"token": "secret", "description": "x".repeat(100)});

        let response = server.post("/echo").json(&body).await;

        response.assert_status_ok();
        response.assert_json(&body);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn redacts_token_sent_without_json_content_type() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);
        let app = Router::new()
            .route("/sign-in", post(|_body: String| async { "ok" }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app).expect("Could not create test server.");

        server
            .post("/sign-in")
            .text(r#"{"token":"secret-id-token"}"#)
            .await
            .assert_status_ok();

        let logs = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("Received request"), "got logs {logs}");
        assert!(!logs.contains("secret-id-token"), "got logs {logs}");
    }
}
