//! HTTP endpoint.
//!
//! | Route | |
//! |---|---|
//! | `GET /` | plain-text usage banner |
//! | `POST /code/` | render; body is the options object or an `args` envelope |
//! | `GET /assets/*` | static files from the asset root |
//!
//! A successful render answers `200` with content type `image/png;base64`
//! and the base64-encoded PNG as body. Failures answer
//! `{"success": false, "reason": "..."}`, with `400` for problems with the
//! request and `500` for everything else.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use log::{info, warn};
use serde::Serialize;
use serde_json::{Map, Value};
use tower_http::services::ServeDir;

use crate::error::Error;
use crate::renderer::{Renderer, encode_png};

/// Default cap on request bodies.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

const BANNER: &str = "snippet-renderer\n\n\
POST /code/ with a JSON object of render options (at least `tab_name` and `code`),\n\
or with {\"args\": \"<options as JSON, comments allowed>\", \"code\": \"...\"}.\n\
The response body is the base64-encoded PNG.\n";

/// Builds the application router.
///
/// Static assets are served from the renderer's asset root.
pub fn router(renderer: Arc<Renderer>, max_body_bytes: usize) -> Router {
    let assets = ServeDir::new(&renderer.resolver().settings().asset_root);
    Router::new()
        .route("/", get(index))
        .route("/code/", post(render_code))
        .nest_service("/assets", assets)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(renderer)
}

async fn index() -> &'static str {
    BANNER
}

async fn render_code(State(renderer): State<Arc<Renderer>>, body: Bytes) -> Response {
    let options = match parse_request(&body) {
        Ok(options) => options,
        Err(reason) => return failure(StatusCode::BAD_REQUEST, reason),
    };

    match generate(&renderer, &options).await {
        Ok(png) => {
            info!("Rendered {} byte PNG", png.len());
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "image/png;base64")],
                STANDARD.encode(png),
            )
                .into_response()
        }
        Err((status, reason)) => failure(status, reason),
    }
}

async fn generate(
    renderer: &Renderer,
    options: &Map<String, Value>,
) -> Result<Vec<u8>, (StatusCode, String)> {
    let describe = |e: Error| {
        let status = if e.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, format!("Error when generating the image : {e}"))
    };

    let prepared = renderer.prepare(options).await.map_err(describe)?;
    let image = tokio::task::spawn_blocking(move || prepared.compose())
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error when generating the image : {e}"),
            )
        })?;
    encode_png(&image).map_err(describe)
}

/// Extracts the options object from a request body.
///
/// With an `args` envelope, `args` is parsed as JSON with comments and the
/// envelope's `code` replaces any `code` it contains.
fn parse_request(body: &[u8]) -> Result<Map<String, Value>, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err("Json content not found".to_string());
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|e| format!("Error during json parsing : {e}"))?;
    let Value::Object(mut request) = value else {
        return Err("Json content not found".to_string());
    };

    let Some(args) = request.remove("args") else {
        return Ok(request);
    };
    let Value::String(args) = args else {
        return Err("Error during json parsing : `args` must be a string".to_string());
    };
    let stripped = json_comments::StripComments::new(args.as_bytes());
    let mut options = match serde_json::from_reader::<_, Value>(stripped) {
        Ok(Value::Object(options)) => options,
        Ok(_) => return Err("Error during json parsing : `args` must be an object".to_string()),
        Err(e) => return Err(format!("Error during json parsing : {e}")),
    };
    options.insert(
        "code".to_string(),
        request.remove("code").unwrap_or(Value::Null),
    );
    Ok(options)
}

/// Body of every failed request.
#[derive(Debug, Serialize)]
struct Failure {
    success: bool,
    reason: String,
}

fn failure(status: StatusCode, reason: String) -> Response {
    warn!("Request failed with {status}: {reason}");
    let body = Failure {
        success: false,
        reason,
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_objects_pass_through() {
        let options = parse_request(br#"{"tab_name": "a.py", "code": "x"}"#).unwrap();
        assert_eq!(options["tab_name"], "a.py");
        assert_eq!(options["code"], "x");
    }

    #[test]
    fn envelope_strips_comments_and_merges_code() {
        let body = json!({
            "args": "{\n  // file name\n  \"tab_name\": \"a.py\", /* block */ \"code\": \"ignored\"\n}",
            "code": "print(1)",
        });
        let options = parse_request(body.to_string().as_bytes()).unwrap();
        assert_eq!(options["tab_name"], "a.py");
        assert_eq!(options["code"], "print(1)");
    }

    #[test]
    fn envelope_without_code_leaves_code_null() {
        let body = json!({"args": "{\"tab_name\": \"a.py\"}"});
        let options = parse_request(body.to_string().as_bytes()).unwrap();
        assert_eq!(options["code"], Value::Null);
    }

    #[test]
    fn malformed_bodies() {
        assert_eq!(parse_request(b"").unwrap_err(), "Json content not found");
        assert_eq!(parse_request(b"[1, 2]").unwrap_err(), "Json content not found");
        assert!(parse_request(b"{nope").unwrap_err().starts_with("Error during json parsing : "));
        let bad_args = json!({"args": "{\"tab_name\": "});
        assert!(
            parse_request(bad_args.to_string().as_bytes())
                .unwrap_err()
                .starts_with("Error during json parsing : ")
        );
    }
}
