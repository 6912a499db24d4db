// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the Caperone API.
//!
//! Handles GET /api/health, POST /api/contact, POST /api/quote,
//! POST /api/upload and GET /uploads/{name}.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, Path, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use caperone_core::validate::{validate_contact, validate_quote, Payload};
use caperone_core::{quote, ContactEntry, Notifier, PluginAdapter};

use crate::error::ApiError;
use crate::server::AppState;

/// Multipart field that carries the uploaded image.
pub const PHOTO_FIELD: &str = "photo";

/// Response body for GET /api/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Server time in milliseconds since the Unix epoch.
    pub ts: i64,
}

/// Response body for POST /api/contact.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub ok: bool,
    pub message: &'static str,
}

/// Response body for POST /api/quote.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub ok: bool,
    pub estimate: i64,
    pub currency: &'static str,
}

/// Response body for POST /api/upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub ok: bool,
    /// Public path of the stored file.
    pub file: String,
}

/// GET /api/health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        ts: chrono::Utc::now().timestamp_millis(),
    })
}

/// POST /api/contact
///
/// The submission is acknowledged once it is valid. A failed append or
/// notification is logged and never changes the response.
pub async fn post_contact(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ContactResponse>, ApiError> {
    let payload = parse_payload(&body)?;
    let submission = validate_contact(&payload).map_err(ApiError::Validation)?;
    let entry = ContactEntry::new(submission, chrono::Utc::now());

    match state.contacts.append(entry.clone()).await {
        Ok(()) => tracing::info!(email = %entry.email, "contact submission stored"),
        Err(e) => tracing::error!(
            error = %e,
            email = %entry.email,
            "failed to persist contact submission"
        ),
    }

    dispatch_notification(Arc::clone(&state.notifier), entry);

    Ok(Json(ContactResponse {
        ok: true,
        message: "Received",
    }))
}

/// POST /api/quote
pub async fn post_quote(body: Bytes) -> Result<Json<QuoteResponse>, ApiError> {
    let payload = parse_payload(&body)?;
    let request = validate_quote(&payload).map_err(ApiError::Validation)?;
    let result = quote::quote(&request);

    tracing::debug!(
        origin = %request.origin,
        destination = %request.destination,
        mode = %request.mode,
        estimate = result.estimate,
        "quote computed"
    );

    Ok(Json(QuoteResponse {
        ok: true,
        estimate: result.estimate,
        currency: result.currency,
    }))
}

/// POST /api/upload
///
/// Expects a multipart form with a file part named `photo`. A request that
/// is not multipart at all is treated the same as one without the file.
pub async fn post_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(%rejection, "upload without a multipart body");
        ApiError::MissingFile
    })?;

    let (original_name, bytes) = read_photo(&mut multipart)
        .await?
        .ok_or(ApiError::MissingFile)?;

    let asset = state.assets.store(&bytes, &original_name).await?;
    tracing::info!(
        original_name = %asset.original_name,
        stored_name = %asset.stored_name,
        size = bytes.len(),
        "upload accepted"
    );

    Ok(Json(UploadResponse {
        ok: true,
        file: asset.access_path,
    }))
}

/// GET /uploads/{name}
pub async fn get_upload(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Request,
) -> Response {
    let Some(path) = state.assets.resolve(&name).await else {
        return not_found().await.into_response();
    };
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// Plain-text 404 used when nothing else matches.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Parse a request body as a JSON payload.
///
/// An empty body or a JSON value that is not an object yields an empty
/// payload, so the validator reports every required field.
fn parse_payload(body: &[u8]) -> Result<Payload, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Payload::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Payload::new()),
        Err(e) => Err(ApiError::MalformedJson(e.to_string())),
    }
}

/// Find the first `photo` file part and read it fully.
async fn read_photo(multipart: &mut Multipart) -> Result<Option<(String, Bytes)>, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => return Err(multipart_error(e)),
        };

        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(Some((file_name, bytes)));
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::Multipart {
        status: err.status(),
        message: err.body_text(),
    }
}

/// Send the admin notification in the background.
fn dispatch_notification(notifier: Arc<dyn Notifier>, entry: ContactEntry) {
    if !notifier.is_enabled() {
        return;
    }
    tokio::spawn(async move {
        match notifier.notify(&entry).await {
            Ok(()) => tracing::info!(
                notifier = notifier.name(),
                email = %entry.email,
                "contact notification sent"
            ),
            Err(e) => tracing::warn!(
                notifier = notifier.name(),
                error = %e,
                "contact notification failed"
            ),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_an_empty_payload() {
        assert!(parse_payload(b"").unwrap().is_empty());
        assert!(parse_payload(b"  \n").unwrap().is_empty());
    }

    #[test]
    fn non_object_json_is_an_empty_payload() {
        assert!(parse_payload(b"[1,2,3]").unwrap().is_empty());
        assert!(parse_payload(b"\"hello\"").unwrap().is_empty());
        assert!(parse_payload(b"null").unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = parse_payload(b"{\"name\": ").unwrap_err();
        assert!(matches!(err, ApiError::MalformedJson(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn object_payload_is_kept() {
        let payload = parse_payload(br#"{"weight": 10, "mode": "sea"}"#).unwrap();
        assert_eq!(payload["weight"], 10);
        assert_eq!(payload["mode"], "sea");
    }

    #[tokio::test]
    async fn health_reports_current_time() {
        let before = chrono::Utc::now().timestamp_millis();
        let Json(health) = get_health().await;
        assert!(health.ok);
        assert!(health.ts >= before);
    }

    #[tokio::test]
    async fn quote_handler_prices_request() {
        let body = Bytes::from_static(br#"{"origin":"Mombasa","destination":"Kampala","weight":100,"mode":"air"}"#);
        let Json(response) = post_quote(body).await.unwrap();
        assert_eq!(response.estimate, 1800);
        assert_eq!(response.currency, "KSH");
    }

    #[tokio::test]
    async fn quote_handler_rejects_bad_mode() {
        let body = Bytes::from_static(br#"{"origin":"A","destination":"B","weight":1,"mode":"road"}"#);
        match post_quote(body).await.unwrap_err() {
            ApiError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "mode");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
