//! Catalogue operation handlers.
//!
//! Query parameters and path captures are merged into one [`Params`] map
//! (path captures win) and handed to the dispatcher unchanged; the HTTP layer
//! does no validation of its own beyond decoding the request.

use crate::error::{AppError, EnvelopeResponse};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::Uri,
};
use notebridge_core::{AbortSignal, OperationKind, Params};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Run `kind` with the request's query string and path captures.
///
/// A client disconnect drops this future, which stops any aggregation at its
/// next await point.
pub async fn dispatch(
    state: AppState,
    kind: OperationKind,
    path: Option<Path<HashMap<String, String>>>,
    query: HashMap<String, String>,
) -> EnvelopeResponse {
    let mut params = Params::from_pairs(query);
    if let Some(Path(captures)) = path {
        params.extend(Params::from_pairs(captures));
    }
    let envelope = state
        .dispatcher
        .dispatch(kind, &params, &AbortSignal::never())
        .await;
    EnvelopeResponse(envelope)
}

/// `POST /api/set_cookies` with a JSON body `{"cookies": "..."}`.
///
/// # Errors
///
/// Returns a 422 [`AppError`] when the body is not a JSON object.
pub async fn set_cookies(
    State(state): State<AppState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<EnvelopeResponse, AppError> {
    let Json(body) = body.map_err(|rejection| AppError::validation("body", rejection.body_text()))?;
    let envelope = state
        .dispatcher
        .dispatch(
            OperationKind::SetCookies,
            &Params::from_object(body),
            &AbortSignal::never(),
        )
        .await;
    Ok(EnvelopeResponse(envelope))
}

/// Unknown routes.
#[allow(clippy::unused_async)]
pub async fn fallback(uri: Uri) -> AppError {
    AppError::not_found(uri.path())
}

