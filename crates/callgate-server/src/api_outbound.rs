use crate::error::CallError;
use crate::AppState;
use axum::{extract::Extension, Json};
use callgate_dispatch::DispatchOutcome;
use std::sync::Arc;
use tracing::error;

/// Handler for `POST /outbound`.
///
/// Dials the next contact in the roster. Responds with the call reference,
/// the number dialled and its roster position.
pub async fn outbound_call_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<DispatchOutcome>, CallError> {
    let outcome = state.dispatcher.dispatch_next().await.map_err(|err| {
        let err = CallError::from(err);
        error!(
            error = %err,
            raw_body = err.raw_body().unwrap_or_default(),
            "outbound dispatch failed"
        );
        err
    })?;

    Ok(Json(outcome))
}
