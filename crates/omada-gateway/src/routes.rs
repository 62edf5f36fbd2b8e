use std::future::Future;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::Uri;
use tracing::debug;

use omada_core::{CancellationToken, CoreError, WifiPatch};

use crate::error::ApiError;
use crate::response::{Data, Health, WifiUpdated, WifiView};
use crate::server::AppState;

/// Run a pipeline on its own task. Dropping the handler (client gone)
/// cancels `cancel`, which stops the pipeline at its next controller call.
async fn detached<T, F>(cancel: CancellationToken, fut: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, CoreError>> + Send + 'static,
    T: Send + 'static,
{
    let _guard = cancel.drop_guard();
    match tokio::spawn(fut).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => Err(ApiError::Internal(e.to_string())),
    }
}

/// `POST /api/v1/networks/wifis/{ssid}`
pub async fn update_wifi(
    State(state): State<AppState>,
    Path(ssid): Path<String>,
    payload: Result<Json<WifiPatch>, JsonRejection>,
) -> Result<Json<Data<WifiUpdated>>, ApiError> {
    let Json(patch) = payload?;
    debug!(%ssid, ?patch, "wifi update requested");

    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let pipeline = state.pipeline.clone();
    let outcome = detached(cancel, async move {
        pipeline.update_wifi(&ssid, &patch, &token).await
    })
    .await?;

    Ok(Json(Data::new(outcome.into())))
}

/// `GET /api/v1/networks/wifis/{ssid}`
pub async fn read_wifi(
    State(state): State<AppState>,
    Path(ssid): Path<String>,
) -> Result<Json<Data<WifiView>>, ApiError> {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let pipeline = state.pipeline.clone();
    let wifi = detached(cancel, async move { pipeline.read_wifi(&ssid, &token).await }).await?;

    Ok(Json(Data::new(wifi.into())))
}

/// `/api/v1/networks/wifis` without an SSID segment.
pub async fn missing_ssid() -> ApiError {
    ApiError::BadRequest("ssid path parameter is required".into())
}

/// `GET /healthz`
pub async fn healthz() -> Json<Data<Health>> {
    Json(Data::new(Health { status: "ok" }))
}

pub async fn fallback(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
