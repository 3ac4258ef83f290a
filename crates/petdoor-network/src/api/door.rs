//! Door control endpoints.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use petdoor_core::LockSource;
use petdoor_engine::{CloseReason, OpenOutcome, SharedDoor, StatusSnapshot};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};

/// Creates the door router.
pub fn router() -> Router<SharedDoor> {
    Router::new()
        .route("/status", get(status))
        .route("/lock", post(lock))
        .route("/unlock", post(unlock))
        .route("/open", post(open))
        .route("/close", post(close))
        .route("/threshold/up", post(threshold_up))
        .route("/threshold/down", post(threshold_down))
}

pub async fn status(State(door): State<SharedDoor>) -> Json<StatusSnapshot> {
    Json(door.snapshot())
}

pub async fn lock(State(door): State<SharedDoor>) -> Json<StatusSnapshot> {
    let state = door.lock(LockSource::Remote);
    info!(%state, "remote lock requested");
    Json(door.snapshot())
}

pub async fn unlock(State(door): State<SharedDoor>) -> Json<StatusSnapshot> {
    let state = door.unlock(LockSource::Remote);
    info!(%state, "remote unlock requested");
    Json(door.snapshot())
}

pub async fn open(State(door): State<SharedDoor>) -> ApiResult<Json<StatusSnapshot>> {
    match door.open_door()? {
        OpenOutcome::Opened => Ok(Json(door.snapshot())),
        OpenOutcome::Rejected(reason) => {
            let snapshot = door.snapshot();
            Err(ApiError::open_rejected(reason, snapshot.lock_state))
        }
    }
}

pub async fn close(State(door): State<SharedDoor>) -> ApiResult<Json<StatusSnapshot>> {
    door.close_door(CloseReason::Requested)?;
    Ok(Json(door.snapshot()))
}

pub async fn threshold_up(State(door): State<SharedDoor>) -> Json<StatusSnapshot> {
    door.raise_threshold();
    Json(door.snapshot())
}

pub async fn threshold_down(State(door): State<SharedDoor>) -> Json<StatusSnapshot> {
    door.lower_threshold();
    Json(door.snapshot())
}
