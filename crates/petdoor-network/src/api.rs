//! HTTP control panel routes.
//!
//! The panel is a thin boundary: every handler calls one operation on the
//! shared door and returns the resulting status snapshot as JSON.
//!
//! # Route Structure
//!
//! ```text
//! /health                   - Health check
//! /api
//! ├── GET  /status          - Status snapshot
//! ├── POST /lock            - Assert the remote lock
//! ├── POST /unlock          - Retract the remote lock
//! ├── POST /open            - Open the door (409 if locked or open)
//! ├── POST /close           - Close the door
//! ├── POST /threshold/up    - Override threshold +1
//! └── POST /threshold/down  - Override threshold -1
//! ```

use axum::Router;
use axum::routing::get;
use petdoor_engine::SharedDoor;

pub mod door;
pub mod error;
pub mod health;

pub use error::{ApiError, ApiResult, ErrorResponse};

/// Creates the combined router with all endpoints.
pub fn create_router(door: SharedDoor) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", door::router())
        .with_state(door)
}
