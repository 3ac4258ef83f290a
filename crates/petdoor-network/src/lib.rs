//! Network boundary for the petdoor controller.
//!
//! This crate provides the outward-facing pieces of the controller:
//!
//! - **Control panel**: a small JSON HTTP API ([`create_router`],
//!   [`HttpServer`]) that calls into the shared door and reports its status
//! - **Network join**: [`join_with_retry`], which keeps joining the
//!   provisioned network until it succeeds
//!
//! The remote channel is unauthenticated; the panel is meant for a trusted
//! local network.
//!
//! # Example
//!
//! ```no_run
//! use petdoor_engine::{DoorController, SharedDoor};
//! use petdoor_hardware::mock::MockLatch;
//! use petdoor_network::{HttpServer, HttpServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (latch, _) = MockLatch::new();
//! let door = SharedDoor::new(DoorController::new(Box::new(latch)));
//!
//! let server = HttpServer::bind(HttpServerConfig {
//!     bind_addr: "127.0.0.1:8080".parse()?,
//! })
//! .await?;
//! server.serve(door, async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
mod error;
mod join;
mod server;

pub use api::{ApiError, ApiResult, ErrorResponse, create_router};
pub use error::{NetworkError, NetworkResult};
pub use join::join_with_retry;
pub use server::{HttpServer, HttpServerConfig};
