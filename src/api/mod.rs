//! API module for the HTTP request layer
//!
//! Decodes requests into validated calls on the [`EventService`](crate::service::EventService)
//! and feeds reminder tasks into the scheduler's intake queue.

pub mod http;
pub mod middleware;
pub mod rest;
pub mod state;

pub use http::create_router;
pub use state::AppState;
