//! Web layer for the transit lookup service.
//!
//! Provides HTTP endpoints for route lookup and live bus updates.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
