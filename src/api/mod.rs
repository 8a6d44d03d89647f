//! REST API module
//!
//! Exposes the advisor over HTTP. Every session owns its own advisor.
//!
//! # Endpoints
//!
//! ## Recommendation
//! - `POST /api/recommend` - Recommend an M-of-N configuration
//!
//! ## Sessions
//! - `GET /api/sessions` - List sessions
//! - `POST /api/sessions` - Start a session
//! - `GET /api/sessions/{id}` - Session details
//! - `DELETE /api/sessions/{id}` - End a session
//! - `PUT /api/sessions/{id}/config` - Reset to a new configuration
//! - `PUT /api/sessions/{id}/distribution` - Store the key distribution
//! - `POST /api/sessions/{id}/validate` - Validate a proposed distribution
//! - `GET /api/sessions/{id}/score` - Security score
//! - `GET /api/sessions/{id}/summary` - Configuration summary
//! - `POST /api/sessions/{id}/keys/{key}/sign` - Simulate a signature

pub mod handlers;
pub mod routes;

pub use handlers::ApiState;
pub use routes::{create_router, ENDPOINTS};
