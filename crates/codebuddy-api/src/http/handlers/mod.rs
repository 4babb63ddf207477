//! HTTP request handlers.

pub mod export;
pub mod health;
pub mod page;
pub mod session;

use uuid::Uuid;

use codebuddy_core::session::SharedSession;

use crate::http::error::AppError;
use crate::state::AppState;

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// Look up a session by its path parameter.
fn find_session(state: &AppState, id: &str) -> Result<(Uuid, SharedSession), AppError> {
    let uuid = parse_uuid(id)?;
    state
        .sessions
        .get(&uuid)
        .map(|session| (uuid, session))
        .ok_or_else(|| AppError::NotFound(id.to_string()))
}
