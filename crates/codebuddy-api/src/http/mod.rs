//! HTTP layer for CodeBuddy.
//!
//! Two surfaces over the same session registry: a server-rendered page at `/`
//! (forms, redirects, downloads) and a JSON API at `/api/v1/` using the
//! envelope response format.

pub mod error;
pub mod handlers;
pub mod page;
pub mod response;
pub mod router;
