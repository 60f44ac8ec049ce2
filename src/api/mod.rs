//! HTTP API for the realty service.
//!
//! Browser clients post questions to `analyze` and fetch CSV exports from
//! `download`.

mod handlers;
mod rest;

pub use handlers::*;
pub use rest::*;
