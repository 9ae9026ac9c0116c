//! Module for course catalog API endpoints.
//!
//! This module handles the public course browsing endpoints and the
//! admin-only course management operations.

pub mod handlers;
pub mod routes;
