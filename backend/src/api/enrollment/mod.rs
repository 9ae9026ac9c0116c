//! Module for enrollment API endpoints.
//!
//! This module handles enrolling into courses, reporting progress, and
//! checking enrollment state. Every endpoint operates on the signed-in
//! user's own records.

pub mod handlers;
pub mod routes;
