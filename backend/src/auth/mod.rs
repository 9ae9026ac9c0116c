//! Authentication module for managing user accounts, sessions, and access control.
//!
//! This module provides the public interface for authentication-related
//! functionality such as signup, login, session cookies, and authorization
//! middleware.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
