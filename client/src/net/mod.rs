//! Networking modules for the auth REST endpoints.
//!
//! SYSTEM CONTEXT
//! ==============
//! `backend` defines the async seam, `api` implements it over HTTP, `error`
//! owns status classification, and `types` defines the wire schema.

pub mod api;
pub mod backend;
pub mod error;
pub mod types;
