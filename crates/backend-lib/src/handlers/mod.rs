// crates/backend-lib/src/handlers/mod.rs

//! HTTP request handlers for the `OpenEstate` auth server.

pub mod auth;
