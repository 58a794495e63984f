//! # Freight matching server
//! This crate hosts the HTTP server for the freight matching marketplace. It is responsible for:
//! * Identifying the caller from the headers forwarded by the authenticating gateway, and enforcing role access.
//! * Unpacking requests and handing them to the workflow APIs in `freight_engine`.
//! * Mapping workflow failures to HTTP status codes and JSON error bodies.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! Public routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/register`: Registers a shipper or carrier account.
//!
//! Every other route lives under `/api` and requires the `fms_account_id` and `fms_account_role` headers. See
//! [routes](routes/index.html) for the full list.

pub mod auth;
pub mod cli;
pub mod config;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
