//! Qatar tenders backend
//!
//! HTTP API for publishing tenders and collecting bids, persisted in a
//! document store.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod store;
