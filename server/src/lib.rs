//! REST backend for developer-conference events and their speakers.

pub mod config;
pub mod handlers;
pub mod mapping;
pub mod models;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod state;
pub mod storage;
pub mod utils;
