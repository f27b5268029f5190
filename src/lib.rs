//! item-lookup library
//!
//! Exposes the lookup service and its HTTP router so the binary and the
//! integration tests build the same application.

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod data;
pub mod server;
pub mod service;
