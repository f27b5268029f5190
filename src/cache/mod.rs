//! Cache module for storing normalized items on disk
//!
//! This module provides a flat, file-per-identifier cache. It is an
//! optimization only: every failure it reports is absorbed by the caller and
//! the lookup falls back to the remote catalog.

mod manager;

pub use manager::{CacheError, CacheManager, CachedItem};
