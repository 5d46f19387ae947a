//! Tiered cache for feed views
//!
//! This module provides the window-keyed cache serving repeat feed queries:
//! - `CacheStore` - Key/value persistence trait, with disk and in-memory impls
//! - `CacheEntry` - One stored, serialized view with its write time
//! - `CacheManager` - Freshness, hierarchical reuse, admission, and quota policy

pub mod entry;
pub mod manager;
pub mod store;

pub use entry::CacheEntry;
pub use manager::{Admission, CacheManager, CacheStatus};
pub use store::{CacheStore, DiskCacheStore, MemoryCacheStore};
