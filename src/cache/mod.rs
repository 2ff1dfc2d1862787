// Cache module - cross-compilation metadata sharing

pub mod manager;
pub mod signature;

pub use manager::CacheManager;
pub use signature::{cache_signature, file_signature, UNKNOWN_SOURCE_PATH};
