pub mod core;
pub mod directory;
pub mod source;
pub mod classify;
pub mod aggregate;
pub mod cache;
pub mod feed;

// Optional components
pub mod logging;
