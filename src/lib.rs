pub mod config;
pub mod content;
pub mod identity;
pub mod session;
