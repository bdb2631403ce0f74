pub mod backup;
pub mod config;
pub mod confirm;
pub mod file_store;
pub mod project;
pub mod template;
