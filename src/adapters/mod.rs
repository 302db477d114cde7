//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod mapping;
#[cfg(feature = "sqlite")]
pub mod sqlite_store;
pub mod tlg_adapter;
