//! Port traits between the journal domain and the outside world.

pub mod config_port;
pub mod mapper_port;
pub mod store_port;
