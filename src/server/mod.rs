pub mod cluster_heartbeat;
pub mod loader;
pub mod server;
