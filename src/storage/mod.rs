pub mod file {
    pub mod atomic;
    pub mod file_heartbeat_store;
    pub mod file_target_store;
}
