pub mod heartbeat;
pub mod local;
pub mod membership_impl;
