#![allow(clippy::async_fn_in_trait)]
pub mod common;
pub mod membership;
pub mod server;
pub mod storage;
pub mod sync;
pub mod traits;

pub use server::server::server_start;
pub use sync::start_target_sync;
