pub mod auth;
pub mod backend;
pub mod claims;
pub mod functions;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod stats;
pub mod store;

pub use backend::LocalBackend;
