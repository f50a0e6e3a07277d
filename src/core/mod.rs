pub mod admin;
pub mod calendar;
pub mod heartbeat;
pub mod hours;
pub mod log;
pub mod projector;
pub mod session;
pub mod status;
