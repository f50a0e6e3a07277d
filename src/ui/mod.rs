pub mod calendar;
pub mod directory;
pub mod messages;
pub mod summary;
