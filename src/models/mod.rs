pub mod hours_doc;
pub mod identity;
pub mod presence;
pub mod profile;
