pub mod days;
pub mod format;
