pub mod availability;
pub mod games;
pub mod gamenight;
