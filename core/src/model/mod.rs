pub mod calendar;
pub mod chapter;
