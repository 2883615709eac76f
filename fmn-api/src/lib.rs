pub mod date_range;
pub mod error;
pub mod measure;
pub mod reading;
pub mod station;
