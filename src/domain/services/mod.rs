pub mod scheduling;
pub mod points;
pub mod birthday;
