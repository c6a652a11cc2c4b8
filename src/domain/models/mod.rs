pub mod salon;
pub mod user;
pub mod service;
pub mod staff;
pub mod appointment;
pub mod loyalty;
