pub mod analytics;
pub mod appointment;
pub mod client;
pub mod health;
pub mod loyalty;
pub mod salon;
pub mod service;
pub mod staff;
