pub mod auth;
pub mod salon;
