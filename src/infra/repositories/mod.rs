pub mod sqlite_salon_repo;
pub mod sqlite_user_repo;
pub mod sqlite_service_repo;
pub mod sqlite_staff_repo;
pub mod sqlite_appointment_repo;
pub mod sqlite_loyalty_repo;

pub mod postgres_salon_repo;
pub mod postgres_user_repo;
pub mod postgres_service_repo;
pub mod postgres_staff_repo;
pub mod postgres_appointment_repo;
pub mod postgres_loyalty_repo;
