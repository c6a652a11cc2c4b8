use std::sync::Arc;

use crate::config::Config;
use crate::domain::ports::{
    AppointmentRepository, LoyaltyRepository, SalonRepository, ServiceRepository, StaffRepository,
    UserRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub salon_repo: Arc<dyn SalonRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub service_repo: Arc<dyn ServiceRepository>,
    pub staff_repo: Arc<dyn StaffRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub loyalty_repo: Arc<dyn LoyaltyRepository>,
}
