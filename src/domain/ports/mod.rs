use crate::domain::models::{
    salon::Salon,
    user::User,
    service::Service,
    staff::{Staff, StaffWithUser},
    appointment::{Appointment, AppointmentFilter, ServicePopularity, StaffProduction, StatusCount},
    loyalty::{LoyaltyAccount, LoyaltyConfig, PointsEconomy, PointsTransaction},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait SalonRepository: Send + Sync {
    /// Creates the salon together with its default loyalty config row.
    async fn create(&self, salon: &Salon, config: &LoyaltyConfig) -> Result<Salon, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Salon>, AppError>;
    async fn list_all(&self) -> Result<Vec<Salon>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Registers a client and its loyalty account as one unit.
    async fn create_client(&self, user: &User, account: &LoyaltyAccount) -> Result<User, AppError>;
    async fn find_by_id(&self, salon_id: &str, id: &str) -> Result<Option<User>, AppError>;
    async fn list_clients(&self, salon_id: &str, search: Option<&str>) -> Result<Vec<User>, AppError>;
    async fn list_clients_with_dob(&self, salon_id: &str) -> Result<Vec<User>, AppError>;
    /// Client head count, optionally restricted to registrations after `since`.
    async fn count_clients(&self, salon_id: &str, since: Option<DateTime<Utc>>) -> Result<i64, AppError>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn create(&self, service: &Service) -> Result<Service, AppError>;
    async fn find_by_id(&self, salon_id: &str, id: &str) -> Result<Option<Service>, AppError>;
    async fn list_active(&self, salon_id: &str) -> Result<Vec<Service>, AppError>;
    async fn update(&self, service: &Service) -> Result<Service, AppError>;
}

#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Creates the staff member, its user identity, and capability links in
    /// one transaction.
    async fn create_with_user(&self, staff: &Staff, user: &User, service_ids: &[String]) -> Result<Staff, AppError>;
    async fn find_by_id(&self, salon_id: &str, id: &str) -> Result<Option<Staff>, AppError>;
    /// Lists staff, optionally restricted to those capable of a service.
    async fn list(&self, salon_id: &str, service_id: Option<&str>) -> Result<Vec<StaffWithUser>, AppError>;
    async fn update(&self, staff: &Staff) -> Result<Staff, AppError>;
    async fn set_services(&self, staff_id: &str, service_ids: &[String]) -> Result<(), AppError>;
    async fn is_capable(&self, staff_id: &str, service_id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Inserts the appointment after running both conflict checks, and when
    /// `redemption` is given also applies the balance-guarded points debit —
    /// all inside a single transaction.
    async fn create_with_redemption(
        &self,
        appointment: &Appointment,
        redemption: Option<&PointsTransaction>,
    ) -> Result<Appointment, AppError>;
    async fn find_by_id(&self, salon_id: &str, id: &str) -> Result<Option<Appointment>, AppError>;
    async fn list_filtered(&self, salon_id: &str, filter: &AppointmentFilter) -> Result<Vec<Appointment>, AppError>;
    /// Compare-and-set status write: succeeds only if the current status is
    /// one of `allowed_from`, returning the updated row. `None` means the
    /// row was not in an eligible state (or does not exist). The accompanying
    /// `credits` (earned points, bonuses, refunds) are applied in the same
    /// transaction as the status write, and only when the CAS wins, so a
    /// terminal status and its ledger entries land together or not at all.
    async fn transition(
        &self,
        salon_id: &str,
        id: &str,
        new_status: &str,
        allowed_from: &[&str],
        credits: &[PointsTransaction],
    ) -> Result<Option<Appointment>, AppError>;
    async fn has_recent_completed(
        &self,
        salon_id: &str,
        client_id: &str,
        exclude_id: &str,
        since: DateTime<Utc>,
    ) -> Result<bool, AppError>;
    /// Pending/confirmed appointments for one staff member in a window.
    async fn list_active_for_staff(
        &self,
        staff_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, AppError>;
    async fn list_recent_for_client(&self, salon_id: &str, client_id: &str, limit: i64) -> Result<Vec<Appointment>, AppError>;
    /// (total, count) of snapshotted prices of completed appointments since a cutoff.
    async fn completed_revenue_since(&self, salon_id: &str, since: DateTime<Utc>) -> Result<(i64, i64), AppError>;
    /// Most-completed services, all time, joined with the catalog row.
    async fn top_services(&self, salon_id: &str, limit: i64) -> Result<Vec<ServicePopularity>, AppError>;
    async fn status_breakdown(&self, salon_id: &str, since: DateTime<Utc>) -> Result<Vec<StatusCount>, AppError>;
    /// Completed count and snapshot revenue per staff member since a cutoff.
    async fn staff_performance(&self, salon_id: &str, since: DateTime<Utc>) -> Result<Vec<StaffProduction>, AppError>;
}

#[async_trait]
pub trait LoyaltyRepository: Send + Sync {
    async fn find_account(&self, salon_id: &str, client_id: &str) -> Result<Option<LoyaltyAccount>, AppError>;
    async fn list_transactions(&self, account_id: &str, limit: i64) -> Result<Vec<PointsTransaction>, AppError>;
    /// Applies a positive ledger entry: balance increment, lifetime-earned
    /// increment for earning types, and the transaction row, atomically.
    async fn credit(&self, entry: &PointsTransaction) -> Result<LoyaltyAccount, AppError>;
    /// Applies a negative ledger entry (entry.amount < 0). Fails with
    /// `InsufficientBalance` without changing state if the balance would go
    /// negative. Never touches lifetime_earned.
    async fn debit(&self, entry: &PointsTransaction) -> Result<LoyaltyAccount, AppError>;
    async fn get_config(&self, salon_id: &str) -> Result<Option<LoyaltyConfig>, AppError>;
    async fn upsert_config(&self, config: &LoyaltyConfig) -> Result<LoyaltyConfig, AppError>;
    async fn has_birthday_credit_since(&self, account_id: &str, since: DateTime<Utc>) -> Result<bool, AppError>;
    async fn points_economy(&self, salon_id: &str) -> Result<PointsEconomy, AppError>;
}
