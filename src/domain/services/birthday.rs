use chrono::{DateTime, Datelike, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::domain::models::loyalty::{LoyaltyConfig, PointsTransaction, TX_BIRTHDAY};
use crate::domain::models::salon::Salon;
use crate::domain::ports::{LoyaltyRepository, UserRepository};
use crate::error::AppError;

/// Start of the current calendar year in the salon's timezone, as UTC. The
/// "already credited this year" guard uses this boundary so a New Year's Eve
/// run in a west-of-UTC salon cannot mis-credit.
pub fn year_start_utc(tz: Tz, year: i32) -> DateTime<Utc> {
    tz.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap())
}

/// Credits the birthday bonus to every client of the salon whose birth month
/// is the current month (salon-local) and who has not received a `birthday`
/// transaction since the start of the salon-local year. Safe to re-run
/// within the same month.
pub async fn run_birthday_credits(
    salon: &Salon,
    config: &LoyaltyConfig,
    user_repo: &dyn UserRepository,
    loyalty_repo: &dyn LoyaltyRepository,
) -> Result<u64, AppError> {
    if config.birthday_bonus <= 0 {
        return Ok(0);
    }

    let tz: Tz = salon.timezone.parse().unwrap_or(chrono_tz::UTC);
    let now_local = Utc::now().with_timezone(&tz);
    let current_month = now_local.month();
    let since = year_start_utc(tz, now_local.year());

    let clients = user_repo.list_clients_with_dob(&salon.id).await?;

    let mut credited = 0u64;
    for client in clients {
        let Some(dob) = client.dob else { continue };
        if dob.month() != current_month {
            continue;
        }

        let Some(account) = loyalty_repo.find_account(&salon.id, &client.id).await? else {
            warn!("Client {} has a birthday this month but no loyalty account", client.id);
            continue;
        };

        if loyalty_repo.has_birthday_credit_since(&account.id, since).await? {
            continue;
        }

        let entry = PointsTransaction::credit(
            account.id.clone(),
            config.birthday_bonus,
            TX_BIRTHDAY,
            None,
            format!("Happy Birthday! {} bonus points", config.birthday_bonus),
        );
        loyalty_repo.credit(&entry).await?;
        info!("Credited {} birthday points to client {}", config.birthday_bonus, client.id);
        credited += 1;
    }

    Ok(credited)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_start_respects_salon_timezone() {
        let jnb: Tz = "Africa/Johannesburg".parse().unwrap();
        let start = year_start_utc(jnb, 2026);
        // Johannesburg is UTC+2, so its year starts two hours before UTC's.
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 12, 31, 22, 0, 0).unwrap());
    }

    #[test]
    fn year_start_utc_fallback() {
        let utc: Tz = "UTC".parse().unwrap();
        assert_eq!(year_start_utc(utc, 2026), Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }
}
