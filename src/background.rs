use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, info_span, Instrument};

use crate::domain::services::birthday::run_birthday_credits;
use crate::state::AppState;

/// Periodic sweep that credits birthday bonuses for every salon. Each salon
/// is processed independently so one bad timezone or config cannot stall the
/// rest.
pub async fn start_birthday_worker(state: Arc<AppState>) {
    let interval = Duration::from_secs(state.config.birthday_sweep_interval_secs);
    info!("Birthday worker started (interval: {:?})", interval);
    loop {
        tokio::time::sleep(interval).await;
        sweep_all_salons(&state)
            .instrument(info_span!("birthday_sweep"))
            .await;
    }
}

async fn sweep_all_salons(state: &AppState) {
    let salons = match state.salon_repo.list_all().await {
        Ok(salons) => salons,
        Err(e) => {
            error!("Failed to list salons for birthday sweep: {}", e);
            return;
        }
    };

    for salon in salons {
        let config = match state.loyalty_repo.get_config(&salon.id).await {
            Ok(Some(config)) => config,
            Ok(None) => continue,
            Err(e) => {
                error!("Failed to load loyalty config for salon {}: {}", salon.id, e);
                continue;
            }
        };

        match run_birthday_credits(&salon, &config, state.user_repo.as_ref(), state.loyalty_repo.as_ref()).await {
            Ok(0) => {}
            Ok(credited) => info!("Salon {}: credited {} birthday bonuses", salon.id, credited),
            Err(e) => error!("Birthday sweep failed for salon {}: {}", salon.id, e),
        }
    }
}
