use chrono::NaiveDate;

use crate::error::Result;
use crate::models::report::RefreshSummary;
use crate::services::database::DatabaseService;

/// Moves every stale `next_payment` forward so stored renewal dates never
/// fall behind `today`.
pub async fn refresh_renewals(db: &DatabaseService, today: NaiveDate) -> Result<RefreshSummary> {
    log::info!("Refreshing renewal dates as of {}", today);

    let stale = db.stale_subscription_ids(today).await?;
    let mut summary = RefreshSummary::default();

    for subscription_id in stale {
        match db.refresh_next_payment(&subscription_id, today).await {
            Ok(true) => summary.updated += 1,
            Ok(false) => {}
            Err(e) => {
                log::error!("Failed to refresh subscription {}: {}", subscription_id, e);
                summary.errors += 1;
            }
        }
    }

    log::info!("Renewal refresh done: {} updated, {} errors", summary.updated, summary.errors);
    Ok(summary)
}
