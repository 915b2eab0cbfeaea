//! Expiry sweeper implementation

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

use mt_shared::config::SweeperConfig;

use crate::errors::DomainError;
use crate::repositories::MedicineRepository;

/// Marks overdue listings as expired
pub struct ExpirySweeper {
    repository: Arc<dyn MedicineRepository>,
    config: SweeperConfig,
}

impl ExpirySweeper {
    pub fn new(repository: Arc<dyn MedicineRepository>, config: SweeperConfig) -> Self {
        Self { repository, config }
    }

    /// Run a single sweep against the current time
    pub async fn run_sweep(&self) -> Result<SweepResult, DomainError> {
        self.run_sweep_at(Utc::now()).await
    }

    /// Run a single sweep as of `now`.
    ///
    /// Idempotent: a second run with nothing newly overdue changes no rows.
    pub async fn run_sweep_at(&self, now: DateTime<Utc>) -> Result<SweepResult, DomainError> {
        if !self.config.enabled {
            return Ok(SweepResult::default());
        }

        let expired = self.repository.expire_overdue(now).await?;
        if expired > 0 {
            info!("Expiry sweep marked {} medicines as expired", expired);
        } else {
            info!("Expiry sweep found no overdue medicines");
        }

        Ok(SweepResult { expired, swept_at: Some(now) })
    }

    /// Start the sweep as a background task
    ///
    /// This spawns a tokio task that sweeps at regular intervals, starting
    /// immediately. A failed run is logged and the loop continues.
    pub fn start_background_task(self: Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Expiry sweeper is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                "Expiry sweeper started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_sweep().await {
                    error!("Expiry sweep failed: {}", e);
                }
            }
        }))
    }
}

/// Result of a sweep
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepResult {
    /// Number of listings moved to expired
    pub expired: u64,
    /// Reference time of the sweep; `None` when the sweeper is disabled
    pub swept_at: Option<DateTime<Utc>>,
}
