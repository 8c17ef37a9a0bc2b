use anyhow::Result;
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::warn;

use super::{AppMode, AppState};
use crate::app::events::{AppEvent, schedule_retry};

impl AppState {
    /// Requests current conditions for the configured location, unless one is already in flight.
    pub(crate) async fn start_fetch(&mut self, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        if self.fetch_in_flight {
            return Ok(());
        }
        let Some(location) = self.location.clone() else {
            return Ok(());
        };
        self.fetch_in_flight = true;
        tx.send(AppEvent::FetchStarted).await?;

        let client = self.forecast.clone();
        let tx2 = tx.clone();
        tokio::spawn(async move {
            match client.fetch_current(location).await {
                Ok(current) => {
                    let _ = tx2.send(AppEvent::FetchSucceeded(current)).await;
                }
                Err(err) => {
                    let _ = tx2.send(AppEvent::FetchFailed(format!("{err:#}"))).await;
                }
            }
        });
        Ok(())
    }

    pub(crate) fn handle_fetch_started(&mut self) {
        self.fetch_in_flight = true;
        if self.live.is_none() {
            self.mode = AppMode::Loading;
        }
        self.refresh_meta.last_attempt = Some(Utc::now());
    }

    pub(crate) fn handle_fetch_failed(&mut self, tx: &mpsc::Sender<AppEvent>, err: String) {
        self.fetch_in_flight = false;
        self.refresh_meta.mark_failure();
        let delay = self.backoff.next_delay();
        warn!(
            error = %err,
            failures = self.refresh_meta.consecutive_failures,
            attempt = self.backoff.attempts(),
            retry_in_secs = delay,
            "forecast fetch failed"
        );
        self.last_error = Some(err);
        if self.live.is_none() {
            self.mode = AppMode::Error;
        }
        schedule_retry(tx.clone(), delay);
    }
}
