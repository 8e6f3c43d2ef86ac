//! # Periodic sweeping.
//!
//! [`Registrar::run`] ticks every `Config::sweep_interval_secs` and calls
//! [`Registrar::sweep`] until the token is cancelled, then writes a final
//! snapshot.
//!
//! ```text
//! run(token)
//!   loop select!
//!     ├─ token.cancelled() ─► break
//!     └─ interval.tick()   ─► sweep() ─► Expired | Promoted | Idle
//!   flush()
//! ```
//!
//! With `sweep_interval_secs == 0` no sweep runs; `run` just waits for the token.

use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::registrar::{Registrar, SweepOutcome};

impl Registrar {
    /// Drives periodic sweeps until `token` is cancelled.
    pub async fn run(&self, token: CancellationToken) {
        match self.config().sweep_interval() {
            Some(period) => {
                let mut ticks = time::interval_at(time::Instant::now() + period, period);
                ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = ticks.tick() => self.sweep_once().await,
                    }
                }
            }
            None => token.cancelled().await,
        }
        info!("sweeper stopped");
        self.flush().await;
    }

    async fn sweep_once(&self) {
        match self.sweep().await {
            Ok(SweepOutcome::Idle) => {}
            Ok(SweepOutcome::Expired(info)) => info!(title = %info.title, "sweep removed expired event"),
            Ok(SweepOutcome::Promoted(promoted)) => {
                debug!(promoted = promoted.len(), "sweep finished");
            }
            Err(e) => warn!(error = %e, label = e.as_label(), "sweep failed"),
        }
    }
}
