//! Periodic archival of old events

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

use super::{stop_requested, WorkerControl};
use crate::event_store::EventRepository;
use crate::logging::Logger;
use crate::types::ShutdownError;

/// Archives events whose date falls before `now - retention`.
///
/// Sweeps once on start and then once per `interval` until stopped.
pub struct ArchivalWorker {
    sweeper: Arc<Sweeper>,
    interval: Duration,
    control: WorkerControl,
}

impl ArchivalWorker {
    pub fn new(
        store: Arc<dyn EventRepository>,
        logger: Logger,
        interval: Duration,
        retention: Duration,
    ) -> Self {
        Self {
            sweeper: Arc::new(Sweeper {
                store,
                logger,
                retention,
            }),
            interval,
            control: WorkerControl::new("archival worker"),
        }
    }

    /// Spawn the sweep loop. Has no effect if the worker was already started or stopped.
    pub fn start(&mut self) {
        if !self.control.can_start() {
            return;
        }
        let task = tokio::spawn(run(
            self.sweeper.clone(),
            self.interval,
            self.control.subscribe(),
        ));
        self.control.attach(task);
    }

    /// Stop the loop without waiting for the next tick
    pub async fn stop(&mut self) -> Result<(), ShutdownError> {
        self.control.stop().await
    }

    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    /// Run one sweep on the calling task, outside the schedule
    pub fn sweep_now(&self) -> Option<usize> {
        self.sweeper.sweep(Utc::now())
    }
}

struct Sweeper {
    store: Arc<dyn EventRepository>,
    logger: Logger,
    retention: Duration,
}

impl Sweeper {
    /// Archive everything older than the cutoff; failures are logged, never raised
    fn sweep(&self, now: DateTime<Utc>) -> Option<usize> {
        let Some(cutoff) = cutoff(now, self.retention) else {
            self.logger.error(
                "Failed to archive old events",
                json!({ "error": "retention window out of range" }),
            );
            return None;
        };

        match self.store.archive_older_than(cutoff) {
            Ok(archived) => {
                self.logger.info(
                    "Archived old events",
                    json!({ "cutoff": cutoff.to_rfc3339(), "archived": archived }),
                );
                Some(archived)
            }
            Err(e) => {
                self.logger
                    .error("Failed to archive old events", json!({ "error": e.to_string() }));
                None
            }
        }
    }
}

/// `tokio::time::interval` rejects a zero period
const MIN_PERIOD: Duration = Duration::from_millis(1);

fn cutoff(now: DateTime<Utc>, retention: Duration) -> Option<DateTime<Utc>> {
    chrono::Duration::from_std(retention)
        .ok()
        .and_then(|window| now.checked_sub_signed(window))
}

async fn run(sweeper: Arc<Sweeper>, period: Duration, mut stop: watch::Receiver<bool>) {
    // First tick completes immediately, giving the sweep on start
    let mut ticker = interval(period.max(MIN_PERIOD));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            _ = stop_requested(&mut stop) => break,

            _ = ticker.tick() => {
                sweeper.sweep(Utc::now());
            }
        }
    }
}
