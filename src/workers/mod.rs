//! Background workers
//!
//! - `ArchivalWorker`: periodic sweep that archives events older than the retention window
//! - `ReminderScheduler`: dispatcher that delivers due reminders and re-arms future ones
//!
//! Both run as Tokio tasks independent of request handling and of each other,
//! and both stop promptly on a `watch` signal without waiting for their next tick.

mod archival;
mod reminder;

pub use archival::ArchivalWorker;
pub use reminder::{ReminderQueue, ReminderScheduler, SchedulerStats, DEFAULT_QUEUE_CAPACITY};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::types::ShutdownError;

/// Stop signal and join handle of one spawned loop
pub(crate) struct WorkerControl {
    name: &'static str,
    stop_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl WorkerControl {
    pub(crate) fn new(name: &'static str) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            name,
            stop_tx,
            task: None,
        }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<bool> {
        self.stop_tx.subscribe()
    }

    /// Whether a loop may still be spawned
    pub(crate) fn can_start(&self) -> bool {
        self.task.is_none() && !*self.stop_tx.borrow()
    }

    pub(crate) fn attach(&mut self, task: JoinHandle<()>) {
        self.task = Some(task);
    }

    pub(crate) fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Signal the loop and wait for it to exit. Safe to call more than once.
    pub(crate) async fn stop(&mut self) -> Result<(), ShutdownError> {
        self.stop_tx.send_replace(true);
        match self.task.take() {
            Some(task) => task
                .await
                .map_err(|e| ShutdownError::WorkerPanicked(format!("{}: {}", self.name, e))),
            None => Ok(()),
        }
    }
}

/// Resolves once stop has been requested (or the controller is gone)
pub(crate) async fn stop_requested(stop: &mut watch::Receiver<bool>) {
    let _ = stop.wait_for(|stopped| *stopped).await;
}
