//! Reminder scheduler
//!
//! Per task: `Queued → (due ? Delivered : Armed → Queued)`.
//!
//! One dispatcher task pulls from the bounded intake queue. Due tasks are
//! handed to the [`NotificationSender`] right away; future ones go to a delay
//! task that sleeps until the target instant and re-submits the task to the
//! intake queue. Delivery is at-most-once: a failed send is logged and the
//! task is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::watch;
use tokio::time::{interval, sleep, MissedTickBehavior};

use super::{stop_requested, WorkerControl};
use crate::logging::Logger;
use crate::notify::NotificationSender;
use crate::types::{ReminderTask, ShutdownError};

/// Intake queue capacity used when none is configured
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

const MIN_HEARTBEAT: Duration = Duration::from_millis(1);

/// Delivery counters
#[derive(Debug, Default)]
pub struct SchedulerStats {
    delivered: AtomicU64,
    failed: AtomicU64,
    deferred: AtomicU64,
    dropped: AtomicU64,
    armed: AtomicU64,
}

impl SchedulerStats {
    /// Reminders handed to the sender successfully
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Reminders whose delivery failed (not retried)
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Times a task was armed for later delivery
    pub fn deferred(&self) -> u64 {
        self.deferred.load(Ordering::Relaxed)
    }

    /// Enqueues rejected because the intake queue was full or closed
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Delay tasks currently sleeping
    pub fn armed(&self) -> u64 {
        self.armed.load(Ordering::Relaxed)
    }
}

/// Producer side of the intake queue, handed to the request layer.
///
/// Enqueueing is best-effort: on a full queue the task is dropped and an error
/// is logged; the caller is never blocked and is not told.
#[derive(Clone)]
pub struct ReminderQueue {
    tx: mpsc::Sender<ReminderTask>,
    logger: Logger,
    stats: Arc<SchedulerStats>,
}

impl ReminderQueue {
    pub fn enqueue(&self, task: ReminderTask) {
        let (message, task) = match self.tx.try_send(task) {
            Ok(()) => return,
            Err(TrySendError::Full(task)) => ("Reminder channel full", task),
            Err(TrySendError::Closed(task)) => ("Reminder scheduler stopped", task),
        };

        self.stats.dropped.fetch_add(1, Ordering::Relaxed);
        self.logger.error(
            message,
            json!({ "event_id": task.event_id, "user_id": task.user_id }),
        );
    }
}

/// Owns the intake queue and the dispatcher task
pub struct ReminderScheduler {
    queue: ReminderQueue,
    intake: Option<mpsc::Receiver<ReminderTask>>,
    sender: Arc<dyn NotificationSender>,
    logger: Logger,
    heartbeat: Duration,
    stats: Arc<SchedulerStats>,
    control: WorkerControl,
}

impl ReminderScheduler {
    /// `heartbeat` is the dispatcher's liveness tick; no delivery depends on it
    pub fn new(
        capacity: usize,
        sender: Arc<dyn NotificationSender>,
        logger: Logger,
        heartbeat: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let stats = Arc::new(SchedulerStats::default());

        Self {
            queue: ReminderQueue {
                tx,
                logger: logger.clone(),
                stats: stats.clone(),
            },
            intake: Some(rx),
            sender,
            logger,
            heartbeat,
            stats,
            control: WorkerControl::new("reminder dispatcher"),
        }
    }

    /// Producer handle; tasks queued before `start` are dispatched once it runs
    pub fn queue(&self) -> ReminderQueue {
        self.queue.clone()
    }

    pub fn stats(&self) -> Arc<SchedulerStats> {
        self.stats.clone()
    }

    /// Spawn the dispatcher. Has no effect after the first call or after `stop`.
    pub fn start(&mut self) {
        if !self.control.can_start() {
            return;
        }
        let Some(intake) = self.intake.take() else {
            return;
        };

        let dispatcher = Dispatcher {
            requeue: self.queue.tx.clone(),
            sender: self.sender.clone(),
            logger: self.logger.clone(),
            stats: self.stats.clone(),
            stop: self.control.subscribe(),
        };
        let task = tokio::spawn(run(dispatcher, intake, self.heartbeat));
        self.control.attach(task);
    }

    /// Stop the dispatcher. Reminders still sleeping in delay tasks are abandoned.
    pub async fn stop(&mut self) -> Result<(), ShutdownError> {
        self.control.stop().await
    }

    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }
}

struct Dispatcher {
    requeue: mpsc::Sender<ReminderTask>,
    sender: Arc<dyn NotificationSender>,
    logger: Logger,
    stats: Arc<SchedulerStats>,
    stop: watch::Receiver<bool>,
}

impl Dispatcher {
    async fn dispatch(&self, task: ReminderTask) {
        let now = Utc::now();
        if task.is_due(now) {
            self.deliver(task).await;
            return;
        }

        // Sub-millisecond skew between the wall clock and the timer re-arms once more
        let delay = (task.target - now).to_std().unwrap_or(Duration::ZERO);
        self.stats.deferred.fetch_add(1, Ordering::Relaxed);
        self.stats.armed.fetch_add(1, Ordering::Relaxed);
        tokio::spawn(rearm(
            task,
            delay,
            self.requeue.clone(),
            self.stop.clone(),
            self.stats.clone(),
        ));
    }

    async fn deliver(&self, task: ReminderTask) {
        match self.sender.send_reminder(&task).await {
            Ok(()) => {
                self.stats.delivered.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                // TODO: retry with backoff once at-least-once delivery is a product requirement
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                self.logger.error(
                    "Failed to send reminder",
                    json!({ "error": e.to_string(), "event_id": task.event_id }),
                );
            }
        }
    }
}

async fn run(dispatcher: Dispatcher, mut intake: mpsc::Receiver<ReminderTask>, heartbeat: Duration) {
    let mut stop = dispatcher.stop.clone();
    let mut ticker = interval(heartbeat.max(MIN_HEARTBEAT));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let task = tokio::select! {
            biased;

            _ = stop_requested(&mut stop) => break,

            task = intake.recv() => match task {
                Some(task) => task,
                None => break,
            },

            // Liveness heartbeat only
            _ = ticker.tick() => continue,
        };

        dispatcher.dispatch(task).await;
    }

    dispatcher.logger.info(
        "Reminder dispatcher stopped",
        json!({ "abandoned": dispatcher.stats.armed() }),
    );
}

/// Sleep until the task is due, then hand it back to the dispatcher
async fn rearm(
    task: ReminderTask,
    delay: Duration,
    requeue: mpsc::Sender<ReminderTask>,
    mut stop: watch::Receiver<bool>,
    stats: Arc<SchedulerStats>,
) {
    let elapsed = tokio::select! {
        biased;
        _ = stop_requested(&mut stop) => false,
        _ = sleep(delay) => true,
    };

    if elapsed {
        tokio::select! {
            biased;
            _ = stop_requested(&mut stop) => {}
            // Fails only once the dispatcher is gone; the task is abandoned then
            _ = requeue.send(task) => {}
        }
    }

    stats.armed.fetch_sub(1, Ordering::Relaxed);
}
