//! Calendar server wiring
//!
//! Owns every long-lived component and shuts them down in dependency order:
//!
//! ```text
//!   HTTP accept loop ──► archival worker ──► reminder dispatcher ──► log sink
//! ```
//!
//! The log sink goes last so the other components can log while stopping.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::event_store::{EventRepository, InMemoryEventStore};
use crate::logging::{AsyncLogSink, LogWriter, Logger};
use crate::notify::{ConsoleNotificationSender, NotificationSender};
use crate::service::EventService;
use crate::types::ShutdownError;
use crate::utils::format_duration;
use crate::workers::{
    stop_requested, ArchivalWorker, ReminderQueue, ReminderScheduler, SchedulerStats,
    WorkerControl,
};

/// Minimum time given to the log sink to drain once the components are down
const SINK_CLOSE_GRACE: Duration = Duration::from_secs(1);

/// The assembled calendar service
pub struct CalendarServer {
    sink: Option<AsyncLogSink>,
    logger: Logger,
    service: EventService,
    scheduler: ReminderScheduler,
    archival: ArchivalWorker,
    state: Arc<AppState>,
    http: WorkerControl,
    config: Config,
}

impl CalendarServer {
    /// Server logging to stdout and delivering reminders to the log.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(config: Config) -> Self {
        Self::with_writer(config, Box::new(io::stdout()))
    }

    /// Server logging to `writer`
    pub fn with_writer(config: Config, writer: LogWriter) -> Self {
        let sink = AsyncLogSink::with_writer(config.logger_buffer_size, writer);
        let sender = Arc::new(ConsoleNotificationSender::new(sink.logger()));
        Self::assemble(config, sink, sender)
    }

    /// Server logging to `writer` and delivering reminders through `sender`
    pub fn with_sender(
        config: Config,
        writer: LogWriter,
        sender: Arc<dyn NotificationSender>,
    ) -> Self {
        let sink = AsyncLogSink::with_writer(config.logger_buffer_size, writer);
        Self::assemble(config, sink, sender)
    }

    fn assemble(config: Config, sink: AsyncLogSink, sender: Arc<dyn NotificationSender>) -> Self {
        let logger = sink.logger();
        let store: Arc<dyn EventRepository> = Arc::new(InMemoryEventStore::new());
        let service = EventService::new(store.clone());

        let scheduler = ReminderScheduler::new(
            config.reminder_queue_capacity,
            sender,
            logger.clone(),
            config.reminder_check_interval,
        );
        let archival = ArchivalWorker::new(
            store,
            logger.clone(),
            config.cleanup_interval,
            config.archive_after,
        );
        let state = Arc::new(AppState::new(
            service.clone(),
            scheduler.queue(),
            logger.clone(),
        ));

        Self {
            sink: Some(sink),
            logger,
            service,
            scheduler,
            archival,
            state,
            http: WorkerControl::new("http server"),
            config,
        }
    }

    pub fn logger(&self) -> Logger {
        self.logger.clone()
    }

    pub fn service(&self) -> EventService {
        self.service.clone()
    }

    /// Producer handle for the reminder intake queue
    pub fn reminder_queue(&self) -> ReminderQueue {
        self.scheduler.queue()
    }

    pub fn reminder_stats(&self) -> Arc<SchedulerStats> {
        self.scheduler.stats()
    }

    /// Router over this server's state, for serving or in-process requests
    pub fn router(&self) -> Router {
        create_router(self.state.clone(), self.config.request_timeout)
    }

    /// Bind the configured port and start serving
    pub async fn bind(&mut self) -> io::Result<SocketAddr> {
        let listener = TcpListener::bind(self.config.listen_addr()).await?;
        self.start(listener)
    }

    /// Start the background workers and the HTTP accept loop on `listener`
    pub fn start(&mut self, listener: TcpListener) -> io::Result<SocketAddr> {
        let addr = listener.local_addr()?;

        self.archival.start();
        self.scheduler.start();

        if self.http.can_start() {
            let router = self.router();
            let logger = self.logger.clone();
            let mut stop = self.http.subscribe();

            let task = tokio::spawn(async move {
                let shutdown = async move { stop_requested(&mut stop).await };
                if let Err(e) = axum::serve(listener, router)
                    .with_graceful_shutdown(shutdown)
                    .await
                {
                    logger.error("HTTP server error", json!({ "error": e.to_string() }));
                }
            });
            self.http.attach(task);
        }

        let mut fields = self.config.summary();
        fields["addr"] = Value::String(addr.to_string());
        self.logger.info("Server started", fields);
        Ok(addr)
    }

    pub fn is_running(&self) -> bool {
        self.http.is_running()
    }

    /// Stop everything in order, bounded by `timeout`.
    ///
    /// Every component is stopped even if an earlier one fails; the first
    /// failure is returned. The log sink is closed afterwards in every case,
    /// including after a timeout, so entries already accepted are written.
    pub async fn shutdown(mut self, timeout: Duration) -> Result<(), ShutdownError> {
        self.logger.info(
            "Shutting down server",
            json!({ "timeout": format_duration(timeout) }),
        );
        let started = Instant::now();

        let result = match tokio::time::timeout(timeout, self.stop_components()).await {
            Ok(result) => result,
            Err(_) => {
                self.logger.error(
                    "Shutdown timed out",
                    json!({ "timeout": format_duration(timeout) }),
                );
                Err(ShutdownError::TimedOut(timeout))
            }
        };

        let Some(sink) = self.sink.take() else {
            return result;
        };
        let remaining = timeout
            .saturating_sub(started.elapsed())
            .max(SINK_CLOSE_GRACE);
        let closed = match tokio::time::timeout(remaining, sink.close()).await {
            Ok(closed) => closed,
            Err(_) => Err(ShutdownError::TimedOut(timeout)),
        };
        result.and(closed)
    }

    async fn stop_components(&mut self) -> Result<(), ShutdownError> {
        let mut first_error = None;

        for result in [
            self.http.stop().await,
            self.archival.stop().await,
            self.scheduler.stop().await,
        ] {
            if let Err(e) = result {
                self.logger
                    .error("Component failed to stop", json!({ "error": e.to_string() }));
                first_error.get_or_insert(e);
            }
        }

        self.logger.info("Server stopped", Value::Null);
        first_error.map_or(Ok(()), Err)
    }
}
