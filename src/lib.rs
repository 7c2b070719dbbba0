//! Event Calendar Service
//!
//! An in-memory, multi-user calendar served over HTTP, with background
//! reminder delivery and periodic archival of old events.
//!
//! # Features
//!
//! - **Thread-Safe Store**: Per-user event maps behind a single reader/writer lock
//! - **Reminders**: Bounded intake queue, immediate delivery of due reminders,
//!   timed re-arming of future ones
//! - **Archival**: Periodic sweep hiding events older than a retention window
//! - **Async Logging**: Bounded log queue that never blocks callers
//! - **Graceful Shutdown**: Ordered, time-bounded stop of every component
//!
//! # Modules
//!
//! - `types`: Core data structures (Event, ReminderTask) and errors
//! - `validation`: Event field validation and request value parsing
//! - `event_store`: Storage capability and the in-memory store
//! - `service`: Validating façade with day/week/month queries
//! - `logging`: Asynchronous log sink and `log` crate bridge
//! - `notify`: Reminder delivery transports
//! - `workers`: Archival worker and reminder scheduler
//! - `api`: HTTP routes, extractors and middleware
//! - `config`: Settings from flags, environment and `.env`
//! - `server`: Component wiring and shutdown
//! - `utils`: Duration and date helpers
//!
//! # Example
//!
//! ```no_run
//! use event_calendar::{CalendarServer, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let timeout = config.shutdown_timeout;
//!     let mut server = CalendarServer::new(config);
//!     server.bind().await?;
//!     tokio::signal::ctrl_c().await?;
//!     server.shutdown(timeout).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod event_store;
pub mod logging;
pub mod notify;
pub mod server;
pub mod service;
pub mod types;
pub mod utils;
pub mod validation;
pub mod workers;

// Re-export commonly used items at crate root
pub use config::Config;
pub use event_store::{EventRepository, InMemoryEventStore};
pub use logging::{AsyncLogSink, Logger};
pub use notify::{ConsoleNotificationSender, NotificationSender};
pub use server::CalendarServer;
pub use service::{DateRange, EventService};
pub use types::{CalendarError, CalendarResult, Event, NotifyError, ReminderTask, ShutdownError};
pub use validation::ValidationError;
pub use workers::{ArchivalWorker, ReminderQueue, ReminderScheduler, SchedulerStats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
