//! Non-blocking logging pipeline
//!
//! Producers push entries onto a bounded queue drained by one background
//! task. A producer never waits for capacity:
//!
//! ```text
//! Logger::emit ──try_send──► [bounded queue] ──► drain task ──► writer
//!       │ full / closed
//!       └────────────── render on the calling thread ─────────► writer
//! ```

mod entry;
mod sink;

pub use entry::{LogEntry, LogLevel, TIMESTAMP_FORMAT};
pub use sink::{AsyncLogSink, LogWriter, Logger, SinkStats, FALLBACK_PREFIX};
