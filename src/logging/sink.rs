//! Asynchronous log sink backed by a bounded queue

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::entry::{LogEntry, LogLevel};
use crate::types::ShutdownError;

/// Destination the sink renders entries to
pub type LogWriter = Box<dyn Write + Send>;

type SharedWriter = Arc<Mutex<LogWriter>>;

/// Prefix marking entries rendered by the emitting thread
pub const FALLBACK_PREFIX: &str = "[FALLBACK] ";

/// Counters describing how entries left the producers
#[derive(Debug, Default)]
pub struct SinkStats {
    queued: AtomicU64,
    fallback: AtomicU64,
}

impl SinkStats {
    /// Entries accepted by the queue
    pub fn queued(&self) -> u64 {
        self.queued.load(Ordering::Relaxed)
    }

    /// Entries written synchronously because the queue was full or closed
    pub fn fallback(&self) -> u64 {
        self.fallback.load(Ordering::Relaxed)
    }
}

/// Cloneable producer handle for the log sink.
///
/// `emit` never waits for queue capacity: when the queue is full (or already
/// closed) the entry is rendered by the calling thread instead.
#[derive(Clone)]
pub struct Logger {
    tx: mpsc::Sender<LogEntry>,
    out: SharedWriter,
    stats: Arc<SinkStats>,
}

impl Logger {
    pub fn emit(&self, level: LogLevel, message: impl Into<String>, fields: Value) {
        let entry = LogEntry::new(level, message.into(), fields);
        match self.tx.try_send(entry) {
            Ok(()) => {
                self.stats.queued.fetch_add(1, Ordering::Relaxed);
            }
            Err(TrySendError::Full(entry)) | Err(TrySendError::Closed(entry)) => {
                self.stats.fallback.fetch_add(1, Ordering::Relaxed);
                write_entry(&self.out, &entry, FALLBACK_PREFIX);
            }
        }
    }

    pub fn info(&self, message: impl Into<String>, fields: Value) {
        self.emit(LogLevel::Info, message, fields);
    }

    pub fn error(&self, message: impl Into<String>, fields: Value) {
        self.emit(LogLevel::Error, message, fields);
    }

    pub fn stats(&self) -> &SinkStats {
        &self.stats
    }

    /// Route `log` crate macros through this sink
    pub fn install_global(&self, max_level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self.clone()))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.emit(
            LogLevel::from(record.level()),
            record.args().to_string(),
            json!({ "target": record.target() }),
        );
    }

    fn flush(&self) {
        let _ = self.out.lock().flush();
    }
}

/// Owner of the drain task.
///
/// Must be created inside a Tokio runtime. Call [`AsyncLogSink::close`] last
/// during shutdown: it returns once every accepted entry has been written.
pub struct AsyncLogSink {
    logger: Logger,
    shutdown: Option<oneshot::Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl AsyncLogSink {
    /// Sink rendering to stdout
    pub fn new(capacity: usize) -> Self {
        Self::with_writer(capacity, Box::new(io::stdout()))
    }

    /// Sink rendering to a custom destination
    pub fn with_writer(capacity: usize, writer: LogWriter) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let out: SharedWriter = Arc::new(Mutex::new(writer));

        let worker = tokio::spawn(drain(rx, shutdown_rx, out.clone()));

        Self {
            logger: Logger {
                tx,
                out,
                stats: Arc::new(SinkStats::default()),
            },
            shutdown: Some(shutdown_tx),
            worker: Some(worker),
        }
    }

    /// A producer handle; clone freely
    pub fn logger(&self) -> Logger {
        self.logger.clone()
    }

    /// Stop accepting queued entries, drain what was accepted, and wait for
    /// the drain task to exit. Later `emit` calls fall back to synchronous writes.
    pub async fn close(mut self) -> Result<(), ShutdownError> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        match self.worker.take() {
            Some(worker) => worker
                .await
                .map_err(|e| ShutdownError::WorkerPanicked(format!("log drain: {}", e))),
            None => Ok(()),
        }
    }
}

/// Drain loop: FIFO until told to stop, then flush whatever is still queued
async fn drain(
    mut rx: mpsc::Receiver<LogEntry>,
    mut shutdown: oneshot::Receiver<()>,
    out: SharedWriter,
) {
    loop {
        tokio::select! {
            entry = rx.recv() => {
                match entry {
                    Some(entry) => write_entry(&out, &entry, ""),
                    None => break,
                }
            }

            // Fires on close() and also if the sink is dropped without closing
            _ = &mut shutdown => {
                rx.close();
                while let Some(entry) = rx.recv().await {
                    write_entry(&out, &entry, "");
                }
                break;
            }
        }
    }

    let _ = out.lock().flush();
}

fn write_entry(out: &SharedWriter, entry: &LogEntry, prefix: &str) {
    let mut out = out.lock();
    // A failing destination must not take callers down with it
    let _ = writeln!(out, "{}{}", prefix, entry.render());
    let _ = out.flush();
}
