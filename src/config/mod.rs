//! Server configuration
//!
//! Values come from command-line flags, then environment variables, with a
//! `.env` file in the working directory loaded into the environment first.
//!
//! ```text
//! PORT=8080
//! CLEANUP_INTERVAL=1m
//! ARCHIVE_AFTER=30d
//! REMINDER_CHECK_INTERVAL=1s
//! LOGGER_BUFFER_SIZE=1000
//! ```

use std::time::Duration;

use clap::Parser;

use crate::utils::{format_duration, parse_duration};
use crate::workers::DEFAULT_QUEUE_CAPACITY;

/// Settings for the calendar server
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "calendar-server",
    version = env!("CARGO_PKG_VERSION"),
    about = "In-memory calendar service with reminders and archival",
    long_about = None
)]
pub struct Config {
    /// HTTP listen port
    #[arg(long, env = "PORT")]
    pub port: u16,

    /// How often the archival worker sweeps the store (e.g. 1m)
    #[arg(long, env = "CLEANUP_INTERVAL", value_parser = parse_duration)]
    pub cleanup_interval: Duration,

    /// Events dated before now minus this window are archived (e.g. 30d)
    #[arg(long, env = "ARCHIVE_AFTER", value_parser = parse_duration)]
    pub archive_after: Duration,

    /// Reminder dispatcher heartbeat (e.g. 1s)
    #[arg(long, env = "REMINDER_CHECK_INTERVAL", value_parser = parse_duration)]
    pub reminder_check_interval: Duration,

    /// Capacity of the asynchronous log queue
    #[arg(long, env = "LOGGER_BUFFER_SIZE", value_parser = parse_capacity)]
    pub logger_buffer_size: usize,

    /// Capacity of the reminder intake queue
    #[arg(
        long,
        env = "REMINDER_QUEUE_CAPACITY",
        value_parser = parse_capacity,
        default_value_t = DEFAULT_QUEUE_CAPACITY
    )]
    pub reminder_queue_capacity: usize,

    /// Upper bound on graceful shutdown
    #[arg(
        long,
        env = "SHUTDOWN_TIMEOUT",
        value_parser = parse_duration,
        default_value = "10s"
    )]
    pub shutdown_timeout: Duration,

    /// Upper bound on a single HTTP request, body included
    #[arg(
        long,
        env = "REQUEST_TIMEOUT",
        value_parser = parse_duration,
        default_value = "15s"
    )]
    pub request_timeout: Duration,
}

impl Config {
    /// Load `.env` (if present), then parse flags and environment
    pub fn load() -> Result<Self, clap::Error> {
        // A missing .env file is fine; variables may come from the environment
        let _ = dotenvy::dotenv();
        Self::try_parse()
    }

    /// Address the HTTP listener binds to
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Settings as structured log fields
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "port": self.port,
            "cleanup_interval": format_duration(self.cleanup_interval),
            "archive_after": format_duration(self.archive_after),
            "reminder_check_interval": format_duration(self.reminder_check_interval),
            "logger_buffer_size": self.logger_buffer_size,
            "reminder_queue_capacity": self.reminder_queue_capacity,
            "shutdown_timeout": format_duration(self.shutdown_timeout),
            "request_timeout": format_duration(self.request_timeout),
        })
    }
}

fn parse_capacity(input: &str) -> Result<usize, String> {
    match input.trim().parse::<usize>() {
        Ok(0) => Err("capacity must be greater than zero".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid capacity '{}': {}", input, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args<'a>(extra: &[&'a str]) -> Vec<&'a str> {
        let mut all = vec![
            "calendar-server",
            "--port",
            "8080",
            "--cleanup-interval",
            "1m",
            "--archive-after",
            "30d",
            "--reminder-check-interval",
            "1s",
            "--logger-buffer-size",
            "1000",
        ];
        all.extend_from_slice(extra);
        all
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::try_parse_from(args(&[])).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.cleanup_interval, Duration::from_secs(60));
        assert_eq!(config.archive_after, Duration::from_secs(30 * 86_400));
        assert_eq!(config.reminder_check_interval, Duration::from_secs(1));
        assert_eq!(config.logger_buffer_size, 1000);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_optional_overrides() {
        let config = Config::try_parse_from(args(&[
            "--reminder-queue-capacity",
            "5",
            "--shutdown-timeout",
            "1h30m",
        ]))
        .unwrap();

        assert_eq!(config.reminder_queue_capacity, 5);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(5400));
    }

    #[test]
    fn test_rejects_zero_buffer() {
        let mut argv = args(&[]);
        let idx = argv.iter().position(|a| *a == "1000").unwrap();
        argv[idx] = "0";
        assert!(Config::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_rejects_malformed_duration() {
        let mut argv = args(&[]);
        let idx = argv.iter().position(|a| *a == "1m").unwrap();
        argv[idx] = "soon";
        assert!(Config::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_summary_renders_durations() {
        let config = Config::try_parse_from(args(&[])).unwrap();
        let summary = config.summary();
        assert_eq!(summary["archive_after"], "30d");
        assert_eq!(summary["cleanup_interval"], "1m");
    }
}
