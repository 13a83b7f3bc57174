//! Optional JSON trace logging, written to a file so it never corrupts the TUI.
//!
//! Each recompute runs inside a `recompute` span; span close events carry
//! its busy/idle time, so the log doubles as a timing record for resizes.

use crate::config::AppConfig;
use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::time::UtcTime;

pub const TRACE_LOG_ENV: &str = "RECIPIENT_STRIP_TRACE_LOG";
const DEFAULT_TRACE_FILE: &str = "recipient_strip_trace.jsonl";

static TRACING_INIT: OnceLock<Option<PathBuf>> = OnceLock::new();

#[must_use]
pub fn tracing_log_path() -> PathBuf {
    match env::var(TRACE_LOG_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
        _ => env::temp_dir().join(DEFAULT_TRACE_FILE),
    }
}

fn tracing_enabled(config: &AppConfig) -> bool {
    config.logs && !config.no_logs
}

fn install_subscriber() -> Option<PathBuf> {
    let path = tracing_log_path();
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::TRACE)
        .with_timer(UtcTime::rfc_3339())
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(file)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok()?;
    Some(path)
}

fn init_tracing_once(config: &AppConfig, once: &OnceLock<Option<PathBuf>>) -> Option<PathBuf> {
    if !tracing_enabled(config) {
        return None;
    }
    once.get_or_init(install_subscriber).clone()
}

/// Install the global trace subscriber if logging is enabled and return the
/// trace file path. Later calls return the first call's outcome.
pub fn init_tracing(config: &AppConfig) -> Option<PathBuf> {
    init_tracing_once(config, &TRACING_INIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use std::sync::Mutex;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn unique_trace_path(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();
        env::temp_dir().join(format!("recipient-strip-trace-{suffix}-{nanos}.jsonl"))
    }

    #[test]
    fn tracing_log_path_prefers_env_override() {
        let _guard = env_lock().lock().expect("env lock");
        let path = unique_trace_path("env");
        env::set_var(TRACE_LOG_ENV, &path);
        assert_eq!(tracing_log_path(), path);
        env::remove_var(TRACE_LOG_ENV);
    }

    #[test]
    fn tracing_log_path_defaults_to_temp_dir_when_env_missing() {
        let _guard = env_lock().lock().expect("env lock");
        env::remove_var(TRACE_LOG_ENV);
        let expected = env::temp_dir().join(DEFAULT_TRACE_FILE);
        assert_eq!(tracing_log_path(), expected);

        env::set_var(TRACE_LOG_ENV, "  ");
        assert_eq!(tracing_log_path(), expected);
        env::remove_var(TRACE_LOG_ENV);
    }

    #[test]
    fn tracing_enabled_truth_table() {
        let mut cfg = AppConfig::parse_from(["telemetry-test"]);
        assert!(!tracing_enabled(&cfg));

        cfg.logs = true;
        assert!(tracing_enabled(&cfg));

        cfg.no_logs = true;
        assert!(!tracing_enabled(&cfg));
    }

    #[test]
    fn init_tracing_once_respects_enabled_flag_and_creates_file() {
        let _guard = env_lock().lock().expect("env lock");

        let disabled_path = unique_trace_path("disabled");
        env::set_var(TRACE_LOG_ENV, &disabled_path);
        let disabled_once = OnceLock::new();
        let mut disabled_cfg = AppConfig::parse_from(["telemetry-test"]);
        disabled_cfg.no_logs = true;
        assert_eq!(init_tracing_once(&disabled_cfg, &disabled_once), None);
        assert!(
            !disabled_path.exists(),
            "disabled config should not create trace file"
        );

        let enabled_path = unique_trace_path("enabled");
        env::set_var(TRACE_LOG_ENV, &enabled_path);
        let enabled_once = OnceLock::new();
        let enabled_cfg = AppConfig::parse_from(["telemetry-test", "--logs"]);
        let first = init_tracing_once(&enabled_cfg, &enabled_once);
        assert!(
            enabled_path.exists(),
            "enabled config should create trace file"
        );
        assert_eq!(init_tracing_once(&enabled_cfg, &enabled_once), first);

        env::remove_var(TRACE_LOG_ENV);
        let _ = fs::remove_file(enabled_path);
    }
}
