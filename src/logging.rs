use anyhow::{Context, Result};
use regex::Regex;
use std::fs::OpenOptions;
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

#[allow(dead_code)]
pub struct LogGuard(tracing_appender::non_blocking::WorkerGuard);

/// Initialize debug logging.
///
/// When `debug` is enabled in the config, logs are appended to
/// `<config-dir>/websum/websum-debug.log`. Otherwise this is a no-op.
pub fn init(config: &crate::config::Config) -> Result<Option<LogGuard>> {
    if !config.debug {
        return Ok(None);
    }

    let log_path = crate::config::config_path()?.with_file_name("websum-debug.log");

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(file);

    // Default: debug our crate, warn for everything else.
    let filter =
        EnvFilter::try_new("websum=debug,warn").unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .try_init()
        .ok(); // If already initialized (e.g., in tests), don't crash.

    tracing::info!(log_file = %log_path.display(), "debug logging enabled");

    Ok(Some(LogGuard(guard)))
}

/// Best-effort redaction for common API key patterns before log output.
pub fn redact_secrets(input: &str) -> String {
    static KEY_RE: OnceLock<Regex> = OnceLock::new();
    let re = KEY_RE.get_or_init(|| {
        Regex::new(r"\bsk-[A-Za-z0-9_-]{8,}").expect("static redaction pattern")
    });
    re.replace_all(input, "sk-***REDACTED***").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_api_keys() {
        let input = "error: invalid key sk-abc123def456ghi789 in request";
        let out = redact_secrets(input);
        assert!(!out.contains("sk-abc123def456ghi789"));
        assert!(out.contains("sk-***REDACTED***"));
    }

    #[test]
    fn test_short_tokens_untouched() {
        let input = "task-1 and sk-short stay";
        assert_eq!(redact_secrets(input), input);
    }
}
