use std::time::Duration;

/// Process configuration, read once at startup and injected where needed.
/// Collaborator endpoints that may be absent (attachment URL resolution,
/// the in-process sweep timer) stay `None` rather than falling back to
/// scattered defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: String,
    /// Cookie session encryption key material; must be at least 64 bytes.
    /// `None` means generate a random key (sessions lost on restart).
    pub session_key: Option<String>,
    /// Interval for the built-in global deadline sweep. Absent = the sweep is
    /// only ever triggered externally via POST /api/v1/overdue/update.
    pub sweep_interval: Option<Duration>,
    /// Base URL the attachment store serves files from; absent = resolution
    /// unconfigured and idea payloads carry raw storage paths only.
    pub attachment_base_url: Option<String>,
    /// Comma-separated words rejected by the content filter; absent = filter
    /// disabled.
    pub content_filter_words: Option<String>,
    /// Password for the seeded admin account on a fresh database.
    pub admin_password: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let session_key = match std::env::var("SESSION_KEY") {
            Ok(val) if val.len() >= 64 => Some(val),
            Ok(val) => {
                log::warn!(
                    "SESSION_KEY too short ({} bytes, need 64+), generating random key",
                    val.len()
                );
                None
            }
            Err(_) => None,
        };

        let sweep_interval = std::env::var("SWEEP_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        AppConfig {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/ideabay.db".into()),
            session_key,
            sweep_interval,
            attachment_base_url: std::env::var("ATTACHMENT_BASE_URL").ok(),
            content_filter_words: std::env::var("CONTENT_FILTER_WORDS").ok(),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into()),
        }
    }
}
