use std::{env, path::PathBuf, time::Duration};

const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_CHART_DIR: &str = "static/charts";
const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

/// Application configuration, with local-run defaults for everything.
pub struct AppConfig {
    pub base_url: String,
    pub chart_dir: PathBuf,
    pub session_ttl: Duration,
    pub assisted: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let base_url = env::var("BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let chart_dir = env::var("CHART_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CHART_DIR));
        let session_ttl = env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_SESSION_TTL_SECS));
        let assisted = env::var("ASSISTED_PARSING").is_ok_and(|raw| raw != "0");

        Self {
            base_url,
            chart_dir,
            session_ttl,
            assisted,
        }
    }
}

/// Initialize logging and tracing
pub fn init_logging() {
    tracing_subscriber::fmt::init();
}
