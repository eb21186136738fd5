use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_PAGE_SIZE: u32 = 12;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub request_timeout: Duration,
    pub page_size: u32,
    pub profile: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, environment or otherwise.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = lookup("PROFILE").unwrap_or_else(|| "default".to_string());

        let session_file = lookup("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_session_file(&profile, lookup("HOME")));

        Self {
            api_base_url: lookup("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            session_file,
            request_timeout: Duration::from_secs(
                lookup("REQUEST_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            page_size: lookup("PAGE_SIZE")
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            profile,
        }
    }
}

fn default_session_file(profile: &str, home: Option<String>) -> PathBuf {
    let filename = if profile == "default" {
        "session.json".to_string()
    } else {
        format!("session_{}.json", profile)
    };
    // On Linux/macOS: ~/.cache/bookreview/session.json
    // Without a HOME: <tmp>/bookreview/session.json
    home.map(PathBuf::from)
        .map(|home| home.join(".cache"))
        .unwrap_or_else(env::temp_dir)
        .join("bookreview")
        .join(filename)
}
