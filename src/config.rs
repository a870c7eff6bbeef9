use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use tracing::{info, warn};

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";
pub const DEFAULT_DATA_DIR: &str = ".cinescope";
pub const PREFERENCES_FILE: &str = "preferences.json";

const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";
const API_KEY_VARS: [&str; 2] = ["OMDB_API_KEY", "REACT_APP_OMDB_API_KEY"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
    pub search_debounce: Duration,
    /// Pause between successive category seed lookups
    pub category_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            request_timeout: Duration::from_secs(30),
            search_debounce: Duration::from_millis(500),
            category_delay: Duration::from_millis(100),
        }
    }
}

impl AppConfig {
    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join(PREFERENCES_FILE)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    omdb_api_key: Option<String>,
    base_url: Option<String>,
    data_dir: Option<String>,
    request_timeout_secs: Option<u64>,
    search_debounce_ms: Option<u64>,
    category_delay_ms: Option<u64>,
}

/// Defaults, then `config.json` in the working directory, then environment.
pub fn load_config() -> AppConfig {
    let mut cfg = load_config_file(Path::new(CONFIG_FILE));
    apply_env(&mut cfg, |key| env::var(key).ok());
    cfg
}

pub fn load_config_file(path: &Path) -> AppConfig {
    let mut cfg = AppConfig::default();

    match fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<RawConfig>(&raw) {
            Ok(parsed) => {
                if parsed.omdb_api_key.is_some() {
                    cfg.api_key = sanitize_api_key(parsed.omdb_api_key);
                }
                if let Some(url) = parsed.base_url {
                    cfg.base_url = url;
                }
                if let Some(dir) = parsed.data_dir {
                    cfg.data_dir = PathBuf::from(dir);
                }
                if let Some(secs) = parsed.request_timeout_secs {
                    cfg.request_timeout = Duration::from_secs(secs.max(1));
                }
                if let Some(ms) = parsed.search_debounce_ms {
                    cfg.search_debounce = Duration::from_millis(ms);
                }
                if let Some(ms) = parsed.category_delay_ms {
                    cfg.category_delay = Duration::from_millis(ms);
                }
                info!("Loaded config from {}", path.display());
            }
            Err(err) => {
                warn!("Failed to parse {} ({}). Using defaults.", path.display(), err);
            }
        },
        Err(_) => {
            info!("No {} found; using defaults", path.display());
        }
    }

    cfg
}

/// Overlay environment variables; `lookup` is injectable for tests.
pub fn apply_env(cfg: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(key) = API_KEY_VARS.iter().find_map(|var| sanitize_api_key(lookup(var))) {
        cfg.api_key = Some(key);
    }
    if let Some(url) = lookup("CINESCOPE_BASE_URL").filter(|u| !u.trim().is_empty()) {
        cfg.base_url = url;
    }
    if let Some(dir) = lookup("CINESCOPE_DATA_DIR").filter(|d| !d.trim().is_empty()) {
        cfg.data_dir = PathBuf::from(dir);
    }

    if cfg.api_key.is_none() {
        warn!("OMDb API key not configured; searches will fail until OMDB_API_KEY is set");
    }
}

fn sanitize_api_key(raw: Option<String>) -> Option<String> {
    raw.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && k != API_KEY_PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_file(&dir.path().join("nope.json"));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.search_debounce, Duration::from_millis(500));
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"omdb_api_key":" abc123 ","data_dir":"/tmp/cs","search_debounce_ms":250}"#,
        )
        .unwrap();

        let cfg = load_config_file(&path);
        assert_eq!(cfg.api_key.as_deref(), Some("abc123"));
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/cs"));
        assert_eq!(cfg.search_debounce, Duration::from_millis(250));
        assert_eq!(cfg.preferences_path(), PathBuf::from("/tmp/cs/preferences.json"));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let cfg = load_config_file(&path);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn env_overrides_and_placeholder_is_ignored() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("OMDB_API_KEY", "YOUR_API_KEY_HERE"),
            ("REACT_APP_OMDB_API_KEY", "legacy-key"),
            ("CINESCOPE_BASE_URL", "http://localhost:9999/"),
        ]);
        let mut cfg = AppConfig::default();
        apply_env(&mut cfg, |k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.api_key.as_deref(), Some("legacy-key"));
        assert_eq!(cfg.base_url, "http://localhost:9999/");
        assert!(cfg.has_api_key());
    }

    #[test]
    fn empty_env_key_leaves_config_unset() {
        let mut cfg = AppConfig::default();
        apply_env(&mut cfg, |k| (k == "OMDB_API_KEY").then(|| "   ".to_string()));
        assert!(cfg.api_key.is_none());
    }
}
