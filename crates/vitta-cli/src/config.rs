//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use vitta_api::{ApiConfig, FormConfig};

const DEFAULT_BASE_URL: &str =
    "https://df51-2405-201-2032-9025-3164-ca0c-e961-1080.ngrok-free.app";
const DEFAULT_USER_ID: &str = "darshit";
const DEFAULT_WAITLIST_URL: &str = "https://script.google.com/macros/s/AKfycbyt5kDLqDdHzJWmenxEHYi60IbE-4Pf9g9HwHnxSmb_Y99WQkYAGSR7RMOEhSvdtIU0/exec";
const DEFAULT_FEEDBACK_URL: &str = "https://script.google.com/macros/s/AKfycbyijUN58P-pvvVWw_Dcc44AF_KOeQXTLbAH0CiJYzoQYERNMO-ShorUDChRXF6JPbGd/exec";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for vitta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chat backend base URL
    pub base_url: String,
    /// User id sent with every query
    pub user_id: String,
    /// Waitlist form endpoint
    pub waitlist_url: String,
    /// Feedback form endpoint
    pub feedback_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            waitlist_url: DEFAULT_WAITLIST_URL.to_string(),
            feedback_url: DEFAULT_FEEDBACK_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vitta")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        // Check for VITTA_CONFIG_PATH env var first
        if let Ok(path) = std::env::var("VITTA_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from file
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        Config::default().save()?;
        Ok(path)
    }

    /// Chat client configuration derived from this config
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(&self.base_url, &self.user_id)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    /// Form client configuration derived from this config
    pub fn form_config(&self) -> FormConfig {
        FormConfig::new(&self.waitlist_url, &self.feedback_url)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# vitta configuration file
# Place at ~/.config/vitta/config.toml (Linux/Mac) or %APPDATA%\vitta\config.toml (Windows)

# Chat backend base URL
base_url = "https://df51-2405-201-2032-9025-3164-ca0c-e961-1080.ngrok-free.app"

# User id sent with every query
user_id = "darshit"

# External form endpoints
waitlist_url = "https://script.google.com/macros/s/AKfycbyt5kDLqDdHzJWmenxEHYi60IbE-4Pf9g9HwHnxSmb_Y99WQkYAGSR7RMOEhSvdtIU0/exec"
feedback_url = "https://script.google.com/macros/s/AKfycbyijUN58P-pvvVWw_Dcc44AF_KOeQXTLbAH0CiJYzoQYERNMO-ShorUDChRXF6JPbGd/exec"

# Request timeout in seconds
timeout_secs = 30
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let config = Config::default();
        let content = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&content).unwrap();
        assert_eq!(parsed.base_url, config.base_url);
        assert_eq!(parsed.user_id, "darshit");
        assert_eq!(parsed.timeout_secs, 30);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("timeout_secs = 5\n").unwrap();
        assert_eq!(parsed.timeout_secs, 5);
        assert_eq!(parsed.user_id, DEFAULT_USER_ID);
        assert_eq!(parsed.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_default_form_endpoints() {
        let config = Config::default();
        assert_eq!(
            config.waitlist_url,
            "https://script.google.com/macros/s/AKfycbyt5kDLqDdHzJWmenxEHYi60IbE-4Pf9g9HwHnxSmb_Y99WQkYAGSR7RMOEhSvdtIU0/exec"
        );
        assert_eq!(
            config.feedback_url,
            "https://script.google.com/macros/s/AKfycbyijUN58P-pvvVWw_Dcc44AF_KOeQXTLbAH0CiJYzoQYERNMO-ShorUDChRXF6JPbGd/exec"
        );
    }

    #[test]
    fn test_example_config_parses() {
        let parsed: Config = toml::from_str(example_config()).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
