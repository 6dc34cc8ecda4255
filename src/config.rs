use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "price_monitor";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub browser: BrowserConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding a built front end, served with an `index.html` fallback.
    pub static_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserMode {
    WebDriver,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub mode: BrowserMode,
    pub webdriver_url: String,
    pub user_agent: String,
    pub headless: bool,
    pub navigation_timeout_seconds: u64,
    pub selector_timeout_seconds: u64,
}

impl BrowserConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_seconds)
    }

    pub fn selector_timeout(&self) -> Duration {
        Duration::from_secs(self.selector_timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Config {
    /// Load defaults, then `price_monitor.toml` (or `$PRICE_MONITOR_CONFIG`),
    /// then `PRICE_MONITOR__*` variables, then `GOOGLE_API_KEY` and `PORT`.
    pub fn load() -> Result<Self> {
        let file = std::env::var("PRICE_MONITOR_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let port_override = match std::env::var("PORT") {
            Ok(port) => Some(
                port.parse::<i64>()
                    .with_context(|| format!("Invalid PORT value: {}", port))?,
            ),
            Err(_) => None,
        };

        let settings = Self::defaults()?
            .add_source(config::File::with_name(&file).required(false))
            .add_source(
                config::Environment::with_prefix("PRICE_MONITOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("llm.api_key", std::env::var("GOOGLE_API_KEY").ok())?
            .set_override_option("server.port", port_override)?
            .build()
            .context("Failed to build configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;

        Ok(config)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("database.path", "data/prices.db")?
            .set_default("browser.mode", "webdriver")?
            .set_default("browser.webdriver_url", "http://localhost:4444")?
            .set_default("browser.user_agent", DEFAULT_USER_AGENT)?
            .set_default("browser.headless", true)?
            .set_default("browser.navigation_timeout_seconds", 90)?
            .set_default("browser.selector_timeout_seconds", 15)?
            .set_default("llm.api_key", "")?
            .set_default("llm.model", "gemini-1.5-flash")?
            .set_default("llm.base_url", "https://generativelanguage.googleapis.com")?
            .set_default("llm.timeout_seconds", 60)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.trim().is_empty() {
            bail!("GOOGLE_API_KEY is not set (or llm.api_key is empty)");
        }
        if self.llm.model.trim().is_empty() {
            bail!("llm.model must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Config {
        Config::defaults()
            .unwrap()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults_are_applied() {
        let config = from_toml("");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.database.path, "data/prices.db");
        assert_eq!(config.browser.mode, BrowserMode::WebDriver);
        assert_eq!(config.browser.navigation_timeout(), Duration::from_secs(90));
        assert_eq!(config.browser.selector_timeout(), Duration::from_secs(15));
        assert_eq!(config.llm.model, "gemini-1.5-flash");
        assert!(config.server.static_dir.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let config = from_toml(
            r#"
            [server]
            port = 8080
            static_dir = "client/build"

            [browser]
            mode = "http"

            [llm]
            api_key = "abc"
            "#,
        );
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.static_dir.as_deref(), Some("client/build"));
        assert_eq!(config.browser.mode, BrowserMode::Http);
        assert!(config.validate().is_ok());
    }

    // Process environment is shared between test threads.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    const ENV_VARS: [&str; 6] = [
        "PRICE_MONITOR_CONFIG",
        "GOOGLE_API_KEY",
        "PORT",
        "PRICE_MONITOR__SERVER__PORT",
        "PRICE_MONITOR__BROWSER__MODE",
        "PRICE_MONITOR__DATABASE__PATH",
    ];

    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for key in ENV_VARS {
            std::env::remove_var(key);
        }
        std::env::set_var("PRICE_MONITOR_CONFIG", "does-not-exist/price_monitor");
        for (key, value) in vars {
            std::env::set_var(key, value);
        }
        let result = f();
        for key in ENV_VARS {
            std::env::remove_var(key);
        }
        result
    }

    #[test]
    fn environment_overrides_file_and_defaults() {
        let config = with_env(
            &[
                ("GOOGLE_API_KEY", "env-key"),
                ("PORT", "4000"),
                ("PRICE_MONITOR__SERVER__PORT", "5000"),
                ("PRICE_MONITOR__BROWSER__MODE", "http"),
                ("PRICE_MONITOR__DATABASE__PATH", "/tmp/monitor.db"),
            ],
            Config::load,
        )
        .unwrap();

        assert_eq!(config.llm.api_key, "env-key");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.browser.mode, BrowserMode::Http);
        assert_eq!(config.database.path, "/tmp/monitor.db");
        assert_eq!(config.llm.model, "gemini-1.5-flash");
    }

    #[test]
    fn prefixed_port_applies_without_port_variable() {
        let config = with_env(
            &[
                ("GOOGLE_API_KEY", "env-key"),
                ("PRICE_MONITOR__SERVER__PORT", "5000"),
            ],
            Config::load,
        )
        .unwrap();

        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn invalid_port_variable_is_rejected() {
        let err = with_env(&[("GOOGLE_API_KEY", "env-key"), ("PORT", "http")], Config::load)
            .unwrap_err();
        assert!(err.to_string().contains("Invalid PORT value"));
    }

    #[test]
    fn load_without_api_key_fails() {
        let err = with_env(&[], Config::load).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn missing_api_key_fails_validation() {
        let config = from_toml("");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }
}
