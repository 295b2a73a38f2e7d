use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub polling: PollingSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingSettings {
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DashboardSettings {
    /// Trailing-day window applied when a request names none. `None` is all time.
    #[serde(default)]
    pub default_days: Option<u32>,
    #[serde(default = "default_max_records")]
    pub max_records: usize,
    #[serde(default)]
    pub sort_chronologically: bool,
    /// Minutes after the newest reading when the next fetch is expected.
    #[serde(default = "default_next_fetch_minutes")]
    pub next_fetch_minutes: i64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            default_days: None,
            max_records: default_max_records(),
            sort_chronologically: false,
            next_fetch_minutes: default_next_fetch_minutes(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_max_records() -> usize {
    100
}

fn default_next_fetch_minutes() -> i64 {
    120
}

/// Load `config/dashboard.*`, overridden by `DASHBOARD__SECTION__KEY` environment variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                "[upstream]\nbase_url = \"http://localhost:8000/api\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: AppConfig = settings.try_deserialize().unwrap();
        assert_eq!(config.upstream.base_url, "http://localhost:8000/api");
        assert_eq!(config.upstream.timeout_secs, 10);
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.polling.interval_secs, 60);
        assert_eq!(config.dashboard, DashboardSettings::default());
    }

    #[test]
    fn test_dashboard_section_overrides() {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [upstream]
                base_url = "http://sensors.local/api"

                [dashboard]
                default_days = 7
                max_records = 500
                sort_chronologically = true
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: AppConfig = settings.try_deserialize().unwrap();
        assert_eq!(config.dashboard.default_days, Some(7));
        assert_eq!(config.dashboard.max_records, 500);
        assert!(config.dashboard.sort_chronologically);
        assert_eq!(config.dashboard.next_fetch_minutes, 120);
    }
}
