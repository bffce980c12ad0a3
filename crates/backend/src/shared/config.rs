use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub invoices: InvoicesConfig,
    #[serde(default)]
    pub activity_log: ActivityLogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub access_token_hours: i64,
    pub refresh_token_days: i64,
    /// Generated at startup when absent
    pub jwt_secret: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_hours: 24,
            refresh_token_days: 90,
            jwt_secret: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub seed_demo_data: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct InvoicesConfig {
    pub sales_prefix: String,
    pub purchase_prefix: String,
}

impl Default for InvoicesConfig {
    fn default() -> Self {
        Self {
            sales_prefix: "FV".into(),
            purchase_prefix: "FC".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ActivityLogConfig {
    pub max_entries: usize,
}

impl Default for ActivityLogConfig {
    fn default() -> Self {
        Self { max_entries: 1000 }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[auth]
access_token_hours = 24
refresh_token_days = 90

[store]
seed_demo_data = true

[invoices]
sales_prefix = "FV"
purchase_prefix = "FC"

[activity_log]
max_entries = 1000
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.invoices.sales_prefix.trim().is_empty()
        || config.invoices.purchase_prefix.trim().is_empty()
    {
        anyhow::bail!("Invoice number prefixes cannot be empty");
    }
    if config.invoices.sales_prefix == config.invoices.purchase_prefix {
        anyhow::bail!("Sales and purchase invoice prefixes must differ");
    }
    if config.auth.access_token_hours <= 0 || config.auth.refresh_token_days <= 0 {
        anyhow::bail!("Token lifetimes must be positive");
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.access_token_hours, 24);
        assert!(config.auth.jwt_secret.is_none());
        assert!(config.store.seed_demo_data);
        assert_eq!(config.invoices.sales_prefix, "FV");
        assert_eq!(config.activity_log.max_entries, 1000);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("[server]\nhost = \"127.0.0.1\"\nport = 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.invoices.purchase_prefix, "FC");
        assert_eq!(config.auth.refresh_token_days, 90);
    }

    #[test]
    fn test_equal_prefixes_are_rejected() {
        let toml = "[invoices]\nsales_prefix = \"F\"\npurchase_prefix = \"F\"\n";
        assert!(parse_config(toml).is_err());
    }
}
