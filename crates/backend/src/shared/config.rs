use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    /// Brand assigned when a row carries no recognisable brand.
    /// Empty string disables the fallback.
    #[serde(default = "default_brand")]
    pub default_brand: String,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_brand: default_brand(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl ImportConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

fn default_port() -> u16 {
    3000
}

fn default_brand() -> String {
    "sleepwear".to_string()
}

fn default_max_upload_mb() -> usize {
    20
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/crm.db"

[server]
port = 3000

[import]
default_brand = "sleepwear"
max_upload_mb = 20
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Current working directory (for `cargo run` from the workspace root)
/// 3. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    let mut candidates = Vec::new();
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("config.toml"));
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join("config.toml"));
    }
    load_config_from(&candidates)
}

/// Первый существующий файл из списка, иначе встроенная конфигурация
fn load_config_from(candidates: &[PathBuf]) -> anyhow::Result<Config> {
    for config_path in candidates {
        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            let contents = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&contents)?;
            return Ok(config);
        }
        tracing::warn!("config.toml not found at: {}", config_path.display());
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(db_path));
        }
    }

    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.database.path, "target/db/crm.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.import.default_brand, "sleepwear");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str("[database]\npath = \"x.db\"\n").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.import.max_upload_bytes(), 20 * 1024 * 1024);
    }

    #[test]
    fn test_brand_fallback_can_be_disabled() {
        let config: Config =
            toml::from_str("[database]\npath = \"x.db\"\n[import]\ndefault_brand = \"\"\n").unwrap();
        assert!(config.import.default_brand.is_empty());
        assert_eq!(config.import.max_upload_mb, 20);
    }

    #[test]
    fn test_first_existing_candidate_wins() {
        let dir = std::env::temp_dir().join(format!("crm-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let present = dir.join("config.toml");
        std::fs::write(&present, "[database]\npath = \"cwd.db\"\n[server]\nport = 8080\n").unwrap();

        let config = load_config_from(&[dir.join("missing").join("config.toml"), present]).unwrap();
        assert_eq!(config.database.path, "cwd.db");
        assert_eq!(config.server.port, 8080);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_no_candidates_falls_back_to_embedded() {
        let config = load_config_from(&[]).unwrap();
        assert_eq!(config.database.path, "target/db/crm.db");
    }
}
