// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub database_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        Self::load_from_file(&environment)
    }

    fn get_environment() -> String {
        std::env::var("INTAKE_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(environment: &str) -> Result<Self> {
        let config_path = PathBuf::from("config.yaml");
        if !config_path.exists() {
            anyhow::bail!("config.yaml not found in current directory. Server cannot start without configuration.");
        }

        let config_content =
            std::fs::read_to_string(&config_path).context("Failed to read config.yaml")?;

        let config_file: ConfigFile =
            serde_yaml::from_str(&config_content).context("Failed to parse config.yaml")?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        Ok(Self {
            database_path: Self::resolve_path(&env_config.database_path)?,
        })
    }

    fn resolve_path(path: &PathBuf) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.clone())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    /// Ensure the database parent directory exists
    pub async fn ensure_directories(&self) -> Result<()> {
        if let Some(db_parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(db_parent)
                .await
                .with_context(|| {
                    format!(
                        "Failed to create database directory: {}",
                        db_parent.display()
                    )
                })?;
        }

        info!("All configured directories ensured to exist");
        Ok(())
    }
}
