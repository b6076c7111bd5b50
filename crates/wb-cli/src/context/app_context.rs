use std::path::Path;

use anyhow::Context;
use wb_config::{DatabaseConfig, WbConfig};
use wb_db::service::WbService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: WbService,
    pub config: WbConfig,
}

impl AppContext {
    /// Open the configured database, creating its directory when needed.
    ///
    /// `--db` overrides `database.path`.
    pub async fn init(mut config: WbConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        if let Some(path) = flags.db.as_deref() {
            config.database = DatabaseConfig {
                path: path.to_string(),
            };
            config.database.validate()?;
        }

        if let Some(parent) = config.database.parent_dir() {
            ensure_dir(parent)?;
        }

        let service = WbService::new_local(&config.database.path)
            .await
            .with_context(|| format!("failed to open database '{}'", config.database.path))?;
        tracing::debug!(path = %config.database.path, "opened waybill database");

        Ok(Self { service, config })
    }

    /// In-memory context for tests.
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let mut config = WbConfig::default();
        config.database.path = wb_config::IN_MEMORY.to_string();
        let service = WbService::new_local(wb_config::IN_MEMORY).await.unwrap();
        Self { service, config }
    }
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory '{}'", dir.display()))
}
