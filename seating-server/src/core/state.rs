use std::sync::Arc;

use crate::core::{Config, Result, ServerError};
use crate::seating::{SeatingManager, SeatingStorage};

/// Shared application state, cheap to clone into handlers
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub manager: Arc<SeatingManager>,
}

impl ServerState {
    /// Open storage under the configured working directory and build the
    /// manager around it
    pub fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            ServerError::Config(format!(
                "Cannot create work dir {}: {e}",
                config.work_dir
            ))
        })?;
        let storage = SeatingStorage::open(config.db_path())?;
        Ok(Self {
            config: Arc::new(config.clone()),
            manager: Arc::new(SeatingManager::new(storage)),
        })
    }

    pub fn storage(&self) -> &SeatingStorage {
        self.manager.storage()
    }
}
