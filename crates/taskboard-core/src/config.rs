//! Configuration for the task board.
//!
//! The library reads no files or environment variables. The host builds a
//! `TaskBoardConfig` (or deserializes one from its own settings) and hands it
//! to `TaskManager::with_config`.

use serde::{Deserialize, Serialize};

/// Store key for pending tasks.
pub const DEFAULT_PENDING_KEY: &str = "tasks";

/// Store key for completed tasks.
pub const DEFAULT_COMPLETED_KEY: &str = "completedTasks";

/// Names of the two keys the board persists under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreKeys {
    pub pending: String,
    pub completed: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            pending: DEFAULT_PENDING_KEY.to_string(),
            completed: DEFAULT_COMPLETED_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskBoardConfig {
    pub keys: StoreKeys,
}
