//! Errors - エラー型と分類
//!
//! どのエラーもプロセスを止めるものではなく、TaskManager の境界で回復できます。

use thiserror::Error;

use crate::ports::StoreError;

/// TaskBoardError はこのクレートのドメインエラー
#[derive(Debug, Error)]
pub enum TaskBoardError {
    /// Rejected at creation: blank description or non-integer priority.
    #[error("invalid task: {0}")]
    InvalidTask(String),

    /// A queue/history operation was attempted on an empty container.
    #[error("{0} is empty")]
    EmptyContainer(&'static str),

    /// `complete_next` was called with nothing pending.
    #[error("no pending tasks to complete")]
    NoPendingTasks,

    /// A stored blob is present but is not the expected JSON array of records.
    #[error("stored value under key={key} is not a task list: {source}")]
    CorruptPersistence {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A stored blob parsed, but one of its records breaks a task invariant.
    #[error("stored value under key={key} has an invalid record: {reason}")]
    InvalidRecord { key: String, reason: String },

    /// The id generator kept returning ids that are already on the board.
    #[error("no unused task id after {0} attempts")]
    IdExhausted(usize),

    #[error("failed to encode tasks: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TaskBoardError {
    /// Corruption of persisted state, in either form.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            TaskBoardError::CorruptPersistence { .. } | TaskBoardError::InvalidRecord { .. }
        )
    }
}

pub type Result<T, E = TaskBoardError> = std::result::Result<T, E>;
