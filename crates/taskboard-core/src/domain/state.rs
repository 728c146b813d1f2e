//! State - TaskManager の状態
//!
//! # 状態遷移
//! - Idle --add_task--> Idle
//! - Idle --complete_next--> Completing（キューが空なら Idle のまま）
//! - Completing --finalize_completion--> Idle
//! - Idle/Completing --clear--> Idle
//! - * --reload--> Idle

/// Coarse state of the manager, without the in-flight task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    /// No completion in flight.
    Idle,

    /// A task has been dequeued and waits for `finalize_completion`.
    Completing,
}

impl ManagerState {
    pub fn is_idle(self) -> bool {
        matches!(self, ManagerState::Idle)
    }
}
