//! Events - ドメインイベント
//!
//! TaskManager は状態が変わるたびに BoardEvent を EventSink に送ります。
//! 表示側はイベントに含まれる id を使って、どの要素を強調するかを決めます。

use super::{Task, TaskId};

/// Something that changed on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// A task was enqueued. Highlight hint for the pending list.
    TaskAdded { id: TaskId },

    /// The front task left the pending list and awaits finalization.
    /// The presentation layer animates it and then calls back.
    CompletionStarted { task: Task },

    /// A completion was finalized. Highlight hint for the completed list.
    TaskCompleted { id: TaskId },

    /// An in-flight completion was put back into the pending list.
    CompletionAborted { id: TaskId },

    /// Both lists were emptied and persisted state erased.
    Cleared,

    /// Lists were rebuilt from the store at startup.
    Reloaded,
}

impl BoardEvent {
    /// Task the presentation layer should highlight, if any.
    pub fn highlight(&self) -> Option<&TaskId> {
        match self {
            BoardEvent::TaskAdded { id }
            | BoardEvent::TaskCompleted { id }
            | BoardEvent::CompletionAborted { id } => Some(id),
            BoardEvent::CompletionStarted { task } => Some(task.id()),
            BoardEvent::Cleared | BoardEvent::Reloaded => None,
        }
    }
}

/// Owned view of both lists, handed to sinks alongside each event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    /// Pending tasks in dequeue order.
    pub pending: Vec<Task>,

    /// Completed tasks, most recent first.
    pub completed: Vec<Task>,
}
