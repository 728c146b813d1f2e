//! Last-in-first-out history of completed tasks.

use tracing::debug;

use crate::domain::{Result, Task, TaskBoardError, TaskId};

/// Completed tasks in push order. The last pushed task is the top.
#[derive(Debug, Clone, Default)]
pub struct CompletedHistory {
    tasks: Vec<Task>,
}

impl CompletedHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: Task) {
        debug!(task_id = %task.id(), depth = self.tasks.len() + 1, "push completed task");
        self.tasks.push(task);
    }

    pub fn pop(&mut self) -> Result<Task> {
        self.tasks
            .pop()
            .ok_or(TaskBoardError::EmptyContainer("completed history"))
    }

    pub fn peek_top(&self) -> Result<&Task> {
        self.tasks
            .last()
            .ok_or(TaskBoardError::EmptyContainer("completed history"))
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.tasks.iter().any(|task| task.id() == id)
    }

    /// Push order (oldest first). This is the order that gets persisted.
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    /// Most recent first, the order the list is shown in.
    pub fn iter_recent(&self) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().rev()
    }
}
