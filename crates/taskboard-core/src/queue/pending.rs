//! Priority-ordered container of tasks awaiting completion.

use std::collections::VecDeque;

use tracing::debug;

use crate::domain::{Priority, Result, Task, TaskBoardError, TaskId};

/// One slot in the pending queue.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingEntry {
    priority: Priority,
    task: Task,
}

/// Tasks sorted ascending by priority, FIFO within a priority band.
///
/// Insertion is a linear scan (O(n)); removal from the front is O(1).
#[derive(Debug, Clone, Default)]
pub struct PendingQueue {
    entries: VecDeque<PendingEntry>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert before the first entry with a strictly greater priority,
    /// or at the back if there is none.
    pub fn enqueue(&mut self, task: Task, priority: Priority) {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.priority > priority)
            .unwrap_or(self.entries.len());
        debug!(task_id = %task.id(), priority = %priority, position, "enqueue pending task");
        self.entries.insert(position, PendingEntry { priority, task });
    }

    /// Put a task back at the front of its priority band, ahead of tasks
    /// that were enqueued after it.
    pub(crate) fn requeue_front(&mut self, task: Task) {
        let priority = task.priority();
        let position = self.band_front(priority);
        debug!(task_id = %task.id(), priority = %priority, position, "requeue pending task");
        self.entries.insert(position, PendingEntry { priority, task });
    }

    /// Index of the first entry whose priority is greater than or equal to
    /// `priority`, or `len()` if there is none.
    pub(crate) fn band_front(&self, priority: Priority) -> usize {
        self.entries
            .iter()
            .position(|entry| entry.priority >= priority)
            .unwrap_or(self.entries.len())
    }

    /// Append tasks in exactly the given order, without re-sorting.
    ///
    /// Used when rebuilding from the store, where the stored order wins.
    pub fn restore(&mut self, tasks: impl IntoIterator<Item = Task>) {
        self.entries.extend(tasks.into_iter().map(|task| PendingEntry {
            priority: task.priority(),
            task,
        }));
    }

    /// Remove and return the most urgent task.
    pub fn dequeue(&mut self) -> Result<Task> {
        self.entries
            .pop_front()
            .map(|entry| entry.task)
            .ok_or(TaskBoardError::EmptyContainer("pending queue"))
    }

    pub fn peek_front(&self) -> Result<&Task> {
        self.entries
            .front()
            .map(|entry| &entry.task)
            .ok_or(TaskBoardError::EmptyContainer("pending queue"))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.entries.iter().any(|entry| entry.task.id() == id)
    }

    /// Tasks in dequeue order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> + '_ {
        self.entries.iter().map(|entry| &entry.task)
    }

    /// Owned copy of the tasks in dequeue order.
    pub fn tasks(&self) -> Vec<Task> {
        self.iter().cloned().collect()
    }
}
