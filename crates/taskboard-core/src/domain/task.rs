use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::{Result, TaskBoardError};
use super::TaskId;

/// Integer urgency rank. Lower values are dequeued first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(i64);

impl Priority {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for Priority {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl TryFrom<f64> for Priority {
    type Error = TaskBoardError;

    /// Accepts only finite, integral values inside the `i64` range.
    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(TaskBoardError::InvalidTask(format!(
                "priority must be a finite integer, got {value}"
            )));
        }
        if value.fract() != 0.0 {
            return Err(TaskBoardError::InvalidTask(format!(
                "priority must be an integer, got {value}"
            )));
        }
        // i64::MAX is not representable as f64; 2^63 rounds up to it.
        if value < i64::MIN as f64 || value >= i64::MAX as f64 {
            return Err(TaskBoardError::InvalidTask(format!(
                "priority {value} is out of range"
            )));
        }
        Ok(Self(value as i64))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Parse a priority typed into an input field.
pub fn parse_priority(input: &str) -> Result<Priority> {
    let trimmed = input.trim();
    trimmed
        .parse::<i64>()
        .map(Priority)
        .map_err(|e| TaskBoardError::InvalidTask(format!("priority {trimmed:?} is not an integer: {e}")))
}

/// A unit of work on the board.
///
/// `id`, `description` and `priority` are fixed at creation. `completed`
/// flips to true once, when the manager finalizes a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    description: String,
    priority: Priority,
    completed: bool,
}

impl Task {
    /// Validate and build a fresh (not completed) task.
    pub fn create(id: TaskId, description: impl Into<String>, priority: Priority) -> Result<Self> {
        let description = description.into();
        Self::validate_description(&description)?;
        Ok(Self {
            id,
            description,
            priority,
            completed: false,
        })
    }

    /// Reject empty or whitespace-only descriptions.
    pub fn validate_description(description: &str) -> Result<()> {
        if description.trim().is_empty() {
            return Err(TaskBoardError::InvalidTask(
                "description must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn mark_completed(&mut self) {
        self.completed = true;
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Priority: {})", self.description, self.priority)
    }
}
