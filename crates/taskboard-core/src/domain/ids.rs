//! Task identifiers.
//!
//! # ULID ベースの ID
//! 新しく生成される ID は ULID (Universally Unique Lexicographically Sortable Identifier)
//! を `task-` プレフィックス付きで文字列化したものです。
//!
//! ただし保存済みデータに含まれる ID はどんな文字列でも受け入れます。
//! ID はタスクと表示要素を対応付けるためだけに使い、形式には意味を持たせません。

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Display prefix for generated ids.
pub const TASK_ID_PREFIX: &str = "task-";

/// Identifier of a Task.
///
/// Opaque: two ids are equal iff their strings are equal. Serialized as a
/// plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wrap an existing id (e.g. one read back from the store).
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Build a `task-<ULID>` id.
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(format!("{TASK_ID_PREFIX}{ulid}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Ulid> for TaskId {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
