//! PersistenceCodec - コンテナ ⇔ 保存用文字列の相互変換
//!
//! 各 blob は `{ "description", "priority", "id" }` の JSON 配列です。
//! completed 側の `completed = true` は暗黙なので保存しません。
//!
//! # デコード方針
//! - blob が無い（キー未保存）: 空リスト
//! - blob があるが JSON 配列として読めない: `CorruptPersistence`
//! - 読めたがレコードが不正（空の description、重複 id）: `InvalidRecord`

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::StoreKeys;
use crate::domain::{Priority, Result, Task, TaskBoardError, TaskId};

/// On-disk shape of one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredTask {
    description: String,
    priority: i64,
    id: TaskId,
}

impl From<&Task> for StoredTask {
    fn from(task: &Task) -> Self {
        Self {
            description: task.description().to_string(),
            priority: task.priority().get(),
            id: task.id().clone(),
        }
    }
}

/// Encodes both lists to strings and back.
///
/// Knows the store key names only to say which blob was bad.
#[derive(Debug, Clone, Default)]
pub struct PersistenceCodec {
    keys: StoreKeys,
}

impl PersistenceCodec {
    pub fn new(keys: StoreKeys) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &StoreKeys {
        &self.keys
    }

    /// Returns `(pending_blob, completed_blob)`. Empty lists encode as `[]`.
    pub fn encode<'a, P, C>(&self, pending: P, completed: C) -> Result<(String, String)>
    where
        P: IntoIterator<Item = &'a Task>,
        C: IntoIterator<Item = &'a Task>,
    {
        Ok((encode_list(pending)?, encode_list(completed)?))
    }

    /// Returns `(pending, completed)` in the order they were encoded.
    pub fn decode(
        &self,
        pending_blob: Option<&str>,
        completed_blob: Option<&str>,
    ) -> Result<(Vec<Task>, Vec<Task>)> {
        let pending = self.decode_blob(&self.keys.pending, pending_blob, false)?;
        let completed = self.decode_blob(&self.keys.completed, completed_blob, true)?;
        self.ensure_disjoint(&pending, &completed)?;
        Ok((pending, completed))
    }

    /// Decode one blob. Tasks from the completed blob come back marked completed.
    pub fn decode_blob(&self, key: &str, blob: Option<&str>, completed: bool) -> Result<Vec<Task>> {
        let Some(blob) = blob else {
            return Ok(Vec::new());
        };

        let records: Vec<StoredTask> =
            serde_json::from_str(blob).map_err(|source| TaskBoardError::CorruptPersistence {
                key: key.to_string(),
                source,
            })?;

        let mut seen = HashSet::with_capacity(records.len());
        let mut tasks = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            if !seen.insert(record.id.clone()) {
                return Err(invalid_record(key, format!("duplicate id {} at index {index}", record.id)));
            }
            let mut task = Task::create(record.id, record.description, Priority::new(record.priority))
                .map_err(|e| invalid_record(key, format!("index {index}: {e}")))?;
            if completed {
                task.mark_completed();
            }
            tasks.push(task);
        }
        Ok(tasks)
    }

    /// A task id may live in only one of the two lists.
    pub fn ensure_disjoint(&self, pending: &[Task], completed: &[Task]) -> Result<()> {
        let pending_ids: HashSet<&TaskId> = pending.iter().map(Task::id).collect();
        match completed.iter().find(|task| pending_ids.contains(task.id())) {
            Some(task) => Err(invalid_record(
                &self.keys.completed,
                format!("id {} is also pending", task.id()),
            )),
            None => Ok(()),
        }
    }
}

fn encode_list<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Result<String> {
    let records: Vec<StoredTask> = tasks.into_iter().map(StoredTask::from).collect();
    serde_json::to_string(&records).map_err(TaskBoardError::Encode)
}

fn invalid_record(key: &str, reason: String) -> TaskBoardError {
    TaskBoardError::InvalidRecord {
        key: key.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn task(id: &str, description: &str, priority: i64) -> Task {
        Task::create(TaskId::new(id), description, Priority::new(priority)).unwrap()
    }

    fn completed(id: &str, description: &str, priority: i64) -> Task {
        let mut task = task(id, description, priority);
        task.mark_completed();
        task
    }

    #[test]
    fn encode_writes_record_array() {
        let codec = PersistenceCodec::default();
        let pending = vec![task("t1", "call client", 1)];
        let done: Vec<Task> = Vec::new();

        let (pending_blob, completed_blob) = codec.encode(&pending, &done).unwrap();

        assert_eq!(
            pending_blob,
            r#"[{"description":"call client","priority":1,"id":"t1"}]"#
        );
        assert_eq!(completed_blob, "[]");
    }

    #[test]
    fn round_trip_preserves_order_and_flags() {
        let codec = PersistenceCodec::default();
        // 優先度順でない並びもそのまま戻ること
        let pending = vec![task("t3", "write report", 3), task("t1", "call client", 1)];
        let done = vec![completed("t2", "file taxes", 2), completed("t4", "pay rent", -1)];

        let (p, c) = codec.encode(&pending, &done).unwrap();
        let (decoded_pending, decoded_done) = codec.decode(Some(&p), Some(&c)).unwrap();

        assert_eq!(decoded_pending, pending);
        assert_eq!(decoded_done, done);
    }

    #[test]
    fn round_trip_of_empty_lists() {
        let codec = PersistenceCodec::default();
        let empty: Vec<Task> = Vec::new();

        let (p, c) = codec.encode(&empty, &empty).unwrap();
        let (pending, done) = codec.decode(Some(&p), Some(&c)).unwrap();

        assert!(pending.is_empty());
        assert!(done.is_empty());
    }

    #[test]
    fn absent_blobs_decode_as_empty() {
        let codec = PersistenceCodec::default();

        let (pending, done) = codec.decode(None, None).unwrap();

        assert!(pending.is_empty());
        assert!(done.is_empty());
    }

    #[rstest]
    #[case::not_json("definitely not json")]
    #[case::object(r#"{"description":"x","priority":1,"id":"a"}"#)]
    #[case::missing_field(r#"[{"description":"x","id":"a"}]"#)]
    #[case::fractional_priority(r#"[{"description":"x","priority":1.5,"id":"a"}]"#)]
    #[case::null("null")]
    fn malformed_blob_is_corrupt(#[case] blob: &str) {
        let codec = PersistenceCodec::default();

        let err = codec.decode(Some(blob), None).unwrap_err();

        match err {
            TaskBoardError::CorruptPersistence { key, .. } => assert_eq!(key, "tasks"),
            other => panic!("expected CorruptPersistence, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_completed_blob_names_its_key() {
        let codec = PersistenceCodec::default();

        let err = codec.decode(Some("[]"), Some("[")).unwrap_err();

        assert!(matches!(
            err,
            TaskBoardError::CorruptPersistence { ref key, .. } if key == "completedTasks"
        ));
    }

    #[test]
    fn blank_description_is_invalid_record() {
        let codec = PersistenceCodec::default();
        let blob = r#"[{"description":"  ","priority":1,"id":"a"}]"#;

        let err = codec.decode(Some(blob), None).unwrap_err();

        assert!(matches!(err, TaskBoardError::InvalidRecord { .. }));
        assert!(err.is_corruption());
    }

    #[test]
    fn duplicate_ids_are_invalid_records() {
        let codec = PersistenceCodec::default();
        let dup_in_blob = r#"[{"description":"a","priority":1,"id":"x"},{"description":"b","priority":2,"id":"x"}]"#;
        let single = r#"[{"description":"a","priority":1,"id":"x"}]"#;

        assert!(matches!(
            codec.decode(Some(dup_in_blob), None),
            Err(TaskBoardError::InvalidRecord { .. })
        ));
        assert!(matches!(
            codec.decode(Some(single), Some(single)),
            Err(TaskBoardError::InvalidRecord { ref key, .. }) if key == "completedTasks"
        ));
    }

    #[test]
    fn custom_keys_show_up_in_errors() {
        let codec = PersistenceCodec::new(StoreKeys {
            pending: "p".to_string(),
            completed: "c".to_string(),
        });

        let err = codec.decode(Some("{"), None).unwrap_err();

        assert!(matches!(err, TaskBoardError::CorruptPersistence { ref key, .. } if key == "p"));
    }
}
