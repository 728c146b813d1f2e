//! TaskManager - コンテナの唯一の所有者
//!
//! # 学習ポイント
//! - コンストラクタ注入（ストア、表示層、ID 生成器を外から渡す）
//! - 2 段階の完了プロトコル（complete_next → finalize_completion）
//! - 永続化の失敗はログに残して続行（メモリ上のコンテナが正本）

use tracing::{debug, info, warn};

use crate::codec::PersistenceCodec;
use crate::config::TaskBoardConfig;
use crate::domain::{
    BoardEvent, BoardSnapshot, ManagerState, Priority, Result, Task, TaskBoardError, TaskId,
    parse_priority,
};
use crate::ports::{EventSink, IdGenerator, KeyValueStore};
use crate::queue::{CompletedHistory, PendingQueue};

/// How many fresh ids `add_task` tries before giving up on a generator
/// that keeps colliding with existing tasks.
const MAX_ID_ATTEMPTS: usize = 16;

/// Anything `add_task` accepts as a priority.
///
/// Integers always convert. Floats must be finite and integral. Text is
/// parsed the way an input field would be.
pub trait IntoPriority {
    fn into_priority(self) -> Result<Priority>;
}

impl IntoPriority for Priority {
    fn into_priority(self) -> Result<Priority> {
        Ok(self)
    }
}

impl IntoPriority for i64 {
    fn into_priority(self) -> Result<Priority> {
        Ok(Priority::new(self))
    }
}

impl IntoPriority for i32 {
    fn into_priority(self) -> Result<Priority> {
        Ok(Priority::new(i64::from(self)))
    }
}

impl IntoPriority for f64 {
    fn into_priority(self) -> Result<Priority> {
        Priority::try_from(self)
    }
}

impl IntoPriority for &str {
    fn into_priority(self) -> Result<Priority> {
        parse_priority(self)
    }
}

/// Result of a `complete_next` call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionStart {
    /// The front task was dequeued and now waits for `finalize_completion`.
    Started(Task),

    /// A completion was already in flight; nothing happened.
    AlreadyCompleting,
}

/// What `reload` managed to recover.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadReport {
    pub pending: usize,
    pub completed: usize,

    /// Keys whose stored value was malformed and was treated as empty.
    pub corrupt_keys: Vec<String>,

    /// Keys the store failed to read; treated as empty.
    pub unreadable_keys: Vec<String>,
}

impl ReloadReport {
    pub fn is_clean(&self) -> bool {
        self.corrupt_keys.is_empty() && self.unreadable_keys.is_empty()
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Completing(Task),
}

/// Orchestrates the pending queue, the completed history and persistence.
///
/// # 状態遷移
/// - `Idle --add_task--> Idle`
/// - `Idle --complete_next--> Completing`（キューが空なら `NoPendingTasks`）
/// - `Completing --complete_next--> Completing`（何もしない）
/// - `Completing --finalize_completion--> Idle`
/// - `* --clear--> Idle`（進行中の完了は破棄）
/// - `* --reload--> Idle`
///
/// If the presentation layer never calls back, the manager stays in
/// `Completing`. `abort_completion` is the manual way out.
pub struct TaskManager<S, E> {
    pending: PendingQueue,
    completed: CompletedHistory,
    phase: Phase,
    codec: PersistenceCodec,
    store: S,
    sink: E,
    ids: Box<dyn IdGenerator>,
}

impl<S: KeyValueStore, E: EventSink> TaskManager<S, E> {
    /// Build an empty manager with the default store keys.
    ///
    /// Call `reload` once at startup to pick up persisted tasks, or use `open`.
    pub fn new(store: S, sink: E, ids: impl IdGenerator + 'static) -> Self {
        Self::with_config(TaskBoardConfig::default(), store, sink, ids)
    }

    pub fn with_config(
        config: TaskBoardConfig,
        store: S,
        sink: E,
        ids: impl IdGenerator + 'static,
    ) -> Self {
        Self {
            pending: PendingQueue::new(),
            completed: CompletedHistory::new(),
            phase: Phase::Idle,
            codec: PersistenceCodec::new(config.keys),
            store,
            sink,
            ids: Box::new(ids),
        }
    }

    /// Build a manager and immediately rebuild it from the store.
    pub fn open(store: S, sink: E, ids: impl IdGenerator + 'static) -> (Self, ReloadReport) {
        let mut manager = Self::new(store, sink, ids);
        let report = manager.reload();
        (manager, report)
    }

    /// Validate, enqueue and persist a new task. Returns its id, which is
    /// also sent to the sink as the highlight hint.
    pub fn add_task(
        &mut self,
        description: impl Into<String>,
        priority: impl IntoPriority,
    ) -> Result<TaskId> {
        let description = description.into();
        Task::validate_description(&description)?;
        let priority = priority.into_priority()?;
        let id = self.fresh_id()?;
        let task = Task::create(id.clone(), description, priority)?;

        self.pending.enqueue(task, priority);
        info!(task_id = %id, priority = %priority, pending = self.pending.len(), "task added");

        self.persist();
        self.emit(BoardEvent::TaskAdded { id: id.clone() });
        Ok(id)
    }

    /// Start completing the most urgent task.
    ///
    /// While a completion is in flight this is a no-op. With nothing pending
    /// it fails with `NoPendingTasks` and the state stays `Idle`.
    pub fn complete_next(&mut self) -> Result<CompletionStart> {
        if let Phase::Completing(task) = &self.phase {
            debug!(task_id = %task.id(), "completion already in flight; ignoring");
            return Ok(CompletionStart::AlreadyCompleting);
        }

        let task = match self.pending.dequeue() {
            Ok(task) => task,
            Err(TaskBoardError::EmptyContainer(_)) => return Err(TaskBoardError::NoPendingTasks),
            Err(e) => return Err(e),
        };

        info!(task_id = %task.id(), priority = %task.priority(), "completion started");
        self.phase = Phase::Completing(task.clone());
        self.emit(BoardEvent::CompletionStarted { task: task.clone() });
        Ok(CompletionStart::Started(task))
    }

    /// Called by the presentation layer once its animation has finished.
    ///
    /// Returns the completed task, or `None` if nothing was in flight (for
    /// instance because `clear` ran in between).
    pub fn finalize_completion(&mut self) -> Option<Task> {
        let Phase::Completing(mut task) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            debug!("finalize_completion with nothing in flight; ignoring");
            return None;
        };

        task.mark_completed();
        let id = task.id().clone();
        self.completed.push(task.clone());
        info!(task_id = %id, completed = self.completed.len(), "completion finalized");

        self.persist();
        self.emit(BoardEvent::TaskCompleted { id });
        Some(task)
    }

    /// Put the in-flight task back at the front of its priority band and
    /// return to `Idle`. For drivers that will never call back.
    pub fn abort_completion(&mut self) -> Option<TaskId> {
        let Phase::Completing(task) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return None;
        };

        let id = task.id().clone();
        self.pending.requeue_front(task);
        warn!(task_id = %id, "completion aborted; task returned to pending");

        self.persist();
        self.emit(BoardEvent::CompletionAborted { id: id.clone() });
        Some(id)
    }

    /// Empty both lists, drop any in-flight completion and erase the stored
    /// keys. The in-memory part always happens; store failures are returned.
    pub fn clear(&mut self) -> Result<()> {
        if let Phase::Completing(task) = &self.phase {
            info!(task_id = %task.id(), "clear discards in-flight completion");
        }
        self.pending.clear();
        self.completed.clear();
        self.phase = Phase::Idle;

        let keys = self.codec.keys().clone();
        let erased = self
            .store
            .remove(&keys.pending)
            .and_then(|()| self.store.remove(&keys.completed));
        if let Err(e) = &erased {
            warn!(error = %e, "failed to erase persisted tasks");
        }
        info!("board cleared");

        self.emit(BoardEvent::Cleared);
        erased.map_err(TaskBoardError::from)
    }

    /// Rebuild both lists from the store.
    ///
    /// The stored order is kept as is for both lists. A blob that cannot be
    /// read or decoded is logged and treated as empty.
    pub fn reload(&mut self) -> ReloadReport {
        self.pending.clear();
        self.completed.clear();
        self.phase = Phase::Idle;

        let mut report = ReloadReport::default();
        let keys = self.codec.keys().clone();

        let pending = self.load_key(&keys.pending, false, &mut report);
        let mut completed = self.load_key(&keys.completed, true, &mut report);

        if let Err(e) = self.codec.ensure_disjoint(&pending, &completed) {
            warn!(key = %keys.completed, error = %e, "stored lists overlap; dropping completed list");
            report.corrupt_keys.push(keys.completed.clone());
            completed.clear();
        }

        report.pending = pending.len();
        report.completed = completed.len();
        self.pending.restore(pending);
        for task in completed {
            self.completed.push(task);
        }

        info!(
            pending = report.pending,
            completed = report.completed,
            clean = report.is_clean(),
            "board reloaded"
        );
        self.emit(BoardEvent::Reloaded);
        report
    }

    pub fn state(&self) -> ManagerState {
        match self.phase {
            Phase::Idle => ManagerState::Idle,
            Phase::Completing(_) => ManagerState::Completing,
        }
    }

    /// The dequeued task waiting for `finalize_completion`.
    pub fn in_flight(&self) -> Option<&Task> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Completing(task) => Some(task),
        }
    }

    pub fn pending(&self) -> &PendingQueue {
        &self.pending
    }

    pub fn completed(&self) -> &CompletedHistory {
        &self.completed
    }

    /// Pending tasks in dequeue order.
    pub fn pending_tasks(&self) -> Vec<Task> {
        self.pending.tasks()
    }

    /// Completed tasks, most recent first.
    pub fn completed_recent_first(&self) -> Vec<Task> {
        self.completed.iter_recent().cloned().collect()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            pending: self.pending_tasks(),
            completed: self.completed_recent_first(),
        }
    }

    fn fresh_id(&self) -> Result<TaskId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.generate_task_id();
            if !self.is_known(&id) {
                return Ok(id);
            }
            debug!(task_id = %id, "generated id already in use; retrying");
        }
        Err(TaskBoardError::IdExhausted(MAX_ID_ATTEMPTS))
    }

    fn is_known(&self, id: &TaskId) -> bool {
        self.pending.contains(id)
            || self.completed.contains(id)
            || self.in_flight().is_some_and(|task| task.id() == id)
    }

    fn load_key(&self, key: &str, completed: bool, report: &mut ReloadReport) -> Vec<Task> {
        let blob = match self.store.get(key) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(key, error = %e, "failed to read stored tasks; starting empty");
                report.unreadable_keys.push(key.to_string());
                return Vec::new();
            }
        };

        match self.codec.decode_blob(key, blob.as_deref(), completed) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(key, error = %e, "stored tasks are corrupt; starting empty");
                report.corrupt_keys.push(key.to_string());
                Vec::new()
            }
        }
    }

    /// Write both lists. A completion still in flight is written into the
    /// pending list at the front of its priority band, so a restart before
    /// finalization brings it back without breaking the stored order.
    fn persist(&mut self) {
        let mut pending: Vec<&Task> = self.pending.iter().collect();
        if let Phase::Completing(task) = &self.phase {
            pending.insert(self.pending.band_front(task.priority()), task);
        }
        let encoded = self.codec.encode(pending, self.completed.as_slice());
        let (pending_blob, completed_blob) = match encoded {
            Ok(blobs) => blobs,
            Err(e) => {
                warn!(error = %e, "failed to encode tasks; not persisted");
                return;
            }
        };

        let keys = self.codec.keys();
        for (key, blob) in [(&keys.pending, pending_blob), (&keys.completed, completed_blob)] {
            if let Err(e) = self.store.set(key, &blob) {
                warn!(key = %key, error = %e, "failed to persist tasks");
            }
        }
    }

    fn emit(&mut self, event: BoardEvent) {
        let snapshot = self.snapshot();
        self.sink.emit(&event, &snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{InMemoryStore, NoopEventSink, RecordingEventSink};
    use crate::ports::{SequentialIdGenerator, StoreError};

    /// Store whose every call fails.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> std::result::Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("disk gone".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("disk gone".to_string()))
        }

        fn remove(&mut self, _key: &str) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("disk gone".to_string()))
        }
    }

    /// Always hands out the same id.
    struct StuckIdGenerator;

    impl IdGenerator for StuckIdGenerator {
        fn generate_task_id(&self) -> TaskId {
            TaskId::new("same")
        }
    }

    fn manager() -> (TaskManager<InMemoryStore, RecordingEventSink>, InMemoryStore, RecordingEventSink) {
        let store = InMemoryStore::new();
        let sink = RecordingEventSink::new();
        let manager = TaskManager::new(store.clone(), sink.clone(), SequentialIdGenerator::new());
        (manager, store, sink)
    }

    fn descriptions(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(Task::description).collect()
    }

    #[test]
    fn add_task_accepts_every_priority_form() {
        let (mut manager, _, _) = manager();

        manager.add_task("a", 3_i64).unwrap();
        manager.add_task("b", 2_i32).unwrap();
        manager.add_task("c", 1.0_f64).unwrap();
        manager.add_task("d", " 0 ").unwrap();

        assert_eq!(descriptions(&manager.pending_tasks()), vec!["d", "c", "b", "a"]);
    }

    #[test]
    fn add_task_emits_highlight_hint() {
        let (mut manager, _, sink) = manager();

        let id = manager.add_task("a", 1).unwrap();

        let last = sink.last().unwrap();
        assert_eq!(last.event, BoardEvent::TaskAdded { id: id.clone() });
        assert_eq!(last.event.highlight(), Some(&id));
        assert_eq!(last.snapshot.pending.len(), 1);
    }

    #[test]
    fn colliding_generator_is_reported() {
        let mut manager = TaskManager::new(InMemoryStore::new(), NoopEventSink, StuckIdGenerator);

        manager.add_task("first", 1).unwrap();
        let err = manager.add_task("second", 1).unwrap_err();

        assert!(matches!(err, TaskBoardError::IdExhausted(MAX_ID_ATTEMPTS)));
        assert_eq!(manager.pending().len(), 1);
    }

    #[test]
    fn generator_restarted_after_reload_skips_used_ids() {
        let (mut manager, store, _) = manager();
        manager.add_task("a", 1).unwrap();
        manager.add_task("b", 2).unwrap();

        let (mut restarted, _) =
            TaskManager::open(store, NoopEventSink, SequentialIdGenerator::new());
        let id = restarted.add_task("c", 3).unwrap();

        assert_eq!(id.as_str(), "task-3");
    }

    #[test]
    fn persist_failure_keeps_in_memory_state() {
        let mut manager = TaskManager::new(BrokenStore, NoopEventSink, SequentialIdGenerator::new());

        manager.add_task("a", 1).unwrap();
        manager.complete_next().unwrap();
        let finalized = manager.finalize_completion().unwrap();

        assert!(finalized.is_completed());
        assert_eq!(manager.completed().len(), 1);
    }

    #[test]
    fn clear_reports_store_failure_after_emptying() {
        let mut manager = TaskManager::new(BrokenStore, NoopEventSink, SequentialIdGenerator::new());
        manager.add_task("a", 1).unwrap();

        let err = manager.clear().unwrap_err();

        assert!(matches!(err, TaskBoardError::Store(StoreError::Unavailable(_))));
        assert!(manager.pending().is_empty());
        assert_eq!(manager.state(), ManagerState::Idle);
    }

    #[test]
    fn unreadable_store_reloads_empty() {
        let mut manager = TaskManager::new(BrokenStore, NoopEventSink, SequentialIdGenerator::new());

        let report = manager.reload();

        assert_eq!(report.unreadable_keys, vec!["tasks", "completedTasks"]);
        assert!(!report.is_clean());
        assert!(manager.pending().is_empty());
    }

    #[test]
    fn in_flight_task_is_persisted_in_priority_order() {
        let (mut manager, store, _) = manager();
        manager.add_task("urgent", 1).unwrap();
        manager.add_task("later", 5).unwrap();

        manager.complete_next().unwrap();
        manager.add_task("sooner", 0).unwrap();

        // 完了処理中に再起動しても urgent は失われず、優先度順も崩れない
        let (mut restarted, _) =
            TaskManager::open(store, NoopEventSink, SequentialIdGenerator::new());
        assert_eq!(
            descriptions(&restarted.pending_tasks()),
            vec!["sooner", "urgent", "later"]
        );

        let CompletionStart::Started(next) = restarted.complete_next().unwrap() else {
            panic!("expected a started completion");
        };
        assert_eq!(next.description(), "sooner");
        assert_eq!(next.priority().get(), 0);
    }

    #[test]
    fn in_flight_task_is_persisted_ahead_of_its_band() {
        let (mut manager, store, _) = manager();
        manager.add_task("first", 2).unwrap();
        manager.add_task("second", 2).unwrap();

        manager.complete_next().unwrap();
        manager.add_task("third", 2).unwrap();

        let (restarted, _) = TaskManager::open(store, NoopEventSink, SequentialIdGenerator::new());
        assert_eq!(
            descriptions(&restarted.pending_tasks()),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn rejected_description_does_not_consume_an_id() {
        let (mut manager, _, _) = manager();

        let err = manager.add_task("   ", 1).unwrap_err();
        let id = manager.add_task("a", 1).unwrap();

        assert!(matches!(err, TaskBoardError::InvalidTask(_)));
        assert_eq!(id.as_str(), "task-1");
    }

    #[test]
    fn abort_completion_returns_task_to_front_of_band() {
        let (mut manager, _, sink) = manager();
        manager.add_task("a", 1).unwrap();
        manager.add_task("b", 1).unwrap();
        manager.add_task("c", 2).unwrap();

        let CompletionStart::Started(task) = manager.complete_next().unwrap() else {
            panic!("expected a started completion");
        };
        let aborted = manager.abort_completion().unwrap();

        assert_eq!(&aborted, task.id());
        assert_eq!(manager.state(), ManagerState::Idle);
        assert_eq!(descriptions(&manager.pending_tasks()), vec!["a", "b", "c"]);
        assert_eq!(
            sink.last().unwrap().event,
            BoardEvent::CompletionAborted { id: aborted }
        );
        assert!(manager.abort_completion().is_none());
    }

    #[test]
    fn finalize_without_completion_is_ignored() {
        let (mut manager, _, sink) = manager();

        assert!(manager.finalize_completion().is_none());
        assert!(sink.is_empty());
    }

    #[test]
    fn in_flight_is_exposed_while_completing() {
        let (mut manager, _, _) = manager();
        manager.add_task("a", 1).unwrap();

        manager.complete_next().unwrap();

        assert_eq!(manager.state(), ManagerState::Completing);
        assert_eq!(manager.in_flight().map(Task::description), Some("a"));
        assert!(manager.pending().is_empty());
        assert!(manager.completed().is_empty());
    }

    #[test]
    fn custom_keys_are_used_for_persistence() {
        let store = InMemoryStore::new();
        let config: TaskBoardConfig =
            serde_json::from_str(r#"{ "keys": { "pending": "p", "completed": "c" } }"#).unwrap();
        let mut manager =
            TaskManager::with_config(config, store.clone(), NoopEventSink, SequentialIdGenerator::new());

        manager.add_task("a", 1).unwrap();

        assert!(store.contains_key("p"));
        assert!(store.contains_key("c"));
        assert!(!store.contains_key("tasks"));
    }
}
