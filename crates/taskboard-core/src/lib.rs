//! taskboard-core
//!
//! Core of a priority-ordered task board: a pending queue, a completed
//! history, their persistence round-trip, and the manager that owns them.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, task, errors, state, events）
//! - **queue**: PendingQueue と CompletedHistory
//! - **codec**: 保存用文字列との相互変換
//! - **ports**: 抽象化レイヤー（KeyValueStore, EventSink, IdGenerator, Clock）
//! - **app**: TaskManager
//! - **impls**: 実装（InMemoryStore など開発用）
//! - **config**: ストアのキー名

pub mod app;
pub mod codec;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod queue;

pub use app::{CompletionStart, ReloadReport, TaskManager};
pub use codec::PersistenceCodec;
pub use config::{StoreKeys, TaskBoardConfig};
pub use domain::{
    BoardEvent, BoardSnapshot, ManagerState, Priority, Result, Task, TaskBoardError, TaskId,
};
pub use queue::{CompletedHistory, PendingQueue};
