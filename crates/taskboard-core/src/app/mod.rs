//! App - アプリケーション層
//!
//! このモジュールは、queue・codec・ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **TaskManager**: タスクの追加、2 段階の完了、クリア、起動時の再構築

pub mod manager;

pub use self::manager::{CompletionStart, IntoPriority, ReloadReport, TaskManager};
