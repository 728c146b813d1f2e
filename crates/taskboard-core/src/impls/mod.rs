//! Impls - 実装（開発用・テスト用）
//!
//! このモジュールには ports の実装を含めます。
//!
//! # 含まれる実装
//! - **InMemoryStore**: HashMap ベースの KeyValueStore
//! - **NoopEventSink**: 何もしない EventSink
//! - **RecordingEventSink**: 受け取ったイベントを共有バッファに記録する EventSink
//!
//! 実際の永続ストア（ブラウザの localStorage、ファイルなど）はホスト側で実装します。

pub mod inmem_store;
pub mod sinks;

pub use self::inmem_store::InMemoryStore;
pub use self::sinks::{NoopEventSink, RecordedEvent, RecordingEventSink};
