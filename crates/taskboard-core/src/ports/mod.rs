//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部の協力者（永続ストア、表示層、ID 生成、時計）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - プロセスが生きている間はメモリ上のコンテナが正本
//! - 永続ストアは起動時に 1 回読み、変更のたびに書き戻すスナップショット

pub mod clock;
pub mod event_sink;
pub mod id_generator;
pub mod store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::EventSink;
pub use self::id_generator::{IdGenerator, SequentialIdGenerator, UlidGenerator};
pub use self::store::{KeyValueStore, StoreError};
