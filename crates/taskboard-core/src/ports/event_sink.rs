//! EventSink port - 表示層への通知
//!
//! # 実装
//! - NoopEventSink: 何もしない
//! - RecordingEventSink: 受け取ったイベントを記録（テスト用）
//!
//! 表示層は CompletionStarted を受け取ったらアニメーションを開始し、
//! 終わったら `TaskManager::finalize_completion` を 1 回だけ呼び返します。

use crate::domain::{BoardEvent, BoardSnapshot};

/// EventSink は状態変化ごとに最新のビューを受け取る
pub trait EventSink {
    fn emit(&mut self, event: &BoardEvent, snapshot: &BoardSnapshot);
}

impl<E: EventSink + ?Sized> EventSink for Box<E> {
    fn emit(&mut self, event: &BoardEvent, snapshot: &BoardSnapshot) {
        (**self).emit(event, snapshot)
    }
}
