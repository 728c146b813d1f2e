//! KeyValueStore port - 永続ストア（ブラウザの localStorage 相当）
//!
//! 文字列キーに文字列値を保存するだけの不透明なストアです。
//! 使うキーは pending 用と completed 用の 2 つだけです。

use thiserror::Error;

/// Failure reported by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage cannot be reached (quota, permissions, ...).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// KeyValueStore は再起動をまたいで文字列を保持する
///
/// # 設計原則
/// - 存在しないキーの get は `Ok(None)`（エラーではない）
/// - 存在しないキーの remove も成功扱い
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
