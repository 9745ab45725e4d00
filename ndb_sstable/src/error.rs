//! Error types
//! 错误类型定义

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors are Clone so one failure can be broadcast to every waiter of a
/// pending cache load and re-emitted by a sticky-failed cursor.
/// 错误实现 Clone，同一失败可广播给等待中的缓存加载，并由粘性失败的游标重复返回。
#[derive(Error, Debug, Clone)]
pub enum Error {
  #[error("io {kind}: {msg}")]
  Io { kind: io::ErrorKind, msg: Box<str> },

  #[error("bad footer")]
  BadFooter,

  #[error("corrupt block at offset {offset}")]
  CorruptBlock { offset: u64 },

  #[error("corrupt index entry")]
  CorruptIndex,

  #[error("filter policy mismatch: expect {expect}, got {got}")]
  PolicyMismatch { expect: Box<str>, got: Box<str> },

  #[error("cache load: {0}")]
  CacheLoad(Box<Error>),
}

impl From<io::Error> for Error {
  fn from(e: io::Error) -> Self {
    Self::Io {
      kind: e.kind(),
      msg: e.to_string().into(),
    }
  }
}
