//! SSTable configuration
//! SSTable 配置

use std::{fmt, rc::Rc};

use ndb_filter::FilterPolicy;

use crate::Error;

/// Callback invoked on every failed raw block read
/// 每次原始块读取失败时调用的回调
pub type ReadErrorHandler = Rc<dyn Fn(&Error)>;

/// Configuration options
/// 配置选项
#[derive(Clone)]
pub enum Conf {
  /// Filter policy consulted on point seeks
  /// 点查找时咨询的过滤器策略
  FilterPolicy(Rc<dyn FilterPolicy>),

  /// Block cache capacity in bytes
  /// 块缓存容量（字节）
  BlockCacheBytes(usize),

  /// Table cache capacity in entries
  /// 表缓存容量（条目数）
  TableCacheEntries(usize),

  /// Buffer for the tail read at open
  /// 打开时尾部读取的缓冲大小
  BufferSize(usize),

  /// Target data block size (writer side)
  /// 目标数据块大小（写入侧）
  BlockSize(usize),

  /// Restart interval in block (writer side)
  /// 块内重启点间隔（写入侧）
  RestartInterval(usize),

  /// Read error callback
  /// 读取错误回调
  OnReadError(ReadErrorHandler),
}

impl fmt::Debug for Conf {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::FilterPolicy(p) => write!(f, "FilterPolicy({})", p.name()),
      Self::BlockCacheBytes(v) => write!(f, "BlockCacheBytes({v})"),
      Self::TableCacheEntries(v) => write!(f, "TableCacheEntries({v})"),
      Self::BufferSize(v) => write!(f, "BufferSize({v})"),
      Self::BlockSize(v) => write!(f, "BlockSize({v})"),
      Self::RestartInterval(v) => write!(f, "RestartInterval({v})"),
      Self::OnReadError(_) => write!(f, "OnReadError"),
    }
  }
}

/// Internal configuration struct
/// 内部配置结构体
#[derive(Clone)]
pub struct Config {
  pub filter_policy: Option<Rc<dyn FilterPolicy>>,
  pub block_cache_bytes: usize,
  pub table_cache_entries: usize,
  pub buffer_size: usize,
  pub block_size: usize,
  pub restart_interval: usize,
  pub on_read_error: Option<ReadErrorHandler>,
}

impl fmt::Debug for Config {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Config")
      .field(
        "filter_policy",
        &self.filter_policy.as_ref().map(|p| p.name()),
      )
      .field("block_cache_bytes", &self.block_cache_bytes)
      .field("table_cache_entries", &self.table_cache_entries)
      .field("buffer_size", &self.buffer_size)
      .field("block_size", &self.block_size)
      .field("restart_interval", &self.restart_interval)
      .field("on_read_error", &self.on_read_error.is_some())
      .finish()
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      filter_policy: None,
      block_cache_bytes: default::BLOCK_CACHE_BYTES,
      table_cache_entries: default::TABLE_CACHE_ENTRIES,
      buffer_size: default::BUFFER_SIZE,
      block_size: default::BLOCK_SIZE,
      restart_interval: default::RESTART_INTERVAL,
      on_read_error: None,
    }
  }
}

impl From<&[Conf]> for Config {
  fn from(conf_li: &[Conf]) -> Self {
    let mut config = Self::default();
    for conf in conf_li {
      match conf {
        Conf::FilterPolicy(p) => config.filter_policy = Some(Rc::clone(p)),
        Conf::BlockCacheBytes(v) => config.block_cache_bytes = *v,
        Conf::TableCacheEntries(v) => config.table_cache_entries = *v,
        Conf::BufferSize(v) => config.buffer_size = *v,
        Conf::BlockSize(v) => config.block_size = *v,
        Conf::RestartInterval(v) => {
          if *v == 0 {
            log::warn!("RestartInterval 0 clamped to 1");
          }
          config.restart_interval = (*v).max(1);
        }
        Conf::OnReadError(h) => config.on_read_error = Some(Rc::clone(h)),
      }
    }
    config
  }
}

impl Config {
  /// Invoke the read error callback if configured
  /// 若配置了读取错误回调则调用
  #[inline]
  pub(crate) fn notify_read_error(&self, e: &Error) {
    if let Some(h) = &self.on_read_error {
      h(e);
    }
  }
}

/// Default values
/// 默认值
pub mod default {
  pub const KB: usize = 1024;
  pub const MB: usize = 1024 * KB;

  /// Block cache budget
  /// 块缓存预算
  pub const BLOCK_CACHE_BYTES: usize = 8 * MB;

  /// Open table handles kept per shard
  /// 每分片保留的打开表句柄数
  pub const TABLE_CACHE_ENTRIES: usize = 256;

  /// Tail read size at table open
  /// 打开表时的尾部读取大小
  pub const BUFFER_SIZE: usize = 64 * KB;

  /// Target data block size
  /// 目标数据块大小
  pub const BLOCK_SIZE: usize = 4 * KB;

  /// Restart interval
  /// 重启间隔
  pub const RESTART_INTERVAL: usize = 16;
}
