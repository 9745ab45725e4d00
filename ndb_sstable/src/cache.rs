//! Shard-local block and table caches
//! 分片本地的块缓存与表缓存

use std::rc::Rc;

use ndb_lru::{Lru, SizeLru};

use crate::{Block, table::Table};

/// Block cache key: handle offset scoped by file identity
/// 块缓存键：以文件身份限定的句柄偏移
///
/// The table id is a per-shard counter assigned at open, preventing
/// cross-file aliasing of equal offsets.
/// 表 id 是打开时分配的分片内计数器，避免相同偏移跨文件混淆。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockKey {
  pub table: u64,
  pub offset: u64,
}

/// Hit and miss counters
/// 命中与未命中计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStat {
  pub hit: u64,
  pub miss: u64,
}

/// Bounded shared cache of decoded blocks, LRU by byte size
/// 按字节大小 LRU 限制的解码块共享缓存
///
/// The cache holds one strong reference; cursors hold their own, so
/// eviction never invalidates a block in use.
/// 缓存持有一个强引用；游标持有自己的引用，淘汰不会使使用中的块失效。
pub struct BlockCache {
  lru: SizeLru<BlockKey, Rc<Block>>,
  stat: CacheStat,
}

impl BlockCache {
  /// Create with a byte capacity
  /// 创建，指定字节容量
  #[inline]
  pub fn new(capacity_bytes: usize) -> Self {
    Self {
      lru: SizeLru::new(capacity_bytes),
      stat: CacheStat::default(),
    }
  }

  /// Find by key, touching recency and counting a hit
  /// 按键查找，更新访问时间并计一次命中
  pub fn find(&mut self, key: &BlockKey) -> Option<Rc<Block>> {
    let got = self.lru.get(key).cloned();
    if got.is_some() {
      self.stat.hit += 1;
    }
    got
  }

  /// Insert a freshly loaded block, counting a miss
  /// 插入新加载的块，计一次未命中
  pub fn insert(&mut self, key: BlockKey, block: Rc<Block>) {
    self.stat.miss += 1;
    let size = block.len() as u32;
    self.lru.set(key, block, size);
  }

  /// Count a requester served by an in-flight load as a hit
  /// 将搭上进行中加载的请求者计为命中
  #[inline]
  pub(crate) fn record_shared_hit(&mut self) {
    self.stat.hit += 1;
  }

  #[inline]
  pub fn stat(&self) -> CacheStat {
    self.stat
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.lru.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.lru.is_empty()
  }

  /// Drop all cached blocks (shard teardown)
  /// 清空所有缓存块（分片销毁时）
  #[inline]
  pub fn clear(&mut self) {
    self.lru.clear();
  }
}

/// Bounded cache of open tables, keyed by filename
/// 按文件名索引的打开表缓存
pub struct TableCache {
  lru: Lru<Box<str>, Rc<Table>>,
}

impl TableCache {
  /// Create with an entry capacity
  /// 创建，指定条目容量
  #[inline]
  pub fn new(entries: usize) -> Self {
    Self {
      lru: Lru::new(entries),
    }
  }

  /// Find an open table by filename, touching recency
  /// 按文件名查找打开的表，更新访问时间
  #[inline]
  pub fn find(&mut self, name: &str) -> Option<Rc<Table>> {
    self.lru.get(name).cloned()
  }

  #[inline]
  pub fn insert(&mut self, name: Box<str>, table: Rc<Table>) {
    self.lru.set(name, table);
  }

  /// Drop the cache's reference; outstanding cursors keep the table alive
  /// 丢弃缓存的引用；未结束的游标使表继续存活
  #[inline]
  pub fn evict(&mut self, name: &str) {
    self.lru.rm(name);
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.lru.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.lru.is_empty()
  }

  /// Drop all cached tables (shard teardown)
  /// 清空所有缓存表（分片销毁时）
  #[inline]
  pub fn clear(&mut self) {
    self.lru.clear();
  }
}
