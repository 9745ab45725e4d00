//! Entry-count bounded LRU cache
//! 按条目数量限制的 LRU 缓存

use std::{borrow::Borrow, hash::Hash};

use hashlink::LruCache;

/// Holds a fixed number of entries, least recently used evicted first
/// 保存固定数量的条目，最久未用者先被淘汰
///
/// Backs the open-table cache. Lookup and removal take any borrowed form
/// of the key, so a map keyed by `Box<str>` filenames answers `&str`
/// queries without allocating.
/// 用于打开表缓存。查找和删除接受键的任意借用形式，
/// 以 `Box<str>` 文件名为键的映射可直接用 `&str` 查询而无需分配。
pub struct Lru<K: Hash + Eq, V> {
  map: LruCache<K, V>,
}

impl<K: Hash + Eq, V> Lru<K, V> {
  /// Create with capacity (min 1)
  /// 创建，指定容量（最小 1）
  #[inline]
  pub fn new(cap: usize) -> Self {
    Self {
      map: LruCache::new(cap.max(1)),
    }
  }

  /// Get by any borrowed form of the key, touching recency
  /// 按键的借用形式查找，更新访问时间
  #[inline]
  pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.map.get(key)
  }

  /// Insert, evicting the least recently used entry when full
  /// 插入，满时淘汰最久未用的条目
  #[inline]
  pub fn set(&mut self, key: K, val: V) {
    self.map.insert(key, val);
  }

  /// Remove by any borrowed form of the key
  /// 按键的借用形式删除
  #[inline]
  pub fn rm<Q>(&mut self, key: &Q)
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.map.remove(key);
  }

  /// Get entry count
  /// 获取条目数量
  #[inline]
  pub fn len(&self) -> usize {
    self.map.len()
  }

  /// Check if cache is empty
  /// 检查缓存是否为空
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.map.is_empty()
  }

  /// Drop all entries
  /// 清空所有条目
  #[inline]
  pub fn clear(&mut self) {
    self.map.clear();
  }
}
