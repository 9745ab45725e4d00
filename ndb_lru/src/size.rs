//! Size-aware LRU cache
//! 大小感知的 LRU 缓存

use std::hash::Hash;

use hashlink::LruCache;

/// LRU cache bounded by total entry size instead of entry count
/// 按条目总大小而非条目数量限制的 LRU 缓存
///
/// Eviction is strict LRU by recency. The most recently inserted entry is
/// never evicted by its own insertion, so a single entry larger than the
/// budget stays until displaced.
/// 按访问时间严格 LRU 淘汰。刚插入的条目不会被自身插入淘汰，
/// 因此超出预算的单个条目会保留到被挤出为止。
pub struct SizeLru<K: Hash + Eq, V> {
  map: LruCache<K, (V, u32)>,
  used: usize,
  max: usize,
}

impl<K: Hash + Eq, V> SizeLru<K, V> {
  /// Create with a total size budget in bytes (min 1)
  /// 创建，指定总大小预算（字节，最小 1）
  #[inline]
  pub fn new(max: usize) -> Self {
    Self {
      map: LruCache::new_unbounded(),
      used: 0,
      max: max.max(1),
    }
  }

  /// Get value by key, touching recency
  /// 按键获取值，更新访问时间
  #[inline]
  pub fn get(&mut self, key: &K) -> Option<&V> {
    self.map.get(key).map(|(v, _)| &*v)
  }

  /// Insert key-value pair with its size, evicting until within budget
  /// 插入键值对及其大小，淘汰直到回到预算内
  pub fn set(&mut self, key: K, val: V, size: u32) {
    if let Some((_, old_size)) = self.map.remove(&key) {
      self.used -= old_size as usize;
    }
    self.used += size as usize;
    self.map.insert(key, (val, size));
    while self.used > self.max && self.map.len() > 1 {
      match self.map.remove_lru() {
        Some((_, (_, sz))) => self.used -= sz as usize,
        None => break,
      }
    }
  }

  /// Remove by key
  /// 按键删除
  #[inline]
  pub fn rm(&mut self, key: &K) {
    if let Some((_, sz)) = self.map.remove(key) {
      self.used -= sz as usize;
    }
  }

  /// Total size of resident entries
  /// 驻留条目的总大小
  #[inline]
  pub fn used(&self) -> usize {
    self.used
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
    self.used = 0;
  }
}
