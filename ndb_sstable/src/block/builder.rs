//! Block builder with restart-point prefix compression
//! 带重启点前缀压缩的块构建器

use ndb_coding::{put_fixed32, put_varint32, shared_prefix_len};

/// Builds one block: prefix-compressed entries, restart array, count
/// 构建单个块：前缀压缩的条目、重启点数组、数量
///
/// Entry: varint(shared) varint(non_shared) varint(value_len)
/// key_delta value. An entry at a restart point has shared == 0.
/// 条目：varint(共享) varint(非共享) varint(值长度) 键增量 值。
/// 重启点处的条目共享长度为 0。
pub struct BlockBuilder {
  buf: Vec<u8>,
  restarts: Vec<u32>,
  restart_interval: usize,
  counter: usize,
  last_key: Vec<u8>,
}

impl BlockBuilder {
  #[inline]
  pub fn new(restart_interval: usize) -> Self {
    Self {
      buf: Vec::with_capacity(4096),
      restarts: vec![0],
      restart_interval: restart_interval.max(1),
      counter: 0,
      last_key: Vec::new(),
    }
  }

  /// Add an entry; keys must arrive in ascending order
  /// 添加条目；键必须升序到达
  pub fn add(&mut self, key: &[u8], value: &[u8]) {
    debug_assert!(self.buf.is_empty() || self.last_key.as_slice() < key);

    let mut shared = 0;
    if self.counter < self.restart_interval {
      shared = shared_prefix_len(&self.last_key, key);
    } else {
      self.restarts.push(self.buf.len() as u32);
      self.counter = 0;
    }
    let non_shared = key.len() - shared;

    put_varint32(&mut self.buf, shared as u32);
    put_varint32(&mut self.buf, non_shared as u32);
    put_varint32(&mut self.buf, value.len() as u32);
    self.buf.extend_from_slice(&key[shared..]);
    self.buf.extend_from_slice(value);

    self.last_key.truncate(shared);
    self.last_key.extend_from_slice(&key[shared..]);
    self.counter += 1;
  }

  /// Append the restart array and take the block body, resetting for reuse
  /// 追加重启点数组并取出块体，重置以便复用
  pub fn finish(&mut self) -> Vec<u8> {
    for &r in &self.restarts {
      put_fixed32(&mut self.buf, r);
    }
    put_fixed32(&mut self.buf, self.restarts.len() as u32);

    let body = std::mem::take(&mut self.buf);
    self.restarts.clear();
    self.restarts.push(0);
    self.counter = 0;
    self.last_key.clear();
    body
  }

  /// Last key added since the last finish
  /// 上次 finish 以来最后添加的键
  #[inline]
  pub fn last_key(&self) -> &[u8] {
    &self.last_key
  }

  /// Estimated finished size in bytes
  /// 估计的完成后字节大小
  #[inline]
  pub fn size_estimate(&self) -> usize {
    self.buf.len() + self.restarts.len() * 4 + 4
  }

  /// No entries since the last finish
  /// 上次 finish 以来没有条目
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.buf.is_empty()
  }
}
