//! Filter block: per-block filters keyed by data block offset
//! 过滤器块：按数据块偏移索引的每块过滤器
//!
//! Layout: filters..., offsets (u32 LE each), offsets start (u32 LE),
//! base_lg (1 byte). A data block starting at file offset o uses filter
//! index o >> base_lg.
//! 布局：过滤器...，偏移数组（各为小端 u32），偏移数组起点（小端 u32），
//! base_lg（1 字节）。起始于文件偏移 o 的数据块使用过滤器索引 o >> base_lg。

use std::rc::Rc;

use ndb_coding::{fixed32, put_fixed32};
use ndb_filter::FilterPolicy;

/// Every 2 KiB of file offset opens a new filter partition
/// 每 2 KiB 文件偏移开启一个新的过滤器分区
pub(crate) const FILTER_BASE_LG: u8 = 11;

/// Accumulates per-block filters while a table is written
/// 在表写入期间累积每块过滤器
pub struct FilterBlockBuilder {
  policy: Rc<dyn FilterPolicy>,
  /// Flattened pending keys and their start offsets
  /// 扁平化的待处理键及其起始偏移
  keys: Vec<u8>,
  starts: Vec<usize>,
  result: Vec<u8>,
  filter_offsets: Vec<u32>,
}

impl FilterBlockBuilder {
  pub fn new(policy: Rc<dyn FilterPolicy>) -> Self {
    Self {
      policy,
      keys: Vec::new(),
      starts: Vec::new(),
      result: Vec::new(),
      filter_offsets: Vec::new(),
    }
  }

  /// Called with each data block's file offset before its keys arrive
  /// 在数据块的键到达前以该块的文件偏移调用
  pub fn start_block(&mut self, block_offset: u64) {
    let idx = block_offset >> FILTER_BASE_LG;
    debug_assert!(idx >= self.filter_offsets.len() as u64);
    while (self.filter_offsets.len() as u64) < idx {
      self.generate();
    }
  }

  pub fn add_key(&mut self, key: &[u8]) {
    self.starts.push(self.keys.len());
    self.keys.extend_from_slice(key);
  }

  fn generate(&mut self) {
    self.filter_offsets.push(self.result.len() as u32);
    if self.starts.is_empty() {
      // Empty partition keeps the previous offset, yielding a zero-length
      // filter that rejects every key
      // 空分区沿用上一偏移，得到拒绝所有键的零长度过滤器
      return;
    }
    self.starts.push(self.keys.len());
    let key_refs: Vec<&[u8]> = self
      .starts
      .windows(2)
      .map(|w| &self.keys[w[0]..w[1]])
      .collect();
    self.policy.create_filter(&key_refs, &mut self.result);
    self.keys.clear();
    self.starts.clear();
  }

  /// Seal pending keys and emit the full filter block
  /// 封存待处理键并产出完整的过滤器块
  pub fn finish(mut self) -> Vec<u8> {
    if !self.starts.is_empty() {
      self.generate();
    }
    let array_start = self.result.len() as u32;
    let mut out = self.result;
    let offsets = self.filter_offsets;
    for off in offsets {
      put_fixed32(&mut out, off);
    }
    put_fixed32(&mut out, array_start);
    out.push(FILTER_BASE_LG);
    out
  }
}

/// Read accessor over a raw filter block
/// 原始过滤器块的读取访问器
pub struct FilterBlockReader {
  policy: Rc<dyn FilterPolicy>,
  data: Vec<u8>,
  offsets_start: usize,
  num: usize,
  base_lg: u8,
}

impl FilterBlockReader {
  /// None if the trailer arithmetic does not hold
  /// 尾部结构不成立时返回 None
  pub fn new(policy: Rc<dyn FilterPolicy>, data: Vec<u8>) -> Option<Self> {
    if data.len() < 5 {
      return None;
    }
    let base_lg = data[data.len() - 1];
    let offsets_start = fixed32(&data[data.len() - 5..])? as usize;
    if offsets_start > data.len() - 5 {
      return None;
    }
    let num = (data.len() - 5 - offsets_start) / 4;
    Some(Self {
      policy,
      data,
      offsets_start,
      num,
      base_lg,
    })
  }

  /// May the data block at block_offset contain key
  /// 位于 block_offset 的数据块是否可能包含键
  ///
  /// Out-of-range or malformed slots answer true (pessimistic pass-through);
  /// an empty in-range filter answers false.
  /// 越界或损坏的槽位回答 true（悲观放行）；范围内的空过滤器回答 false。
  pub fn key_may_match(&self, block_offset: u64, key: &[u8]) -> bool {
    let idx = (block_offset >> self.base_lg) as usize;
    if idx >= self.num {
      return true;
    }
    let slot = self.offsets_start + idx * 4;
    // The offsets-start word doubles as the end sentinel of the last filter
    // 偏移数组起点同时充当最后一个过滤器的结束哨兵
    let (Some(start), Some(end)) = (
      fixed32(&self.data[slot..]).map(|v| v as usize),
      fixed32(&self.data[slot + 4..]).map(|v| v as usize),
    ) else {
      return true;
    };
    if start == end {
      return false;
    }
    if start > end || end > self.offsets_start {
      return true;
    }
    self.policy.key_may_match(&self.data[start..end], key)
  }
}
