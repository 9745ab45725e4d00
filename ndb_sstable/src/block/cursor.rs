//! Forward cursor over a decoded block
//! 解码块上的正向游标

use std::{cmp::Ordering, rc::Rc};

use ndb_coding::{cmp, varint32};

use super::Block;
use crate::{Error, Result};

/// Entry head: shared, non_shared, value_len and the head's encoded length
/// 条目头：共享长度、非共享长度、值长度及头部编码长度
#[inline]
fn decode_entry_head(data: &[u8]) -> Option<(usize, usize, usize, usize)> {
  let (shared, a) = varint32(data)?;
  let (non_shared, b) = varint32(&data[a..])?;
  let (value_len, c) = varint32(&data[a + b..])?;
  Some((
    shared as usize,
    non_shared as usize,
    value_len as usize,
    a + b + c,
  ))
}

/// Cursor with seek-by-key, seek-to-first/last and next
/// 支持按键定位、定位首尾和前进的游标
///
/// A malformed entry puts the cursor into a sticky failed state: it reports
/// eof and every operation returns the same error until discarded.
/// 损坏的条目使游标进入粘性失败状态：报告 eof，
/// 后续所有操作都返回同一错误，直到游标被丢弃。
pub struct BlockCursor {
  block: Rc<Block>,
  /// Offset of the current entry
  /// 当前条目的偏移
  current: usize,
  /// Where the next parse starts
  /// 下一次解析的起点
  next: usize,
  restart_idx: u32,
  key: Vec<u8>,
  /// Value range in the block data
  /// 值在块数据中的范围
  val: (u32, u32),
  failed: Option<Error>,
}

impl BlockCursor {
  /// Create unpositioned (eof until the first seek)
  /// 创建未定位的游标（首次定位前为 eof）
  pub fn new(block: Rc<Block>) -> Self {
    let end = block.restarts_offset();
    Self {
      block,
      current: end,
      next: end,
      restart_idx: 0,
      key: Vec::new(),
      val: (0, 0),
      failed: None,
    }
  }

  /// The block this cursor walks
  /// 该游标遍历的块
  #[inline]
  pub fn block(&self) -> &Rc<Block> {
    &self.block
  }

  #[inline]
  fn sticky(&self) -> Result<()> {
    match &self.failed {
      Some(e) => Err(e.clone()),
      None => Ok(()),
    }
  }

  fn fail(&mut self) {
    self.failed = Some(Error::CorruptBlock {
      offset: self.block.offset(),
    });
    self.current = self.block.restarts_offset();
    self.next = self.current;
  }

  /// Position at the i-th restart point, clearing the key buffer
  /// 定位到第 i 个重启点并清空键缓冲
  fn seek_to_restart_point(&mut self, i: u32) {
    self.key.clear();
    self.restart_idx = i;
    let off = self.block.restart_point(i) as usize;
    self.current = off;
    self.next = off;
  }

  /// Parse the entry at next. False on eof or corruption.
  /// 解析 next 处的条目。eof 或损坏时返回 false。
  fn parse_next_entry(&mut self) -> bool {
    self.current = self.next;
    let end = self.block.restarts_offset();
    if self.current >= end {
      self.current = end;
      self.restart_idx = self.block.num_restarts();
      return false;
    }

    let Some((shared, non_shared, value_len, head)) =
      decode_entry_head(&self.block.data()[self.current..end])
    else {
      self.fail();
      return false;
    };

    let delta_start = self.current + head;
    let value_start = delta_start + non_shared;
    let value_end = value_start + value_len;
    if value_end > end || self.key.len() < shared {
      self.fail();
      return false;
    }

    self.key.truncate(shared);
    self
      .key
      .extend_from_slice(&self.block.data()[delta_start..value_start]);
    self.val = (value_start as u32, value_end as u32);
    self.next = value_end;

    // Track the largest restart at or before the current entry
    // 跟踪当前条目之前（含）最大的重启点
    while self.restart_idx + 1 < self.block.num_restarts()
      && self.block.restart_point(self.restart_idx + 1) as usize <= self.current
    {
      self.restart_idx += 1;
    }
    true
  }

  /// Position at the first entry
  /// 定位到第一个条目
  pub fn seek_to_first(&mut self) -> Result<()> {
    self.sticky()?;
    self.seek_to_restart_point(0);
    self.parse_next_entry();
    self.sticky()
  }

  /// Position at the last entry
  /// 定位到最后一个条目
  pub fn seek_to_last(&mut self) -> Result<()> {
    self.sticky()?;
    self.seek_to_restart_point(self.block.num_restarts().saturating_sub(1));
    while self.parse_next_entry() && self.next < self.block.restarts_offset() {}
    self.sticky()
  }

  /// Position at the smallest key >= target, or eof if none
  /// 定位到不小于目标的最小键，没有则为 eof
  pub fn seek(&mut self, target: &[u8]) -> Result<()> {
    self.sticky()?;
    let block = Rc::clone(&self.block);
    let end = block.restarts_offset();
    let n = block.num_restarts();

    // Binary search for the last restart whose key is below the target.
    // mid is always >= 1, so mid - 1 cannot underflow.
    // 二分查找键小于目标的最后一个重启点。mid 恒大于等于 1，mid - 1 不会下溢。
    let mut left = 0u32;
    let mut right = n - 1;
    while left < right {
      let mid = (left + right + 1) / 2;
      let off = block.restart_point(mid) as usize;
      let Some((shared, non_shared, _, head)) = decode_entry_head(&block.data()[off..end]) else {
        self.fail();
        return self.sticky();
      };
      let key_start = off + head;
      if shared != 0 || key_start + non_shared > end {
        // A restart entry must carry its full key
        // 重启点条目必须携带完整键
        self.fail();
        return self.sticky();
      }
      let restart_key = &block.data()[key_start..key_start + non_shared];
      if cmp(restart_key, target) == Ordering::Less {
        left = mid;
      } else {
        right = mid - 1;
      }
    }

    // Linear scan inside the restart interval, stopping on the first
    // key >= target (equality does not advance past)
    // 在重启区间内线性扫描，停在第一个不小于目标的键（相等不越过）
    self.seek_to_restart_point(left);
    loop {
      if !self.parse_next_entry() {
        return self.sticky();
      }
      if cmp(&self.key, target) != Ordering::Less {
        return Ok(());
      }
    }
  }

  /// Advance to the next entry
  /// 前进到下一个条目
  pub fn next(&mut self) -> Result<()> {
    self.sticky()?;
    self.parse_next_entry();
    self.sticky()
  }

  /// Current entry as (key, value) views
  /// 当前条目的（键，值）视图
  #[inline]
  pub fn current(&self) -> Option<(&[u8], &[u8])> {
    if self.eof() {
      return None;
    }
    Some((
      &self.key,
      &self.block.data()[self.val.0 as usize..self.val.1 as usize],
    ))
  }

  /// Restart interval the current entry falls in
  /// 当前条目所在的重启区间
  #[inline]
  pub fn restart_index(&self) -> u32 {
    self.restart_idx
  }

  #[inline]
  pub fn eof(&self) -> bool {
    self.failed.is_some() || self.current >= self.block.restarts_offset()
  }
}
