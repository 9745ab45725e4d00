//! Decoded block: entry bytes plus restart array
//! 解码后的块：条目字节加重启点数组

mod builder;
mod cursor;

pub use builder::BlockBuilder;
pub use cursor::BlockCursor;
use ndb_coding::fixed32;

use crate::{Error, Result};

/// In-memory view of one decoded block
/// 单个解码块的内存视图
///
/// Layout: entries..., restart array (num_restarts x u32 LE),
/// num_restarts (u32 LE).
/// 布局：条目...，重启点数组（num_restarts 个小端 u32），num_restarts（小端 u32）。
#[derive(Debug)]
pub struct Block {
  data: Vec<u8>,
  restarts_offset: usize,
  num_restarts: u32,
  /// File offset, kept for diagnostics
  /// 文件偏移，用于诊断
  offset: u64,
}

impl Block {
  /// Parse the trailing restart array of a raw block body
  /// 解析原始块体尾部的重启点数组
  pub fn new(data: Vec<u8>, offset: u64) -> Result<Self> {
    let corrupt = || Error::CorruptBlock { offset };
    if data.len() < 4 {
      return Err(corrupt());
    }
    let num_restarts = fixed32(&data[data.len() - 4..]).ok_or_else(corrupt)?;
    if num_restarts == 0 {
      // A sealed block always anchors at least one restart
      // 封存的块至少锚定一个重启点
      return Err(corrupt());
    }
    let trailer = 4usize
      .checked_mul(num_restarts as usize + 1)
      .ok_or_else(corrupt)?;
    let restarts_offset = data.len().checked_sub(trailer).ok_or_else(corrupt)?;

    let block = Self {
      data,
      restarts_offset,
      num_restarts,
      offset,
    };

    // Restart offsets must ascend and stay inside the entry region
    // 重启点偏移必须递增且落在条目区域内
    let mut prev = 0;
    for i in 0..num_restarts {
      let p = block.restart_point(i);
      if (p as usize) > restarts_offset || p < prev {
        return Err(corrupt());
      }
      prev = p;
    }
    Ok(block)
  }

  /// Entry bytes plus restart array
  /// 条目字节加重启点数组
  #[inline]
  pub fn data(&self) -> &[u8] {
    &self.data
  }

  /// Byte length of the block body
  /// 块体的字节长度
  #[inline]
  pub fn len(&self) -> usize {
    self.data.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// Where the restart array begins; entries end here
  /// 重启点数组的起始位置；条目到此结束
  #[inline]
  pub fn restarts_offset(&self) -> usize {
    self.restarts_offset
  }

  #[inline]
  pub fn num_restarts(&self) -> u32 {
    self.num_restarts
  }

  /// File offset this block was read from
  /// 该块在文件中的偏移
  #[inline]
  pub fn offset(&self) -> u64 {
    self.offset
  }

  /// Decode the i-th restart offset
  /// 解码第 i 个重启点偏移
  #[inline]
  pub(crate) fn restart_point(&self, i: u32) -> u32 {
    debug_assert!(i < self.num_restarts);
    let p = self.restarts_offset + i as usize * 4;
    u32::from_le_bytes(self.data[p..p + 4].try_into().unwrap())
  }

  /// Well-formed block with no entries
  /// 不含条目的合法块
  pub(crate) fn empty() -> Self {
    Self {
      data: vec![0, 0, 0, 0, 1, 0, 0, 0],
      restarts_offset: 0,
      num_restarts: 1,
      offset: 0,
    }
  }
}
