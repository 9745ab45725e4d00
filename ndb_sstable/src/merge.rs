//! K-way merging cursor over table cursors
//! 表游标上的多路合并游标

use futures::future::join_all;

use crate::{Result, TableCursor};

/// Merges child cursors into one sorted stream
/// 将子游标合并为单一有序流
///
/// Positioning fans out to all children cooperatively; selection then picks
/// the child with the smallest current key, ties resolved to the lowest
/// child index.
/// 定位操作协作式分发到所有子游标；随后选择当前键最小的子游标，
/// 相同键取序号最小者。
pub struct MergingCursor {
  children: Vec<TableCursor>,
  current: Option<usize>,
  eof: bool,
}

impl MergingCursor {
  pub fn new(children: Vec<TableCursor>) -> Self {
    let eof = children.is_empty();
    Self {
      children,
      current: None,
      eof,
    }
  }

  /// Pick the non-eof child with the smallest key
  /// 选出键最小的未结束子游标
  fn select(&mut self) {
    let mut best: Option<usize> = None;
    for i in 0..self.children.len() {
      let Some((key, _)) = self.children[i].current() else {
        continue;
      };
      let better = match best {
        None => true,
        // Strict less keeps the lowest index on equal keys
        // 严格小于使相同键保留最小序号
        Some(b) => match self.children[b].current() {
          Some((bk, _)) => key < bk,
          None => true,
        },
      };
      if better {
        best = Some(i);
      }
    }
    self.current = best;
    if best.is_none() {
      self.eof = true;
    }
  }

  /// Surface the first child failure after the fan-out completes
  /// 分发完成后上报第一个子游标的失败
  fn first_err(results: Vec<Result<()>>) -> Result<()> {
    results.into_iter().find(|r| r.is_err()).unwrap_or(Ok(()))
  }

  /// Position every child at its first entry
  /// 将每个子游标定位到第一个条目
  pub async fn seek_to_first(&mut self) -> Result<()> {
    self.eof = self.children.is_empty();
    self.current = None;
    let results = join_all(self.children.iter_mut().map(|c| c.seek_to_first())).await;
    self.select();
    Self::first_err(results)
  }

  /// Position every child at its last entry
  /// 将每个子游标定位到最后一个条目
  pub async fn seek_to_last(&mut self) -> Result<()> {
    self.eof = self.children.is_empty();
    self.current = None;
    let results = join_all(self.children.iter_mut().map(|c| c.seek_to_last())).await;
    self.select();
    Self::first_err(results)
  }

  /// Position at the smallest key >= target across all children
  /// 定位到所有子游标中不小于目标的最小键
  pub async fn seek(&mut self, key: &[u8]) -> Result<()> {
    self.eof = self.children.is_empty();
    self.current = None;
    let results = join_all(self.children.iter_mut().map(|c| c.seek(key))).await;
    self.select();
    Self::first_err(results)
  }

  /// Advance past the current key, then re-select
  /// 越过当前键，然后重新选择
  ///
  /// Every child standing on the emitted key advances, so a key served by
  /// one child is not replayed by another.
  /// 所有停在已产出键上的子游标都会推进，同一键不会被其他表重复产出。
  pub async fn next(&mut self) -> Result<()> {
    if self.eof {
      return Ok(());
    }
    let Some(i) = self.current else {
      return Ok(());
    };
    let Some((key, _)) = self.children[i].current() else {
      self.select();
      return Ok(());
    };
    let key: Box<[u8]> = key.into();
    let results = join_all(self.children.iter_mut().filter_map(|c| {
      if c.current().is_some_and(|(k, _)| k == &*key) {
        Some(c.next())
      } else {
        None
      }
    }))
    .await;
    self.select();
    Self::first_err(results)
  }

  /// Current entry of the selected child
  /// 被选中子游标的当前条目
  #[inline]
  pub fn current(&self) -> Option<(&[u8], &[u8])> {
    self.current.and_then(|i| self.children[i].current())
  }

  /// All children exhausted
  /// 所有子游标均已结束
  #[inline]
  pub fn eof(&self) -> bool {
    self.eof
  }
}
