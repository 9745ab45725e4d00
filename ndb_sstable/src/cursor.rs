//! Two-level cursor: index cursor drives data cursor
//! 两级游标：索引游标驱动数据游标

use std::rc::Rc;

use crate::{Block, BlockCursor, BlockHandle, Error, Result, Table};

/// Ordered cursor over one table
/// 单表上的有序游标
///
/// The index cursor picks a data block; the data cursor walks it. Data
/// blocks are faulted in through the table's block cache. The cursor keeps
/// its table alive, and its loaded block outlives any cache eviction.
/// 索引游标选定数据块；数据游标遍历它。数据块经表的块缓存读入。
/// 游标维持其表存活，已加载的块不受缓存淘汰影响。
///
/// Failures are sticky: after an error every operation returns the same
/// error and the cursor reports eof until discarded.
/// 失败具有粘性：出错后所有操作返回同一错误并报告 eof，直到游标被丢弃。
pub struct TableCursor {
  table: Rc<Table>,
  index: BlockCursor,
  data: Option<BlockCursor>,
  failed: Option<Error>,
}

impl TableCursor {
  pub fn new(table: Rc<Table>) -> Self {
    // A table whose index block failed to decode yields a cursor that is
    // born sticky-failed
    // 索引块解码失败的表产生一个出生即粘性失败的游标
    let (index, failed) = match table.index() {
      Ok(b) => (BlockCursor::new(Rc::clone(b)), None),
      Err(e) => (BlockCursor::new(Rc::new(Block::empty())), Some(e.clone())),
    };
    Self {
      table,
      index,
      data: None,
      failed,
    }
  }

  #[inline]
  fn sticky(&self) -> Result<()> {
    match &self.failed {
      Some(e) => Err(e.clone()),
      None => Ok(()),
    }
  }

  fn record(&mut self, r: Result<()>) -> Result<()> {
    if let Err(e) = &r {
      self.failed = Some(e.clone());
      self.data = None;
    }
    r
  }

  /// Decode the block handle in the current index entry
  /// 解码当前索引条目中的块句柄
  fn data_handle(&self) -> Result<Option<BlockHandle>> {
    match self.index.current() {
      Some((_, v)) => {
        let (handle, _) = BlockHandle::decode_from(v).ok_or(Error::CorruptIndex)?;
        Ok(Some(handle))
      }
      None => Ok(None),
    }
  }

  /// Build the data cursor for the index's current block
  /// 为索引当前指向的块构建数据游标
  async fn load_data(&mut self) -> Result<()> {
    match self.data_handle()? {
      Some(handle) => {
        let block = self.table.load_block(handle).await?;
        self.data = Some(BlockCursor::new(block));
        Ok(())
      }
      None => {
        self.data = None;
        Ok(())
      }
    }
  }

  /// Roll forward over exhausted data blocks
  /// 越过已耗尽的数据块继续前进
  async fn skip_forward(&mut self) -> Result<()> {
    while self.data.as_ref().is_some_and(|d| d.eof()) {
      self.index.next()?;
      if self.index.eof() {
        self.data = None;
        return Ok(());
      }
      self.load_data().await?;
      if let Some(d) = &mut self.data {
        d.seek_to_first()?;
      }
    }
    Ok(())
  }

  /// Position at the first entry of the table
  /// 定位到表的第一个条目
  pub async fn seek_to_first(&mut self) -> Result<()> {
    self.sticky()?;
    let r = self.seek_to_first_inner().await;
    self.record(r)
  }

  async fn seek_to_first_inner(&mut self) -> Result<()> {
    self.index.seek_to_first()?;
    if self.index.eof() {
      self.data = None;
      return Ok(());
    }
    self.load_data().await?;
    if let Some(d) = &mut self.data {
      d.seek_to_first()?;
    }
    self.skip_forward().await
  }

  /// Position at the last entry of the table
  /// 定位到表的最后一个条目
  pub async fn seek_to_last(&mut self) -> Result<()> {
    self.sticky()?;
    let r = self.seek_to_last_inner().await;
    self.record(r)
  }

  async fn seek_to_last_inner(&mut self) -> Result<()> {
    self.index.seek_to_last()?;
    if self.index.eof() {
      self.data = None;
      return Ok(());
    }
    self.load_data().await?;
    if let Some(d) = &mut self.data {
      d.seek_to_last()?;
    }
    Ok(())
  }

  /// Position at the smallest key >= target, or eof
  /// 定位到不小于目标的最小键，否则 eof
  pub async fn seek(&mut self, key: &[u8]) -> Result<()> {
    self.sticky()?;
    let r = self.seek_inner(key).await;
    self.record(r)
  }

  async fn seek_inner(&mut self, key: &[u8]) -> Result<()> {
    // Index keys are >= the last key of their block, so the located block
    // may contain the target
    // 索引键不小于其块的最后一个键，定位到的块可能包含目标
    self.index.seek(key)?;
    if self.index.eof() {
      self.data = None;
      return Ok(());
    }
    let Some(handle) = self.data_handle()? else {
      self.data = None;
      return Ok(());
    };
    // Negative filter answer: no entry >= key lives in this block's range,
    // report past-the-target
    // 过滤器否定回答：该块范围内没有此键，按越过目标处理
    if !self.table.key_may_match(handle, key) {
      self.data = None;
      return Ok(());
    }
    let block = self.table.load_block(handle).await?;
    let mut data = BlockCursor::new(block);
    data.seek(key)?;
    self.data = Some(data);
    self.skip_forward().await
  }

  /// Advance to the next entry, rolling into the next data block at block
  /// boundaries
  /// 前进到下一个条目，在块边界滚动到下一个数据块
  pub async fn next(&mut self) -> Result<()> {
    self.sticky()?;
    if self.data.is_none() {
      return Ok(());
    }
    let r = self.next_inner().await;
    self.record(r)
  }

  async fn next_inner(&mut self) -> Result<()> {
    if let Some(d) = &mut self.data {
      d.next()?;
    }
    self.skip_forward().await
  }

  /// Current entry as (key, value) views
  /// 当前条目的（键，值）视图
  #[inline]
  pub fn current(&self) -> Option<(&[u8], &[u8])> {
    if self.failed.is_some() {
      return None;
    }
    self.data.as_ref().and_then(|d| d.current())
  }

  #[inline]
  pub fn eof(&self) -> bool {
    if self.failed.is_some() {
      return true;
    }
    match &self.data {
      Some(d) => d.eof() && self.index.eof(),
      None => true,
    }
  }

  /// The table this cursor reads
  /// 该游标读取的表
  #[inline]
  pub fn table(&self) -> &Rc<Table> {
    &self.table
  }
}
