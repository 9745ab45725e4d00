//! Table writer: sealed, block-structured table images
//! 表写入器：封存的块结构表镜像
//!
//! File body: data blocks, metaindex block, index block, footer. Each block
//! is framed with a type byte and crc32 covered by its handle.
//! 文件体：数据块、元索引块、索引块、文件尾。每个块以类型字节和 crc32
//! 封装，句柄覆盖整个封装范围。

use std::rc::Rc;

use ndb_coding::put_fixed32;
use ndb_filter::FilterPolicy;

use crate::{
  BlockBuilder, BlockHandle, Conf, Config, Footer,
  filter::FilterBlockBuilder,
  format::{BLOCK_TRAILER_SIZE, BLOCK_TYPE_RAW},
};

/// Builds a complete table in memory; keys must arrive in ascending order
/// 在内存中构建完整的表；键必须升序到达
pub struct TableWriter {
  buf: Vec<u8>,
  data_block: BlockBuilder,
  index_block: BlockBuilder,
  filter: Option<(Rc<dyn FilterPolicy>, FilterBlockBuilder)>,
  block_size: usize,
  num_entries: u64,
  last_key: Vec<u8>,
}

impl TableWriter {
  pub fn new(conf: &[Conf]) -> Self {
    Self::with_config(Config::from(conf))
  }

  pub fn with_config(conf: Config) -> Self {
    let filter = conf.filter_policy.clone().map(|p| {
      let mut fb = FilterBlockBuilder::new(Rc::clone(&p));
      fb.start_block(0);
      (p, fb)
    });
    Self {
      buf: Vec::new(),
      data_block: BlockBuilder::new(conf.restart_interval),
      // Every index entry is its own restart point
      // 每个索引条目都是独立的重启点
      index_block: BlockBuilder::new(1),
      filter,
      block_size: conf.block_size.max(64),
      num_entries: 0,
      last_key: Vec::new(),
    }
  }

  /// Append one entry
  /// 追加一个条目
  pub fn add(&mut self, key: &[u8], value: &[u8]) {
    debug_assert!(self.num_entries == 0 || self.last_key.as_slice() < key);

    if let Some((_, fb)) = &mut self.filter {
      fb.add_key(key);
    }
    self.data_block.add(key, value);
    self.last_key.clear();
    self.last_key.extend_from_slice(key);
    self.num_entries += 1;

    if self.data_block.size_estimate() >= self.block_size {
      self.flush_data_block();
    }
  }

  fn flush_data_block(&mut self) {
    if self.data_block.is_empty() {
      return;
    }
    // The index key is the block's exact last key, so every index key is
    // >= the last key of its block
    // 索引键取块的最后一个键，因此索引键不小于其块的最后一个键
    let last = self.data_block.last_key().to_vec();
    let body = self.data_block.finish();
    let handle = self.emit_block(body);
    let mut enc = Vec::new();
    handle.encode_to(&mut enc);
    self.index_block.add(&last, &enc);

    if let Some((_, fb)) = &mut self.filter {
      fb.start_block(self.buf.len() as u64);
    }
  }

  /// Frame and append one block, returning its handle
  /// 封装并追加一个块，返回其句柄
  fn emit_block(&mut self, body: Vec<u8>) -> BlockHandle {
    let offset = self.buf.len() as u64;
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&body);
    hasher.update(&[BLOCK_TYPE_RAW]);
    let crc = hasher.finalize();

    self.buf.extend_from_slice(&body);
    self.buf.push(BLOCK_TYPE_RAW);
    put_fixed32(&mut self.buf, crc);
    BlockHandle::new(offset, (body.len() + BLOCK_TRAILER_SIZE) as u64)
  }

  /// Seal the table: filter block, metaindex, index, footer
  /// 封存表：过滤器块、元索引、索引、文件尾
  pub fn finish(mut self) -> Vec<u8> {
    self.flush_data_block();

    let mut metaindex = BlockBuilder::new(1);
    if let Some((policy, fb)) = self.filter.take() {
      let handle = self.emit_block(fb.finish());
      let mut enc = Vec::new();
      handle.encode_to(&mut enc);
      let name = format!("filter.{}", policy.name());
      metaindex.add(name.as_bytes(), &enc);
    }
    let metaindex_handle = self.emit_block(metaindex.finish());

    let index_body = self.index_block.finish();
    let index_handle = self.emit_block(index_body);

    Footer {
      metaindex: metaindex_handle,
      index: index_handle,
    }
    .encode_to(&mut self.buf);
    self.buf
  }

  /// Entries added so far
  /// 已添加的条目数
  #[inline]
  pub fn num_entries(&self) -> u64 {
    self.num_entries
  }
}
