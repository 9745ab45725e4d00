//! Table: an open SSTable serving block loads
//! 表：已打开的 SSTable，负责块加载

use std::{
  cell::{Cell, RefCell},
  path::Path,
  rc::Rc,
};

use ndb_fs::FileReader;

use crate::{
  Block, BlockCache, BlockCursor, BlockHandle, BlockKey, CacheStat, Conf, Config, Error,
  FOOTER_SIZE, Footer, Result, TableCache,
  filter::FilterBlockReader,
  flight::{Begin, Flight},
  format::check_trailer,
};

/// Read a framed block, preferring the tail buffer from open
/// 读取封装块，优先使用打开时的尾部缓冲
async fn read_raw(
  file: &FileReader,
  tail: &[u8],
  tail_off: u64,
  handle: BlockHandle,
  conf: &Config,
) -> Result<Vec<u8>> {
  let end = handle.offset + handle.size;
  let raw = if handle.offset >= tail_off && end <= tail_off + tail.len() as u64 {
    let a = (handle.offset - tail_off) as usize;
    tail[a..a + handle.size as usize].to_vec()
  } else {
    match file.read_exact(handle.offset, handle.size as usize).await {
      Ok(r) => r,
      Err(e) => {
        let e = Error::from(e);
        conf.notify_read_error(&e);
        return Err(e);
      }
    }
  };
  check_trailer(raw, handle.offset)
}

/// Open SSTable: file reader, index block, optional filter
/// 已打开的 SSTable：文件读取器、索引块、可选过滤器
///
/// Kept alive by the table cache and by every cursor created from it.
/// 由表缓存和由它创建的所有游标共同维持存活。
pub struct Table {
  id: u64,
  file: Rc<FileReader>,
  /// Err defers index corruption to the first cursor operation
  /// Err 将索引损坏推迟到首次游标操作
  index: Result<Rc<Block>>,
  filter: Option<FilterBlockReader>,
  metaindex: BlockHandle,
  conf: Config,
  block_cache: Rc<RefCell<BlockCache>>,
  flight: Rc<RefCell<Flight<BlockKey, Rc<Block>>>>,
}

impl Table {
  pub(crate) async fn open(
    path: &Path,
    id: u64,
    conf: Config,
    block_cache: Rc<RefCell<BlockCache>>,
    flight: Rc<RefCell<Flight<BlockKey, Rc<Block>>>>,
  ) -> Result<Self> {
    let file = match FileReader::open(path).await {
      Ok(f) => f,
      Err(e) => {
        let e = Error::from(e);
        conf.notify_read_error(&e);
        return Err(e);
      }
    };
    let size = file.size();
    if size < FOOTER_SIZE as u64 {
      return Err(Error::BadFooter);
    }

    // One tail read serves the footer and usually the metadata blocks
    // 一次尾部读取即可覆盖文件尾和通常的元数据块
    let tail_len = size.min(conf.buffer_size.max(FOOTER_SIZE) as u64) as usize;
    let tail_off = size - tail_len as u64;
    let tail = match file.read_exact(tail_off, tail_len).await {
      Ok(t) => t,
      Err(e) => {
        let e = Error::from(e);
        conf.notify_read_error(&e);
        return Err(e);
      }
    };
    let footer = Footer::decode_from(&tail[tail_len - FOOTER_SIZE..])?;

    // A corrupt index block does not fail open; the first cursor operation
    // surfaces it. I/O failures still do.
    // 索引块损坏不会使打开失败，由首次游标操作上报。I/O 失败仍然失败。
    let index = match read_raw(&file, &tail, tail_off, footer.index, &conf).await {
      Ok(body) => Block::new(body, footer.index.offset).map(Rc::new),
      Err(e @ Error::CorruptBlock { .. }) => Err(e),
      Err(e) => return Err(e),
    };
    if let Ok(index) = &index {
      block_cache.borrow_mut().insert(
        BlockKey {
          table: id,
          offset: footer.index.offset,
        },
        Rc::clone(index),
      );
    }

    let mut table = Self {
      id,
      file: Rc::new(file),
      index,
      filter: None,
      metaindex: footer.metaindex,
      conf,
      block_cache,
      flight,
    };
    table.read_meta(&tail, tail_off).await;
    Ok(table)
  }

  /// Load the filter named by the configured policy. Non-fatal: any failure
  /// leaves the table filterless.
  /// 加载配置策略对应的过滤器。非致命：任何失败都只是让表没有过滤器。
  async fn read_meta(&mut self, tail: &[u8], tail_off: u64) {
    let Some(policy) = self.conf.filter_policy.clone() else {
      return;
    };
    match self.read_filter(tail, tail_off, policy).await {
      Ok(filter) => self.filter = filter,
      Err(e) => {
        log::warn!("table {}: filter disabled: {e} / 表 {}: 过滤器已禁用: {e}", self.id, self.id);
      }
    }
  }

  async fn read_filter(
    &self,
    tail: &[u8],
    tail_off: u64,
    policy: Rc<dyn ndb_filter::FilterPolicy>,
  ) -> Result<Option<FilterBlockReader>> {
    let meta_raw = read_raw(&self.file, tail, tail_off, self.metaindex, &self.conf).await?;
    let meta = Rc::new(Block::new(meta_raw, self.metaindex.offset)?);
    let mut cur = BlockCursor::new(meta);
    let want = format!("filter.{}", policy.name());
    cur.seek(want.as_bytes())?;
    match cur.current() {
      Some((k, v)) if k == want.as_bytes() => {
        let (handle, _) = BlockHandle::decode_from(v).ok_or(Error::CorruptIndex)?;
        // The filter block bypasses the block cache
        // 过滤器块不进入块缓存
        let raw = read_raw(&self.file, tail, tail_off, handle, &self.conf).await?;
        match FilterBlockReader::new(policy, raw) {
          Some(f) => Ok(Some(f)),
          None => Err(Error::CorruptBlock {
            offset: handle.offset,
          }),
        }
      }
      Some((k, _)) if k.starts_with(b"filter.") => Err(Error::PolicyMismatch {
        expect: want.into(),
        got: String::from_utf8_lossy(k).into(),
      }),
      _ => Ok(None),
    }
  }

  /// Shared block for handle, from cache or faulted in from the file
  /// 句柄对应的共享块，来自缓存或从文件读入
  ///
  /// Concurrent loads of the same block share one read; the failure of a
  /// load is broadcast to every waiter and nothing is inserted.
  /// 同一块的并发加载共享一次读取；加载失败会广播给所有等待者且不插入缓存。
  pub async fn load_block(&self, handle: BlockHandle) -> Result<Rc<Block>> {
    let key = BlockKey {
      table: self.id,
      offset: handle.offset,
    };
    if let Some(b) = self.block_cache.borrow_mut().find(&key) {
      return Ok(b);
    }
    match Flight::begin(&self.flight, key) {
      Begin::Wait(w) => {
        let b = w.await?;
        self.block_cache.borrow_mut().record_shared_hit();
        Ok(b)
      }
      Begin::Lead(lead) => match self.fault_block(handle).await {
        Ok(block) => {
          let block = Rc::new(block);
          self.block_cache.borrow_mut().insert(key, Rc::clone(&block));
          lead.finish(Ok(Rc::clone(&block)));
          Ok(block)
        }
        Err(e) => {
          lead.finish(Err(e.clone()));
          Err(e)
        }
      },
    }
  }

  async fn fault_block(&self, handle: BlockHandle) -> Result<Block> {
    let raw = match self
      .file
      .read_exact(handle.offset, handle.size as usize)
      .await
    {
      Ok(r) => r,
      Err(e) => {
        let e = Error::from(e);
        self.conf.notify_read_error(&e);
        return Err(e);
      }
    };
    let body = check_trailer(raw, handle.offset)?;
    Block::new(body, handle.offset)
  }

  /// Consult the filter; tables without one always answer true
  /// 咨询过滤器；没有过滤器的表总是回答 true
  #[inline]
  pub fn key_may_match(&self, handle: BlockHandle, key: &[u8]) -> bool {
    self
      .filter
      .as_ref()
      .is_none_or(|f| f.key_may_match(handle.offset, key))
  }

  /// Cache scope id assigned at open
  /// 打开时分配的缓存作用域 id
  #[inline]
  pub fn id(&self) -> u64 {
    self.id
  }

  #[inline]
  pub fn has_filter(&self) -> bool {
    self.filter.is_some()
  }

  #[inline]
  pub(crate) fn index(&self) -> &Result<Rc<Block>> {
    &self.index
  }
}

/// Shard-local read context: configuration plus both caches
/// 分片本地读取上下文：配置加两个缓存
///
/// Created at shard init; flush at teardown. Never shared across shards.
/// 在分片初始化时创建；销毁时 flush。绝不跨分片共享。
pub struct Shard {
  conf: Config,
  block_cache: Rc<RefCell<BlockCache>>,
  block_flight: Rc<RefCell<Flight<BlockKey, Rc<Block>>>>,
  table_cache: Rc<RefCell<TableCache>>,
  table_flight: Rc<RefCell<Flight<Box<str>, Rc<Table>>>>,
  next_id: Cell<u64>,
}

impl Shard {
  pub fn new(conf: &[Conf]) -> Self {
    Self::with_config(Config::from(conf))
  }

  pub fn with_config(conf: Config) -> Self {
    let block_cache = Rc::new(RefCell::new(BlockCache::new(conf.block_cache_bytes)));
    let table_cache = Rc::new(RefCell::new(TableCache::new(conf.table_cache_entries)));
    Self {
      conf,
      block_cache,
      block_flight: Rc::new(RefCell::new(Flight::new())),
      table_cache,
      table_flight: Rc::new(RefCell::new(Flight::new())),
      next_id: Cell::new(0),
    }
  }

  /// Open an SSTable, served from the table cache when already open
  /// 打开 SSTable，已打开时由表缓存直接提供
  ///
  /// Concurrent opens of the same filename perform one open.
  /// 同一文件名的并发打开只执行一次。
  pub async fn open(&self, path: impl AsRef<Path>) -> Result<Rc<Table>> {
    let path = path.as_ref();
    let name: Box<str> = path.to_string_lossy().into();
    if let Some(t) = self.table_cache.borrow_mut().find(&name) {
      return Ok(t);
    }
    match Flight::begin(&self.table_flight, name.clone()) {
      Begin::Wait(w) => w.await,
      Begin::Lead(lead) => {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let r = Table::open(
          path,
          id,
          self.conf.clone(),
          Rc::clone(&self.block_cache),
          Rc::clone(&self.block_flight),
        )
        .await;
        match r {
          Ok(t) => {
            let t = Rc::new(t);
            self.table_cache.borrow_mut().insert(name, Rc::clone(&t));
            lead.finish(Ok(Rc::clone(&t)));
            Ok(t)
          }
          Err(e) => {
            lead.finish(Err(e.clone()));
            Err(e)
          }
        }
      }
    }
  }

  /// Drop the cache's reference to an open table
  /// 丢弃表缓存对某个已打开表的引用
  pub fn evict_table(&self, path: impl AsRef<Path>) {
    let name = path.as_ref().to_string_lossy();
    self.table_cache.borrow_mut().evict(&name);
  }

  /// Block cache counters
  /// 块缓存计数
  #[inline]
  pub fn block_stat(&self) -> CacheStat {
    self.block_cache.borrow().stat()
  }

  #[inline]
  pub fn conf(&self) -> &Config {
    &self.conf
  }

  /// Empty both caches (shard teardown)
  /// 清空两个缓存（分片销毁时）
  pub fn flush(&self) {
    self.block_cache.borrow_mut().clear();
    self.table_cache.borrow_mut().clear();
  }
}
