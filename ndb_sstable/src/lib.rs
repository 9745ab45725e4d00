#![cfg_attr(docsrs, feature(doc_cfg))]

//! SSTable - read path over immutable sorted string tables
//! SSTable - 不可变有序字符串表的读取路径
//!
//! Opens block-structured table files and exposes ordered cursors over
//! them: block, table (two-level) and k-way merge. Decoded blocks and open
//! tables are cached per shard.
//! 打开块结构的表文件并提供有序游标：块、表（两级）与多路合并。
//! 解码后的块和打开的表按分片缓存。

mod block;
mod cache;
mod conf;
mod cursor;
mod error;
mod filter;
mod flight;
mod format;
mod merge;
mod table;
mod write;

pub use block::{Block, BlockBuilder, BlockCursor};
pub use cache::{BlockCache, BlockKey, CacheStat, TableCache};
pub use conf::{Conf, Config, ReadErrorHandler, default};
pub use cursor::TableCursor;
pub use error::{Error, Result};
pub use filter::{FilterBlockBuilder, FilterBlockReader};
pub use format::{BLOCK_TRAILER_SIZE, BlockHandle, FOOTER_SIZE, Footer, MAGIC};
pub use merge::MergingCursor;
pub use table::{Shard, Table};
pub use write::TableWriter;
