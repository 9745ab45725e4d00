//! On-disk format: block handles, footer, block trailer framing
//! 磁盘格式：块句柄、文件尾、块尾部封装

use ndb_coding::{MAX_VARINT64, put_varint64, varint64};

use crate::{Error, Result};

/// Footer magic, "ndbsstb1" stored little-endian
/// 文件尾魔数，小端序存储的 "ndbsstb1"
pub const MAGIC: u64 = 0x6e64_6273_7374_6231;

/// Fixed footer length: two max-length handles (zero padded) + magic
/// 固定文件尾长度：两个最大长度句柄（零填充）+ 魔数
pub const FOOTER_SIZE: usize = 48;

const _: () = assert!(FOOTER_SIZE == 2 * 2 * MAX_VARINT64 + 8);

/// Per-block trailer: type byte + crc32 of body and type
/// 每块尾部：类型字节 + 覆盖块体和类型的 crc32
pub const BLOCK_TRAILER_SIZE: usize = 5;

/// Uncompressed block type
/// 未压缩块类型
pub const BLOCK_TYPE_RAW: u8 = 0;

/// Byte range of a block inside its file
/// 块在文件内的字节范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockHandle {
  pub offset: u64,
  /// Framed extent: block body plus trailer
  /// 封装后的长度：块体加尾部
  pub size: u64,
}

impl BlockHandle {
  #[inline]
  pub fn new(offset: u64, size: u64) -> Self {
    Self { offset, size }
  }

  /// Append varint offset + varint size
  /// 追加变长偏移 + 变长大小
  pub fn encode_to(&self, buf: &mut Vec<u8>) {
    put_varint64(buf, self.offset);
    put_varint64(buf, self.size);
  }

  /// Decode two varints, return (handle, bytes consumed)
  /// 解码两个变长整数，返回（句柄，消耗的字节数）
  pub fn decode_from(data: &[u8]) -> Option<(Self, usize)> {
    let (offset, a) = varint64(data)?;
    let (size, b) = varint64(&data[a..])?;
    Some((Self { offset, size }, a + b))
  }
}

/// Fixed-length trailing record locating the metaindex and index blocks
/// 定位元索引块和索引块的固定长度尾部记录
#[derive(Debug, Clone, Copy, Default)]
pub struct Footer {
  pub metaindex: BlockHandle,
  pub index: BlockHandle,
}

impl Footer {
  /// Append the fixed-length encoding
  /// 追加固定长度编码
  pub fn encode_to(&self, buf: &mut Vec<u8>) {
    let start = buf.len();
    self.metaindex.encode_to(buf);
    self.index.encode_to(buf);
    buf.resize(start + FOOTER_SIZE - 8, 0);
    buf.extend_from_slice(&MAGIC.to_le_bytes());
  }

  /// Decode from exactly FOOTER_SIZE bytes
  /// 从恰好 FOOTER_SIZE 字节解码
  pub fn decode_from(data: &[u8]) -> Result<Self> {
    if data.len() != FOOTER_SIZE {
      return Err(Error::BadFooter);
    }
    let magic = u64::from_le_bytes(data[FOOTER_SIZE - 8..].try_into().unwrap());
    if magic != MAGIC {
      return Err(Error::BadFooter);
    }
    let handles = &data[..FOOTER_SIZE - 8];
    let (metaindex, a) = BlockHandle::decode_from(handles).ok_or(Error::BadFooter)?;
    let (index, _) = BlockHandle::decode_from(&handles[a..]).ok_or(Error::BadFooter)?;
    Ok(Self { metaindex, index })
  }
}

/// Verify the block trailer and strip it, returning the body
/// 校验并剥离块尾部，返回块体
pub(crate) fn check_trailer(mut raw: Vec<u8>, offset: u64) -> Result<Vec<u8>> {
  if raw.len() < BLOCK_TRAILER_SIZE {
    return Err(Error::CorruptBlock { offset });
  }
  let body_end = raw.len() - BLOCK_TRAILER_SIZE;
  let stored = u32::from_le_bytes(raw[body_end + 1..].try_into().unwrap());
  let mut hasher = crc32fast::Hasher::new();
  hasher.update(&raw[..body_end + 1]);
  if hasher.finalize() != stored || raw[body_end] != BLOCK_TYPE_RAW {
    return Err(Error::CorruptBlock { offset });
  }
  raw.truncate(body_end);
  Ok(raw)
}
