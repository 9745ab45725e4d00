//! Random access file reader
//! 随机访问文件读取器

use std::path::Path;

use compio::{
  buf::{IntoInner, IoBuf},
  fs::File,
  io::AsyncReadAtExt,
};

use crate::fs::open_read;

/// Read-only file with its size captured at open
/// 只读文件，打开时记录大小
pub struct FileReader {
  file: File,
  size: u64,
}

impl FileReader {
  /// Open for reading and stat the size
  /// 打开用于读取并获取大小
  pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
    let file = open_read(path).await?;
    let size = file.metadata().await?.len();
    Ok(Self { file, size })
  }

  /// File size in bytes
  /// 文件大小（字节）
  #[inline]
  pub fn size(&self) -> u64 {
    self.size
  }

  /// Read exactly len bytes at offset
  /// 在偏移处精确读取 len 字节
  pub async fn read_exact(&self, offset: u64, len: usize) -> std::io::Result<Vec<u8>> {
    if len == 0 {
      return Ok(Vec::new());
    }
    let buf = vec![0u8; len];
    let slice = buf.slice(0..len);
    let res = self.file.read_exact_at(slice, offset).await;
    res.0?;
    Ok(res.1.into_inner())
  }
}
