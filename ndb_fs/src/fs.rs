//! File operations utilities
//! 文件操作工具

use std::path::Path;

use compio::fs::{File, OpenOptions};

/// Open file for reading
/// 打开文件用于读取
#[inline]
pub async fn open_read(path: impl AsRef<Path>) -> std::io::Result<File> {
  OpenOptions::new().read(true).open(path).await
}
