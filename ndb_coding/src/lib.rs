#![cfg_attr(docsrs, feature(doc_cfg))]

//! Integer coding and byte comparison
//! 整数编码与字节比较
//!
//! Fixed-width integers are little-endian. Varints are LEB128-style:
//! 7 bits per byte, continuation bit set on non-final bytes.
//! 定长整数为小端序。变长整数为 LEB128 风格：每字节 7 位，非末尾字节设置续位。

use std::cmp::Ordering;

/// Max encoded length of a varint u32
/// u32 变长编码的最大长度
pub const MAX_VARINT32: usize = 5;

/// Max encoded length of a varint u64
/// u64 变长编码的最大长度
pub const MAX_VARINT64: usize = 10;

/// Append u32 as little-endian
/// 追加小端序 u32
#[inline]
pub fn put_fixed32(buf: &mut Vec<u8>, v: u32) {
  buf.extend_from_slice(&v.to_le_bytes());
}

/// Append u64 as little-endian
/// 追加小端序 u64
#[inline]
pub fn put_fixed64(buf: &mut Vec<u8>, v: u64) {
  buf.extend_from_slice(&v.to_le_bytes());
}

/// Decode little-endian u32 from the first 4 bytes
/// 从前 4 字节解码小端序 u32
#[inline]
pub fn fixed32(data: &[u8]) -> Option<u32> {
  Some(u32::from_le_bytes(data.get(..4)?.try_into().ok()?))
}

/// Decode little-endian u64 from the first 8 bytes
/// 从前 8 字节解码小端序 u64
#[inline]
pub fn fixed64(data: &[u8]) -> Option<u64> {
  Some(u64::from_le_bytes(data.get(..8)?.try_into().ok()?))
}

/// Append varint-encoded u32
/// 追加变长编码的 u32
#[inline]
pub fn put_varint32(buf: &mut Vec<u8>, v: u32) {
  put_varint64(buf, v as u64);
}

/// Append varint-encoded u64
/// 追加变长编码的 u64
pub fn put_varint64(buf: &mut Vec<u8>, mut v: u64) {
  while v >= 0x80 {
    buf.push((v as u8) | 0x80);
    v >>= 7;
  }
  buf.push(v as u8);
}

/// Decode varint u32, return (value, bytes consumed)
/// 解码变长 u32，返回（值，消耗的字节数）
pub fn varint32(data: &[u8]) -> Option<(u32, usize)> {
  let mut v = 0u32;
  let mut shift = 0u32;
  for (i, &b) in data.iter().enumerate().take(MAX_VARINT32) {
    // Final byte may only carry the 4 remaining bits
    // 末尾字节最多承载剩余的 4 位
    if shift == 28 && b > 0x0f {
      return None;
    }
    v |= ((b & 0x7f) as u32) << shift;
    if b & 0x80 == 0 {
      return Some((v, i + 1));
    }
    shift += 7;
  }
  None
}

/// Decode varint u64, return (value, bytes consumed)
/// 解码变长 u64，返回（值，消耗的字节数）
pub fn varint64(data: &[u8]) -> Option<(u64, usize)> {
  let mut v = 0u64;
  let mut shift = 0u32;
  for (i, &b) in data.iter().enumerate().take(MAX_VARINT64) {
    // Final byte may only carry the 1 remaining bit
    // 末尾字节最多承载剩余的 1 位
    if shift == 63 && b > 0x01 {
      return None;
    }
    v |= ((b & 0x7f) as u64) << shift;
    if b & 0x80 == 0 {
      return Some((v, i + 1));
    }
    shift += 7;
  }
  None
}

/// Lexicographic comparison on unsigned bytes
/// 无符号字节的字典序比较
#[inline]
pub fn cmp(a: &[u8], b: &[u8]) -> Ordering {
  a.cmp(b)
}

/// Shared prefix length of two byte slices
/// 两个字节切片的共享前缀长度
#[inline]
pub fn shared_prefix_len(a: &[u8], b: &[u8]) -> usize {
  let len = a.len().min(b.len());
  let mut n = 0;
  while n < len && a[n] == b[n] {
    n += 1;
  }
  n
}
