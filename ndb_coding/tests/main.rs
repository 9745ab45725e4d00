#[static_init::constructor(0)]
extern "C" fn _log_init() {
  let _ = env_logger::builder().is_test(true).try_init();
}

mod coding_tests {
  use std::cmp::Ordering;

  use aok::{OK, Void};
  use ndb_coding::{
    MAX_VARINT32, MAX_VARINT64, cmp, fixed32, fixed64, put_fixed32, put_fixed64, put_varint32,
    put_varint64, shared_prefix_len, varint32, varint64,
  };

  #[test]
  fn test_fixed_roundtrip() -> Void {
    let mut buf = Vec::new();
    let vals32 = [0u32, 1, 255, 256, 0x1234_5678, u32::MAX];
    for v in vals32 {
      buf.clear();
      put_fixed32(&mut buf, v);
      assert_eq!(buf.len(), 4);
      assert_eq!(fixed32(&buf), Some(v));
    }

    let vals64 = [0u64, 1, u32::MAX as u64, u32::MAX as u64 + 1, u64::MAX];
    for v in vals64 {
      buf.clear();
      put_fixed64(&mut buf, v);
      assert_eq!(buf.len(), 8);
      assert_eq!(fixed64(&buf), Some(v));
    }

    // Truncated input
    // 截断的输入
    assert_eq!(fixed32(&[1, 2, 3]), None);
    assert_eq!(fixed64(&[1, 2, 3, 4, 5, 6, 7]), None);
    OK
  }

  #[test]
  fn test_varint32_roundtrip() -> Void {
    // 7-bit group boundaries
    // 7 位分组边界
    let vals = [
      0u32,
      1,
      127,
      128,
      16383,
      16384,
      (1 << 21) - 1,
      1 << 21,
      (1 << 28) - 1,
      1 << 28,
      u32::MAX,
    ];
    for v in vals {
      let mut buf = Vec::new();
      put_varint32(&mut buf, v);
      assert!(buf.len() <= MAX_VARINT32);
      let (got, n) = varint32(&buf).expect("decode");
      assert_eq!(got, v);
      assert_eq!(n, buf.len());
    }
    OK
  }

  #[test]
  fn test_varint64_roundtrip() -> Void {
    let mut vals = vec![0u64, u64::MAX];
    for shift in 0..9 {
      let edge = 1u64 << (7 * (shift + 1));
      vals.push(edge - 1);
      vals.push(edge);
    }
    for v in vals {
      let mut buf = Vec::new();
      put_varint64(&mut buf, v);
      assert!(buf.len() <= MAX_VARINT64);
      let (got, n) = varint64(&buf).expect("decode");
      assert_eq!(got, v);
      assert_eq!(n, buf.len());
    }
    OK
  }

  #[test]
  fn test_varint_random_roundtrip() -> Void {
    for _ in 0..10000 {
      let v = fastrand::u64(..);
      let mut buf = Vec::new();
      put_varint64(&mut buf, v);
      assert_eq!(varint64(&buf), Some((v, buf.len())));

      let v = fastrand::u32(..);
      buf.clear();
      put_varint32(&mut buf, v);
      assert_eq!(varint32(&buf), Some((v, buf.len())));
    }
    OK
  }

  #[test]
  fn test_varint_rejects_malformed() -> Void {
    // Truncated: continuation bit set, no next byte
    // 截断：设置了续位但没有后续字节
    assert_eq!(varint32(&[0x80]), None);
    assert_eq!(varint64(&[0xff, 0xff]), None);
    assert_eq!(varint32(&[]), None);

    // Over-long: all continuation bytes up to the max length
    // 超长：直到最大长度都是续位字节
    assert_eq!(varint32(&[0x80; 5]), None);
    assert_eq!(varint64(&[0x80; 10]), None);

    // Overflow bits in the final byte
    // 末尾字节溢出
    assert_eq!(varint32(&[0xff, 0xff, 0xff, 0xff, 0x10]), None);
    assert_eq!(
      varint64(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x02]),
      None
    );
    OK
  }

  #[test]
  fn test_varint_decode_extra_tail() -> Void {
    // Decoder stops at the final byte, trailing data is untouched
    // 解码在末尾字节停止，不消费后续数据
    let mut buf = Vec::new();
    put_varint64(&mut buf, 300);
    let used = buf.len();
    buf.extend_from_slice(b"tail");
    assert_eq!(varint64(&buf), Some((300, used)));
    OK
  }

  #[test]
  fn test_cmp() -> Void {
    assert_eq!(cmp(b"a", b"a"), Ordering::Equal);
    assert_eq!(cmp(b"a", b"b"), Ordering::Less);
    assert_eq!(cmp(b"b", b"a"), Ordering::Greater);
    // Prefix sorts before its extension
    // 前缀排在扩展之前
    assert_eq!(cmp(b"ab", b"abc"), Ordering::Less);
    assert_eq!(cmp(b"", b"a"), Ordering::Less);
    // Unsigned byte order
    // 无符号字节序
    assert_eq!(cmp(&[0x7f], &[0x80]), Ordering::Less);
    OK
  }

  #[test]
  fn test_shared_prefix_len() -> Void {
    assert_eq!(shared_prefix_len(b"", b""), 0);
    assert_eq!(shared_prefix_len(b"abc", b"abd"), 2);
    assert_eq!(shared_prefix_len(b"abc", b"abc"), 3);
    assert_eq!(shared_prefix_len(b"abc", b"abcdef"), 3);
    assert_eq!(shared_prefix_len(b"xyz", b"abc"), 0);
    OK
  }
}
