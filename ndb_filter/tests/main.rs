#[static_init::constructor(0)]
extern "C" fn _log_init() {
  let _ = env_logger::builder().is_test(true).try_init();
}

mod bloom_tests {
  use aok::{OK, Void};
  use log::info;
  use ndb_filter::{BloomPolicy, FilterPolicy};

  fn build(policy: &BloomPolicy, keys: &[Vec<u8>]) -> Vec<u8> {
    let refs: Vec<&[u8]> = keys.iter().map(|k| k.as_slice()).collect();
    let mut out = Vec::new();
    policy.create_filter(&refs, &mut out);
    out
  }

  #[test]
  fn test_name() -> Void {
    assert_eq!(BloomPolicy::default().name(), "ndb.bloom");
    OK
  }

  #[test]
  fn test_no_false_negatives() -> Void {
    let policy = BloomPolicy::default();
    for count in [1usize, 2, 16, 100, 1000] {
      let keys: Vec<Vec<u8>> = (0..count)
        .map(|_| {
          let len = fastrand::usize(1..32);
          (0..len).map(|_| fastrand::u8(..)).collect()
        })
        .collect();
      let filter = build(&policy, &keys);
      for key in &keys {
        assert!(
          policy.key_may_match(&filter, key),
          "false negative for {key:?} with {count} keys"
        );
      }
    }
    OK
  }

  #[test]
  fn test_false_positive_rate() -> Void {
    let policy = BloomPolicy::default();
    let keys: Vec<Vec<u8>> = (0..10000u32).map(|i| i.to_le_bytes().to_vec()).collect();
    let filter = build(&policy, &keys);

    let mut hit = 0usize;
    let probes = 10000u32;
    for i in 0..probes {
      let key = (1_000_000 + i).to_le_bytes();
      if policy.key_may_match(&filter, &key) {
        hit += 1;
      }
    }
    let rate = hit as f64 / probes as f64;
    info!("bloom false positive rate: {rate}");
    // 10 bits/key should stay well below 5%
    // 每键 10 位应远低于 5%
    assert!(rate < 0.05, "rate too high: {rate}");
    OK
  }

  #[test]
  fn test_short_filter_is_negative() -> Void {
    let policy = BloomPolicy::default();
    assert!(!policy.key_may_match(&[], b"k"));
    assert!(!policy.key_may_match(&[6], b"k"));
    OK
  }

  #[test]
  fn test_reserved_probe_count_matches() -> Void {
    let policy = BloomPolicy::default();
    // Unknown encodings must not produce false negatives
    // 未知编码不能产生假阴性
    let filter = [0u8, 0, 0, 0, 31];
    assert!(policy.key_may_match(&filter, b"anything"));
    OK
  }

  #[test]
  fn test_empty_key_set() -> Void {
    let policy = BloomPolicy::default();
    let filter = build(&policy, &[]);
    // All-zero bits: every probe misses
    // 全零位：任何探测都不命中
    assert!(!policy.key_may_match(&filter, b"k"));
    OK
  }
}
