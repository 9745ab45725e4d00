#[static_init::constructor(0)]
extern "C" fn _log_init() {
  let _ = env_logger::builder().is_test(true).try_init();
}

mod lru_tests {
  use aok::{OK, Void};
  use ndb_lru::Lru;

  #[test]
  fn test_lru_basic_operations() -> Void {
    let mut cache: Lru<Box<str>, &str> = Lru::new(3);

    cache.set("key1".into(), "value1");
    cache.set("key2".into(), "value2");
    cache.set("key3".into(), "value3");

    // Boxed keys answer borrowed queries
    // 装箱的键可用借用形式查询
    assert_eq!(cache.get("key1"), Some(&"value1"));
    assert_eq!(cache.get("key2"), Some(&"value2"));
    assert_eq!(cache.get("key3"), Some(&"value3"));
    assert_eq!(cache.get("nonexistent"), None);

    cache.rm("key2");
    assert_eq!(cache.get("key2"), None);
    assert_eq!(cache.len(), 2);

    cache.clear();
    assert!(cache.is_empty());
    OK
  }

  #[test]
  fn test_lru_eviction_by_recency() -> Void {
    let mut cache = Lru::new(2);

    cache.set(1, "a");
    cache.set(2, "b");

    // Touch 1 so 2 becomes the LRU victim
    // 访问 1，使 2 成为 LRU 牺牲者
    assert_eq!(cache.get(&1), Some(&"a"));

    cache.set(3, "c");
    assert_eq!(cache.get(&1), Some(&"a"));
    assert_eq!(cache.get(&2), None);
    assert_eq!(cache.get(&3), Some(&"c"));
    OK
  }

  #[test]
  fn test_lru_zero_capacity() -> Void {
    // Capacity 0 is clamped to 1
    // 容量 0 被调整为 1
    let mut cache: Lru<Box<str>, u32> = Lru::new(0);
    cache.set("k".into(), 1);
    assert_eq!(cache.get("k"), Some(&1));

    // The single slot turns over on the next insert
    // 唯一的槽位在下次插入时被替换
    cache.set("k2".into(), 2);
    assert_eq!(cache.get("k"), None);
    assert_eq!(cache.get("k2"), Some(&2));
    OK
  }
}

mod size_lru_tests {
  use aok::{OK, Void};
  use ndb_lru::SizeLru;

  #[test]
  fn test_size_lru_byte_budget() -> Void {
    let mut cache = SizeLru::new(100);

    cache.set(1, "a", 40);
    cache.set(2, "b", 40);
    assert_eq!(cache.used(), 80);

    // Inserting 40 more exceeds 100, evicts entry 1 (LRU)
    // 再插入 40 超过 100，淘汰条目 1（最久未用）
    cache.set(3, "c", 40);
    assert_eq!(cache.get(&1), None);
    assert_eq!(cache.get(&2), Some(&"b"));
    assert_eq!(cache.get(&3), Some(&"c"));
    assert_eq!(cache.used(), 80);
    OK
  }

  #[test]
  fn test_size_lru_touch_changes_victim() -> Void {
    let mut cache = SizeLru::new(100);

    cache.set(1, "a", 40);
    cache.set(2, "b", 40);
    assert_eq!(cache.get(&1), Some(&"a"));

    cache.set(3, "c", 40);
    assert_eq!(cache.get(&1), Some(&"a"));
    assert_eq!(cache.get(&2), None);
    OK
  }

  #[test]
  fn test_size_lru_oversized_entry_stays() -> Void {
    let mut cache = SizeLru::new(10);

    // An entry above the whole budget evicts everything else but stays
    // 超出整个预算的条目会淘汰其他所有条目，但自身保留
    cache.set(1, "small", 4);
    cache.set(2, "huge", 64);
    assert_eq!(cache.get(&1), None);
    assert_eq!(cache.get(&2), Some(&"huge"));
    assert_eq!(cache.len(), 1);

    cache.set(3, "next", 4);
    assert_eq!(cache.get(&2), None);
    assert_eq!(cache.get(&3), Some(&"next"));
    OK
  }

  #[test]
  fn test_size_lru_replace_same_key() -> Void {
    let mut cache = SizeLru::new(100);

    cache.set(1, "a", 30);
    cache.set(1, "b", 50);
    assert_eq!(cache.used(), 50);
    assert_eq!(cache.get(&1), Some(&"b"));
    assert_eq!(cache.len(), 1);

    cache.rm(&1);
    assert_eq!(cache.used(), 0);
    assert!(cache.is_empty());
    OK
  }

  #[test]
  fn test_size_lru_clear() -> Void {
    let mut cache = SizeLru::new(100);
    cache.set(1, "a", 10);
    cache.set(2, "b", 10);
    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.used(), 0);
    OK
  }
}
