use tessera::cache::{DEFAULT_CAPACITY, LruCache};

#[test]
fn test_put_and_get() {
    let mut cache = LruCache::new(3);

    cache.put("a", 1);
    cache.put("b", 2);

    assert_eq!(cache.get("a"), Some(&1));
    assert_eq!(cache.get("b"), Some(&2));
    assert_eq!(cache.get("c"), None);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_overflow_evicts_least_recently_used() {
    let mut cache = LruCache::new(2);

    cache.put(1, "one");
    cache.put(2, "two");
    cache.put(3, "three");

    assert!(!cache.contains(&1));
    assert_eq!(cache.peek(&2), Some(&"two"));
    assert_eq!(cache.peek(&3), Some(&"three"));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_get_refreshes_recency() {
    let mut cache = LruCache::new(2);

    cache.put(1, 10);
    cache.put(2, 20);
    assert_eq!(cache.get(&1), Some(&10));

    cache.put(3, 30);

    assert!(cache.contains(&1));
    assert!(!cache.contains(&2));
    assert!(cache.contains(&3));
}

#[test]
fn test_peek_does_not_refresh_recency() {
    let mut cache = LruCache::new(2);

    cache.put(1, 10);
    cache.put(2, 20);
    assert_eq!(cache.peek(&1), Some(&10));

    cache.put(3, 30);

    assert!(!cache.contains(&1));
    assert!(cache.contains(&2));
}

#[test]
fn test_miss_leaves_recency_untouched() {
    let mut cache = LruCache::new(2);

    cache.put(1, 10);
    cache.put(2, 20);
    assert_eq!(cache.get(&9), None);

    cache.put(3, 30);

    assert!(!cache.contains(&1));
    assert!(cache.contains(&2));
}

#[test]
fn test_put_existing_key_replaces_and_refreshes() {
    let mut cache = LruCache::new(2);

    cache.put("a", 1);
    cache.put("b", 2);
    cache.put("a", 100);

    assert_eq!(cache.len(), 2);

    cache.put("c", 3);

    assert_eq!(cache.peek("a"), Some(&100));
    assert!(!cache.contains("b"));
}

#[test]
fn test_default_capacity() {
    let mut cache = LruCache::default();
    assert_eq!(cache.capacity(), DEFAULT_CAPACITY);

    for i in 0..DEFAULT_CAPACITY + 5 {
        cache.put(i, i * i);
    }

    assert_eq!(cache.len(), DEFAULT_CAPACITY);
    assert!(!cache.contains(&4));
    assert!(cache.contains(&5));
    assert_eq!(cache.get(&14), Some(&196));
}

#[test]
fn test_zero_capacity_stores_nothing() {
    let mut cache = LruCache::new(0);

    cache.put("a", 1);

    assert!(cache.is_empty());
    assert_eq!(cache.get("a"), None);
}

#[test]
fn test_set_capacity_shrinks_by_recency() {
    let mut cache = LruCache::new(4);

    for i in 0..4 {
        cache.put(i, i);
    }
    cache.get(&0);

    cache.set_capacity(2);

    assert_eq!(cache.capacity(), 2);
    assert_eq!(cache.len(), 2);
    assert!(cache.contains(&0));
    assert!(cache.contains(&3));
}

#[test]
fn test_set_capacity_grows() {
    let mut cache = LruCache::new(1);
    cache.put(1, 1);

    cache.set_capacity(3);
    cache.put(2, 2);
    cache.put(3, 3);

    assert_eq!(cache.len(), 3);
}

#[test]
fn test_clear_keeps_capacity() {
    let mut cache = LruCache::new(3);

    cache.put(1, 1);
    cache.put(2, 2);
    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.capacity(), 3);
    assert_eq!(cache.get(&1), None);

    cache.put(3, 3);
    assert_eq!(cache.get(&3), Some(&3));
}

#[test]
fn test_slots_are_reused_after_eviction() {
    let mut cache = LruCache::new(3);

    for i in 0..1_000 {
        cache.put(i, i.to_string());
        assert!(cache.len() <= 3);
    }

    assert_eq!(cache.get(&999).map(String::as_str), Some("999"));
    assert_eq!(cache.get(&997).map(String::as_str), Some("997"));
    assert!(!cache.contains(&996));
}

#[test]
fn test_string_keys_borrow_lookup() {
    let mut cache: LruCache<String, u32> = LruCache::new(2);

    cache.put("alpha".to_owned(), 1);

    assert_eq!(cache.get("alpha"), Some(&1));
    assert!(cache.contains("alpha"));
}
