use crate::{CacheKey, KernelCache, MemoryCache};

#[test]
fn test_miss_then_hit() {
    let cache = MemoryCache::<Vec<u8>>::new();
    let key = CacheKey::new("sbfft_m1_M1_Mb1_N8", 7);
    assert!(cache.get(&key).is_none());
    cache.store(key.clone(), vec![1, 2, 3]);
    assert_eq!(cache.get(&key), Some(vec![1, 2, 3]));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_device_is_part_of_key() {
    let cache = MemoryCache::<u32>::default();
    cache.store(CacheKey::new("k", 1), 10);
    assert!(cache.get(&CacheKey::new("k", 2)).is_none());
    cache.store(CacheKey::new("k", 2), 20);
    assert_eq!(cache.get(&CacheKey::new("k", 1)), Some(10));
    assert_eq!(cache.get(&CacheKey::new("k", 2)), Some(20));
}

#[test]
fn test_clear() {
    let cache = MemoryCache::<u32>::new();
    cache.store(CacheKey::new("k", 1), 10);
    assert!(!cache.is_empty());
    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_key_display() {
    assert_eq!(CacheKey::new("f2fft_m1", 3).to_string(), "f2fft_m1@3");
}
