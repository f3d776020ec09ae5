/*!
 * Tests for the ephemeral artifact cache
 */

use std::fs;
use signmux::artifact_cache::{ArtifactStore, InMemoryArtifactStore, cache_key};
use crate::common;

/// put followed by take returns the registered path and display name
#[test]
fn test_put_take_withRegisteredEntry_shouldReturnEntryOnce() {
    let dir = common::create_temp_dir().unwrap();
    let artifact = common::create_test_file(&dir.path().to_path_buf(), "out.mkv", "data").unwrap();

    let store = InMemoryArtifactStore::unbounded();
    let key = cache_key("file-123");
    store.put(&key, artifact.clone(), "Show - 1 [Jpn].mkv");

    let entry = store.take(&key).unwrap();
    assert_eq!(entry.path, artifact);
    assert_eq!(entry.display_name, "Show - 1 [Jpn].mkv");
    assert_eq!(entry.key, key);
}

/// take is single-shot: a second take with the same key misses
#[test]
fn test_take_calledTwice_shouldMissOnSecondCall() {
    let dir = common::create_temp_dir().unwrap();
    let artifact = common::create_test_file(&dir.path().to_path_buf(), "out.mkv", "data").unwrap();

    let store = InMemoryArtifactStore::unbounded();
    let key = cache_key("file-123");
    store.put(&key, artifact, "out.mkv");

    assert!(store.take(&key).is_ok());
    assert!(store.take(&key).is_err());
}

/// take on an unknown key misses without an error condition
#[test]
fn test_take_withUnknownKey_shouldMiss() {
    let store = InMemoryArtifactStore::unbounded();
    assert!(store.take("deadbeef").is_err());
    assert!(store.is_empty());
}

/// A vanished backing file is a miss, and the entry is gone afterwards
#[test]
fn test_take_withVanishedFile_shouldMissAndRemoveEntry() {
    let dir = common::create_temp_dir().unwrap();
    let artifact = common::create_test_file(&dir.path().to_path_buf(), "out.mkv", "data").unwrap();

    let store = InMemoryArtifactStore::unbounded();
    let key = cache_key("file-123");
    store.put(&key, artifact.clone(), "out.mkv");

    fs::remove_file(&artifact).unwrap();

    assert!(store.take(&key).is_err());
    // No dangling entry survives the miss
    assert!(store.is_empty());
}

/// A later registration under the same key overwrites the prior one
#[test]
fn test_put_withSameKeyTwice_shouldOverwrite() {
    let dir = common::create_temp_dir().unwrap();
    let first = common::create_test_file(&dir.path().to_path_buf(), "a.mkv", "a").unwrap();
    let second = common::create_test_file(&dir.path().to_path_buf(), "b.mkv", "b").unwrap();

    let store = InMemoryArtifactStore::unbounded();
    let key = cache_key("file-123");
    store.put(&key, first, "a.mkv");
    store.put(&key, second.clone(), "b.mkv");

    assert_eq!(store.len(), 1);
    let entry = store.take(&key).unwrap();
    assert_eq!(entry.path, second);
}

/// Keys are deterministic, fixed-length, and identifier-sensitive
#[test]
fn test_cache_key_withStableIdentifier_shouldBeDeterministic() {
    let a = cache_key("remote-file-id-42");
    let b = cache_key("remote-file-id-42");
    let c = cache_key("remote-file-id-43");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), 8);
    assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
}

/// A zero TTL disables expiry entirely
#[test]
fn test_evict_expired_withZeroTtl_shouldEvictNothing() {
    let dir = common::create_temp_dir().unwrap();
    let artifact = common::create_test_file(&dir.path().to_path_buf(), "out.mkv", "data").unwrap();

    let store = InMemoryArtifactStore::new(0);
    store.put("k", artifact, "out.mkv");

    assert_eq!(store.evict_expired(), 0);
    assert_eq!(store.len(), 1);
}

/// Fresh entries survive an eviction sweep
#[test]
fn test_evict_expired_withFreshEntries_shouldKeepThem() {
    let dir = common::create_temp_dir().unwrap();
    let artifact = common::create_test_file(&dir.path().to_path_buf(), "out.mkv", "data").unwrap();

    let store = InMemoryArtifactStore::new(3600);
    store.put("k", artifact.clone(), "out.mkv");

    assert_eq!(store.evict_expired(), 0);
    assert!(artifact.exists());
    assert!(store.take("k").is_ok());
}

/// The store is shareable across threads; concurrent takes hand the entry
/// to exactly one winner
#[test]
fn test_take_underConcurrency_shouldHandEntryToExactlyOneCaller() {
    use std::sync::Arc;
    use std::thread;

    let dir = common::create_temp_dir().unwrap();
    let artifact = common::create_test_file(&dir.path().to_path_buf(), "out.mkv", "data").unwrap();

    let store = Arc::new(InMemoryArtifactStore::unbounded());
    let key = cache_key("contested");
    store.put(&key, artifact, "out.mkv");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        let key = key.clone();
        handles.push(thread::spawn(move || store.take(&key).is_ok()));
    }

    let wins = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(wins, 1);
}
