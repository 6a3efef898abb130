use super::*;

// =============================================================================
// MemoryStorage
// =============================================================================

#[test]
fn memory_storage_starts_empty() {
    let storage = MemoryStorage::new();
    assert!(storage.is_empty());
    assert!(storage.get(ACCESS_TOKEN_KEY).is_none());
}

#[test]
fn memory_storage_set_overwrites() {
    let storage = MemoryStorage::new();
    storage.set(ACCESS_TOKEN_KEY, "old");
    storage.set(ACCESS_TOKEN_KEY, "new");
    assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("new"));
    assert_eq!(storage.len(), 1);
}

#[test]
fn memory_storage_remove_missing_key_is_noop() {
    let storage = MemoryStorage::new();
    storage.remove(USER_KEY);
    assert!(storage.is_empty());
}

// =============================================================================
// CookieJar
// =============================================================================

#[test]
fn cookie_jar_loads_stored_token() {
    let backing = Arc::new(MemoryStorage::new());
    let jar = CookieJar::new(backing.clone());
    jar.store("r1");
    assert_eq!(jar.load(), Some(RefreshCredential::Token("r1".into())));
    assert_eq!(backing.get(REFRESH_COOKIE).as_deref(), Some("r1"));
}

#[test]
fn cookie_jar_treats_empty_value_as_absent() {
    let backing = Arc::new(MemoryStorage::new());
    backing.set(REFRESH_COOKIE, "");
    let jar = CookieJar::new(backing);
    assert!(jar.load().is_none());
}

#[test]
fn cookie_jar_expire_removes_cookie() {
    let backing = Arc::new(MemoryStorage::new());
    let jar = CookieJar::new(backing.clone());
    jar.store("r1");
    jar.expire();
    assert!(jar.load().is_none());
    assert!(backing.is_empty());
}
