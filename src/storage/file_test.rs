use super::*;
use crate::storage::{ACCESS_TOKEN_KEY, USER_KEY};

fn temp_session_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("defectdesk-test-{}-{name}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("session.json");
    if path.exists() {
        fs::remove_file(&path).unwrap();
    }
    path
}

#[test]
fn missing_file_reads_as_empty() {
    let storage = FileStorage::new(temp_session_path("missing"));
    assert!(storage.get(ACCESS_TOKEN_KEY).is_none());
}

#[test]
fn set_persists_across_instances() {
    let path = temp_session_path("persist");
    FileStorage::new(&path).set(ACCESS_TOKEN_KEY, "abc");

    let reopened = FileStorage::new(&path);
    assert_eq!(reopened.get(ACCESS_TOKEN_KEY).as_deref(), Some("abc"));
}

#[test]
fn remove_keeps_other_keys() {
    let path = temp_session_path("remove");
    let storage = FileStorage::new(&path);
    storage.set(ACCESS_TOKEN_KEY, "abc");
    storage.set(USER_KEY, r#"{"first_name":"Анна"}"#);
    storage.remove(ACCESS_TOKEN_KEY);

    assert!(storage.get(ACCESS_TOKEN_KEY).is_none());
    assert_eq!(storage.get(USER_KEY).as_deref(), Some(r#"{"first_name":"Анна"}"#));
}

#[test]
fn corrupt_file_reads_as_empty_and_is_rewritten() {
    let path = temp_session_path("corrupt");
    fs::write(&path, "not json").unwrap();
    let storage = FileStorage::new(&path);
    assert!(storage.get(ACCESS_TOKEN_KEY).is_none());

    storage.set(ACCESS_TOKEN_KEY, "fresh");
    let raw = fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed[ACCESS_TOKEN_KEY], "fresh");
}
