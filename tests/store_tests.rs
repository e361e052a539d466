// Tests for the durable key-value store
//
// JsonFileStore keeps the whole map in one JSON object file and rewrites it
// atomically; these tests verify persistence across reopen and recovery from
// damaged files.

use anyhow::Result;
use podcast_studio::{JsonFileStore, StateStore};
use tempfile::TempDir;

#[test]
fn test_set_then_get() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("state.json");

    let mut store = JsonFileStore::open(&path)?;
    assert_eq!(store.get("podcast-step")?, None);

    store.set("podcast-step", "\"topic\"")?;
    assert_eq!(store.get("podcast-step")?, Some("\"topic\"".to_string()));
    Ok(())
}

#[test]
fn test_values_survive_reopen() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("state.json");

    {
        let mut store = JsonFileStore::open(&path)?;
        store.set("podcast-step", "\"recording\"")?;
        store.set("podcast-data", r#"{"topic":"t","keyPoints":"k","script":"s"}"#)?;
    }

    let store = JsonFileStore::open(&path)?;
    assert_eq!(store.get("podcast-step")?, Some("\"recording\"".to_string()));
    assert_eq!(
        store.get("podcast-data")?,
        Some(r#"{"topic":"t","keyPoints":"k","script":"s"}"#.to_string())
    );
    Ok(())
}

#[test]
fn test_overwrite_keeps_latest_value() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("state.json");

    let mut store = JsonFileStore::open(&path)?;
    store.set("key", "first")?;
    store.set("key", "second")?;
    assert_eq!(store.get("key")?, Some("second".to_string()));

    let reopened = JsonFileStore::open(&path)?;
    assert_eq!(reopened.get("key")?, Some("second".to_string()));
    Ok(())
}

#[test]
fn test_missing_file_starts_empty() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonFileStore::open(dir.path().join("nothing-here.json"))?;
    assert_eq!(store.get("podcast-step")?, None);
    Ok(())
}

#[test]
fn test_malformed_file_recovers_empty() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{{{ not json")?;

    // Open does not fail; the bad content is replaced on the next write
    let mut store = JsonFileStore::open(&path)?;
    assert_eq!(store.get("podcast-step")?, None);
    store.set("podcast-step", "\"introduction\"")?;

    let reopened = JsonFileStore::open(&path)?;
    assert_eq!(
        reopened.get("podcast-step")?,
        Some("\"introduction\"".to_string())
    );
    Ok(())
}

#[test]
fn test_creates_parent_directories() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("nested").join("deeper").join("state.json");

    let mut store = JsonFileStore::open(&path)?;
    store.set("key", "value")?;
    assert!(path.exists());
    Ok(())
}
