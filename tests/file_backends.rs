//! Durability of the file-backed entry store and commit log, and replay of
//! a data directory.

use std::fs;
use std::sync::Arc;

use serde_json::json;
use tempfile::tempdir;

use situps::commit::{read_commits, CommitLogError, FileCommitLog, COMMITS_FILE};
use situps::model::{EntryData, EntryKey, ScheduleDate};
use situps::realtime::Broadcaster;
use situps::store::{EntryStore, FileEntryStore, StoreError, ENTRIES_FILE};
use situps::sync::{replay, ReplayReport, SyncService};

fn key(user: &str, day: i64) -> EntryKey {
    EntryKey::new(user, ScheduleDate::new(2024, 5, day))
}

fn file_service(dir: &std::path::Path) -> SyncService {
    SyncService::new(
        Arc::new(FileEntryStore::open(dir).unwrap()),
        Arc::new(FileCommitLog::open(dir).unwrap()),
        Arc::new(Broadcaster::new()),
    )
}

fn update(k: &EntryKey, amount: i64) -> serde_json::Value {
    json!({"entryKey": k.to_value(), "amount": amount})
}

#[test]
fn test_entries_survive_reopen() {
    let dir = tempdir().unwrap();

    {
        let service = file_service(dir.path());
        service.update_entry(&update(&key("u1", 1), 3), None).unwrap();
        service.update_entry(&update(&key("u1", 1), 5), None).unwrap();
        service.update_entry(&update(&key("u2", 2), 0), None).unwrap();
    }

    let store = FileEntryStore::open(dir.path()).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.find(&key("u1", 1)).unwrap(), Some(EntryData::with_amount(5)));

    // Stored but filtered
    assert_eq!(store.find(&key("u2", 2)).unwrap(), None);
    assert_eq!(store.document(&key("u2", 2)).unwrap(), Some(EntryData::with_amount(0)));
}

#[test]
fn test_commits_survive_reopen() {
    let dir = tempdir().unwrap();

    {
        let service = file_service(dir.path());
        service.update_entry(&update(&key("u1", 1), 3), Some("phone")).unwrap();
    }
    {
        let service = file_service(dir.path());
        service.update_entry(&update(&key("u1", 1), 4), Some("laptop")).unwrap();
    }

    let commits = read_commits(dir.path().join(COMMITS_FILE)).unwrap();
    let clients: Vec<_> = commits.iter().map(|c| c.client.clone()).collect();
    assert_eq!(clients, vec![Some("phone".to_string()), Some("laptop".to_string())]);
    assert!(commits.iter().all(|c| c.is_entry_update()));
}

#[test]
fn test_corrupted_entry_log_fails_open() {
    let dir = tempdir().unwrap();
    {
        let store = FileEntryStore::open(dir.path()).unwrap();
        store.upsert(&key("u1", 1), &EntryData::with_amount(3)).unwrap();
    }

    let path = dir.path().join(ENTRIES_FILE);
    let contents = fs::read_to_string(&path).unwrap();
    fs::write(&path, contents.replace("\"u1\"", "\"u9\"")).unwrap();

    let err = FileEntryStore::open(dir.path()).unwrap_err();
    assert!(matches!(err, StoreError::Corrupted { line: 1, .. }));
}

#[test]
fn test_truncated_commit_line_is_corruption() {
    let dir = tempdir().unwrap();
    {
        let service = file_service(dir.path());
        service.update_entry(&update(&key("u1", 1), 3), None).unwrap();
    }

    let path = dir.path().join(COMMITS_FILE);
    let contents = fs::read_to_string(&path).unwrap();
    fs::write(&path, &contents[..contents.len() / 2]).unwrap();

    let err = read_commits(&path).unwrap_err();
    assert!(matches!(err, CommitLogError::Corrupted { line: 1, .. }));
}

#[test]
fn test_replay_restores_state_from_commits() {
    let dir = tempdir().unwrap();
    {
        let service = file_service(dir.path());
        service.update_entry(&update(&key("u1", 1), 3), None).unwrap();
        service.update_entry(&update(&key("u1", 1), 9), None).unwrap();
        service.update_entry(&update(&key("u2", 1), 2), None).unwrap();
    }

    let commits = read_commits(dir.path().join(COMMITS_FILE)).unwrap();
    let rebuilt = tempdir().unwrap();
    let store = FileEntryStore::recreate(rebuilt.path()).unwrap();

    let report = replay(&commits, &store).unwrap();
    assert_eq!(report, ReplayReport { applied: 3, skipped: 0 });
    assert_eq!(store.find(&key("u1", 1)).unwrap(), Some(EntryData::with_amount(9)));
    assert_eq!(store.find(&key("u2", 1)).unwrap(), Some(EntryData::with_amount(2)));
}

#[test]
fn test_replay_applies_commits_whose_upsert_failed() {
    // A commit without its mutation is re-applied by replay
    let dir = tempdir().unwrap();
    let commits_log = FileCommitLog::open(dir.path()).unwrap();
    let commit = situps::commit::Commit::update(
        &situps::model::UpdateRequest::new(key("u1", 1), EntryData::with_amount(6)),
        None,
    );
    situps::commit::CommitLog::append(&commits_log, &commit).unwrap();

    let store = FileEntryStore::recreate(dir.path()).unwrap();
    assert!(store.is_empty());

    let commits = read_commits(commits_log.path()).unwrap();
    replay(&commits, &store).unwrap();
    assert_eq!(store.find(&key("u1", 1)).unwrap(), Some(EntryData::with_amount(6)));
}
