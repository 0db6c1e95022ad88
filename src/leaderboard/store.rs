//! JSON-file score store.
//!
//! The whole record set lives in memory and is rewritten in full on every
//! accepted submission. Writers are serialized through an async mutex, so
//! within one process the last writer wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::ScoreEntry;
use crate::core::StoreError;

pub struct ScoreStore {
    path: Option<PathBuf>,
    entries: Mutex<Vec<ScoreEntry>>,
}

impl ScoreStore {
    /// Open the store backed by `path`.
    ///
    /// A missing file starts an empty board. A file that does not parse is
    /// logged and treated as empty; it is replaced on the next submission.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(raw) => match serde_json::from_slice::<Vec<ScoreEntry>>(&raw) {
                Ok(mut entries) => {
                    sort_descending(&mut entries);
                    entries
                }
                Err(e) => {
                    warn!("ignoring unreadable score file {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("opened score store {} with {} entries", path.display(), entries.len());

        Ok(Self {
            path: Some(path),
            entries: Mutex::new(entries),
        })
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record `score` for `nickname`, keeping the best score per nickname.
    ///
    /// Returns the full board, highest score first. Ties keep the order in
    /// which nicknames first appeared. Nothing changes if the write fails.
    pub async fn submit(&self, nickname: &str, score: u64) -> Result<Vec<ScoreEntry>, StoreError> {
        let mut entries = self.entries.lock().await;

        let mut updated = entries.clone();
        match updated.iter_mut().find(|e| e.nickname == nickname) {
            Some(existing) => existing.score = existing.score.max(score),
            None => updated.push(ScoreEntry::new(nickname, score)),
        }
        sort_descending(&mut updated);

        if let Some(path) = &self.path {
            let raw = serde_json::to_vec_pretty(&updated)?;
            tokio::fs::write(path, raw).await?;
            debug!("rewrote {} ({} entries)", path.display(), updated.len());
        }

        *entries = updated.clone();
        Ok(updated)
    }

    /// The full board, highest score first.
    pub async fn entries(&self) -> Vec<ScoreEntry> {
        self.entries.lock().await.clone()
    }

    /// Best recorded score for `nickname`.
    pub async fn best(&self, nickname: &str) -> Option<u64> {
        self.entries
            .lock()
            .await
            .iter()
            .find(|e| e.nickname == nickname)
            .map(|e| e.score)
    }
}

fn sort_descending(entries: &mut [ScoreEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keeps_best_score() {
        let store = ScoreStore::in_memory();
        store.submit("a", 5).await.unwrap();
        let board = store.submit("a", 3).await.unwrap();

        assert_eq!(board, vec![ScoreEntry::new("a", 5)]);
        assert_eq!(store.best("a").await, Some(5));

        store.submit("a", 8).await.unwrap();
        assert_eq!(store.best("a").await, Some(8));
    }

    #[tokio::test]
    async fn test_sorted_descending_with_stable_ties() {
        let store = ScoreStore::in_memory();
        store.submit("first", 2).await.unwrap();
        store.submit("top", 9).await.unwrap();
        store.submit("second", 2).await.unwrap();

        let names: Vec<_> = store.entries().await.into_iter().map(|e| e.nickname).collect();
        assert_eq!(names, vec!["top", "first", "second"]);
    }

    #[tokio::test]
    async fn test_persists_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let store = ScoreStore::open(&path).await.unwrap();
        assert!(store.entries().await.is_empty());
        store.submit("kim", 12).await.unwrap();
        store.submit("lee", 30).await.unwrap();
        drop(store);

        let reopened = ScoreStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.entries().await,
            vec![ScoreEntry::new("lee", 30), ScoreEntry::new("kim", 12)]
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let store = ScoreStore::open(&path).await.unwrap();
        assert!(store.entries().await.is_empty());

        store.submit("park", 1).await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<ScoreEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, vec![ScoreEntry::new("park", 1)]);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_board_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the write fail.
        let path = dir.path().join("scores.json");
        std::fs::create_dir(&path).unwrap();

        let store = ScoreStore {
            path: Some(path),
            entries: Mutex::new(Vec::new()),
        };
        assert!(store.submit("a", 1).await.is_err());
        assert!(store.entries().await.is_empty());
    }
}
