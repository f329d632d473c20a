use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, VideoconvError};
use crate::job::Job;

type LockMap = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Held for the whole load → modify → save sequence of one job.
///
/// Dropping the last guard (with no task waiting) removes the job's entry
/// from the lock map.
pub struct JobGuard {
    guard: Option<OwnedMutexGuard<()>>,
    job_id: String,
    lock: Arc<AsyncMutex<()>>,
    locks: LockMap,
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        self.guard.take();

        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // one reference in the map, one here: nobody else holds or awaits it
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.job_id);
        }
    }
}

/// Key-value persistence of jobs keyed by job id.
///
/// `save` replaces a document atomically: readers see the previous or the
/// new version, never a partial one. Callers that read-modify-write hold
/// the guard from `lock` across the sequence.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn load(&self, job_id: &str) -> Result<Job>;

    async fn save(&self, job: &Job) -> Result<()>;

    async fn lock(&self, job_id: &str) -> JobGuard;

    /// Ids of every stored job, sorted
    async fn list(&self) -> Result<Vec<String>>;
}

/// One `state_<id>.json` document per job in a directory
pub struct FileJobStore {
    dir: PathBuf,
    locks: LockMap,
}

impl FileJobStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn state_path(&self, job_id: &str) -> Result<PathBuf> {
        if !Job::is_valid_id(job_id) {
            return Err(VideoconvError::JobNotFound(job_id.to_string()));
        }
        Ok(self.dir.join(format!("state_{}.json", job_id)))
    }
}

#[async_trait]
impl JobStore for FileJobStore {
    async fn load(&self, job_id: &str) -> Result<Job> {
        let path = self.state_path(job_id)?;
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(VideoconvError::JobNotFound(job_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        debug!("Loaded job state from {}", path.display());
        Ok(serde_json::from_str(&content)?)
    }

    async fn save(&self, job: &Job) -> Result<()> {
        let path = self.state_path(&job.file_id)?;
        let content = serde_json::to_string_pretty(job)?;
        let dir = self.dir.clone();

        // temp file in the same directory so the rename stays on one filesystem
        tokio::task::spawn_blocking(move || -> Result<()> {
            std::fs::create_dir_all(&dir)?;
            let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
            temp.write_all(content.as_bytes())?;
            temp.as_file().sync_all()?;
            temp.persist(&path).map_err(|e| VideoconvError::Io(e.error))?;
            debug!("Saved job state to {}", path.display());
            Ok(())
        })
        .await
        .map_err(|e| VideoconvError::Io(std::io::Error::other(e)))?
    }

    async fn lock(&self, job_id: &str) -> JobGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks.entry(job_id.to_string()).or_default().clone()
        };
        let guard = lock.clone().lock_owned().await;

        JobGuard {
            guard: Some(guard),
            job_id: job_id.to_string(),
            lock,
            locks: self.locks.clone(),
        }
    }

    async fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<String> = WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?;
                let id = name.strip_prefix("state_")?.strip_suffix(".json")?;
                Job::is_valid_id(id).then(|| id.to_string())
            })
            .collect();

        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::TimedSegment;

    fn sample_job(id: &str) -> Job {
        let mut job = Job::new(id.to_string(), format!("video_{}.mp4", id), 2048);
        job.segments = vec![TimedSegment::from_raw(0.0, 1.0, "Hola.").unwrap()];
        job.summary = "Hola.".to_string();
        job.summary_lang = "es".to_string();
        job.tracks.register("es", &format!("subs_{}_es.vtt", id));
        job
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileJobStore::new(dir.path());
        let job = sample_job("ab12cd34");

        store.save(&job).await.unwrap();

        assert!(dir.path().join("state_ab12cd34.json").exists());
        assert_eq!(store.load("ab12cd34").await.unwrap(), job);
    }

    #[tokio::test]
    async fn test_missing_job_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileJobStore::new(dir.path());

        assert!(matches!(store.load("deadbeef").await, Err(VideoconvError::JobNotFound(_))));
        assert!(matches!(store.load("../x").await, Err(VideoconvError::JobNotFound(_))));
    }

    #[tokio::test]
    async fn test_save_replaces_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileJobStore::new(dir.path());
        let mut job = sample_job("ab12cd34");

        store.save(&job).await.unwrap();
        job.summary = "Otro.".to_string();
        store.save(&job).await.unwrap();

        assert_eq!(store.load("ab12cd34").await.unwrap().summary, "Otro.");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_list_returns_sorted_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileJobStore::new(dir.path());
        store.save(&sample_job("bbbb0000")).await.unwrap();
        store.save(&sample_job("aaaa0000")).await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        assert_eq!(store.list().await.unwrap(), vec!["aaaa0000", "bbbb0000"]);
    }

    #[tokio::test]
    async fn test_locked_updates_do_not_lose_writes() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileJobStore::new(dir.path()));
        store.save(&sample_job("ab12cd34")).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let _guard = store.lock("ab12cd34").await;
                let mut job = store.load("ab12cd34").await.unwrap();
                let lang = format!("l{}", i);
                job.tracks.register(&lang, "x.vtt");
                store.save(&job).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.load("ab12cd34").await.unwrap().tracks.len(), 9);
        assert!(store.locks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_released_lock_is_dropped_from_map() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileJobStore::new(dir.path());

        let guard = store.lock("ab12cd34").await;
        assert_eq!(store.locks.lock().unwrap().len(), 1);
        drop(guard);
        assert!(store.locks.lock().unwrap().is_empty());

        let _again = store.lock("ab12cd34").await;
        assert_eq!(store.locks.lock().unwrap().len(), 1);
    }
}
