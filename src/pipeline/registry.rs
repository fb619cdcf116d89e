use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use crate::input::FeatureRecord;
use crate::input::artifact::read_artifact_bytes;
use crate::model::artifact::decode_artifact;
use crate::model::error::{LoadError, PredictionError};
use crate::model::{Model, Score};

pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

type LoadResult = Result<Arc<Model>, LoadError>;

/// Read and decode an artifact on the calling thread.
pub fn load(path: &Path) -> Result<Model, LoadError> {
    let started = Instant::now();
    let bytes = read_artifact_bytes(path)?;
    let model = decode_artifact(path, &bytes)?;
    tracing::info!(
        path = %path.display(),
        model = %model.name,
        version = %model.version,
        family = model.family(),
        features = model.schema.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "loaded model artifact"
    );
    Ok(model)
}

/// Load on a worker thread and give up after `timeout`. The worker is left
/// to finish on its own; its result is discarded.
pub fn load_with_timeout(path: &Path, timeout: Duration) -> Result<Model, LoadError> {
    let (tx, rx) = mpsc::channel();
    let owned = path.to_path_buf();
    thread::Builder::new()
        .name("artifact-load".to_string())
        .spawn(move || {
            let _ = tx.send(load(&owned));
        })
        .map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            message: format!("could not start loader thread: {e}"),
        })?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(LoadError::Timeout {
            path: path.to_path_buf(),
            after: timeout,
        }),
        Err(RecvTimeoutError::Disconnected) => Err(LoadError::Io {
            path: path.to_path_buf(),
            message: "loader thread exited without a result".to_string(),
        }),
    }
}

/// Process-lifetime cache of loaded models, one single-assignment slot per
/// artifact path. A failed load stays failed.
#[derive(Debug)]
pub struct ModelRegistry {
    slots: Mutex<HashMap<PathBuf, Arc<OnceLock<LoadResult>>>>,
    artifact_reads: AtomicUsize,
    load_timeout: Duration,
}

impl ModelRegistry {
    pub fn new(load_timeout: Duration) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            artifact_reads: AtomicUsize::new(0),
            load_timeout,
        }
    }

    pub fn global() -> Arc<ModelRegistry> {
        static GLOBAL: OnceLock<Arc<ModelRegistry>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(ModelRegistry::new(DEFAULT_LOAD_TIMEOUT)))
            .clone()
    }

    pub fn load_timeout(&self) -> Duration {
        self.load_timeout
    }

    /// Number of times an artifact was actually read from disk.
    pub fn artifact_reads(&self) -> usize {
        self.artifact_reads.load(Ordering::SeqCst)
    }

    pub fn load(&self, path: &Path) -> Result<Arc<Model>, LoadError> {
        let key = slot_key(path);
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots.entry(key).or_default().clone()
        };

        if let Some(done) = slot.get() {
            tracing::debug!(path = %path.display(), ok = done.is_ok(), "model slot already resolved");
            return done.clone();
        }

        slot.get_or_init(|| {
            self.artifact_reads.fetch_add(1, Ordering::SeqCst);
            let result = load_with_timeout(path, self.load_timeout).map(Arc::new);
            if let Err(err) = &result {
                tracing::error!(path = %path.display(), error = %err, "model artifact failed to load");
            }
            result
        })
        .clone()
    }

    pub fn handle(self: &Arc<Self>, path: impl Into<PathBuf>) -> ModelHandle {
        ModelHandle {
            path: path.into(),
            registry: Arc::clone(self),
        }
    }
}

fn slot_key(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Lazily resolved model behind a configured artifact path.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    path: PathBuf,
    registry: Arc<ModelRegistry>,
}

impl ModelHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn model(&self) -> Result<Arc<Model>, LoadError> {
        self.registry.load(&self.path)
    }

    pub fn predict(&self, record: &FeatureRecord) -> Result<Score, PredictionError> {
        let model = self.model().map_err(PredictionError::ModelUnavailable)?;
        model.predict(record)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/registry.rs"]
mod tests;
