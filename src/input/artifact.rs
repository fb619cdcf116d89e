use std::fs::File;
use std::io::{self, Read};
use std::ops::Deref;
use std::path::Path;

use flate2::read::GzDecoder;
use memmap2::Mmap;

use crate::model::error::LoadError;

/// Raw artifact contents, either mapped from disk or inflated into memory.
pub enum ArtifactBytes {
    Mapped(Mmap),
    Inflated(Vec<u8>),
}

impl Deref for ArtifactBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            ArtifactBytes::Mapped(map) => map,
            ArtifactBytes::Inflated(buf) => buf,
        }
    }
}

pub fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

pub fn read_artifact_bytes(path: &Path) -> Result<ArtifactBytes, LoadError> {
    let file = File::open(path).map_err(|e| io_to_load_error(path, e))?;
    let len = file
        .metadata()
        .map_err(|e| io_to_load_error(path, e))?
        .len();
    if len == 0 {
        return Err(LoadError::Corrupt {
            path: path.to_path_buf(),
            reason: "artifact file is empty".to_string(),
        });
    }

    if is_gzip_path(path) {
        let mut decoder = GzDecoder::new(file);
        let mut buf = Vec::with_capacity(len as usize * 4);
        decoder
            .read_to_end(&mut buf)
            .map_err(|e| LoadError::Corrupt {
                path: path.to_path_buf(),
                reason: format!("gzip stream is invalid: {e}"),
            })?;
        tracing::debug!(path = %path.display(), compressed = len, inflated = buf.len(), "inflated artifact");
        return Ok(ArtifactBytes::Inflated(buf));
    }

    // Safety: the artifact is treated as immutable for the life of the process.
    let map = unsafe { Mmap::map(&file) }.map_err(|e| io_to_load_error(path, e))?;
    tracing::debug!(path = %path.display(), bytes = map.len(), "mapped artifact");
    Ok(ArtifactBytes::Mapped(map))
}

fn io_to_load_error(path: &Path, err: io::Error) -> LoadError {
    if err.kind() == io::ErrorKind::NotFound {
        LoadError::Missing {
            path: path.to_path_buf(),
        }
    } else {
        LoadError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}
