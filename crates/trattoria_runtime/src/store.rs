//! Directory-backed persistence: one file per entity kind.
//!
//! Saving overwrites every file. Loading never fails outright: a missing
//! file or unreadable content yields an empty model plus a [`LoadStatus`]
//! saying why. Use [`try_load_from_dir`] to get the underlying error.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use trattoria_foundation::{Error, ErrorKind, Result};
use trattoria_model::{Extents, Model};

use crate::config::StoreConfig;
use crate::serialize::Archive;

/// Outcome of [`load_from_dir`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    /// Every extent was read and relinked.
    Loaded,
    /// At least one extent file does not exist.
    NotFound,
    /// Some content could not be decoded or relinked.
    Corrupt,
}

/// A loaded model and how the load went.
#[derive(Debug)]
pub struct Loaded {
    /// The model; empty unless `status` is [`LoadStatus::Loaded`].
    pub model: Model,
    /// How the load went.
    pub status: LoadStatus,
}

impl Loaded {
    /// Returns true if the load succeeded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.status == LoadStatus::Loaded
    }
}

/// Writes every extent of a model, one file per kind.
///
/// Creates the directory if needed and overwrites existing files.
///
/// # Errors
///
/// Returns an error if serialization fails or a file cannot be written.
pub fn save_to_dir(model: &Model, config: &StoreConfig) -> Result<()> {
    fs::create_dir_all(config.dir()).map_err(|e| io_error("create directory", config.dir(), &e))?;

    let archive = Archive::save(model)?;
    for (kind, blob) in archive.iter() {
        write_file(&config.path_for(kind), blob)?;
    }
    tracing::debug!(dir = %config.dir().display(), extents = archive.len(), "saved model");
    Ok(())
}

/// Reads every extent file and rebuilds the model.
///
/// # Errors
///
/// Returns `NotFound` if any extent file is missing, `Io` if one cannot be
/// read, or the error from [`Archive::load`].
pub fn try_load_from_dir(config: &StoreConfig) -> Result<Model> {
    let mut archive = Archive::new();
    for kind in Extents::KINDS {
        let path = config.path_for(kind);
        let bytes = fs::read(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::not_found(path.display().to_string())
            } else {
                io_error("read", &path, &e)
            }
        })?;
        archive.insert(*kind, bytes);
    }
    let model = archive.load()?;
    tracing::debug!(dir = %config.dir().display(), "loaded model");
    Ok(model)
}

/// Reads every extent file, degrading to an empty model on failure.
///
/// A missing file gives [`LoadStatus::NotFound`]; anything else that goes
/// wrong gives [`LoadStatus::Corrupt`]. The detail is logged, not returned.
#[must_use]
pub fn load_from_dir(config: &StoreConfig) -> Loaded {
    match try_load_from_dir(config) {
        Ok(model) => Loaded {
            model,
            status: LoadStatus::Loaded,
        },
        Err(err) => {
            let status = match err.kind {
                ErrorKind::NotFound(_) => LoadStatus::NotFound,
                _ => LoadStatus::Corrupt,
            };
            tracing::warn!(dir = %config.dir().display(), ?status, %err, "load failed, starting empty");
            Loaded {
                model: Model::new(),
                status,
            }
        }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let file = File::create(path).map_err(|e| io_error("create file", path, &e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .map_err(|e| io_error("write to file", path, &e))?;
    writer.flush().map_err(|e| io_error("flush file", path, &e))
}

fn io_error(action: &str, path: &Path, err: &io::Error) -> Error {
    Error::new(ErrorKind::Io(format!(
        "failed to {action} '{}': {err}",
        path.display()
    )))
}
