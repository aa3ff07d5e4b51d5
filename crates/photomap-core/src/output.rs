//! Manifest assembly and persistence.
//!
//! The manifest is folded from per-file outcomes once processing is done and
//! then written in one go. Writes go to a scratch file next to the target and
//! are renamed into place, so readers only ever see a complete manifest.

use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::PhotoMapError;
use crate::types::{ItemOutcome, PhotoRecord};

/// Ordered list of photo records for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    records: Vec<PhotoRecord>,
}

impl Manifest {
    /// Keep the processed records, in processing order.
    pub fn from_outcomes<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a ItemOutcome>,
    {
        let mut manifest = Self::default();
        for outcome in outcomes {
            if let ItemOutcome::Processed(record) = outcome {
                manifest.push(record.clone());
            }
        }
        manifest
    }

    /// Append a record. A record with an id already present replaces the
    /// earlier one, since its derivatives have overwritten the earlier files.
    pub fn push(&mut self, record: PhotoRecord) {
        if let Some(pos) = self.records.iter().position(|r| r.id == record.id) {
            let previous = self.records.remove(pos);
            tracing::warn!(
                "Duplicate id {:?}: {} replaces {}",
                record.id,
                record.original_name,
                previous.original_name
            );
        }
        self.records.push(record);
    }

    /// Sort records by id.
    pub fn sort_by_id(&mut self) {
        self.records.sort_by(|a, b| a.id.cmp(&b.id));
    }

    pub fn records(&self) -> &[PhotoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Writes a manifest as a single JSON array.
pub struct ManifestWriter {
    path: PathBuf,
    pretty: bool,
}

impl ManifestWriter {
    /// Create a writer targeting `path`.
    ///
    /// `pretty` controls indentation only; the content is the same either way.
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            path: path.into(),
            pretty,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize the manifest into any writer.
    pub fn write_to<W: Write>(&self, mut writer: W, manifest: &Manifest) -> io::Result<()> {
        let json = to_json(manifest.records(), self.pretty).map_err(io::Error::other)?;
        writer.write_all(json.as_bytes())?;
        writeln!(writer)?;
        writer.flush()
    }

    /// Replace the manifest file atomically, creating its directory if needed.
    pub fn write(&self, manifest: &Manifest) -> Result<(), PhotoMapError> {
        let to_err = |source: io::Error| PhotoMapError::ManifestWrite {
            path: self.path.clone(),
            source,
        };

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(to_err)?;

        let mut scratch = tempfile::NamedTempFile::new_in(&parent).map_err(to_err)?;
        self.write_to(io::BufWriter::new(scratch.as_file_mut()), manifest)
            .map_err(to_err)?;
        scratch.as_file().sync_all().map_err(to_err)?;
        scratch
            .persist(&self.path)
            .map_err(|e| to_err(e.error))?;

        tracing::debug!("Wrote {} record(s) to {:?}", manifest.len(), self.path);
        Ok(())
    }
}

/// Convenience function to serialize an item to a JSON string.
pub fn to_json<T: Serialize + ?Sized>(item: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(item)
    } else {
        serde_json::to_string(item)
    }
}
