use crate::{
    container::{DecodeError, ImageContainer},
    enums::SeriesId,
};

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error("Cannot list folder {path}: {source}")]
    ReadFolder { path: PathBuf, source: io::Error },
}

/// One file of a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesEntry {
    pub instance_id: i64,
    pub path: PathBuf,
}

/// Files grouped by series, keys in display order.
#[derive(Debug, Default, Clone)]
pub struct SeriesIndex {
    series: BTreeMap<SeriesId, Vec<SeriesEntry>>,
}

impl SeriesIndex {
    /// Append an entry to its series unless the path is already there
    ///
    /// Returns `false` for a duplicate path
    pub fn insert(&mut self, series_id: SeriesId, entry: SeriesEntry) -> bool {
        let bucket = self.series.entry(series_id).or_default();
        if bucket.iter().any(|existing| existing.path == entry.path) {
            return false;
        }
        bucket.push(entry);
        true
    }

    /// Stable sort of every series by InstanceNumber
    pub fn sort_by_instance(&mut self) {
        for bucket in self.series.values_mut() {
            bucket.sort_by_key(|entry| entry.instance_id);
        }
    }

    /// `(series, file count)` sorted by series
    pub fn list(&self) -> Vec<(SeriesId, usize)> {
        self.series
            .iter()
            .map(|(id, bucket)| (id.clone(), bucket.len()))
            .collect()
    }

    pub fn files(&self, series_id: &SeriesId) -> Option<&[SeriesEntry]> {
        self.series.get(series_id).map(Vec::as_slice)
    }

    /// Middle file of a series, the one offered for drawing the crop
    pub fn representative(&self, series_id: &SeriesId) -> Option<&SeriesEntry> {
        let files = self.files(series_id)?;
        files.get(files.len() / 2)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn clear(&mut self) {
        self.series.clear();
    }
}

/// Outcome of one folder scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub scanned: usize,
    pub indexed: usize,
    pub skipped: Vec<(PathBuf, String)>,
    pub mirror_failures: Vec<(PathBuf, String)>,
}

pub struct SeriesOrganizer {
    index: SeriesIndex,
    mirror_root: Option<PathBuf>,
}

impl SeriesOrganizer {
    /// Organizer that copies files under `mirror_root/Serie_<id>/` when set
    pub fn new(mirror_root: Option<PathBuf>) -> Self {
        Self {
            index: SeriesIndex::default(),
            mirror_root,
        }
    }

    /// Rebuild the index from the files directly inside `folder`
    ///
    /// Unreadable files are logged and skipped. Within each series files are
    /// ordered by InstanceNumber, ties keep file name order.
    ///
    /// # Errors
    ///
    /// Returns error only if the folder itself cannot be listed
    pub fn organize(&mut self, folder: impl AsRef<Path>) -> Result<ScanReport, OrganizeError> {
        let folder = folder.as_ref();
        self.index.clear();

        let mut paths: Vec<_> = fs::read_dir(folder)
            .map_err(|source| OrganizeError::ReadFolder {
                path: folder.to_path_buf(),
                source,
            })?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut report = ScanReport {
            scanned: paths.len(),
            ..ScanReport::default()
        };

        for path in paths {
            let series_id = match self.index_file(&path) {
                Ok(series_id) => series_id,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "could not read DICOM file");
                    report.skipped.push((path, err.to_string()));
                    continue;
                }
            };
            report.indexed += 1;

            if let Some(root) = &self.mirror_root {
                if let Err(err) = Self::mirror_file(root, &series_id, &path) {
                    warn!(path = %path.display(), error = %err, "could not copy file into series folder");
                    report.mirror_failures.push((path, err.to_string()));
                }
            }
        }

        self.index.sort_by_instance();
        info!(
            folder = %folder.display(),
            series = self.index.len(),
            indexed = report.indexed,
            skipped = report.skipped.len(),
            "organized folder"
        );
        Ok(report)
    }

    pub fn list_series(&self) -> Vec<(SeriesId, usize)> {
        self.index.list()
    }

    pub fn files_for(&self, series_id: &SeriesId) -> Option<&[SeriesEntry]> {
        self.index.files(series_id)
    }

    pub fn representative(&self, series_id: &SeriesId) -> Option<&SeriesEntry> {
        self.index.representative(series_id)
    }

    pub fn index(&self) -> &SeriesIndex {
        &self.index
    }

    fn index_file(&mut self, path: &Path) -> Result<SeriesId, DecodeError> {
        let container = ImageContainer::load(path)?;
        let series_id = container.series_id()?;
        let instance_id = container.instance_id()?;
        debug!(path = %path.display(), %series_id, instance_id, "indexed file");

        self.index.insert(
            series_id.clone(),
            SeriesEntry {
                instance_id,
                path: path.to_path_buf(),
            },
        );
        Ok(series_id)
    }

    fn mirror_file(root: &Path, series_id: &SeriesId, path: &Path) -> io::Result<PathBuf> {
        let series_dir = root.join(series_id.dir_name());
        fs::create_dir_all(&series_dir)?;
        let file_name = path
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
        let target = series_dir.join(file_name);
        // copying a file onto itself truncates it
        if target.exists() && fs::canonicalize(&target)? == fs::canonicalize(path)? {
            debug!(path = %path.display(), "file already in its series folder");
            return Ok(target);
        }
        fs::copy(path, &target)?;
        Ok(target)
    }
}
