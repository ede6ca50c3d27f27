use crate::{
    container::{DecodeError, EncodeError, ImageContainer},
    cropper::{CropRectangle, RegionCropper},
    series_organizer::SeriesEntry,
};

use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum CropFileError {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("{0} has no file name")]
    NoFileName(PathBuf),
}

#[derive(Debug)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub reason: CropFileError,
}

/// Per-file outcome of a batch crop.
///
/// `failed` is the authoritative list for retries: a file is either listed
/// there or has an entry in `outputs`.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outputs: Vec<PathBuf>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outputs.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

pub struct SeriesCropBatch;

impl SeriesCropBatch {
    /// Crop every file of a series with the same rectangle and write the
    /// results under `output_folder` with their original file names.
    ///
    /// # Errors
    ///
    /// Returns error only when `output_folder` cannot be created; per-file
    /// failures are collected in the report
    pub fn apply(
        files: &[SeriesEntry],
        rect: CropRectangle,
        output_folder: impl AsRef<Path>,
    ) -> std::io::Result<BatchReport> {
        let output_folder = output_folder.as_ref();
        fs::create_dir_all(output_folder)?;

        let report = files
            .iter()
            .fold(BatchReport::default(), |mut report, entry| {
                match Self::crop_file(&entry.path, rect, output_folder) {
                    Ok(output) => {
                        debug!(output = %output.display(), "saved cropped image");
                        report.outputs.push(output);
                    }
                    Err(reason) => {
                        warn!(path = %entry.path.display(), error = %reason, "could not crop file");
                        report.failed.push(BatchFailure {
                            path: entry.path.clone(),
                            reason,
                        });
                    }
                }
                report
            });

        info!(
            output = %output_folder.display(),
            succeeded = report.succeeded(),
            failed = report.failed_count(),
            "applied crop to series"
        );
        Ok(report)
    }

    fn crop_file(
        path: &Path,
        rect: CropRectangle,
        output_folder: &Path,
    ) -> Result<PathBuf, CropFileError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| CropFileError::NoFileName(path.to_path_buf()))?;
        let mut container = ImageContainer::load(path)?;
        let buffer = container.pixel_buffer()?;
        let cropped = RegionCropper::crop(&buffer, rect);

        let output = output_folder.join(file_name);
        container.save(&cropped, &output)?;
        Ok(output)
    }
}
