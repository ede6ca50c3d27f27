use crate::{
    config::SessionConfig,
    container::{DecodeError, ImageContainer},
    crop_batch::{BatchReport, SeriesCropBatch},
    cropper::CropRectangle,
    enums::SeriesId,
    pixel_buffer::PixelBuffer,
    preview::{self, Thumbnail},
    series_organizer::{OrganizeError, ScanReport, SeriesEntry, SeriesOrganizer},
};

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Series {0} is not in the current index")]
    SeriesNotFound(SeriesId),

    #[error(transparent)]
    Organize(#[from] OrganizeError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Operations offered to a viewer front end.
///
/// The session owns the series index; [`Session::organize`] needs `&mut self`,
/// so only one caller can rebuild it at a time.
pub struct Session {
    config: SessionConfig,
    organizer: SeriesOrganizer,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let mirror_root = config
            .mirror_series()
            .then(|| config.output_root().to_path_buf());
        Self {
            organizer: SeriesOrganizer::new(mirror_root),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Scan `folder` and replace the current index
    pub fn organize(&mut self, folder: impl AsRef<Path>) -> Result<ScanReport, SessionError> {
        Ok(self.organizer.organize(folder)?)
    }

    pub fn list_series(&self) -> Vec<(SeriesId, usize)> {
        self.organizer.list_series()
    }

    pub fn files_for(&self, series_id: &SeriesId) -> Result<&[SeriesEntry], SessionError> {
        self.organizer
            .files_for(series_id)
            .ok_or_else(|| SessionError::SeriesNotFound(series_id.clone()))
    }

    pub fn representative(&self, series_id: &SeriesId) -> Result<&SeriesEntry, SessionError> {
        self.organizer
            .representative(series_id)
            .ok_or_else(|| SessionError::SeriesNotFound(series_id.clone()))
    }

    pub fn load_preview(&self, path: impl AsRef<Path>) -> Result<PixelBuffer, SessionError> {
        Ok(ImageContainer::load(path)?.pixel_buffer()?)
    }

    /// Default destination for cropped files, `<root>/Serie_<id>/recortadas`
    pub fn cropped_folder(&self, series_id: &SeriesId) -> PathBuf {
        self.config
            .output_root()
            .join(series_id.dir_name())
            .join(self.config.cropped_dir_name())
    }

    /// Apply `rect` to every file of a series
    pub fn crop_series(
        &self,
        series_id: &SeriesId,
        rect: CropRectangle,
        output_folder: Option<&Path>,
    ) -> Result<BatchReport, SessionError> {
        let files = self.files_for(series_id)?;
        let output_folder = output_folder
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cropped_folder(series_id));
        Ok(SeriesCropBatch::apply(files, rect, output_folder)?)
    }

    pub fn series_thumbnails(&self, series_id: &SeriesId) -> Result<Vec<Thumbnail>, SessionError> {
        let files = self.files_for(series_id)?;
        Ok(preview::series_thumbnails(files, self.config.thumbnail_size()))
    }

    pub fn folder_thumbnails(&self, folder: impl AsRef<Path>) -> Result<Vec<Thumbnail>, SessionError> {
        Ok(preview::folder_thumbnails(folder, self.config.thumbnail_size())?)
    }
}
