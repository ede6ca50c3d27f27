use crate::{
    container::{DecodeError, ImageContainer},
    series_organizer::SeriesEntry,
};

use image::GrayImage;
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};
use tracing::warn;

/// A decoded, resized image ready for a grid slot.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub slot: usize,
    pub caption: String,
    pub path: PathBuf,
    pub image: GrayImage,
}

/// Thumbnails of the view currently on screen, keyed by display slot.
///
/// Loading a new view drops everything from the previous one.
#[derive(Debug, Default)]
pub struct ThumbnailCache {
    slots: BTreeMap<usize, Thumbnail>,
}

impl ThumbnailCache {
    pub fn load_view(&mut self, thumbnails: Vec<Thumbnail>) {
        self.slots = thumbnails
            .into_iter()
            .map(|thumbnail| (thumbnail.slot, thumbnail))
            .collect();
    }

    pub fn get(&self, slot: usize) -> Option<&Thumbnail> {
        self.slots.get(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Thumbnail> {
        self.slots.values()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

fn render(path: &Path, size: u32) -> Result<GrayImage, DecodeError> {
    let buffer = ImageContainer::load(path)?.pixel_buffer()?;
    buffer
        .to_thumbnail(size)
        .ok_or_else(|| DecodeError::UnsupportedEncoding("image too large to render".to_string()))
}

fn collect_thumbnails<'a>(
    sources: impl IntoIterator<Item = (String, &'a Path)>,
    size: u32,
) -> Vec<Thumbnail> {
    sources
        .into_iter()
        .enumerate()
        .filter_map(|(slot, (caption, path))| match render(path, size) {
            Ok(image) => Some(Thumbnail {
                slot,
                caption,
                path: path.to_path_buf(),
                image,
            }),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not render thumbnail");
                None
            }
        })
        .collect()
}

/// Thumbnails of a series, captioned with the instance number
pub fn series_thumbnails(files: &[SeriesEntry], size: u32) -> Vec<Thumbnail> {
    collect_thumbnails(
        files
            .iter()
            .map(|entry| (format!("Instancia {}", entry.instance_id), entry.path.as_path())),
        size,
    )
}

/// Thumbnails of every readable file in `folder`, captioned by position
pub fn folder_thumbnails(folder: impl AsRef<Path>, size: u32) -> io::Result<Vec<Thumbnail>> {
    let mut paths: Vec<_> = fs::read_dir(folder.as_ref())?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    Ok(collect_thumbnails(
        paths
            .iter()
            .enumerate()
            .map(|(i, path)| (format!("Archivo {}", i + 1), path.as_path())),
        size,
    ))
}
