use std::path::{Path, PathBuf};

/// Options for a [`Session`](crate::session::Session).
///
/// ```
/// # use dicom_series_crop::config::SessionConfig;
/// let config = SessionConfig::new()
///     .with_output_root("out")
///     .with_mirror_series(false);
/// assert_eq!(config.cropped_dir_name(), "recortadas");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    output_root: PathBuf,
    mirror_series: bool,
    cropped_dir_name: String,
    thumbnail_size: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("dicom_series_organizadas"),
            mirror_series: true,
            cropped_dir_name: "recortadas".to_string(),
            thumbnail_size: 150,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root under which `Serie_<id>/` directories are created
    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = output_root.into();
        self
    }

    /// Copy every organized file into its `Serie_<id>/` directory
    pub fn with_mirror_series(mut self, mirror_series: bool) -> Self {
        self.mirror_series = mirror_series;
        self
    }

    pub fn with_cropped_dir_name(mut self, name: impl Into<String>) -> Self {
        self.cropped_dir_name = name.into();
        self
    }

    pub fn with_thumbnail_size(mut self, size: u32) -> Self {
        self.thumbnail_size = size;
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn mirror_series(&self) -> bool {
        self.mirror_series
    }

    pub fn cropped_dir_name(&self) -> &str {
        &self.cropped_dir_name
    }

    pub fn thumbnail_size(&self) -> u32 {
        self.thumbnail_size
    }
}
