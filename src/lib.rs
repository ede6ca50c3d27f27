//! # DICOM series crop library
//!
//! This crate organizes a folder of DICOM files into series and applies one
//! manually chosen crop rectangle to every image of a series.

//!
//! It builds on the dicom-rs ecosystem. Files are grouped by SeriesNumber
//! and ordered by InstanceNumber. The operator draws a rectangle on the
//! middle image of a series and the same rectangle is cut out of every image.
//! The kept region is centered on a zero-filled canvas with the original
//! Rows/Columns, so consumers that expect fixed dimensions are unaffected.
//! Every other attribute of the files is written back untouched.
//!
//! DICOM files are assumed to have the following attributes:
//!   - Native (uncompressed) little endian pixel data
//!   - No multiframe
//!   - One sample per pixel, 8 bit unsigned or 16 bit signed/unsigned
//!
//! Files that do not fit are skipped and reported, never fatal to a scan or
//! a batch.
//!
//! # Examples
//!
//! ## Cropping a whole series
//!
//! Organize the dicom/ directory, pick the first series and apply a
//! rectangle drawn on its representative image. Results land in
//! `dicom_series_organizadas/Serie_<n>/recortadas/`.
//!
//! ```no_run
//! # use dicom_series_crop::{CropRectangle, Session, SessionConfig};
//! let mut session = Session::new(SessionConfig::default());
//! session.organize("dicom").expect("should have listed the folder");
//! let (series, _count) = session.list_series().into_iter().next().expect("no series");
//! let report = session
//!     .crop_series(&series, CropRectangle::new(40, 30, 200, 180), None)
//!     .expect("series should exist");
//! println!("{} cropped, {} failed", report.succeeded(), report.failed_count());
//! ```

pub mod config;
pub mod container;
pub mod crop_batch;
pub mod cropper;
pub mod enums;
pub mod pixel_buffer;
pub mod preview;
pub mod series_organizer;
pub mod session;
#[cfg(test)]
mod test_support;

pub use config::SessionConfig;
pub use container::{DecodeError, EncodeError, ImageContainer};
pub use crop_batch::{BatchFailure, BatchReport, SeriesCropBatch};
pub use cropper::{CropRectangle, RegionCropper};
pub use enums::{SampleFormat, SeriesId};
pub use pixel_buffer::PixelBuffer;
pub use series_organizer::{ScanReport, SeriesEntry, SeriesIndex, SeriesOrganizer};
pub use session::{Session, SessionError};
