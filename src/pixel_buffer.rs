use crate::enums::SampleFormat;

use image::{GrayImage, ImageBuffer, imageops::FilterType};
use ndarray::{Array2, ShapeError};
use rayon::prelude::*;

/// Decoded view of a pixel payload, shaped `(rows, columns)`.
///
/// The variant carries the sample type, so every transform that maps a
/// variant onto itself preserves the dtype of the source container.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBuffer {
    U8(Array2<u8>),
    U16(Array2<u16>),
    I16(Array2<i16>),
}

impl PixelBuffer {
    /// Build a buffer from a little-endian payload.
    ///
    /// Only the first `rows * columns` samples are used, trailing padding is
    /// ignored.
    pub fn from_le_bytes(
        format: SampleFormat,
        rows: usize,
        columns: usize,
        bytes: &[u8],
    ) -> Result<Self, ShapeError> {
        let len = rows * columns;
        let bytes = &bytes[..bytes.len().min(len * format.bytes_per_sample())];
        Ok(match format {
            SampleFormat::U8 => PixelBuffer::U8(Array2::from_shape_vec((rows, columns), bytes.to_vec())?),
            SampleFormat::U16 => {
                let samples = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                PixelBuffer::U16(Array2::from_shape_vec((rows, columns), samples)?)
            }
            SampleFormat::I16 => {
                let samples = bytes
                    .chunks_exact(2)
                    .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                PixelBuffer::I16(Array2::from_shape_vec((rows, columns), samples)?)
            }
        })
    }

    /// Serialize the samples in row-major order, little-endian
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            PixelBuffer::U8(data) => data.iter().copied().collect(),
            PixelBuffer::U16(data) => data.iter().flat_map(|v| v.to_le_bytes()).collect(),
            PixelBuffer::I16(data) => data.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }

    /// Get the dimensions of the buffer (rows, columns)
    pub fn dim(&self) -> (usize, usize) {
        match self {
            PixelBuffer::U8(data) => data.dim(),
            PixelBuffer::U16(data) => data.dim(),
            PixelBuffer::I16(data) => data.dim(),
        }
    }

    pub fn sample_format(&self) -> SampleFormat {
        match self {
            PixelBuffer::U8(_) => SampleFormat::U8,
            PixelBuffer::U16(_) => SampleFormat::U16,
            PixelBuffer::I16(_) => SampleFormat::I16,
        }
    }

    /// Render to 8-bit grayscale, stretching the buffer's own min..max range
    pub fn to_image(&self) -> Option<GrayImage> {
        match self {
            PixelBuffer::U8(data) => Self::window_to_image(data),
            PixelBuffer::U16(data) => Self::window_to_image(data),
            PixelBuffer::I16(data) => Self::window_to_image(data),
        }
    }

    /// Square thumbnail of `size` pixels per side
    pub fn to_thumbnail(&self, size: u32) -> Option<GrayImage> {
        let image = self.to_image()?;
        if image.width() == 0 || image.height() == 0 {
            return Some(GrayImage::new(size, size));
        }
        Some(image::imageops::resize(&image, size, size, FilterType::Triangle))
    }

    #[inline]
    fn normalize_to_u8(value: f32, min: f32, range: f32) -> u8 {
        if range <= 0.0 {
            return 0;
        }
        (((value - min) / range) * 255.0).clamp(0.0, 255.0) as u8
    }

    fn window_to_image<T>(data: &Array2<T>) -> Option<GrayImage>
    where
        T: Copy + Into<f32> + Sync,
    {
        let (height, width) = data.dim();
        let (min, max) = data.iter().fold((f32::MAX, f32::MIN), |(lo, hi), &v| {
            let v: f32 = v.into();
            (lo.min(v), hi.max(v))
        });
        let range = max - min;
        let pixel_data: Vec<u8> = data
            .par_iter()
            .map(|&v| Self::normalize_to_u8(v.into(), min, range))
            .collect();
        ImageBuffer::from_raw(width as u32, height as u32, pixel_data)
    }
}
