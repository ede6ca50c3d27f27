use crate::pixel_buffer::PixelBuffer;

use ndarray::{Array2, ArrayView2, s};
use tracing::warn;

/// Rectangle as produced by a pointer drag: `(x1, y1)` at press, `(x2, y2)`
/// at release, in buffer column/row coordinates.
///
/// Corners may be given in any order and may lie outside the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRectangle {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

/// Ordered rectangle clamped to a buffer, half-open on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampedRegion {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl ClampedRegion {
    pub fn height(&self) -> usize {
        self.bottom - self.top
    }

    pub fn width(&self) -> usize {
        self.right - self.left
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }
}

impl CropRectangle {
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Order the corners and clamp them into `[0, columns] x [0, rows]`
    pub fn normalized(&self, rows: usize, columns: usize) -> ClampedRegion {
        let clamp = |value: i64, limit: usize| value.clamp(0, limit as i64) as usize;
        ClampedRegion {
            top: clamp(self.y1.min(self.y2), rows),
            left: clamp(self.x1.min(self.x2), columns),
            bottom: clamp(self.y1.max(self.y2), rows),
            right: clamp(self.x1.max(self.x2), columns),
        }
    }
}

pub struct RegionCropper;

impl RegionCropper {
    /// Keep the region under `rect` and re-center it on a zero canvas of the
    /// original dimensions.
    ///
    /// A rectangle that clamps to an empty region yields an all-zero buffer.
    pub fn crop(buffer: &PixelBuffer, rect: CropRectangle) -> PixelBuffer {
        match buffer {
            PixelBuffer::U8(data) => PixelBuffer::U8(Self::crop_array(data.view(), rect)),
            PixelBuffer::U16(data) => PixelBuffer::U16(Self::crop_array(data.view(), rect)),
            PixelBuffer::I16(data) => PixelBuffer::I16(Self::crop_array(data.view(), rect)),
        }
    }

    pub fn crop_array<T>(image: ArrayView2<'_, T>, rect: CropRectangle) -> Array2<T>
    where
        T: Clone + Default,
    {
        let (rows, columns) = image.dim();
        let region = rect.normalized(rows, columns);
        let mut padded = Array2::from_elem((rows, columns), T::default());

        if region.is_empty() {
            warn!(?rect, rows, columns, "crop rectangle is empty inside the image");
            return padded;
        }

        let sub = image.slice(s![region.top..region.bottom, region.left..region.right]);
        let start_y = (rows - region.height()) / 2;
        let start_x = (columns - region.width()) / 2;
        padded
            .slice_mut(s![
                start_y..start_y + region.height(),
                start_x..start_x + region.width()
            ])
            .assign(&sub);
        padded
    }
}
