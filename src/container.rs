use crate::{
    enums::{SampleFormat, SeriesId},
    pixel_buffer::PixelBuffer,
};

use dicom::{
    core::{DataElement, PrimitiveValue, Tag, VR, value::Value},
    object::{FileDicomObject, InMemDicomObject, open_file},
    transfer_syntax::entries::EXPLICIT_VR_BIG_ENDIAN,
};
use dicom_dictionary_std::tags;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::object::ReadError),

    #[error("Missing or unreadable attribute {0}")]
    MissingAttribute(&'static str),

    #[error("Unsupported pixel encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Pixel payload holds {actual} bytes, expected at least {expected}")]
    PayloadLength { expected: usize, actual: usize },

    #[error("Invalid pixel buffer shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Buffer samples are {actual:?} but the container declares {declared:?}")]
    SampleFormatMismatch {
        declared: SampleFormat,
        actual: SampleFormat,
    },

    #[error("Buffer of {rows}x{columns} does not fit in Rows/Columns")]
    DimensionsTooLarge { rows: usize, columns: usize },

    #[error("Container pixel description is unusable: {0}")]
    Declared(#[from] DecodeError),

    #[error("DICOM error: {0}")]
    Write(#[from] dicom::object::WriteError),
}

/// One DICOM file held in memory.
///
/// Every attribute is kept as read; only Rows, Columns and PixelData are
/// ever rewritten, and always together through [`ImageContainer::replace_pixels`].
pub struct ImageContainer {
    object: FileDicomObject<InMemDicomObject>,
}

impl ImageContainer {
    /// Read a DICOM file from disk
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Dicom`] if the file is missing, unreadable or
    /// not a DICOM Part 10 file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        let object = open_file(path.as_ref())?;
        Ok(Self { object })
    }

    pub fn from_object(object: FileDicomObject<InMemDicomObject>) -> Self {
        Self { object }
    }

    /// Read-only access to the full attribute set
    pub fn object(&self) -> &FileDicomObject<InMemDicomObject> {
        &self.object
    }

    pub fn series_id(&self) -> Result<SeriesId, DecodeError> {
        self.string_attribute(tags::SERIES_NUMBER)
            .as_deref()
            .and_then(SeriesId::parse)
            .ok_or(DecodeError::MissingAttribute("SeriesNumber"))
    }

    pub fn instance_id(&self) -> Result<i64, DecodeError> {
        self.string_attribute(tags::INSTANCE_NUMBER)
            .and_then(|raw| raw.trim_matches(|c: char| c.is_whitespace() || c == '\0').parse().ok())
            .ok_or(DecodeError::MissingAttribute("InstanceNumber"))
    }

    pub fn rows(&self) -> Result<u16, DecodeError> {
        self.u16_attribute(tags::ROWS)
            .ok_or(DecodeError::MissingAttribute("Rows"))
    }

    pub fn columns(&self) -> Result<u16, DecodeError> {
        self.u16_attribute(tags::COLUMNS)
            .ok_or(DecodeError::MissingAttribute("Columns"))
    }

    pub fn sample_format(&self) -> Result<SampleFormat, DecodeError> {
        let bits_allocated = self
            .u16_attribute(tags::BITS_ALLOCATED)
            .ok_or(DecodeError::MissingAttribute("BitsAllocated"))?;
        let pixel_representation = self.u16_attribute(tags::PIXEL_REPRESENTATION).unwrap_or(0);
        SampleFormat::from_attributes(bits_allocated, pixel_representation).ok_or_else(|| {
            DecodeError::UnsupportedEncoding(format!(
                "BitsAllocated {bits_allocated} with PixelRepresentation {pixel_representation}"
            ))
        })
    }

    /// Decode PixelData into a `(rows, columns)` buffer
    ///
    /// # Errors
    ///
    /// Returns error for compressed, big-endian, multi-frame or multi-channel
    /// data, and for payloads shorter than the declared dimensions
    pub fn pixel_buffer(&self) -> Result<PixelBuffer, DecodeError> {
        self.check_native_encoding()?;
        let format = self.sample_format()?;
        let rows = self.rows()? as usize;
        let columns = self.columns()? as usize;

        let element = self
            .object
            .element(tags::PIXEL_DATA)
            .map_err(|_| DecodeError::MissingAttribute("PixelData"))?;
        if let Value::PixelSequence(_) = element.value() {
            return Err(DecodeError::UnsupportedEncoding(
                "encapsulated pixel data".to_string(),
            ));
        }
        let bytes = element
            .to_bytes()
            .map_err(|e| DecodeError::UnsupportedEncoding(e.to_string()))?;

        let expected = rows * columns * format.bytes_per_sample();
        if bytes.len() < expected {
            return Err(DecodeError::PayloadLength {
                expected,
                actual: bytes.len(),
            });
        }

        Ok(PixelBuffer::from_le_bytes(format, rows, columns, &bytes)?)
    }

    /// Replace Rows, Columns and PixelData with the contents of `buffer`.
    ///
    /// Nothing is modified unless the buffer matches the declared sample
    /// format and its dimensions fit the attributes.
    pub fn replace_pixels(&mut self, buffer: &PixelBuffer) -> Result<(), EncodeError> {
        let declared = self.sample_format()?;
        let actual = buffer.sample_format();
        if declared != actual {
            return Err(EncodeError::SampleFormatMismatch { declared, actual });
        }

        let (rows, columns) = buffer.dim();
        let (Ok(rows_attr), Ok(columns_attr)) = (u16::try_from(rows), u16::try_from(columns))
        else {
            return Err(EncodeError::DimensionsTooLarge { rows, columns });
        };

        let vr = self
            .object
            .element(tags::PIXEL_DATA)
            .map(|element| element.vr())
            .unwrap_or(match declared {
                SampleFormat::U8 => VR::OB,
                SampleFormat::U16 | SampleFormat::I16 => VR::OW,
            });

        let mut payload = buffer.to_le_bytes();
        if payload.len() % 2 == 1 {
            payload.push(0);
        }

        self.object.put(DataElement::new(
            tags::ROWS,
            VR::US,
            PrimitiveValue::from(rows_attr),
        ));
        self.object.put(DataElement::new(
            tags::COLUMNS,
            VR::US,
            PrimitiveValue::from(columns_attr),
        ));
        self.object
            .put(DataElement::new(tags::PIXEL_DATA, vr, PrimitiveValue::from(payload)));
        Ok(())
    }

    /// Store `buffer` as the new pixel data and write the container to `path`
    pub fn save(&mut self, buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<(), EncodeError> {
        self.replace_pixels(buffer)?;
        self.write(path)
    }

    /// Write the container as is, with its original meta group
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), EncodeError> {
        self.object.write_to_file(path.as_ref())?;
        Ok(())
    }

    fn check_native_encoding(&self) -> Result<(), DecodeError> {
        let transfer_syntax = self.object.meta().transfer_syntax().trim_end_matches('\0');
        if transfer_syntax == EXPLICIT_VR_BIG_ENDIAN.uid() {
            return Err(DecodeError::UnsupportedEncoding(
                "big endian transfer syntax".to_string(),
            ));
        }

        let samples_per_pixel = self.u16_attribute(tags::SAMPLES_PER_PIXEL).unwrap_or(1);
        if samples_per_pixel != 1 {
            return Err(DecodeError::UnsupportedEncoding(format!(
                "{samples_per_pixel} samples per pixel"
            )));
        }

        let frames = self
            .object
            .element(tags::NUMBER_OF_FRAMES)
            .ok()
            .and_then(|element| element.to_int::<u32>().ok())
            .unwrap_or(1);
        if frames > 1 {
            return Err(DecodeError::UnsupportedEncoding(format!("{frames} frames")));
        }
        Ok(())
    }

    fn u16_attribute(&self, tag: Tag) -> Option<u16> {
        self.object.element(tag).ok()?.to_int::<u16>().ok()
    }

    fn string_attribute(&self, tag: Tag) -> Option<String> {
        Some(self.object.element(tag).ok()?.to_str().ok()?.into_owned())
    }
}
