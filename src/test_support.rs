//! Minimal DICOM writer for unit tests, with knobs for malformed files.

use crate::pixel_buffer::PixelBuffer;

use dicom::{
    core::{DataElement, PrimitiveValue, VR},
    object::{FileMetaTableBuilder, InMemDicomObject},
    transfer_syntax::entries::EXPLICIT_VR_LITTLE_ENDIAN,
};
use dicom_dictionary_std::tags;
use ndarray::Array2;
use std::path::Path;

const SECONDARY_CAPTURE: &str = "1.2.840.10008.5.1.4.1.1.7";
const INSTANCE_UID: &str = "1.2.826.0.1.3680043.9.7.1";

pub(crate) struct SyntheticImage {
    pub series_number: Option<i64>,
    pub instance_number: i64,
    pub pixels: PixelBuffer,
    pub number_of_frames: Option<u32>,
    pub payload_override: Option<Vec<u8>>,
}

impl SyntheticImage {
    pub fn u8(series: i64, instance: i64, data: Array2<u8>) -> Self {
        Self::with_pixels(series, instance, PixelBuffer::U8(data))
    }

    pub fn u16(series: i64, instance: i64, data: Array2<u16>) -> Self {
        Self::with_pixels(series, instance, PixelBuffer::U16(data))
    }

    fn with_pixels(series: i64, instance: i64, pixels: PixelBuffer) -> Self {
        Self {
            series_number: Some(series),
            instance_number: instance,
            pixels,
            number_of_frames: None,
            payload_override: None,
        }
    }
}

pub(crate) fn write_dicom(path: &Path, image: &SyntheticImage) {
    let (rows, columns) = image.pixels.dim();
    let (bits, vr) = match image.pixels {
        PixelBuffer::U8(_) => (8u16, VR::OB),
        _ => (16, VR::OW),
    };
    let representation = u16::from(matches!(image.pixels, PixelBuffer::I16(_)));

    let mut obj = InMemDicomObject::new_empty();
    let mut strings = vec![
        (tags::SOP_CLASS_UID, VR::UI, SECONDARY_CAPTURE.to_string()),
        (tags::SOP_INSTANCE_UID, VR::UI, INSTANCE_UID.to_string()),
        (tags::INSTANCE_NUMBER, VR::IS, image.instance_number.to_string()),
    ];
    strings.extend(image.series_number.map(|s| (tags::SERIES_NUMBER, VR::IS, s.to_string())));
    strings.extend(image.number_of_frames.map(|n| (tags::NUMBER_OF_FRAMES, VR::IS, n.to_string())));
    for (tag, vr, value) in strings {
        obj.put(DataElement::new(tag, vr, PrimitiveValue::from(value.as_str())));
    }
    for (tag, value) in [
        (tags::SAMPLES_PER_PIXEL, 1),
        (tags::ROWS, rows as u16),
        (tags::COLUMNS, columns as u16),
        (tags::BITS_ALLOCATED, bits),
        (tags::BITS_STORED, bits),
        (tags::HIGH_BIT, bits - 1),
        (tags::PIXEL_REPRESENTATION, representation),
    ] {
        obj.put(DataElement::new(tag, VR::US, PrimitiveValue::from(value)));
    }

    let mut payload = image.payload_override.clone().unwrap_or_else(|| image.pixels.to_le_bytes());
    if payload.len() % 2 == 1 {
        payload.push(0);
    }
    obj.put(DataElement::new(tags::PIXEL_DATA, vr, PrimitiveValue::from(payload)));

    obj.with_meta(
        FileMetaTableBuilder::new()
            .transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN.uid())
            .media_storage_sop_class_uid(SECONDARY_CAPTURE)
            .media_storage_sop_instance_uid(INSTANCE_UID),
    )
    .expect("should have built file meta group")
    .write_to_file(path)
    .expect("should have written synthetic DICOM file");
}
