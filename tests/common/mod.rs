use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use dicom::{
    core::{DataElement, PrimitiveValue, VR},
    object::{FileMetaTableBuilder, InMemDicomObject},
    transfer_syntax::entries::EXPLICIT_VR_LITTLE_ENDIAN,
};
use dicom_dictionary_std::tags;
use dicom_series_crop::PixelBuffer;

const CT_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.2";

static NEXT_UID: AtomicU32 = AtomicU32::new(1);

/// Write a single-frame CT-like file with a handful of extra attributes
pub fn write_image(path: &Path, series: &str, instance: &str, pixels: &PixelBuffer) {
    let (rows, columns) = pixels.dim();
    let (bits, representation, vr) = match pixels {
        PixelBuffer::U8(_) => (8u16, 0u16, VR::OB),
        PixelBuffer::U16(_) => (16, 0, VR::OW),
        PixelBuffer::I16(_) => (16, 1, VR::OW),
    };
    let uid = format!("2.25.4242.{}", NEXT_UID.fetch_add(1, Ordering::Relaxed));

    let mut obj = InMemDicomObject::new_empty();
    obj.put(DataElement::new(tags::SOP_CLASS_UID, VR::UI, PrimitiveValue::from(CT_IMAGE_STORAGE)));
    obj.put(DataElement::new(tags::SOP_INSTANCE_UID, VR::UI, PrimitiveValue::from(uid.as_str())));
    obj.put(DataElement::new(tags::STUDY_DATE, VR::DA, PrimitiveValue::from("20240131")));
    obj.put(DataElement::new(tags::MODALITY, VR::CS, PrimitiveValue::from("CT")));
    obj.put(DataElement::new(tags::PATIENT_NAME, VR::PN, PrimitiveValue::from("Perez^Ana")));
    obj.put(DataElement::new(tags::PATIENT_ID, VR::LO, PrimitiveValue::from("P-0001")));
    obj.put(DataElement::new(tags::SLICE_THICKNESS, VR::DS, PrimitiveValue::from("2.5")));
    obj.put(DataElement::new(tags::SERIES_NUMBER, VR::IS, PrimitiveValue::from(series)));
    obj.put(DataElement::new(tags::INSTANCE_NUMBER, VR::IS, PrimitiveValue::from(instance)));
    obj.put(DataElement::new(tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1u16)));
    obj.put(DataElement::new(
        tags::PHOTOMETRIC_INTERPRETATION,
        VR::CS,
        PrimitiveValue::from("MONOCHROME2"),
    ));
    obj.put(DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(rows as u16)));
    obj.put(DataElement::new(tags::COLUMNS, VR::US, PrimitiveValue::from(columns as u16)));
    obj.put(DataElement::new(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(bits)));
    obj.put(DataElement::new(tags::BITS_STORED, VR::US, PrimitiveValue::from(bits)));
    obj.put(DataElement::new(tags::HIGH_BIT, VR::US, PrimitiveValue::from(bits - 1)));
    obj.put(DataElement::new(
        tags::PIXEL_REPRESENTATION,
        VR::US,
        PrimitiveValue::from(representation),
    ));
    let mut payload = pixels.to_le_bytes();
    if payload.len() % 2 == 1 {
        payload.push(0);
    }
    obj.put(DataElement::new(tags::PIXEL_DATA, vr, PrimitiveValue::from(payload)));

    obj.with_meta(
        FileMetaTableBuilder::new()
            .transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN.uid())
            .media_storage_sop_class_uid(CT_IMAGE_STORAGE)
            .media_storage_sop_instance_uid(uid.as_str()),
    )
    .expect("build file meta")
    .write_to_file(path)
    .expect("write dicom file");
}
