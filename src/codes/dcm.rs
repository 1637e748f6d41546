use crate::domain::BasicCode;

const fn dcm(value: &'static str, meaning: &'static str) -> BasicCode {
    BasicCode::new(value, "DCM", meaning)
}

/// (110901, DCM, "Image Position (Patient) X")
pub const IMAGE_POSITION_PATIENT_X: BasicCode = dcm("110901", "Image Position (Patient) X");
/// (110902, DCM, "Image Position (Patient) Y")
pub const IMAGE_POSITION_PATIENT_Y: BasicCode = dcm("110902", "Image Position (Patient) Y");
/// (110903, DCM, "Image Position (Patient) Z")
pub const IMAGE_POSITION_PATIENT_Z: BasicCode = dcm("110903", "Image Position (Patient) Z");
/// (110904, DCM, "Image Orientation (Patient) Row X")
pub const IMAGE_ORIENTATION_PATIENT_ROW_X: BasicCode =
    dcm("110904", "Image Orientation (Patient) Row X");
/// (110905, DCM, "Image Orientation (Patient) Row Y")
pub const IMAGE_ORIENTATION_PATIENT_ROW_Y: BasicCode =
    dcm("110905", "Image Orientation (Patient) Row Y");
/// (110906, DCM, "Image Orientation (Patient) Row Z")
pub const IMAGE_ORIENTATION_PATIENT_ROW_Z: BasicCode =
    dcm("110906", "Image Orientation (Patient) Row Z");
/// (110907, DCM, "Image Orientation (Patient) Column X")
pub const IMAGE_ORIENTATION_PATIENT_COLUMN_X: BasicCode =
    dcm("110907", "Image Orientation (Patient) Column X");
/// (110908, DCM, "Image Orientation (Patient) Column Y")
pub const IMAGE_ORIENTATION_PATIENT_COLUMN_Y: BasicCode =
    dcm("110908", "Image Orientation (Patient) Column Y");
/// (110909, DCM, "Image Orientation (Patient) Column Z")
pub const IMAGE_ORIENTATION_PATIENT_COLUMN_Z: BasicCode =
    dcm("110909", "Image Orientation (Patient) Column Z");
/// (110909, DCM, "Pulse Sequence Name")
///
/// TID 1606 uses this code value although it collides with
/// [`IMAGE_ORIENTATION_PATIENT_COLUMN_Z`].
pub const PULSE_SEQUENCE_NAME: BasicCode = dcm("110909", "Pulse Sequence Name");
/// (110910, DCM, "Pixel Data Rows")
pub const PIXEL_DATA_ROWS: BasicCode = dcm("110910", "Pixel Data Rows");
/// (110911, DCM, "Pixel Data Columns")
pub const PIXEL_DATA_COLUMNS: BasicCode = dcm("110911", "Pixel Data Columns");
/// (111018, DCM, "Content Date")
pub const CONTENT_DATE: BasicCode = dcm("111018", "Content Date");
/// (111019, DCM, "Content Time")
pub const CONTENT_TIME: BasicCode = dcm("111019", "Content Time");
/// (111026, DCM, "Horizontal Pixel Spacing")
pub const HORIZONTAL_PIXEL_SPACING: BasicCode = dcm("111026", "Horizontal Pixel Spacing");
/// (111027, DCM, "Image Laterality")
pub const IMAGE_LATERALITY: BasicCode = dcm("111027", "Image Laterality");
/// (111028, DCM, "Image Library")
pub const IMAGE_LIBRARY: BasicCode = dcm("111028", "Image Library");
/// (111031, DCM, "Image View")
pub const IMAGE_VIEW: BasicCode = dcm("111031", "Image View");
/// (111032, DCM, "Image View Modifier")
pub const IMAGE_VIEW_MODIFIER: BasicCode = dcm("111032", "Image View Modifier");
/// (111043, DCM, "Patient Orientation Column")
pub const PATIENT_ORIENTATION_COLUMN: BasicCode = dcm("111043", "Patient Orientation Column");
/// (111044, DCM, "Patient Orientation Row")
pub const PATIENT_ORIENTATION_ROW: BasicCode = dcm("111044", "Patient Orientation Row");
/// (111060, DCM, "Study Date")
pub const STUDY_DATE: BasicCode = dcm("111060", "Study Date");
/// (111061, DCM, "Study Time")
pub const STUDY_TIME: BasicCode = dcm("111061", "Study Time");
/// (111066, DCM, "Vertical Pixel Spacing")
pub const VERTICAL_PIXEL_SPACING: BasicCode = dcm("111066", "Vertical Pixel Spacing");
/// (112011, DCM, "Positioner Primary Angle")
pub const POSITIONER_PRIMARY_ANGLE: BasicCode = dcm("112011", "Positioner Primary Angle");
/// (112012, DCM, "Positioner Secondary Angle")
pub const POSITIONER_SECONDARY_ANGLE: BasicCode = dcm("112012", "Positioner Secondary Angle");
/// (112225, DCM, "Slice Thickness")
pub const SLICE_THICKNESS: BasicCode = dcm("112225", "Slice Thickness");
/// (112226, DCM, "Spacing between slices")
pub const SPACING_BETWEEN_SLICES: BasicCode = dcm("112226", "Spacing between slices");
/// (112227, DCM, "Frame of Reference UID")
pub const FRAME_OF_REFERENCE_UID: BasicCode = dcm("112227", "Frame of Reference UID");
/// (113820, DCM, "CT Acquisition Type")
pub const CT_ACQUISITION_TYPE: BasicCode = dcm("113820", "CT Acquisition Type");
/// (113961, DCM, "Reconstruction Algorithm")
pub const RECONSTRUCTION_ALGORITHM: BasicCode = dcm("113961", "Reconstruction Algorithm");
/// (121046, DCM, "Country of Language")
pub const COUNTRY_OF_LANGUAGE: BasicCode = dcm("121046", "Country of Language");
/// (121049, DCM, "Language of Content Item and Descendants")
pub const LANGUAGE_OF_CONTENT_ITEM_AND_DESCENDANTS: BasicCode =
    dcm("121049", "Language of Content Item and Descendants");
/// (121139, DCM, "Modality")
pub const MODALITY: BasicCode = dcm("121139", "Modality");
/// (122272, DCM, "Radiopharmaceutical Specific Activity")
pub const RADIOPHARMACEUTICAL_SPECIFIC_ACTIVITY: BasicCode =
    dcm("122272", "Radiopharmaceutical Specific Activity");
/// (123003, DCM, "Radiopharmaceutical Start Time")
pub const RADIOPHARMACEUTICAL_START_TIME: BasicCode =
    dcm("123003", "Radiopharmaceutical Start Time");
/// (123004, DCM, "Radiopharmaceutical Stop Time")
pub const RADIOPHARMACEUTICAL_STOP_TIME: BasicCode =
    dcm("123004", "Radiopharmaceutical Stop Time");
/// (123005, DCM, "Radiopharmaceutical Volume")
pub const RADIOPHARMACEUTICAL_VOLUME: BasicCode = dcm("123005", "Radiopharmaceutical Volume");
/// (123006, DCM, "Radionuclide Total Dose")
pub const RADIONUCLIDE_TOTAL_DOSE: BasicCode = dcm("123006", "Radionuclide Total Dose");
/// (123014, DCM, "Target Region")
pub const TARGET_REGION: BasicCode = dcm("123014", "Target Region");
/// (126200, DCM, "Image Library Group")
pub const IMAGE_LIBRARY_GROUP: BasicCode = dcm("126200", "Image Library Group");
/// (126201, DCM, "Acquisition Date")
pub const ACQUISITION_DATE: BasicCode = dcm("126201", "Acquisition Date");
/// (126202, DCM, "Acquisition Time")
pub const ACQUISITION_TIME: BasicCode = dcm("126202", "Acquisition Time");
