//! Tags of the attributes read and written by this crate.

use crate::storage::Tag;

/// SOP Class UID
pub const SOP_CLASS_UID: Tag = Tag::new(0x0008, 0x0016);
/// SOP Instance UID
pub const SOP_INSTANCE_UID: Tag = Tag::new(0x0008, 0x0018);
/// Specific Character Set
pub const SPECIFIC_CHARACTER_SET: Tag = Tag::new(0x0008, 0x0005);
/// Instance Creation Date
pub const INSTANCE_CREATION_DATE: Tag = Tag::new(0x0008, 0x0012);
/// Instance Creation Time
pub const INSTANCE_CREATION_TIME: Tag = Tag::new(0x0008, 0x0013);
/// Study Date
pub const STUDY_DATE: Tag = Tag::new(0x0008, 0x0020);
/// Content Date
pub const CONTENT_DATE: Tag = Tag::new(0x0008, 0x0023);
/// Acquisition Date
pub const ACQUISITION_DATE: Tag = Tag::new(0x0008, 0x0022);
/// Study Time
pub const STUDY_TIME: Tag = Tag::new(0x0008, 0x0030);
/// Acquisition Time
pub const ACQUISITION_TIME: Tag = Tag::new(0x0008, 0x0032);
/// Content Time
pub const CONTENT_TIME: Tag = Tag::new(0x0008, 0x0033);
/// Accession Number
pub const ACCESSION_NUMBER: Tag = Tag::new(0x0008, 0x0050);
/// Modality
pub const MODALITY: Tag = Tag::new(0x0008, 0x0060);
/// Manufacturer
pub const MANUFACTURER: Tag = Tag::new(0x0008, 0x0070);
/// Referring Physician's Name
pub const REFERRING_PHYSICIAN_NAME: Tag = Tag::new(0x0008, 0x0090);
/// Code Value
pub const CODE_VALUE: Tag = Tag::new(0x0008, 0x0100);
/// Coding Scheme Designator
pub const CODING_SCHEME_DESIGNATOR: Tag = Tag::new(0x0008, 0x0102);
/// Coding Scheme Version
pub const CODING_SCHEME_VERSION: Tag = Tag::new(0x0008, 0x0103);
/// Code Meaning
pub const CODE_MEANING: Tag = Tag::new(0x0008, 0x0104);
/// Mapping Resource
pub const MAPPING_RESOURCE: Tag = Tag::new(0x0008, 0x0105);
/// Context Group Version
pub const CONTEXT_GROUP_VERSION: Tag = Tag::new(0x0008, 0x0106);
/// Context Identifier
pub const CONTEXT_IDENTIFIER: Tag = Tag::new(0x0008, 0x010F);
/// Context UID
pub const CONTEXT_UID: Tag = Tag::new(0x0008, 0x0117);
/// Mapping Resource UID
pub const MAPPING_RESOURCE_UID: Tag = Tag::new(0x0008, 0x0118);
/// Station Name
pub const STATION_NAME: Tag = Tag::new(0x0008, 0x1010);
/// Study Description
pub const STUDY_DESCRIPTION: Tag = Tag::new(0x0008, 0x1030);
/// Series Description
pub const SERIES_DESCRIPTION: Tag = Tag::new(0x0008, 0x103E);
/// Manufacturer's Model Name
pub const MANUFACTURER_MODEL_NAME: Tag = Tag::new(0x0008, 0x1090);
/// Referenced SOP Class UID
pub const REFERENCED_SOP_CLASS_UID: Tag = Tag::new(0x0008, 0x1150);
/// Referenced SOP Instance UID
pub const REFERENCED_SOP_INSTANCE_UID: Tag = Tag::new(0x0008, 0x1155);
/// Referenced Frame Number
pub const REFERENCED_FRAME_NUMBER: Tag = Tag::new(0x0008, 0x1160);
/// Referenced SOP Sequence
pub const REFERENCED_SOP_SEQUENCE: Tag = Tag::new(0x0008, 0x1199);
/// Referenced Segment Number
pub const REFERENCED_SEGMENT_NUMBER: Tag = Tag::new(0x0062, 0x000B);
/// Anatomic Region Sequence
pub const ANATOMIC_REGION_SEQUENCE: Tag = Tag::new(0x0008, 0x2218);
/// Patient's Name
pub const PATIENT_NAME: Tag = Tag::new(0x0010, 0x0010);
/// Patient ID
pub const PATIENT_ID: Tag = Tag::new(0x0010, 0x0020);
/// Patient's Birth Date
pub const PATIENT_BIRTH_DATE: Tag = Tag::new(0x0010, 0x0030);
/// Patient's Sex
pub const PATIENT_SEX: Tag = Tag::new(0x0010, 0x0040);
/// Body Part Examined
pub const BODY_PART_EXAMINED: Tag = Tag::new(0x0018, 0x0015);
/// Slice Thickness
pub const SLICE_THICKNESS: Tag = Tag::new(0x0018, 0x0050);
/// Radiopharmaceutical Volume
pub const RADIOPHARMACEUTICAL_VOLUME: Tag = Tag::new(0x0018, 0x1071);
/// Radiopharmaceutical Start Time
pub const RADIOPHARMACEUTICAL_START_TIME: Tag = Tag::new(0x0018, 0x1072);
/// Radiopharmaceutical Stop Time
pub const RADIOPHARMACEUTICAL_STOP_TIME: Tag = Tag::new(0x0018, 0x1073);
/// Radionuclide Total Dose
pub const RADIONUCLIDE_TOTAL_DOSE: Tag = Tag::new(0x0018, 0x1074);
/// Radionuclide Half Life
pub const RADIONUCLIDE_HALF_LIFE: Tag = Tag::new(0x0018, 0x1075);
/// Spacing Between Slices
pub const SPACING_BETWEEN_SLICES: Tag = Tag::new(0x0018, 0x0088);
/// Device Serial Number
pub const DEVICE_SERIAL_NUMBER: Tag = Tag::new(0x0018, 0x1000);
/// Software Versions
pub const SOFTWARE_VERSIONS: Tag = Tag::new(0x0018, 0x1020);
/// Radiopharmaceutical Start DateTime
pub const RADIOPHARMACEUTICAL_START_DATE_TIME: Tag = Tag::new(0x0018, 0x1078);
/// Radiopharmaceutical Stop DateTime
pub const RADIOPHARMACEUTICAL_STOP_DATE_TIME: Tag = Tag::new(0x0018, 0x1079);
/// Imager Pixel Spacing
pub const IMAGER_PIXEL_SPACING: Tag = Tag::new(0x0018, 0x1164);
/// Positioner Primary Angle
pub const POSITIONER_PRIMARY_ANGLE: Tag = Tag::new(0x0018, 0x1510);
/// Positioner Secondary Angle
pub const POSITIONER_SECONDARY_ANGLE: Tag = Tag::new(0x0018, 0x1511);
/// View Code Sequence
pub const VIEW_CODE_SEQUENCE: Tag = Tag::new(0x0054, 0x0220);
/// View Modifier Code Sequence
pub const VIEW_MODIFIER_CODE_SEQUENCE: Tag = Tag::new(0x0054, 0x0222);
/// Sequence Name
pub const SEQUENCE_NAME: Tag = Tag::new(0x0018, 0x0024);
/// CT Acquisition Type Sequence
pub const CT_ACQUISITION_TYPE_SEQUENCE: Tag = Tag::new(0x0018, 0x9301);
/// CT Reconstruction Sequence
pub const CT_RECONSTRUCTION_SEQUENCE: Tag = Tag::new(0x0018, 0x9314);
/// Pulse Sequence Name
pub const PULSE_SEQUENCE_NAME: Tag = Tag::new(0x0018, 0x9005);
/// Acquisition Type
pub const ACQUISITION_TYPE: Tag = Tag::new(0x0018, 0x9302);
/// Reconstruction Algorithm
pub const RECONSTRUCTION_ALGORITHM: Tag = Tag::new(0x0018, 0x9315);
/// Radiopharmaceutical Specific Activity
pub const RADIOPHARMACEUTICAL_SPECIFIC_ACTIVITY: Tag = Tag::new(0x0018, 0x9701);
/// Study Instance UID
pub const STUDY_INSTANCE_UID: Tag = Tag::new(0x0020, 0x000D);
/// Series Instance UID
pub const SERIES_INSTANCE_UID: Tag = Tag::new(0x0020, 0x000E);
/// Study ID
pub const STUDY_ID: Tag = Tag::new(0x0020, 0x0010);
/// Series Number
pub const SERIES_NUMBER: Tag = Tag::new(0x0020, 0x0011);
/// Instance Number
pub const INSTANCE_NUMBER: Tag = Tag::new(0x0020, 0x0013);
/// Patient Orientation
pub const PATIENT_ORIENTATION: Tag = Tag::new(0x0020, 0x0020);
/// Image Position (Patient)
pub const IMAGE_POSITION_PATIENT: Tag = Tag::new(0x0020, 0x0032);
/// Image Orientation (Patient)
pub const IMAGE_ORIENTATION_PATIENT: Tag = Tag::new(0x0020, 0x0037);
/// Frame of Reference UID
pub const FRAME_OF_REFERENCE_UID: Tag = Tag::new(0x0020, 0x0052);
/// Position Reference Indicator
pub const POSITION_REFERENCE_INDICATOR: Tag = Tag::new(0x0020, 0x1040);
/// Image Laterality
pub const IMAGE_LATERALITY: Tag = Tag::new(0x0020, 0x0062);
/// Rows
pub const ROWS: Tag = Tag::new(0x0028, 0x0010);
/// Columns
pub const COLUMNS: Tag = Tag::new(0x0028, 0x0011);
/// Pixel Spacing
pub const PIXEL_SPACING: Tag = Tag::new(0x0028, 0x0030);
/// Real World Value Mapping Sequence
pub const REAL_WORLD_VALUE_MAPPING_SEQUENCE: Tag = Tag::new(0x0040, 0x9096);
/// Real World Value First Value Mapped
pub const REAL_WORLD_VALUE_FIRST_VALUE_MAPPED: Tag = Tag::new(0x0040, 0x9216);
/// Real World Value Last Value Mapped
pub const REAL_WORLD_VALUE_LAST_VALUE_MAPPED: Tag = Tag::new(0x0040, 0x9211);
/// Real World Value Intercept
pub const REAL_WORLD_VALUE_INTERCEPT: Tag = Tag::new(0x0040, 0x9224);
/// Real World Value Slope
pub const REAL_WORLD_VALUE_SLOPE: Tag = Tag::new(0x0040, 0x9225);
/// Real World Value LUT Data
pub const REAL_WORLD_VALUE_LUT_DATA: Tag = Tag::new(0x0040, 0x9212);
/// LUT Explanation
pub const LUT_EXPLANATION: Tag = Tag::new(0x0028, 0x3003);
/// LUT Label
pub const LUT_LABEL: Tag = Tag::new(0x0040, 0x9210);
/// Measurement Units Code Sequence
pub const MEASUREMENT_UNITS_CODE_SEQUENCE: Tag = Tag::new(0x0040, 0x08EA);
/// Radiopharmaceutical Information Sequence
pub const RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE: Tag = Tag::new(0x0054, 0x0016);
/// Radionuclide Code Sequence
pub const RADIONUCLIDE_CODE_SEQUENCE: Tag = Tag::new(0x0054, 0x0300);
/// Administration Route Code Sequence
pub const ADMINISTRATION_ROUTE_CODE_SEQUENCE: Tag = Tag::new(0x0054, 0x0302);
/// Radiopharmaceutical Code Sequence
pub const RADIOPHARMACEUTICAL_CODE_SEQUENCE: Tag = Tag::new(0x0054, 0x0304);
/// Observation DateTime
pub const OBSERVATION_DATE_TIME: Tag = Tag::new(0x0040, 0xA032);
/// Relationship Type
pub const RELATIONSHIP_TYPE: Tag = Tag::new(0x0040, 0xA010);
/// Verifying Observer Sequence
pub const VERIFYING_OBSERVER_SEQUENCE: Tag = Tag::new(0x0040, 0xA073);
/// Value Type
pub const VALUE_TYPE: Tag = Tag::new(0x0040, 0xA040);
/// Concept Name Code Sequence
pub const CONCEPT_NAME_CODE_SEQUENCE: Tag = Tag::new(0x0040, 0xA043);
/// Continuity Of Content
pub const CONTINUITY_OF_CONTENT: Tag = Tag::new(0x0040, 0xA050);
/// DateTime
pub const DATE_TIME: Tag = Tag::new(0x0040, 0xA120);
/// Date
pub const DATE: Tag = Tag::new(0x0040, 0xA121);
/// Time
pub const TIME: Tag = Tag::new(0x0040, 0xA122);
/// Person Name
pub const PERSON_NAME: Tag = Tag::new(0x0040, 0xA123);
/// UID
pub const UID: Tag = Tag::new(0x0040, 0xA124);
/// Text Value
pub const TEXT_VALUE: Tag = Tag::new(0x0040, 0xA160);
/// Concept Code Sequence
pub const CONCEPT_CODE_SEQUENCE: Tag = Tag::new(0x0040, 0xA168);
/// Referenced Waveform Channels
pub const REFERENCED_WAVEFORM_CHANNELS: Tag = Tag::new(0x0040, 0xA0B0);
/// Completion Flag
pub const COMPLETION_FLAG: Tag = Tag::new(0x0040, 0xA491);
/// Verification Flag
pub const VERIFICATION_FLAG: Tag = Tag::new(0x0040, 0xA493);
/// Measured Value Sequence
pub const MEASURED_VALUE_SEQUENCE: Tag = Tag::new(0x0040, 0xA300);
/// Numeric Value Qualifier Code Sequence
pub const NUMERIC_VALUE_QUALIFIER_CODE_SEQUENCE: Tag = Tag::new(0x0040, 0xA301);
/// Numeric Value
pub const NUMERIC_VALUE: Tag = Tag::new(0x0040, 0xA30A);
/// Content Template Sequence
pub const CONTENT_TEMPLATE_SEQUENCE: Tag = Tag::new(0x0040, 0xA504);
/// Content Sequence
pub const CONTENT_SEQUENCE: Tag = Tag::new(0x0040, 0xA730);
/// Template Identifier
pub const TEMPLATE_IDENTIFIER: Tag = Tag::new(0x0040, 0xDB00);
/// Referenced Content Item Identifier
pub const REFERENCED_CONTENT_ITEM_IDENTIFIER: Tag = Tag::new(0x0040, 0xDB73);
/// MAC Parameters Sequence
pub const MAC_PARAMETERS_SEQUENCE: Tag = Tag::new(0x4FFE, 0x0001);
/// Digital Signatures Sequence
pub const DIGITAL_SIGNATURES_SEQUENCE: Tag = Tag::new(0xFFFA, 0xFFFA);
/// Series Date
pub const SERIES_DATE: Tag = Tag::new(0x0008, 0x0021);
/// Series Time
pub const SERIES_TIME: Tag = Tag::new(0x0008, 0x0031);
/// Institution Name
pub const INSTITUTION_NAME: Tag = Tag::new(0x0008, 0x0080);
/// Verifying Organization
pub const VERIFYING_ORGANIZATION: Tag = Tag::new(0x0040, 0xA027);
/// Verification Date Time
pub const VERIFICATION_DATE_TIME: Tag = Tag::new(0x0040, 0xA030);
/// Verifying Observer Name
pub const VERIFYING_OBSERVER_NAME: Tag = Tag::new(0x0040, 0xA075);
/// Completion Flag Description
pub const COMPLETION_FLAG_DESCRIPTION: Tag = Tag::new(0x0040, 0xA492);
/// Preliminary Flag
pub const PRELIMINARY_FLAG: Tag = Tag::new(0x0040, 0xA496);
