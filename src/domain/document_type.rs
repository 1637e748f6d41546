use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{domain::ConstraintChecker, Error};

/// The kind of structured report: decides the SOP class and the relationship
/// constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DocumentType {
    /// Basic Text SR
    BasicTextSR,
    /// Enhanced SR
    EnhancedSR,
    /// Comprehensive SR
    #[default]
    ComprehensiveSR,
    /// Comprehensive 3D SR
    Comprehensive3DSR,
    /// Extensible SR
    ExtensibleSR,
    /// Procedure Log
    ProcedureLog,
    /// Mammography CAD SR
    MammographyCadSR,
    /// Key Object Selection Document
    KeyObjectSelectionDocument,
    /// Chest CAD SR
    ChestCadSR,
    /// X-Ray Radiation Dose SR
    XRayRadiationDoseSR,
    /// Radiopharmaceutical Radiation Dose SR
    RadiopharmaceuticalRadiationDoseSR,
    /// Colon CAD SR
    ColonCadSR,
    /// Implantation Plan SR Document
    ImplantationPlanSRDocument,
    /// Acquisition Context SR
    AcquisitionContextSR,
    /// Simplified Adult Echo SR
    SimplifiedAdultEchoSR,
    /// Patient Radiation Dose SR
    PatientRadiationDoseSR,
    /// Spectacle Prescription Report
    SpectaclePrescriptionReport,
    /// Macular Grid Thickness and Volume Report
    MacularGridThicknessAndVolumeReport,
}

impl DocumentType {
    /// Every supported document type.
    pub const ALL: [Self; 18] = [
        Self::BasicTextSR,
        Self::EnhancedSR,
        Self::ComprehensiveSR,
        Self::Comprehensive3DSR,
        Self::ExtensibleSR,
        Self::ProcedureLog,
        Self::MammographyCadSR,
        Self::KeyObjectSelectionDocument,
        Self::ChestCadSR,
        Self::XRayRadiationDoseSR,
        Self::RadiopharmaceuticalRadiationDoseSR,
        Self::ColonCadSR,
        Self::ImplantationPlanSRDocument,
        Self::AcquisitionContextSR,
        Self::SimplifiedAdultEchoSR,
        Self::PatientRadiationDoseSR,
        Self::SpectaclePrescriptionReport,
        Self::MacularGridThicknessAndVolumeReport,
    ];

    /// The SOP class UID of documents of this type.
    #[must_use]
    pub const fn sop_class_uid(self) -> &'static str {
        match self {
            Self::BasicTextSR => "1.2.840.10008.5.1.4.1.1.88.11",
            Self::EnhancedSR => "1.2.840.10008.5.1.4.1.1.88.22",
            Self::ComprehensiveSR => "1.2.840.10008.5.1.4.1.1.88.33",
            Self::Comprehensive3DSR => "1.2.840.10008.5.1.4.1.1.88.34",
            Self::ExtensibleSR => "1.2.840.10008.5.1.4.1.1.88.35",
            Self::ProcedureLog => "1.2.840.10008.5.1.4.1.1.88.40",
            Self::MammographyCadSR => "1.2.840.10008.5.1.4.1.1.88.50",
            Self::KeyObjectSelectionDocument => "1.2.840.10008.5.1.4.1.1.88.59",
            Self::ChestCadSR => "1.2.840.10008.5.1.4.1.1.88.65",
            Self::XRayRadiationDoseSR => "1.2.840.10008.5.1.4.1.1.88.67",
            Self::RadiopharmaceuticalRadiationDoseSR => "1.2.840.10008.5.1.4.1.1.88.68",
            Self::ColonCadSR => "1.2.840.10008.5.1.4.1.1.88.69",
            Self::ImplantationPlanSRDocument => "1.2.840.10008.5.1.4.1.1.88.70",
            Self::AcquisitionContextSR => "1.2.840.10008.5.1.4.1.1.88.71",
            Self::SimplifiedAdultEchoSR => "1.2.840.10008.5.1.4.1.1.88.72",
            Self::PatientRadiationDoseSR => "1.2.840.10008.5.1.4.1.1.88.73",
            Self::SpectaclePrescriptionReport => "1.2.840.10008.5.1.4.1.1.78.6",
            Self::MacularGridThicknessAndVolumeReport => "1.2.840.10008.5.1.4.1.1.79.1",
        }
    }

    /// Looks up a document type by SOP class UID.
    #[must_use]
    pub fn from_sop_class_uid(uid: &str) -> Option<Self> {
        let uid = uid.trim_end_matches(['\0', ' ']);
        Self::ALL
            .into_iter()
            .find(|document_type| document_type.sop_class_uid() == uid)
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BasicTextSR => "Basic Text SR",
            Self::EnhancedSR => "Enhanced SR",
            Self::ComprehensiveSR => "Comprehensive SR",
            Self::Comprehensive3DSR => "Comprehensive 3D SR",
            Self::ExtensibleSR => "Extensible SR",
            Self::ProcedureLog => "Procedure Log",
            Self::MammographyCadSR => "Mammography CAD SR",
            Self::KeyObjectSelectionDocument => "Key Object Selection Document",
            Self::ChestCadSR => "Chest CAD SR",
            Self::XRayRadiationDoseSR => "X-Ray Radiation Dose SR",
            Self::RadiopharmaceuticalRadiationDoseSR => "Radiopharmaceutical Radiation Dose SR",
            Self::ColonCadSR => "Colon CAD SR",
            Self::ImplantationPlanSRDocument => "Implantation Plan SR Document",
            Self::AcquisitionContextSR => "Acquisition Context SR",
            Self::SimplifiedAdultEchoSR => "Simplified Adult Echo SR",
            Self::PatientRadiationDoseSR => "Patient Radiation Dose SR",
            Self::SpectaclePrescriptionReport => "Spectacle Prescription Report",
            Self::MacularGridThicknessAndVolumeReport => "Macular Grid Thickness and Volume Report",
        }
    }

    /// The modality written for documents of this type.
    #[must_use]
    pub const fn modality(self) -> &'static str {
        match self {
            Self::KeyObjectSelectionDocument => "KO",
            _ => "SR",
        }
    }

    /// The relationship constraints of this type, `None` if the type is
    /// checked permissively.
    #[must_use]
    pub fn constraint_checker(self) -> Option<ConstraintChecker> {
        ConstraintChecker::for_document_type(self)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DocumentType {
    type Err = Error;

    /// Accepts the human-readable name (spaces optional, any case) or the SOP
    /// class UID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squash = |name: &str| -> String {
            name.chars()
                .filter(|c| !c.is_whitespace() && *c != '-')
                .flat_map(char::to_lowercase)
                .collect()
        };
        let wanted = squash(s);
        Self::from_sop_class_uid(s)
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|document_type| squash(document_type.name()) == wanted)
            })
            .ok_or_else(|| Error::UnsupportedValue(format!("document type '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("Comprehensive SR", DocumentType::ComprehensiveSR)]
    #[test_case("comprehensivesr", DocumentType::ComprehensiveSR)]
    #[test_case("1.2.840.10008.5.1.4.1.1.88.59", DocumentType::KeyObjectSelectionDocument)]
    #[test_case("X-Ray Radiation Dose SR", DocumentType::XRayRadiationDoseSR)]
    fn parses(input: &str, expected: DocumentType) {
        assert_eq!(input.parse::<DocumentType>().unwrap(), expected);
    }

    #[test]
    fn unknown_type_is_unsupported() {
        let err = "1.2.3.4".parse::<DocumentType>().expect_err("unknown UID");
        assert!(matches!(err, Error::UnsupportedValue(_)));
    }

    #[test]
    fn sop_class_uids_are_unique() {
        for document_type in DocumentType::ALL {
            assert_eq!(
                DocumentType::from_sop_class_uid(document_type.sop_class_uid()),
                Some(document_type)
            );
        }
    }
}
