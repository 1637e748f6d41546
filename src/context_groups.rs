//! Context groups: fixed sets of coded entries allowed for a concept.
//!
//! Each group is an enum whose members map to a code triple. The tables are
//! immutable and live for the whole process; lookups from defined terms of
//! image attributes (modality, laterality, body part, ...) go through lazily
//! built maps.

use crate::domain::{BasicCode, CodeContext, CodedEntry, DCMR};

macro_rules! context_group {
    (
        $(#[$meta:meta])*
        $name:ident: CID $identifier:literal, version $version:literal, uid $uid:literal,
        extensible $extensible:literal, $label:literal {
            $($variant:ident => ($value:literal, $scheme:literal, $meaning:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[doc = concat!("(", $value, ", ", $scheme, ", \"", $meaning, "\")")]
                $variant,
            )+
        }

        impl $crate::context_groups::ContextGroup for $name {
            const IDENTIFIER: &'static str = $identifier;
            const VERSION: &'static str = $version;
            const UID: &'static str = $uid;
            const EXTENSIBLE: bool = $extensible;
            const NAME: &'static str = $label;

            fn all() -> &'static [Self] {
                &[$(Self::$variant),+]
            }

            fn code(self) -> $crate::domain::BasicCode {
                match self {
                    $(Self::$variant => $crate::domain::BasicCode::new($value, $scheme, $meaning)),+
                }
            }
        }
    };
}

mod cid11;
pub use cid11::RouteOfAdministration;

mod cid29;
pub use cid29::AcquisitionModality;

mod cid42;
pub use cid42::NumericValueQualifier;

mod cid244;
pub use cid244::Laterality;

mod cid4031;
pub use cid4031::CommonAnatomicRegion;

mod cid5000;
pub use cid5000::Language;

mod cid5001;
pub use cid5001::Country;

mod cid10013;
pub use cid10013::CtAcquisitionType;

mod cid10033;
pub use cid10033::CtReconstructionAlgorithm;

/// A context group from the DICOM content mapping resource.
pub trait ContextGroup: Copy + Eq + 'static {
    /// Context identifier, e.g. `"29"`.
    const IDENTIFIER: &'static str;
    /// Context group version.
    const VERSION: &'static str;
    /// Context group UID.
    const UID: &'static str;
    /// Whether codes outside the group may be used for the concept.
    const EXTENSIBLE: bool;
    /// Context group name.
    const NAME: &'static str;

    /// All members in definition order.
    #[must_use]
    fn all() -> &'static [Self];

    /// The code triple of this member.
    #[must_use]
    fn code(self) -> BasicCode;

    /// Identification of the group, as written in enhanced encoding mode.
    #[must_use]
    fn context() -> CodeContext {
        CodeContext {
            identifier: Self::IDENTIFIER.to_string(),
            mapping_resource: DCMR.to_string(),
            version: Self::VERSION.to_string(),
            uid: Self::UID.to_string(),
        }
    }

    /// The coded entry of this member. In enhanced encoding mode the entry
    /// also identifies the context group.
    #[must_use]
    fn coded_entry(self, enhanced: bool) -> CodedEntry {
        let entry = CodedEntry::from(self.code());
        if enhanced {
            entry.with_context(Self::context())
        } else {
            entry
        }
    }

    /// The member denoting the same concept as `code`, if any.
    #[must_use]
    fn find(code: &CodedEntry) -> Option<Self> {
        Self::all().iter().copied().find(|member| *code == member.code())
    }

    /// Whether `code` is a member of the group.
    #[must_use]
    fn contains(code: &CodedEntry) -> bool {
        Self::find(code).is_some()
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn enhanced_entries_carry_the_group() {
        let entry = RouteOfAdministration::IntravenousRoute.coded_entry(true);
        let context = entry.context().expect("enhanced encoding sets the context");
        assert_eq!(context.identifier, "11");
        assert_eq!(context.mapping_resource, "DCMR");
        assert_eq!(context.uid, RouteOfAdministration::UID);

        assert!(RouteOfAdministration::IntravenousRoute
            .coded_entry(false)
            .context()
            .is_none());
    }

    #[test]
    fn reverse_lookup_ignores_meaning() {
        let code = CodedEntry::new("G-D101", "SRT", "intravenous");
        assert_eq!(
            RouteOfAdministration::find(&code),
            Some(RouteOfAdministration::IntravenousRoute)
        );
        assert!(!RouteOfAdministration::contains(&CodedEntry::new("G-D101", "DCM", "x")));
    }

    #[test]
    fn members_are_unique() {
        fn unique<G: ContextGroup>() -> bool {
            let mut codes: Vec<(&str, &str)> =
                G::all().iter().map(|m| (m.code().value, m.code().scheme)).collect();
            let count = codes.len();
            codes.sort_unstable();
            codes.dedup();
            codes.len() == count
        }
        assert!(unique::<RouteOfAdministration>());
        assert!(unique::<AcquisitionModality>());
        assert!(unique::<NumericValueQualifier>());
        assert!(unique::<Laterality>());
        assert!(unique::<CommonAnatomicRegion>());
        assert!(unique::<Language>());
        assert!(unique::<Country>());
        assert!(unique::<CtAcquisitionType>());
        assert!(unique::<CtReconstructionAlgorithm>());
    }

    #[test_case("CT", Some(AcquisitionModality::ComputedTomography))]
    #[test_case("MR ", Some(AcquisitionModality::MagneticResonance))]
    #[test_case("XX", None)]
    fn modality_defined_terms(term: &str, expected: Option<AcquisitionModality>) {
        assert_eq!(AcquisitionModality::from_modality(term), expected);
    }

    #[test_case("R", Some(Laterality::Right))]
    #[test_case("B", Some(Laterality::RightAndLeft))]
    #[test_case("U", None)]
    fn image_laterality_defined_terms(term: &str, expected: Option<Laterality>) {
        assert_eq!(Laterality::from_image_laterality(term), expected);
    }

    #[test_case("CHEST", Some(CommonAnatomicRegion::Chest))]
    #[test_case("LSPINE", Some(CommonAnatomicRegion::LumbarSpine))]
    #[test_case("TAIL", None)]
    fn body_part_defined_terms(term: &str, expected: Option<CommonAnatomicRegion>) {
        assert_eq!(CommonAnatomicRegion::from_body_part_examined(term), expected);
    }

    #[test]
    fn ct_defined_terms() {
        assert_eq!(
            CtAcquisitionType::from_acquisition_type("SPIRAL"),
            Some(CtAcquisitionType::SpiralAcquisition)
        );
        assert_eq!(
            CtReconstructionAlgorithm::from_reconstruction_algorithm("ITERATIVE"),
            Some(CtReconstructionAlgorithm::IterativeReconstruction)
        );
        assert_eq!(CtReconstructionAlgorithm::from_reconstruction_algorithm("NONE"), None);
    }
}
