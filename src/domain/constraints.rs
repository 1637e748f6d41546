//! Relationship constraints per document type.
//!
//! A checker answers one question: may a content item of a given value type
//! be attached below a parent of another value type with a given
//! relationship, either by value or by reference?

use crate::domain::{DocumentType, RelationshipType, ValueType};

/// How many children a rule admits below one parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// At most one child per parent.
    ZeroOrOne,
    /// Any number of children.
    Unbounded,
}

/// Which rule table a document type uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum RuleSet {
    BasicText,
    Enhanced,
    Comprehensive,
    KeyObjectSelection,
}

/// Whether by-reference relationships are admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByReference {
    Never,
    ExceptConceptModifiers,
}

/// Value types that hold a plain value and behave alike in the rule tables.
const LEAVES: [ValueType; 7] = [
    ValueType::Text,
    ValueType::Code,
    ValueType::DateTime,
    ValueType::Date,
    ValueType::Time,
    ValueType::UidRef,
    ValueType::PName,
];

const REFERENCES: [ValueType; 3] = [ValueType::Image, ValueType::Waveform, ValueType::Composite];

/// The relationship rules of one document type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintChecker {
    document_type: DocumentType,
    rules: RuleSet,
    by_reference: ByReference,
    waveforms: bool,
    root_template: Option<&'static str>,
}

impl ConstraintChecker {
    /// The checker for a document type, `None` for types that are checked
    /// permissively.
    #[must_use]
    pub const fn for_document_type(document_type: DocumentType) -> Option<Self> {
        use DocumentType as D;
        let (rules, by_reference, root_template) = match document_type {
            D::ExtensibleSR => return None,
            D::BasicTextSR => (RuleSet::BasicText, ByReference::Never, None),
            D::EnhancedSR => (RuleSet::Enhanced, ByReference::Never, None),
            D::SpectaclePrescriptionReport => {
                (RuleSet::Enhanced, ByReference::Never, Some("2020"))
            }
            D::MacularGridThicknessAndVolumeReport => {
                (RuleSet::Enhanced, ByReference::Never, Some("2100"))
            }
            D::KeyObjectSelectionDocument => {
                (RuleSet::KeyObjectSelection, ByReference::Never, Some("2010"))
            }
            D::ComprehensiveSR | D::Comprehensive3DSR | D::AcquisitionContextSR => {
                (RuleSet::Comprehensive, ByReference::ExceptConceptModifiers, None)
            }
            D::ProcedureLog => (
                RuleSet::Comprehensive,
                ByReference::ExceptConceptModifiers,
                Some("3001"),
            ),
            D::MammographyCadSR => (
                RuleSet::Comprehensive,
                ByReference::ExceptConceptModifiers,
                Some("4000"),
            ),
            D::ChestCadSR => (
                RuleSet::Comprehensive,
                ByReference::ExceptConceptModifiers,
                Some("4100"),
            ),
            D::ColonCadSR => (
                RuleSet::Comprehensive,
                ByReference::ExceptConceptModifiers,
                Some("4120"),
            ),
            D::XRayRadiationDoseSR => (
                RuleSet::Comprehensive,
                ByReference::ExceptConceptModifiers,
                Some("10001"),
            ),
            D::RadiopharmaceuticalRadiationDoseSR => (
                RuleSet::Comprehensive,
                ByReference::ExceptConceptModifiers,
                Some("10021"),
            ),
            D::ImplantationPlanSRDocument => (
                RuleSet::Comprehensive,
                ByReference::ExceptConceptModifiers,
                Some("7000"),
            ),
            D::SimplifiedAdultEchoSR => (RuleSet::Enhanced, ByReference::Never, Some("5200")),
            D::PatientRadiationDoseSR => (
                RuleSet::Comprehensive,
                ByReference::ExceptConceptModifiers,
                Some("10030"),
            ),
        };
        // CAD and radiation dose reports never reference waveforms
        let waveforms = !matches!(
            document_type,
            D::MammographyCadSR
                | D::ChestCadSR
                | D::ColonCadSR
                | D::XRayRadiationDoseSR
                | D::RadiopharmaceuticalRadiationDoseSR
                | D::PatientRadiationDoseSR
        );
        Some(Self {
            document_type,
            rules,
            by_reference,
            waveforms,
            root_template,
        })
    }

    /// The document type these rules belong to.
    #[must_use]
    pub const fn document_type(&self) -> DocumentType {
        self.document_type
    }

    /// Whether by-reference relationships are admitted at all.
    #[must_use]
    pub const fn is_by_reference_allowed(&self) -> bool {
        !matches!(self.by_reference, ByReference::Never)
    }

    /// Whether documents of this type must follow a root template.
    #[must_use]
    pub const fn is_template_support_required(&self) -> bool {
        self.root_template.is_some()
    }

    /// The DCMR identifier of the root template, if the type mandates one.
    #[must_use]
    pub const fn root_template_identifier(&self) -> Option<&'static str> {
        self.root_template
    }

    /// Whether `target` may be attached below `source` with `relationship`.
    #[must_use]
    pub fn check_content_relationship(
        &self,
        source: ValueType,
        relationship: RelationshipType,
        target: ValueType,
        by_reference: bool,
    ) -> bool {
        if by_reference {
            match self.by_reference {
                ByReference::Never => return false,
                ByReference::ExceptConceptModifiers
                    if relationship == RelationshipType::HasConceptMod =>
                {
                    return false;
                }
                ByReference::ExceptConceptModifiers => {}
            }
        }
        if matches!(target, ValueType::Reference | ValueType::Unknown)
            || matches!(source, ValueType::Reference | ValueType::Unknown)
            || (!self.waveforms && target == ValueType::Waveform)
        {
            return false;
        }
        match self.rules {
            RuleSet::KeyObjectSelection => key_object_rule(source, relationship, target),
            rules => general_rule(rules, source, relationship, target),
        }
    }

    /// How many children with this combination a parent may hold.
    #[must_use]
    pub fn cardinality(
        &self,
        source: ValueType,
        relationship: RelationshipType,
        target: ValueType,
    ) -> Cardinality {
        match (self.rules, source, relationship, target) {
            (
                RuleSet::KeyObjectSelection,
                ValueType::Container,
                RelationshipType::HasConceptMod,
                ValueType::Code,
            ) => Cardinality::ZeroOrOne,
            _ => Cardinality::Unbounded,
        }
    }
}

fn key_object_rule(source: ValueType, relationship: RelationshipType, target: ValueType) -> bool {
    use ValueType as V;
    if source != V::Container {
        return false;
    }
    match relationship {
        RelationshipType::Contains => {
            matches!(target, V::Text | V::Image | V::Waveform | V::Composite)
        }
        RelationshipType::HasObsContext => {
            matches!(target, V::Text | V::Code | V::UidRef | V::PName)
        }
        RelationshipType::HasConceptMod => target == V::Code,
        _ => false,
    }
}

fn general_rule(
    rules: RuleSet,
    source: ValueType,
    relationship: RelationshipType,
    target: ValueType,
) -> bool {
    use ValueType as V;
    let num = rules >= RuleSet::Enhanced;
    let leaf = LEAVES.contains(&target) || (num && target == V::Num);
    let reference = REFERENCES.contains(&target);
    let source_is_leaf = LEAVES.contains(&source) || (num && source == V::Num);
    match relationship {
        RelationshipType::Contains => {
            source == V::Container && (leaf || reference || target == V::Container)
        }
        RelationshipType::HasObsContext => {
            (source == V::Container || source_is_leaf)
                && (leaf || target == V::Composite || (num && reference))
        }
        RelationshipType::HasAcqContext => {
            (source == V::Container || source_is_leaf || REFERENCES.contains(&source))
                && (leaf || target == V::Container)
        }
        RelationshipType::HasConceptMod => matches!(target, V::Text | V::Code),
        RelationshipType::HasProperties | RelationshipType::InferredFrom => {
            source_is_leaf && (leaf || reference || target == V::Container)
        }
        RelationshipType::SelectedFrom | RelationshipType::IsRoot | RelationshipType::Unknown => {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn checker(document_type: DocumentType) -> ConstraintChecker {
        ConstraintChecker::for_document_type(document_type).unwrap()
    }

    #[test]
    fn extensible_sr_has_no_checker() {
        assert!(ConstraintChecker::for_document_type(DocumentType::ExtensibleSR).is_none());
    }

    #[test_case(DocumentType::BasicTextSR, false)]
    #[test_case(DocumentType::EnhancedSR, true)]
    #[test_case(DocumentType::ComprehensiveSR, true)]
    fn numeric_content(document_type: DocumentType, allowed: bool) {
        assert_eq!(
            checker(document_type).check_content_relationship(
                ValueType::Container,
                RelationshipType::Contains,
                ValueType::Num,
                false,
            ),
            allowed
        );
    }

    #[test]
    fn by_reference_only_in_comprehensive() {
        let basic = checker(DocumentType::BasicTextSR);
        let comprehensive = checker(DocumentType::ComprehensiveSR);
        for checker in [&basic, &comprehensive] {
            assert!(checker.check_content_relationship(
                ValueType::Code,
                RelationshipType::InferredFrom,
                ValueType::Text,
                false,
            ));
        }
        assert!(!basic.check_content_relationship(
            ValueType::Code,
            RelationshipType::InferredFrom,
            ValueType::Text,
            true,
        ));
        assert!(comprehensive.check_content_relationship(
            ValueType::Code,
            RelationshipType::InferredFrom,
            ValueType::Text,
            true,
        ));
        assert!(!comprehensive.check_content_relationship(
            ValueType::Code,
            RelationshipType::HasConceptMod,
            ValueType::Code,
            true,
        ));
    }

    #[test]
    fn key_object_selection_is_flat() {
        let kos = checker(DocumentType::KeyObjectSelectionDocument);
        assert!(kos.check_content_relationship(
            ValueType::Container,
            RelationshipType::Contains,
            ValueType::Image,
            false,
        ));
        assert!(!kos.check_content_relationship(
            ValueType::Container,
            RelationshipType::Contains,
            ValueType::Container,
            false,
        ));
        assert_eq!(
            kos.cardinality(
                ValueType::Container,
                RelationshipType::HasConceptMod,
                ValueType::Code
            ),
            Cardinality::ZeroOrOne
        );
        assert_eq!(kos.root_template_identifier(), Some("2010"));
    }

    #[test]
    fn image_acquisition_context() {
        let comprehensive = checker(DocumentType::ComprehensiveSR);
        assert!(comprehensive.check_content_relationship(
            ValueType::Image,
            RelationshipType::HasAcqContext,
            ValueType::Num,
            false,
        ));
        assert!(!comprehensive.check_content_relationship(
            ValueType::Image,
            RelationshipType::Contains,
            ValueType::Text,
            false,
        ));
    }

    #[test_case(DocumentType::ComprehensiveSR, true)]
    #[test_case(DocumentType::ProcedureLog, true)]
    #[test_case(DocumentType::MammographyCadSR, false)]
    #[test_case(DocumentType::ChestCadSR, false)]
    #[test_case(DocumentType::XRayRadiationDoseSR, false)]
    #[test_case(DocumentType::PatientRadiationDoseSR, false)]
    fn waveform_content(document_type: DocumentType, allowed: bool) {
        let checker = checker(document_type);
        assert_eq!(
            checker.check_content_relationship(
                ValueType::Container,
                RelationshipType::Contains,
                ValueType::Waveform,
                false,
            ),
            allowed
        );
        assert!(checker.check_content_relationship(
            ValueType::Container,
            RelationshipType::Contains,
            ValueType::Image,
            false,
        ));
    }
}
