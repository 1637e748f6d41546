//! End-to-end tests of building, serializing and reading document trees.

#![allow(missing_docs)]

use srtree::{
    context_groups::{Country, Language},
    domain::{NumericMeasurement, ReadOptions, Value, XmlOptions},
    templates::LanguageOfContentItemAndDescendants,
    AddMode, CodedEntry, Dataset, DocumentTree, DocumentType, Error, RelationshipType,
    SrDocument, ValueType,
};
use tempfile::TempDir;

fn concept(value: &str, meaning: &str) -> Option<CodedEntry> {
    Some(CodedEntry::new(value, "99TEST", meaning))
}

/// A report with a single text finding.
fn finding_report(document_type: DocumentType) -> DocumentTree {
    let mut tree = DocumentTree::new(document_type);
    tree.add_content_item(
        RelationshipType::IsRoot,
        ValueType::Container,
        concept("report", "Report"),
        AddMode::AfterCurrent,
    )
    .unwrap();
    tree.add_content_item(
        RelationshipType::Contains,
        ValueType::Text,
        concept("finding", "Finding"),
        AddMode::BelowCurrent,
    )
    .unwrap();
    tree.current_content_item()
        .unwrap()
        .set_string_value("normal", true)
        .unwrap();
    tree
}

fn string_at(tree: &mut DocumentTree, position: &str) -> Option<String> {
    tree.goto_position(position)?;
    tree.current_node()?
        .content()
        .string_value()
        .map(str::to_string)
}

#[test]
fn finding_survives_dataset_round_trip() {
    let mut tree = finding_report(DocumentType::BasicTextSR);
    let mut dataset = Dataset::new();
    tree.write(&mut dataset, None).unwrap();

    let mut read = DocumentTree::default();
    read.read(&dataset, DocumentType::BasicTextSR, &ReadOptions::default())
        .unwrap();

    assert!(read.is_valid());
    assert_eq!(read.count_nodes(), 2);
    assert_eq!(string_at(&mut read, "1.1").as_deref(), Some("normal"));
    let finding = CodedEntry::new("finding", "99TEST", "Finding");
    assert!(read.goto_named_node(&finding, true, true).is_some());
}

#[test]
fn finding_survives_xml_round_trip() {
    let mut tree = finding_report(DocumentType::ComprehensiveSR);
    let xml = tree.write_xml(&XmlOptions::default()).unwrap();

    let mut read = DocumentTree::new(DocumentType::ComprehensiveSR);
    read.read_xml(&xml, &ReadOptions::default(), &XmlOptions::default())
        .unwrap();

    assert_eq!(read.count_nodes(), 2);
    assert_eq!(string_at(&mut read, "1.1").as_deref(), Some("normal"));
}

#[test]
fn by_reference_relationships_are_resolved_after_reading() {
    let mut tree = finding_report(DocumentType::ComprehensiveSR);
    let evidence = tree.node_id().unwrap();
    tree.add_content_item(
        RelationshipType::Contains,
        ValueType::Text,
        concept("impression", "Impression"),
        AddMode::AfterCurrent,
    )
    .unwrap();
    tree.current_content_item()
        .unwrap()
        .set_string_value("no follow-up needed", true)
        .unwrap();
    tree.add_by_reference_relationship(RelationshipType::InferredFrom, evidence)
        .unwrap();

    let mut dataset = Dataset::new();
    tree.write(&mut dataset, None).unwrap();
    let mut read = DocumentTree::default();
    read.read(&dataset, DocumentType::ComprehensiveSR, &ReadOptions::default())
        .unwrap();

    let target = read.goto_position("1.1").unwrap();
    let reference = read.goto_position("1.2.1").unwrap();
    let node = read.node(reference).unwrap();
    assert_eq!(node.relationship(), RelationshipType::InferredFrom);
    let Value::Reference(resolved) = node.content().value() else {
        panic!("expected a by-reference item");
    };
    assert_eq!(resolved.position, "1.1");
    assert_eq!(resolved.node, Some(target));
    assert_eq!(resolved.value_type, Some(ValueType::Text));
    assert!(read.node(target).unwrap().is_reference_target());
}

/// root
/// ├── 1.1 finding
/// │   └── 1.1.1 inferred from 1.2 (by reference)
/// └── 1.2 measurement
#[test]
fn forward_references_are_resolved_after_reading() {
    let mut tree = finding_report(DocumentType::ComprehensiveSR);
    let finding = tree.node_id().unwrap();
    let measurement = tree
        .add_content_item(
            RelationshipType::Contains,
            ValueType::Text,
            concept("measurement", "Measurement"),
            AddMode::AfterCurrent,
        )
        .unwrap();
    tree.current_content_item()
        .unwrap()
        .set_string_value("12 mm", true)
        .unwrap();
    tree.goto(finding).unwrap();
    tree.add_by_reference_relationship(RelationshipType::InferredFrom, measurement)
        .unwrap();

    let mut dataset = Dataset::new();
    tree.write(&mut dataset, None).unwrap();
    let mut read = DocumentTree::default();
    read.read(&dataset, DocumentType::ComprehensiveSR, &ReadOptions::default())
        .unwrap();

    let target = read.goto_position("1.2").unwrap();
    let reference = read.goto_position("1.1.1").unwrap();
    let Value::Reference(resolved) = read.node(reference).unwrap().content().value() else {
        panic!("expected a by-reference item");
    };
    assert_eq!(resolved.position, "1.2");
    assert_eq!(resolved.node, Some(target));
    assert!(read.node(target).unwrap().is_reference_target());
    assert_eq!(string_at(&mut read, "1.2").as_deref(), Some("12 mm"));
}

#[test]
fn removed_reference_target_fails_the_write() {
    let mut tree = finding_report(DocumentType::ComprehensiveSR);
    let removed = tree.node_id().unwrap();
    for name in ["other", "source"] {
        tree.add_content_item(
            RelationshipType::Contains,
            ValueType::Text,
            concept(name, name),
            AddMode::AfterCurrent,
        )
        .unwrap();
        tree.current_content_item()
            .unwrap()
            .set_string_value(name, true)
            .unwrap();
    }
    tree.add_by_reference_relationship(RelationshipType::InferredFrom, removed)
        .unwrap();
    let mut dataset = Dataset::new();
    tree.write(&mut dataset, None).unwrap();

    tree.goto(removed).unwrap();
    tree.remove_current_content_item().unwrap();
    // "other" has moved to the position of the removed finding
    assert_eq!(string_at(&mut tree, "1.1").as_deref(), Some("other"));

    let mut dataset = Dataset::new();
    let error = tree.write(&mut dataset, None).unwrap_err();
    assert!(
        matches!(&error, Error::DanglingReference { target, .. } if target == "1.1"),
        "{error}"
    );
    assert!(dataset.is_empty());
}

#[test]
fn failed_read_leaves_an_empty_tree() {
    let mut tree = finding_report(DocumentType::ComprehensiveSR);
    let error = tree
        .read(&Dataset::new(), DocumentType::ComprehensiveSR, &ReadOptions::default())
        .unwrap_err();
    assert!(matches!(error, Error::MissingMandatoryAttribute(_)), "{error}");
    assert!(tree.is_empty());

    let mut tree = finding_report(DocumentType::ComprehensiveSR);
    let error = tree
        .read_xml("<content>", &ReadOptions::default(), &XmlOptions::default())
        .unwrap_err();
    assert!(matches!(error, Error::CorruptedInput(_)), "{error}");
    assert!(tree.is_empty());
}

#[test]
fn lenient_read_repairs_a_root_of_the_wrong_type() {
    let mut tree = finding_report(DocumentType::ComprehensiveSR);
    let mut dataset = Dataset::new();
    tree.write(&mut dataset, None).unwrap();
    dataset.put_string(srtree::storage::tags::VALUE_TYPE, srtree::storage::Vr::CS, "TEXT");

    let mut read = DocumentTree::default();
    let error = read
        .read(&dataset, DocumentType::ComprehensiveSR, &ReadOptions::default())
        .unwrap_err();
    assert!(matches!(error, Error::InvalidDocumentTree), "{error}");

    read.read(&dataset, DocumentType::ComprehensiveSR, &ReadOptions::lenient())
        .unwrap();
    assert_eq!(read.count_nodes(), 2);
    assert_eq!(string_at(&mut read, "1.1").as_deref(), Some("normal"));
}

#[test]
fn incompatible_document_type_change_keeps_the_tree() {
    let mut tree = finding_report(DocumentType::ComprehensiveSR);
    tree.add_content_item(
        RelationshipType::Contains,
        ValueType::Num,
        concept("diameter", "Diameter"),
        AddMode::AfterCurrent,
    )
    .unwrap();
    tree.current_content_item()
        .unwrap()
        .set_numeric_value(
            NumericMeasurement::new("12", CodedEntry::new("mm", "UCUM", "millimeter")),
            true,
        )
        .unwrap();

    let error = tree
        .change_document_type(DocumentType::BasicTextSR, false)
        .unwrap_err();
    assert!(matches!(error, Error::IncompatibleDocumentType(_)));
    assert_eq!(tree.document_type(), DocumentType::ComprehensiveSR);
    assert_eq!(tree.count_nodes(), 3);

    tree.change_document_type(DocumentType::BasicTextSR, true)
        .unwrap();
    assert_eq!(tree.document_type(), DocumentType::BasicTextSR);
    assert!(tree.is_empty());
}

#[test]
fn inserted_template_is_stamped_with_its_identification() {
    let mut tree = finding_report(DocumentType::ComprehensiveSR);
    let mut language = LanguageOfContentItemAndDescendants::new();
    language
        .set_language(Language::German, Some(Country::Austria), true)
        .unwrap();

    tree.insert_template(language, AddMode::BelowCurrent, RelationshipType::HasConceptMod)
        .unwrap();

    assert_eq!(tree.count_nodes(), 4);
    let inserted = tree.current_node().unwrap();
    assert_eq!(inserted.relationship(), RelationshipType::HasConceptMod);
    let template = inserted.content().template_identification().unwrap();
    assert!(template.is_dcmr("1204"));
    assert_eq!(tree.position().as_deref(), Some("1.1.1"));
}

#[test]
fn document_survives_a_file_round_trip() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("report.json");

    let mut document = SrDocument::new(DocumentType::BasicTextSR);
    *document.tree_mut() = finding_report(DocumentType::BasicTextSR);
    document
        .common_mut()
        .patient_mut()
        .set_patient_id("4711", true)
        .unwrap();
    document.complete(None);
    let mut dataset = Dataset::new();
    document.write(&mut dataset).unwrap();
    dataset.save(&path).unwrap();

    let mut read = SrDocument::default();
    read.read(&Dataset::load(&path).unwrap(), &ReadOptions::default())
        .unwrap();

    assert_eq!(read.document_type(), DocumentType::BasicTextSR);
    assert_eq!(read.common().patient().patient_id(), "4711");
    assert_eq!(read.general().completion_flag(), "COMPLETE");
    assert_eq!(
        read.common().sop_common().sop_instance_uid(),
        document.common().sop_common().sop_instance_uid()
    );
    assert_eq!(string_at(read.tree_mut(), "1.1").as_deref(), Some("normal"));
}
