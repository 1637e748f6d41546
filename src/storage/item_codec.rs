//! Reading and writing content trees as nested attribute containers.
//!
//! The root content item's attributes live in the top-level dataset; every
//! child is an item of its parent's Content Sequence. By-reference items
//! carry only a relationship type and the referenced item identifier.

use tracing::{debug, warn};

use crate::{
    domain::{
        CodeContext, CodedEntry, ConstraintChecker, ContentItem, ContinuityOfContent,
        DocumentSubTree, ImageReference, NodeId, NumericMeasurement, ReadOptions,
        ReferenceTarget, RelationshipType, Signatures, SopReference, TemplateIdentification,
        Value, ValueType, WaveformReference,
    },
    storage::{builder::TreeBuilder, tags, AccessError, Dataset, Tag, Values, Vr},
    Error,
};

fn missing(name: &str, tag: Tag) -> Error {
    Error::MissingMandatoryAttribute(format!("{name} {tag}"))
}

fn corrupted(error: AccessError) -> Error {
    match error {
        AccessError::NotFound(tag) => missing("attribute", tag),
        other => Error::CorruptedInput(other.to_string()),
    }
}

fn required_string<'a>(dataset: &'a Dataset, tag: Tag, name: &str) -> Result<&'a str, Error> {
    match dataset.get_string(tag) {
        Ok(value) => Ok(value.trim_end()),
        Err(AccessError::NotFound(_) | AccessError::ValueIndex { .. }) => Err(missing(name, tag)),
        Err(error) => Err(corrupted(error)),
    }
}

fn optional_string(dataset: &Dataset, tag: Tag) -> Option<String> {
    dataset.string(tag).map(str::to_string)
}

/// Reads a coded entry from a code sequence item.
pub(crate) fn read_code(item: &Dataset) -> Result<CodedEntry, Error> {
    let value = required_string(item, tags::CODE_VALUE, "Code Value")?;
    let scheme = required_string(item, tags::CODING_SCHEME_DESIGNATOR, "Coding Scheme Designator")?;
    let meaning = required_string(item, tags::CODE_MEANING, "Code Meaning")?;
    let mut code = CodedEntry::new(value, scheme, meaning);
    if let Some(version) = item.string(tags::CODING_SCHEME_VERSION) {
        code = code.with_version(version);
    }
    if let Some(identifier) = item.string(tags::CONTEXT_IDENTIFIER) {
        code = code.with_context(CodeContext {
            identifier: identifier.to_string(),
            mapping_resource: optional_string(item, tags::MAPPING_RESOURCE).unwrap_or_default(),
            version: optional_string(item, tags::CONTEXT_GROUP_VERSION).unwrap_or_default(),
            uid: optional_string(item, tags::CONTEXT_UID).unwrap_or_default(),
        });
    }
    Ok(code)
}

/// Reads the single coded entry of a code sequence, `None` if the sequence is
/// absent or empty.
pub(crate) fn read_code_sequence(dataset: &Dataset, tag: Tag) -> Result<Option<CodedEntry>, Error> {
    match dataset.get_items(tag) {
        Ok([]) | Err(AccessError::NotFound(_)) => Ok(None),
        Ok([item, rest @ ..]) => {
            if !rest.is_empty() {
                warn!(%tag, items = rest.len() + 1, "code sequence holds more than one item");
            }
            read_code(item).map(Some)
        }
        Err(error) => Err(corrupted(error)),
    }
}

/// Encodes a coded entry as a code sequence item.
pub(crate) fn write_code(code: &CodedEntry) -> Dataset {
    let mut item = Dataset::new();
    item.put_string(tags::CODE_VALUE, Vr::SH, code.code_value());
    item.put_string(tags::CODING_SCHEME_DESIGNATOR, Vr::SH, code.coding_scheme());
    if let Some(version) = code.coding_scheme_version() {
        item.put_string(tags::CODING_SCHEME_VERSION, Vr::SH, version);
    }
    item.put_string(tags::CODE_MEANING, Vr::LO, code.code_meaning());
    if let Some(context) = code.context() {
        item.put_string(tags::CONTEXT_IDENTIFIER, Vr::CS, &context.identifier);
        item.put_string(tags::MAPPING_RESOURCE, Vr::CS, &context.mapping_resource);
        item.put_string(tags::CONTEXT_GROUP_VERSION, Vr::DT, &context.version);
        item.put_string(tags::CONTEXT_UID, Vr::UI, &context.uid);
    }
    item
}

/// Sets `tag` to a one-item code sequence.
pub(crate) fn put_code_sequence(dataset: &mut Dataset, tag: Tag, code: &CodedEntry) {
    dataset.put_item(tag, write_code(code));
}

fn read_sop_reference(item: &Dataset) -> Result<SopReference, Error> {
    Ok(SopReference::new(
        required_string(item, tags::REFERENCED_SOP_CLASS_UID, "Referenced SOP Class UID")?,
        required_string(item, tags::REFERENCED_SOP_INSTANCE_UID, "Referenced SOP Instance UID")?,
    ))
}

fn write_sop_reference(sop: &SopReference) -> Dataset {
    let mut item = Dataset::new();
    item.put_string(tags::REFERENCED_SOP_CLASS_UID, Vr::UI, &sop.sop_class_uid);
    item.put_string(tags::REFERENCED_SOP_INSTANCE_UID, Vr::UI, &sop.sop_instance_uid);
    item
}

fn referenced_sop_item(dataset: &Dataset) -> Result<&Dataset, Error> {
    dataset
        .get_item(tags::REFERENCED_SOP_SEQUENCE, 0)
        .map_err(|error| match error {
            AccessError::NotFound(tag) | AccessError::ValueIndex { tag, .. } => {
                missing("Referenced SOP Sequence", tag)
            }
            other => corrupted(other),
        })
}

fn read_numbers<T: TryFrom<i64>>(dataset: &Dataset, tag: Tag) -> Result<Vec<T>, Error> {
    let invalid = |value: &dyn std::fmt::Display| {
        Error::CorruptedInput(format!("invalid number '{value}' in {tag}"))
    };
    match dataset.get(tag).map(|element| element.values()) {
        None => Ok(Vec::new()),
        Some(Values::Integers(values)) => values
            .iter()
            .map(|&value| T::try_from(value).map_err(|_| invalid(&value)))
            .collect(),
        Some(Values::Strings(values)) => values
            .iter()
            .map(|value| {
                value
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .and_then(|number| T::try_from(number).ok())
                    .ok_or_else(|| invalid(value))
            })
            .collect(),
        Some(_) => Err(Error::CorruptedInput(format!("{tag} does not hold numbers"))),
    }
}

fn read_continuity(dataset: &Dataset) -> Result<ContinuityOfContent, Error> {
    let term = required_string(dataset, tags::CONTINUITY_OF_CONTENT, "Continuity Of Content")?;
    ContinuityOfContent::from_defined_term(term)
        .ok_or_else(|| Error::UnsupportedValue(format!("continuity of content '{term}'")))
}

fn read_measurement(dataset: &Dataset) -> Result<NumericMeasurement, Error> {
    let qualifier = read_code_sequence(dataset, tags::NUMERIC_VALUE_QUALIFIER_CODE_SEQUENCE)?;
    let items = match dataset.get_items(tags::MEASURED_VALUE_SEQUENCE) {
        Ok(items) => items,
        Err(AccessError::NotFound(tag)) => return Err(missing("Measured Value Sequence", tag)),
        Err(error) => return Err(corrupted(error)),
    };
    let Some(item) = items.first() else {
        return Ok(NumericMeasurement {
            qualifier,
            ..NumericMeasurement::default()
        });
    };
    let unit = read_code_sequence(item, tags::MEASUREMENT_UNITS_CODE_SEQUENCE)?
        .ok_or_else(|| {
            missing(
                "Measurement Units Code Sequence",
                tags::MEASUREMENT_UNITS_CODE_SEQUENCE,
            )
        })?;
    Ok(NumericMeasurement {
        value: required_string(item, tags::NUMERIC_VALUE, "Numeric Value")?.trim().to_string(),
        unit,
        qualifier,
    })
}

fn read_image(dataset: &Dataset) -> Result<ImageReference, Error> {
    let item = referenced_sop_item(dataset)?;
    let presentation_state = match item.get_item(tags::REFERENCED_SOP_SEQUENCE, 0) {
        Ok(state) => Some(read_sop_reference(state)?),
        Err(_) => None,
    };
    Ok(ImageReference {
        sop: read_sop_reference(item)?,
        frames: read_numbers(item, tags::REFERENCED_FRAME_NUMBER)?,
        segments: read_numbers(item, tags::REFERENCED_SEGMENT_NUMBER)?,
        presentation_state,
    })
}

impl ImageReference {
    /// A reference to the image instance described by `dataset`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MissingMandatoryAttribute`] if the SOP Class UID or
    /// SOP Instance UID is absent.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, Error> {
        let class = dataset
            .string(tags::SOP_CLASS_UID)
            .ok_or_else(|| missing("SOP Class UID", tags::SOP_CLASS_UID))?;
        let instance = dataset
            .string(tags::SOP_INSTANCE_UID)
            .ok_or_else(|| missing("SOP Instance UID", tags::SOP_INSTANCE_UID))?;
        Ok(Self::new(class, instance))
    }
}

fn read_waveform(dataset: &Dataset) -> Result<WaveformReference, Error> {
    let item = referenced_sop_item(dataset)?;
    Ok(WaveformReference {
        sop: read_sop_reference(item)?,
        channels: read_numbers(item, tags::REFERENCED_WAVEFORM_CHANNELS)?,
    })
}

fn read_reference(dataset: &Dataset) -> Result<ReferenceTarget, Error> {
    let ids: Vec<u32> = read_numbers(dataset, tags::REFERENCED_CONTENT_ITEM_IDENTIFIER)?;
    if ids.is_empty() {
        return Err(missing(
            "Referenced Content Item Identifier",
            tags::REFERENCED_CONTENT_ITEM_IDENTIFIER,
        ));
    }
    let position = ids
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(".");
    Ok(ReferenceTarget::to_position(position))
}

fn read_value(dataset: &Dataset, value_type: ValueType) -> Result<Value, Error> {
    let string = |tag: Tag, name: &str| {
        required_string(dataset, tag, name).map(str::to_string)
    };
    Ok(match value_type {
        ValueType::Container => Value::Container(read_continuity(dataset)?),
        ValueType::Text => Value::Text(string(tags::TEXT_VALUE, "Text Value")?),
        ValueType::Code => Value::Code(Some(
            read_code_sequence(dataset, tags::CONCEPT_CODE_SEQUENCE)?.ok_or_else(|| {
                missing("Concept Code Sequence", tags::CONCEPT_CODE_SEQUENCE)
            })?,
        )),
        ValueType::Num => Value::Num(read_measurement(dataset)?),
        ValueType::Date => Value::Date(string(tags::DATE, "Date")?),
        ValueType::Time => Value::Time(string(tags::TIME, "Time")?),
        ValueType::DateTime => Value::DateTime(string(tags::DATE_TIME, "DateTime")?),
        ValueType::UidRef => Value::UidRef(string(tags::UID, "UID")?),
        ValueType::PName => Value::PName(string(tags::PERSON_NAME, "Person Name")?),
        ValueType::Image => Value::Image(read_image(dataset)?),
        ValueType::Waveform => Value::Waveform(read_waveform(dataset)?),
        ValueType::Composite => {
            Value::Composite(read_sop_reference(referenced_sop_item(dataset)?)?)
        }
        ValueType::Reference => Value::Reference(read_reference(dataset)?),
        ValueType::Unknown => Value::Unknown(
            optional_string(dataset, tags::VALUE_TYPE).unwrap_or_default(),
        ),
    })
}

fn read_template(dataset: &Dataset) -> Result<Option<TemplateIdentification>, Error> {
    let Ok(item) = dataset.get_item(tags::CONTENT_TEMPLATE_SEQUENCE, 0) else {
        return Ok(None);
    };
    Ok(Some(TemplateIdentification {
        identifier: required_string(item, tags::TEMPLATE_IDENTIFIER, "Template Identifier")?
            .to_string(),
        mapping_resource: required_string(item, tags::MAPPING_RESOURCE, "Mapping Resource")?
            .to_string(),
        mapping_resource_uid: optional_string(item, tags::MAPPING_RESOURCE_UID),
    }))
}

fn read_signatures(dataset: &Dataset) -> Signatures {
    let items = |tag| dataset.get_items(tag).map(<[Dataset]>::to_vec).unwrap_or_default();
    Signatures {
        mac_parameters: items(tags::MAC_PARAMETERS_SEQUENCE),
        digital_signatures: items(tags::DIGITAL_SIGNATURES_SEQUENCE),
    }
}

struct Reader<'a> {
    builder: TreeBuilder<'a>,
}

impl Reader<'_> {
    fn value_type(dataset: &Dataset) -> Result<ValueType, Error> {
        if dataset.contains(tags::REFERENCED_CONTENT_ITEM_IDENTIFIER)
            && !dataset.contains(tags::VALUE_TYPE)
        {
            return Ok(ValueType::Reference);
        }
        let term = required_string(dataset, tags::VALUE_TYPE, "Value Type")?;
        Ok(ValueType::from_defined_term(term).unwrap_or(ValueType::Unknown))
    }

    fn content_item(
        &self,
        dataset: &Dataset,
        value_type: ValueType,
        position: &str,
        invalid: &mut bool,
    ) -> Result<ContentItem, Error> {
        let value = self
            .builder
            .tolerate(position, read_value(dataset, value_type), invalid)?
            .unwrap_or_else(|| Value::empty(value_type));
        let mut content = ContentItem::with_value(value);
        if value_type == ValueType::Reference {
            return Ok(content);
        }
        let name = self.builder.tolerate(
            position,
            read_code_sequence(dataset, tags::CONCEPT_NAME_CODE_SEQUENCE),
            invalid,
        )?;
        if let Some(Some(name)) = name {
            content.set_concept_name(name, false)?;
        }
        if let Some(date_time) = dataset.string(tags::OBSERVATION_DATE_TIME) {
            content.set_observation_date_time(date_time, false)?;
        }
        let template = self
            .builder
            .tolerate(position, read_template(dataset), invalid)?;
        if let Some(Some(template)) = template {
            let stored = content.set_template(template);
            self.builder.tolerate(position, stored, invalid)?;
        }
        Ok(content)
    }

    fn read_item(
        &mut self,
        dataset: &Dataset,
        parent: Option<NodeId>,
        position: &str,
    ) -> Result<(), Error> {
        let (value_type, relationship) = match parent {
            None => (
                self.builder
                    .root_value_type_or_container(Self::value_type(dataset))?,
                RelationshipType::IsRoot,
            ),
            Some(_) => {
                let term = required_string(dataset, tags::RELATIONSHIP_TYPE, "Relationship Type")?;
                (
                    Self::value_type(dataset)?,
                    self.builder.relationship(term, position)?,
                )
            }
        };
        let value_type = self
            .builder
            .check_item(parent, relationship, value_type, position)?;

        let mut invalid = false;
        let content = self.content_item(dataset, value_type, position, &mut invalid)?;
        let Some(id) = self.builder.add(
            parent,
            relationship,
            content,
            read_signatures(dataset),
            invalid,
            position,
        )?
        else {
            return Ok(());
        };

        let children: &[Dataset] = match dataset.get_items(tags::CONTENT_SEQUENCE) {
            Ok(children) => children,
            Err(AccessError::NotFound(_)) => &[],
            Err(error) => return Err(corrupted(error)),
        };
        for (index, child) in children.iter().enumerate() {
            let child_position = format!("{position}.{}", index + 1);
            self.read_item(child, Some(id), &child_position)?;
        }
        Ok(())
    }
}

/// Reads the content tree rooted in `dataset`.
///
/// By-reference targets are left unresolved.
pub(crate) fn read_tree(
    dataset: &Dataset,
    checker: Option<ConstraintChecker>,
    options: &ReadOptions,
) -> Result<DocumentSubTree, Error> {
    let mut reader = Reader {
        builder: TreeBuilder::new(checker, options),
    };
    reader.read_item(dataset, None, "1")?;
    Ok(reader.builder.finish())
}

fn write_value(item: &mut Dataset, value: &Value) -> Result<(), Error> {
    match value {
        Value::Container(continuity) => {
            item.put_string(tags::CONTINUITY_OF_CONTENT, Vr::CS, continuity.defined_term());
        }
        Value::Text(text) => item.put_string(tags::TEXT_VALUE, Vr::UT, text),
        Value::Code(code) => match code {
            Some(code) => put_code_sequence(item, tags::CONCEPT_CODE_SEQUENCE, code),
            None => item.put_empty(tags::CONCEPT_CODE_SEQUENCE, Vr::SQ),
        },
        Value::Num(measurement) => {
            if measurement.value.is_empty() {
                item.put_empty(tags::MEASURED_VALUE_SEQUENCE, Vr::SQ);
            } else {
                let mut measured = Dataset::new();
                measured.put_string(tags::NUMERIC_VALUE, Vr::DS, &measurement.value);
                put_code_sequence(
                    &mut measured,
                    tags::MEASUREMENT_UNITS_CODE_SEQUENCE,
                    &measurement.unit,
                );
                item.put_item(tags::MEASURED_VALUE_SEQUENCE, measured);
            }
            if let Some(qualifier) = &measurement.qualifier {
                put_code_sequence(item, tags::NUMERIC_VALUE_QUALIFIER_CODE_SEQUENCE, qualifier);
            }
        }
        Value::Date(date) => item.put_string(tags::DATE, Vr::DA, date),
        Value::Time(time) => item.put_string(tags::TIME, Vr::TM, time),
        Value::DateTime(date_time) => item.put_string(tags::DATE_TIME, Vr::DT, date_time),
        Value::UidRef(uid) => item.put_string(tags::UID, Vr::UI, uid),
        Value::PName(name) => item.put_string(tags::PERSON_NAME, Vr::PN, name),
        Value::Image(image) => {
            let mut sop = write_sop_reference(&image.sop);
            if !image.frames.is_empty() {
                let frames = image.frames.iter().map(u32::to_string).collect();
                sop.put_strings(tags::REFERENCED_FRAME_NUMBER, Vr::IS, frames);
            }
            if !image.segments.is_empty() {
                let segments = image.segments.iter().map(|&s| i64::from(s)).collect();
                sop.put_integers(tags::REFERENCED_SEGMENT_NUMBER, Vr::US, segments);
            }
            if let Some(state) = &image.presentation_state {
                sop.put_item(tags::REFERENCED_SOP_SEQUENCE, write_sop_reference(state));
            }
            item.put_item(tags::REFERENCED_SOP_SEQUENCE, sop);
        }
        Value::Waveform(waveform) => {
            let mut sop = write_sop_reference(&waveform.sop);
            if !waveform.channels.is_empty() {
                let channels = waveform.channels.iter().map(|&c| i64::from(c)).collect();
                sop.put_integers(tags::REFERENCED_WAVEFORM_CHANNELS, Vr::US, channels);
            }
            item.put_item(tags::REFERENCED_SOP_SEQUENCE, sop);
        }
        Value::Composite(sop) => {
            item.put_item(tags::REFERENCED_SOP_SEQUENCE, write_sop_reference(sop));
        }
        Value::Reference(target) => {
            let ids = target
                .position
                .split('.')
                .map(|part| {
                    part.parse::<i64>().map_err(|_| {
                        let position = &target.position;
                        Error::InvalidValue(format!("invalid reference position '{position}'"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            item.put_integers(tags::REFERENCED_CONTENT_ITEM_IDENTIFIER, Vr::UL, ids);
        }
        Value::Unknown(term) => {
            return Err(Error::UnsupportedValue(format!("value type '{term}'")));
        }
    }
    Ok(())
}

struct Writer<'a> {
    tree: &'a DocumentSubTree,
    marked: Option<&'a mut Vec<Dataset>>,
}

impl Writer<'_> {
    fn write_item(&mut self, id: NodeId, item: &mut Dataset) -> Result<(), Error> {
        let tree = self.tree;
        let node = tree
            .node(id)
            .ok_or_else(|| Error::InvalidSubtree(format!("node {id} not found")))?;
        let content = node.content();
        let slot = match self.marked.as_deref_mut() {
            Some(marked) if node.is_marked() => {
                marked.push(Dataset::new());
                Some(marked.len() - 1)
            }
            _ => None,
        };

        if let Some(term) = node.relationship().defined_term() {
            item.put_string(tags::RELATIONSHIP_TYPE, Vr::CS, term);
        }
        if let Some(term) = content.value_type().defined_term() {
            item.put_string(tags::VALUE_TYPE, Vr::CS, term);
        }
        if let Some(name) = content.concept_name() {
            put_code_sequence(item, tags::CONCEPT_NAME_CODE_SEQUENCE, name);
        }
        if let Some(date_time) = content.observation_date_time() {
            item.put_string(tags::OBSERVATION_DATE_TIME, Vr::DT, date_time);
        }
        if let Some(template) = content.template_identification() {
            let mut identification = Dataset::new();
            identification.put_string(tags::MAPPING_RESOURCE, Vr::CS, &template.mapping_resource);
            if let Some(uid) = &template.mapping_resource_uid {
                identification.put_string(tags::MAPPING_RESOURCE_UID, Vr::UI, uid);
            }
            identification.put_string(tags::TEMPLATE_IDENTIFIER, Vr::CS, &template.identifier);
            item.put_item(tags::CONTENT_TEMPLATE_SEQUENCE, identification);
        }
        write_value(item, content.value())?;

        if !node.children().is_empty() {
            let mut children = Vec::new();
            children
                .try_reserve(node.children().len())
                .map_err(|_| Error::MemoryExhausted)?;
            for &child in node.children() {
                let mut child_item = Dataset::new();
                self.write_item(child, &mut child_item)?;
                children.push(child_item);
            }
            item.put_items(tags::CONTENT_SEQUENCE, children);
        }

        let signatures = node.signatures();
        if !signatures.mac_parameters.is_empty() {
            item.put_items(tags::MAC_PARAMETERS_SEQUENCE, signatures.mac_parameters.clone());
        }
        if !signatures.digital_signatures.is_empty() {
            item.put_items(
                tags::DIGITAL_SIGNATURES_SEQUENCE,
                signatures.digital_signatures.clone(),
            );
        }

        if let (Some(slot), Some(marked)) = (slot, self.marked.as_deref_mut()) {
            marked[slot] = item.clone();
        }
        Ok(())
    }
}

/// Writes the content tree into `dataset`.
///
/// Nothing is written unless the whole tree encodes; marked items are copied
/// to `marked` in document order.
pub(crate) fn write_tree(
    tree: &DocumentSubTree,
    dataset: &mut Dataset,
    marked: Option<&mut Vec<Dataset>>,
) -> Result<(), Error> {
    let root = tree.root().ok_or(Error::InvalidDocumentTree)?.id();
    let mut scratch_marked = Vec::new();
    let collect = marked.is_some();
    let mut writer = Writer {
        tree,
        marked: collect.then_some(&mut scratch_marked),
    };
    let mut scratch = Dataset::new();
    writer.write_item(root, &mut scratch)?;
    debug!(attributes = scratch.len(), marked = scratch_marked.len(), "wrote content tree");
    dataset.merge(scratch);
    if let Some(marked) = marked {
        marked.append(&mut scratch_marked);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AddMode, DocumentType};

    fn name(value: &str) -> Option<CodedEntry> {
        Some(CodedEntry::new(value, "99TEST", format!("Concept {value}")))
    }

    fn sample() -> DocumentSubTree {
        let mut tree =
            DocumentSubTree::with_checker(DocumentType::ComprehensiveSR.constraint_checker());
        tree.add_content_item(
            RelationshipType::IsRoot,
            ValueType::Container,
            name("root"),
            AddMode::AfterCurrent,
        )
        .unwrap();
        tree.add_content_item(
            RelationshipType::Contains,
            ValueType::Text,
            name("t"),
            AddMode::BelowCurrent,
        )
        .unwrap();
        tree.current_content_item()
            .unwrap()
            .set_string_value("finding", true)
            .unwrap();
        tree.add_content_item(
            RelationshipType::Contains,
            ValueType::Num,
            name("n"),
            AddMode::AfterCurrent,
        )
        .unwrap();
        tree.current_content_item()
            .unwrap()
            .set_numeric_value(
                NumericMeasurement::new("12.5", CodedEntry::new("mm", "UCUM", "mm")),
                true,
            )
            .unwrap();
        tree.current_content_item().unwrap().set_mark(true);
        tree
    }

    #[test]
    fn writes_nested_content_sequence() {
        let tree = sample();
        let mut dataset = Dataset::new();
        let mut marked = Vec::new();
        write_tree(&tree, &mut dataset, Some(&mut marked)).unwrap();

        assert_eq!(dataset.get_string(tags::VALUE_TYPE).unwrap(), "CONTAINER");
        assert!(!dataset.contains(tags::RELATIONSHIP_TYPE));
        let children = dataset.get_items(tags::CONTENT_SEQUENCE).unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].get_string(tags::TEXT_VALUE).unwrap(), "finding");
        assert_eq!(children[1].get_string(tags::RELATIONSHIP_TYPE).unwrap(), "CONTAINS");
        assert_eq!(marked, vec![children[1].clone()]);
    }

    #[test]
    fn read_restores_tree() {
        let tree = sample();
        let mut dataset = Dataset::new();
        write_tree(&tree, &mut dataset, None).unwrap();

        let read = read_tree(
            &dataset,
            DocumentType::ComprehensiveSR.constraint_checker(),
            &ReadOptions::default(),
        )
        .unwrap();
        assert_eq!(read.count_nodes(), 3);
        let values: Vec<_> = read.iter().map(|node| node.content().value().clone()).collect();
        let expected: Vec<_> = tree.iter().map(|node| node.content().value().clone()).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn missing_value_type_is_reported() {
        let dataset = Dataset::new();
        let err = read_tree(&dataset, None, &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MissingMandatoryAttribute(_)), "{err}");
    }

    #[test]
    fn unknown_value_type_is_kept_when_lenient() {
        let mut child = Dataset::new();
        child.put_string(tags::RELATIONSHIP_TYPE, Vr::CS, "CONTAINS");
        child.put_string(tags::VALUE_TYPE, Vr::CS, "TABLE");
        put_code_sequence(
            &mut child,
            tags::CONCEPT_NAME_CODE_SEQUENCE,
            &CodedEntry::new("x", "99TEST", "X"),
        );
        let mut root = Dataset::new();
        root.put_string(tags::VALUE_TYPE, Vr::CS, "CONTAINER");
        root.put_string(tags::CONTINUITY_OF_CONTENT, Vr::CS, "SEPARATE");
        put_code_sequence(
            &mut root,
            tags::CONCEPT_NAME_CODE_SEQUENCE,
            &CodedEntry::new("r", "99TEST", "R"),
        );
        root.put_item(tags::CONTENT_SEQUENCE, child);

        let err = read_tree(&root, None, &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue(_)), "{err}");

        let tree = read_tree(&root, None, &ReadOptions::lenient()).unwrap();
        assert_eq!(tree.count_nodes(), 2);
        assert!(!tree.is_valid_document_tree(RelationshipType::IsRoot));
        let unknown = tree.iter().nth(1).unwrap();
        assert_eq!(unknown.content().value(), &Value::Unknown("TABLE".to_string()));

        let skipping = ReadOptions {
            skip_invalid_content_items: true,
            ..ReadOptions::lenient()
        };
        assert_eq!(read_tree(&root, None, &skipping).unwrap().count_nodes(), 1);
    }

    #[test]
    fn disallowed_relationship_is_downgraded_on_request() {
        let mut child = Dataset::new();
        child.put_string(tags::RELATIONSHIP_TYPE, Vr::CS, "CONTAINS");
        child.put_string(tags::VALUE_TYPE, Vr::CS, "NUM");
        put_code_sequence(
            &mut child,
            tags::CONCEPT_NAME_CODE_SEQUENCE,
            &CodedEntry::new("n", "99TEST", "N"),
        );
        let measurement = NumericMeasurement::new("1", CodedEntry::new("mm", "UCUM", "mm"));
        write_value(&mut child, &Value::Num(measurement)).unwrap();
        let mut root = Dataset::new();
        root.put_string(tags::VALUE_TYPE, Vr::CS, "CONTAINER");
        root.put_string(tags::CONTINUITY_OF_CONTENT, Vr::CS, "SEPARATE");
        put_code_sequence(
            &mut root,
            tags::CONCEPT_NAME_CODE_SEQUENCE,
            &CodedEntry::new("r", "99TEST", "R"),
        );
        root.put_item(tags::CONTENT_SEQUENCE, child);

        let checker = DocumentType::BasicTextSR.constraint_checker();
        let err = read_tree(&root, checker.clone(), &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidRelationship { .. }), "{err}");

        let options = ReadOptions {
            ignore_relationship_constraints: true,
            ..ReadOptions::default()
        };
        assert_eq!(read_tree(&root, checker, &options).unwrap().count_nodes(), 2);
    }

    fn root_with_finding(value_type: Option<&str>) -> Dataset {
        let mut child = Dataset::new();
        child.put_string(tags::RELATIONSHIP_TYPE, Vr::CS, "CONTAINS");
        child.put_string(tags::VALUE_TYPE, Vr::CS, "TEXT");
        put_code_sequence(
            &mut child,
            tags::CONCEPT_NAME_CODE_SEQUENCE,
            &CodedEntry::new("t", "99TEST", "T"),
        );
        child.put_string(tags::TEXT_VALUE, Vr::UT, "finding");
        let mut root = Dataset::new();
        if let Some(value_type) = value_type {
            root.put_string(tags::VALUE_TYPE, Vr::CS, value_type);
        }
        put_code_sequence(
            &mut root,
            tags::CONCEPT_NAME_CODE_SEQUENCE,
            &CodedEntry::new("r", "99TEST", "R"),
        );
        root.put_item(tags::CONTENT_SEQUENCE, child);
        root
    }

    #[test]
    fn root_of_wrong_type_is_read_as_container_when_lenient() {
        let root = root_with_finding(Some("TEXT"));
        let err = read_tree(&root, None, &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidDocumentTree), "{err}");

        let tree = read_tree(&root, None, &ReadOptions::lenient()).unwrap();
        assert_eq!(tree.count_nodes(), 2);
        assert_eq!(
            tree.root().unwrap().content().value_type(),
            ValueType::Container
        );
    }

    #[test]
    fn root_without_value_type_is_read_as_container_when_lenient() {
        let root = root_with_finding(None);
        let err = read_tree(&root, None, &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MissingMandatoryAttribute(_)), "{err}");

        let tree = read_tree(&root, None, &ReadOptions::lenient()).unwrap();
        assert_eq!(tree.count_nodes(), 2);
        assert_eq!(
            tree.root().unwrap().content().value_type(),
            ValueType::Container
        );
        let finding = tree.iter().nth(1).unwrap();
        assert_eq!(finding.content().string_value(), Some("finding"));
    }
}
