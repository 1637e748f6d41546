//! The XML form of a content tree.
//!
//! ```xml
//! <content>
//!   <container flag="SEPARATE">
//!     <concept value="18748-4" scheme="LN" meaning="Diagnostic Imaging Report"/>
//!     <text relationship="CONTAINS">
//!       <concept value="121071" scheme="DCM" meaning="Finding"/>
//!       <value>No abnormality</value>
//!     </text>
//!   </container>
//! </content>
//! ```
//!
//! Every content item is an element named after its value type. Descriptive
//! children (`concept`, `observation`, `template`, `value`, `unit`,
//! `qualifier`) precede the child items.

use std::io;

use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use roxmltree::Node;

use crate::{
    domain::{
        CodedEntry, ConstraintChecker, ContentItem, ContinuityOfContent, DocumentSubTree,
        ImageReference, NodeId, NumericMeasurement, ReadOptions, ReferenceTarget,
        RelationshipType, Signatures, SopReference, TemplateIdentification, TreeNode, Value,
        ValueType, WaveformReference, XmlOptions,
    },
    storage::builder::TreeBuilder,
    Error,
};

const DESCRIPTIVE: [&str; 5] = ["concept", "observation", "value", "unit", "qualifier"];

/// Indenting XML event writer.
pub(crate) struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }
}

impl XmlWriter {
    fn write(&mut self, event: Event<'_>) -> Result<(), Error> {
        self.writer.write_event(event).map_err(io::Error::other)?;
        Ok(())
    }

    fn element<'a>(name: &'a str, attributes: &[(&'a str, &'a str)]) -> BytesStart<'a> {
        let mut start = BytesStart::new(name);
        for &attribute in attributes {
            start.push_attribute(attribute);
        }
        start
    }

    pub(crate) fn declaration(&mut self) -> Result<(), Error> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    pub(crate) fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), Error> {
        self.write(Event::Start(Self::element(name, attributes)))
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<(), Error> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    pub(crate) fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), Error> {
        self.write(Event::Empty(Self::element(name, attributes)))
    }

    pub(crate) fn text(&mut self, name: &str, text: &str) -> Result<(), Error> {
        if text.is_empty() {
            return self.empty(name, &[]);
        }
        self.start(name, &[])?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    /// The document written so far.
    pub(crate) fn finish(self) -> Result<String, Error> {
        String::from_utf8(self.writer.into_inner())
            .map_err(|error| Error::Output(io::Error::new(io::ErrorKind::InvalidData, error)))
    }
}

fn code_attributes<'a>(code: &'a CodedEntry) -> Vec<(&'a str, &'a str)> {
    let mut attributes = vec![("value", code.code_value()), ("scheme", code.coding_scheme())];
    if let Some(version) = code.coding_scheme_version() {
        attributes.push(("version", version));
    }
    attributes.push(("meaning", code.code_meaning()));
    attributes
}

fn template_attributes(template: &TemplateIdentification) -> Vec<(&str, &str)> {
    let mut attributes = vec![("resource", template.mapping_resource.as_str())];
    if let Some(uid) = &template.mapping_resource_uid {
        attributes.push(("uid", uid.as_str()));
    }
    attributes.push(("tid", template.identifier.as_str()));
    attributes
}

fn numbers<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn sop_attributes(sop: &SopReference) -> [(&str, &str); 2] {
    [
        ("class", sop.sop_class_uid.as_str()),
        ("instance", sop.sop_instance_uid.as_str()),
    ]
}

fn write_value(value: &Value, options: &XmlOptions, writer: &mut XmlWriter) -> Result<(), Error> {
    match value {
        Value::Container(_) | Value::Unknown(_) => {}
        Value::Code(Some(code)) => writer.empty("value", &code_attributes(code))?,
        Value::Code(None) if options.write_empty_values => writer.empty("value", &[])?,
        Value::Code(None) => {}
        Value::Num(measurement) => {
            if !measurement.value.is_empty() || options.write_empty_values {
                writer.text("value", &measurement.value)?;
            }
            if !measurement.unit.is_empty() {
                writer.empty("unit", &code_attributes(&measurement.unit))?;
            }
            if let Some(qualifier) = &measurement.qualifier {
                writer.empty("qualifier", &code_attributes(qualifier))?;
            }
        }
        Value::Image(image) => {
            writer.start("value", &[])?;
            writer.empty("sop", &sop_attributes(&image.sop))?;
            if !image.frames.is_empty() {
                writer.text("frames", &numbers(&image.frames))?;
            }
            if !image.segments.is_empty() {
                writer.text("segments", &numbers(&image.segments))?;
            }
            if let Some(state) = &image.presentation_state {
                writer.empty("pstate", &sop_attributes(state))?;
            }
            writer.end("value")?;
        }
        Value::Waveform(waveform) => {
            writer.start("value", &[])?;
            writer.empty("sop", &sop_attributes(&waveform.sop))?;
            if !waveform.channels.is_empty() {
                writer.text("channels", &numbers(&waveform.channels))?;
            }
            writer.end("value")?;
        }
        Value::Composite(sop) => {
            writer.start("value", &[])?;
            writer.empty("sop", &sop_attributes(sop))?;
            writer.end("value")?;
        }
        Value::Reference(target) => writer.text("value", &target.position)?,
        other => {
            let text = other.as_str().unwrap_or_default();
            if !text.is_empty() || options.write_empty_values {
                writer.text("value", text)?;
            }
        }
    }
    Ok(())
}

fn write_node(
    tree: &DocumentSubTree,
    node: &TreeNode,
    options: &XmlOptions,
    writer: &mut XmlWriter,
) -> Result<(), Error> {
    let content = node.content();
    let template = content.template_identification();
    if let (true, Some(template)) = (options.template_element_encloses_items, template) {
        writer.start("template", &template_attributes(template))?;
    }

    let name = content.value_type().xml_name();
    let mut attributes = Vec::with_capacity(2);
    if let Some(relationship) = node.relationship().defined_term() {
        attributes.push(("relationship", relationship));
    }
    if let Value::Container(continuity) = content.value() {
        attributes.push(("flag", continuity.defined_term()));
    }
    writer.start(name, &attributes)?;
    if let Some(concept) = content.concept_name() {
        writer.empty("concept", &code_attributes(concept))?;
    }
    if let Some(date_time) = content.observation_date_time() {
        writer.text("observation", date_time)?;
    }
    if let (false, Some(template)) = (options.template_element_encloses_items, template) {
        writer.empty("template", &template_attributes(template))?;
    }
    write_value(content.value(), options, writer)?;
    for child in node.children().iter().filter_map(|&id| tree.node(id)) {
        write_node(tree, child, options, writer)?;
    }
    writer.end(name)?;

    if let (true, Some(_)) = (options.template_element_encloses_items, template) {
        writer.end("template")?;
    }
    Ok(())
}

/// Writes the tree as a `<content>` element.
pub(crate) fn write_tree(
    tree: &DocumentSubTree,
    options: &XmlOptions,
    writer: &mut XmlWriter,
) -> Result<(), Error> {
    writer.declaration()?;
    writer.start("content", &[])?;
    for node in tree.top_level().iter().filter_map(|&id| tree.node(id)) {
        write_node(tree, node, options, writer)?;
    }
    writer.end("content")
}

fn missing(what: &str, element: Node) -> Error {
    Error::MissingMandatoryAttribute(format!(
        "{what} of <{}>",
        element.tag_name().name()
    ))
}

fn child<'a, 'input>(element: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    element.children().find(|node| node.has_tag_name(name))
}

fn read_code(element: Node) -> Result<CodedEntry, Error> {
    let attribute = |name: &str| {
        element
            .attribute(name)
            .ok_or_else(|| missing(&format!("attribute '{name}'"), element))
    };
    let code = CodedEntry::new(attribute("value")?, attribute("scheme")?, attribute("meaning")?);
    Ok(match element.attribute("version") {
        Some(version) => code.with_version(version),
        None => code,
    })
}

fn read_numbers<T: std::str::FromStr>(element: Option<Node>) -> Result<Vec<T>, Error> {
    let Some(text) = element.and_then(|element| element.text()) else {
        return Ok(Vec::new());
    };
    text.split_whitespace()
        .map(|number| {
            number
                .parse()
                .map_err(|_| Error::CorruptedInput(format!("invalid number '{number}'")))
        })
        .collect()
}

fn read_sop(element: Node) -> Result<SopReference, Error> {
    let attribute = |name: &str| {
        element
            .attribute(name)
            .ok_or_else(|| missing(&format!("attribute '{name}'"), element))
    };
    Ok(SopReference::new(attribute("class")?, attribute("instance")?))
}

fn read_value(element: Node, value_type: ValueType) -> Result<Value, Error> {
    let value = child(element, "value");
    let text = || {
        value
            .and_then(|value| value.text())
            .unwrap_or_default()
            .to_string()
    };
    let sop = || {
        value
            .and_then(|value| child(value, "sop"))
            .ok_or_else(|| missing("<sop>", element))
            .and_then(read_sop)
    };
    Ok(match value_type {
        ValueType::Container => {
            let flag = element
                .attribute("flag")
                .ok_or_else(|| missing("attribute 'flag'", element))?;
            Value::Container(ContinuityOfContent::from_defined_term(flag).ok_or_else(|| {
                Error::UnsupportedValue(format!("continuity of content '{flag}'"))
            })?)
        }
        ValueType::Text => Value::Text(text()),
        ValueType::Date => Value::Date(text()),
        ValueType::Time => Value::Time(text()),
        ValueType::DateTime => Value::DateTime(text()),
        ValueType::UidRef => Value::UidRef(text()),
        ValueType::PName => Value::PName(text()),
        ValueType::Code => Value::Code(match value {
            Some(value) if value.attribute("value").is_some() => Some(read_code(value)?),
            _ => None,
        }),
        ValueType::Num => Value::Num(NumericMeasurement {
            value: text().trim().to_string(),
            unit: child(element, "unit")
                .map(read_code)
                .transpose()?
                .unwrap_or_default(),
            qualifier: child(element, "qualifier").map(read_code).transpose()?,
        }),
        ValueType::Image => Value::Image(ImageReference {
            sop: sop()?,
            frames: read_numbers(value.and_then(|value| child(value, "frames")))?,
            segments: read_numbers(value.and_then(|value| child(value, "segments")))?,
            presentation_state: value
                .and_then(|value| child(value, "pstate"))
                .map(read_sop)
                .transpose()?,
        }),
        ValueType::Waveform => Value::Waveform(WaveformReference {
            sop: sop()?,
            channels: read_numbers(value.and_then(|value| child(value, "channels")))?,
        }),
        ValueType::Composite => Value::Composite(sop()?),
        ValueType::Reference => {
            let position = text();
            if position.is_empty() {
                return Err(missing("<value>", element));
            }
            Value::Reference(ReferenceTarget::to_position(position.trim()))
        }
        ValueType::Unknown => Value::Unknown(element.tag_name().name().to_string()),
    })
}

fn read_template(element: Node) -> Result<TemplateIdentification, Error> {
    Ok(TemplateIdentification {
        identifier: element
            .attribute("tid")
            .ok_or_else(|| missing("attribute 'tid'", element))?
            .to_string(),
        mapping_resource: element
            .attribute("resource")
            .ok_or_else(|| missing("attribute 'resource'", element))?
            .to_string(),
        mapping_resource_uid: element.attribute("uid").map(str::to_string),
    })
}

struct Reader<'a> {
    builder: TreeBuilder<'a>,
    options: &'a XmlOptions,
}

impl Reader<'_> {
    fn is_item(&self, node: Node) -> bool {
        node.is_element()
            && !DESCRIPTIVE.contains(&node.tag_name().name())
            && (self.options.template_element_encloses_items || !node.has_tag_name("template"))
    }

    fn content_item(
        &self,
        element: Node,
        template: Option<Node>,
        value_type: ValueType,
        position: &str,
        invalid: &mut bool,
    ) -> Result<ContentItem, Error> {
        let value = self
            .builder
            .tolerate(position, read_value(element, value_type), invalid)?
            .unwrap_or_else(|| Value::empty(value_type));
        let mut content = ContentItem::with_value(value);
        if value_type == ValueType::Reference {
            return Ok(content);
        }
        if let Some(concept) = child(element, "concept") {
            if let Some(name) = self.builder.tolerate(position, read_code(concept), invalid)? {
                content.set_concept_name(name, false)?;
            }
        }
        if let Some(text) = child(element, "observation").and_then(|node| node.text()) {
            content.set_observation_date_time(text.trim(), false)?;
        }
        let template = template.or_else(|| {
            (!self.options.template_element_encloses_items)
                .then(|| child(element, "template"))
                .flatten()
        });
        if let Some(template) = template {
            let template = self
                .builder
                .tolerate(position, read_template(template), invalid)?;
            if let Some(template) = template {
                let stored = content.set_template(template);
                self.builder.tolerate(position, stored, invalid)?;
            }
        }
        Ok(content)
    }

    fn read_item(
        &mut self,
        element: Node,
        parent: Option<NodeId>,
        position: &str,
    ) -> Result<(), Error> {
        let (element, template) =
            if self.options.template_element_encloses_items && element.has_tag_name("template") {
                let item = element
                    .children()
                    .find(|node| node.is_element())
                    .ok_or_else(|| missing("content item", element))?;
                (item, Some(element))
            } else {
                (element, None)
            };

        let value_type =
            ValueType::from_xml_name(element.tag_name().name()).unwrap_or(ValueType::Unknown);
        let relationship = match parent {
            None => RelationshipType::IsRoot,
            Some(_) => {
                let term = element
                    .attribute("relationship")
                    .ok_or_else(|| missing("attribute 'relationship'", element))?;
                self.builder.relationship(term, position)?
            }
        };
        let value_type = self
            .builder
            .check_item(parent, relationship, value_type, position)?;

        let mut invalid = false;
        let content = self.content_item(element, template, value_type, position, &mut invalid)?;
        let Some(id) = self.builder.add(
            parent,
            relationship,
            content,
            Signatures::default(),
            invalid,
            position,
        )?
        else {
            return Ok(());
        };

        let children: Vec<Node> = element.children().filter(|node| self.is_item(*node)).collect();
        for (index, child) in children.into_iter().enumerate() {
            let child_position = format!("{position}.{}", index + 1);
            self.read_item(child, Some(id), &child_position)?;
        }
        Ok(())
    }
}

/// Reads the content tree from the `<content>` element of `document`.
///
/// By-reference targets are left unresolved.
pub(crate) fn read_tree(
    document: &str,
    checker: Option<ConstraintChecker>,
    read_options: &ReadOptions,
    xml_options: &XmlOptions,
) -> Result<DocumentSubTree, Error> {
    let document =
        roxmltree::Document::parse(document).map_err(|e| Error::CorruptedInput(e.to_string()))?;
    let content = document
        .descendants()
        .find(|node| node.has_tag_name("content"))
        .ok_or_else(|| Error::MissingMandatoryAttribute("<content> element".to_string()))?;
    let mut reader = Reader {
        builder: TreeBuilder::new(checker, read_options),
        options: xml_options,
    };
    let root = content
        .children()
        .find(|node| reader.is_item(*node))
        .ok_or_else(|| Error::MissingMandatoryAttribute("root content item".to_string()))?;
    reader.read_item(root, None, "1")?;
    Ok(reader.builder.finish())
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::{AddMode, DocumentType};

    fn name(value: &str) -> Option<CodedEntry> {
        Some(CodedEntry::new(value, "99TEST", format!("Concept {value}")))
    }

    fn to_xml(tree: &DocumentSubTree, options: &XmlOptions) -> String {
        let mut writer = XmlWriter::default();
        write_tree(tree, options, &mut writer).unwrap();
        writer.finish().unwrap()
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
        tree.current_content_item()
            .unwrap()
            .set_template_identification(TemplateIdentification::dcmr("2000"))
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
            .set_string_value("a < b & c", true)
            .unwrap();
        tree
    }

    #[test]
    fn escapes_text() {
        let xml = to_xml(&sample(), &XmlOptions::default());
        assert!(xml.contains("a &lt; b &amp; c"), "{xml}");
        assert!(xml.contains("relationship=\"CONTAINS\""), "{xml}");
        assert!(
            xml.contains("<template resource=\"DCMR\" uid=\"1.2.840.10008.8.1.1\" tid=\"2000\"/>"),
            "{xml}"
        );
    }

    #[test_case(false ; "template inside item")]
    #[test_case(true ; "template encloses item")]
    fn reads_what_it_writes(encloses: bool) {
        let options = XmlOptions {
            template_element_encloses_items: encloses,
            ..XmlOptions::default()
        };
        let tree = sample();
        let xml = to_xml(&tree, &options);
        let read = read_tree(&xml, None, &ReadOptions::default(), &options).unwrap();
        let expected: Vec<_> = tree.iter().map(|node| node.content().clone()).collect();
        let actual: Vec<_> = read.iter().map(|node| node.content().clone()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn malformed_xml_is_corrupted_input() {
        let err = read_tree(
            "<content><container>",
            None,
            &ReadOptions::default(),
            &XmlOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::CorruptedInput(_)), "{err}");
    }

    #[test]
    fn unknown_element_is_kept_when_lenient() {
        let xml = r#"<content>
            <container flag="SEPARATE">
                <concept value="r" scheme="99TEST" meaning="R"/>
                <table relationship="CONTAINS">
                    <concept value="x" scheme="99TEST" meaning="X"/>
                </table>
            </container>
        </content>"#;
        let options = XmlOptions::default();
        assert!(read_tree(xml, None, &ReadOptions::default(), &options).is_err());
        let tree = read_tree(xml, None, &ReadOptions::lenient(), &options).unwrap();
        assert_eq!(tree.count_nodes(), 2);
        assert!(!tree.is_valid_document_tree(RelationshipType::IsRoot));
    }

    #[test]
    fn root_of_wrong_type_is_read_as_container_when_lenient() {
        let xml = r#"<content>
            <text>
                <concept value="r" scheme="99TEST" meaning="R"/>
                <value>not a container</value>
                <text relationship="CONTAINS">
                    <concept value="t" scheme="99TEST" meaning="T"/>
                    <value>finding</value>
                </text>
            </text>
        </content>"#;
        let options = XmlOptions::default();
        let err = read_tree(xml, None, &ReadOptions::default(), &options).unwrap_err();
        assert!(matches!(err, Error::InvalidDocumentTree), "{err}");

        let tree = read_tree(xml, None, &ReadOptions::lenient(), &options).unwrap();
        assert_eq!(tree.count_nodes(), 2);
        let root = tree.root().unwrap().content();
        assert_eq!(root.value_type(), ValueType::Container);
    }
}
