use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        values::{self, ContinuityOfContent, ImageReference, NumericMeasurement, SopReference},
        CodedEntry, TreeNode, Value, ValueType, WaveformReference,
    },
    Error,
};

/// Mapping resource of the DICOM content mapping resource.
pub const DCMR: &str = "DCMR";

/// UID of the DICOM content mapping resource.
pub const DCMR_UID: &str = "1.2.840.10008.8.1.1";

/// Identifies the template a content item (usually a container) was built
/// from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemplateIdentification {
    /// Template identifier, e.g. `"1600"`.
    pub identifier: String,
    /// Mapping resource, e.g. `"DCMR"`.
    pub mapping_resource: String,
    /// Mapping resource UID, optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_resource_uid: Option<String>,
}

impl TemplateIdentification {
    /// Identification of a template from the DICOM content mapping resource.
    pub fn dcmr(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            mapping_resource: DCMR.to_string(),
            mapping_resource_uid: Some(DCMR_UID.to_string()),
        }
    }

    /// Whether this is the given DCMR template.
    #[must_use]
    pub fn is_dcmr(&self, identifier: &str) -> bool {
        self.identifier == identifier && self.mapping_resource == DCMR
    }

    /// Checks that identifier and mapping resource are either both present or
    /// both absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] otherwise.
    pub fn check(&self) -> Result<(), Error> {
        if self.identifier.is_empty() != self.mapping_resource.is_empty() {
            return Err(Error::InvalidValue(
                "template identifier and mapping resource must be given together".to_string(),
            ));
        }
        match &self.mapping_resource_uid {
            Some(uid) if !values::is_valid_uid(uid) => Err(Error::InvalidValue(format!(
                "'{uid}' is not a valid mapping resource UID"
            ))),
            _ => Ok(()),
        }
    }
}

/// The payload-carrying part of a tree node.
///
/// The value type is fixed at construction; the typed setters fail with
/// [`Error::InvalidValueForType`] when used on an item of another type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    concept_name: Option<CodedEntry>,
    value: Value,
    observation_date_time: Option<String>,
    annotation: Option<String>,
    template: Option<TemplateIdentification>,
}

impl ContentItem {
    /// Creates an empty content item of the given type.
    #[must_use]
    pub fn new(value_type: ValueType) -> Self {
        Self::with_value(Value::empty(value_type))
    }

    pub(crate) const fn with_value(value: Value) -> Self {
        Self {
            concept_name: None,
            value,
            observation_date_time: None,
            annotation: None,
            template: None,
        }
    }

    /// The value type.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value.value_type()
    }

    /// The payload.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// The concept name, if set.
    #[must_use]
    pub const fn concept_name(&self) -> Option<&CodedEntry> {
        self.concept_name.as_ref()
    }

    /// The observation date/time, if set.
    #[must_use]
    pub fn observation_date_time(&self) -> Option<&str> {
        self.observation_date_time.as_deref()
    }

    /// The annotation text, if set. Annotations are in-memory only.
    #[must_use]
    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    /// The template identification, if set.
    #[must_use]
    pub const fn template_identification(&self) -> Option<&TemplateIdentification> {
        self.template.as_ref()
    }

    /// The string payload of string-valued items.
    #[must_use]
    pub fn string_value(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// The code payload of CODE items.
    #[must_use]
    pub const fn code_value(&self) -> Option<&CodedEntry> {
        match &self.value {
            Value::Code(code) => code.as_ref(),
            _ => None,
        }
    }

    /// The measurement of NUM items.
    #[must_use]
    pub const fn numeric_value(&self) -> Option<&NumericMeasurement> {
        match &self.value {
            Value::Num(measurement) => Some(measurement),
            _ => None,
        }
    }

    /// The image reference of IMAGE items.
    #[must_use]
    pub const fn image_reference(&self) -> Option<&ImageReference> {
        match &self.value {
            Value::Image(image) => Some(image),
            _ => None,
        }
    }

    /// Whether the concept name is mandatory for this item.
    ///
    /// Items holding a plain value need a concept name. Containers need one
    /// only as the document root; references to other objects and
    /// by-reference items may go without.
    #[must_use]
    pub const fn requires_concept_name(&self, is_root: bool) -> bool {
        match self.value_type() {
            ValueType::Reference
            | ValueType::Image
            | ValueType::Waveform
            | ValueType::Composite => false,
            ValueType::Container => is_root,
            _ => true,
        }
    }

    /// Checks concept name, payload and template identification.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn check(&self, is_root: bool) -> Result<(), Error> {
        match &self.concept_name {
            Some(name) => name.check()?,
            None if self.requires_concept_name(is_root) => {
                return Err(Error::InvalidValue(format!(
                    "{} content item without concept name",
                    self.value_type()
                )));
            }
            None => {}
        }
        self.value.check()?;
        self.template
            .as_ref()
            .map_or(Ok(()), TemplateIdentification::check)
    }

    pub(crate) fn set_concept_name(&mut self, name: CodedEntry, check: bool) -> Result<(), Error> {
        if check {
            name.check()?;
        }
        self.concept_name = (!name.is_empty()).then_some(name);
        Ok(())
    }

    pub(crate) fn set_observation_date_time(
        &mut self,
        value: impl Into<String>,
        check: bool,
    ) -> Result<(), Error> {
        let value = value.into();
        if check && !value.is_empty() && !values::is_valid_date_time(&value) {
            return Err(Error::InvalidValue(format!(
                "'{value}' is not a valid observation date/time"
            )));
        }
        self.observation_date_time = (!value.is_empty()).then_some(value);
        Ok(())
    }

    pub(crate) fn set_annotation(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.annotation = (!text.is_empty()).then_some(text);
    }

    pub(crate) fn set_template(&mut self, template: TemplateIdentification) -> Result<(), Error> {
        template.check()?;
        self.template = (!template.identifier.is_empty()).then_some(template);
        Ok(())
    }

    pub(crate) const fn template_mut(&mut self) -> Option<&mut TemplateIdentification> {
        self.template.as_mut()
    }

    pub(crate) fn set_value(&mut self, value: Value, check: bool) -> Result<(), Error> {
        let actual = self.value_type();
        if value.value_type() != actual {
            return Err(Error::InvalidValueForType {
                requested: value.value_type(),
                actual,
            });
        }
        if check {
            value.check()?;
        }
        self.value = value;
        Ok(())
    }

    pub(crate) fn set_string_value(&mut self, value: String, check: bool) -> Result<(), Error> {
        let value = match self.value_type() {
            ValueType::Text => Value::Text(value),
            ValueType::Date => Value::Date(value),
            ValueType::Time => Value::Time(value),
            ValueType::DateTime => Value::DateTime(value),
            ValueType::UidRef => Value::UidRef(value),
            ValueType::PName => Value::PName(value),
            actual => {
                return Err(Error::InvalidValueForType {
                    requested: ValueType::Text,
                    actual,
                });
            }
        };
        self.set_value(value, check)
    }

    pub(crate) const fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }
}

/// Mutable view of the content item at the cursor.
///
/// Only the payload, concept name and descriptive attributes can be changed
/// through the view, never the value type or the tree topology.
#[derive(Debug)]
pub struct ContentItemMut<'a> {
    node: &'a mut TreeNode,
}

impl<'a> ContentItemMut<'a> {
    pub(crate) const fn new(node: &'a mut TreeNode) -> Self {
        Self { node }
    }

    /// Sets the concept name.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidValue`] if `check` is set and the code is
    /// malformed.
    pub fn set_concept_name(
        &mut self,
        name: impl Into<CodedEntry>,
        check: bool,
    ) -> Result<(), Error> {
        self.node.content_mut().set_concept_name(name.into(), check)
    }

    /// Sets the value of a TEXT, DATE, TIME, DATETIME, UIDREF or PNAME item.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidValueForType`] on other value types, or with
    /// [`Error::InvalidValue`] if `check` is set and the value is malformed.
    pub fn set_string_value(&mut self, value: impl Into<String>, check: bool) -> Result<(), Error> {
        self.node.content_mut().set_string_value(value.into(), check)
    }

    /// Sets the value of a CODE item.
    ///
    /// # Errors
    ///
    /// See [`Self::set_string_value`].
    pub fn set_code_value(
        &mut self,
        code: impl Into<CodedEntry>,
        check: bool,
    ) -> Result<(), Error> {
        self.node
            .content_mut()
            .set_value(Value::Code(Some(code.into())), check)
    }

    /// Sets the value of a NUM item.
    ///
    /// # Errors
    ///
    /// See [`Self::set_string_value`].
    pub fn set_numeric_value(
        &mut self,
        measurement: NumericMeasurement,
        check: bool,
    ) -> Result<(), Error> {
        self.node
            .content_mut()
            .set_value(Value::Num(measurement), check)
    }

    /// Sets the value of an IMAGE item.
    ///
    /// # Errors
    ///
    /// See [`Self::set_string_value`].
    pub fn set_image_reference(&mut self, image: ImageReference, check: bool) -> Result<(), Error> {
        self.node.content_mut().set_value(Value::Image(image), check)
    }

    /// Sets the value of a WAVEFORM item.
    ///
    /// # Errors
    ///
    /// See [`Self::set_string_value`].
    pub fn set_waveform_reference(
        &mut self,
        waveform: WaveformReference,
        check: bool,
    ) -> Result<(), Error> {
        self.node
            .content_mut()
            .set_value(Value::Waveform(waveform), check)
    }

    /// Sets the value of a COMPOSITE item.
    ///
    /// # Errors
    ///
    /// See [`Self::set_string_value`].
    pub fn set_composite_reference(&mut self, sop: SopReference, check: bool) -> Result<(), Error> {
        self.node.content_mut().set_value(Value::Composite(sop), check)
    }

    /// Sets the continuity of a CONTAINER item.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidValueForType`] on other value types.
    pub fn set_continuity_of_content(
        &mut self,
        continuity: ContinuityOfContent,
    ) -> Result<(), Error> {
        self.node
            .content_mut()
            .set_value(Value::Container(continuity), false)
    }

    /// Sets the observation date/time.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidValue`] if `check` is set and the value is
    /// not a valid DT.
    pub fn set_observation_date_time(
        &mut self,
        value: impl Into<String>,
        check: bool,
    ) -> Result<(), Error> {
        self.node
            .content_mut()
            .set_observation_date_time(value, check)
    }

    /// Sets the annotation text (in-memory only, never serialized).
    pub fn set_annotation_text(&mut self, text: impl Into<String>) {
        self.node.content_mut().set_annotation(text);
    }

    /// Sets the template identification.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidValue`] if the identification is
    /// incomplete.
    pub fn set_template_identification(
        &mut self,
        template: TemplateIdentification,
    ) -> Result<(), Error> {
        self.node.content_mut().set_template(template)
    }

    /// Marks or unmarks the item.
    pub const fn set_mark(&mut self, mark: bool) {
        self.node.set_mark(mark);
    }
}

impl Deref for ContentItemMut<'_> {
    type Target = ContentItem;

    fn deref(&self) -> &Self::Target {
        self.node.content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setter_rejects_other_value_type() {
        let mut item = ContentItem::new(ValueType::Code);
        let err = item
            .set_string_value("text".to_string(), false)
            .expect_err("code items hold no string");
        match err {
            Error::InvalidValueForType { actual, .. } => assert_eq!(actual, ValueType::Code),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn checked_date_rejects_garbage() {
        let mut item = ContentItem::new(ValueType::Date);
        assert!(item.set_string_value("2024-13-01".to_string(), true).is_err());
        assert_eq!(item.string_value(), Some(""));
        item.set_string_value("20240101".to_string(), true).unwrap();
        assert_eq!(item.string_value(), Some("20240101"));
    }

    #[test]
    fn unchecked_setter_accepts_anything() {
        let mut item = ContentItem::new(ValueType::UidRef);
        item.set_string_value("not a uid".to_string(), false)
            .unwrap();
        assert!(item.check(false).is_err());
    }

    #[test]
    fn non_root_container_needs_no_concept_name() {
        let item = ContentItem::new(ValueType::Container);
        assert!(item.check(false).is_ok());
        assert!(item.check(true).is_err());
    }

    #[test]
    fn incomplete_template_identification_is_rejected() {
        let mut item = ContentItem::new(ValueType::Container);
        let template = TemplateIdentification {
            identifier: "1600".to_string(),
            ..TemplateIdentification::default()
        };
        assert!(item.set_template(template).is_err());
        assert!(item.set_template(TemplateIdentification::dcmr("1600")).is_ok());
    }
}
