//! A complete structured report object.
//!
//! [`SrDocument`] combines the common composite modules, the SR Document
//! General Module and the content tree, and reads or writes all of them from
//! one attribute container.

use tracing::{debug, info, instrument};

use crate::{
    domain::{DocumentTree, DocumentType, ReadOptions, RenderOptions, XmlOptions},
    modules::{AttributeModule, IodCommon, SrDocumentGeneralModule},
    storage::{tags, Dataset},
    Error,
};

/// A structured report document.
#[derive(Debug, Clone)]
pub struct SrDocument {
    common: IodCommon,
    general: SrDocumentGeneralModule,
    tree: DocumentTree,
}

impl Default for SrDocument {
    fn default() -> Self {
        Self::new(DocumentType::default())
    }
}

impl SrDocument {
    /// Creates an empty, unverified and partial document of the given type.
    #[must_use]
    pub fn new(document_type: DocumentType) -> Self {
        let mut document = Self {
            common: IodCommon::default(),
            general: SrDocumentGeneralModule::default(),
            tree: DocumentTree::new(document_type),
        };
        document.reset_general();
        document
    }

    fn reset_general(&mut self) {
        let modality = self.tree.document_type().modality();
        self.common.series_mut().assign_modality(modality);
        self.general.reset();
    }

    /// The document type.
    #[must_use]
    pub const fn document_type(&self) -> DocumentType {
        self.tree.document_type()
    }

    /// The patient, study, series, equipment and SOP common modules.
    #[must_use]
    pub const fn common(&self) -> &IodCommon {
        &self.common
    }

    /// The common modules, mutable.
    pub const fn common_mut(&mut self) -> &mut IodCommon {
        &mut self.common
    }

    /// The SR Document General Module.
    #[must_use]
    pub const fn general(&self) -> &SrDocumentGeneralModule {
        &self.general
    }

    /// The SR Document General Module, mutable.
    pub const fn general_mut(&mut self) -> &mut SrDocumentGeneralModule {
        &mut self.general
    }

    /// The content tree.
    #[must_use]
    pub const fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    /// The content tree, mutable.
    pub const fn tree_mut(&mut self) -> &mut DocumentTree {
        &mut self.tree
    }

    /// Discards everything and starts over with `document_type`.
    pub fn clear(&mut self, document_type: DocumentType) {
        *self = Self::new(document_type);
    }

    /// Marks the document as complete.
    pub fn complete(&mut self, description: Option<&str>) {
        self.general.complete(description);
    }

    /// Reads a document from `dataset`.
    ///
    /// The document is replaced only if everything could be read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingMandatoryAttribute`] without a SOP Class UID,
    /// [`Error::UnsupportedValue`] for a SOP class that is not a structured
    /// report, and the errors of [`DocumentTree::read`].
    #[instrument(skip_all)]
    pub fn read(&mut self, dataset: &Dataset, options: &ReadOptions) -> Result<(), Error> {
        let sop_class = dataset
            .string(tags::SOP_CLASS_UID)
            .ok_or_else(|| {
                Error::MissingMandatoryAttribute(format!("SOP_CLASS_UID {}", tags::SOP_CLASS_UID))
            })?;
        let document_type = DocumentType::from_sop_class_uid(sop_class)
            .ok_or_else(|| Error::UnsupportedValue(format!("SOP class {sop_class}")))?;

        let mut common = IodCommon::default();
        common.read(dataset)?;
        let mut general = SrDocumentGeneralModule::default();
        general.read(dataset, true)?;
        let mut tree = DocumentTree::new(document_type);
        tree.read(dataset, document_type, options)?;

        debug!(%document_type, nodes = tree.count_nodes(), "read document");
        self.common = common;
        self.general = general;
        self.tree = tree;
        Ok(())
    }

    /// Writes the document to `dataset`.
    ///
    /// Missing study, series and SOP instance UIDs are generated and the SOP
    /// Class UID is set from the document type before anything is written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingMandatoryAttribute`] for an empty type 1
    /// attribute and the errors of [`DocumentTree::write`].
    #[instrument(skip_all, fields(document_type = %self.document_type()))]
    pub fn write(&mut self, dataset: &mut Dataset) -> Result<(), Error> {
        let document_type = self.document_type();
        self.common.ensure_instance_uids(false);
        self.common
            .sop_common_mut()
            .set_sop_class_uid(document_type.sop_class_uid(), false)?;
        if self.common.series().modality().is_empty() {
            self.common
                .series_mut()
                .set_modality(document_type.modality(), false)?;
        }

        let mut output = Dataset::new();
        self.common.write(&mut output)?;
        self.general.write(&mut output)?;
        self.tree.write(&mut output, None)?;
        info!(
            sop_instance_uid = self.common.sop_common().sop_instance_uid(),
            "wrote document"
        );
        dataset.merge(output);
        Ok(())
    }

    /// Reads the content tree from XML, keeping the current document type
    /// and modules.
    ///
    /// # Errors
    ///
    /// See [`DocumentTree::read_xml`].
    pub fn read_xml(
        &mut self,
        document: &str,
        read_options: &ReadOptions,
        xml_options: &XmlOptions,
    ) -> Result<(), Error> {
        self.tree.read_xml(document, read_options, xml_options)
    }

    /// Writes the content tree as XML.
    ///
    /// # Errors
    ///
    /// See [`DocumentTree::write_xml`].
    pub fn write_xml(&mut self, options: &XmlOptions) -> Result<String, Error> {
        self.tree.write_xml(options)
    }

    /// Renders the content tree as HTML.
    ///
    /// # Errors
    ///
    /// See [`DocumentTree::render_html`].
    pub fn render_html(&mut self, options: &RenderOptions) -> Result<String, Error> {
        self.tree.render_html(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AddMode, CodedEntry, RelationshipType, ValueType};

    fn report() -> SrDocument {
        let mut document = SrDocument::new(DocumentType::BasicTextSR);
        let tree = document.tree_mut();
        tree.add_content_item(
            RelationshipType::IsRoot,
            ValueType::Container,
            Some(CodedEntry::new("11528-7", "LN", "Radiology Report")),
            AddMode::AfterCurrent,
        )
        .unwrap();
        tree.add_content_item(
            RelationshipType::Contains,
            ValueType::Text,
            Some(CodedEntry::new("121071", "DCM", "Finding")),
            AddMode::BelowCurrent,
        )
        .unwrap();
        tree.current_content_item()
            .unwrap()
            .set_string_value("normal", true)
            .unwrap();
        document
    }

    #[test]
    fn new_document_has_defaults() {
        let document = SrDocument::new(DocumentType::KeyObjectSelectionDocument);
        assert_eq!(document.common().series().modality(), "KO");
        assert_eq!(document.general().completion_flag(), "PARTIAL");
        assert_eq!(document.general().verification_flag(), "UNVERIFIED");
        assert_eq!(document.general().instance_number(), "1");
        assert!(!document.general().content_date().is_empty());
    }

    #[test]
    fn completing_replaces_the_description() {
        let mut document = report();
        document.complete(Some(" signed off "));
        assert_eq!(document.general().completion_flag(), "COMPLETE");
        assert_eq!(document.general().completion_flag_description(), "signed off");

        document.complete(None);
        assert_eq!(document.general().completion_flag_description(), "");

        document.clear(DocumentType::EnhancedSR);
        assert_eq!(document.general().completion_flag(), "PARTIAL");
        assert_eq!(document.common().series().modality(), "SR");
    }

    #[test]
    fn write_then_read() {
        let mut document = report();
        document
            .common_mut()
            .patient_mut()
            .set_patient_name("Doe^Jane", true)
            .unwrap();
        let mut dataset = Dataset::new();
        document.write(&mut dataset).unwrap();

        assert_eq!(
            dataset.string(tags::SOP_CLASS_UID),
            Some(DocumentType::BasicTextSR.sop_class_uid())
        );
        assert!(dataset.string(tags::SOP_INSTANCE_UID).is_some());

        let mut read = SrDocument::default();
        read.read(&dataset, &ReadOptions::default()).unwrap();
        assert_eq!(read.document_type(), DocumentType::BasicTextSR);
        assert_eq!(read.common().patient().patient_name(), "Doe^Jane");
        assert_eq!(read.common(), document.common());
        assert_eq!(read.tree().count_nodes(), 2);
    }

    #[test]
    fn unknown_sop_class_is_rejected() {
        let mut dataset = Dataset::new();
        dataset.put_string(
            tags::SOP_CLASS_UID,
            crate::storage::Vr::UI,
            "1.2.840.10008.5.1.4.1.1.2",
        );
        let mut document = report();
        let error = document.read(&dataset, &ReadOptions::default()).unwrap_err();
        assert!(matches!(error, Error::UnsupportedValue(_)));
        assert_eq!(document.tree().count_nodes(), 2);
    }

    #[test]
    fn empty_tree_is_not_written() {
        let mut document = SrDocument::new(DocumentType::ComprehensiveSR);
        let mut dataset = Dataset::new();
        assert!(matches!(
            document.write(&mut dataset),
            Err(Error::InvalidDocumentTree)
        ));
        assert!(dataset.is_empty());
    }
}
