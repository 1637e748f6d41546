//! The top-level document tree.
//!
//! Adds the document type and its relationship rules to a
//! [`DocumentSubTree`], keeps the root a single `IS ROOT` container, and
//! drives reading and writing in the attribute container, XML and HTML forms.

use std::ops::Deref;

use tracing::{debug, instrument, warn};

use crate::{
    domain::{
        subtree::ReferenceCheckMode, AddMode, CodedEntry, ContentItemMut, DocumentSubTree,
        DocumentType, NodeId, ReadOptions, RelationshipType, RenderOptions, ValueType, XmlOptions,
        DCMR, DCMR_UID,
    },
    storage::{html, item_codec, xml, Dataset},
    templates::{self, Template},
    Error,
};

/// A structured report content tree of a given document type.
#[derive(Debug, Clone)]
pub struct DocumentTree {
    tree: DocumentSubTree,
    document_type: DocumentType,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new(DocumentType::default())
    }
}

impl Deref for DocumentTree {
    type Target = DocumentSubTree;

    fn deref(&self) -> &Self::Target {
        &self.tree
    }
}

impl DocumentTree {
    /// Creates an empty tree of the given type.
    #[must_use]
    pub fn new(document_type: DocumentType) -> Self {
        let checker = document_type.constraint_checker();
        if checker.is_none() {
            warn!(
                %document_type,
                "no relationship constraints for document type, checking is permissive"
            );
        }
        Self {
            tree: DocumentSubTree::with_checker(checker),
            document_type,
        }
    }

    /// The document type.
    #[must_use]
    pub const fn document_type(&self) -> DocumentType {
        self.document_type
    }

    /// Whether the tree may be written: empty, or a single root container
    /// without unsupported content items.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.tree.is_empty() || self.tree.is_valid_document_tree(RelationshipType::IsRoot)
    }

    /// Removes all content items.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    fn cursor_at_top_level(&self) -> bool {
        self.tree
            .current_node()
            .is_some_and(|node| node.parent().is_none())
    }

    /// Whether a content item could be added at the given position.
    ///
    /// An empty tree accepts only an `IS ROOT` container; below the root the
    /// document type's rules apply and the root never gets siblings.
    #[must_use]
    pub fn can_add_content_item(
        &self,
        relationship: RelationshipType,
        value_type: ValueType,
        mode: AddMode,
    ) -> bool {
        if self.tree.is_empty() {
            return relationship == RelationshipType::IsRoot && value_type == ValueType::Container;
        }
        !matches!(relationship, RelationshipType::IsRoot | RelationshipType::Unknown)
            && (mode.is_below() || !self.cursor_at_top_level())
            && self.tree.can_add_content_item(relationship, value_type, mode)
    }

    /// Adds a content item relative to the cursor and moves the cursor to it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRelationship`] if
    /// [`Self::can_add_content_item`] is false.
    pub fn add_content_item(
        &mut self,
        relationship: RelationshipType,
        value_type: ValueType,
        concept_name: Option<CodedEntry>,
        mode: AddMode,
    ) -> Result<NodeId, Error> {
        if !self.can_add_content_item(relationship, value_type, mode) {
            return Err(Error::InvalidRelationship {
                relationship,
                value_type,
            });
        }
        self.tree
            .add_content_item(relationship, value_type, concept_name, mode)
    }

    /// Adds a content item as the last child of the cursor.
    ///
    /// # Errors
    ///
    /// See [`Self::add_content_item`].
    pub fn add_child_content_item(
        &mut self,
        relationship: RelationshipType,
        value_type: ValueType,
        concept_name: Option<CodedEntry>,
    ) -> Result<NodeId, Error> {
        let mode = if self.tree.is_empty() {
            AddMode::AfterCurrent
        } else {
            AddMode::BelowCurrent
        };
        self.add_content_item(relationship, value_type, concept_name, mode)
    }

    /// Adds a by-reference relationship from the cursor to `target`.
    ///
    /// # Errors
    ///
    /// See [`DocumentSubTree::add_by_reference_relationship`].
    pub fn add_by_reference_relationship(
        &mut self,
        relationship: RelationshipType,
        target: NodeId,
    ) -> Result<NodeId, Error> {
        self.tree.add_by_reference_relationship(relationship, target)
    }

    /// Whether `tree` could be inserted at the given position.
    ///
    /// An empty document only accepts a subtree that is itself a valid
    /// document tree.
    #[must_use]
    pub fn can_insert_sub_tree(
        &self,
        tree: &DocumentSubTree,
        mode: AddMode,
        default_relationship: RelationshipType,
    ) -> bool {
        if self.tree.is_empty() {
            return tree.is_valid_document_tree(default_relationship)
                && self
                    .tree
                    .checker()
                    .is_none_or(|checker| tree.check_sub_tree_constraints(checker));
        }
        (mode.is_below() || !self.cursor_at_top_level())
            && self
                .tree
                .can_insert_sub_tree(tree, mode, default_relationship)
    }

    /// Moves the nodes of `tree` into the document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSubtree`] if [`Self::can_insert_sub_tree`] is
    /// false; neither tree is modified then.
    pub fn insert_sub_tree(
        &mut self,
        tree: &mut DocumentSubTree,
        mode: AddMode,
        default_relationship: RelationshipType,
    ) -> Result<(), Error> {
        if !self.can_insert_sub_tree(tree, mode, default_relationship) {
            return Err(Error::InvalidSubtree(format!(
                "not allowed in a {} document at this position",
                self.document_type
            )));
        }
        self.tree.insert_sub_tree(tree, mode, default_relationship)
    }

    /// Inserts the tree built by a template, recording the template
    /// identification on its first top-level item.
    ///
    /// # Errors
    ///
    /// See [`Self::insert_sub_tree`].
    pub fn insert_template<T: Template>(
        &mut self,
        template: T,
        mode: AddMode,
        default_relationship: RelationshipType,
    ) -> Result<(), Error> {
        let mut tree = templates::into_stamped_tree(template)?;
        self.insert_sub_tree(&mut tree, mode, default_relationship)
    }

    /// Removes the current content item and its descendants.
    ///
    /// # Errors
    ///
    /// See [`DocumentSubTree::remove_current_content_item`].
    pub fn remove_current_content_item(&mut self) -> Result<Option<NodeId>, Error> {
        self.tree.remove_current_content_item()
    }

    /// Moves the current content item and its descendants into a new subtree.
    ///
    /// # Errors
    ///
    /// See [`DocumentSubTree::extract_sub_tree`].
    pub fn extract_sub_tree(&mut self) -> Result<DocumentSubTree, Error> {
        self.tree.extract_sub_tree()
    }

    /// A mutable view of the content item at the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCurrentNode`] if the tree is empty.
    pub fn current_content_item(&mut self) -> Result<ContentItemMut<'_>, Error> {
        self.tree.current_content_item()
    }

    /// See [`DocumentSubTree::goto`].
    pub fn goto(&mut self, id: NodeId) -> Option<NodeId> {
        self.tree.goto(id)
    }

    /// See [`DocumentSubTree::goto_root`].
    pub fn goto_root(&mut self) -> Option<NodeId> {
        self.tree.goto_root()
    }

    /// See [`DocumentSubTree::go_up`].
    pub fn go_up(&mut self) -> Option<NodeId> {
        self.tree.go_up()
    }

    /// See [`DocumentSubTree::go_down`].
    pub fn go_down(&mut self) -> Option<NodeId> {
        self.tree.go_down()
    }

    /// See [`DocumentSubTree::go_next`].
    pub fn go_next(&mut self) -> Option<NodeId> {
        self.tree.go_next()
    }

    /// See [`DocumentSubTree::go_previous`].
    pub fn go_previous(&mut self) -> Option<NodeId> {
        self.tree.go_previous()
    }

    /// See [`DocumentSubTree::iterate`].
    pub fn iterate(&mut self, into_children: bool) -> Option<NodeId> {
        self.tree.iterate(into_children)
    }

    /// See [`DocumentSubTree::goto_position`].
    pub fn goto_position(&mut self, position: &str) -> Option<NodeId> {
        self.tree.goto_position(position)
    }

    /// See [`DocumentSubTree::goto_named_node`].
    pub fn goto_named_node(
        &mut self,
        concept_name: &CodedEntry,
        into_children: bool,
        start_from_root: bool,
    ) -> Option<NodeId> {
        self.tree
            .goto_named_node(concept_name, into_children, start_from_root)
    }

    /// Clears the mark of every content item.
    pub fn unmark_all_content_items(&mut self) {
        self.tree.unmark_all_content_items();
    }

    /// Drops all MAC parameters and digital signatures.
    pub fn remove_signatures(&mut self) {
        self.tree.remove_signatures();
    }

    /// Changes the document type.
    ///
    /// With `delete_tree` the content is discarded and the change always
    /// succeeds. Otherwise the existing content is checked against the new
    /// type's rules first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleDocumentType`] if a relationship of the
    /// current tree is not allowed by the new type; the type and the tree are
    /// kept unchanged then.
    #[instrument(skip(self), fields(from = %self.document_type))]
    pub fn change_document_type(
        &mut self,
        document_type: DocumentType,
        delete_tree: bool,
    ) -> Result<(), Error> {
        let checker = document_type.constraint_checker();
        if delete_tree {
            self.tree.clear();
        } else if let Some(checker) = checker.as_ref().filter(|_| !self.tree.is_empty()) {
            if let Some(expected) = checker.root_template_identifier() {
                self.check_root_template(expected);
            }
            if !self.tree.check_sub_tree_constraints(checker)
                || !self.tree.check_by_reference_constraints(checker)
            {
                return Err(Error::IncompatibleDocumentType(document_type.to_string()));
            }
        }
        if checker.is_none() {
            warn!(
                %document_type,
                "no relationship constraints for document type, checking is permissive"
            );
        }
        self.tree.set_checker(checker);
        self.document_type = document_type;
        Ok(())
    }

    fn check_root_template(&self, expected: &str) {
        let template = self
            .tree
            .root()
            .and_then(|root| root.content().template_identification());
        match template {
            Some(template) if template.identifier == expected => {
                if template.mapping_resource != DCMR {
                    warn!(
                        resource = %template.mapping_resource,
                        "incorrect mapping resource for root template TID {expected}"
                    );
                } else if template
                    .mapping_resource_uid
                    .as_deref()
                    .is_some_and(|uid| uid != DCMR_UID)
                {
                    warn!("incorrect mapping resource UID for root template TID {expected}");
                }
            }
            Some(template) => warn!(
                found = %template.identifier,
                "incorrect root template identifier, expected TID {expected}"
            ),
            None => warn!("missing root template identification, expected TID {expected}"),
        }
    }

    fn prepare_for_output(&mut self) -> Result<(), Error> {
        if !self.is_valid() || self.tree.is_empty() {
            return Err(Error::InvalidDocumentTree);
        }
        let issues = self
            .tree
            .check_by_reference_relationships(ReferenceCheckMode::UpdatePositionString);
        if let Some(issue) = issues.into_iter().next() {
            return Err(issue.into());
        }
        self.tree.update_tree_for_output();
        Ok(())
    }

    fn adopt(&mut self, mut tree: DocumentSubTree) {
        for issue in tree.check_by_reference_relationships(ReferenceCheckMode::UpdateNodeId) {
            warn!("{}", Error::from(issue));
        }
        tree.goto_root();
        self.tree = tree;
    }

    /// Reads the content tree from a dataset.
    ///
    /// The current tree is cleared before reading, so it stays empty if
    /// reading fails. By-reference relationships are resolved after all
    /// content items are read and unresolvable ones are reported as warnings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingMandatoryAttribute`], [`Error::CorruptedInput`],
    /// [`Error::InvalidRelationship`] or [`Error::UnsupportedValue`] for
    /// malformed input and [`Error::InvalidDocumentTree`] for a root that is
    /// not a container, unless `options` downgrade them.
    #[instrument(skip(self, dataset, options), fields(%document_type))]
    pub fn read(
        &mut self,
        dataset: &Dataset,
        document_type: DocumentType,
        options: &ReadOptions,
    ) -> Result<(), Error> {
        self.change_document_type(document_type, true)?;
        let tree = item_codec::read_tree(dataset, self.tree.checker().cloned(), options)?;
        debug!(nodes = tree.count_nodes(), "read content tree");
        self.adopt(tree);
        Ok(())
    }

    /// Writes the content tree to a dataset.
    ///
    /// Marked content items are additionally copied to `marked` in document
    /// order. Nothing is written if the tree is invalid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocumentTree`] for an empty or invalid tree and
    /// [`Error::DanglingReference`] / [`Error::InvalidByReference`] for
    /// broken by-reference relationships.
    #[instrument(skip_all, fields(document_type = %self.document_type))]
    pub fn write(
        &mut self,
        dataset: &mut Dataset,
        marked: Option<&mut Vec<Dataset>>,
    ) -> Result<(), Error> {
        self.prepare_for_output()?;
        item_codec::write_tree(&self.tree, dataset, marked)
    }

    /// Reads the content tree from the `<content>` element of an XML
    /// document.
    ///
    /// As with [`Self::read`], the current tree is cleared first.
    ///
    /// # Errors
    ///
    /// See [`Self::read`]; malformed XML yields [`Error::CorruptedInput`].
    #[instrument(skip_all, fields(document_type = %self.document_type))]
    pub fn read_xml(
        &mut self,
        document: &str,
        read_options: &ReadOptions,
        xml_options: &XmlOptions,
    ) -> Result<(), Error> {
        let document_type = self.document_type;
        self.change_document_type(document_type, true)?;
        let tree = xml::read_tree(
            document,
            self.tree.checker().cloned(),
            read_options,
            xml_options,
        )?;
        self.adopt(tree);
        Ok(())
    }

    /// Writes the content tree as a `<content>` XML element.
    ///
    /// # Errors
    ///
    /// See [`Self::write`].
    #[instrument(skip_all, fields(document_type = %self.document_type))]
    pub fn write_xml(&mut self, options: &XmlOptions) -> Result<String, Error> {
        self.prepare_for_output()?;
        let mut writer = xml::XmlWriter::default();
        xml::write_tree(&self.tree, options, &mut writer)?;
        writer.finish()
    }

    /// Renders the content tree as an HTML document.
    ///
    /// # Errors
    ///
    /// See [`Self::write`].
    #[instrument(skip_all, fields(document_type = %self.document_type))]
    pub fn render_html(&mut self, options: &RenderOptions) -> Result<String, Error> {
        self.prepare_for_output()?;
        Ok(html::render(&self.tree, self.document_type, options))
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::TemplateIdentification;

    fn name(value: &str) -> Option<CodedEntry> {
        Some(CodedEntry::new(value, "99TEST", format!("Concept {value}")))
    }

    fn report(document_type: DocumentType) -> DocumentTree {
        let mut tree = DocumentTree::new(document_type);
        tree.add_content_item(
            RelationshipType::IsRoot,
            ValueType::Container,
            name("report"),
            AddMode::AfterCurrent,
        )
        .unwrap();
        tree
    }

    #[test_case(DocumentType::BasicTextSR)]
    #[test_case(DocumentType::ComprehensiveSR)]
    #[test_case(DocumentType::ExtensibleSR)]
    #[test_case(DocumentType::KeyObjectSelectionDocument)]
    fn empty_tree_is_valid(document_type: DocumentType) {
        let tree = DocumentTree::new(document_type);
        assert!(tree.is_valid());
        assert!(tree.root().is_none());
    }

    #[test]
    fn empty_tree_only_accepts_root_container() {
        let mut tree = DocumentTree::new(DocumentType::ComprehensiveSR);
        assert!(!tree.can_add_content_item(
            RelationshipType::Contains,
            ValueType::Container,
            AddMode::AfterCurrent
        ));
        assert!(!tree.can_add_content_item(
            RelationshipType::IsRoot,
            ValueType::Text,
            AddMode::AfterCurrent
        ));
        let err = tree
            .add_content_item(
                RelationshipType::IsRoot,
                ValueType::Text,
                name("x"),
                AddMode::AfterCurrent,
            )
            .expect_err("root must be a container");
        assert!(matches!(err, Error::InvalidRelationship { .. }));
        assert!(tree.is_empty());
    }

    #[test]
    fn root_never_gets_siblings() {
        let mut tree = report(DocumentType::ComprehensiveSR);
        let err = tree
            .add_content_item(
                RelationshipType::Contains,
                ValueType::Text,
                name("x"),
                AddMode::AfterCurrent,
            )
            .expect_err("root has no siblings");
        assert!(matches!(err, Error::InvalidRelationship { .. }));
        tree.add_child_content_item(RelationshipType::Contains, ValueType::Text, name("x"))
            .unwrap();
        assert_eq!(tree.count_nodes(), 2);
        assert!(tree.is_valid());
    }

    #[test]
    fn incompatible_document_type_is_rejected() {
        let mut tree = report(DocumentType::ComprehensiveSR);
        tree.add_child_content_item(RelationshipType::Contains, ValueType::Num, name("n"))
            .unwrap();
        let err = tree
            .change_document_type(DocumentType::BasicTextSR, false)
            .expect_err("basic text SR has no NUM");
        assert!(matches!(err, Error::IncompatibleDocumentType(_)));
        assert_eq!(tree.document_type(), DocumentType::ComprehensiveSR);
        assert_eq!(tree.count_nodes(), 2);

        tree.change_document_type(DocumentType::EnhancedSR, false)
            .unwrap();
        assert_eq!(tree.document_type(), DocumentType::EnhancedSR);
        assert_eq!(tree.count_nodes(), 2);

        tree.change_document_type(DocumentType::BasicTextSR, true)
            .unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn wrong_root_template_only_warns() {
        let mut tree = report(DocumentType::ComprehensiveSR);
        tree.current_content_item()
            .unwrap()
            .set_template_identification(TemplateIdentification::dcmr("1500"))
            .unwrap();
        tree.change_document_type(DocumentType::ChestCadSR, false)
            .unwrap();
        assert_eq!(tree.document_type(), DocumentType::ChestCadSR);
    }

    #[test]
    fn empty_tree_cannot_be_written() {
        let mut tree = DocumentTree::new(DocumentType::ComprehensiveSR);
        let mut dataset = Dataset::new();
        let err = tree
            .write(&mut dataset, None)
            .expect_err("nothing to write");
        assert!(matches!(err, Error::InvalidDocumentTree));
        assert!(dataset.is_empty());
    }

    #[test]
    fn insert_into_empty_document_needs_document_tree() {
        let mut tree = DocumentTree::new(DocumentType::ComprehensiveSR);
        let mut fragment = DocumentSubTree::new();
        fragment
            .add_content_item(
                RelationshipType::Unknown,
                ValueType::Text,
                name("t"),
                AddMode::AfterCurrent,
            )
            .unwrap();
        assert!(
            !tree.can_insert_sub_tree(&fragment, AddMode::AfterCurrent, RelationshipType::IsRoot),
        );

        let mut document = DocumentSubTree::new();
        document
            .add_content_item(
                RelationshipType::Unknown,
                ValueType::Container,
                name("r"),
                AddMode::AfterCurrent,
            )
            .unwrap();
        tree.insert_sub_tree(&mut document, AddMode::AfterCurrent, RelationshipType::IsRoot)
            .unwrap();
        assert!(tree.is_valid());
        assert_eq!(tree.root().unwrap().relationship(), RelationshipType::IsRoot);
    }
}
