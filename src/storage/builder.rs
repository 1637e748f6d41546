//! Assembles a content tree from an input form, applying the read options.

use tracing::{debug, trace, warn};

use crate::{
    domain::{
        ConstraintChecker, ContentItem, DocumentSubTree, NodeId, ReadOptions, RelationshipType,
        Signatures, TreeNode, ValueType,
    },
    Error,
};

pub(crate) struct TreeBuilder<'a> {
    tree: DocumentSubTree,
    options: &'a ReadOptions,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(checker: Option<ConstraintChecker>, options: &'a ReadOptions) -> Self {
        Self {
            tree: DocumentSubTree::with_checker(checker),
            options,
        }
    }

    /// Passes `result` through, or logs the error, flags the item as invalid
    /// and yields `None` when content item errors are downgraded.
    pub(crate) fn tolerate<T>(
        &self,
        position: &str,
        result: Result<T, Error>,
        invalid: &mut bool,
    ) -> Result<Option<T>, Error> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(error) if self.options.ignore_content_item_errors => {
                warn!(%position, "{error}");
                *invalid = true;
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    /// Maps a relationship defined term, tolerating unknown terms if content
    /// item errors are downgraded.
    pub(crate) fn relationship(
        &self,
        term: &str,
        position: &str,
    ) -> Result<RelationshipType, Error> {
        match RelationshipType::from_defined_term(term) {
            Some(relationship) => Ok(relationship),
            None if self.options.ignore_content_item_errors => {
                warn!(%position, "unknown relationship type '{term}'");
                Ok(RelationshipType::Unknown)
            }
            None => Err(Error::UnsupportedValue(format!("relationship type '{term}'"))),
        }
    }

    /// Checks the item's value type and its relationship to the parent and
    /// returns the value type the item is built with.
    ///
    /// A root of any other type than CONTAINER is read as a container if
    /// content item errors are downgraded.
    pub(crate) fn check_item(
        &self,
        parent: Option<NodeId>,
        relationship: RelationshipType,
        value_type: ValueType,
        position: &str,
    ) -> Result<ValueType, Error> {
        if parent.is_none() {
            return self.root_value_type(value_type);
        }
        if value_type == ValueType::Unknown && !self.options.ignore_content_item_errors {
            return Err(Error::UnsupportedValue(format!(
                "value type of content item {position}"
            )));
        }
        let Some(checker) = self.tree.checker() else {
            return Ok(value_type);
        };
        let Some(source) = parent
            .and_then(|id| self.tree.node(id))
            .map(|node| node.content().value_type())
        else {
            return Ok(value_type);
        };
        // by-reference targets are validated once the whole tree is read
        if matches!(value_type, ValueType::Reference | ValueType::Unknown)
            || checker.check_content_relationship(source, relationship, value_type, false)
        {
            return Ok(value_type);
        }
        if self.options.ignore_relationship_constraints {
            warn!(
                %position,
                %source,
                %relationship,
                target = %value_type,
                "relationship not allowed, ignored"
            );
            Ok(value_type)
        } else {
            Err(Error::InvalidRelationship {
                relationship,
                value_type,
            })
        }
    }

    fn root_value_type(&self, value_type: ValueType) -> Result<ValueType, Error> {
        if value_type == ValueType::Container {
            Ok(value_type)
        } else if self.options.ignore_content_item_errors {
            warn!(found = %value_type, "root content item should always be a CONTAINER");
            Ok(ValueType::Container)
        } else {
            Err(Error::InvalidDocumentTree)
        }
    }

    /// Reads the value type of the root item, which may be missing if
    /// content item errors are downgraded.
    pub(crate) fn root_value_type_or_container(
        &self,
        value_type: Result<ValueType, Error>,
    ) -> Result<ValueType, Error> {
        match value_type {
            Ok(value_type) => Ok(value_type),
            Err(error) if self.options.ignore_content_item_errors => {
                warn!(position = "1", "{error}");
                Ok(ValueType::Container)
            }
            Err(error) => Err(error),
        }
    }

    /// Stores a read content item below `parent`.
    ///
    /// Returns `None` if the item is invalid and invalid items are skipped;
    /// the caller must not read its children then.
    pub(crate) fn add(
        &mut self,
        parent: Option<NodeId>,
        relationship: RelationshipType,
        content: ContentItem,
        signatures: Signatures,
        mut invalid: bool,
        position: &str,
    ) -> Result<Option<NodeId>, Error> {
        if !invalid {
            self.tolerate(position, content.check(parent.is_none()), &mut invalid)?;
        }
        if invalid && self.options.skip_invalid_content_items && parent.is_some() {
            debug!(%position, "skipping invalid content item");
            return Ok(None);
        }
        let value_type = content.value_type();
        let mut node = TreeNode::new(relationship, content);
        node.set_signatures(signatures);
        let id = self.tree.attach(parent, node)?;
        trace!(%position, node = %id, %value_type, "read content item");
        Ok(Some(id))
    }

    pub(crate) fn finish(self) -> DocumentSubTree {
        self.tree
    }
}
