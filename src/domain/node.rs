use std::{
    fmt,
    num::NonZeroUsize,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{
    domain::{ContentItem, RelationshipType},
    storage::Dataset,
};

static NEXT_NODE_ID: AtomicUsize = AtomicUsize::new(1);

/// Identifier of a tree node.
///
/// Identifiers are unique for the lifetime of the process, so nodes keep
/// their identifier when a subtree is moved into another tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(NonZeroUsize);

impl NodeId {
    pub(crate) fn next() -> Self {
        let id = NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed);
        Self(NonZeroUsize::MIN.saturating_add(id - 1))
    }

    /// The numeric value of the identifier.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// MAC parameters and digital signatures attached to a content item.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signatures {
    /// Items of the MAC Parameters Sequence.
    pub mac_parameters: Vec<Dataset>,
    /// Items of the Digital Signatures Sequence.
    pub digital_signatures: Vec<Dataset>,
}

impl Signatures {
    /// Whether there is nothing to write.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mac_parameters.is_empty() && self.digital_signatures.is_empty()
    }
}

/// A node of a document tree: a content item plus its position in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    id: NodeId,
    relationship: RelationshipType,
    content: ContentItem,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    reference_target: bool,
    mark: bool,
    signatures: Signatures,
}

impl TreeNode {
    pub(crate) fn new(relationship: RelationshipType, content: ContentItem) -> Self {
        Self {
            id: NodeId::next(),
            relationship,
            content,
            parent: None,
            children: Vec::new(),
            reference_target: false,
            mark: false,
            signatures: Signatures::default(),
        }
    }

    /// The node identifier.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) const fn set_id(&mut self, id: NodeId) {
        self.id = id;
    }

    /// The relationship to the parent.
    #[must_use]
    pub const fn relationship(&self) -> RelationshipType {
        self.relationship
    }

    pub(crate) const fn set_relationship(&mut self, relationship: RelationshipType) {
        self.relationship = relationship;
    }

    /// The content item.
    #[must_use]
    pub const fn content(&self) -> &ContentItem {
        &self.content
    }

    pub(crate) const fn content_mut(&mut self) -> &mut ContentItem {
        &mut self.content
    }

    /// The parent node, `None` for top-level nodes.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The children in document order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether a by-reference relationship points at this node.
    ///
    /// Refreshed by every reference check.
    #[must_use]
    pub const fn is_reference_target(&self) -> bool {
        self.reference_target
    }

    pub(crate) const fn set_reference_target(&mut self, target: bool) {
        self.reference_target = target;
    }

    /// Whether the node is marked (e.g. for signing).
    #[must_use]
    pub const fn is_marked(&self) -> bool {
        self.mark
    }

    pub(crate) const fn set_mark(&mut self, mark: bool) {
        self.mark = mark;
    }

    /// Signatures read with or attached to the node.
    #[must_use]
    pub const fn signatures(&self) -> &Signatures {
        &self.signatures
    }

    pub(crate) fn set_signatures(&mut self, signatures: Signatures) {
        self.signatures = signatures;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValueType;

    #[test]
    fn node_ids_are_unique() {
        let a = TreeNode::new(RelationshipType::Contains, ContentItem::new(ValueType::Text));
        let b = TreeNode::new(RelationshipType::Contains, ContentItem::new(ValueType::Text));
        assert_ne!(a.id(), b.id());
        assert!(a.id().get() > 0);
    }
}
