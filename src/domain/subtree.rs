//! The cursor-based content tree.
//!
//! A [`DocumentSubTree`] owns its nodes in an arena keyed by [`NodeId`]. The
//! top level may hold several siblings, which is how template builders
//! assemble rows before splicing them into a document. A cursor designates
//! the current node; it is unset only when the tree is empty.

use std::collections::HashMap;

use petgraph::{algo::has_path_connecting, graphmap::DiGraphMap};
use tracing::{debug, instrument};

use crate::{
    domain::{
        constraints::Cardinality, AddMode, CodedEntry, ConstraintChecker, ContentItem,
        ContentItemMut, NodeId, RelationshipType, TreeNode, Value, ValueType, DCMR, DCMR_UID,
    },
    templates::{self, Template},
    Error,
};

/// How [`DocumentSubTree::check_by_reference_relationships`] resolves
/// by-reference targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceCheckMode {
    /// Resolve the stored position strings to node ids (after reading).
    UpdateNodeId,
    /// Recompute the position strings from the node ids (before writing).
    UpdatePositionString,
    /// Only refresh the reference target flags.
    ResetReferenceTargetFlag,
}

/// A problem found while checking by-reference relationships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceIssue {
    /// The target does not exist.
    Dangling {
        /// The by-reference node.
        source: NodeId,
        /// The unresolvable position.
        target: String,
    },
    /// The target is an ancestor of the referencing item.
    Cycle {
        /// The by-reference node.
        source: NodeId,
        /// The ancestor being referenced.
        target: NodeId,
    },
    /// The relationship is not admitted by the document type.
    NotAllowed {
        /// The by-reference node.
        source: NodeId,
        /// Its relationship.
        relationship: RelationshipType,
        /// Value type of the target.
        target: ValueType,
    },
}

impl From<ReferenceIssue> for Error {
    fn from(issue: ReferenceIssue) -> Self {
        match issue {
            ReferenceIssue::Dangling { source, target } => Self::DanglingReference {
                node: source,
                target,
            },
            ReferenceIssue::Cycle { source, target } => Self::InvalidByReference {
                node: source,
                reason: format!("target {target} is an ancestor"),
            },
            ReferenceIssue::NotAllowed {
                source,
                relationship,
                target,
            } => Self::InvalidByReference {
                node: source,
                reason: format!("'{relationship}' to a {target} item is not allowed"),
            },
        }
    }
}

/// A forest of content items with a cursor.
#[derive(Debug, Default)]
pub struct DocumentSubTree {
    nodes: HashMap<NodeId, TreeNode>,
    top: Vec<NodeId>,
    cursor: Option<NodeId>,
    checker: Option<ConstraintChecker>,
}

impl DocumentSubTree {
    /// Creates an empty subtree without constraint checking.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty subtree checked against the given rules.
    #[must_use]
    pub fn with_checker(checker: Option<ConstraintChecker>) -> Self {
        Self {
            checker,
            ..Self::default()
        }
    }

    /// The relationship rules, `None` if checking is permissive.
    #[must_use]
    pub const fn checker(&self) -> Option<&ConstraintChecker> {
        self.checker.as_ref()
    }

    pub(crate) fn set_checker(&mut self, checker: Option<ConstraintChecker>) {
        self.checker = checker;
    }

    /// Whether the tree holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top.is_empty()
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn count_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Removes all nodes.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.top.clear();
        self.cursor = None;
    }

    /// A node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    /// The node at the cursor.
    #[must_use]
    pub fn current_node(&self) -> Option<&TreeNode> {
        self.cursor.and_then(|id| self.nodes.get(&id))
    }

    /// The id of the node at the cursor.
    #[must_use]
    pub const fn node_id(&self) -> Option<NodeId> {
        self.cursor
    }

    /// Whether the node at the cursor has children.
    #[must_use]
    pub fn has_children(&self) -> bool {
        self.current_node()
            .is_some_and(|node| !node.children.is_empty())
    }

    /// The first top-level node.
    #[must_use]
    pub fn root(&self) -> Option<&TreeNode> {
        self.top.first().and_then(|id| self.nodes.get(id))
    }

    /// The top-level nodes in document order.
    #[must_use]
    pub fn top_level(&self) -> &[NodeId] {
        &self.top
    }

    /// All nodes in document (depth-first, pre-order) order.
    #[must_use]
    pub fn iter(&self) -> Nodes<'_> {
        Nodes {
            tree: self,
            stack: self.top.iter().rev().copied().collect(),
        }
    }

    /// A mutable view of the content item at the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCurrentNode`] if the tree is empty.
    pub fn current_content_item(&mut self) -> Result<ContentItemMut<'_>, Error> {
        let id = self.cursor.ok_or(Error::NoCurrentNode)?;
        self.nodes
            .get_mut(&id)
            .map(ContentItemMut::new)
            .ok_or(Error::NoCurrentNode)
    }

    fn siblings(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            None => &self.top,
            Some(parent) => self
                .nodes
                .get(&parent)
                .map_or(&[], |node| node.children.as_slice()),
        }
    }

    fn siblings_mut(&mut self, parent: Option<NodeId>) -> Option<&mut Vec<NodeId>> {
        match parent {
            None => Some(&mut self.top),
            Some(parent) => self.nodes.get_mut(&parent).map(|node| &mut node.children),
        }
    }

    fn index_in_siblings(&self, id: NodeId) -> Option<usize> {
        let parent = self.nodes.get(&id)?.parent;
        self.siblings(parent).iter().position(|&sibling| sibling == id)
    }

    fn sibling(&self, id: NodeId, offset: isize) -> Option<NodeId> {
        let parent = self.nodes.get(&id)?.parent;
        let index = self.index_in_siblings(id)?.checked_add_signed(offset)?;
        self.siblings(parent).get(index).copied()
    }

    fn move_to(&mut self, target: Option<NodeId>) -> Option<NodeId> {
        let target = target?;
        self.cursor = Some(target);
        Some(target)
    }

    /// Moves the cursor to the given node.
    pub fn goto(&mut self, id: NodeId) -> Option<NodeId> {
        let target = self.nodes.contains_key(&id).then_some(id);
        self.move_to(target)
    }

    /// Moves the cursor to the first top-level node.
    pub fn goto_root(&mut self) -> Option<NodeId> {
        self.move_to(self.top.first().copied())
    }

    /// Moves the cursor to the parent.
    pub fn go_up(&mut self) -> Option<NodeId> {
        let parent = self.current_node().and_then(TreeNode::parent);
        self.move_to(parent)
    }

    /// Moves the cursor to the first child.
    pub fn go_down(&mut self) -> Option<NodeId> {
        let child = self
            .current_node()
            .and_then(|node| node.children.first().copied());
        self.move_to(child)
    }

    /// Moves the cursor to the next sibling.
    pub fn go_next(&mut self) -> Option<NodeId> {
        let next = self.cursor.and_then(|id| self.sibling(id, 1));
        self.move_to(next)
    }

    /// Moves the cursor to the previous sibling.
    pub fn go_previous(&mut self) -> Option<NodeId> {
        let previous = self.cursor.and_then(|id| self.sibling(id, -1));
        self.move_to(previous)
    }

    fn following(&self, id: NodeId, into_children: bool) -> Option<NodeId> {
        let node = self.nodes.get(&id)?;
        if into_children {
            if let Some(&child) = node.children.first() {
                return Some(child);
            }
        } else {
            return self.sibling(id, 1);
        }
        let mut current = id;
        loop {
            if let Some(next) = self.sibling(current, 1) {
                return Some(next);
            }
            current = self.nodes.get(&current)?.parent?;
        }
    }

    /// Moves the cursor to the next node in document order.
    ///
    /// Without `into_children` only the following siblings are visited.
    pub fn iterate(&mut self, into_children: bool) -> Option<NodeId> {
        let next = self
            .cursor
            .and_then(|id| self.following(id, into_children));
        self.move_to(next)
    }

    /// Searches for a node with the given concept name and moves the cursor
    /// there. The search includes the node it starts from.
    pub fn goto_named_node(
        &mut self,
        concept_name: &CodedEntry,
        into_children: bool,
        start_from_root: bool,
    ) -> Option<NodeId> {
        let mut current = if start_from_root {
            self.top.first().copied()
        } else {
            self.cursor
        };
        while let Some(id) = current {
            let matches = self
                .nodes
                .get(&id)
                .and_then(|node| node.content().concept_name())
                .is_some_and(|name| name.same_code(concept_name));
            if matches {
                return self.goto(id);
            }
            current = self.following(id, into_children);
        }
        None
    }

    /// The nesting level of the cursor (1 for top-level nodes, 0 if empty).
    #[must_use]
    pub fn level(&self) -> usize {
        let mut level = 0;
        let mut current = self.cursor;
        while let Some(id) = current {
            level += 1;
            current = self.nodes.get(&id).and_then(TreeNode::parent);
        }
        level
    }

    /// The position string (e.g. `1.2.3`) of a node.
    #[must_use]
    pub fn position_of(&self, id: NodeId) -> Option<String> {
        let mut parts = Vec::new();
        let mut current = id;
        loop {
            let node = self.nodes.get(&current)?;
            parts.push((self.index_in_siblings(current)? + 1).to_string());
            match node.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        parts.reverse();
        Some(parts.join("."))
    }

    /// The position string of the cursor.
    #[must_use]
    pub fn position(&self) -> Option<String> {
        self.cursor.and_then(|id| self.position_of(id))
    }

    fn find_position(&self, position: &str) -> Option<NodeId> {
        let mut siblings = self.top.as_slice();
        let mut found = None;
        for part in position.split('.') {
            let index = part.trim().parse::<usize>().ok()?.checked_sub(1)?;
            let id = *siblings.get(index)?;
            siblings = &self.nodes.get(&id)?.children;
            found = Some(id);
        }
        found
    }

    /// Moves the cursor to the node at the given position string.
    pub fn goto_position(&mut self, position: &str) -> Option<NodeId> {
        let target = self.find_position(position);
        self.move_to(target)
    }

    fn reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.nodes
            .try_reserve(additional)
            .map_err(|_| Error::MemoryExhausted)
    }

    /// Where a new node goes: its parent and its index among the siblings.
    fn insertion_point(&self, mode: AddMode) -> (Option<NodeId>, usize) {
        let Some(cursor) = self.cursor.filter(|id| self.nodes.contains_key(id)) else {
            return (None, self.top.len());
        };
        if mode.is_below() {
            let index = match mode {
                AddMode::BelowCurrentBeforeFirstChild => 0,
                _ => self.siblings(Some(cursor)).len(),
            };
            return (Some(cursor), index);
        }
        let parent = self.nodes.get(&cursor).and_then(TreeNode::parent);
        let index = self.index_in_siblings(cursor).unwrap_or_default();
        match mode {
            AddMode::BeforeCurrent => (parent, index),
            _ => (parent, index + 1),
        }
    }

    fn can_attach(
        &self,
        parent: NodeId,
        relationship: RelationshipType,
        value_type: ValueType,
        pending: &[(RelationshipType, ValueType)],
    ) -> bool {
        if matches!(relationship, RelationshipType::Unknown | RelationshipType::IsRoot) {
            return false;
        }
        let Some(parent_node) = self.nodes.get(&parent) else {
            return false;
        };
        let Some(checker) = &self.checker else {
            return true;
        };
        let source = parent_node.content().value_type();
        if !checker.check_content_relationship(source, relationship, value_type, false) {
            return false;
        }
        match checker.cardinality(source, relationship, value_type) {
            Cardinality::Unbounded => true,
            Cardinality::ZeroOrOne => {
                let existing = parent_node.children.iter().filter_map(|id| self.nodes.get(id));
                !existing
                    .map(|node| (node.relationship(), node.content().value_type()))
                    .chain(pending.iter().copied())
                    .any(|edge| edge == (relationship, value_type))
            }
        }
    }

    /// Whether a content item could be added at the given position.
    #[must_use]
    pub fn can_add_content_item(
        &self,
        relationship: RelationshipType,
        value_type: ValueType,
        mode: AddMode,
    ) -> bool {
        if matches!(value_type, ValueType::Reference | ValueType::Unknown) {
            return false;
        }
        match self.insertion_point(mode).0 {
            None => true,
            Some(parent) => self.can_attach(parent, relationship, value_type, &[]),
        }
    }

    /// Adds a new content item relative to the cursor and moves the cursor to
    /// it. In an empty tree the item becomes the first top-level node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRelationship`] if the item is not allowed at
    /// that position, [`Error::InvalidValue`] for a malformed concept name,
    /// and [`Error::MemoryExhausted`] if the node cannot be stored.
    #[instrument(level = "trace", skip(self))]
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
        let mut content = ContentItem::new(value_type);
        if let Some(name) = concept_name {
            content.set_concept_name(name, true)?;
        }
        let (parent, index) = self.insertion_point(mode);
        let id = self.attach_at(parent, index, TreeNode::new(relationship, content))?;
        self.cursor = Some(id);
        Ok(id)
    }

    /// Adds a new content item as the last child of the cursor (or as the
    /// first node of an empty tree) and moves the cursor to it.
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
        self.add_content_item(relationship, value_type, concept_name, AddMode::BelowCurrent)
    }

    /// Adds a by-reference relationship from the cursor to `target` as the
    /// cursor's last child. The cursor does not move.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCurrentNode`] for an empty tree,
    /// [`Error::DanglingReference`] if the target does not exist and
    /// [`Error::InvalidByReference`] if the relationship is not allowed or the
    /// target is an ancestor of the cursor.
    pub fn add_by_reference_relationship(
        &mut self,
        relationship: RelationshipType,
        target: NodeId,
    ) -> Result<NodeId, Error> {
        let source = self.cursor.ok_or(Error::NoCurrentNode)?;
        let position = self.position_of(target).ok_or_else(|| Error::DanglingReference {
            node: source,
            target: target.to_string(),
        })?;
        let target_type = self
            .node(target)
            .map_or(ValueType::Unknown, |node| node.content().value_type());
        let source_type = self
            .node(source)
            .map_or(ValueType::Unknown, |node| node.content().value_type());
        if target == source || self.is_ancestor(target, source) {
            return Err(ReferenceIssue::Cycle { source, target }.into());
        }
        let allowed = target_type != ValueType::Reference
            && !matches!(relationship, RelationshipType::Unknown | RelationshipType::IsRoot)
            && self.checker.as_ref().is_none_or(|checker| {
                checker.check_content_relationship(source_type, relationship, target_type, true)
            });
        if !allowed {
            return Err(ReferenceIssue::NotAllowed {
                source,
                relationship,
                target: target_type,
            }
            .into());
        }
        let mut reference = crate::domain::ReferenceTarget::to_node(target, target_type);
        reference.position = position;
        let content = ContentItem::with_value(Value::Reference(reference));
        let index = self.siblings(Some(source)).len();
        let id = self.attach_at(Some(source), index, TreeNode::new(relationship, content))?;
        if let Some(node) = self.nodes.get_mut(&target) {
            node.set_reference_target(true);
        }
        Ok(id)
    }

    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.nodes.get(&id).and_then(TreeNode::parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.nodes.get(&parent).and_then(TreeNode::parent);
        }
        false
    }

    /// Stores a node below `parent` at `index` without any constraint
    /// checking.
    pub(crate) fn attach_at(
        &mut self,
        parent: Option<NodeId>,
        index: usize,
        mut node: TreeNode,
    ) -> Result<NodeId, Error> {
        self.reserve(1)?;
        let id = node.id();
        node.parent = parent;
        let siblings = self
            .siblings_mut(parent)
            .ok_or_else(|| Error::InvalidSubtree(format!("parent {id} not found")))?;
        siblings.try_reserve(1).map_err(|_| Error::MemoryExhausted)?;
        let index = index.min(siblings.len());
        siblings.insert(index, id);
        self.nodes.insert(id, node);
        if self.cursor.is_none() {
            self.cursor = Some(id);
        }
        Ok(id)
    }

    /// Appends a node as the last child of `parent` (or at the top level).
    pub(crate) fn attach(
        &mut self,
        parent: Option<NodeId>,
        node: TreeNode,
    ) -> Result<NodeId, Error> {
        let index = self.siblings(parent).len();
        self.attach_at(parent, index, node)
    }

    /// Removes `id` and its descendants, returning them.
    fn detach(&mut self, id: NodeId) -> HashMap<NodeId, TreeNode> {
        let parent = self.nodes.get(&id).and_then(TreeNode::parent);
        if let Some(siblings) = self.siblings_mut(parent) {
            siblings.retain(|&sibling| sibling != id);
        }
        let mut removed = HashMap::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children.iter().copied());
                removed.insert(current, node);
            }
        }
        removed
    }

    /// Where the cursor goes when the current node is removed: next sibling,
    /// else previous sibling, else parent.
    fn cursor_after_removal(&self, id: NodeId) -> Option<NodeId> {
        self.sibling(id, 1)
            .or_else(|| self.sibling(id, -1))
            .or_else(|| self.nodes.get(&id).and_then(TreeNode::parent))
    }

    /// Removes the current node and all its descendants.
    ///
    /// Returns the new cursor position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCurrentNode`] if the tree is empty.
    pub fn remove_current_content_item(&mut self) -> Result<Option<NodeId>, Error> {
        let id = self.cursor.ok_or(Error::NoCurrentNode)?;
        let next = self.cursor_after_removal(id);
        let removed = self.detach(id);
        debug!(node = %id, removed = removed.len(), "removed content item");
        self.cursor = next;
        Ok(next)
    }

    /// Moves the current node and its descendants into a new subtree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCurrentNode`] if the tree is empty.
    pub fn extract_sub_tree(&mut self) -> Result<Self, Error> {
        let id = self.cursor.ok_or(Error::NoCurrentNode)?;
        let next = self.cursor_after_removal(id);
        let mut nodes = self.detach(id);
        self.cursor = next;
        if let Some(node) = nodes.get_mut(&id) {
            node.parent = None;
        }
        Ok(Self {
            nodes,
            top: vec![id],
            cursor: Some(id),
            checker: self.checker.clone(),
        })
    }

    /// Deep copy of the current node and its descendants with fresh node ids.
    #[must_use]
    pub fn clone_sub_tree(&self) -> Option<Self> {
        let id = self.cursor?;
        Some(self.copy_with_fresh_ids(&[id]).0)
    }

    /// Copies the given top-level nodes and their descendants, allocating new
    /// ids. Returns the copy and the old-to-new id mapping.
    pub(crate) fn copy_with_fresh_ids(&self, tops: &[NodeId]) -> (Self, HashMap<NodeId, NodeId>) {
        let mut mapping = HashMap::with_capacity(self.nodes.len());
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = tops.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(&id) {
                mapping.insert(id, NodeId::next());
                order.push(id);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        let mut nodes = HashMap::with_capacity(order.len());
        for id in order {
            let Some(original) = self.nodes.get(&id) else {
                continue;
            };
            let mut node = original.clone();
            node.set_id(mapping[&id]);
            node.parent = node.parent.and_then(|parent| mapping.get(&parent).copied());
            node.children = node.children.iter().map(|child| mapping[child]).collect();
            if let Value::Reference(target) = node.content_mut().value_mut() {
                target.node = target.node.and_then(|old| mapping.get(&old).copied());
            }
            nodes.insert(node.id(), node);
        }
        let copy = Self {
            nodes,
            top: tops.iter().filter_map(|id| mapping.get(id).copied()).collect(),
            cursor: self.cursor.and_then(|id| mapping.get(&id).copied()),
            checker: self.checker.clone(),
        };
        let copy = if copy.cursor.is_none() && !copy.top.is_empty() {
            Self {
                cursor: copy.top.first().copied(),
                ..copy
            }
        } else {
            copy
        };
        (copy, mapping)
    }

    /// Whether every parent/child edge of this tree is admitted by `checker`.
    ///
    /// By-reference edges are checked by
    /// [`Self::check_by_reference_relationships`].
    #[must_use]
    pub fn check_sub_tree_constraints(&self, checker: &ConstraintChecker) -> bool {
        self.nodes.values().all(|node| {
            let Some(parent) = node.parent.and_then(|parent| self.nodes.get(&parent)) else {
                return true;
            };
            let target = node.content().value_type();
            if target == ValueType::Reference {
                return true;
            }
            let source = parent.content().value_type();
            let relationship = node.relationship();
            if !checker.check_content_relationship(source, relationship, target, false) {
                return false;
            }
            match checker.cardinality(source, relationship, target) {
                Cardinality::Unbounded => true,
                Cardinality::ZeroOrOne => {
                    parent
                        .children
                        .iter()
                        .filter_map(|id| self.nodes.get(id))
                        .filter(|sibling| {
                            sibling.relationship() == relationship
                                && sibling.content().value_type() == target
                        })
                        .count()
                        <= 1
                }
            }
        })
    }

    /// Whether every resolved by-reference relationship is admitted by
    /// `checker`.
    #[must_use]
    pub fn check_by_reference_constraints(&self, checker: &ConstraintChecker) -> bool {
        self.nodes.values().all(|node| {
            let Value::Reference(reference) = node.content().value() else {
                return true;
            };
            let source = node
                .parent
                .and_then(|parent| self.nodes.get(&parent))
                .map(|parent| parent.content().value_type());
            let target = reference
                .node
                .and_then(|target| self.nodes.get(&target))
                .map(|target| target.content().value_type());
            match (source, target) {
                (Some(source), Some(target)) => {
                    checker.check_content_relationship(source, node.relationship(), target, true)
                }
                _ => true,
            }
        })
    }

    /// Whether this tree is a complete document: one top-level container with
    /// relationship `IS ROOT` (or unknown, replaced by `default_relationship`)
    /// and no nodes of unsupported value type.
    #[must_use]
    pub fn is_valid_document_tree(&self, default_relationship: RelationshipType) -> bool {
        let [root] = self.top.as_slice() else {
            return false;
        };
        let Some(root) = self.nodes.get(root) else {
            return false;
        };
        let relationship = match root.relationship() {
            RelationshipType::Unknown => default_relationship,
            other => other,
        };
        relationship == RelationshipType::IsRoot
            && root.content().value_type() == ValueType::Container
            && self
                .nodes
                .values()
                .all(|node| node.content().value_type() != ValueType::Unknown)
    }

    /// Whether `tree` could be inserted at the given position.
    #[must_use]
    pub fn can_insert_sub_tree(
        &self,
        tree: &Self,
        mode: AddMode,
        default_relationship: RelationshipType,
    ) -> bool {
        if tree.is_empty() {
            return false;
        }
        let parent = self.insertion_point(mode).0;
        let mut pending = Vec::with_capacity(tree.top.len());
        for id in &tree.top {
            let Some(node) = tree.nodes.get(id) else {
                return false;
            };
            let value_type = node.content().value_type();
            if value_type == ValueType::Reference {
                return false;
            }
            let relationship = match node.relationship() {
                RelationshipType::Unknown => default_relationship,
                other => other,
            };
            if let Some(parent) = parent {
                if !self.can_attach(parent, relationship, value_type, &pending) {
                    return false;
                }
            }
            pending.push((relationship, value_type));
        }
        self.checker
            .as_ref()
            .is_none_or(|checker| tree.check_sub_tree_constraints(checker))
    }

    /// Moves all nodes of `tree` into this tree at the given position. Top-level
    /// nodes of `tree` with unknown relationship get `default_relationship`.
    ///
    /// On success `tree` is left empty and the cursor is on the first inserted
    /// node. Node ids are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSubtree`] if the insertion is not allowed and
    /// [`Error::MemoryExhausted`] if the nodes cannot be stored; in both cases
    /// neither tree is modified.
    #[instrument(level = "trace", skip(self, tree), fields(nodes = tree.count_nodes()))]
    pub fn insert_sub_tree(
        &mut self,
        tree: &mut Self,
        mode: AddMode,
        default_relationship: RelationshipType,
    ) -> Result<(), Error> {
        if tree.is_empty() {
            return Err(Error::InvalidSubtree("subtree is empty".to_string()));
        }
        if !self.can_insert_sub_tree(tree, mode, default_relationship) {
            return Err(Error::InvalidSubtree(
                "content items not allowed at this position".to_string(),
            ));
        }
        self.reserve(tree.nodes.len())?;
        let (parent, index) = self.insertion_point(mode);
        let siblings = self
            .siblings_mut(parent)
            .ok_or_else(|| Error::InvalidSubtree("insertion point not found".to_string()))?;
        siblings
            .try_reserve(tree.top.len())
            .map_err(|_| Error::MemoryExhausted)?;
        let index = index.min(siblings.len());
        let tops = std::mem::take(&mut tree.top);
        siblings.splice(index..index, tops.iter().copied());
        for (id, mut node) in tree.nodes.drain() {
            if node.parent.is_none() {
                node.parent = parent;
                if node.relationship() == RelationshipType::Unknown {
                    node.set_relationship(default_relationship);
                }
            }
            self.nodes.insert(id, node);
        }
        tree.cursor = None;
        self.cursor = tops.first().copied();
        Ok(())
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

    fn edge_graph(&self) -> DiGraphMap<NodeId, ()> {
        let mut graph = DiGraphMap::with_capacity(self.nodes.len(), self.nodes.len());
        for (&id, node) in &self.nodes {
            graph.add_node(id);
            for &child in &node.children {
                graph.add_edge(id, child, ());
            }
        }
        graph
    }

    /// Resolves and validates every by-reference relationship, refreshing the
    /// reference target flags.
    ///
    /// Returns the problems found; valid references are updated according to
    /// `mode` regardless.
    pub fn check_by_reference_relationships(
        &mut self,
        mode: ReferenceCheckMode,
    ) -> Vec<ReferenceIssue> {
        for node in self.nodes.values_mut() {
            node.set_reference_target(false);
        }
        let order: Vec<NodeId> = self.iter().map(TreeNode::id).collect();
        let positions: HashMap<NodeId, String> = order
            .iter()
            .filter_map(|&id| self.position_of(id).map(|position| (id, position)))
            .collect();
        let by_position: HashMap<&str, NodeId> = positions
            .iter()
            .map(|(&id, position)| (position.as_str(), id))
            .collect();
        let graph = self.edge_graph();

        let mut issues = Vec::new();
        let mut updates = Vec::new();
        for &id in &order {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let Value::Reference(reference) = node.content().value() else {
                continue;
            };
            let lookup = || by_position.get(reference.position.as_str()).copied();
            let resolved = match (mode, reference.node) {
                (ReferenceCheckMode::UpdateNodeId, _) | (_, None) => lookup(),
                // a removed target is dangling even if its old position is taken
                (_, Some(target)) => self.nodes.contains_key(&target).then_some(target),
            };
            let Some(target) = resolved else {
                issues.push(ReferenceIssue::Dangling {
                    source: id,
                    target: reference.position.clone(),
                });
                continue;
            };
            let target_type = self
                .nodes
                .get(&target)
                .map_or(ValueType::Unknown, |node| node.content().value_type());
            match node.parent {
                Some(parent)
                    if target == parent || has_path_connecting(&graph, target, parent, None) =>
                {
                    issues.push(ReferenceIssue::Cycle { source: id, target });
                }
                Some(parent) => {
                    let source_type = self
                        .nodes
                        .get(&parent)
                        .map_or(ValueType::Unknown, |node| node.content().value_type());
                    let allowed = target_type != ValueType::Reference
                        && self.checker.as_ref().is_none_or(|checker| {
                            checker.check_content_relationship(
                                source_type,
                                node.relationship(),
                                target_type,
                                true,
                            )
                        });
                    if !allowed {
                        issues.push(ReferenceIssue::NotAllowed {
                            source: id,
                            relationship: node.relationship(),
                            target: target_type,
                        });
                    }
                }
                None => issues.push(ReferenceIssue::NotAllowed {
                    source: id,
                    relationship: node.relationship(),
                    target: target_type,
                }),
            }
            updates.push((id, target, target_type));
        }

        for (id, target, target_type) in updates {
            if mode != ReferenceCheckMode::ResetReferenceTargetFlag {
                if let Some(Value::Reference(reference)) =
                    self.nodes.get_mut(&id).map(|node| node.content_mut().value_mut())
                {
                    reference.node = Some(target);
                    reference.value_type = Some(target_type);
                    if let Some(position) = positions.get(&target) {
                        reference.position.clone_from(position);
                    }
                }
            }
            if let Some(node) = self.nodes.get_mut(&target) {
                node.set_reference_target(true);
            }
        }
        issues
    }

    /// Completes the tree before it is written: fills in the DCMR mapping
    /// resource UID where a template identification lacks one.
    pub fn update_tree_for_output(&mut self) {
        for node in self.nodes.values_mut() {
            if let Some(template) = node.content_mut().template_mut() {
                if template.mapping_resource == DCMR && template.mapping_resource_uid.is_none() {
                    template.mapping_resource_uid = Some(DCMR_UID.to_string());
                }
            }
        }
    }

    /// Clears the mark of every node.
    pub fn unmark_all_content_items(&mut self) {
        for node in self.nodes.values_mut() {
            node.set_mark(false);
        }
    }

    /// Drops the MAC parameters and digital signatures of every node.
    pub fn remove_signatures(&mut self) {
        for node in self.nodes.values_mut() {
            node.set_signatures(crate::domain::Signatures::default());
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(&id)
    }
}

impl Clone for DocumentSubTree {
    /// Deep copy with fresh node ids; by-reference targets inside the tree are
    /// remapped to the copies.
    fn clone(&self) -> Self {
        self.copy_with_fresh_ids(&self.top).0
    }
}

/// Depth-first iterator over the nodes of a tree.
#[derive(Debug)]
pub struct Nodes<'a> {
    tree: &'a DocumentSubTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.nodes.get(&id)?;
        self.stack.extend(node.children.iter().rev().copied());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentType;

    fn code(value: &str) -> Option<CodedEntry> {
        Some(CodedEntry::new(value, "99TEST", format!("Concept {value}")))
    }

    /// root
    /// ├── a
    /// │   └── a1
    /// └── b
    fn sample() -> (DocumentSubTree, [NodeId; 4]) {
        let mut tree =
            DocumentSubTree::with_checker(DocumentType::ComprehensiveSR.constraint_checker());
        let root = tree
            .add_content_item(
                RelationshipType::IsRoot,
                ValueType::Container,
                code("root"),
                AddMode::AfterCurrent,
            )
            .unwrap();
        let a = tree
            .add_child_content_item(RelationshipType::Contains, ValueType::Text, code("a"))
            .unwrap();
        let a1 = tree
            .add_child_content_item(RelationshipType::HasConceptMod, ValueType::Code, code("a1"))
            .unwrap();
        tree.go_up();
        let b = tree
            .add_content_item(
                RelationshipType::Contains,
                ValueType::Num,
                code("b"),
                AddMode::AfterCurrent,
            )
            .unwrap();
        (tree, [root, a, a1, b])
    }

    #[test]
    fn positions_follow_document_order() {
        let (tree, [root, a, a1, b]) = sample();
        assert_eq!(tree.position_of(root).as_deref(), Some("1"));
        assert_eq!(tree.position_of(a).as_deref(), Some("1.1"));
        assert_eq!(tree.position_of(a1).as_deref(), Some("1.1.1"));
        assert_eq!(tree.position_of(b).as_deref(), Some("1.2"));
        let order: Vec<NodeId> = tree.iter().map(TreeNode::id).collect();
        assert_eq!(order, vec![root, a, a1, b]);
    }

    #[test]
    fn navigation() {
        let (mut tree, [root, a, a1, b]) = sample();
        assert_eq!(tree.goto_root(), Some(root));
        assert_eq!(tree.go_up(), None);
        assert_eq!(tree.node_id(), Some(root));
        assert_eq!(tree.go_down(), Some(a));
        assert_eq!(tree.go_next(), Some(b));
        assert_eq!(tree.go_next(), None);
        assert_eq!(tree.go_previous(), Some(a));
        assert_eq!(tree.iterate(true), Some(a1));
        assert_eq!(tree.level(), 3);
        assert_eq!(tree.iterate(true), Some(b));
        assert_eq!(tree.iterate(true), None);
        assert_eq!(tree.goto_position("1.1.1"), Some(a1));
        assert_eq!(tree.goto_position("1.3"), None);
        assert_eq!(tree.node_id(), Some(a1));
    }

    #[test]
    fn named_node_search() {
        let (mut tree, [_, _, a1, _]) = sample();
        let name = CodedEntry::new("a1", "99TEST", "whatever");
        assert_eq!(tree.goto_named_node(&name, true, true), Some(a1));
        tree.goto_root();
        assert_eq!(tree.goto_named_node(&name, false, true), None);
    }

    #[test]
    fn failed_add_leaves_tree_unchanged() {
        let (mut tree, [_, a, _, _]) = sample();
        tree.goto(a);
        let before = tree.count_nodes();
        let err = tree
            .add_child_content_item(RelationshipType::Contains, ValueType::Text, code("x"))
            .expect_err("text items cannot contain");
        assert!(matches!(err, Error::InvalidRelationship { .. }));
        assert_eq!(tree.count_nodes(), before);
        assert_eq!(tree.node_id(), Some(a));
    }

    #[test]
    fn remove_moves_cursor_to_sibling_then_parent() {
        let (mut tree, [root, a, _, b]) = sample();
        tree.goto(a);
        assert_eq!(tree.remove_current_content_item().unwrap(), Some(b));
        assert_eq!(tree.count_nodes(), 2);
        assert_eq!(tree.remove_current_content_item().unwrap(), Some(root));
        assert_eq!(tree.remove_current_content_item().unwrap(), None);
        assert!(tree.is_empty());
        assert!(matches!(
            tree.remove_current_content_item(),
            Err(Error::NoCurrentNode)
        ));
    }

    #[test]
    fn insert_sub_tree_keeps_ids_and_empties_donor() {
        let (mut tree, [_, a, _, _]) = sample();
        let mut donor = DocumentSubTree::new();
        let x = donor
            .add_content_item(
                RelationshipType::Unknown,
                ValueType::Code,
                code("x"),
                AddMode::AfterCurrent,
            )
            .unwrap();
        let y = donor
            .add_content_item(
                RelationshipType::Unknown,
                ValueType::Text,
                code("y"),
                AddMode::AfterCurrent,
            )
            .unwrap();
        tree.goto(a);
        tree.insert_sub_tree(&mut donor, AddMode::BelowCurrent, RelationshipType::HasObsContext)
            .unwrap();
        assert!(donor.is_empty());
        assert_eq!(donor.count_nodes(), 0);
        assert_eq!(tree.node_id(), Some(x));
        assert_eq!(tree.position_of(y).as_deref(), Some("1.1.3"));
        assert_eq!(
            tree.node(y).unwrap().relationship(),
            RelationshipType::HasObsContext
        );
    }

    #[test]
    fn rejected_insert_leaves_both_trees_unchanged() {
        let (mut tree, [_, a, _, _]) = sample();
        let mut donor = DocumentSubTree::new();
        donor
            .add_content_item(
                RelationshipType::Contains,
                ValueType::Text,
                code("x"),
                AddMode::AfterCurrent,
            )
            .unwrap();
        tree.goto(a);
        let before = tree.count_nodes();
        let err = tree
            .insert_sub_tree(&mut donor, AddMode::BelowCurrent, RelationshipType::Unknown)
            .expect_err("text cannot contain");
        assert!(matches!(err, Error::InvalidSubtree(_)));
        assert_eq!(tree.count_nodes(), before);
        assert_eq!(tree.node_id(), Some(a));
        assert_eq!(donor.count_nodes(), 1);
    }

    #[test]
    fn clone_uses_fresh_ids_and_remaps_references() {
        let (mut tree, [_, a, _, b]) = sample();
        tree.goto(b);
        tree.add_by_reference_relationship(RelationshipType::InferredFrom, a)
            .unwrap();
        let copy = tree.clone();
        assert_eq!(copy.count_nodes(), tree.count_nodes());
        assert!(copy.iter().all(|node| tree.node(node.id()).is_none()));
        let reference = copy
            .iter()
            .find_map(|node| match node.content().value() {
                Value::Reference(target) => target.node,
                _ => None,
            })
            .unwrap();
        assert_eq!(copy.position_of(reference).as_deref(), Some("1.1"));
    }

    #[test]
    fn by_reference_cycle_is_rejected() {
        let (mut tree, [root, _, a1, _]) = sample();
        tree.goto(a1);
        let err = tree
            .add_by_reference_relationship(RelationshipType::HasConceptMod, root)
            .expect_err("root is an ancestor");
        assert!(matches!(err, Error::InvalidByReference { .. }));
    }

    #[test]
    fn reference_check_flags_targets() {
        let (mut tree, [_, a, _, b]) = sample();
        tree.goto(b);
        tree.add_by_reference_relationship(RelationshipType::InferredFrom, a)
            .unwrap();
        let issues =
            tree.check_by_reference_relationships(ReferenceCheckMode::UpdatePositionString);
        assert!(issues.is_empty(), "{issues:?}");
        assert!(tree.node(a).unwrap().is_reference_target());
        assert!(!tree.node(b).unwrap().is_reference_target());
    }

    #[test]
    fn removed_reference_target_is_dangling() {
        let (mut tree, [_, a, _, b]) = sample();
        tree.goto(b);
        let reference = tree
            .add_by_reference_relationship(RelationshipType::InferredFrom, a)
            .unwrap();
        assert!(tree
            .check_by_reference_relationships(ReferenceCheckMode::UpdatePositionString)
            .is_empty());

        tree.goto(a);
        tree.remove_current_content_item().unwrap();
        // b now sits at the old position of a
        assert_eq!(tree.position_of(b).as_deref(), Some("1.1"));
        let issues =
            tree.check_by_reference_relationships(ReferenceCheckMode::UpdatePositionString);
        assert_eq!(issues.len(), 1, "{issues:?}");
        assert!(matches!(
            &issues[0],
            ReferenceIssue::Dangling { source, target } if *source == reference && target == "1.1"
        ));
        assert!(!tree.node(b).unwrap().is_reference_target());
    }

    #[test]
    fn unmarking_twice_leaves_everything_unmarked() {
        let (mut tree, [root, a, a1, b]) = sample();
        for id in [a, b] {
            tree.goto(id);
            tree.current_content_item().unwrap().set_mark(true);
        }
        assert!(tree.node(a).unwrap().is_marked());

        tree.unmark_all_content_items();
        tree.unmark_all_content_items();

        assert_eq!(tree.count_nodes(), 4);
        assert!([root, a, a1, b]
            .iter()
            .all(|&id| !tree.node(id).unwrap().is_marked()));
        assert_eq!(tree.node_id(), Some(b));
    }

    #[test]
    fn extract_moves_nodes_out() {
        let (mut tree, [_, a, a1, b]) = sample();
        tree.goto(a);
        let extracted = tree.extract_sub_tree().unwrap();
        assert_eq!(extracted.count_nodes(), 2);
        assert_eq!(extracted.position_of(a1).as_deref(), Some("1.1"));
        assert_eq!(tree.node_id(), Some(b));
        assert_eq!(tree.position_of(b).as_deref(), Some("1.1"));
    }

    #[test]
    fn document_tree_validity() {
        let (tree, _) = sample();
        assert!(tree.is_valid_document_tree(RelationshipType::IsRoot));
        let mut forest = DocumentSubTree::new();
        forest
            .add_content_item(
                RelationshipType::Unknown,
                ValueType::Container,
                None,
                AddMode::AfterCurrent,
            )
            .unwrap();
        assert!(forest.is_valid_document_tree(RelationshipType::IsRoot));
        assert!(!forest.is_valid_document_tree(RelationshipType::Contains));
        forest
            .add_content_item(
                RelationshipType::Unknown,
                ValueType::Container,
                None,
                AddMode::AfterCurrent,
            )
            .unwrap();
        assert!(!forest.is_valid_document_tree(RelationshipType::IsRoot));
    }
}
