use crate::domain::{DocumentSubTree, NodeId};

/// Remembers the last node a template created for each of its roles (e.g.
/// "last group", "last entry"), so that later calls append next to it
/// instead of searching the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeList {
    entries: Vec<Option<NodeId>>,
}

impl NodeList {
    /// A list with `roles` empty entries.
    #[must_use]
    pub fn with_roles(roles: usize) -> Self {
        let mut list = Self::default();
        list.reserve(roles);
        list
    }

    /// Makes room for at least `roles` entries.
    pub fn reserve(&mut self, roles: usize) {
        if self.entries.len() < roles {
            self.entries.resize(roles, None);
        }
    }

    /// Number of reserved entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are reserved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores `id` for `role`, overwriting the previous entry. `None` forgets
    /// the entry.
    ///
    /// Returns `false` if the role was never reserved.
    pub fn store(&mut self, role: usize, id: Option<NodeId>) -> bool {
        match self.entries.get_mut(role) {
            Some(entry) => {
                *entry = id;
                true
            }
            None => false,
        }
    }

    /// The node stored for `role`.
    #[must_use]
    pub fn get(&self, role: usize) -> Option<NodeId> {
        self.entries.get(role).copied().flatten()
    }

    /// Forgets all entries, keeping the reservation.
    pub fn clear(&mut self) {
        self.entries.fill(None);
    }

    /// Moves the cursor of `tree` to the node stored for `role`.
    pub fn goto_entry(&self, tree: &mut DocumentSubTree, role: usize) -> Option<NodeId> {
        self.get(role).and_then(|id| tree.goto(id))
    }

    /// Moves the cursor of `tree` to the node of the highest role up to
    /// `last_role` that has an entry still present in the tree.
    pub fn goto_last_entry(&self, tree: &mut DocumentSubTree, last_role: usize) -> Option<NodeId> {
        (0..=last_role)
            .rev()
            .find_map(|role| self.get(role).and_then(|id| tree.goto(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AddMode, RelationshipType, ValueType};

    fn tree_with_two_nodes() -> (DocumentSubTree, NodeId, NodeId) {
        let mut tree = DocumentSubTree::new();
        let first = tree
            .add_content_item(
                RelationshipType::Unknown,
                ValueType::Container,
                None,
                AddMode::AfterCurrent,
            )
            .unwrap();
        let second = tree
            .add_content_item(
                RelationshipType::Contains,
                ValueType::Text,
                None,
                AddMode::BelowCurrent,
            )
            .unwrap();
        (tree, first, second)
    }

    #[test]
    fn unreserved_roles_are_ignored() {
        let mut list = NodeList::with_roles(1);
        let (_, first, _) = tree_with_two_nodes();
        assert!(list.store(0, Some(first)));
        assert!(!list.store(1, Some(first)));
        assert_eq!(list.get(0), Some(first));
        assert_eq!(list.get(1), None);
    }

    #[test]
    fn goto_last_entry_falls_back_to_lower_roles() {
        let (mut tree, first, second) = tree_with_two_nodes();
        let mut list = NodeList::with_roles(2);
        list.store(0, Some(first));

        assert_eq!(list.goto_last_entry(&mut tree, 1), Some(first));
        assert_eq!(tree.node_id(), Some(first));

        list.store(1, Some(second));
        assert_eq!(list.goto_last_entry(&mut tree, 1), Some(second));

        list.clear();
        assert_eq!(list.len(), 2);
        assert_eq!(list.goto_entry(&mut tree, 0), None);
        assert_eq!(tree.node_id(), Some(second));
    }
}
