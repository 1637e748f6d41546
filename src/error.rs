//! Error types shared by the tree engine, the serializers and the templates.

use thiserror::Error;

use crate::{
    domain::{NodeId, RelationshipType, ValueType},
    storage::AccessError,
    templates::TemplateError,
};

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Conditions reported by document tree operations.
///
/// Mutating operations that return an error leave the tree unchanged.
#[derive(Debug, Error)]
pub enum Error {
    /// Node storage could not be reserved.
    #[error("memory exhausted while growing the document tree")]
    MemoryExhausted,

    /// The relationship/value type combination is not allowed at the target
    /// position.
    #[error("cannot add {value_type} content item with relationship '{relationship}' here")]
    InvalidRelationship {
        /// Relationship type of the rejected item.
        relationship: RelationshipType,
        /// Value type of the rejected item.
        value_type: ValueType,
    },

    /// A subtree cannot be inserted at the requested position.
    #[error("cannot insert subtree: {0}")]
    InvalidSubtree(String),

    /// The document tree failed its global validity check.
    #[error("invalid document tree")]
    InvalidDocumentTree,

    /// The current tree does not comply with the constraints of the requested
    /// document type.
    #[error("document tree is incompatible with document type {0}")]
    IncompatibleDocumentType(String),

    /// A mandatory attribute is missing from the input.
    #[error("mandatory attribute missing: {0}")]
    MissingMandatoryAttribute(String),

    /// The input data is malformed.
    #[error("corrupted input: {0}")]
    CorruptedInput(String),

    /// Unknown or unsupported value (document type, value type, ...).
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// A value setter was used on a content item of another value type.
    #[error("value of type {requested} cannot be set on a {actual} content item")]
    InvalidValueForType {
        /// Value type the setter is meant for.
        requested: ValueType,
        /// Value type of the content item.
        actual: ValueType,
    },

    /// The value failed its format check.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// A by-reference relationship points to a content item that does not
    /// exist.
    #[error("content item {node} references non-existent content item '{target}'")]
    DanglingReference {
        /// Node holding the reference.
        node: NodeId,
        /// Unresolvable target position.
        target: String,
    },

    /// A by-reference relationship is not allowed or would create a cycle.
    #[error("invalid by-reference relationship from content item {node}: {reason}")]
    InvalidByReference {
        /// Node holding the reference.
        node: NodeId,
        /// What is wrong with the reference.
        reason: String,
    },

    /// The operation requires a current content item but the cursor is unset.
    #[error("no current content item")]
    NoCurrentNode,

    /// A template builder failed.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// An attribute container accessor failed.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Output could not be produced.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
