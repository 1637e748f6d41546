//! Domain models for structured report content trees.
//!
//! This module contains the content items and their values, the tree engine
//! with its cursor, the per-document-type relationship constraints, and the
//! configuration.

mod code;
pub use code::{BasicCode, CodeContext, CodedEntry};

mod config;
pub use config::{Config, ReadOptions, RenderOptions, XmlOptions};

/// Relationship constraints per document type.
pub mod constraints;
pub use constraints::ConstraintChecker;

mod content_item;
pub use content_item::{ContentItem, ContentItemMut, TemplateIdentification, DCMR, DCMR_UID};

mod document_tree;
pub use document_tree::DocumentTree;

mod document_type;
pub use document_type::DocumentType;

mod node;
pub use node::{NodeId, Signatures, TreeNode};

/// The cursor-based content tree.
pub mod subtree;
pub use subtree::{DocumentSubTree, ReferenceCheckMode, ReferenceIssue};

mod value_type;
pub use value_type::{AddMode, RelationshipType, ValueType};

/// Value payloads and value format checks.
pub mod values;
pub use values::{
    ContinuityOfContent, ImageReference, NumericMeasurement, ReferenceTarget, SopReference, Value,
    WaveformReference,
};
