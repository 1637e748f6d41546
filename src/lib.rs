//! Structured reporting document trees.
//!
//! A structured report is a tree of typed content items joined by
//! relationships. This crate builds and edits such trees with a cursor,
//! enforces the relationship rules of each document type, and reads and
//! writes them as attribute containers, XML and HTML.

pub mod domain;
pub use domain::{
    AddMode, CodedEntry, Config, DocumentSubTree, DocumentTree, DocumentType, NodeId,
    RelationshipType, ValueType,
};

/// Attribute containers and the serializers of the content tree.
pub mod storage;
pub use storage::Dataset;

pub mod codes;
pub mod context_groups;
pub mod document;
pub use document::SrDocument;
pub mod modules;
pub mod templates;

mod error;
pub use error::{Error, Result};
