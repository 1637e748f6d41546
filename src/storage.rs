mod builder;
mod dataset;
pub use dataset::{AccessError, Dataset, Element, LoadError, Tag, Values, Vr};

/// Loading dataset files from directories.
pub mod directory;
pub(crate) mod html;
pub(crate) mod item_codec;

/// Tags of the attributes this crate reads and writes.
pub mod tags;
pub(crate) mod xml;
