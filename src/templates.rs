//! Template builders.
//!
//! A template grows its own content tree row by row. Every builder call works
//! on a scratch tree first and only splices it into the template's tree once
//! all rows were added, so a failed call leaves the template unchanged.
//! Templates that can be extended repeatedly remember their anchor nodes in a
//! [`NodeList`].

use thiserror::Error;

use crate::{
    domain::{DocumentSubTree, TemplateIdentification},
    Error,
};

mod node_list;
pub use node_list::NodeList;

mod tid1204;
pub use tid1204::LanguageOfContentItemAndDescendants;

mod tid1600;
pub use tid1600::{AddImageMode, ImageLibrary};

/// Failures specific to template builders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// An image library entry needs an image library group to go into.
    #[error("no image library group")]
    NoImageLibraryGroup,

    /// The image library entry descriptors of a group were already added.
    #[error("cannot add multiple image library entry descriptors")]
    CannotAddMultipleImageLibraryEntryDescriptors,
}

/// A content tree built according to a template.
pub trait Template {
    /// The identification of the template.
    fn identification(&self) -> &TemplateIdentification;

    /// The content tree built so far.
    fn tree(&self) -> &DocumentSubTree;

    /// Consumes the template, returning its content tree.
    fn into_tree(self) -> DocumentSubTree;
}

/// The template's tree with the template identification set on its first
/// top-level item.
pub(crate) fn into_stamped_tree<T: Template>(template: T) -> Result<DocumentSubTree, Error> {
    let identification = template.identification().clone();
    let mut tree = template.into_tree();
    if let Some(root) = tree.top_level().first().copied() {
        tree.goto(root);
        tree.current_content_item()?
            .set_template_identification(identification)?;
    }
    Ok(tree)
}
