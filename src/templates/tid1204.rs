use crate::{
    codes::dcm,
    context_groups::{ContextGroup, Country, Language},
    domain::{AddMode, DocumentSubTree, RelationshipType, TemplateIdentification, ValueType},
    templates::Template,
    Error,
};

/// TID 1204 Language of Content Item and Descendants.
///
/// A concept modifier naming the language (and optionally the country) of
/// the item it is attached to. Not extensible: setting the language again
/// replaces the previous rows.
#[derive(Debug)]
pub struct LanguageOfContentItemAndDescendants {
    tree: DocumentSubTree,
    identification: TemplateIdentification,
}

impl Default for LanguageOfContentItemAndDescendants {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageOfContentItemAndDescendants {
    /// An empty template.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: DocumentSubTree::new(),
            identification: TemplateIdentification::dcmr("1204"),
        }
    }

    /// Sets the language, replacing any previously set language.
    ///
    /// # Errors
    ///
    /// Fails if a row cannot be added; the template is left unchanged then.
    pub fn set_language(
        &mut self,
        language: Language,
        country: Option<Country>,
        check: bool,
    ) -> Result<(), Error> {
        let mut tree = DocumentSubTree::new();
        tree.add_content_item(
            RelationshipType::HasConceptMod,
            ValueType::Code,
            Some(dcm::LANGUAGE_OF_CONTENT_ITEM_AND_DESCENDANTS.into()),
            AddMode::AfterCurrent,
        )?;
        let mut item = tree.current_content_item()?;
        item.set_code_value(language.coded_entry(false), check)?;
        item.set_annotation_text("TID 1204 - Row 1");
        if let Some(country) = country {
            tree.add_child_content_item(
                RelationshipType::HasConceptMod,
                ValueType::Code,
                Some(dcm::COUNTRY_OF_LANGUAGE.into()),
            )?;
            let mut item = tree.current_content_item()?;
            item.set_code_value(country.coded_entry(false), check)?;
            item.set_annotation_text("TID 1204 - Row 2");
        }
        self.tree = tree;
        Ok(())
    }
}

impl Template for LanguageOfContentItemAndDescendants {
    fn identification(&self) -> &TemplateIdentification {
        &self.identification
    }

    fn tree(&self) -> &DocumentSubTree {
        &self.tree
    }

    fn into_tree(self) -> DocumentSubTree {
        self.tree
    }
}
