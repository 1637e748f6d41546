use tracing::{debug, warn};

use crate::{
    codes::{dcm, srt, ucum},
    context_groups::{
        AcquisitionModality, CommonAnatomicRegion, ContextGroup, CtAcquisitionType,
        CtReconstructionAlgorithm, Laterality,
    },
    domain::{
        AddMode, BasicCode, CodedEntry, ContentItemMut, DocumentSubTree, ImageReference, NodeId,
        NumericMeasurement, RelationshipType, TemplateIdentification, ValueType,
    },
    storage::{
        item_codec::{read_code, read_code_sequence},
        tags, Dataset, Tag, Values,
    },
    templates::{NodeList, Template, TemplateError},
    Error,
};

const LAST_IMAGE_LIBRARY_GROUP: usize = 0;
const LAST_IMAGE_LIBRARY_ENTRY: usize = 1;

const PROJECTION_RADIOGRAPHY: [&str; 8] = ["CR", "RG", "DX", "MG", "XA", "RF", "PX", "IO"];
const CROSS_SECTIONAL: [&str; 7] = ["CT", "MR", "US", "PT", "OCT", "OPT", "IVOCT"];

/// Which descriptors go with a new image library entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddImageMode {
    /// Only the image reference.
    #[default]
    WithoutDescriptors,
    /// The image reference plus every descriptor derivable from the image
    /// attributes.
    WithAllDescriptors,
}

/// TID 1600 Image Library.
///
/// A container of image library groups, each holding image entries. Entry
/// descriptors (TID 1602 to 1607) are derived from the attributes of the
/// referenced image: modality, target region, laterality, dates, geometry and
/// modality specific acquisition parameters.
///
/// Every builder call either succeeds completely or leaves the library
/// untouched, including its cursor.
#[derive(Debug)]
pub struct ImageLibrary {
    tree: DocumentSubTree,
    identification: TemplateIdentification,
    nodes: NodeList,
}

impl ImageLibrary {
    /// A library holding only its root container.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MemoryExhausted`] if the root cannot be stored.
    pub fn new() -> Result<Self, Error> {
        let mut tree = DocumentSubTree::new();
        tree.add_content_item(
            RelationshipType::Unknown,
            ValueType::Container,
            Some(dcm::IMAGE_LIBRARY.into()),
            AddMode::AfterCurrent,
        )?;
        tree.current_content_item()?
            .set_annotation_text("TID 1600 - Row 1");
        Ok(Self {
            tree,
            identification: TemplateIdentification::dcmr("1600"),
            nodes: NodeList::with_roles(2),
        })
    }

    /// Runs `action`, moving the cursor back to where it was if it fails.
    fn restoring_cursor<T>(
        &mut self,
        action: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let saved = self.tree.node_id();
        let result = action(self);
        if result.is_err() {
            if let Some(id) = saved {
                self.tree.goto(id);
            }
        }
        result
    }

    /// Appends a new image library group. Subsequent entries go into it.
    ///
    /// # Errors
    ///
    /// Fails if the group cannot be added.
    pub fn add_image_group(&mut self) -> Result<NodeId, Error> {
        self.restoring_cursor(|library| {
            let group = Some(dcm::IMAGE_LIBRARY_GROUP.into());
            let id = if library
                .nodes
                .goto_entry(&mut library.tree, LAST_IMAGE_LIBRARY_GROUP)
                .is_some()
            {
                library.tree.add_content_item(
                    RelationshipType::Contains,
                    ValueType::Container,
                    group,
                    AddMode::AfterCurrent,
                )?
            } else {
                library.tree.goto_root().ok_or(Error::NoCurrentNode)?;
                library.tree.add_child_content_item(
                    RelationshipType::Contains,
                    ValueType::Container,
                    group,
                )?
            };
            library
                .tree
                .current_content_item()?
                .set_annotation_text("TID 1600 - Row 2");
            library.nodes.store(LAST_IMAGE_LIBRARY_GROUP, Some(id));
            library.nodes.store(LAST_IMAGE_LIBRARY_ENTRY, None);
            Ok(id)
        })
    }

    /// Adds an entry for the image described by `dataset` to the last group.
    ///
    /// # Errors
    ///
    /// Fails with [`TemplateError::NoImageLibraryGroup`] if no group was
    /// added yet, with [`Error::MissingMandatoryAttribute`] if the dataset
    /// lacks the SOP class or instance UID, and with [`Error::InvalidValue`]
    /// if `check` is set and an attribute value is malformed.
    pub fn add_image_entry(
        &mut self,
        dataset: &Dataset,
        mode: AddImageMode,
        check: bool,
    ) -> Result<NodeId, Error> {
        let mut entry = DocumentSubTree::new();
        let id = entry.add_content_item(
            RelationshipType::Contains,
            ValueType::Image,
            None,
            AddMode::AfterCurrent,
        )?;
        let mut item = entry.current_content_item()?;
        item.set_image_reference(ImageReference::from_dataset(dataset)?, check)?;
        item.set_annotation_text("TID 1601 - Row 1");
        if mode == AddImageMode::WithAllDescriptors {
            let mut descriptors = entry_descriptors(dataset, check)?;
            if !descriptors.is_empty() {
                entry.insert_sub_tree(
                    &mut descriptors,
                    AddMode::BelowCurrent,
                    RelationshipType::HasAcqContext,
                )?;
            }
        }

        self.restoring_cursor(|library| {
            let mode = if library
                .nodes
                .goto_entry(&mut library.tree, LAST_IMAGE_LIBRARY_ENTRY)
                .is_some()
            {
                AddMode::AfterCurrent
            } else if library
                .nodes
                .goto_entry(&mut library.tree, LAST_IMAGE_LIBRARY_GROUP)
                .is_some()
            {
                AddMode::BelowCurrent
            } else {
                return Err(TemplateError::NoImageLibraryGroup.into());
            };
            library
                .tree
                .insert_sub_tree(&mut entry, mode, RelationshipType::Contains)?;
            library.nodes.store(LAST_IMAGE_LIBRARY_ENTRY, Some(id));
            debug!(entry = %id, "added image library entry");
            Ok(id)
        })
    }

    /// Adds the descriptors shared by all entries of the last group, derived
    /// from `dataset`. Does nothing if no descriptor can be derived.
    ///
    /// # Errors
    ///
    /// Fails with [`TemplateError::NoImageLibraryGroup`] if no group was
    /// added yet and with
    /// [`TemplateError::CannotAddMultipleImageLibraryEntryDescriptors`] if
    /// the group already has descriptors.
    pub fn add_image_entry_descriptors(
        &mut self,
        dataset: &Dataset,
        check: bool,
    ) -> Result<(), Error> {
        let mut descriptors = entry_descriptors(dataset, check)?;
        if descriptors.is_empty() {
            return Ok(());
        }
        self.restoring_cursor(|library| {
            library
                .nodes
                .goto_last_entry(&mut library.tree, LAST_IMAGE_LIBRARY_GROUP)
                .ok_or(TemplateError::NoImageLibraryGroup)?;
            let tree = &library.tree;
            let described = tree
                .current_node()
                .and_then(|group| group.children().first().copied())
                .and_then(|child| tree.node(child))
                .is_some_and(|child| child.relationship() == RelationshipType::HasAcqContext);
            if described {
                return Err(TemplateError::CannotAddMultipleImageLibraryEntryDescriptors.into());
            }
            library.tree.insert_sub_tree(
                &mut descriptors,
                AddMode::BelowCurrentBeforeFirstChild,
                RelationshipType::HasAcqContext,
            )
        })
    }
}

impl Template for ImageLibrary {
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

/// The first item of the sequence `tag`, searched depth-first through nested
/// sequences (e.g. functional groups).
fn find_sequence_item(dataset: &Dataset, tag: Tag) -> Option<&Dataset> {
    if let Ok(items) = dataset.get_items(tag) {
        return items.first();
    }
    dataset.iter().find_map(|(_, element)| match element.values() {
        Values::Items(items) => items.iter().find_map(|item| find_sequence_item(item, tag)),
        _ => None,
    })
}

fn entry_descriptors(dataset: &Dataset, check: bool) -> Result<DocumentSubTree, Error> {
    let mut tree = DocumentSubTree::new();
    Descriptors {
        tree: &mut tree,
        check,
    }
    .general(dataset)?;
    Ok(tree)
}

/// Appends descriptor rows, all siblings with relationship
/// `HAS ACQ CONTEXT`, to a scratch tree.
struct Descriptors<'a> {
    tree: &'a mut DocumentSubTree,
    check: bool,
}

impl Descriptors<'_> {
    fn add(
        &mut self,
        value_type: ValueType,
        concept: BasicCode,
        annotation: &str,
    ) -> Result<ContentItemMut<'_>, Error> {
        self.tree.add_content_item(
            RelationshipType::HasAcqContext,
            value_type,
            Some(concept.into()),
            AddMode::AfterCurrent,
        )?;
        let mut item = self.tree.current_content_item()?;
        item.set_annotation_text(annotation);
        Ok(item)
    }

    fn code(
        &mut self,
        concept: BasicCode,
        value: CodedEntry,
        annotation: &str,
    ) -> Result<(), Error> {
        let check = self.check;
        self.add(ValueType::Code, concept, annotation)?
            .set_code_value(value, check)
    }

    fn string(
        &mut self,
        dataset: &Dataset,
        (tag, index): (Tag, usize),
        value_type: ValueType,
        concept: BasicCode,
        annotation: &str,
    ) -> Result<(), Error> {
        let Some(value) = dataset.text_at(tag, index) else {
            return Ok(());
        };
        let check = self.check;
        self.add(value_type, concept, annotation)?
            .set_string_value(value, check)
    }

    fn numeric(
        &mut self,
        dataset: &Dataset,
        (tag, index): (Tag, usize),
        concept: BasicCode,
        unit: BasicCode,
        annotation: &str,
    ) -> Result<(), Error> {
        let Some(value) = dataset.text_at(tag, index) else {
            return Ok(());
        };
        let check = self.check;
        self.add(ValueType::Num, concept, annotation)?
            .set_numeric_value(NumericMeasurement::new(value, unit), check)
    }

    /// Adds a CODE row from a code sequence. Missing, unreadable or malformed
    /// codes add nothing.
    fn code_sequence(
        &mut self,
        dataset: &Dataset,
        tag: Tag,
        concept: BasicCode,
        annotation: &str,
    ) -> Result<bool, Error> {
        match read_code_sequence(dataset, tag) {
            Ok(Some(code)) if code.check().is_ok() => {
                self.code(concept, code, annotation)?;
                Ok(true)
            }
            Ok(_) => Ok(false),
            Err(error) => {
                debug!(%tag, "ignoring code sequence: {error}");
                Ok(false)
            }
        }
    }

    /// TID 1602 Image Library Entry Descriptors.
    fn general(&mut self, dataset: &Dataset) -> Result<(), Error> {
        let modality = dataset.string(tags::MODALITY).unwrap_or_default();
        if !modality.is_empty() {
            match AcquisitionModality::from_modality(modality) {
                Some(code) => {
                    self.code(dcm::MODALITY, code.coded_entry(false), "TID 1602 - Row 1")?;
                }
                None => warn!("cannot map modality '{modality}' to a coded entry (not in CID 29)"),
            }
        }

        let region = match read_code_sequence(dataset, tags::ANATOMIC_REGION_SEQUENCE) {
            Ok(Some(code)) if code.check().is_ok() => Some(code),
            _ => dataset.string(tags::BODY_PART_EXAMINED).and_then(|body_part| {
                let region = CommonAnatomicRegion::from_body_part_examined(body_part);
                if region.is_none() {
                    debug!(
                        "cannot map body part examined '{body_part}' to a coded entry \
                         (not in CID 4031)"
                    );
                }
                region.map(|region| region.coded_entry(false))
            }),
        };
        if let Some(region) = region {
            self.code(dcm::TARGET_REGION, region, "TID 1602 - Row 2")?;
        }

        if let Some(laterality) = dataset.string(tags::IMAGE_LATERALITY) {
            match Laterality::from_image_laterality(laterality) {
                Some(code) => {
                    self.code(dcm::IMAGE_LATERALITY, code.coded_entry(false), "TID 1602 - Row 3")?;
                }
                None => warn!(
                    "cannot map image laterality '{laterality}' to a coded entry (not in CID 244)"
                ),
            }
        }

        let dates = [
            (tags::STUDY_DATE, ValueType::Date, dcm::STUDY_DATE, "TID 1602 - Row 4"),
            (tags::STUDY_TIME, ValueType::Time, dcm::STUDY_TIME, "TID 1602 - Row 5"),
            (tags::CONTENT_DATE, ValueType::Date, dcm::CONTENT_DATE, "TID 1602 - Row 6"),
            (tags::CONTENT_TIME, ValueType::Time, dcm::CONTENT_TIME, "TID 1602 - Row 7"),
            (tags::ACQUISITION_DATE, ValueType::Date, dcm::ACQUISITION_DATE, "TID 1602 - Row 8"),
            (tags::ACQUISITION_TIME, ValueType::Time, dcm::ACQUISITION_TIME, "TID 1602 - Row 9"),
            (
                tags::FRAME_OF_REFERENCE_UID,
                ValueType::UidRef,
                dcm::FRAME_OF_REFERENCE_UID,
                "TID 1602 - Row 10",
            ),
        ];
        for (tag, value_type, concept, annotation) in dates {
            self.string(dataset, (tag, 0), value_type, concept, annotation)?;
        }
        self.numeric(
            dataset,
            (tags::ROWS, 0),
            dcm::PIXEL_DATA_ROWS,
            ucum::PIXELS,
            "TID 1602 - Row 11",
        )?;
        self.numeric(
            dataset,
            (tags::COLUMNS, 0),
            dcm::PIXEL_DATA_COLUMNS,
            ucum::PIXELS,
            "TID 1602 - Row 12",
        )?;

        if PROJECTION_RADIOGRAPHY.contains(&modality) {
            self.projection_radiography(dataset)?;
        }
        if CROSS_SECTIONAL.contains(&modality) {
            self.cross_sectional(dataset)?;
        }
        match modality {
            "CT" => self.computed_tomography(dataset),
            "MR" => self.magnetic_resonance(dataset),
            "PT" => self.positron_emission_tomography(dataset),
            _ => Ok(()),
        }
    }

    /// TID 1603 Image Library Entry Descriptors for Projection Radiography.
    fn projection_radiography(&mut self, dataset: &Dataset) -> Result<(), Error> {
        let view = self.code_sequence(
            dataset,
            tags::VIEW_CODE_SEQUENCE,
            dcm::IMAGE_VIEW,
            "TID 1603 - Row 1",
        )?;
        if view {
            let modifiers = dataset
                .get_items(tags::VIEW_CODE_SEQUENCE)
                .ok()
                .and_then(<[Dataset]>::first)
                .and_then(|view| view.get_items(tags::VIEW_MODIFIER_CODE_SEQUENCE).ok())
                .unwrap_or_default();
            for modifier in modifiers {
                let code = match read_code(modifier) {
                    Ok(code) => code,
                    Err(error) => {
                        debug!("ignoring view modifier: {error}");
                        continue;
                    }
                };
                self.tree.add_child_content_item(
                    RelationshipType::HasAcqContext,
                    ValueType::Code,
                    Some(dcm::IMAGE_VIEW_MODIFIER.into()),
                )?;
                let check = self.check;
                let mut item = self.tree.current_content_item()?;
                item.set_code_value(code, check)?;
                item.set_annotation_text("TID 1603 - Row 2");
                self.tree.go_up();
            }
        }
        let orientation = tags::PATIENT_ORIENTATION;
        self.string(
            dataset,
            (orientation, 0),
            ValueType::Text,
            dcm::PATIENT_ORIENTATION_ROW,
            "TID 1603 - Row 3",
        )?;
        self.string(
            dataset,
            (orientation, 1),
            ValueType::Text,
            dcm::PATIENT_ORIENTATION_COLUMN,
            "TID 1603 - Row 4",
        )?;
        let spacing = tags::IMAGER_PIXEL_SPACING;
        self.numeric(
            dataset,
            (spacing, 1),
            dcm::HORIZONTAL_PIXEL_SPACING,
            ucum::MILLIMETER,
            "TID 1603 - Row 5",
        )?;
        self.numeric(
            dataset,
            (spacing, 0),
            dcm::VERTICAL_PIXEL_SPACING,
            ucum::MILLIMETER,
            "TID 1603 - Row 6",
        )?;
        self.numeric(
            dataset,
            (tags::POSITIONER_PRIMARY_ANGLE, 0),
            dcm::POSITIONER_PRIMARY_ANGLE,
            ucum::DEGREES,
            "TID 1603 - Row 7",
        )?;
        self.numeric(
            dataset,
            (tags::POSITIONER_SECONDARY_ANGLE, 0),
            dcm::POSITIONER_SECONDARY_ANGLE,
            ucum::DEGREES,
            "TID 1603 - Row 8",
        )
    }

    /// TID 1604 Image Library Entry Descriptors for Cross-Sectional
    /// Modalities.
    fn cross_sectional(&mut self, dataset: &Dataset) -> Result<(), Error> {
        let millimeter = [
            (tags::PIXEL_SPACING, 1, dcm::HORIZONTAL_PIXEL_SPACING, "TID 1604 - Row 1"),
            (tags::PIXEL_SPACING, 0, dcm::VERTICAL_PIXEL_SPACING, "TID 1604 - Row 2"),
            (tags::SPACING_BETWEEN_SLICES, 0, dcm::SPACING_BETWEEN_SLICES, "TID 1604 - Row 3"),
            (tags::SLICE_THICKNESS, 0, dcm::SLICE_THICKNESS, "TID 1604 - Row 4"),
            (tags::IMAGE_POSITION_PATIENT, 0, dcm::IMAGE_POSITION_PATIENT_X, "TID 1604 - Row 5"),
            (tags::IMAGE_POSITION_PATIENT, 1, dcm::IMAGE_POSITION_PATIENT_Y, "TID 1604 - Row 6"),
            (tags::IMAGE_POSITION_PATIENT, 2, dcm::IMAGE_POSITION_PATIENT_Z, "TID 1604 - Row 7"),
        ];
        for (tag, index, concept, annotation) in millimeter {
            self.numeric(dataset, (tag, index), concept, ucum::MILLIMETER, annotation)?;
        }
        let orientation = [
            dcm::IMAGE_ORIENTATION_PATIENT_ROW_X,
            dcm::IMAGE_ORIENTATION_PATIENT_ROW_Y,
            dcm::IMAGE_ORIENTATION_PATIENT_ROW_Z,
            dcm::IMAGE_ORIENTATION_PATIENT_COLUMN_X,
            dcm::IMAGE_ORIENTATION_PATIENT_COLUMN_Y,
            dcm::IMAGE_ORIENTATION_PATIENT_COLUMN_Z,
        ];
        for (index, concept) in orientation.into_iter().enumerate() {
            let annotation = format!("TID 1604 - Row {}", index + 8);
            self.numeric(
                dataset,
                (tags::IMAGE_ORIENTATION_PATIENT, index),
                concept,
                ucum::MINUS_1_TO_1,
                &annotation,
            )?;
        }
        Ok(())
    }

    /// TID 1605 Image Library Entry Descriptors for CT.
    fn computed_tomography(&mut self, dataset: &Dataset) -> Result<(), Error> {
        let acquisition_type = find_sequence_item(dataset, tags::CT_ACQUISITION_TYPE_SEQUENCE)
            .and_then(|item| item.string(tags::ACQUISITION_TYPE));
        if let Some(acquisition_type) = acquisition_type {
            match CtAcquisitionType::from_acquisition_type(acquisition_type) {
                Some(code) => {
                    self.code(
                        dcm::CT_ACQUISITION_TYPE,
                        code.coded_entry(false),
                        "TID 1605 - Row 1",
                    )?;
                }
                None => warn!(
                    "cannot map acquisition type '{acquisition_type}' to a coded entry \
                     (not in CID 10013)"
                ),
            }
        }
        let algorithm = find_sequence_item(dataset, tags::CT_RECONSTRUCTION_SEQUENCE)
            .and_then(|item| item.string(tags::RECONSTRUCTION_ALGORITHM));
        if let Some(algorithm) = algorithm {
            match CtReconstructionAlgorithm::from_reconstruction_algorithm(algorithm) {
                Some(code) => {
                    self.code(
                        dcm::RECONSTRUCTION_ALGORITHM,
                        code.coded_entry(false),
                        "TID 1605 - Row 2",
                    )?;
                }
                None => warn!(
                    "cannot map reconstruction algorithm '{algorithm}' to a coded entry \
                     (not in CID 10033)"
                ),
            }
        }
        Ok(())
    }

    /// TID 1606 Image Library Entry Descriptors for MR.
    fn magnetic_resonance(&mut self, dataset: &Dataset) -> Result<(), Error> {
        let name = dataset
            .text_at(tags::PULSE_SEQUENCE_NAME, 0)
            .or_else(|| dataset.text_at(tags::SEQUENCE_NAME, 0));
        if let Some(name) = name {
            let check = self.check;
            self.add(ValueType::Text, dcm::PULSE_SEQUENCE_NAME, "TID 1606 - Row 1")?
                .set_string_value(name, check)?;
        }
        Ok(())
    }

    /// TID 1607 Image Library Entry Descriptors for PET.
    ///
    /// Only the first radiopharmaceutical is described.
    fn positron_emission_tomography(&mut self, dataset: &Dataset) -> Result<(), Error> {
        let Some(item) = find_sequence_item(dataset, tags::RADIOPHARMACEUTICAL_INFORMATION_SEQUENCE)
        else {
            return Ok(());
        };
        self.code_sequence(
            item,
            tags::RADIONUCLIDE_CODE_SEQUENCE,
            srt::RADIONUCLIDE,
            "TID 1607 - Row 1",
        )?;
        self.code_sequence(
            item,
            tags::RADIOPHARMACEUTICAL_CODE_SEQUENCE,
            srt::RADIOPHARMACEUTICAL_AGENT,
            "TID 1607 - Row 2",
        )?;
        self.numeric(
            item,
            (tags::RADIONUCLIDE_HALF_LIFE, 0),
            srt::HALF_LIFE_OF_RADIOPHARMACEUTICAL,
            ucum::S,
            "TID 1607 - Row 3",
        )?;
        self.string(
            item,
            (tags::RADIOPHARMACEUTICAL_START_DATE_TIME, 0),
            ValueType::DateTime,
            dcm::RADIOPHARMACEUTICAL_START_TIME,
            "TID 1607 - Row 4",
        )?;
        self.string(
            item,
            (tags::RADIOPHARMACEUTICAL_STOP_DATE_TIME, 0),
            ValueType::DateTime,
            dcm::RADIOPHARMACEUTICAL_STOP_TIME,
            "TID 1607 - Row 4b",
        )?;
        self.numeric(
            item,
            (tags::RADIOPHARMACEUTICAL_VOLUME, 0),
            dcm::RADIOPHARMACEUTICAL_VOLUME,
            ucum::CM3,
            "TID 1607 - Row 5",
        )?;
        self.numeric(
            item,
            (tags::RADIONUCLIDE_TOTAL_DOSE, 0),
            dcm::RADIONUCLIDE_TOTAL_DOSE,
            ucum::BQ,
            "TID 1607 - Row 6",
        )?;
        self.numeric(
            item,
            (tags::RADIOPHARMACEUTICAL_SPECIFIC_ACTIVITY, 0),
            dcm::RADIOPHARMACEUTICAL_SPECIFIC_ACTIVITY,
            ucum::BQ_PER_MOL,
            "TID 1607 - Row 7",
        )?;
        self.code_sequence(
            item,
            tags::ADMINISTRATION_ROUTE_CODE_SEQUENCE,
            srt::ROUTE_OF_ADMINISTRATION,
            "TID 1607 - Row 8",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Vr;

    const CT_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.2";

    fn image(modality: &str, instance: &str) -> Dataset {
        let mut dataset = Dataset::new();
        dataset.put_string(tags::SOP_CLASS_UID, Vr::UI, CT_IMAGE_STORAGE);
        dataset.put_string(tags::SOP_INSTANCE_UID, Vr::UI, instance);
        dataset.put_string(tags::MODALITY, Vr::CS, modality);
        dataset
    }

    fn concept_names(tree: &DocumentSubTree, parent: NodeId) -> Vec<String> {
        tree.node(parent)
            .unwrap()
            .children()
            .iter()
            .map(|&child| {
                tree.node(child)
                    .unwrap()
                    .content()
                    .concept_name()
                    .map(|name| name.code_meaning().to_string())
                    .unwrap_or_default()
            })
            .collect()
    }

    #[test]
    fn new_library_has_a_root_container() {
        let library = ImageLibrary::new().unwrap();
        let root = library.tree().root().unwrap();
        assert_eq!(root.content().value_type(), ValueType::Container);
        assert_eq!(root.content().concept_name().unwrap().code_value(), "111028");
        assert_eq!(root.content().annotation(), Some("TID 1600 - Row 1"));
        assert!(library.identification().is_dcmr("1600"));
    }

    #[test]
    fn entry_without_group_is_rejected() {
        let mut library = ImageLibrary::new().unwrap();
        let cursor = library.tree().node_id();
        let error = library
            .add_image_entry(&image("CT", "1.2.3.4"), AddImageMode::WithAllDescriptors, true)
            .unwrap_err();
        assert!(matches!(error, Error::Template(TemplateError::NoImageLibraryGroup)));
        assert_eq!(library.tree().count_nodes(), 1);
        assert_eq!(library.tree().node_id(), cursor);
    }

    #[test]
    fn entries_go_into_the_last_group() {
        let mut library = ImageLibrary::new().unwrap();
        let first = library.add_image_group().unwrap();
        library
            .add_image_entry(&image("CT", "1.2.3.1"), AddImageMode::WithoutDescriptors, true)
            .unwrap();
        let second = library.add_image_group().unwrap();
        let entry = library
            .add_image_entry(&image("CT", "1.2.3.2"), AddImageMode::WithoutDescriptors, true)
            .unwrap();
        let next = library
            .add_image_entry(&image("CT", "1.2.3.3"), AddImageMode::WithoutDescriptors, true)
            .unwrap();

        let tree = library.tree();
        assert_eq!(tree.node(first).unwrap().children().len(), 1);
        assert_eq!(tree.node(second).unwrap().children(), &[entry, next]);
        assert_eq!(tree.root().unwrap().children(), &[first, second]);
        assert_eq!(
            tree.node(entry).unwrap().content().image_reference().unwrap().sop.sop_instance_uid,
            "1.2.3.2"
        );
    }

    #[test]
    fn computed_tomography_descriptors() {
        let mut dataset = image("CT", "1.2.3.4");
        dataset.put_string(tags::BODY_PART_EXAMINED, Vr::CS, "CHEST");
        dataset.put_string(tags::STUDY_DATE, Vr::DA, "20240102");
        dataset.put_integers(tags::ROWS, Vr::US, vec![512]);
        dataset.put_strings(
            tags::PIXEL_SPACING,
            Vr::DS,
            vec!["0.7".to_string(), "0.6".to_string()],
        );
        let mut acquisition = Dataset::new();
        acquisition.put_string(tags::ACQUISITION_TYPE, Vr::CS, "SPIRAL");
        let mut shared = Dataset::new();
        shared.put_item(tags::CT_ACQUISITION_TYPE_SEQUENCE, acquisition);
        dataset.put_item(tags::REFERENCED_SOP_SEQUENCE, shared);

        let mut library = ImageLibrary::new().unwrap();
        library.add_image_group().unwrap();
        let entry = library
            .add_image_entry(&dataset, AddImageMode::WithAllDescriptors, true)
            .unwrap();

        let tree = library.tree();
        assert_eq!(
            concept_names(tree, entry),
            [
                "Modality",
                "Target Region",
                "Study Date",
                "Pixel Data Rows",
                "Horizontal Pixel Spacing",
                "Vertical Pixel Spacing",
                "CT Acquisition Type",
            ]
        );
        let spacing = tree.node(tree.node(entry).unwrap().children()[4]).unwrap();
        assert_eq!(spacing.relationship(), RelationshipType::HasAcqContext);
        assert_eq!(spacing.content().numeric_value().unwrap().value, "0.6");
    }

    #[test]
    fn group_descriptors_can_be_added_once() {
        let mut library = ImageLibrary::new().unwrap();
        let group = library.add_image_group().unwrap();
        let entry = library
            .add_image_entry(&image("MR", "1.2.3.4"), AddImageMode::WithoutDescriptors, false)
            .unwrap();

        library
            .add_image_entry_descriptors(&image("MR", "1.2.3.4"), true)
            .unwrap();
        let children = library.tree().node(group).unwrap().children().to_vec();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1], entry);

        let error = library
            .add_image_entry_descriptors(&image("MR", "1.2.3.4"), true)
            .unwrap_err();
        assert!(matches!(
            error,
            Error::Template(TemplateError::CannotAddMultipleImageLibraryEntryDescriptors)
        ));
        assert_eq!(library.tree().node(group).unwrap().children().len(), 2);
    }

    #[test]
    fn missing_instance_uid_leaves_library_unchanged() {
        let mut library = ImageLibrary::new().unwrap();
        library.add_image_group().unwrap();
        let mut dataset = image("CT", "1.2.3.4");
        dataset.remove(tags::SOP_INSTANCE_UID);
        let cursor = library.tree().node_id();

        let error = library
            .add_image_entry(&dataset, AddImageMode::WithAllDescriptors, true)
            .unwrap_err();
        assert!(matches!(error, Error::MissingMandatoryAttribute(_)));
        assert_eq!(library.tree().count_nodes(), 2);
        assert_eq!(library.tree().node_id(), cursor);
    }

    #[test]
    fn failing_descriptor_row_leaves_library_unchanged() {
        let mut library = ImageLibrary::new().unwrap();
        let group = library.add_image_group().unwrap();
        let first = library
            .add_image_entry(&image("CT", "1.2.3.1"), AddImageMode::WithoutDescriptors, true)
            .unwrap();
        let nodes = library.tree().count_nodes();
        let cursor = library.tree().node_id();

        // modality and target region rows are built before the date fails
        let mut dataset = image("CT", "1.2.3.2");
        dataset.put_string(tags::BODY_PART_EXAMINED, Vr::CS, "CHEST");
        dataset.put_string(tags::STUDY_DATE, Vr::DA, "2024-01-02");
        let error = library
            .add_image_entry(&dataset, AddImageMode::WithAllDescriptors, true)
            .unwrap_err();
        assert!(matches!(error, Error::InvalidValue(_)), "{error}");
        assert_eq!(library.tree().count_nodes(), nodes);
        assert_eq!(library.tree().node_id(), cursor);

        let next = library
            .add_image_entry(&image("CT", "1.2.3.3"), AddImageMode::WithoutDescriptors, true)
            .unwrap();
        assert_eq!(library.tree().node(group).unwrap().children(), &[first, next]);
    }

    #[test]
    fn unmappable_modality_is_skipped() {
        let dataset = image("XYZ", "1.2.3.4");
        let tree = entry_descriptors(&dataset, true).unwrap();
        assert!(tree.is_empty());
    }
}
