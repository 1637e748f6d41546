use tracing::debug;

use crate::{
    modules::{
        AttributeModule, GeneralEquipmentModule, GeneralSeriesModule, GeneralStudyModule,
        PatientModule, SopCommonModule,
    },
    storage::Dataset,
    Error,
};

/// The modules every composite object carries: patient, study, series,
/// equipment and SOP common.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IodCommon {
    patient: PatientModule,
    study: GeneralStudyModule,
    series: GeneralSeriesModule,
    equipment: GeneralEquipmentModule,
    sop_common: SopCommonModule,
}

impl IodCommon {
    /// Patient Module.
    #[must_use]
    pub const fn patient(&self) -> &PatientModule {
        &self.patient
    }

    /// Patient Module, mutable.
    pub const fn patient_mut(&mut self) -> &mut PatientModule {
        &mut self.patient
    }

    /// General Study Module.
    #[must_use]
    pub const fn study(&self) -> &GeneralStudyModule {
        &self.study
    }

    /// General Study Module, mutable.
    pub const fn study_mut(&mut self) -> &mut GeneralStudyModule {
        &mut self.study
    }

    /// General Series Module.
    #[must_use]
    pub const fn series(&self) -> &GeneralSeriesModule {
        &self.series
    }

    /// General Series Module, mutable.
    pub const fn series_mut(&mut self) -> &mut GeneralSeriesModule {
        &mut self.series
    }

    /// General Equipment Module.
    #[must_use]
    pub const fn equipment(&self) -> &GeneralEquipmentModule {
        &self.equipment
    }

    /// General Equipment Module, mutable.
    pub const fn equipment_mut(&mut self) -> &mut GeneralEquipmentModule {
        &mut self.equipment
    }

    /// SOP Common Module.
    #[must_use]
    pub const fn sop_common(&self) -> &SopCommonModule {
        &self.sop_common
    }

    /// SOP Common Module, mutable.
    pub const fn sop_common_mut(&mut self) -> &mut SopCommonModule {
        &mut self.sop_common
    }

    /// Reads all modules, replacing the current values.
    ///
    /// # Errors
    ///
    /// See [`AttributeModule::read`].
    pub fn read(&mut self, dataset: &Dataset) -> Result<(), Error> {
        self.patient.read(dataset, true)?;
        self.study.read(dataset, true)?;
        self.series.read(dataset, true)?;
        self.equipment.read(dataset, true)?;
        self.sop_common.read(dataset, true)
    }

    /// Writes all modules.
    ///
    /// # Errors
    ///
    /// See [`AttributeModule::write`].
    pub fn write(&self, dataset: &mut Dataset) -> Result<(), Error> {
        self.patient.write(dataset)?;
        self.study.write(dataset)?;
        self.series.write(dataset)?;
        self.equipment.write(dataset)?;
        self.sop_common.write(dataset)
    }

    /// Clears all modules.
    pub fn clear(&mut self) {
        self.patient.clear_data();
        self.study.clear_data();
        self.series.clear_data();
        self.equipment.clear_data();
        self.sop_common.clear_data();
    }

    /// Takes over patient, study (with equipment) and series attributes from
    /// another object, e.g. the images a report is about. Values absent from
    /// `dataset` are kept.
    ///
    /// # Errors
    ///
    /// See [`AttributeModule::read`].
    pub fn import(
        &mut self,
        dataset: &Dataset,
        patient: bool,
        study: bool,
        series: bool,
    ) -> Result<(), Error> {
        if patient {
            self.patient.read(dataset, false)?;
        }
        if study {
            self.study.read(dataset, false)?;
            self.equipment.read(dataset, false)?;
        }
        if series {
            self.series.read(dataset, false)?;
        }
        debug!(patient, study, series, "imported common modules");
        Ok(())
    }

    /// Makes sure study, series and SOP instance UIDs are present, generating
    /// the missing ones (and replacing invalid ones if `correct_invalid` is
    /// set).
    pub fn ensure_instance_uids(&mut self, correct_invalid: bool) {
        self.study.ensure_instance_uid(correct_invalid);
        self.series.ensure_instance_uid(correct_invalid);
        self.sop_common.ensure_instance_uid(correct_invalid);
    }

    /// Starts a new study: clears the study (and optionally the equipment)
    /// attributes and continues with [`Self::create_new_series`].
    pub fn create_new_study(&mut self, clear_equipment: bool) {
        self.study.clear_data();
        if clear_equipment {
            self.equipment.clear_data();
        }
        self.study.ensure_instance_uid(false);
        self.create_new_series();
    }

    /// Starts a new series in the current study and continues with
    /// [`Self::create_new_sop_instance`].
    pub fn create_new_series(&mut self) {
        self.series.clear_data();
        self.series.ensure_instance_uid(false);
        self.create_new_sop_instance();
    }

    /// Starts a new instance: clears the SOP common attributes and generates
    /// a new SOP Instance UID.
    pub fn create_new_sop_instance(&mut self) {
        self.sop_common.clear_data();
        self.sop_common.ensure_instance_uid(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{tags, Vr};

    fn image() -> Dataset {
        let mut dataset = Dataset::new();
        dataset.put_string(tags::PATIENT_NAME, Vr::PN, "Doe^Jane");
        dataset.put_string(tags::STUDY_INSTANCE_UID, Vr::UI, "1.2.3");
        dataset.put_string(tags::MANUFACTURER, Vr::LO, "ACME");
        dataset.put_string(tags::SERIES_INSTANCE_UID, Vr::UI, "1.2.3.4");
        dataset
    }

    #[test]
    fn import_takes_only_the_requested_entities() {
        let mut common = IodCommon::default();
        common.patient_mut().set_patient_id("4711", false).unwrap();
        common.import(&image(), true, true, false).unwrap();

        assert_eq!(common.patient().patient_name(), "Doe^Jane");
        assert_eq!(common.patient().patient_id(), "4711");
        assert_eq!(common.study().study_instance_uid(), "1.2.3");
        assert_eq!(common.equipment().manufacturer(), "ACME");
        assert_eq!(common.series().series_instance_uid(), "");
    }

    #[test]
    fn new_study_renews_all_instance_uids() {
        let mut common = IodCommon::default();
        common.import(&image(), true, true, true).unwrap();
        common.ensure_instance_uids(false);
        let sop = common.sop_common().sop_instance_uid().to_string();

        common.create_new_study(true);
        assert_eq!(common.patient().patient_name(), "Doe^Jane");
        assert_ne!(common.study().study_instance_uid(), "1.2.3");
        assert_ne!(common.series().series_instance_uid(), "1.2.3.4");
        assert_ne!(common.sop_common().sop_instance_uid(), sop);
        assert_eq!(common.equipment().manufacturer(), "");
    }

    #[test]
    fn new_sop_instance_keeps_the_series() {
        let mut common = IodCommon::default();
        common.import(&image(), false, false, true).unwrap();
        common.create_new_sop_instance();
        assert_eq!(common.series().series_instance_uid(), "1.2.3.4");
        assert!(common.sop_common().sop_instance_uid().starts_with("2.25."));
    }
}
