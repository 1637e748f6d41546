use crate::modules::ensure_uid;

attribute_module! {
    /// General Series Module.
    GeneralSeriesModule {
        /// Modality of the series, `SR` for structured reports.
        modality, set_modality: MODALITY CS Type1;
        /// Series Instance UID.
        series_instance_uid, set_series_instance_uid: SERIES_INSTANCE_UID UI Type1;
        /// Series Number.
        series_number, set_series_number: SERIES_NUMBER IS Type2;
        /// Series Date.
        series_date, set_series_date: SERIES_DATE DA Type3;
        /// Series Time.
        series_time, set_series_time: SERIES_TIME TM Type3;
        /// Series Description.
        series_description, set_series_description: SERIES_DESCRIPTION LO Type3;
    }
}

impl GeneralSeriesModule {
    /// Sets the modality defined by the document type.
    pub(crate) fn assign_modality(&mut self, modality: &str) {
        self.modality = modality.to_string();
    }

    /// Generates a Series Instance UID if there is none (or it is invalid and
    /// `correct_invalid` is set). Returns whether a new UID was generated.
    pub fn ensure_instance_uid(&mut self, correct_invalid: bool) -> bool {
        ensure_uid(&mut self.series_instance_uid, correct_invalid)
    }
}
