use crate::modules::ensure_uid;

attribute_module! {
    /// General Study Module.
    GeneralStudyModule {
        /// Study Instance UID.
        study_instance_uid, set_study_instance_uid: STUDY_INSTANCE_UID UI Type1;
        /// Study Date.
        study_date, set_study_date: STUDY_DATE DA Type2;
        /// Study Time.
        study_time, set_study_time: STUDY_TIME TM Type2;
        /// Referring Physician's Name.
        referring_physician_name, set_referring_physician_name: REFERRING_PHYSICIAN_NAME PN Type2;
        /// Study ID.
        study_id, set_study_id: STUDY_ID SH Type2;
        /// Accession Number.
        accession_number, set_accession_number: ACCESSION_NUMBER SH Type2;
        /// Study Description.
        study_description, set_study_description: STUDY_DESCRIPTION LO Type3;
    }
}

impl GeneralStudyModule {
    /// Generates a Study Instance UID if there is none (or it is invalid and
    /// `correct_invalid` is set). Returns whether a new UID was generated.
    pub fn ensure_instance_uid(&mut self, correct_invalid: bool) -> bool {
        ensure_uid(&mut self.study_instance_uid, correct_invalid)
    }
}
