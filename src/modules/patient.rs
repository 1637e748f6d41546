attribute_module! {
    /// Patient Module.
    PatientModule {
        /// Patient's Name.
        patient_name, set_patient_name: PATIENT_NAME PN Type2;
        /// Patient ID.
        patient_id, set_patient_id: PATIENT_ID LO Type2;
        /// Patient's Birth Date.
        patient_birth_date, set_patient_birth_date: PATIENT_BIRTH_DATE DA Type2;
        /// Patient's Sex (`M`, `F` or `O`).
        patient_sex, set_patient_sex: PATIENT_SEX CS Type2;
    }
}
