use chrono::Local;

use crate::modules::ensure_uid;

attribute_module! {
    /// SOP Common Module.
    SopCommonModule {
        /// SOP Class UID.
        sop_class_uid, set_sop_class_uid: SOP_CLASS_UID UI Type1;
        /// SOP Instance UID.
        sop_instance_uid, set_sop_instance_uid: SOP_INSTANCE_UID UI Type1;
        /// Specific Character Set.
        specific_character_set, set_specific_character_set: SPECIFIC_CHARACTER_SET CS Type3;
        /// Instance Creation Date.
        instance_creation_date, set_instance_creation_date: INSTANCE_CREATION_DATE DA Type3;
        /// Instance Creation Time.
        instance_creation_time, set_instance_creation_time: INSTANCE_CREATION_TIME TM Type3;
    }
}

impl SopCommonModule {
    /// Generates a SOP Instance UID if there is none (or it is invalid and
    /// `correct_invalid` is set) and records the creation date and time of
    /// the new instance. Returns whether a new UID was generated.
    pub fn ensure_instance_uid(&mut self, correct_invalid: bool) -> bool {
        let generated = ensure_uid(&mut self.sop_instance_uid, correct_invalid);
        if generated {
            let now = Local::now();
            self.instance_creation_date = now.format("%Y%m%d").to_string();
            self.instance_creation_time = now.format("%H%M%S").to_string();
        }
        generated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::values, modules::AttributeModule};

    #[test]
    fn new_instance_uid_sets_creation_date() {
        let mut sop = SopCommonModule::default();
        assert!(sop.ensure_instance_uid(false));
        assert!(values::is_valid_uid(sop.sop_instance_uid()));
        assert!(values::is_valid_date(sop.instance_creation_date()));
        assert!(values::is_valid_time(sop.instance_creation_time()));

        let uid = sop.sop_instance_uid().to_string();
        assert!(!sop.ensure_instance_uid(true));
        assert_eq!(sop.sop_instance_uid(), uid);
    }

    #[test]
    fn missing_class_uid_fails_to_write() {
        let mut sop = SopCommonModule::default();
        sop.ensure_instance_uid(false);
        let mut dataset = crate::storage::Dataset::new();
        assert!(sop.write(&mut dataset).is_err());
    }
}
