use chrono::Local;

use crate::{
    modules::{check_value, read_field, Extras},
    storage::{tags, AccessError, Dataset, Vr},
    Error,
};

/// One item of the Verifying Observer Sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyingObserver {
    /// Verifying Observer Name.
    pub name: String,
    /// Verifying Organization.
    pub organization: String,
    /// Verification Date Time.
    pub date_time: String,
}

attribute_module! {
    /// SR Document General Module.
    ///
    /// A document flagged `VERIFIED` needs at least one verifying observer.
    SrDocumentGeneralModule {
        /// Instance Number.
        instance_number, set_instance_number: INSTANCE_NUMBER IS Type1;
        /// Completion Flag, `PARTIAL` or `COMPLETE`.
        completion_flag, set_completion_flag: COMPLETION_FLAG CS Type1;
        /// Completion Flag Description.
        completion_flag_description, set_completion_flag_description:
            COMPLETION_FLAG_DESCRIPTION LO Type3;
        /// Verification Flag, `UNVERIFIED` or `VERIFIED`.
        verification_flag, set_verification_flag: VERIFICATION_FLAG CS Type1;
        /// Preliminary Flag, `PRELIMINARY` or `FINAL`.
        preliminary_flag, set_preliminary_flag: PRELIMINARY_FLAG CS Type3;
        /// Content Date.
        content_date, set_content_date: CONTENT_DATE DA Type1;
        /// Content Time.
        content_time, set_content_time: CONTENT_TIME TM Type1;
    }
    extra {
        verifying_observers: Vec<VerifyingObserver>,
    }
}

impl SrDocumentGeneralModule {
    /// The verifying observers, in the order they verified the document.
    #[must_use]
    pub fn verifying_observers(&self) -> &[VerifyingObserver] {
        &self.verifying_observers
    }

    /// Sets content date and time to now.
    pub fn set_content_date_time_now(&mut self) {
        let now = Local::now();
        self.content_date = now.format("%Y%m%d").to_string();
        self.content_time = now.format("%H%M%S").to_string();
    }

    /// Records a verification by `name` of `organization` and flags the
    /// document as `VERIFIED`. Without `date_time` the current time is used.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidValue`] if the name or organization is
    /// empty, or if `check` is set and a value is malformed.
    pub fn verify(
        &mut self,
        name: &str,
        organization: &str,
        date_time: Option<&str>,
        check: bool,
    ) -> Result<(), Error> {
        if name.trim().is_empty() || organization.trim().is_empty() {
            return Err(Error::InvalidValue(
                "verifying observer needs a name and an organization".to_string(),
            ));
        }
        let date_time = date_time.map_or_else(
            || Local::now().format("%Y%m%d%H%M%S").to_string(),
            str::to_string,
        );
        if check {
            check_value(tags::VERIFYING_OBSERVER_NAME, Vr::PN, name)?;
            check_value(tags::VERIFICATION_DATE_TIME, Vr::DT, &date_time)?;
        }
        self.verifying_observers.push(VerifyingObserver {
            name: name.trim().to_string(),
            organization: organization.trim().to_string(),
            date_time,
        });
        self.verification_flag = "VERIFIED".to_string();
        Ok(())
    }

    /// Starts over as instance 1 of a partial, unverified document with
    /// the current content date and time.
    pub fn reset(&mut self) {
        self.instance_number = "1".to_string();
        self.completion_flag = "PARTIAL".to_string();
        self.completion_flag_description.clear();
        self.unverify();
        self.set_content_date_time_now();
    }

    /// Flags the document as `COMPLETE`, replacing the completion flag
    /// description.
    pub fn complete(&mut self, description: Option<&str>) {
        self.completion_flag = "COMPLETE".to_string();
        self.completion_flag_description = description.unwrap_or_default().trim().to_string();
    }

    /// Drops all verifications and flags the document as `UNVERIFIED`.
    pub fn unverify(&mut self) {
        self.verifying_observers.clear();
        self.verification_flag = "UNVERIFIED".to_string();
    }
}

impl Extras for SrDocumentGeneralModule {
    fn read_extras(&mut self, dataset: &Dataset, clear_old: bool) -> Result<(), Error> {
        let items = match dataset.get_items(tags::VERIFYING_OBSERVER_SEQUENCE) {
            Ok(items) => items,
            Err(AccessError::NotFound(_)) => {
                if clear_old {
                    self.verifying_observers.clear();
                }
                return Ok(());
            }
            Err(error) => return Err(Error::CorruptedInput(error.to_string())),
        };
        self.verifying_observers = items
            .iter()
            .map(|item| {
                let mut observer = VerifyingObserver::default();
                read_field(&mut observer.name, item, tags::VERIFYING_OBSERVER_NAME, true);
                read_field(&mut observer.organization, item, tags::VERIFYING_ORGANIZATION, true);
                read_field(&mut observer.date_time, item, tags::VERIFICATION_DATE_TIME, true);
                observer
            })
            .collect();
        Ok(())
    }

    fn write_extras(&self, dataset: &mut Dataset) -> Result<(), Error> {
        if self.verifying_observers.is_empty() {
            if self.verification_flag == "VERIFIED" {
                return Err(Error::MissingMandatoryAttribute(format!(
                    "VERIFYING_OBSERVER_SEQUENCE {}",
                    tags::VERIFYING_OBSERVER_SEQUENCE
                )));
            }
            return Ok(());
        }
        let items = self
            .verifying_observers
            .iter()
            .map(|observer| {
                let mut item = Dataset::new();
                item.put_string(tags::VERIFYING_OBSERVER_NAME, Vr::PN, &observer.name);
                item.put_string(tags::VERIFYING_ORGANIZATION, Vr::LO, &observer.organization);
                item.put_string(tags::VERIFICATION_DATE_TIME, Vr::DT, &observer.date_time);
                item
            })
            .collect();
        dataset.put_items(tags::VERIFYING_OBSERVER_SEQUENCE, items);
        Ok(())
    }

    fn clear_extras(&mut self) {
        self.verifying_observers.clear();
    }

    fn extras_empty(&self) -> bool {
        self.verifying_observers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::AttributeModule;

    fn module() -> SrDocumentGeneralModule {
        let mut module = SrDocumentGeneralModule::default();
        module.set_instance_number("1", true).unwrap();
        module.set_completion_flag("PARTIAL", true).unwrap();
        module.set_verification_flag("UNVERIFIED", true).unwrap();
        module.set_content_date_time_now();
        module
    }

    #[test]
    fn verified_document_round_trips_its_observers() {
        let mut module = module();
        module
            .verify("Smith^John", "Hospital", Some("20240102103000"), true)
            .unwrap();
        let mut dataset = Dataset::new();
        module.write(&mut dataset).unwrap();
        assert_eq!(dataset.string(tags::VERIFICATION_FLAG), Some("VERIFIED"));

        let mut read = SrDocumentGeneralModule::default();
        read.read(&dataset, true).unwrap();
        assert_eq!(read, module);
        assert_eq!(read.verifying_observers()[0].organization, "Hospital");
    }

    #[test]
    fn verified_flag_needs_an_observer() {
        let mut module = module();
        module.set_verification_flag("VERIFIED", true).unwrap();
        let error = module.write(&mut Dataset::new()).unwrap_err();
        assert!(matches!(error, Error::MissingMandatoryAttribute(_)));

        module.unverify();
        assert!(module.write(&mut Dataset::new()).is_ok());
    }

    #[test]
    fn observer_needs_an_organization() {
        let mut module = module();
        assert!(module.verify("Smith^John", " ", None, false).is_err());
        assert!(module.verifying_observers().is_empty());
    }
}
