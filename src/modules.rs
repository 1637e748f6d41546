//! Flat attribute modules of a composite object.
//!
//! A module is a fixed set of top-level attributes (patient, study, series,
//! equipment, SOP common, SR document general). Values are kept as text the
//! way they appear in the attribute container; setters optionally validate
//! them against the value representation. Writing fails if a type 1
//! attribute is empty, writes type 2 attributes even when empty and skips
//! empty type 3 attributes.

use crate::{
    domain::values,
    storage::{Dataset, Tag, Vr},
    Error,
};

/// Common operations of the attribute modules.
pub trait AttributeModule {
    /// Reads the module's attributes from `dataset`. With `clear_old`,
    /// attributes absent from the dataset are cleared, otherwise their
    /// previous value is kept.
    ///
    /// # Errors
    ///
    /// Fails if a nested structure of the module is malformed.
    fn read(&mut self, dataset: &Dataset, clear_old: bool) -> Result<(), Error>;

    /// Writes the module's attributes into `dataset`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MissingMandatoryAttribute`] if a type 1 attribute
    /// is empty.
    fn write(&self, dataset: &mut Dataset) -> Result<(), Error>;

    /// Clears every attribute.
    fn clear_data(&mut self);

    /// Whether every attribute is empty.
    fn is_empty(&self) -> bool;
}

/// Attribute type, i.e. whether and how it must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Presence {
    Type1,
    Type2,
    Type3,
}

/// Module parts that are not flat text attributes.
pub(crate) trait Extras {
    fn read_extras(&mut self, _dataset: &Dataset, _clear_old: bool) -> Result<(), Error> {
        Ok(())
    }

    fn write_extras(&self, _dataset: &mut Dataset) -> Result<(), Error> {
        Ok(())
    }

    fn clear_extras(&mut self) {}

    fn extras_empty(&self) -> bool {
        true
    }
}

pub(crate) fn check_value(tag: Tag, vr: Vr, value: &str) -> Result<(), Error> {
    let valid = value.is_empty()
        || match vr {
            Vr::DA => values::is_valid_date(value),
            Vr::TM => values::is_valid_time(value),
            Vr::DT => values::is_valid_date_time(value),
            Vr::UI => values::is_valid_uid(value),
            Vr::CS => values::is_valid_code_string(value),
            Vr::SH => values::is_valid_short_string(value),
            Vr::PN => values::is_valid_person_name(value),
            Vr::DS => values::is_valid_decimal(value),
            Vr::IS => value.len() <= 12 && value.trim().parse::<i64>().is_ok(),
            _ => true,
        };
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidValue(format!("'{value}' is not a valid {vr} value for {tag}")))
    }
}

pub(crate) fn read_field(field: &mut String, dataset: &Dataset, tag: Tag, clear_old: bool) {
    match dataset.text_at(tag, 0) {
        Some(value) => *field = value,
        None if clear_old => field.clear(),
        None => {}
    }
}

pub(crate) fn write_field(
    dataset: &mut Dataset,
    (tag, vr): (Tag, Vr),
    presence: Presence,
    value: &str,
    name: &str,
) -> Result<(), Error> {
    match presence {
        _ if !value.is_empty() => dataset.put_string(tag, vr, value),
        Presence::Type1 => {
            return Err(Error::MissingMandatoryAttribute(format!("{name} {tag}")));
        }
        Presence::Type2 => dataset.put_empty(tag, vr),
        Presence::Type3 => {}
    }
    Ok(())
}

/// Makes sure `uid` holds a UID, generating one if it is empty (or invalid
/// and `correct_invalid` is set). Returns whether a new UID was generated.
pub(crate) fn ensure_uid(uid: &mut String, correct_invalid: bool) -> bool {
    if uid.is_empty() || (correct_invalid && !values::is_valid_uid(uid)) {
        *uid = values::generate_uid();
        true
    } else {
        false
    }
}

macro_rules! attribute_module {
    (
        @define
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident, $setter:ident: $tag:ident $vr:ident $presence:ident;
            )+
        }
        extra {
            $( $(#[$extra_meta:meta])* $extra:ident: $extra_ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            $( $field: String, )+
            $( $(#[$extra_meta])* $extra: $extra_ty, )*
        }

        impl $name {
            $(
                $(#[$field_meta])*
                #[must_use]
                pub fn $field(&self) -> &str {
                    &self.$field
                }

                #[doc = concat!("Sets the value returned by [`Self::", stringify!($field), "`].")]
                ///
                /// # Errors
                ///
                /// Fails with [`Error`](crate::Error) if `check` is set and the
                /// value does not match the value representation.
                pub fn $setter(
                    &mut self,
                    value: impl Into<String>,
                    check: bool,
                ) -> Result<(), $crate::Error> {
                    let value = value.into().trim().to_string();
                    if check {
                        $crate::modules::check_value(
                            $crate::storage::tags::$tag,
                            $crate::storage::Vr::$vr,
                            &value,
                        )?;
                    }
                    self.$field = value;
                    Ok(())
                }
            )+
        }

        impl $crate::modules::AttributeModule for $name {
            fn read(
                &mut self,
                dataset: &$crate::storage::Dataset,
                clear_old: bool,
            ) -> Result<(), $crate::Error> {
                use $crate::modules::Extras as _;
                $(
                    $crate::modules::read_field(
                        &mut self.$field,
                        dataset,
                        $crate::storage::tags::$tag,
                        clear_old,
                    );
                )+
                self.read_extras(dataset, clear_old)
            }

            fn write(&self, dataset: &mut $crate::storage::Dataset) -> Result<(), $crate::Error> {
                use $crate::modules::Extras as _;
                $(
                    $crate::modules::write_field(
                        dataset,
                        ($crate::storage::tags::$tag, $crate::storage::Vr::$vr),
                        $crate::modules::Presence::$presence,
                        &self.$field,
                        stringify!($tag),
                    )?;
                )+
                self.write_extras(dataset)
            }

            fn clear_data(&mut self) {
                use $crate::modules::Extras as _;
                $( self.$field.clear(); )+
                self.clear_extras();
            }

            fn is_empty(&self) -> bool {
                use $crate::modules::Extras as _;
                $( self.$field.is_empty() && )+ self.extras_empty()
            }
        }
    };
    (
        $(#[$meta:meta])*
        $name:ident { $($fields:tt)+ }
        extra { $($extra:tt)* }
    ) => {
        attribute_module!(@define $(#[$meta])* $name { $($fields)+ } extra { $($extra)* });
    };
    (
        $(#[$meta:meta])*
        $name:ident { $($fields:tt)+ }
    ) => {
        attribute_module!(@define $(#[$meta])* $name { $($fields)+ } extra {});
        impl $crate::modules::Extras for $name {}
    };
}

mod patient;
pub use patient::PatientModule;

mod general_study;
pub use general_study::GeneralStudyModule;

mod general_series;
pub use general_series::GeneralSeriesModule;

mod general_equipment;
pub use general_equipment::GeneralEquipmentModule;

mod sop_common;
pub use sop_common::SopCommonModule;

mod sr_document_general;
pub use sr_document_general::{SrDocumentGeneralModule, VerifyingObserver};

mod iod_common;
pub use iod_common::IodCommon;

mod real_world_value_mapping;
pub use real_world_value_mapping::{RealWorldValueMapping, RealWorldValueMappingItem};

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::storage::tags;

    #[test_case(Vr::DA, "20240229", true; "leap day")]
    #[test_case(Vr::DA, "20230229", false; "no leap day")]
    #[test_case(Vr::TM, "1230", true; "short time")]
    #[test_case(Vr::UI, "1.2.840.10008", true; "uid")]
    #[test_case(Vr::UI, "1.02", false; "leading zero")]
    #[test_case(Vr::IS, "42", true; "integer string")]
    #[test_case(Vr::IS, "4.2", false; "decimal as integer string")]
    #[test_case(Vr::CS, "lower", false; "lower case code string")]
    #[test_case(Vr::LO, "anything goes", true; "long string")]
    #[test_case(Vr::DA, "", true; "empty")]
    fn values_are_checked_against_their_vr(vr: Vr, value: &str, valid: bool) {
        assert_eq!(check_value(tags::STUDY_DATE, vr, value).is_ok(), valid);
    }

    #[test]
    fn presence_controls_empty_values() {
        let mut dataset = Dataset::new();
        let study_id = (tags::STUDY_ID, Vr::SH);
        write_field(&mut dataset, study_id, Presence::Type2, "", "STUDY_ID").unwrap();
        let description = (tags::STUDY_DESCRIPTION, Vr::LO);
        write_field(&mut dataset, description, Presence::Type3, "", "STUDY_DESCRIPTION").unwrap();
        assert!(dataset.contains(tags::STUDY_ID));
        assert!(!dataset.contains(tags::STUDY_DESCRIPTION));

        let error = write_field(
            &mut dataset,
            (tags::SOP_CLASS_UID, Vr::UI),
            Presence::Type1,
            "",
            "SOP_CLASS_UID",
        )
        .unwrap_err();
        assert!(matches!(error, Error::MissingMandatoryAttribute(_)));
    }

    #[test]
    fn invalid_uids_are_replaced_on_request() {
        let mut uid = "1.02".to_string();
        assert!(!ensure_uid(&mut uid, false));
        assert_eq!(uid, "1.02");
        assert!(ensure_uid(&mut uid, true));
        assert!(uid.starts_with("2.25."));
        assert!(values::is_valid_uid(&uid));
    }
}
