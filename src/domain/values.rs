//! Value payloads of content items and the format checks applied to them.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::{CodedEntry, NodeId, ValueType},
    Error,
};

static DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8}$").unwrap());
static TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3])([0-5]\d([0-5]\d(\.\d{1,6})?)?)?$").unwrap());
static DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}(\d{2}(\d{2}(\d{2}(\d{2}(\d{2}(\.\d{1,6})?)?)?)?)?)?([+-]\d{4})?$").unwrap()
});
static UID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0|[1-9]\d*)(\.(0|[1-9]\d*))*$").unwrap());
static DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap());
static CODE_STRING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9_ ]{0,16}$").unwrap());
static POSITION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9]\d*(\.[1-9]\d*)*$").unwrap());

/// Root of UIDs generated from random UUIDs.
const UUID_UID_ROOT: &str = "2.25";

/// Checks a DA value (`YYYYMMDD`) including the calendar.
#[must_use]
pub fn is_valid_date(value: &str) -> bool {
    DATE.is_match(value) && NaiveDate::parse_from_str(value, "%Y%m%d").is_ok()
}

/// Checks a TM value (`HH[MM[SS[.FFFFFF]]]`).
#[must_use]
pub fn is_valid_time(value: &str) -> bool {
    TIME.is_match(value)
}

/// Checks a DT value (`YYYY[MM[DD[HH[MM[SS[.F]]]]]][&ZZXX]`).
#[must_use]
pub fn is_valid_date_time(value: &str) -> bool {
    DATE_TIME.is_match(value) && (value.len() < 8 || is_valid_date(&value[..8]))
}

/// Checks a UI value: dotted numeric components, no leading zeros, at most 64
/// characters.
#[must_use]
pub fn is_valid_uid(value: &str) -> bool {
    value.len() <= 64 && UID.is_match(value)
}

/// Checks a DS value (decimal string, at most 16 characters).
#[must_use]
pub fn is_valid_decimal(value: &str) -> bool {
    let value = value.trim();
    value.len() <= 16 && DECIMAL.is_match(value)
}

/// Checks a CS value (upper case letters, digits, space, underscore).
#[must_use]
pub fn is_valid_code_string(value: &str) -> bool {
    CODE_STRING.is_match(value.trim_end())
}

/// Checks an SH value (at most 16 characters, no backslash or control
/// characters).
#[must_use]
pub fn is_valid_short_string(value: &str) -> bool {
    value.chars().count() <= 16 && !value.chars().any(|c| c == '\\' || c.is_control())
}

/// Checks a PN value: at most three component groups of at most five
/// components each.
#[must_use]
pub fn is_valid_person_name(value: &str) -> bool {
    let groups: Vec<&str> = value.split('=').collect();
    groups.len() <= 3
        && groups
            .iter()
            .all(|group| group.split('^').count() <= 5 && !group.contains('\\'))
}

/// Checks a content item position string such as `1.2.3`.
#[must_use]
pub fn is_valid_position(value: &str) -> bool {
    POSITION.is_match(value)
}

/// Generates a new globally unique UID below the `2.25` root.
#[must_use]
pub fn generate_uid() -> String {
    format!("{UUID_UID_ROOT}.{}", Uuid::new_v4().as_u128())
}

/// Checks a string value against the format of the given value type.
///
/// # Errors
///
/// Returns [`Error::InvalidValue`] if the value is malformed.
pub fn check_string_value(value_type: ValueType, value: &str) -> Result<(), Error> {
    let valid = match value_type {
        ValueType::Text => !value.is_empty(),
        ValueType::Date => is_valid_date(value),
        ValueType::Time => is_valid_time(value),
        ValueType::DateTime => is_valid_date_time(value),
        ValueType::UidRef => is_valid_uid(value),
        ValueType::PName => !value.is_empty() && is_valid_person_name(value),
        _ => true,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidValue(format!(
            "'{value}' is not a valid {value_type} value"
        )))
    }
}

/// Whether a container presents its children as separate items or as one
/// continuous text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContinuityOfContent {
    /// `SEPARATE`
    #[default]
    Separate,
    /// `CONTINUOUS`
    Continuous,
}

impl ContinuityOfContent {
    /// The defined term.
    #[must_use]
    pub const fn defined_term(self) -> &'static str {
        match self {
            Self::Separate => "SEPARATE",
            Self::Continuous => "CONTINUOUS",
        }
    }

    /// Maps a defined term.
    #[must_use]
    pub fn from_defined_term(term: &str) -> Option<Self> {
        match term.trim() {
            "SEPARATE" => Some(Self::Separate),
            "CONTINUOUS" => Some(Self::Continuous),
            _ => None,
        }
    }
}

/// A numeric measurement: decimal value, unit and optional qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NumericMeasurement {
    /// Decimal string, empty if only a qualifier is given.
    pub value: String,
    /// Measurement unit.
    pub unit: CodedEntry,
    /// Numeric value qualifier (e.g. "Not a number").
    pub qualifier: Option<CodedEntry>,
}

impl NumericMeasurement {
    /// Creates a measurement without qualifier.
    pub fn new(value: impl Into<String>, unit: impl Into<CodedEntry>) -> Self {
        Self {
            value: value.into(),
            unit: unit.into(),
            qualifier: None,
        }
    }

    /// Creates an empty measurement that only carries a qualifier.
    pub fn qualified(qualifier: impl Into<CodedEntry>) -> Self {
        Self {
            value: String::new(),
            unit: CodedEntry::default(),
            qualifier: Some(qualifier.into()),
        }
    }

    /// Whether neither value nor qualifier is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.qualifier.is_none()
    }

    /// Checks the value, unit and qualifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if a component is malformed.
    pub fn check(&self) -> Result<(), Error> {
        if self.value.is_empty() {
            return match &self.qualifier {
                Some(qualifier) => qualifier.check(),
                None => Err(Error::InvalidValue(
                    "numeric measurement without value and qualifier".to_string(),
                )),
            };
        }
        if !is_valid_decimal(&self.value) {
            return Err(Error::InvalidValue(format!(
                "'{}' is not a valid decimal string",
                self.value
            )));
        }
        self.unit.check()?;
        self.qualifier.as_ref().map_or(Ok(()), CodedEntry::check)
    }
}

/// A reference to a composite object by SOP class and instance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SopReference {
    /// Referenced SOP class UID.
    pub sop_class_uid: String,
    /// Referenced SOP instance UID.
    pub sop_instance_uid: String,
}

impl SopReference {
    /// Creates a reference.
    pub fn new(sop_class_uid: impl Into<String>, sop_instance_uid: impl Into<String>) -> Self {
        Self {
            sop_class_uid: sop_class_uid.into(),
            sop_instance_uid: sop_instance_uid.into(),
        }
    }

    /// Whether both UIDs are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sop_class_uid.is_empty() && self.sop_instance_uid.is_empty()
    }

    /// Checks that both UIDs are present and valid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if a UID is missing or malformed.
    pub fn check(&self) -> Result<(), Error> {
        for uid in [&self.sop_class_uid, &self.sop_instance_uid] {
            if !is_valid_uid(uid) || uid.is_empty() {
                return Err(Error::InvalidValue(format!("'{uid}' is not a valid UID")));
            }
        }
        Ok(())
    }
}

/// A reference to an image, optionally restricted to frames or segments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageReference {
    /// The referenced image instance.
    pub sop: SopReference,
    /// Referenced frame numbers.
    #[serde(default)]
    pub frames: Vec<u32>,
    /// Referenced segment numbers.
    #[serde(default)]
    pub segments: Vec<u32>,
    /// Presentation state to apply to the image.
    #[serde(default)]
    pub presentation_state: Option<SopReference>,
}

impl ImageReference {
    /// Creates a reference to a whole image.
    pub fn new(sop_class_uid: impl Into<String>, sop_instance_uid: impl Into<String>) -> Self {
        Self {
            sop: SopReference::new(sop_class_uid, sop_instance_uid),
            ..Self::default()
        }
    }

    /// Checks the referenced UIDs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if a UID is missing or malformed, or if
    /// both frames and segments are given.
    pub fn check(&self) -> Result<(), Error> {
        self.sop.check()?;
        if !self.frames.is_empty() && !self.segments.is_empty() {
            return Err(Error::InvalidValue(
                "image reference lists both frames and segments".to_string(),
            ));
        }
        self.presentation_state
            .as_ref()
            .map_or(Ok(()), SopReference::check)
    }
}

/// A reference to a waveform, optionally restricted to channels.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WaveformReference {
    /// The referenced waveform instance.
    pub sop: SopReference,
    /// Referenced channels as flat (multiplex group, channel) pairs.
    #[serde(default)]
    pub channels: Vec<u16>,
}

impl WaveformReference {
    /// Checks the referenced UIDs and the channel list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if a UID is malformed or the channel
    /// list has an odd number of entries.
    pub fn check(&self) -> Result<(), Error> {
        self.sop.check()?;
        if self.channels.len() % 2 == 0 {
            Ok(())
        } else {
            Err(Error::InvalidValue(
                "waveform channel list must contain pairs".to_string(),
            ))
        }
    }
}

/// Target of a by-reference relationship.
///
/// The position string is what is stored in a dataset; the node id is the
/// in-memory resolution of that position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceTarget {
    /// Position of the target, e.g. `1.2.3`.
    pub position: String,
    /// Resolved target node.
    pub node: Option<NodeId>,
    /// Value type of the resolved target.
    pub value_type: Option<ValueType>,
}

impl ReferenceTarget {
    /// Creates an unresolved reference to the given position.
    pub fn to_position(position: impl Into<String>) -> Self {
        Self {
            position: position.into(),
            ..Self::default()
        }
    }

    /// Creates a reference to the given node.
    #[must_use]
    pub const fn to_node(node: NodeId, value_type: ValueType) -> Self {
        Self {
            position: String::new(),
            node: Some(node),
            value_type: Some(value_type),
        }
    }
}

/// The payload of a content item. The variant always matches the item's value
/// type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Container payload.
    Container(ContinuityOfContent),
    /// Text payload.
    Text(String),
    /// Code payload, `None` until set.
    Code(Option<CodedEntry>),
    /// Numeric payload.
    Num(NumericMeasurement),
    /// Date payload.
    Date(String),
    /// Time payload.
    Time(String),
    /// Date/time payload.
    DateTime(String),
    /// UID payload.
    UidRef(String),
    /// Person name payload.
    PName(String),
    /// Image reference payload.
    Image(ImageReference),
    /// Waveform reference payload.
    Waveform(WaveformReference),
    /// Composite reference payload.
    Composite(SopReference),
    /// By-reference payload.
    Reference(ReferenceTarget),
    /// Payload of an unsupported value type, carrying the defined term found
    /// in the input.
    Unknown(String),
}

impl Value {
    /// The empty payload for a value type.
    #[must_use]
    pub fn empty(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Container => Self::Container(ContinuityOfContent::default()),
            ValueType::Text => Self::Text(String::new()),
            ValueType::Code => Self::Code(None),
            ValueType::Num => Self::Num(NumericMeasurement::default()),
            ValueType::Date => Self::Date(String::new()),
            ValueType::Time => Self::Time(String::new()),
            ValueType::DateTime => Self::DateTime(String::new()),
            ValueType::UidRef => Self::UidRef(String::new()),
            ValueType::PName => Self::PName(String::new()),
            ValueType::Image => Self::Image(ImageReference::default()),
            ValueType::Waveform => Self::Waveform(WaveformReference::default()),
            ValueType::Composite => Self::Composite(SopReference::default()),
            ValueType::Reference => Self::Reference(ReferenceTarget::default()),
            ValueType::Unknown => Self::Unknown(String::new()),
        }
    }

    /// The value type this payload belongs to.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Container(_) => ValueType::Container,
            Self::Text(_) => ValueType::Text,
            Self::Code(_) => ValueType::Code,
            Self::Num(_) => ValueType::Num,
            Self::Date(_) => ValueType::Date,
            Self::Time(_) => ValueType::Time,
            Self::DateTime(_) => ValueType::DateTime,
            Self::UidRef(_) => ValueType::UidRef,
            Self::PName(_) => ValueType::PName,
            Self::Image(_) => ValueType::Image,
            Self::Waveform(_) => ValueType::Waveform,
            Self::Composite(_) => ValueType::Composite,
            Self::Reference(_) => ValueType::Reference,
            Self::Unknown(_) => ValueType::Unknown,
        }
    }

    /// The string payload of string-valued types.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s)
            | Self::Date(s)
            | Self::Time(s)
            | Self::DateTime(s)
            | Self::UidRef(s)
            | Self::PName(s) => Some(s),
            _ => None,
        }
    }

    /// Checks the payload's format.
    ///
    /// Containers and by-reference items are always valid here; references
    /// are checked against the tree elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] for malformed payloads and
    /// [`Error::UnsupportedValue`] for unknown ones.
    pub fn check(&self) -> Result<(), Error> {
        match self {
            Self::Container(_) | Self::Reference(_) => Ok(()),
            Self::Code(Some(code)) => code.check(),
            Self::Code(None) => Err(Error::InvalidValue("code value not set".to_string())),
            Self::Num(measurement) => measurement.check(),
            Self::Image(image) => image.check(),
            Self::Waveform(waveform) => waveform.check(),
            Self::Composite(sop) => sop.check(),
            Self::Unknown(term) => Err(Error::UnsupportedValue(format!("value type '{term}'"))),
            other => check_string_value(other.value_type(), other.as_str().unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("20240229", true; "leap day")]
    #[test_case("20230229", false; "not a leap year")]
    #[test_case("2024-01-01", false; "dashes")]
    fn dates(value: &str, expected: bool) {
        assert_eq!(is_valid_date(value), expected);
    }

    #[test_case("1230", true)]
    #[test_case("235959.123456", true)]
    #[test_case("2400", false)]
    #[test_case("12:30", false)]
    fn times(value: &str, expected: bool) {
        assert_eq!(is_valid_time(value), expected);
    }

    #[test_case("1.2.840.10008.5.1.4.1.1.88.33", true)]
    #[test_case("1.02.3", false)]
    #[test_case("1..2", false)]
    fn uids(value: &str, expected: bool) {
        assert_eq!(is_valid_uid(value), expected);
    }

    #[test]
    fn generated_uids_are_valid_and_distinct() {
        let a = generate_uid();
        let b = generate_uid();
        assert!(is_valid_uid(&a), "{a}");
        assert_ne!(a, b);
    }

    #[test]
    fn qualified_measurement_needs_no_value() {
        let qualifier = CodedEntry::new("114000", "DCM", "Not a number");
        assert!(NumericMeasurement::qualified(qualifier).check().is_ok());
        assert!(NumericMeasurement::default().check().is_err());
    }

    #[test]
    fn empty_payload_matches_value_type() {
        for value_type in ValueType::ALL {
            assert_eq!(Value::empty(value_type).value_type(), value_type);
        }
    }
}
