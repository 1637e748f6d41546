//! A generic attribute container: tags mapped to typed values, with nested
//! sequences of items.
//!
//! The JSON form follows the DICOM JSON model (`{"GGGGEEEE": {"vr": "..",
//! "Value": [..]}}`) except that decimal and integer strings stay strings.

use std::{collections::BTreeMap, fmt, fs, io, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An attribute tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag {
    /// Group number.
    pub group: u16,
    /// Element number.
    pub element: u16,
}

impl Tag {
    /// Creates a tag.
    #[must_use]
    pub const fn new(group: u16, element: u16) -> Self {
        Self { group, element }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.group, self.element)
    }
}

impl FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex: String = s.chars().filter(char::is_ascii_hexdigit).collect();
        if hex.len() != 8 {
            return Err(format!("invalid tag '{s}'"));
        }
        let parse = |part: &str| {
            u16::from_str_radix(part, 16).map_err(|e| format!("invalid tag '{s}': {e}"))
        };
        Ok(Self::new(parse(&hex[..4])?, parse(&hex[4..])?))
    }
}

impl TryFrom<String> for Tag {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        format!("{:04X}{:04X}", tag.group, tag.element)
    }
}

/// Value representation of an attribute.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vr {
    /// Application entity
    AE,
    /// Code string
    CS,
    /// Date
    DA,
    /// Decimal string
    DS,
    /// Date/time
    DT,
    /// 64-bit float
    FD,
    /// Integer string
    IS,
    /// Long string
    LO,
    /// Long text
    LT,
    /// Other byte
    OB,
    /// Person name
    PN,
    /// Short string
    SH,
    /// Sequence of items
    SQ,
    /// Short text
    ST,
    /// Time
    TM,
    /// Unique identifier
    UI,
    /// Unsigned 32-bit integer
    UL,
    /// Unsigned 16-bit integer
    US,
    /// Unlimited text
    UT,
}

impl Vr {
    const fn is_binary_integer(self) -> bool {
        matches!(self, Self::UL | Self::US)
    }
}

impl fmt::Display for Vr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The values of an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Values {
    /// String values (text, codes, dates, UIDs, decimal and integer strings).
    Strings(Vec<String>),
    /// Binary integer values.
    Integers(Vec<i64>),
    /// Binary floating point values.
    Decimals(Vec<f64>),
    /// Sequence items.
    Items(Vec<Dataset>),
}

impl Values {
    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Strings(values) => values.len(),
            Self::Integers(values) => values.len(),
            Self::Decimals(values) => values.len(),
            Self::Items(values) => values.len(),
        }
    }

    /// Whether there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::Strings(_) => "string",
            Self::Integers(_) => "integer",
            Self::Decimals(_) => "decimal",
            Self::Items(_) => "sequence",
        }
    }
}

#[derive(Deserialize)]
struct RawElement {
    vr: Vr,
    #[serde(rename = "Value", default)]
    value: Option<Values>,
}

/// One attribute: value representation plus values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawElement")]
pub struct Element {
    vr: Vr,
    #[serde(rename = "Value", skip_serializing_if = "Values::is_empty")]
    value: Values,
}

impl From<RawElement> for Element {
    fn from(raw: RawElement) -> Self {
        let value = match (raw.vr, raw.value) {
            (Vr::SQ, None | Some(Values::Strings(_))) => Values::Items(Vec::new()),
            (vr, None) if vr.is_binary_integer() => Values::Integers(Vec::new()),
            (Vr::FD, None) => Values::Decimals(Vec::new()),
            (Vr::FD, Some(Values::Integers(values))) => {
                #[allow(clippy::cast_precision_loss)]
                let values = values.into_iter().map(|v| v as f64).collect();
                Values::Decimals(values)
            }
            (_, None) => Values::Strings(Vec::new()),
            (_, Some(value)) => value,
        };
        Self { vr: raw.vr, value }
    }
}

impl Element {
    /// The value representation.
    #[must_use]
    pub const fn vr(&self) -> Vr {
        self.vr
    }

    /// The values.
    #[must_use]
    pub const fn values(&self) -> &Values {
        &self.value
    }
}

/// Failure of a typed attribute accessor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The attribute is absent.
    #[error("attribute {0} not found")]
    NotFound(Tag),

    /// The attribute holds another kind of value.
    #[error("attribute {tag} ({vr}) holds {actual} values, not {expected}")]
    VrMismatch {
        /// The attribute.
        tag: Tag,
        /// Its value representation.
        vr: Vr,
        /// The kind of value requested.
        expected: &'static str,
        /// The kind of value stored.
        actual: &'static str,
    },

    /// The attribute has fewer values than requested.
    #[error("attribute {tag} has no value at index {index}")]
    ValueIndex {
        /// The attribute.
        tag: Tag,
        /// The requested index.
        index: usize,
    },
}

/// Errors that can occur when loading or saving a dataset file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read or written.
    #[error("failed to access dataset file: {0}")]
    Io(#[from] io::Error),

    /// The file content is not a valid dataset.
    #[error("failed to parse dataset: {0}")]
    Json(#[from] serde_json::Error),
}

/// An ordered attribute container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    elements: BTreeMap<Tag, Element>,
}

macro_rules! typed_accessors {
    ($many:ident, $one:ident, $variant:ident, $ty:ty, $kind:literal) => {
        /// All values of the attribute.
        ///
        /// # Errors
        ///
        /// Returns [`AccessError::NotFound`] or [`AccessError::VrMismatch`].
        pub fn $many(&self, tag: Tag) -> Result<&[$ty], AccessError> {
            let element = self.elements.get(&tag).ok_or(AccessError::NotFound(tag))?;
            match &element.value {
                Values::$variant(values) => Ok(values),
                other => Err(AccessError::VrMismatch {
                    tag,
                    vr: element.vr,
                    expected: $kind,
                    actual: other.kind(),
                }),
            }
        }

        /// The value at `index`.
        ///
        /// # Errors
        ///
        /// As for the plural accessor, plus [`AccessError::ValueIndex`].
        pub fn $one(&self, tag: Tag, index: usize) -> Result<&$ty, AccessError> {
            self.$many(tag)?
                .get(index)
                .ok_or(AccessError::ValueIndex { tag, index })
        }
    };
}

impl Dataset {
    /// Creates an empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a dataset from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Saves the dataset as a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), LoadError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the dataset has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether the attribute is present (possibly empty).
    #[must_use]
    pub fn contains(&self, tag: Tag) -> bool {
        self.elements.contains_key(&tag)
    }

    /// The raw attribute.
    #[must_use]
    pub fn get(&self, tag: Tag) -> Option<&Element> {
        self.elements.get(&tag)
    }

    /// Removes an attribute.
    pub fn remove(&mut self, tag: Tag) -> Option<Element> {
        self.elements.remove(&tag)
    }

    /// Attributes in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&Tag, &Element)> {
        self.elements.iter()
    }

    /// Copies every attribute of `other` into this dataset, replacing
    /// existing ones.
    pub fn merge(&mut self, other: Self) {
        self.elements.extend(other.elements);
    }

    typed_accessors!(get_strings, get_string_at, Strings, String, "string");
    typed_accessors!(get_integers, get_integer_at, Integers, i64, "integer");
    typed_accessors!(get_decimals, get_decimal_at, Decimals, f64, "decimal");
    typed_accessors!(get_items, get_item, Items, Dataset, "sequence");

    /// The first string value.
    ///
    /// # Errors
    ///
    /// See [`Self::get_string_at`].
    pub fn get_string(&self, tag: Tag) -> Result<&str, AccessError> {
        self.get_string_at(tag, 0).map(String::as_str)
    }

    /// The first string value, if present and non-empty.
    #[must_use]
    pub fn string(&self, tag: Tag) -> Option<&str> {
        self.get_string(tag)
            .ok()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// The value at `index` as text, if present and non-empty. Binary numbers
    /// are formatted; sequences have no text.
    #[must_use]
    pub fn text_at(&self, tag: Tag, index: usize) -> Option<String> {
        let text = match &self.elements.get(&tag)?.value {
            Values::Strings(values) => values.get(index)?.trim().to_string(),
            Values::Integers(values) => values.get(index)?.to_string(),
            Values::Decimals(values) => values.get(index)?.to_string(),
            Values::Items(_) => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    /// The first integer value.
    ///
    /// # Errors
    ///
    /// See [`Self::get_integer_at`].
    pub fn get_integer(&self, tag: Tag) -> Result<i64, AccessError> {
        self.get_integer_at(tag, 0).copied()
    }

    fn insert(&mut self, tag: Tag, vr: Vr, value: Values) {
        self.elements.insert(tag, Element { vr, value });
    }

    /// Sets a single string value.
    pub fn put_string(&mut self, tag: Tag, vr: Vr, value: impl Into<String>) {
        self.insert(tag, vr, Values::Strings(vec![value.into()]));
    }

    /// Sets several string values.
    pub fn put_strings(&mut self, tag: Tag, vr: Vr, values: Vec<String>) {
        self.insert(tag, vr, Values::Strings(values));
    }

    /// Sets an attribute without value.
    pub fn put_empty(&mut self, tag: Tag, vr: Vr) {
        let value = match vr {
            Vr::SQ => Values::Items(Vec::new()),
            vr if vr.is_binary_integer() => Values::Integers(Vec::new()),
            Vr::FD => Values::Decimals(Vec::new()),
            _ => Values::Strings(Vec::new()),
        };
        self.insert(tag, vr, value);
    }

    /// Sets binary integer values.
    pub fn put_integers(&mut self, tag: Tag, vr: Vr, values: Vec<i64>) {
        self.insert(tag, vr, Values::Integers(values));
    }

    /// Sets binary floating point values.
    pub fn put_decimals(&mut self, tag: Tag, values: Vec<f64>) {
        self.insert(tag, Vr::FD, Values::Decimals(values));
    }

    /// Sets a sequence.
    pub fn put_items(&mut self, tag: Tag, items: Vec<Self>) {
        self.insert(tag, Vr::SQ, Values::Items(items));
    }

    /// Sets a sequence with a single item.
    pub fn put_item(&mut self, tag: Tag, item: Self) {
        self.put_items(tag, vec![item]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: Tag = Tag::new(0x0040, 0xA160);
    const IDS: Tag = Tag::new(0x0040, 0xDB73);
    const CONTENT: Tag = Tag::new(0x0040, 0xA730);

    #[test]
    fn tag_formats() {
        assert_eq!(TEXT.to_string(), "(0040,A160)");
        assert_eq!(String::from(TEXT), "0040A160");
        assert_eq!("(0040,a160)".parse::<Tag>().unwrap(), TEXT);
        assert!("0040A1".parse::<Tag>().is_err());
    }

    #[test]
    fn text_of_numbers_and_strings() {
        let mut dataset = Dataset::new();
        dataset.put_strings(TEXT, Vr::DS, vec![" 0.5 ".to_string(), String::new()]);
        dataset.put_integers(IDS, Vr::US, vec![512]);
        dataset.put_item(CONTENT, Dataset::new());

        assert_eq!(dataset.text_at(TEXT, 0).as_deref(), Some("0.5"));
        assert_eq!(dataset.text_at(TEXT, 1), None);
        assert_eq!(dataset.text_at(IDS, 0).as_deref(), Some("512"));
        assert_eq!(dataset.text_at(CONTENT, 0), None);
    }

    #[test]
    fn typed_access() {
        let mut dataset = Dataset::new();
        dataset.put_string(TEXT, Vr::UT, "finding=normal");
        dataset.put_integers(IDS, Vr::UL, vec![1, 2]);

        assert_eq!(dataset.get_string(TEXT).unwrap(), "finding=normal");
        assert_eq!(dataset.get_integers(IDS).unwrap(), &[1, 2]);
        assert_eq!(
            dataset.get_integer_at(IDS, 5),
            Err(AccessError::ValueIndex { tag: IDS, index: 5 })
        );
        assert!(matches!(
            dataset.get_items(TEXT),
            Err(AccessError::VrMismatch { expected: "sequence", .. })
        ));
        assert_eq!(dataset.get_string(CONTENT), Err(AccessError::NotFound(CONTENT)));
    }

    #[test]
    fn json_keeps_structure() {
        let mut item = Dataset::new();
        item.put_string(TEXT, Vr::UT, "text");
        let mut dataset = Dataset::new();
        dataset.put_item(CONTENT, item);
        dataset.put_integers(IDS, Vr::UL, vec![1, 1]);
        dataset.put_empty(Tag::new(0x0040, 0xA504), Vr::SQ);

        let json = serde_json::to_string(&dataset).unwrap();
        assert!(json.contains("\"0040A730\""), "{json}");
        let parsed: Dataset = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, dataset);
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("item.json");
        let mut dataset = Dataset::new();
        dataset.put_string(TEXT, Vr::UT, "saved");
        dataset.save(&path).unwrap();
        assert_eq!(Dataset::load(&path).unwrap(), dataset);
    }
}
