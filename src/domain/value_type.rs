use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The payload kind of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueType {
    /// Heading/grouping item.
    Container,
    /// Free text.
    Text,
    /// Coded value.
    Code,
    /// Numeric measurement.
    Num,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    DateTime,
    /// Unique identifier.
    UidRef,
    /// Person name.
    PName,
    /// Reference to an image.
    Image,
    /// Reference to a waveform.
    Waveform,
    /// Reference to any composite object.
    Composite,
    /// By-reference relationship to another content item of the same tree.
    Reference,
    /// Value type found in input that this crate does not understand.
    ///
    /// Nodes of this type make the tree invalid for output.
    Unknown,
}

impl ValueType {
    /// All value types a content item can be created with.
    pub const ALL: [Self; 13] = [
        Self::Container,
        Self::Text,
        Self::Code,
        Self::Num,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::UidRef,
        Self::PName,
        Self::Image,
        Self::Waveform,
        Self::Composite,
        Self::Reference,
    ];

    /// The defined term written to the Value Type attribute.
    ///
    /// By-reference items carry no value type attribute, hence `None`.
    #[must_use]
    pub const fn defined_term(self) -> Option<&'static str> {
        match self {
            Self::Container => Some("CONTAINER"),
            Self::Text => Some("TEXT"),
            Self::Code => Some("CODE"),
            Self::Num => Some("NUM"),
            Self::Date => Some("DATE"),
            Self::Time => Some("TIME"),
            Self::DateTime => Some("DATETIME"),
            Self::UidRef => Some("UIDREF"),
            Self::PName => Some("PNAME"),
            Self::Image => Some("IMAGE"),
            Self::Waveform => Some("WAVEFORM"),
            Self::Composite => Some("COMPOSITE"),
            Self::Reference | Self::Unknown => None,
        }
    }

    /// Maps a defined term to a value type.
    #[must_use]
    pub fn from_defined_term(term: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|value_type| value_type.defined_term() == Some(term.trim()))
    }

    /// Element name used in the XML form.
    #[must_use]
    pub const fn xml_name(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Text => "text",
            Self::Code => "code",
            Self::Num => "num",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::UidRef => "uidref",
            Self::PName => "pname",
            Self::Image => "image",
            Self::Waveform => "waveform",
            Self::Composite => "composite",
            Self::Reference => "reference",
            Self::Unknown => "unknown",
        }
    }

    /// Maps an XML element name to a value type.
    #[must_use]
    pub fn from_xml_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|value_type| value_type.xml_name() == name)
    }

    /// Whether content items of this type hold a plain string value.
    #[must_use]
    pub const fn has_string_value(self) -> bool {
        matches!(
            self,
            Self::Text | Self::Date | Self::Time | Self::DateTime | Self::UidRef | Self::PName
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Reference => write!(f, "by-reference"),
            Self::Unknown => write!(f, "unknown"),
            other => write!(f, "{}", other.defined_term().unwrap_or_default()),
        }
    }
}

impl FromStr for ValueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_defined_term(s)
            .ok_or_else(|| Error::UnsupportedValue(format!("value type '{s}'")))
    }
}

/// The edge label describing how a content item relates to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelationshipType {
    /// Not yet known, only valid for the top-level items of a subtree or
    /// template that still has to be inserted somewhere.
    Unknown,
    /// The document root.
    IsRoot,
    /// `CONTAINS`
    Contains,
    /// `HAS OBS CONTEXT`
    HasObsContext,
    /// `HAS ACQ CONTEXT`
    HasAcqContext,
    /// `HAS CONCEPT MOD`
    HasConceptMod,
    /// `HAS PROPERTIES`
    HasProperties,
    /// `INFERRED FROM`
    InferredFrom,
    /// `SELECTED FROM`
    SelectedFrom,
}

impl RelationshipType {
    /// Relationship types that may label an edge below the root.
    pub const EDGES: [Self; 7] = [
        Self::Contains,
        Self::HasObsContext,
        Self::HasAcqContext,
        Self::HasConceptMod,
        Self::HasProperties,
        Self::InferredFrom,
        Self::SelectedFrom,
    ];

    /// The defined term written to the Relationship Type attribute.
    #[must_use]
    pub const fn defined_term(self) -> Option<&'static str> {
        match self {
            Self::Contains => Some("CONTAINS"),
            Self::HasObsContext => Some("HAS OBS CONTEXT"),
            Self::HasAcqContext => Some("HAS ACQ CONTEXT"),
            Self::HasConceptMod => Some("HAS CONCEPT MOD"),
            Self::HasProperties => Some("HAS PROPERTIES"),
            Self::InferredFrom => Some("INFERRED FROM"),
            Self::SelectedFrom => Some("SELECTED FROM"),
            Self::Unknown | Self::IsRoot => None,
        }
    }

    /// Maps a defined term to a relationship type.
    #[must_use]
    pub fn from_defined_term(term: &str) -> Option<Self> {
        Self::EDGES
            .into_iter()
            .find(|relationship| relationship.defined_term() == Some(term.trim()))
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::IsRoot => write!(f, "root"),
            other => write!(f, "{}", other.defined_term().unwrap_or_default()),
        }
    }
}

impl FromStr for RelationshipType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_defined_term(s)
            .ok_or_else(|| Error::UnsupportedValue(format!("relationship type '{s}'")))
    }
}

/// Where a new content item goes relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddMode {
    /// Next sibling of the current item.
    #[default]
    AfterCurrent,
    /// Previous sibling of the current item.
    BeforeCurrent,
    /// Last child of the current item.
    BelowCurrent,
    /// First child of the current item.
    BelowCurrentBeforeFirstChild,
}

impl AddMode {
    /// Whether the new item becomes a child (rather than a sibling) of the
    /// current item.
    #[must_use]
    pub const fn is_below(self) -> bool {
        matches!(self, Self::BelowCurrent | Self::BelowCurrentBeforeFirstChild)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(ValueType::Container, "CONTAINER")]
    #[test_case(ValueType::UidRef, "UIDREF")]
    #[test_case(ValueType::PName, "PNAME")]
    #[test_case(ValueType::DateTime, "DATETIME")]
    fn defined_terms_parse_back(value_type: ValueType, term: &str) {
        assert_eq!(value_type.defined_term(), Some(term));
        assert_eq!(term.parse::<ValueType>().unwrap(), value_type);
    }

    #[test]
    fn by_reference_has_no_defined_term() {
        assert_eq!(ValueType::Reference.defined_term(), None);
        assert!("REFERENCE".parse::<ValueType>().is_err());
    }

    #[test]
    fn relationship_terms_round_trip() {
        for relationship in RelationshipType::EDGES {
            let term = relationship.defined_term().unwrap();
            assert_eq!(term.parse::<RelationshipType>().unwrap(), relationship);
        }
        assert!("IS ROOT".parse::<RelationshipType>().is_err());
    }

    #[test]
    fn xml_names_are_unique() {
        for value_type in ValueType::ALL {
            assert_eq!(
                ValueType::from_xml_name(value_type.xml_name()),
                Some(value_type)
            );
        }
    }
}
