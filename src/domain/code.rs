use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{domain::values, Error};

/// A compile-time code triple used for the code constant tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BasicCode {
    /// Code value.
    pub value: &'static str,
    /// Coding scheme designator.
    pub scheme: &'static str,
    /// Code meaning.
    pub meaning: &'static str,
}

impl BasicCode {
    /// Creates a new code triple.
    #[must_use]
    pub const fn new(value: &'static str, scheme: &'static str, meaning: &'static str) -> Self {
        Self {
            value,
            scheme,
            meaning,
        }
    }
}

/// Identification of the context group a code was taken from.
///
/// Only written when a coded entry is produced in enhanced encoding mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeContext {
    /// Context identifier, e.g. `"29"`.
    pub identifier: String,
    /// Mapping resource, e.g. `"DCMR"`.
    pub mapping_resource: String,
    /// Context group version.
    pub version: String,
    /// Context group UID.
    pub uid: String,
}

/// A coded concept: code value, coding scheme (plus optional version) and
/// human-readable meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CodedEntry {
    code_value: String,
    coding_scheme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coding_scheme_version: Option<String>,
    code_meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<CodeContext>,
}

impl CodedEntry {
    /// Creates a coded entry.
    pub fn new(
        code_value: impl Into<String>,
        coding_scheme: impl Into<String>,
        code_meaning: impl Into<String>,
    ) -> Self {
        Self {
            code_value: code_value.into(),
            coding_scheme: coding_scheme.into(),
            coding_scheme_version: None,
            code_meaning: code_meaning.into(),
            context: None,
        }
    }

    /// Sets the coding scheme version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.coding_scheme_version = Some(version.into());
        self
    }

    /// Attaches the identification of the context group the code belongs to.
    #[must_use]
    pub fn with_context(mut self, context: CodeContext) -> Self {
        self.context = Some(context);
        self
    }

    /// The code value.
    #[must_use]
    pub fn code_value(&self) -> &str {
        &self.code_value
    }

    /// The coding scheme designator.
    #[must_use]
    pub fn coding_scheme(&self) -> &str {
        &self.coding_scheme
    }

    /// The coding scheme version, if any.
    #[must_use]
    pub fn coding_scheme_version(&self) -> Option<&str> {
        self.coding_scheme_version.as_deref()
    }

    /// The code meaning.
    #[must_use]
    pub fn code_meaning(&self) -> &str {
        &self.code_meaning
    }

    /// The context group identification, if any.
    #[must_use]
    pub const fn context(&self) -> Option<&CodeContext> {
        self.context.as_ref()
    }

    /// Whether all mandatory components are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.code_value.is_empty() && self.coding_scheme.is_empty() && self.code_meaning.is_empty()
    }

    /// Whether two entries denote the same concept.
    ///
    /// The meaning is ignored, only the value, scheme and (when present on
    /// both sides) the scheme version are compared.
    #[must_use]
    pub fn same_code(&self, other: &Self) -> bool {
        self.code_value == other.code_value
            && self.coding_scheme == other.coding_scheme
            && match (&self.coding_scheme_version, &other.coding_scheme_version) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
    }

    /// Checks that value, scheme and meaning are present and well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] describing the first problem found.
    pub fn check(&self) -> Result<(), Error> {
        if self.code_value.trim().is_empty() {
            return Err(Error::InvalidValue(format!("{self}: empty code value")));
        }
        if self.coding_scheme.trim().is_empty() {
            return Err(Error::InvalidValue(format!("{self}: empty coding scheme")));
        }
        if self.code_meaning.trim().is_empty() {
            return Err(Error::InvalidValue(format!("{self}: empty code meaning")));
        }
        if !values::is_valid_short_string(&self.coding_scheme) {
            return Err(Error::InvalidValue(format!(
                "{self}: malformed coding scheme designator"
            )));
        }
        Ok(())
    }
}

impl From<BasicCode> for CodedEntry {
    fn from(code: BasicCode) -> Self {
        Self::new(code.value, code.scheme, code.meaning)
    }
}

impl PartialEq<BasicCode> for CodedEntry {
    fn eq(&self, other: &BasicCode) -> bool {
        self.code_value == other.value && self.coding_scheme == other.scheme
    }
}

impl fmt::Display for CodedEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{}", self.code_value, self.coding_scheme)?;
        if let Some(version) = &self.coding_scheme_version {
            write!(f, "[{version}]")?;
        }
        write!(f, ",\"{}\")", self.code_meaning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_version() {
        let code = CodedEntry::new("121071", "DCM", "Finding").with_version("01");
        assert_eq!(code.to_string(), "(121071,DCM[01],\"Finding\")");
    }

    #[test]
    fn same_code_ignores_meaning() {
        let a = CodedEntry::new("T-D4000", "SRT", "Abdomen");
        let b = CodedEntry::new("T-D4000", "SRT", "abdomen");
        assert!(a.same_code(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn check_rejects_missing_meaning() {
        let code = CodedEntry::new("1", "99TEST", "");
        let err = code.check().expect_err("meaning is mandatory");
        assert!(matches!(err, Error::InvalidValue(_)));
    }

    #[test]
    fn compares_with_basic_code() {
        const FINDING: BasicCode = BasicCode::new("121071", "DCM", "Finding");
        assert_eq!(CodedEntry::from(FINDING), FINDING);
    }
}
