use super::ContextGroup;
use crate::{domain::NumericMeasurement, Error};

context_group! {
    /// CID 42 Numeric Value Qualifier.
    NumericValueQualifier: CID "42", version "20100608", uid "1.2.840.10008.6.1.31",
    extensible false, "Numeric Value Qualifier" {
        NotANumber => ("114000", "DCM", "Not a number"),
        NegativeInfinity => ("114001", "DCM", "Negative Infinity"),
        PositiveInfinity => ("114002", "DCM", "Positive Infinity"),
        DivideByZero => ("114003", "DCM", "Divide by zero"),
        Underflow => ("114004", "DCM", "Underflow"),
        Overflow => ("114005", "DCM", "Overflow"),
        MeasurementFailure => ("114006", "DCM", "Measurement failure"),
        MeasurementNotAttempted => ("114007", "DCM", "Measurement not attempted"),
        CalculationFailure => ("114008", "DCM", "Calculation failure"),
        ValueOutOfRange => ("114009", "DCM", "Value out of range"),
        ValueUnknown => ("114010", "DCM", "Value unknown"),
        ValueIndeterminate => ("114011", "DCM", "Value indeterminate"),
    }
}

impl NumericMeasurement {
    /// Sets the numeric value qualifier from CID 42.
    pub fn set_numeric_value_qualifier(
        &mut self,
        qualifier: NumericValueQualifier,
        enhanced: bool,
    ) {
        self.qualifier = Some(qualifier.coded_entry(enhanced));
    }

    /// Checks the measurement and that its qualifier, if any, is a member of
    /// CID 42.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if the measurement is malformed or the
    /// qualifier is not in the context group.
    pub fn check_numeric_value_qualifier(&self) -> Result<(), Error> {
        self.check()?;
        match &self.qualifier {
            Some(qualifier) if !NumericValueQualifier::contains(qualifier) => {
                Err(Error::InvalidValue(format!(
                    "numeric value qualifier {qualifier} is not in CID 42"
                )))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CodedEntry;

    #[test]
    fn qualifier_must_come_from_the_group() {
        let mut measurement = NumericMeasurement::default();
        measurement.set_numeric_value_qualifier(NumericValueQualifier::ValueUnknown, false);
        assert!(measurement.check_numeric_value_qualifier().is_ok());

        let other = NumericMeasurement::qualified(CodedEntry::new("1", "99LOCAL", "Guess"));
        assert!(other.check().is_ok());
        assert!(matches!(
            other.check_numeric_value_qualifier(),
            Err(Error::InvalidValue(_))
        ));
    }
}
