//! Code constants of the coding schemes the templates draw their concept
//! names and units from.
//!
//! Constants are named after a cleaned-up version of the code meaning.

/// DICOM controlled terminology (`DCM`).
pub mod dcm;

/// SNOMED-RT style codes (`SRT`).
pub mod srt;

/// Unified Code for Units of Measure (`UCUM`).
pub mod ucum;
