use crate::domain::BasicCode;

/// ({pixels}, UCUM, "pixels")
pub const PIXELS: BasicCode = BasicCode::new("{pixels}", "UCUM", "pixels");
/// (deg, UCUM, "degrees")
pub const DEGREES: BasicCode = BasicCode::new("deg", "UCUM", "degrees");
/// ({-1:1}, UCUM, "{-1:1}")
pub const MINUS_1_TO_1: BasicCode = BasicCode::new("{-1:1}", "UCUM", "{-1:1}");
/// (mm, UCUM, "millimeter")
pub const MILLIMETER: BasicCode = BasicCode::new("mm", "UCUM", "millimeter");
/// (cm3, UCUM, "cm3")
pub const CM3: BasicCode = BasicCode::new("cm3", "UCUM", "cm3");
/// (s, UCUM, "s")
pub const S: BasicCode = BasicCode::new("s", "UCUM", "s");
/// (min, UCUM, "min")
pub const MIN: BasicCode = BasicCode::new("min", "UCUM", "min");
/// (Bq, UCUM, "Bq")
pub const BQ: BasicCode = BasicCode::new("Bq", "UCUM", "Bq");
/// (Bq/mol, UCUM, "Bq/mol")
pub const BQ_PER_MOL: BasicCode = BasicCode::new("Bq/mol", "UCUM", "Bq/mol");
/// (mmol/l, UCUM, "mmol/l")
pub const MMOL_PER_L: BasicCode = BasicCode::new("mmol/l", "UCUM", "mmol/l");
/// ({counts}/s, UCUM, "Counts per second")
pub const COUNTS_PER_SECOND: BasicCode = BasicCode::new("{counts}/s", "UCUM", "Counts per second");
