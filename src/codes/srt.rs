use crate::domain::BasicCode;

/// (C-10072, SRT, "Radionuclide")
pub const RADIONUCLIDE: BasicCode = BasicCode::new("C-10072", "SRT", "Radionuclide");
/// (F-61FDB, SRT, "Radiopharmaceutical agent")
pub const RADIOPHARMACEUTICAL_AGENT: BasicCode =
    BasicCode::new("F-61FDB", "SRT", "Radiopharmaceutical agent");
/// (G-C340, SRT, "Route of administration")
pub const ROUTE_OF_ADMINISTRATION: BasicCode =
    BasicCode::new("G-C340", "SRT", "Route of administration");
/// (R-42806, SRT, "Half-life of radiopharmaceutical")
pub const HALF_LIFE_OF_RADIOPHARMACEUTICAL: BasicCode =
    BasicCode::new("R-42806", "SRT", "Half-life of radiopharmaceutical");
