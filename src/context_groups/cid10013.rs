context_group! {
    /// CID 10013 CT Acquisition Type.
    CtAcquisitionType: CID "10013", version "20120913", uid "1.2.840.10008.6.1.517",
    extensible true, "CT Acquisition Type" {
        SequencedAcquisition => ("113804", "DCM", "Sequenced Acquisition"),
        SpiralAcquisition => ("P5-08001", "SRT", "Spiral Acquisition"),
        ConstantAngleAcquisition => ("113805", "DCM", "Constant Angle Acquisition"),
        StationaryAcquisition => ("113806", "DCM", "Stationary Acquisition"),
        FreeAcquisition => ("113807", "DCM", "Free Acquisition"),
    }
}

impl CtAcquisitionType {
    /// Maps an Acquisition Type (0018,9302) defined term.
    #[must_use]
    pub fn from_acquisition_type(acquisition_type: &str) -> Option<Self> {
        match acquisition_type.trim() {
            "SEQUENCED" => Some(Self::SequencedAcquisition),
            "SPIRAL" => Some(Self::SpiralAcquisition),
            "CONSTANT_ANGLE" => Some(Self::ConstantAngleAcquisition),
            "STATIONARY" => Some(Self::StationaryAcquisition),
            "FREE" => Some(Self::FreeAcquisition),
            _ => None,
        }
    }
}
