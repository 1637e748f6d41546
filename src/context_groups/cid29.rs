use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::ContextGroup;

context_group! {
    /// CID 29 Acquisition Modality.
    AcquisitionModality: CID "29", version "20121101", uid "1.2.840.10008.6.1.19",
    extensible true, "Acquisition Modality" {
        Autorefraction => ("AR", "DCM", "Autorefraction"),
        BoneMineralDensitometry => ("BMD", "DCM", "Bone Mineral Densitometry"),
        UltrasoundBoneDensitometry => ("BDUS", "DCM", "Ultrasound Bone Densitometry"),
        CardiacElectrophysiology => ("EPS", "DCM", "Cardiac Electrophysiology"),
        ComputedRadiography => ("CR", "DCM", "Computed Radiography"),
        ComputedTomography => ("CT", "DCM", "Computed Tomography"),
        DigitalRadiography => ("DX", "DCM", "Digital Radiography"),
        Electrocardiography => ("ECG", "DCM", "Electrocardiography"),
        Endoscopy => ("ES", "DCM", "Endoscopy"),
        ExternalCameraPhotography => ("XC", "DCM", "External-camera Photography"),
        GeneralMicroscopy => ("GM", "DCM", "General Microscopy"),
        HemodynamicWaveform => ("HD", "DCM", "Hemodynamic Waveform"),
        IntraOralRadiography => ("IO", "DCM", "Intra-oral Radiography"),
        IntravascularOpticalCoherenceTomography =>
            ("IVOCT", "DCM", "Intravascular Optical Coherence Tomography"),
        IntravascularUltrasound => ("IVUS", "DCM", "Intravascular Ultrasound"),
        Keratometry => ("KER", "DCM", "Keratometry"),
        Lensometry => ("LEN", "DCM", "Lensometry"),
        MagneticResonance => ("MR", "DCM", "Magnetic Resonance"),
        Mammography => ("MG", "DCM", "Mammography"),
        NuclearMedicine => ("NM", "DCM", "Nuclear Medicine"),
        OphthalmicAxialMeasurements => ("OAM", "DCM", "Ophthalmic Axial Measurements"),
        OpticalCoherenceTomography => ("OCT", "DCM", "Optical Coherence Tomography"),
        OphthalmicMapping => ("OPM", "DCM", "Ophthalmic Mapping"),
        OphthalmicPhotography => ("OP", "DCM", "Ophthalmic Photography"),
        OphthalmicRefraction => ("OPR", "DCM", "Ophthalmic Refraction"),
        OphthalmicTomography => ("OPT", "DCM", "Ophthalmic Tomography"),
        OphthalmicVisualField => ("OPV", "DCM", "Ophthalmic Visual Field"),
        PanoramicXRay => ("PX", "DCM", "Panoramic X-Ray"),
        PositronEmissionTomography => ("PT", "DCM", "Positron emission tomography"),
        Radiofluoroscopy => ("RF", "DCM", "Radiofluoroscopy"),
        RadiographicImaging => ("RG", "DCM", "Radiographic imaging"),
        SlideMicroscopy => ("SM", "DCM", "Slide Microscopy"),
        SubjectiveRefraction => ("SRF", "DCM", "Subjective Refraction"),
        Ultrasound => ("US", "DCM", "Ultrasound"),
        VisualAcuity => ("VA", "DCM", "Visual Acuity"),
        XRayAngiography => ("XA", "DCM", "X-Ray Angiography"),
    }
}

// the code values are the Modality defined terms
static BY_MODALITY: Lazy<HashMap<&'static str, AcquisitionModality>> = Lazy::new(|| {
    AcquisitionModality::all()
        .iter()
        .map(|&modality| (modality.code().value, modality))
        .collect()
});

impl AcquisitionModality {
    /// Maps a Modality (0008,0060) defined term.
    #[must_use]
    pub fn from_modality(modality: &str) -> Option<Self> {
        BY_MODALITY.get(modality.trim()).copied()
    }
}
