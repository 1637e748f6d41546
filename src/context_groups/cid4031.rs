use std::collections::HashMap;

use once_cell::sync::Lazy;

context_group! {
    /// CID 4031 Common Anatomic Regions.
    CommonAnatomicRegion: CID "4031", version "20141110", uid "1.2.840.10008.6.1.308",
    extensible true, "Common Anatomic Regions" {
        Abdomen => ("T-D4000", "SRT", "Abdomen"),
        AbdomenAndPelvis => ("R-FAB57", "SRT", "Abdomen and Pelvis"),
        AnkleJoint => ("T-15750", "SRT", "Ankle joint"),
        Brain => ("T-A0100", "SRT", "Brain"),
        Breast => ("T-04000", "SRT", "Breast"),
        CervicalSpine => ("T-11501", "SRT", "Cervical spine"),
        Chest => ("T-D3000", "SRT", "Chest"),
        ChestAndAbdomen => ("R-FAB55", "SRT", "Chest and Abdomen"),
        Clavicle => ("T-12310", "SRT", "Clavicle"),
        Coccyx => ("T-11BF0", "SRT", "Coccyx"),
        ElbowJoint => ("T-15430", "SRT", "Elbow joint"),
        Extremity => ("T-D0300", "SRT", "Extremity"),
        Eye => ("T-AA000", "SRT", "Eye"),
        Foot => ("T-D9700", "SRT", "Foot"),
        Hand => ("T-D8700", "SRT", "Hand"),
        Head => ("T-D1100", "SRT", "Head"),
        Heart => ("T-32000", "SRT", "Heart"),
        HipJoint => ("T-15710", "SRT", "Hip joint"),
        Jaw => ("T-D1213", "SRT", "Jaw region"),
        Kidney => ("T-71000", "SRT", "Kidney"),
        KneeJoint => ("T-15720", "SRT", "Knee joint"),
        Liver => ("T-62000", "SRT", "Liver"),
        LumbarSpine => ("T-11503", "SRT", "Lumbar spine"),
        Neck => ("T-D1600", "SRT", "Neck"),
        Pelvis => ("T-D6000", "SRT", "Pelvis"),
        Sacrum => ("T-11AD0", "SRT", "Sacrum"),
        ShoulderJoint => ("T-15510", "SRT", "Shoulder joint"),
        Skull => ("T-11100", "SRT", "Skull"),
        ThoracicSpine => ("T-11502", "SRT", "Thoracic spine"),
        WholeBody => ("T-D0010", "SRT", "Entire body"),
        WristJoint => ("T-15460", "SRT", "Wrist joint"),
    }
}

static BY_BODY_PART: Lazy<HashMap<&'static str, CommonAnatomicRegion>> = Lazy::new(|| {
    use CommonAnatomicRegion as Region;
    HashMap::from([
        ("ABDOMEN", Region::Abdomen),
        ("ABDOMENPELVIS", Region::AbdomenAndPelvis),
        ("ANKLE", Region::AnkleJoint),
        ("BRAIN", Region::Brain),
        ("BREAST", Region::Breast),
        ("CSPINE", Region::CervicalSpine),
        ("CHEST", Region::Chest),
        ("CHESTABDOMEN", Region::ChestAndAbdomen),
        ("CLAVICLE", Region::Clavicle),
        ("COCCYX", Region::Coccyx),
        ("ELBOW", Region::ElbowJoint),
        ("EXTREMITY", Region::Extremity),
        ("EYE", Region::Eye),
        ("FOOT", Region::Foot),
        ("HAND", Region::Hand),
        ("HEAD", Region::Head),
        ("HEART", Region::Heart),
        ("HIP", Region::HipJoint),
        ("JAW", Region::Jaw),
        ("KIDNEY", Region::Kidney),
        ("KNEE", Region::KneeJoint),
        ("LIVER", Region::Liver),
        ("LSPINE", Region::LumbarSpine),
        ("NECK", Region::Neck),
        ("PELVIS", Region::Pelvis),
        ("SSPINE", Region::Sacrum),
        ("SHOULDER", Region::ShoulderJoint),
        ("SKULL", Region::Skull),
        ("TSPINE", Region::ThoracicSpine),
        ("WHOLEBODY", Region::WholeBody),
        ("WRIST", Region::WristJoint),
    ])
});

impl CommonAnatomicRegion {
    /// Maps a Body Part Examined (0018,0015) defined term.
    #[must_use]
    pub fn from_body_part_examined(body_part: &str) -> Option<Self> {
        BY_BODY_PART.get(body_part.trim()).copied()
    }
}
