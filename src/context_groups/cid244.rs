context_group! {
    /// CID 244 Laterality.
    Laterality: CID "244", version "20040322", uid "1.2.840.10008.6.1.185",
    extensible false, "Laterality" {
        RightAndLeft => ("G-A100", "SRT", "Right and left"),
        Left => ("G-A101", "SRT", "Left"),
        Right => ("G-A102", "SRT", "Right"),
        Unilateral => ("G-A103", "SRT", "Unilateral"),
    }
}

impl Laterality {
    /// Maps an Image Laterality (0020,0062) defined term. `U` (unpaired) has
    /// no counterpart.
    #[must_use]
    pub fn from_image_laterality(laterality: &str) -> Option<Self> {
        match laterality.trim() {
            "R" => Some(Self::Right),
            "L" => Some(Self::Left),
            "B" => Some(Self::RightAndLeft),
            _ => None,
        }
    }
}
